//! File-name templates for the file-based source layout.

use plexview_core::Cycle;

use crate::error::IngestError;

/// A file-name template with a `%T` numeric placeholder.
///
/// File-based sources store one container per cycle, with the cycle
/// number embedded in the file name (`"out/data_%T.h5"` resolves cycle
/// 12 to `"out/data_12.h5"`). The placeholder must appear exactly once,
/// in the file-name component.
///
/// # Examples
///
/// ```
/// use plexview_core::Cycle;
/// use plexview_ingest::FileTemplate;
///
/// let t = FileTemplate::parse("out/data_%T.h5").unwrap();
/// assert_eq!(t.path_for(Cycle(12)), "out/data_12.h5");
/// assert_eq!(t.cycle_of("data_0042.h5"), Some(Cycle(42)));
/// assert_eq!(t.cycle_of("data_final.h5"), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTemplate {
    dir: String,
    prefix: String,
    suffix: String,
}

impl FileTemplate {
    /// Parse a template path.
    ///
    /// Fails with [`IngestError::InvalidTemplate`] unless the file-name
    /// component contains exactly one `%T` and the directory component
    /// contains none.
    pub fn parse(template: &str) -> Result<Self, IngestError> {
        let invalid = || IngestError::InvalidTemplate {
            template: template.to_string(),
        };
        let (dir, file) = match template.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", template),
        };
        if dir.contains("%T") {
            return Err(invalid());
        }
        let (prefix, suffix) = file.split_once("%T").ok_or_else(invalid)?;
        if suffix.contains("%T") {
            return Err(invalid());
        }
        Ok(Self {
            dir: dir.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
        })
    }

    /// The directory component (empty for the provider root).
    pub fn dir(&self) -> &str {
        &self.dir
    }

    /// Resolve the full path for one cycle.
    pub fn path_for(&self, cycle: Cycle) -> String {
        if self.dir.is_empty() {
            format!("{}{}{}", self.prefix, cycle, self.suffix)
        } else {
            format!("{}/{}{}{}", self.dir, self.prefix, cycle, self.suffix)
        }
    }

    /// Extract the cycle number from a candidate file name.
    ///
    /// Returns `None` if the name does not match the template or the
    /// placeholder region is not a decimal number. Leading zeros are
    /// accepted (`"data_0042.h5"` is cycle 42).
    pub fn cycle_of(&self, file_name: &str) -> Option<Cycle> {
        let middle = file_name
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        if middle.is_empty() || !middle.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        middle.parse::<u64>().ok().map(Cycle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_around_placeholder() {
        let t = FileTemplate::parse("runs/a/data_%T.h5").unwrap();
        assert_eq!(t.dir(), "runs/a");
        assert_eq!(t.path_for(Cycle(7)), "runs/a/data_7.h5");
    }

    #[test]
    fn parse_without_directory() {
        let t = FileTemplate::parse("data_%T.h5").unwrap();
        assert_eq!(t.dir(), "");
        assert_eq!(t.path_for(Cycle(0)), "data_0.h5");
    }

    #[test]
    fn missing_placeholder_is_rejected() {
        assert!(matches!(
            FileTemplate::parse("data.h5"),
            Err(IngestError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn repeated_placeholder_is_rejected() {
        assert!(matches!(
            FileTemplate::parse("data_%T_%T.h5"),
            Err(IngestError::InvalidTemplate { .. })
        ));
        assert!(matches!(
            FileTemplate::parse("run_%T/data_%T.h5"),
            Err(IngestError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn cycle_of_matches_digits_only() {
        let t = FileTemplate::parse("data_%T.h5").unwrap();
        assert_eq!(t.cycle_of("data_10.h5"), Some(Cycle(10)));
        assert_eq!(t.cycle_of("data_007.h5"), Some(Cycle(7)));
        assert_eq!(t.cycle_of("data_.h5"), None);
        assert_eq!(t.cycle_of("data_x1.h5"), None);
        assert_eq!(t.cycle_of("other_10.h5"), None);
        assert_eq!(t.cycle_of("data_10.txt"), None);
    }
}
