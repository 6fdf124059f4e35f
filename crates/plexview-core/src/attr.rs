//! Attribute values read from a hierarchical array store.

use smallvec::SmallVec;

/// A single attribute value attached to a store group.
///
/// Hierarchical scientific containers attach small typed metadata to
/// groups: scalars, strings, and short vectors (grid shapes, cell sizes,
/// tracking id lists). The vector variants use `SmallVec<[_; 4]>` so the
/// common 3-component payloads stay inline; larger payloads (such as a
/// tracking id list) spill to the heap transparently.
///
/// # Examples
///
/// ```
/// use plexview_core::AttrValue;
///
/// let shape = AttrValue::from([16i64, 16, 32]);
/// assert_eq!(shape.as_int3(), Some([16, 16, 32]));
///
/// let size = AttrValue::from([0.5f64, 0.5, 1.0]);
/// assert_eq!(size.as_float3(), Some([0.5, 0.5, 1.0]));
///
/// // Integer scalars coerce to float where a float is expected.
/// assert_eq!(AttrValue::Int(3).as_float(), Some(3.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    /// A scalar integer.
    Int(i64),
    /// A scalar float.
    Float(f64),
    /// A string (species names, encoding markers).
    Str(String),
    /// A vector of integers (grid shapes, tracking id lists).
    IntVec(SmallVec<[i64; 4]>),
    /// A vector of floats (cell sizes).
    FloatVec(SmallVec<[f64; 4]>),
}

impl AttrValue {
    /// The value as a scalar integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a scalar float.
    ///
    /// Integer scalars coerce; stores are inconsistent about whether
    /// numeric statistics are written as ints or floats.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer slice, if it is an integer vector.
    pub fn as_ints(&self) -> Option<&[i64]> {
        match self {
            Self::IntVec(v) => Some(v),
            _ => None,
        }
    }

    /// The value as a float slice, if it is a float vector.
    pub fn as_floats(&self) -> Option<&[f64]> {
        match self {
            Self::FloatVec(v) => Some(v),
            _ => None,
        }
    }

    /// The value as exactly three integers, if it is a 3-long integer vector.
    pub fn as_int3(&self) -> Option<[i64; 3]> {
        match self.as_ints() {
            Some([a, b, c]) => Some([*a, *b, *c]),
            _ => None,
        }
    }

    /// The value as exactly three floats.
    ///
    /// Accepts a 3-long float vector, or a 3-long integer vector coerced
    /// elementwise.
    pub fn as_float3(&self) -> Option<[f64; 3]> {
        match self {
            Self::FloatVec(v) => match v.as_slice() {
                [a, b, c] => Some([*a, *b, *c]),
                _ => None,
            },
            Self::IntVec(v) => match v.as_slice() {
                [a, b, c] => Some([*a as f64, *b as f64, *c as f64]),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<[i64; 3]> for AttrValue {
    fn from(v: [i64; 3]) -> Self {
        Self::IntVec(SmallVec::from_slice(&v))
    }
}

impl From<[f64; 3]> for AttrValue {
    fn from(v: [f64; 3]) -> Self {
        Self::FloatVec(SmallVec::from_slice(&v))
    }
}

impl From<Vec<i64>> for AttrValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntVec(SmallVec::from_vec(v))
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        Self::FloatVec(SmallVec::from_vec(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_coerces_to_float_but_not_reverse() {
        assert_eq!(AttrValue::Int(7).as_float(), Some(7.0));
        assert_eq!(AttrValue::Float(7.0).as_int(), None);
    }

    #[test]
    fn triple_accessors_reject_wrong_arity() {
        assert_eq!(AttrValue::from(vec![1i64, 2]).as_int3(), None);
        assert_eq!(AttrValue::from(vec![1.0, 2.0, 3.0, 4.0]).as_float3(), None);
        assert_eq!(AttrValue::from([1i64, 2, 3]).as_int3(), Some([1, 2, 3]));
    }

    #[test]
    fn int_vector_coerces_to_float3() {
        assert_eq!(
            AttrValue::from([2i64, 4, 8]).as_float3(),
            Some([2.0, 4.0, 8.0])
        );
    }

    #[test]
    fn string_round_trip() {
        let v = AttrValue::from("electron");
        assert_eq!(v.as_str(), Some("electron"));
        assert_eq!(v.as_int(), None);
    }
}
