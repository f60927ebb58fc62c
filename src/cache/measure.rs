//! Size Measurement Module
//!
//! Defines how stored values report their byte length.

use std::sync::Arc;

use serde_json::Value;

// == Measure Trait ==
/// A value whose byte length can be determined for size accounting.
///
/// Returning `None` marks the value as unmeasurable; the store rejects it.
pub trait Measure {
    /// Returns the byte length of the value, if it has one.
    fn byte_size(&self) -> Option<usize>;
}

impl Measure for String {
    fn byte_size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Measure for &'static str {
    fn byte_size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Measure for Arc<str> {
    fn byte_size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Measure for Vec<u8> {
    fn byte_size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl Measure for Box<[u8]> {
    fn byte_size(&self) -> Option<usize> {
        Some(self.len())
    }
}

impl<T: Measure> Measure for Option<T> {
    fn byte_size(&self) -> Option<usize> {
        self.as_ref().and_then(Measure::byte_size)
    }
}

/// Strings measure their UTF-8 length, containers their serialized length.
/// Scalars have no length.
impl Measure for Value {
    fn byte_size(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.len()),
            Value::Array(_) | Value::Object(_) => serde_json::to_vec(self).ok().map(|b| b.len()),
            Value::Null | Value::Bool(_) | Value::Number(_) => None,
        }
    }
}
