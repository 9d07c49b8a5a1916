//! Per-table field transforms between stored bytes and wire text. Applied
//! symmetrically: stored binary becomes base64 text on read, wire base64
//! becomes binary on write. Registered today for the Users profile image.

use crate::error::AppError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

/// A symmetric transform for one (table, field) pair. `to_wire` and
/// `from_wire` must be inverses for all valid inputs.
pub struct FieldTransform {
    pub table: &'static str,
    pub field: &'static str,
    pub to_wire: fn(&[u8]) -> String,
    pub from_wire: fn(&str) -> Result<Vec<u8>, AppError>,
}

/// Absent or empty binary reads as the empty string, never an error.
fn base64_to_wire(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        String::new()
    } else {
        BASE64.encode(bytes)
    }
}

fn base64_from_wire(s: &str) -> Result<Vec<u8>, AppError> {
    BASE64
        .decode(s)
        .map_err(|e| AppError::Validation(format!("invalid base64: {}", e)))
}

/// Statically registered transforms, immutable after startup.
pub struct TransformRegistry {
    transforms: Vec<FieldTransform>,
}

impl TransformRegistry {
    pub fn new(transforms: Vec<FieldTransform>) -> Self {
        TransformRegistry { transforms }
    }

    /// The deployed set: base64 for the Users profile image only.
    pub fn with_defaults() -> Self {
        TransformRegistry::new(vec![FieldTransform {
            table: "Users",
            field: "profile_image",
            to_wire: base64_to_wire,
            from_wire: base64_from_wire,
        }])
    }

    pub fn find(&self, table: &str, field: &str) -> Option<&FieldTransform> {
        self.transforms
            .iter()
            .find(|t| t.table == table && t.field == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_is_identity() {
        let reg = TransformRegistry::with_defaults();
        let t = reg.find("Users", "profile_image").unwrap();
        let original: &[u8] = &[0x00, 0xff, 0x42, 0x10, 0x7f];
        let wire = (t.to_wire)(original);
        let back = (t.from_wire)(&wire).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn empty_bytes_read_as_empty_string() {
        let reg = TransformRegistry::with_defaults();
        let t = reg.find("Users", "profile_image").unwrap();
        assert_eq!((t.to_wire)(&[]), "");
    }

    #[test]
    fn invalid_base64_is_a_validation_error() {
        let reg = TransformRegistry::with_defaults();
        let t = reg.find("Users", "profile_image").unwrap();
        let err = (t.from_wire)("not//valid==base64!!").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn lookup_is_per_table_and_field() {
        let reg = TransformRegistry::with_defaults();
        assert!(reg.find("Users", "profile_image").is_some());
        assert!(reg.find("Posts", "profile_image").is_none());
        assert!(reg.find("Users", "password_hash").is_none());
    }
}
