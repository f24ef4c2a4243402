use mongodb::bson::{Bson, Document};
use mongodb::error::{Error, ErrorKind, WriteFailure};

/// Server error code for unique index violations.
pub const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether `err` is a unique index violation.
pub fn is_duplicate_key(err: &Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY_CODE,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// Reads a numeric field as `i64` whatever width the server chose.
///
/// `$sum` yields Int32 for small totals and Int64 or Double for larger ones.
pub fn int_field(doc: &Document, key: &str) -> Option<i64> {
    match doc.get(key)? {
        Bson::Int32(v) => Some(i64::from(*v)),
        Bson::Int64(v) => Some(*v),
        Bson::Double(v) if v.fract() == 0.0 => Some(*v as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_int_field_accepts_every_integer_width() {
        let d = doc! { "a": 7_i32, "b": 9_000_000_000_i64, "c": 12.0, "d": 1.5, "e": "x" };
        assert_eq!(int_field(&d, "a"), Some(7));
        assert_eq!(int_field(&d, "b"), Some(9_000_000_000));
        assert_eq!(int_field(&d, "c"), Some(12));
        assert_eq!(int_field(&d, "d"), None);
        assert_eq!(int_field(&d, "e"), None);
        assert_eq!(int_field(&d, "missing"), None);
    }
}
