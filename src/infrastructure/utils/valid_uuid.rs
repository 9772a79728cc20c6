use uuid::Uuid;

use crate::errors::AppError;

/// Parses a required identifier field, rejecting blanks and malformed UUIDs.
pub fn required_uuid(field: &str, value: Option<&str>) -> Result<Uuid, AppError> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidInput(format!("{field} is required")))?;

    Uuid::parse_str(raw).map_err(|_| AppError::InvalidInput(format!("Invalid {field} format")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_padded_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(required_uuid("id", Some(&format!(" {id} "))).unwrap(), id);
    }

    #[test]
    fn missing_and_blank_are_required_errors() {
        for value in [None, Some(""), Some("   ")] {
            match required_uuid("id", value) {
                Err(AppError::InvalidInput(msg)) => assert_eq!(msg, "id is required"),
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_uuid_is_rejected() {
        assert!(matches!(
            required_uuid("id", Some("not-a-uuid")),
            Err(AppError::InvalidInput(msg)) if msg == "Invalid id format"
        ));
    }
}
