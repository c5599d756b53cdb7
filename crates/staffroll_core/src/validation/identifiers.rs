//! Cross-field identifier rule for person-like records.

use super::ValidationError;

/// Requires exactly one of `national_id` / `foreign_id` to be present.
///
/// Blank or whitespace-only values count as absent.
pub fn check_identifier_exclusivity(
    national_id: Option<&str>,
    foreign_id: Option<&str>,
) -> Result<(), ValidationError> {
    match (is_present(national_id), is_present(foreign_id)) {
        (true, true) => Err(ValidationError::ConflictingIdentifier),
        (false, false) => Err(ValidationError::MissingIdentifier),
        _ => Ok(()),
    }
}

/// Returns the trimmed value, or `None` when the field is blank.
pub fn present_value(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|trimmed| !trimmed.is_empty())
}

fn is_present(value: Option<&str>) -> bool {
    present_value(value).is_some()
}

#[cfg(test)]
mod tests {
    use super::{check_identifier_exclusivity, present_value};
    use crate::validation::ValidationError;

    #[test]
    fn exactly_one_identifier_passes() {
        assert_eq!(check_identifier_exclusivity(Some("1-9"), None), Ok(()));
        assert_eq!(check_identifier_exclusivity(None, Some("P1234567")), Ok(()));
        assert_eq!(check_identifier_exclusivity(Some("1-9"), Some("  ")), Ok(()));
    }

    #[test]
    fn both_identifiers_conflict() {
        assert_eq!(
            check_identifier_exclusivity(Some("1-9"), Some("P1234567")),
            Err(ValidationError::ConflictingIdentifier)
        );
    }

    #[test]
    fn blank_identifiers_are_missing() {
        assert_eq!(
            check_identifier_exclusivity(None, None),
            Err(ValidationError::MissingIdentifier)
        );
        assert_eq!(
            check_identifier_exclusivity(Some(""), Some(" \t")),
            Err(ValidationError::MissingIdentifier)
        );
    }

    #[test]
    fn present_value_trims() {
        assert_eq!(present_value(Some("  P1 ")), Some("P1"));
        assert_eq!(present_value(Some("   ")), None);
    }
}
