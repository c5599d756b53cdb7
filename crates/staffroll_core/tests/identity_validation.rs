use staffroll_core::validation::identity::compute_check_digit;
use staffroll_core::{
    canonical_identity_number, check_identifier_exclusivity, validate_email,
    validate_identity_number, validate_phone, ValidationError, ValidationResult,
};

#[test]
fn known_identity_numbers_are_valid() {
    for value in [
        "12345678-5",
        "1-9",
        "01-9",
        "7-8",
        "0-0",
        "28-0",
        "6-K",
        "6-k",
        "11111111-1",
    ] {
        assert_eq!(
            validate_identity_number(value),
            ValidationResult::Valid,
            "expected `{value}` to be valid"
        );
    }
}

#[test]
fn wrong_check_digit_is_a_checksum_failure() {
    for value in ["12345678-k", "12345678-K", "1-0", "7-6", "6-0"] {
        assert_eq!(
            validate_identity_number(value),
            ValidationResult::InvalidChecksum,
            "expected `{value}` to fail the checksum"
        );
    }
}

#[test]
fn malformed_identity_numbers_are_format_failures() {
    for value in [
        "",
        " 1-9",
        "1-9 ",
        "123456789-1",
        "1--9",
        "1-99",
        "a-1",
        "1-x",
        "19",
        "-9",
        "12.345.678-5",
    ] {
        assert_eq!(
            validate_identity_number(value),
            ValidationResult::InvalidFormat,
            "expected `{value}` to be malformed"
        );
    }
}

#[test]
fn check_digit_follows_modulo_eleven_weights() {
    assert_eq!(compute_check_digit(12_345_678), '5');
    assert_eq!(compute_check_digit(1_111_111), '4');
    assert_eq!(compute_check_digit(7), '8');
    assert_eq!(compute_check_digit(6), 'K');
    assert_eq!(compute_check_digit(0), '0');
    assert_eq!(compute_check_digit(99_999_999), '9');
}

#[test]
fn canonical_form_drops_leading_zeros_and_uppercases() {
    assert_eq!(canonical_identity_number("01-9").unwrap(), "1-9");
    assert_eq!(canonical_identity_number("6-k").unwrap(), "6-K");
    assert_eq!(
        canonical_identity_number("7-6").unwrap_err(),
        ValidationError::Checksum
    );
}

#[test]
fn phone_numbers_follow_mobile_format() {
    assert_eq!(validate_phone("912345678"), ValidationResult::Valid);
    assert_eq!(validate_phone("812345678"), ValidationResult::InvalidFormat);
    assert_eq!(validate_phone("91234567"), ValidationResult::InvalidFormat);
    assert_eq!(validate_phone("+56912345678"), ValidationResult::InvalidFormat);
}

#[test]
fn email_addresses_are_checked() {
    assert!(validate_email("ana.rojas@colegio.cl").is_valid());
    assert!(!validate_email("ana.rojas@").is_valid());
}

#[test]
fn exactly_one_identifier_is_required() {
    assert_eq!(check_identifier_exclusivity(Some("1-9"), None), Ok(()));
    assert_eq!(check_identifier_exclusivity(None, Some("P-7788")), Ok(()));
    assert_eq!(
        check_identifier_exclusivity(Some("1-9"), Some("P-7788")),
        Err(ValidationError::ConflictingIdentifier)
    );
    assert_eq!(
        check_identifier_exclusivity(None, None),
        Err(ValidationError::MissingIdentifier)
    );
    assert_eq!(
        check_identifier_exclusivity(Some("  "), Some("")),
        Err(ValidationError::MissingIdentifier)
    );
}
