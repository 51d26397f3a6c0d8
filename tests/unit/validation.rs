use intelplat::error::ValidationError;
use intelplat::validation::{validate_password, validate_username};

#[test]
fn out_of_range_lengths_fail_on_length_first() {
    for len in [0usize, 1, 2, 16, 17, 40] {
        let name = "!".repeat(len);
        assert_eq!(
            validate_username(&name),
            Err(ValidationError::UsernameLength),
            "len {len}"
        );
    }
}

#[test]
fn only_the_space_character_triggers_the_space_rule() {
    assert_eq!(validate_username("john\tsmith"), Err(ValidationError::UsernameCharacter));
    assert_eq!(validate_username("john smith"), Err(ValidationError::UsernameSpace));
}

#[test]
fn underscore_is_not_alphanumeric() {
    assert_eq!(validate_username("under_score"), Err(ValidationError::UsernameCharacter));
}

#[test]
fn password_rules_apply_in_order() {
    // Short and missing both uppercase and digit: length wins.
    assert_eq!(validate_password("abc"), Err(ValidationError::PasswordLength));
    // Long enough but lowercase with no digit: uppercase wins.
    assert_eq!(validate_password("abcdefgh"), Err(ValidationError::PasswordUppercase));
}

#[test]
fn messages_are_user_facing() {
    assert_eq!(
        ValidationError::UsernameLength.to_string(),
        "Username must be between 3 and 15 characters long."
    );
    assert_eq!(
        ValidationError::PasswordDigit.to_string(),
        "Password must contain at least one number."
    );
}
