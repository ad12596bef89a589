//! Password strength policy.
//!
//! The same check guards admin-created accounts and self-service password
//! changes. Rules are evaluated in a fixed order and the first failure wins.

use thiserror::Error;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyViolation {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must contain at least one uppercase letter")]
    MissingUppercase,

    #[error("Password must contain at least one lowercase letter")]
    MissingLowercase,

    #[error("Password must contain at least one number")]
    MissingDigit,

    #[error("Password must contain at least one special character")]
    MissingSpecial,
}

/// Validate password strength.
///
/// Requirements, checked in this order:
/// - At least 8 characters
/// - Contains an uppercase letter (A-Z)
/// - Contains a lowercase letter (a-z)
/// - Contains a digit (0-9)
/// - Contains a character outside A-Z, a-z and 0-9
pub fn validate_password(password: &str) -> Result<(), PolicyViolation> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PolicyViolation::TooShort);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PolicyViolation::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PolicyViolation::MissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::MissingDigit);
    }

    if password.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(PolicyViolation::MissingSpecial);
    }

    Ok(())
}

/// Generate a random password that passes [`validate_password`].
///
/// One character from each required class is placed first, the rest are
/// drawn from the union, and the result is shuffled.
#[must_use]
pub fn generate_compliant_password(length: usize) -> String {
    use rand::Rng;
    use rand::seq::SliceRandom;

    const UPPER: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ";
    const LOWER: &[u8] = b"abcdefghijkmnopqrstuvwxyz";
    const DIGITS: &[u8] = b"23456789";
    const SPECIAL: &[u8] = b"!@#$%^&*-_=+?";

    let length = length.max(MIN_PASSWORD_LENGTH);
    let mut rng = rand::rng();
    let pick = |rng: &mut rand::rngs::ThreadRng, set: &[u8]| set[rng.random_range(0..set.len())];

    let mut chars: Vec<u8> = vec![
        pick(&mut rng, UPPER),
        pick(&mut rng, LOWER),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL),
    ];

    let all: Vec<u8> = [UPPER, LOWER, DIGITS, SPECIAL].concat();
    while chars.len() < length {
        chars.push(pick(&mut rng, &all));
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}
