//! Source reference validation
//!
//! A candidate is accepted when its trimmed form starts with one of
//! [`ACCEPTED_PREFIXES`]. Matching is case-sensitive and purely textual; the
//! backend decides later whether the reference is actually retrievable.

use crate::types::ValidationOutcome;

/// Prefixes a trimmed entry must start with to be handed to the backend
pub const ACCEPTED_PREFIXES: [&str; 4] = ["http://", "https://", "youtube.com", "youtu.be"];

/// Classify a raw entry
///
/// # Examples
///
/// ```
/// use media_batch_dl::validate::validate;
/// use media_batch_dl::ValidationOutcome;
///
/// assert_eq!(
///     validate("  youtu.be/xyz "),
///     ValidationOutcome::Valid("youtu.be/xyz".to_string())
/// );
/// assert_eq!(validate("ftp://x"), ValidationOutcome::Invalid);
/// ```
pub fn validate(raw: &str) -> ValidationOutcome {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return ValidationOutcome::Invalid;
    }
    if ACCEPTED_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        ValidationOutcome::Valid(trimmed.to_string())
    } else {
        ValidationOutcome::Invalid
    }
}

/// Classify an entry that may be absent (e.g. a missing table field)
pub fn validate_opt(raw: Option<&str>) -> ValidationOutcome {
    raw.map(validate).unwrap_or(ValidationOutcome::Invalid)
}

/// Returns `true` if `raw` would classify as valid
pub fn is_valid(raw: &str) -> bool {
    validate(raw).is_valid()
}
