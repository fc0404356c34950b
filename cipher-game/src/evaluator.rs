//! Answer checking.

/// Compare a submitted answer with the canonical one.
///
/// Surrounding whitespace on the submission and letter case on both sides are
/// ignored. Inner spacing and punctuation must match exactly.
#[must_use]
pub fn evaluate(submitted: &str, canonical: &str) -> bool {
    submitted.trim().to_lowercase() == canonical.to_lowercase()
}

/// A blank answer cannot be submitted.
#[must_use]
pub fn is_blank(submitted: &str) -> bool {
    submitted.trim().is_empty()
}
