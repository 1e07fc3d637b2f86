use lazy_regex::{regex, Lazy, Regex};

/// Loose email address pattern. Requires a local part, an `@` and a dotted domain with no
/// whitespace anywhere.
static EMAIL_REGEX: &Lazy<Regex, fn() -> Regex> = regex!(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$");

/// Returns true if the `email` looks like a deliverable address
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX.is_match(email)
}

/// Normalize an email address for storage and lookup. Surrounding whitespace is removed and the
/// address is lower cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
