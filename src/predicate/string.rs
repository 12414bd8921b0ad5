//! String predicates
//!
//! Lengths are counted in characters, not bytes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::combinators::Predicate;

/// Predicate that checks string length (in chars) is in range.
#[derive(Clone, Copy, Debug)]
pub struct LenBetween {
    min: usize,
    max: usize,
}

impl Predicate<str> for LenBetween {
    #[inline]
    fn check(&self, value: &str) -> bool {
        let len = value.chars().count();
        len >= self.min && len <= self.max
    }
}

/// Create a predicate that checks if string length is between min and max (inclusive).
///
/// # Example
///
/// ```rust
/// use weir::predicate::*;
///
/// let p = len_between(3, 5);
/// assert!(!p.check("ab"));
/// assert!(p.check("héllo"));
/// assert!(!p.check("toolong"));
/// ```
pub fn len_between(min: usize, max: usize) -> LenBetween {
    LenBetween { min, max }
}

/// Create a predicate that checks if string length is at least min.
pub fn len_min(min: usize) -> LenBetween {
    LenBetween {
        min,
        max: usize::MAX,
    }
}

/// Create a predicate that checks if string length is at most max.
pub fn len_max(max: usize) -> LenBetween {
    LenBetween { min: 0, max }
}

/// Create a predicate that checks if string length is exactly len.
pub fn len_eq(len: usize) -> LenBetween {
    LenBetween { min: len, max: len }
}

/// Predicate that checks if string starts with a prefix.
#[derive(Clone, Debug)]
pub struct StartsWith<S>(pub S);

impl<S: AsRef<str> + Send + Sync> Predicate<str> for StartsWith<S> {
    #[inline]
    fn check(&self, value: &str) -> bool {
        value.starts_with(self.0.as_ref())
    }
}

/// Create a predicate that checks if string starts with prefix.
pub fn starts_with<S: AsRef<str> + Send + Sync>(prefix: S) -> StartsWith<S> {
    StartsWith(prefix)
}

/// Predicate that checks if string ends with a suffix.
#[derive(Clone, Debug)]
pub struct EndsWith<S>(pub S);

impl<S: AsRef<str> + Send + Sync> Predicate<str> for EndsWith<S> {
    #[inline]
    fn check(&self, value: &str) -> bool {
        value.ends_with(self.0.as_ref())
    }
}

/// Create a predicate that checks if string ends with suffix.
pub fn ends_with<S: AsRef<str> + Send + Sync>(suffix: S) -> EndsWith<S> {
    EndsWith(suffix)
}

/// Predicate that checks if string contains a substring.
#[derive(Clone, Debug)]
pub struct Contains<S>(pub S);

impl<S: AsRef<str> + Send + Sync> Predicate<str> for Contains<S> {
    #[inline]
    fn check(&self, value: &str) -> bool {
        value.contains(self.0.as_ref())
    }
}

/// Create a predicate that checks if string contains substring.
pub fn contains<S: AsRef<str> + Send + Sync>(needle: S) -> Contains<S> {
    Contains(needle)
}

/// Predicate that checks if any char satisfies a predicate.
#[derive(Clone, Copy, Debug)]
pub struct AnyChar<F>(pub F);

impl<F: Fn(char) -> bool + Send + Sync> Predicate<str> for AnyChar<F> {
    #[inline]
    fn check(&self, value: &str) -> bool {
        value.chars().any(&self.0)
    }
}

/// Create a predicate that checks if any char satisfies the given predicate.
///
/// # Example
///
/// ```rust
/// use weir::predicate::*;
///
/// let mixed_case = any_char(char::is_lowercase).and(any_char(char::is_uppercase));
/// assert!(mixed_case.check("Password"));
/// assert!(!mixed_case.check("password"));
/// ```
pub fn any_char<F: Fn(char) -> bool + Send + Sync>(f: F) -> AnyChar<F> {
    AnyChar(f)
}

/// Predicate that checks if all chars satisfy a predicate.
#[derive(Clone, Copy, Debug)]
pub struct AllChars<F>(pub F);

impl<F: Fn(char) -> bool + Send + Sync> Predicate<str> for AllChars<F> {
    #[inline]
    fn check(&self, value: &str) -> bool {
        value.chars().all(&self.0)
    }
}

/// Create a predicate that checks if all chars satisfy the given predicate.
pub fn all_chars<F: Fn(char) -> bool + Send + Sync>(f: F) -> AllChars<F> {
    AllChars(f)
}

/// Predicate that checks a string against a regular expression.
#[derive(Clone, Debug)]
pub struct Matches(pub Regex);

impl Predicate<str> for Matches {
    #[inline]
    fn check(&self, value: &str) -> bool {
        self.0.is_match(value)
    }
}

/// Create a predicate that checks if a regular expression matches anywhere in the string.
pub fn matches(pattern: Regex) -> Matches {
    Matches(pattern)
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$")
        .unwrap_or_else(|e| unreachable!("email pattern is valid: {}", e))
});

/// Predicate that checks for an email address.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsEmail;

impl Predicate<str> for IsEmail {
    fn check(&self, value: &str) -> bool {
        !value.starts_with('.') && !value.contains("..") && EMAIL.is_match(value)
    }
}

/// Create a predicate that checks for an email address.
///
/// # Example
///
/// ```rust
/// use weir::predicate::*;
///
/// assert!(is_email().check("test@example.com"));
/// assert!(!is_email().check("test@example"));
/// assert!(!is_email().check(".test@example.com"));
/// ```
pub fn is_email() -> IsEmail {
    IsEmail
}

/// Predicate that checks for an absolute URL.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsUrl;

impl Predicate<str> for IsUrl {
    fn check(&self, value: &str) -> bool {
        url::Url::parse(value).is_ok()
    }
}

/// Create a predicate that checks for an absolute URL.
pub fn is_url() -> IsUrl {
    IsUrl
}

/// Predicate that checks for a hyphenated UUID.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsUuid;

impl Predicate<str> for IsUuid {
    fn check(&self, value: &str) -> bool {
        value.len() == 36 && uuid::Uuid::parse_str(value).is_ok()
    }
}

/// Create a predicate that checks for a hyphenated UUID.
pub fn is_uuid() -> IsUuid {
    IsUuid
}

/// Predicate that checks for an RFC 3339 timestamp.
#[derive(Clone, Copy, Debug, Default)]
pub struct IsDatetime;

impl Predicate<str> for IsDatetime {
    fn check(&self, value: &str) -> bool {
        chrono::DateTime::parse_from_rfc3339(value).is_ok()
    }
}

/// Create a predicate that checks for an RFC 3339 timestamp.
pub fn is_datetime() -> IsDatetime {
    IsDatetime
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_len_counts_chars() {
        assert!(len_eq(3).check("äöü"));
        assert!(!len_max(2).check("äöü"));
        assert!(len_min(0).check(""));
    }

    #[test]
    fn test_affixes() {
        assert!(starts_with("ab").check("abc"));
        assert!(ends_with("bc").check("abc"));
        assert!(contains("b").check("abc"));
        assert!(!contains("z").check("abc"));
    }

    #[test]
    fn test_email() {
        assert!(is_email().check("test@example.com"));
        assert!(is_email().check("first.last+tag@sub.example.co"));
        assert!(!is_email().check(""));
        assert!(!is_email().check("a..b@example.com"));
        assert!(!is_email().check("no-at-sign.example.com"));
    }

    #[test]
    fn test_url() {
        assert!(is_url().check("https://example.com/path?q=1"));
        assert!(!is_url().check("example.com"));
    }

    #[test]
    fn test_uuid() {
        assert!(is_uuid().check("67e55044-10b1-426f-9247-bb680e5fe0c8"));
        assert!(!is_uuid().check("67e5504410b1426f9247bb680e5fe0c8"));
        assert!(!is_uuid().check("not-a-uuid"));
    }

    #[test]
    fn test_datetime() {
        assert!(is_datetime().check("2022-01-12T00:00:00.000Z"));
        assert!(is_datetime().check("2022-01-12T09:30:00+09:00"));
        assert!(!is_datetime().check("2022-01-12"));
    }

    #[test]
    fn test_matches() {
        let p = matches(Regex::new("^[a-z]+$").unwrap());
        assert!(p.check("abc"));
        assert!(!p.check("abc1"));
    }

    #[test]
    fn test_all_chars() {
        assert!(all_chars(char::is_alphanumeric).check("abc123"));
        assert!(!all_chars(char::is_alphanumeric).check("abc-123"));
    }
}
