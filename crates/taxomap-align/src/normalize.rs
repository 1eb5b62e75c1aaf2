//! Label canonicalization applied before any similarity comparison.

use regex::Regex;
use std::sync::OnceLock;

/// Lowercase, strip punctuation, and collapse whitespace.
///
/// Word characters are Unicode letters, digits and `_`; everything else that is
/// not whitespace is removed. The result never has leading or trailing spaces.
pub fn normalize_label(label: &str) -> String {
    static PUNCT_RE: OnceLock<Regex> = OnceLock::new();
    static SPACE_RE: OnceLock<Regex> = OnceLock::new();

    let punct_re = PUNCT_RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("valid regex"));
    let space_re = SPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    if label.is_empty() {
        return String::new();
    }

    let lowered = label.to_lowercase();
    let stripped = punct_re.replace_all(lowered.trim(), "");
    space_re.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize_label("  Grant   Fraud "), "grant fraud");
        assert_eq!(normalize_label("Cyber-espionage!"), "cyberespionage");
        assert_eq!(normalize_label("Identity (theft)"), "identity theft");
    }

    #[test]
    fn test_normalize_keeps_underscores_and_digits() {
        assert_eq!(normalize_label("public_emergency_fraud 2020"), "public_emergency_fraud 2020");
    }

    #[test]
    fn test_normalize_unicode_letters() {
        assert_eq!(normalize_label("Fraude Électronique"), "fraude électronique");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize_label(""), "");
        assert_eq!(normalize_label("?!."), "");
        assert_eq!(normalize_label("fraud ."), "fraud");
    }
}
