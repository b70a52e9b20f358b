//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Generate a compact document id (UUID without dashes)
pub fn generate_document_id() -> String {
    Uuid::new_v4().simple().to_string()
}

fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_some_and(|re| re.is_match(email))
}

/// Lower-case and trim an email address
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Calculate pagination offset
pub fn calculate_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Number of pages needed for `total_items`
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_items.div_ceil(page_size)
}

/// Encode an external identifier as a single document id segment.
/// Percent-encoding keeps distinct identifiers distinct.
pub fn encode_document_id(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Generate a random password containing upper, lower and digit characters
pub fn generate_random_password(length: usize) -> String {
    let length = length.max(8);
    loop {
        let candidate = generate_random_string(length);
        let has_upper = candidate.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = candidate.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = candidate.chars().any(|c| c.is_ascii_digit());
        if has_upper && has_lower && has_digit {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("admin@5mgolf.com"));
        assert!(!is_valid_email("admin@localhost"));
        assert!(!is_valid_email("no spaces@x.com"));
        assert_eq!(normalize_email("  Admin@5MGolf.com "), "admin@5mgolf.com");
    }

    #[test]
    fn test_pagination() {
        assert_eq!(calculate_offset(1, 12), 0);
        assert_eq!(calculate_offset(3, 12), 24);
        assert_eq!(calculate_offset(0, 12), 0);
        assert_eq!(calculate_offset(usize::MAX, 12), usize::MAX);
        assert_eq!(total_pages(25, 12), 3);
        assert_eq!(total_pages(0, 12), 0);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_encode_document_id() {
        assert_eq!(encode_document_id("TX/2024 001"), "TX%2F2024%20001");
        assert_eq!(encode_document_id("abc-1_2"), "abc-1_2");
        assert_ne!(encode_document_id("A/B"), encode_document_id("A_B"));
        assert_ne!(encode_document_id("A%2FB"), encode_document_id("A/B"));
    }

    #[test]
    fn test_random_password() {
        let password = generate_random_password(12);
        assert_eq!(password.len(), 12);
        assert!(password.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(generate_random_password(3).len(), 8);
    }
}
