use validator::ValidateEmail;

/// Syntactic email check. No MX lookup or deliverability test.
///
/// On top of the `validator` rules the domain must carry a top-level label
/// (`user@host` alone is rejected).
pub fn is_valid_email(email: Option<&str>) -> bool {
    let Some(email) = email.filter(|e| !e.is_empty()) else {
        return false;
    };

    if !email.validate_email() {
        return false;
    }

    email
        .rsplit_once('@')
        .map(|(_, domain)| has_top_level_label(domain))
        .unwrap_or(false)
}

fn has_top_level_label(domain: &str) -> bool {
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && tld.len() >= 2
                && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ordinary_addresses() {
        assert!(is_valid_email(Some("test-user@gmail.com")));
        assert!(is_valid_email(Some("baz@bar.com")));
        assert!(is_valid_email(Some("first.last+tag@mail.example.co.uk")));
    }

    #[test]
    fn test_rejects_missing_or_empty() {
        assert!(!is_valid_email(None));
        assert!(!is_valid_email(Some("")));
        assert!(!is_valid_email(Some("   ")));
    }

    #[test]
    fn test_rejects_domains_without_tld() {
        assert!(!is_valid_email(Some("not@n-email")));
        assert!(!is_valid_email(Some("user@localhost")));
        assert!(!is_valid_email(Some("user@host.c")));
    }

    #[test]
    fn test_rejects_malformed_addresses() {
        assert!(!is_valid_email(Some("plainaddress")));
        assert!(!is_valid_email(Some("@missing-local.com")));
        assert!(!is_valid_email(Some("two@@signs.com")));
    }
}
