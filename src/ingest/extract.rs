//! Record → `(group, member)` key extraction.

use crate::ingest::MalformedRecord;

/// Derives the `(group, member)` pair the ranking counts from one raw record.
///
/// Implementations reject records they cannot key with [`MalformedRecord`];
/// the ingestion loop skips those without touching the ranking.
pub trait KeyExtractor<R: ?Sized> {
    type Group;
    type Member;

    fn extract(&self, record: &R) -> Result<(Self::Group, Self::Member), MalformedRecord>;
}

/// Groups email addresses by domain.
///
/// The address must contain exactly one `@` with a non-empty local part and
/// domain. The member is the whole (trimmed) address, so `x@d.com` and
/// `x+tag@d.com` count as two members.
///
/// # Example
///
/// ```
/// use rankkit::ingest::{EmailDomainExtractor, KeyExtractor};
///
/// let extractor = EmailDomainExtractor::new();
/// let (group, member) = extractor.extract("someone@SomeDomain.com").unwrap();
/// assert_eq!(group, "SomeDomain.com");
/// assert_eq!(member, "someone@SomeDomain.com");
///
/// assert!(extractor.extract("not-an-address").is_err());
/// assert!(extractor.extract("a@b@c.com").is_err());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmailDomainExtractor {
    lowercase_domain: bool,
}

impl EmailDomainExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercases the domain before grouping (`A.com` and `a.com` merge).
    pub fn with_lowercase_domain(mut self, lowercase: bool) -> Self {
        self.lowercase_domain = lowercase;
        self
    }

    /// Returns the domain part of `email` as a slice of the input.
    pub fn domain_of(email: &str) -> Result<&str, MalformedRecord> {
        let email = email.trim();
        let mut parts = email.split('@');
        let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(MalformedRecord::InvalidEmail {
                value: email.to_string(),
                reason: "expected exactly one '@'",
            });
        };
        if local.is_empty() {
            return Err(MalformedRecord::InvalidEmail {
                value: email.to_string(),
                reason: "empty local part",
            });
        }
        if domain.is_empty() {
            return Err(MalformedRecord::InvalidEmail {
                value: email.to_string(),
                reason: "empty domain",
            });
        }
        Ok(domain)
    }
}

impl KeyExtractor<str> for EmailDomainExtractor {
    type Group = String;
    type Member = String;

    fn extract(&self, record: &str) -> Result<(String, String), MalformedRecord> {
        let domain = Self::domain_of(record)?;
        let domain = if self.lowercase_domain {
            domain.to_ascii_lowercase()
        } else {
            domain.to_string()
        };
        Ok((domain, record.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_of_basic_case() {
        assert_eq!(
            EmailDomainExtractor::domain_of("someEmailAdress@SomeDomain.com"),
            Ok("SomeDomain.com")
        );
    }

    #[test]
    fn domain_of_trims_whitespace() {
        assert_eq!(EmailDomainExtractor::domain_of("  x@d.com \t"), Ok("d.com"));
    }

    #[test]
    fn rejects_missing_or_repeated_at() {
        for bad in ["", "plain", "a@b@c", "@", "x@", "@d.com"] {
            assert!(
                EmailDomainExtractor::domain_of(bad).is_err(),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn extract_keeps_full_address_as_member() {
        let extractor = EmailDomainExtractor::new();
        let (group, member) = extractor.extract(" test+tag@domain1.com").unwrap();
        assert_eq!(group, "domain1.com");
        assert_eq!(member, "test+tag@domain1.com");
    }

    #[test]
    fn lowercase_domain_only_touches_domain() {
        let extractor = EmailDomainExtractor::new().with_lowercase_domain(true);
        let (group, member) = extractor.extract("Bob@Example.COM").unwrap();
        assert_eq!(group, "example.com");
        assert_eq!(member, "Bob@Example.COM");
    }

    #[test]
    fn error_names_the_reason() {
        let err = EmailDomainExtractor::new().extract("x@").unwrap_err();
        assert!(err.to_string().contains("empty domain"));
    }
}
