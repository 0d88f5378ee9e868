//! HTTP cache control module
//!
//! Provides weak `ETag` generation, conditional request matching and the
//! `Cache-Control` policy derived from the serve options.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::config::ServeOptions;

/// Milliseconds since the Unix epoch, zero for pre-epoch timestamps
pub fn epoch_millis(time: SystemTime) -> u128 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Generate a weak `ETag` from file size and modification time
///
/// # Returns
/// `W/"{size-hex}-{mtime-hex}"`, mtime in milliseconds
pub fn generate_etag(size: u64, modified: SystemTime) -> String {
    format!("W/\"{size:x}-{:x}\"", epoch_millis(modified))
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports:
/// - Single `ETag`: `W/"abc-123"`
/// - Multiple `ETags`: `"x", W/"abc-123"`
/// - Wildcard: `*`
///
/// # Returns
/// Returns true if matched (should return 304), false otherwise
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .any(|e| e.trim() == etag || e.trim() == "*")
    })
}

/// Cache control policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Public cache with specified max-age (seconds)
    Public { max_age: u64, immutable: bool },
    /// Revalidate on every use (dev mode with `ETag`s)
    NoCache,
    /// Never store (dev mode without `ETag`s)
    NoStore,
}

impl CachePolicy {
    /// Derive the policy from serve options; `None` means no header
    ///
    /// `immutable` alone never produces a header.
    pub const fn from_options(options: &ServeOptions) -> Option<Self> {
        if options.dev {
            return Some(if options.etag { Self::NoCache } else { Self::NoStore });
        }
        match options.max_age {
            Some(max_age) => Some(Self::Public {
                max_age,
                immutable: options.immutable,
            }),
            None => None,
        }
    }

    /// Convert to Cache-Control header value
    pub fn to_header_value(self) -> String {
        match self {
            Self::Public {
                max_age,
                immutable: false,
            } => format!("public,max-age={max_age}"),
            Self::Public {
                max_age,
                immutable: true,
            } => format!("public,max-age={max_age},immutable"),
            Self::NoCache => "no-cache".to_string(),
            Self::NoStore => "no-store".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_generate_etag() {
        let modified = UNIX_EPOCH + Duration::from_millis(0x1234);
        assert_eq!(generate_etag(255, modified), "W/\"ff-1234\"");
    }

    #[test]
    fn test_etag_changes_with_mtime() {
        let a = generate_etag(10, UNIX_EPOCH + Duration::from_secs(1));
        let b = generate_etag(10, UNIX_EPOCH + Duration::from_secs(2));
        assert_ne!(a, b);
    }

    #[test]
    fn test_check_etag_match() {
        let etag = "W/\"ff-1234\"";
        assert!(check_etag_match(Some("W/\"ff-1234\""), etag));
        assert!(check_etag_match(Some("\"xyz\", W/\"ff-1234\""), etag));
        assert!(check_etag_match(Some("*"), etag));
        assert!(!check_etag_match(Some("\"ff-1234\""), etag));
        assert!(!check_etag_match(None, etag));
    }

    #[test]
    fn test_cache_policy_from_options() {
        let mut opts = ServeOptions::default();
        assert_eq!(CachePolicy::from_options(&opts), None);

        opts.immutable = true;
        assert_eq!(CachePolicy::from_options(&opts), None);

        opts.max_age = Some(0);
        opts.immutable = false;
        assert_eq!(
            CachePolicy::from_options(&opts).map(CachePolicy::to_header_value),
            Some("public,max-age=0".to_string())
        );

        opts.max_age = Some(31_536_000);
        opts.immutable = true;
        assert_eq!(
            CachePolicy::from_options(&opts).map(CachePolicy::to_header_value),
            Some("public,max-age=31536000,immutable".to_string())
        );
    }

    #[test]
    fn test_cache_policy_dev() {
        let mut opts = ServeOptions {
            dev: true,
            max_age: Some(60),
            ..ServeOptions::default()
        };
        assert_eq!(CachePolicy::from_options(&opts), Some(CachePolicy::NoStore));
        opts.etag = true;
        assert_eq!(CachePolicy::NoCache.to_header_value(), "no-cache");
        assert_eq!(CachePolicy::from_options(&opts), Some(CachePolicy::NoCache));
    }
}
