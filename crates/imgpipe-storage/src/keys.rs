//! Object key conventions and public URL derivation.

use crate::error::{StorageError, StorageResult};

/// Prefix marking an object as a pipeline result.
pub const RESULT_KEY_PREFIX: &str = "processed_";

/// Derive the source object key from an uploaded filename.
///
/// Strips any path components so a crafted filename cannot address
/// objects outside the flat upload namespace.
pub fn source_key(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
        .to_string()
}

/// Derive the result key for a source key.
///
/// Deterministic: re-running the same job lands on the same key, which is
/// what makes at-least-once redelivery safe.
pub fn result_key(source_key: &str) -> String {
    format!("{RESULT_KEY_PREFIX}{source_key}")
}

/// Public delivery URLs over the bucket's public domain.
///
/// Result objects are served from a fixed public base address; the URL is
/// a pure string template over the object key.
#[derive(Debug, Clone)]
pub struct PublicUrls {
    base_url: String,
}

impl PublicUrls {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let base_url = std::env::var("R2_PUBLIC_BASE_URL")
            .map_err(|_| StorageError::config_error("R2_PUBLIC_BASE_URL not set"))?;
        Ok(Self::new(base_url))
    }

    /// Public URL for an object key.
    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_key_strips_path_components() {
        assert_eq!(source_key("cat.jpg"), "cat.jpg");
        assert_eq!(source_key("uploads/cat.jpg"), "cat.jpg");
        assert_eq!(source_key("..\\..\\cat.jpg"), "cat.jpg");
    }

    #[test]
    fn test_result_key_is_deterministic() {
        assert_eq!(result_key("a.jpg"), "processed_a.jpg");
        assert_eq!(result_key("a.jpg"), result_key("a.jpg"));
    }

    #[test]
    fn test_public_url_template() {
        let urls = PublicUrls::new("https://pub.example.dev/");
        assert_eq!(
            urls.url_for("processed_a.jpg"),
            "https://pub.example.dev/processed_a.jpg"
        );
    }
}
