//! Firestore document paths

use crate::error::{FunctionError, Result};
use serde::{Deserialize, Serialize};

/// Default document path used when none is configured
pub const DEFAULT_DOCUMENT_PATH: &str = "musicians/{musicians}";

/// A parameterized Firestore document path such as `users/{userId}`
///
/// Segments alternate collection / document, so a valid path has an even
/// number of non-empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentPath(String);

impl DocumentPath {
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim().trim_matches('/');
        let invalid = |reason: &str| FunctionError::InvalidDocumentPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("path is empty"));
        }

        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.trim().is_empty()) {
            return Err(invalid("path contains an empty segment"));
        }
        if segments.len() % 2 != 0 {
            return Err(invalid(
                "path must point at documents (collection/{id} pairs), not a collection",
            ));
        }
        for segment in &segments {
            if segment.starts_with('{') != segment.ends_with('}') {
                return Err(invalid("unbalanced wildcard braces"));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Full trigger resource for a project
    pub fn trigger_resource(&self, project_id: &str) -> String {
        format!(
            "projects/{}/databases/(default)/documents/{}",
            project_id, self.0
        )
    }
}

impl Default for DocumentPath {
    fn default() -> Self {
        Self(DEFAULT_DOCUMENT_PATH.to_string())
    }
}

impl TryFrom<String> for DocumentPath {
    type Error = FunctionError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DocumentPath> for String {
    fn from(path: DocumentPath) -> Self {
        path.0
    }
}

impl std::fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        assert_eq!(
            DocumentPath::parse("users/{userId}").unwrap().as_str(),
            "users/{userId}"
        );
        assert_eq!(
            DocumentPath::parse("/bands/{band}/members/{member}/")
                .unwrap()
                .as_str(),
            "bands/{band}/members/{member}"
        );
        assert_eq!(DocumentPath::default().as_str(), DEFAULT_DOCUMENT_PATH);
    }

    #[test]
    fn test_invalid_paths() {
        assert!(DocumentPath::parse("").is_err());
        assert!(DocumentPath::parse("users").is_err());
        assert!(DocumentPath::parse("users//x").is_err());
        assert!(DocumentPath::parse("users/{userId").is_err());
    }

    #[test]
    fn test_trigger_resource() {
        let path = DocumentPath::parse("musicians/{musicians}").unwrap();
        assert_eq!(
            path.trigger_resource("demo-project"),
            "projects/demo-project/databases/(default)/documents/musicians/{musicians}"
        );
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: DocumentPath = serde_json::from_str("\"a/{b}\"").unwrap();
        assert_eq!(ok.as_str(), "a/{b}");
        assert!(serde_json::from_str::<DocumentPath>("\"a\"").is_err());
    }
}
