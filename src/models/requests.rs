//! Request DTOs for the viewer API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::config::Config;
use crate::window::PageRequest;

/// Longest document identity accepted over HTTP
const MAX_IDENTITY_LEN: usize = 4096;

fn validate_identity(identity: &str) -> Option<String> {
    if identity.is_empty() {
        return Some("Identity cannot be empty".to_string());
    }
    if identity.len() > MAX_IDENTITY_LEN {
        return Some(format!(
            "Identity exceeds maximum length of {} characters",
            MAX_IDENTITY_LEN
        ));
    }
    None
}

/// Request body naming a single document (open, invalidate, close)
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentRequest {
    /// Path or URI of the document
    pub identity: String,
}

impl DocumentRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_identity(&self.identity)
    }
}

/// Request body for POST /documents/page
///
/// `rows_per_page` and `max_columns` fall back to the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    pub identity: String,
    pub sheet_name: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub rows_per_page: Option<u32>,
    #[serde(default)]
    pub max_columns: Option<u32>,
}

impl PageQuery {
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_identity(&self.identity) {
            return Some(msg);
        }
        if self.sheet_name.is_empty() {
            return Some("Sheet name cannot be empty".to_string());
        }
        if self.rows_per_page == Some(0) || self.max_columns == Some(0) {
            return Some("Page sizes must be at least 1".to_string());
        }
        None
    }

    /// Builds the engine request, filling unset sizes from `config`.
    pub fn to_page_request(&self, config: &Config) -> PageRequest {
        PageRequest::new(
            self.sheet_name.clone(),
            self.page,
            self.rows_per_page.unwrap_or(config.rows_per_page),
            self.max_columns.unwrap_or(config.max_columns),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let json = r#"{"identity": "/tmp/a.csv", "sheet_name": "Sheet1"}"#;
        let query: PageQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.page, 0);
        assert!(query.validate().is_none());

        let config = Config::default();
        let request = query.to_page_request(&config);
        assert_eq!(request.rows_per_page, config.rows_per_page);
        assert_eq!(request.max_columns, config.max_columns);
    }

    #[test]
    fn test_page_query_overrides() {
        let json = r#"{"identity": "a.csv", "sheet_name": "S", "page": 4, "rows_per_page": 50, "max_columns": 5}"#;
        let query: PageQuery = serde_json::from_str(json).unwrap();
        let request = query.to_page_request(&Config::default());
        assert_eq!(request, PageRequest::new("S", 4, 50, 5));
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        let empty = DocumentRequest {
            identity: String::new(),
        };
        assert!(empty.validate().is_some());

        let long = DocumentRequest {
            identity: "x".repeat(MAX_IDENTITY_LEN + 1),
        };
        assert!(long.validate().is_some());

        let json = r#"{"identity": "a.csv", "sheet_name": "S", "rows_per_page": 0}"#;
        let query: PageQuery = serde_json::from_str(json).unwrap();
        assert!(query.validate().is_some());

        let json = r#"{"identity": "a.csv", "sheet_name": ""}"#;
        let query: PageQuery = serde_json::from_str(json).unwrap();
        assert!(query.validate().is_some());
    }
}
