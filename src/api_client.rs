use crate::data::application::Application;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Upstream source of the initial application list
pub trait DirectorySource {
    fn fetch_applications(&self) -> Result<Vec<Application>>;

    /// Where the data comes from, for diagnostics
    fn describe(&self) -> String;
}

/// Blocking HTTP client for the remote application directory
#[derive(Clone)]
pub struct DirectoryClient {
    url: String,
    client: reqwest::blocking::Client,
}

impl DirectoryClient {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl DirectorySource for DirectoryClient {
    fn fetch_applications(&self) -> Result<Vec<Application>> {
        debug!(target: "api", "GET {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .with_context(|| format!("Request to {} failed", self.url))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().unwrap_or_default();
            return Err(anyhow!("API Error ({}): {}", status, error_text));
        }

        let body = response.text()?;
        let json: Value = serde_json::from_str(&body)
            .with_context(|| format!("Response from {} is not valid JSON", self.url))?;

        let applications = parse_applications(&json);
        info!(target: "api", "Directory returned {} applications", applications.len());
        Ok(applications)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Directory response read from a local JSON file of the same shape
pub struct JsonFileDirectory {
    path: PathBuf,
}

impl JsonFileDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DirectorySource for JsonFileDirectory {
    fn fetch_applications(&self) -> Result<Vec<Application>> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Cannot read {}", self.path.display()))?;
        let json: Value = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", self.path.display()))?;
        Ok(parse_applications(&json))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fixed in-memory directory response
#[derive(Debug, Clone)]
pub struct StaticDirectory {
    body: Value,
}

impl StaticDirectory {
    pub fn new(body: Value) -> Self {
        Self { body }
    }
}

impl DirectorySource for StaticDirectory {
    fn fetch_applications(&self) -> Result<Vec<Application>> {
        Ok(parse_applications(&self.body))
    }

    fn describe(&self) -> String {
        "static response".to_string()
    }
}

/// Extract the application list from a directory response body.
///
/// Anything other than an `Applications` array yields no records. Array
/// elements that are not objects are skipped.
pub fn parse_applications(body: &Value) -> Vec<Application> {
    let Some(items) = body.get("Applications").and_then(Value::as_array) else {
        warn!(target: "api", "Response has no Applications array, treating as empty");
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(idx, item)| {
            if !item.is_object() {
                warn!(target: "api", "Skipping non-object entry {}: {}", idx, item);
                return None;
            }
            match serde_json::from_value::<Application>(item.clone()) {
                Ok(app) => Some(app),
                Err(e) => {
                    warn!(target: "api", "Skipping unreadable entry {}: {}", idx, e);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_well_formed_body() {
        let body = json!({
            "Applications": [
                {"IdApplication": "AAAAA", "IdType": "1", "Name": "Billing", "Path": "/svc/billing"},
                {"IdApplication": "BBBBB", "IdType": "2", "Name": "Ledger", "Path": "/svc/ledger"}
            ]
        });
        let apps = parse_applications(&body);
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[1].name, "Ledger");
    }

    #[test]
    fn test_parse_missing_or_non_array_is_empty() {
        assert!(parse_applications(&json!({})).is_empty());
        assert!(parse_applications(&json!({"Applications": "nope"})).is_empty());
        assert!(parse_applications(&json!({"Applications": {"Name": "x"}})).is_empty());
        assert!(parse_applications(&json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_json_file_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("apps.json");
        std::fs::write(
            &path,
            r#"{"Applications": [{"IdApplication": "AAAAA", "IdType": "1", "Name": "Billing", "Path": "/b"}]}"#,
        )
        .unwrap();

        let apps = JsonFileDirectory::new(&path).fetch_applications().unwrap();
        assert_eq!(apps.len(), 1);

        std::fs::write(&path, "not json").unwrap();
        assert!(JsonFileDirectory::new(&path).fetch_applications().is_err());
    }

    #[test]
    fn test_parse_skips_non_objects() {
        let body = json!({"Applications": [42, {"Name": "Portal"}, null]});
        let apps = parse_applications(&body);
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].name, "Portal");
        assert!(apps[0].id.is_none());
    }
}
