use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Opaque identifier of an application record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ApplicationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ApplicationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Kind of deployment an application describes, keyed by its type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentType {
    Web,
    DistributedService,
}

impl DeploymentType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "1" => Some(DeploymentType::Web),
            "2" => Some(DeploymentType::DistributedService),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            DeploymentType::Web => "1",
            DeploymentType::DistributedService => "2",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeploymentType::Web => "WEB",
            DeploymentType::DistributedService => "Servicio Distribuido",
        }
    }
}

/// Display label for a raw type code; unknown codes render as empty
pub fn type_label(code: &str) -> &'static str {
    DeploymentType::from_code(code)
        .map(|t| t.label())
        .unwrap_or("")
}

/// A deployment record as held by the registry and exchanged with the directory service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    #[serde(
        rename = "IdApplication",
        default,
        deserialize_with = "lenient_identifier"
    )]
    pub id: Option<ApplicationId>,
    #[serde(rename = "IdType", default, deserialize_with = "lenient_string")]
    pub type_code: String,
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(rename = "Path", default, deserialize_with = "lenient_string")]
    pub path: String,
}

impl Application {
    pub fn new(type_code: &str, name: &str, path: &str) -> Self {
        Self {
            id: None,
            type_code: type_code.to_string(),
            name: name.to_string(),
            path: path.to_string(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ApplicationId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn deployment_type(&self) -> Option<DeploymentType> {
        DeploymentType::from_code(&self.type_code)
    }

    pub fn type_label(&self) -> &'static str {
        type_label(&self.type_code)
    }

    pub fn has_id(&self, id: &ApplicationId) -> bool {
        self.id.as_ref() == Some(id)
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

fn lenient_identifier<'de, D>(deserializer: D) -> Result<Option<ApplicationId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let id = value_to_string(&value);
    if id.trim().is_empty() {
        Ok(None)
    } else {
        Ok(Some(ApplicationId(id)))
    }
}
