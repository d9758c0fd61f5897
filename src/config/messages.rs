use crate::domain::identifiers::{TaskType, TemplateKey};
use crate::utils::error::{PushError, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

const EMBEDDED_MESSAGES: &str = include_str!("../../assets/messages.toml");

static EMBEDDED_CATALOG: OnceCell<Arc<TemplateCatalog>> = OnceCell::new();

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TypeMessages {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub bodies: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub default: TypeMessages,
    #[serde(default)]
    pub types: HashMap<String, TypeMessages>,
}

impl MessagesConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PushError::TemplateParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| PushError::TemplateParseError {
            message: format!("JSON parsing error: {}", e),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        // anything that is not .json is read as TOML
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }
}

/// Validated, immutable set of templates: one per task type plus a default.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    version: Option<String>,
    default: TypeMessages,
    short: TypeMessages,
    near: TypeMessages,
    relaxed: TypeMessages,
    scheduled: TypeMessages,
}

impl TemplateCatalog {
    pub fn from_config(mut config: MessagesConfig) -> Result<Self> {
        let mut take = |task_type: TaskType| -> Result<TypeMessages> {
            let name = task_type.as_str();
            let entry = config
                .types
                .remove(name)
                .ok_or_else(|| PushError::MissingConfigError {
                    field: format!("types.{}", name),
                })?;
            check_entry(&format!("types.{}", name), &entry)?;
            Ok(entry)
        };

        // every known type must be present, a missing one is fatal
        let short = take(TaskType::Short)?;
        let near = take(TaskType::Near)?;
        let relaxed = take(TaskType::Relaxed)?;
        let scheduled = take(TaskType::Scheduled)?;

        check_entry("default", &config.default)?;

        if !config.types.is_empty() {
            let mut extra: Vec<&String> = config.types.keys().collect();
            extra.sort();
            tracing::warn!(
                "Ignoring unknown task types in messages config: {:?}",
                extra
            );
        }

        Ok(Self {
            version: config.version,
            default: config.default,
            short,
            near,
            relaxed,
            scheduled,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_config(MessagesConfig::from_toml_str(content)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_config(MessagesConfig::from_file(path)?)?;
        tracing::info!(
            "📝 Loaded message templates from {} (version {})",
            path.display(),
            catalog.version().unwrap_or("unversioned")
        );
        Ok(catalog)
    }

    /// Built-in catalog, parsed once per process and shared.
    pub fn embedded() -> Result<Arc<Self>> {
        EMBEDDED_CATALOG
            .get_or_try_init(|| {
                tracing::debug!("Loading embedded message templates");
                Self::from_toml_str(EMBEDDED_MESSAGES).map(Arc::new)
            })
            .cloned()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn default_entry(&self) -> &TypeMessages {
        &self.default
    }

    pub fn entry(&self, key: TemplateKey) -> &TypeMessages {
        match key {
            TemplateKey::Known(TaskType::Short) => &self.short,
            TemplateKey::Known(TaskType::Near) => &self.near,
            TemplateKey::Known(TaskType::Relaxed) => &self.relaxed,
            TemplateKey::Known(TaskType::Scheduled) => &self.scheduled,
            TemplateKey::Unknown => &self.default,
        }
    }
}

fn check_entry(field: &str, entry: &TypeMessages) -> Result<()> {
    if entry.title.trim().is_empty() {
        return Err(PushError::InvalidConfigValueError {
            field: format!("{}.title", field),
            value: entry.title.clone(),
            reason: "title cannot be empty".to_string(),
        });
    }
    if entry.bodies.is_empty() {
        return Err(PushError::InvalidConfigValueError {
            field: format!("{}.bodies", field),
            value: "[]".to_string(),
            reason: "at least one body is required".to_string(),
        });
    }
    Ok(())
}
