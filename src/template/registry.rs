//! Template registry for storing and retrieving named templates
//!
//! Registries are usually loaded from a TOML file:
//!
//! ```toml
//! [templates.guide]
//! uri = "docs://guides/{section}/{page}"
//! description = "Guide pages"
//!
//! [templates.guide.parameters]
//! section = "string"
//! page = "integer"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::params::ParameterType;
use super::resource::ResourceTemplate;
use crate::error::ResourceError;

/// Errors that can occur when loading or querying a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read template registry: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse template registry TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// Duplicate template definition
    #[error("duplicate template definition: {name}")]
    Duplicate { name: String },

    /// Template not found in registry
    #[error("template not found: {name}")]
    NotFound { name: String },

    /// A declared template failed validation
    #[error("invalid template '{name}': {source}")]
    Template {
        name: String,
        #[source]
        source: ResourceError,
    },
}

/// A stored template with its registry metadata
#[derive(Debug, Clone)]
pub struct TemplateDefinition {
    pub name: String,
    pub description: Option<String>,
    pub template: ResourceTemplate,
}

/// TOML structure for deserializing registries
#[derive(Deserialize)]
struct TomlRegistry {
    #[serde(default)]
    templates: BTreeMap<String, TomlTemplate>,
}

#[derive(Deserialize)]
struct TomlTemplate {
    uri: String,
    description: Option<String>,
    #[serde(default)]
    parameters: BTreeMap<String, ParameterType>,
}

/// Named templates, looked up by name only
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a registry from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let registry = Self::from_str(&content)?;
        debug!(path = %path.display(), templates = registry.len(), "loaded template registry");
        Ok(registry)
    }

    /// Load a registry from a TOML string
    pub fn from_str(content: &str) -> Result<Self, RegistryError> {
        let parsed: TomlRegistry = toml::from_str(content)?;

        let mut registry = Self::new();
        for (name, decl) in parsed.templates {
            let template = ResourceTemplate::new(decl.uri, decl.parameters).map_err(|source| {
                RegistryError::Template {
                    name: name.clone(),
                    source,
                }
            })?;
            registry.register_definition(TemplateDefinition {
                name,
                description: decl.description,
                template,
            })?;
        }
        Ok(registry)
    }

    /// Register a template under `name`
    pub fn register(
        &mut self,
        name: impl Into<String>,
        template: ResourceTemplate,
    ) -> Result<(), RegistryError> {
        self.register_definition(TemplateDefinition {
            name: name.into(),
            description: None,
            template,
        })
    }

    /// Register a template definition directly
    pub fn register_definition(&mut self, def: TemplateDefinition) -> Result<(), RegistryError> {
        if self.templates.contains_key(&def.name) {
            return Err(RegistryError::Duplicate {
                name: def.name.clone(),
            });
        }
        debug!(name = %def.name, uri_template = %def.template, "registered template");
        self.templates.insert(def.name.clone(), def);
        Ok(())
    }

    /// Get a template definition by name
    pub fn get(&self, name: &str) -> Option<&TemplateDefinition> {
        self.templates.get(name)
    }

    /// Get a template by name, failing if it is not registered
    pub fn template(&self, name: &str) -> Result<&ResourceTemplate, RegistryError> {
        self.get(name)
            .map(|def| &def.template)
            .ok_or_else(|| RegistryError::NotFound {
                name: name.to_string(),
            })
    }

    /// Check if a template exists
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    /// All definitions in name order
    pub fn definitions(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[templates.guide]
uri = "docs://guides/{section}/{page}"
description = "Guide pages"

[templates.guide.parameters]
section = "string"
page = "integer"

[templates.home]
uri = "docs://home"
"#;

    #[test]
    fn test_new_registry_is_empty() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_parse_toml() {
        let registry = TemplateRegistry::from_str(SAMPLE).expect("Should parse");
        assert_eq!(registry.names(), vec!["guide", "home"]);

        let guide = registry.get("guide").unwrap();
        assert_eq!(guide.description.as_deref(), Some("Guide pages"));
        assert_eq!(guide.template.uri_template(), "docs://guides/{section}/{page}");
        assert_eq!(
            guide.template.parameter_types().get("page"),
            Some(&ParameterType::Integer)
        );
    }

    #[test]
    fn test_parameters_table_is_optional() {
        let registry = TemplateRegistry::from_str(SAMPLE).unwrap();
        let home = registry.template("home").unwrap();
        assert!(home.parameter_types().is_empty());
    }

    #[test]
    fn test_empty_document() {
        let registry = TemplateRegistry::from_str("").unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_invalid_template_reports_name() {
        let toml_str = r#"
[templates.broken]
uri = "http://nope"
"#;
        let err = TemplateRegistry::from_str(toml_str).unwrap_err();
        match err {
            RegistryError::Template { name, source } => {
                assert_eq!(name, "broken");
                assert!(source.is_uri_validation());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_parameter_type() {
        let toml_str = r#"
[templates.t]
uri = "docs://t/{when}"

[templates.t.parameters]
when = "date"
"#;
        let err = TemplateRegistry::from_str(toml_str).unwrap_err();
        assert!(matches!(err, RegistryError::Toml(_)));
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn test_invalid_toml_error() {
        let result = TemplateRegistry::from_str("this is not valid toml {{{{");
        assert!(matches!(result, Err(RegistryError::Toml(_))));
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = TemplateRegistry::new();
        let template = ResourceTemplate::from_uri("docs://a").unwrap();
        registry.register("a", template.clone()).unwrap();
        let err = registry.register("a", template).unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate { name } if name == "a"));
    }

    #[test]
    fn test_template_not_found() {
        let registry = TemplateRegistry::new();
        let err = registry.template("missing").unwrap_err();
        assert_eq!(err.to_string(), "template not found: missing");
        assert!(!registry.contains("missing"));
    }

    #[test]
    fn test_registered_template_extracts() {
        let registry = TemplateRegistry::from_str(SAMPLE).unwrap();
        let params = registry
            .template("guide")
            .unwrap()
            .extract_parameters("docs://guides/install/2")
            .unwrap();
        assert_eq!(params["section"], "install");
        assert_eq!(params["page"], "2");
    }
}
