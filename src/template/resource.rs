//! Resource templates and the matching of candidate identifiers against them

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use tracing::{debug, trace};

use super::params::{ParameterType, ParameterValue};
use crate::error::{ResourceError, Subject};
use crate::parser::{self, is_valid_parameter_name, lexer, Segment, Spanned};

/// Scheme name reported in parsed components
pub const PROTOCOL: &str = "docs";

/// Prefix every template and candidate must start with
pub const PROTOCOL_PREFIX: &str = "docs://";

/// Lifecycle state of a template
///
/// Templates are always created in `Created`; the other states belong to
/// whatever lifecycle manager owns the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResourceState {
    #[default]
    Created,
    Active,
    Invalid,
    Cleanup,
}

impl fmt::Display for ResourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResourceState::Created => "created",
            ResourceState::Active => "active",
            ResourceState::Invalid => "invalid",
            ResourceState::Cleanup => "cleanup",
        })
    }
}

/// A candidate identifier split into its parts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriComponents {
    /// Always `"docs"`
    pub protocol: String,
    /// Everything after `docs://`, unmodified
    pub path: String,
    /// Raw placeholder values keyed by parameter name
    pub parameters: BTreeMap<String, String>,
}

/// A `docs://` identifier pattern with declared parameter types
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceTemplate {
    uri_template: String,
    state: ResourceState,
    parameter_types: BTreeMap<String, ParameterType>,
    segments: Vec<Spanned<Segment>>,
}

impl ResourceTemplate {
    /// Create a template with declared parameter types
    ///
    /// Fails unless `uri_template` starts with `docs://` and has a non-empty
    /// path after it. Placeholder names are checked when a candidate is parsed.
    pub fn new<I, K>(
        uri_template: impl Into<String>,
        parameter_types: I,
    ) -> Result<Self, ResourceError>
    where
        I: IntoIterator<Item = (K, ParameterType)>,
        K: Into<String>,
    {
        let uri_template = uri_template.into();

        let Some(path) = uri_template.strip_prefix(PROTOCOL_PREFIX) else {
            let end = uri_template.len().min(PROTOCOL_PREFIX.len());
            return Err(
                ResourceError::uri_validation("URI must start with docs:// protocol")
                    .at(Subject::Template, 0..end),
            );
        };
        if path.is_empty() {
            return Err(ResourceError::uri_validation("URI must have a non-empty path")
                .at(Subject::Template, 0..uri_template.len()));
        }

        let segments = parser::parse_path(path, PROTOCOL_PREFIX.len());
        let parameter_types: BTreeMap<String, ParameterType> = parameter_types
            .into_iter()
            .map(|(name, ty)| (name.into(), ty))
            .collect();

        debug!(
            uri_template = %uri_template,
            segments = segments.len(),
            declared = parameter_types.len(),
            "created resource template"
        );

        Ok(Self {
            uri_template,
            state: ResourceState::Created,
            parameter_types,
            segments,
        })
    }

    /// Create a template that declares no parameter types
    pub fn from_uri(uri_template: impl Into<String>) -> Result<Self, ResourceError> {
        Self::new(uri_template, std::iter::empty::<(String, ParameterType)>())
    }

    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    pub fn state(&self) -> ResourceState {
        self.state
    }

    pub fn parameter_types(&self) -> &BTreeMap<String, ParameterType> {
        &self.parameter_types
    }

    /// The template path after `docs://`
    pub fn path(&self) -> &str {
        &self.uri_template[PROTOCOL_PREFIX.len()..]
    }

    /// Non-empty template segments in order, with spans into the template string
    pub fn segments(&self) -> &[Spanned<Segment>] {
        &self.segments
    }

    /// Names of all placeholder segments in order
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|s| s.node.placeholder_name())
            .collect()
    }

    /// Parse `uri` against this template
    ///
    /// Segment counts must agree and every placeholder name must be
    /// alphanumeric. Literal segments are not compared with the candidate.
    pub fn parse_uri(&self, uri: &str) -> Result<UriComponents, ResourceError> {
        let Some(path) = uri.strip_prefix(PROTOCOL_PREFIX) else {
            let end = uri.len().min(PROTOCOL_PREFIX.len());
            return Err(ResourceError::uri_validation("Invalid protocol")
                .at(Subject::Candidate, 0..end));
        };

        let candidate_segments = lexer::segments(path, PROTOCOL_PREFIX.len());
        if candidate_segments.len() != self.segments.len() {
            return Err(ResourceError::uri_validation(format!(
                "URI segments do not match template. Expected {} segments, got {}",
                self.segments.len(),
                candidate_segments.len()
            ))
            .at(Subject::Candidate, PROTOCOL_PREFIX.len()..uri.len()));
        }

        let mut parameters = BTreeMap::new();
        for (template_segment, (value, _)) in self.segments.iter().zip(candidate_segments) {
            let Segment::Placeholder(name) = &template_segment.node else {
                continue;
            };
            if !is_valid_parameter_name(name) {
                return Err(
                    ResourceError::uri_validation(format!("Invalid parameter name: {}", name))
                        .at(Subject::Template, template_segment.span.clone()),
                );
            }
            trace!(parameter = %name, value = %value, "matched placeholder");
            parameters.insert(name.clone(), value);
        }

        debug!(uri = %uri, parameters = parameters.len(), "parsed uri");

        Ok(UriComponents {
            protocol: PROTOCOL.to_string(),
            path: path.to_string(),
            parameters,
        })
    }

    /// Extract raw parameter values from `uri`
    ///
    /// The placeholders found must be exactly the declared parameters.
    pub fn extract_parameters(&self, uri: &str) -> Result<BTreeMap<String, String>, ResourceError> {
        let parameters = self.parse_uri(uri)?.parameters;
        self.check_declared(&parameters)?;
        Ok(parameters)
    }

    fn check_declared(&self, parameters: &BTreeMap<String, String>) -> Result<(), ResourceError> {
        let declared: BTreeSet<&str> = self.parameter_types.keys().map(String::as_str).collect();
        let found: BTreeSet<&str> = parameters.keys().map(String::as_str).collect();
        if declared == found {
            return Ok(());
        }

        let missing: Vec<&str> = declared.difference(&found).copied().collect();
        let extra: Vec<&str> = found.difference(&declared).copied().collect();

        let mut clauses = Vec::new();
        if !missing.is_empty() {
            clauses.push(format!("missing parameters: {}", missing.join(", ")));
        }
        if !extra.is_empty() {
            clauses.push(format!("extra parameters: {}", extra.join(", ")));
        }

        let names = missing.iter().chain(&extra).map(|s| s.to_string()).collect();
        Err(ResourceError::parameter_extraction(clauses.join("; "), names))
    }

    /// Check values against their declared types
    ///
    /// Names without a declared type are accepted as-is.
    pub fn validate_parameters<'a, I, K>(&self, parameters: I) -> Result<(), ResourceError>
    where
        I: IntoIterator<Item = (K, &'a ParameterValue)>,
        K: AsRef<str>,
    {
        for (name, value) in parameters {
            let name = name.as_ref();
            let Some(expected) = self.parameter_types.get(name) else {
                continue;
            };
            let actual = value.parameter_type();
            if actual != *expected {
                return Err(ResourceError::parameter_extraction(
                    format!(
                        "parameter '{}' must be of type {} (got {})",
                        name, expected, actual
                    ),
                    vec![name.to_string()],
                ));
            }
        }
        Ok(())
    }

    /// Extract parameters from `uri` and convert them to their declared types
    pub fn resolve(&self, uri: &str) -> Result<BTreeMap<String, ParameterValue>, ResourceError> {
        let raw = self.extract_parameters(uri)?;

        let mut typed = BTreeMap::new();
        for (name, value) in raw {
            let coerced = match self.parameter_types.get(&name) {
                Some(ty) => ty.coerce(&name, &value)?,
                None => ParameterValue::String(value),
            };
            typed.insert(name, coerced);
        }

        self.validate_parameters(&typed)?;
        Ok(typed)
    }
}

impl fmt::Display for ResourceTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri_template)
    }
}
