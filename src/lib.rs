//! docs-uri - Template matching for `docs://` resource identifiers
//!
//! This library validates identifier templates, matches candidate identifiers
//! against them, and extracts and type-checks the named path parameters.
//!
//! # Example
//!
//! ```rust
//! use docs_uri::{ParameterType, ParameterValue, ResourceTemplate};
//!
//! let template = ResourceTemplate::new(
//!     "docs://guides/{section}/{page}",
//!     [("section", ParameterType::String), ("page", ParameterType::Integer)],
//! )
//! .unwrap();
//!
//! let raw = template.extract_parameters("docs://guides/install/3").unwrap();
//! assert_eq!(raw["page"], "3");
//!
//! let typed = template.resolve("docs://guides/install/3").unwrap();
//! assert_eq!(typed["page"], ParameterValue::Integer(3));
//! ```

pub mod error;
pub mod parser;
pub mod template;

pub use error::{ResourceError, Span, Subject};
pub use parser::{Segment, Spanned};
pub use template::{
    ParameterType, ParameterValue, RegistryError, ResourceState, ResourceTemplate,
    TemplateDefinition, TemplateRegistry, UnknownParameterType, UriComponents, PROTOCOL,
    PROTOCOL_PREFIX,
};

use std::collections::BTreeMap;

/// Match `candidate` against `template` and return the raw placeholder values
///
/// Every placeholder in the template is accepted as a string parameter, so
/// only the identifier shape is checked.
///
/// # Example
///
/// ```rust
/// use docs_uri::extract;
///
/// let params = extract("docs://api/{module}/{item}", "docs://api/io/Read").unwrap();
/// assert_eq!(params["module"], "io");
/// assert_eq!(params["item"], "Read");
/// ```
pub fn extract(template: &str, candidate: &str) -> Result<BTreeMap<String, String>, ResourceError> {
    Ok(ResourceTemplate::from_uri(template)?
        .parse_uri(candidate)?
        .parameters)
}
