//! Resource templates
//!
//! A template is a `docs://` identifier pattern whose `{name}` segments stand for
//! parameters. Candidates are matched positionally, and the extracted values can
//! be checked against the declared parameter types.
//!
//! # Example
//!
//! ```text
//! template:  docs://guides/{section}/{page}
//! candidate: docs://guides/install/3
//! extracted: section = "install", page = "3"
//! ```

mod params;
mod registry;
mod resource;

pub use params::{ParameterType, ParameterValue, UnknownParameterType};
pub use registry::{RegistryError, TemplateDefinition, TemplateRegistry};
pub use resource::{
    ResourceState, ResourceTemplate, UriComponents, PROTOCOL, PROTOCOL_PREFIX,
};
