//! Error types for template validation and parameter extraction

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in an identifier string
pub type Span = std::ops::Range<usize>;

/// The input string an error location points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// The declared `docs://` template
    Template,
    /// The concrete identifier being matched
    Candidate,
}

impl Subject {
    fn name(self) -> &'static str {
        match self {
            Subject::Template => "template",
            Subject::Candidate => "candidate",
        }
    }
}

/// Errors raised while validating templates or extracting parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResourceError {
    /// Malformed template or candidate identifier
    #[error("URI validation failed: {message}")]
    UriValidation {
        message: String,
        location: Option<(Subject, Span)>,
    },

    /// Declared and extracted parameters disagree, or a value has the wrong type
    #[error("parameter extraction failed: {message}")]
    ParameterExtraction {
        message: String,
        parameters: Vec<String>,
    },
}

impl ResourceError {
    /// Create a URI validation error without a location
    pub fn uri_validation(message: impl Into<String>) -> Self {
        Self::UriValidation {
            message: message.into(),
            location: None,
        }
    }

    /// Create a parameter extraction error naming the parameters involved
    pub fn parameter_extraction(message: impl Into<String>, parameters: Vec<String>) -> Self {
        Self::ParameterExtraction {
            message: message.into(),
            parameters,
        }
    }

    /// Attach a location to a URI validation error
    ///
    /// Parameter extraction errors carry no location and are returned unchanged.
    pub fn at(self, subject: Subject, span: Span) -> Self {
        match self {
            Self::UriValidation { message, .. } => Self::UriValidation {
                message,
                location: Some((subject, span)),
            },
            other => other,
        }
    }

    /// The bare message without the error-kind prefix
    pub fn message(&self) -> &str {
        match self {
            Self::UriValidation { message, .. } => message,
            Self::ParameterExtraction { message, .. } => message,
        }
    }

    /// Get the source location if available
    pub fn location(&self) -> Option<(Subject, &Span)> {
        match self {
            Self::UriValidation {
                location: Some((subject, span)),
                ..
            } => Some((*subject, span)),
            _ => None,
        }
    }

    /// Parameter names involved in an extraction error
    pub fn parameters(&self) -> &[String] {
        match self {
            Self::ParameterExtraction { parameters, .. } => parameters,
            Self::UriValidation { .. } => &[],
        }
    }

    pub fn is_uri_validation(&self) -> bool {
        matches!(self, Self::UriValidation { .. })
    }

    pub fn is_parameter_extraction(&self) -> bool {
        matches!(self, Self::ParameterExtraction { .. })
    }

    /// Format the error with source context using ariadne
    ///
    /// `template` and `candidate` are the strings the operation was given; the
    /// report labels whichever one the error location points into.
    pub fn format(&self, template: &str, candidate: &str) -> String {
        let Some((subject, span)) = self.location() else {
            return format!("Error: {}\n", self);
        };

        let filename = subject.name();
        let source = match subject {
            Subject::Template => template,
            Subject::Candidate => candidate,
        };
        // ariadne counts characters, spans are bytes
        let span = char_offset(source, span.start)..char_offset(source, span.end);

        let mut buf = Vec::new();
        let written = Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(self.message())
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(source)), &mut buf);

        match written {
            Ok(()) => String::from_utf8_lossy(&buf).into_owned(),
            Err(_) => format!("Error: {}\n", self),
        }
    }
}

fn char_offset(source: &str, byte: usize) -> usize {
    source
        .char_indices()
        .take_while(|(i, _)| *i < byte)
        .count()
}
