//! Template error types.

use crate::core::CtrlgenError;

/// Errors raised while rendering an artifact template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// The requested template is not registered.
    UnknownTemplate {
        name: String,
    },

    /// A variable referenced by the template is missing from the context.
    VariableNotFound {
        template: String,
        variable: String,
        /// Closest available variable names.
        suggestions: Vec<String>,
    },

    SyntaxError {
        template: String,
        message: String,
        line: Option<usize>,
    },
}

impl TemplateError {
    /// Name of the template that failed.
    #[must_use]
    pub fn template(&self) -> &str {
        match self {
            Self::UnknownTemplate {
                name,
            } => name,
            Self::VariableNotFound {
                template,
                ..
            }
            | Self::SyntaxError {
                template,
                ..
            } => template,
        }
    }
}

impl std::fmt::Display for TemplateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateError::UnknownTemplate {
                name,
            } => write!(f, "Unknown template '{}'", name),
            TemplateError::VariableNotFound {
                variable,
                suggestions,
                ..
            } => {
                write!(f, "Template variable not found: '{}'", variable)?;
                if !suggestions.is_empty() {
                    write!(f, " (did you mean {}?)", suggestions.join(", "))?;
                }
                Ok(())
            }
            TemplateError::SyntaxError {
                message,
                line,
                ..
            } => match line {
                Some(line) => write!(f, "Template syntax error at line {}: {}", line, message),
                None => write!(f, "Template syntax error: {}", message),
            },
        }
    }
}

impl std::error::Error for TemplateError {}

impl From<TemplateError> for CtrlgenError {
    fn from(error: TemplateError) -> Self {
        CtrlgenError::TemplateRenderFailed {
            template: error.template().to_string(),
            reason: error.to_string(),
        }
    }
}
