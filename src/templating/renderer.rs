//! Template rendering engine with Tera.
//!
//! All artifact templates are compiled once into a single [`Tera`] instance
//! when the renderer is created. Rendering never touches the filesystem.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use strsim::levenshtein;
use tera::{Context as TeraContext, Tera};

use super::error::TemplateError;
use super::{DEEP_COPY, TEMPLATES};
use crate::assembler::ControllerConfig;
use crate::resolver::ResourceDescriptor;

/// Maximum allowed Levenshtein distance as a percentage of target length for suggestions.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// How deep context objects are walked when listing variable names.
const MAX_VARIABLE_DEPTH: usize = 3;

static VARIABLE_NOT_FOUND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Variable `([^`]+)` not found").expect("variable pattern is a valid regex")
});

static LINE_COLUMN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+):(\d+)").expect("line pattern is a valid regex"));

/// Renders the artifact templates from a [`ControllerConfig`].
///
/// Contexts:
/// - `gomod`, `main`, `controller`, `custom`: the config under `controller`
/// - `deepcopy`: the descriptor under `resource` and its Go package name
///   under `package_name`
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Compile the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::SyntaxError`] if a template fails to parse.
    pub fn new() -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        for (name, source) in TEMPLATES {
            tera.add_raw_template(name, source).map_err(|e| TemplateError::SyntaxError {
                template: name.to_string(),
                message: Self::format_tera_error(&e),
                line: Self::extract_line_from_tera_error(&e),
            })?;
        }
        tracing::debug!("compiled {} templates", TEMPLATES.len());
        Ok(Self {
            tera,
        })
    }

    /// Render one of the controller-level templates.
    ///
    /// # Errors
    ///
    /// Fails for an unknown template name or when rendering fails.
    pub fn render(&self, name: &str, config: &ControllerConfig) -> Result<String, TemplateError> {
        let mut context = TeraContext::new();
        context.insert("controller", config);
        self.render_with(name, &context)
    }

    /// Render the deep-copy template for one resource.
    ///
    /// # Errors
    ///
    /// Fails when rendering fails.
    pub fn render_deep_copy(&self, resource: &ResourceDescriptor) -> Result<String, TemplateError> {
        let mut context = TeraContext::new();
        context.insert("resource", resource);
        context.insert("package_name", resource.go_package_name());
        self.render_with(DEEP_COPY, &context)
    }

    fn render_with(&self, name: &str, context: &TeraContext) -> Result<String, TemplateError> {
        if !self.tera.get_template_names().any(|registered| registered == name) {
            return Err(TemplateError::UnknownTemplate {
                name: name.to_string(),
            });
        }
        tracing::debug!(template = name, "rendering template");
        self.tera.render(name, context).map_err(|e| Self::parse_tera_error(name, &e, context))
    }

    /// Parse a Tera error into a structured [`TemplateError`].
    fn parse_tera_error(name: &str, error: &tera::Error, context: &TeraContext) -> TemplateError {
        if let Some(variable) = Self::extract_variable_name(error) {
            let available = Self::extract_available_variables(context);
            let suggestions = Self::find_similar_variables(&variable, &available);
            return TemplateError::VariableNotFound {
                template: name.to_string(),
                variable,
                suggestions,
            };
        }

        TemplateError::SyntaxError {
            template: name.to_string(),
            message: Self::format_tera_error(error),
            line: Self::extract_line_from_tera_error(error),
        }
    }

    /// Find a "Variable `foo` not found" message anywhere in the error chain.
    fn extract_variable_name(error: &tera::Error) -> Option<String> {
        use std::error::Error;

        let mut current: Option<&dyn Error> = Some(error);
        while let Some(err) = current {
            if let Some(caps) = VARIABLE_NOT_FOUND.captures(&err.to_string()) {
                return caps.get(1).map(|m| m.as_str().to_string());
            }
            current = err.source();
        }
        None
    }

    /// Dotted paths of every object key in the context, e.g. `controller.name`.
    fn extract_available_variables(context: &TeraContext) -> Vec<String> {
        fn walk(prefix: &str, value: &Value, depth: usize, out: &mut Vec<String>) {
            if let Value::Object(map) = value {
                for (key, child) in map {
                    let path =
                        if prefix.is_empty() { key.clone() } else { format!("{prefix}.{key}") };
                    if depth < MAX_VARIABLE_DEPTH {
                        walk(&path, child, depth + 1, out);
                    }
                    out.push(path);
                }
            }
        }

        let mut vars = Vec::new();
        walk("", &context.clone().into_json(), 0, &mut vars);
        vars.sort();
        vars
    }

    /// Find similar variable names using Levenshtein distance.
    fn find_similar_variables(target: &str, available: &[String]) -> Vec<String> {
        let mut scored: Vec<_> =
            available.iter().map(|var| (var.clone(), levenshtein(target, var))).collect();

        scored.sort_by_key(|(_, dist)| *dist);

        scored
            .into_iter()
            .filter(|(_, dist)| *dist <= target.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
            .take(3)
            .map(|(var, _)| var)
            .collect()
    }

    /// Extract a line number from a Tera parse error ("1:7", "15:23").
    fn extract_line_from_tera_error(error: &tera::Error) -> Option<usize> {
        let error_msg = format!("{:?}", error);
        LINE_COLUMN.captures(&error_msg)?.get(1)?.as_str().parse::<usize>().ok()
    }

    /// Flatten the Tera error chain into one readable message.
    ///
    /// Wrapper messages such as "Failed to render 'main'" carry no information
    /// beyond the template name and are dropped.
    pub fn format_tera_error(error: &tera::Error) -> String {
        use std::error::Error;

        let mut all_messages = vec![error.to_string()];
        let mut current_error: Option<&dyn Error> = error.source();
        while let Some(err) = current_error {
            all_messages.push(err.to_string());
            current_error = err.source();
        }

        let messages: Vec<String> = all_messages
            .into_iter()
            .map(|msg| msg.trim().to_string())
            .filter(|msg| {
                !msg.is_empty()
                    && !(msg.starts_with("Failed to render '") && msg.ends_with('\''))
                    && !(msg.starts_with("Failed to parse '") && msg.ends_with('\''))
            })
            .collect();

        if messages.is_empty() {
            "Template syntax error".to_string()
        } else {
            messages.join("\n  → ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_variable_gets_suggestions() {
        let mut tera = Tera::default();
        tera.add_raw_template("broken", "module {{ controller.nmae }}").unwrap();
        let mut context = TeraContext::new();
        context.insert("controller", &serde_json::json!({ "name": "Controller", "retry": 3 }));

        let error = tera.render("broken", &context).unwrap_err();
        match TemplateRenderer::parse_tera_error("broken", &error, &context) {
            TemplateError::VariableNotFound {
                variable,
                suggestions,
                ..
            } => {
                assert_eq!(variable, "controller.nmae");
                assert_eq!(suggestions.first().map(String::as_str), Some("controller.name"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_available_variables_are_dotted_paths() {
        let mut context = TeraContext::new();
        context.insert("controller", &serde_json::json!({ "module": { "version": "1.21" } }));
        let vars = TemplateRenderer::extract_available_variables(&context);
        assert_eq!(vars, vec!["controller", "controller.module", "controller.module.version"]);
    }

    #[test]
    fn test_syntax_error_is_reported_with_template_name() {
        let mut tera = Tera::default();
        let error = tera.add_raw_template("bad", "{% for x in %}").unwrap_err();
        let message = TemplateRenderer::format_tera_error(&error);
        assert!(!message.is_empty());
        assert!(!message.starts_with("Failed to parse 'bad'"));
    }
}
