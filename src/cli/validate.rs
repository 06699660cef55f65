//! `ctrlgen validate`: resolve and assemble a description without writing.
//!
//! Text output lists each resolved resource, the import set and every
//! resolution warning. JSON output carries the same data for scripts:
//!
//! ```json
//! {
//!   "valid": true,
//!   "name": "Controller",
//!   "namespace": "",
//!   "resources": [{ "kind": "Pod", "qualified_type": "corev1.Pod", ... }],
//!   "imports": [{ "alias": "corev1", "package": "k8s.io/api/core/v1" }],
//!   "warnings": []
//! }
//! ```

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;

use crate::assembler::ControllerConfig;
use crate::config;
use crate::core::CtrlgenError;

/// Output format for validation results.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Text,
    /// Structured JSON output
    Json,
}

/// Resolve every resource and print the result.
#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Controller description: a local path or an http(s) URL
    #[arg(short = 'f', long = "filename", value_name = "PATH|URL")]
    pub filename: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

impl ValidateCommand {
    /// # Errors
    ///
    /// Fails if the description cannot be loaded or does not assemble. In
    /// JSON mode the failure is also printed as `{"valid": false, ...}`, with
    /// `config_error` telling a bad description apart from a failed read.
    pub async fn execute(self) -> Result<()> {
        let assembled = config::load(&self.filename)
            .await
            .and_then(ControllerConfig::assemble)
            .map_err(anyhow::Error::from);

        match (assembled, self.format) {
            (Ok(config), OutputFormat::Json) => {
                println!("{}", serde_json::to_string_pretty(&json_report(&config))?);
                Ok(())
            }
            (Ok(config), OutputFormat::Text) => {
                print_text(&config);
                Ok(())
            }
            (Err(error), OutputFormat::Json) => {
                let config_error = error
                    .downcast_ref::<CtrlgenError>()
                    .is_some_and(CtrlgenError::is_config_error);
                let report = serde_json::json!({
                    "valid": false,
                    "config_error": config_error,
                    "error": error.to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&report)?);
                Err(error)
            }
            (Err(error), OutputFormat::Text) => Err(error),
        }
    }
}

fn json_report(config: &ControllerConfig) -> serde_json::Value {
    serde_json::json!({
        "valid": true,
        "name": config.name,
        "namespace": config.namespace,
        "resources": config.resources,
        "imports": config.imports,
        "warnings": config.warnings,
    })
}

fn print_text(config: &ControllerConfig) {
    let scope = if config.is_cluster_scoped() {
        "all namespaces".to_string()
    } else {
        format!("namespace {}", config.namespace)
    };
    println!("{} {} ({scope})", "Controller".bold(), config.name);

    println!("{}", "Resources:".bold());
    for resource in &config.resources {
        let location = resource.package.as_deref().unwrap_or("local type");
        println!("  {} → {} ({location})", resource.kind, resource.qualified_type.cyan());
    }

    if !config.imports.is_empty() {
        println!("{}", "Imports:".bold());
        for import in &config.imports {
            println!("  {} {:?}", import.alias, import.package);
        }
    }

    if !config.warnings.is_empty() {
        println!("{}", "Warnings:".bold());
        for warning in &config.warnings {
            println!("  {} {warning}", "⚠".yellow());
        }
    }

    println!("{} configuration is valid", "✓".green());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ControllerSpec, ResourceSpec};

    #[test]
    fn test_json_report_shape() {
        let spec = ControllerSpec {
            resources: vec![ResourceSpec::kind("Pod"), ResourceSpec {
                kind: "Pod".to_string(),
                package: "example.com/forks/core".to_string(),
                ..ResourceSpec::default()
            }],
            ..ControllerSpec::default()
        };
        let config = ControllerConfig::assemble(spec).unwrap();
        let report = json_report(&config);

        assert_eq!(report["valid"], true);
        assert_eq!(report["resources"][0]["qualified_type"], "corev1.Pod");
        assert_eq!(report["imports"][1]["package"], "k8s.io/api/core/v1");
        assert_eq!(report["warnings"][0]["type"], "no_version_in_package");
    }
}
