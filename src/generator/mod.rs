//! The generator pipeline.
//!
//! ```text
//! ControllerSpec ──assemble──▶ ControllerConfig ──render──▶ [Artifact] ──write──▶ WriteReport
//!                                                                         └──▶ go mod tidy
//! ```
//!
//! Assembly and rendering finish completely before the first write, so a
//! configuration or template error never leaves a partially generated
//! project behind. Writes then happen in a fixed order: `go.mod`, `main.go`,
//! `controller.go`, `custom.go`, then deep-copy files in resource order.

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::assembler::ControllerConfig;
use crate::config::ControllerSpec;
use crate::constants::{CONTROLLER_FILE, CUSTOM_FILE, DEEP_COPY_SUFFIX, GO_MOD_FILE, MAIN_FILE};
use crate::core::CtrlgenError;
use crate::resolver::{ResourceDescriptor, is_within_module};
use crate::templating::{self, TemplateRenderer};
use crate::tidy::TidyCommand;
use crate::writer::{Artifact, ArtifactWriter, WritePolicy, WriteReport};

/// Options of a single generator run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Run `go mod tidy` after writing.
    pub tidy: bool,
    /// Render and report outcomes without writing anything.
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            tidy: true,
            dry_run: false,
        }
    }
}

/// Generates a controller project from an assembled configuration.
#[derive(Debug)]
pub struct Generator {
    config: ControllerConfig,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Assemble `spec` and prepare the templates.
    ///
    /// # Errors
    ///
    /// Any configuration error from [`ControllerConfig::assemble`], or a
    /// template compilation error.
    pub fn new(spec: ControllerSpec) -> Result<Self> {
        Self::from_config(ControllerConfig::assemble(spec)?)
    }

    /// Use an already assembled configuration.
    ///
    /// # Errors
    ///
    /// Fails if a built-in template does not compile.
    pub fn from_config(config: ControllerConfig) -> Result<Self> {
        Ok(Self {
            config,
            renderer: TemplateRenderer::new().map_err(CtrlgenError::from)?,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Output directory of the generated project.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.base)
    }

    /// Render every artifact, in write order.
    ///
    /// # Errors
    ///
    /// Fails on the first template error, or when a deep-copy path cannot be
    /// derived.
    pub fn artifacts(&self) -> Result<Vec<Artifact>> {
        let base = self.base_dir();
        let render = |name: &str| -> Result<String> {
            Ok(self.renderer.render(name, &self.config).map_err(CtrlgenError::from)?)
        };

        let mut artifacts = vec![
            Artifact::new(base.join(GO_MOD_FILE), WritePolicy::WriteOnce, render(templating::GOMOD)?),
            Artifact::new(base.join(MAIN_FILE), WritePolicy::Overwrite, render(templating::MAIN)?),
            Artifact::new(
                base.join(CONTROLLER_FILE),
                WritePolicy::Overwrite,
                render(templating::CONTROLLER)?,
            ),
            Artifact::new(
                base.join(CUSTOM_FILE),
                WritePolicy::Merge {
                    receiver: self.config.name.clone(),
                },
                render(templating::CUSTOM)?,
            ),
        ];

        for resource in self.config.resources.iter().filter(|r| r.gen_deep_copy) {
            let content =
                self.renderer.render_deep_copy(resource).map_err(CtrlgenError::from)?;
            artifacts.push(Artifact::new(
                self.deep_copy_path(resource)?,
                WritePolicy::Overwrite,
                content,
            ));
        }

        Ok(artifacts)
    }

    /// `base/<package relative to the module>/<kind>_gen.deepcopy.go`, or
    /// directly under `base` for local types.
    fn deep_copy_path(&self, resource: &ResourceDescriptor) -> Result<PathBuf> {
        let file_name = format!("{}{DEEP_COPY_SUFFIX}", resource.lower_kind);
        let mut path = self.base_dir();
        if let Some(package) = &resource.package {
            let module = &self.config.module.module;
            if !is_within_module(package, module) {
                return Err(CtrlgenError::FileSystemError {
                    operation: format!("derive deep-copy path outside module {module}:"),
                    path: package.clone(),
                }
                .into());
            }
            let relative = package[module.len()..].trim_start_matches('/');
            path.extend(relative.split('/').filter(|segment| !segment.is_empty()));
        }
        path.push(file_name);
        Ok(path)
    }

    /// Render, write and optionally tidy.
    ///
    /// # Errors
    ///
    /// Rendering errors abort before any write. Write errors abort at the
    /// failing artifact; earlier artifacts stay written. A tidy failure is
    /// reported after all artifacts are written.
    pub async fn run(&self, options: GenerateOptions) -> Result<WriteReport> {
        let artifacts = self.artifacts()?;
        let writer = ArtifactWriter::new(options.dry_run);

        let mut report = WriteReport::default();
        for artifact in &artifacts {
            let outcome = writer.write(artifact)?;
            report.push(artifact.path.clone(), outcome);
        }

        if options.tidy && !options.dry_run {
            TidyCommand::new().run(&self.base_dir()).await?;
        }

        info!(
            artifacts = report.entries.len(),
            modified = report.modified(),
            dry_run = options.dry_run,
            "generation finished"
        );
        Ok(report)
    }
}
