//! Artifact templates.
//!
//! Templates are Go source (and one `go.mod`) with Tera placeholders. They are
//! embedded into the binary at build time from the `templates/` directory and
//! rendered by [`TemplateRenderer`] from an assembled
//! [`ControllerConfig`](crate::assembler::ControllerConfig).
//!
//! | Template     | Artifact                       | Context                        |
//! |--------------|--------------------------------|--------------------------------|
//! | `gomod`      | `go.mod`                       | `controller`                   |
//! | `main`       | `main.go`                      | `controller`                   |
//! | `controller` | `controller.go`                | `controller`                   |
//! | `custom`     | `custom.go`                    | `controller`                   |
//! | `deepcopy`   | `<kind>_gen.deepcopy.go`       | `resource`, `package_name`     |
//!
//! Templates have no `.html` suffix, so Tera does not autoescape the quotes
//! in Go string literals.

pub mod error;
pub mod renderer;


pub use error::TemplateError;
pub use renderer::TemplateRenderer;

pub const GOMOD: &str = "gomod";
pub const MAIN: &str = "main";
pub const CONTROLLER: &str = "controller";
pub const CUSTOM: &str = "custom";
pub const DEEP_COPY: &str = "deepcopy";

pub(crate) const TEMPLATES: [(&str, &str); 5] = [
    (GOMOD, include_str!("../../templates/gomod.tera")),
    (MAIN, include_str!("../../templates/main.tera")),
    (CONTROLLER, include_str!("../../templates/controller.tera")),
    (CUSTOM, include_str!("../../templates/custom.tera")),
    (DEEP_COPY, include_str!("../../templates/deepcopy.tera")),
];
