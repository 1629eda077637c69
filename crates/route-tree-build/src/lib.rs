//! Build-time utilities for route-tree.
//!
//! This crate provides tools for:
//! - Parsing `routes.toml` route declarations
//! - Building the route hierarchy and rendering the routing configuration
//! - Writing the result as a single generated source file
//!
//! # Usage in build.rs
//!
//! ```ignore
//! // build.rs
//! fn main() {
//!     println!("cargo:rerun-if-changed=routes.toml");
//!     route_tree_build::generate("routes.toml", "src/generated_routes.rs")
//!         .expect("Failed to generate routes");
//! }
//! ```
//!
//! # routes.toml
//!
//! ```toml
//! on_unreachable = "warn"   # "ignore" | "warn" | "error"
//!
//! [output]
//! header = ["// @generated by route-tree-build. Do not edit."]
//! template = "pub const ROUTES: &str = r#\"{routes}\"#;"
//!
//! [[route]]
//! path = "/"
//! handler = "Shell"
//!
//! [[route]]
//! path = "/home/settings"
//! name = "settings"
//! handler = "pages::Settings"
//! mode = "new"
//! ```
//!
//! # Unreachable Routes
//!
//! A nested route is only placed if its first segment was declared as a
//! top-level route. Others are left out of the output; `on_unreachable`
//! decides whether that is silent, a cargo warning (default), or an error.

mod toml_parser;

pub use toml_parser::{
    OnUnreachable, RouteDecl, RoutesConfig, RoutesConfigError, DEFAULT_HEADER, ROUTES_PLACEHOLDER,
};

use std::path::Path;

use route_tree::{BuildError, RouteDescriptor};

/// Main entry point for build.rs integration.
///
/// Reads `routes.toml`, builds the route hierarchy and writes the generated
/// file. Nothing is written unless every step succeeds, and an unchanged
/// output file is left untouched.
///
/// # Errors
///
/// Returns an error if:
/// - `routes.toml` cannot be read or parsed
/// - a declaration is invalid (bad path or handler, duplicate path or name)
/// - there is no `/` and no top-level route
/// - a route is unreachable and `on_unreachable = "error"`
/// - the output file cannot be written
pub fn generate(
    config_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), GenerateError> {
    let config_path = config_path.as_ref();
    let output_path = output_path.as_ref();

    // 1. Parse routes.toml
    let config = RoutesConfig::from_file(config_path)?;

    // 2. Build and render
    let code = generate_code(&config)?;

    // 3. Write, unless unchanged
    if let Ok(existing) = std::fs::read_to_string(output_path)
        && existing == code
    {
        return Ok(());
    }
    std::fs::write(output_path, code)?;

    Ok(())
}

/// Generate the output file contents for a parsed config.
pub fn generate_code(config: &RoutesConfig) -> Result<String, GenerateError> {
    let descriptors: Vec<RouteDescriptor> = config.descriptors().collect::<Result<_, _>>()?;
    let forest = route_tree::build(descriptors)?;

    let unreachable: Vec<String> = forest.unreachable_paths().map(String::from).collect();
    if !unreachable.is_empty() {
        match config.on_unreachable {
            OnUnreachable::Ignore => {}
            OnUnreachable::Warn => {
                for path in &unreachable {
                    println!(
                        "cargo:warning=route-tree: Route '{}' has no declared ancestor and was left out",
                        path
                    );
                }
            }
            OnUnreachable::Error => return Err(GenerateError::Unreachable(unreachable)),
        }
    }

    let routes = route_tree::render(&forest);

    let mut code = String::new();
    for line in &config.header {
        code.push_str(line);
        code.push('\n');
    }
    if !config.header.is_empty() {
        code.push('\n');
    }
    code.push_str(&config.template.replacen(ROUTES_PLACEHOLDER, &routes, 1));
    if !code.ends_with('\n') {
        code.push('\n');
    }

    Ok(code)
}

fn format_unreachable_error(paths: &[String]) -> String {
    let mut msg = String::new();
    msg.push_str("route-tree: Unreachable routes!\n\n");
    msg.push_str("  No declared ancestor for:\n");
    for path in paths {
        msg.push_str(&format!("    - {}\n", path));
    }
    msg.push_str("\n  To fix:\n");
    msg.push_str("    1. Declare the missing top-level route(s), OR\n");
    msg.push_str("    2. Set `on_unreachable = \"warn\"` in routes.toml to leave them out\n");
    msg
}

/// Errors that can occur during generation.
#[derive(thiserror::Error, Debug)]
pub enum GenerateError {
    /// Failed to parse routes.toml
    #[error("Config error: {0}")]
    ConfigError(#[from] RoutesConfigError),
    /// Invalid declaration or hierarchy
    #[error("Route error: {0}")]
    BuildError(#[from] BuildError),
    /// Routes without a declared ancestor, with `on_unreachable = "error"`
    #[error("{}", format_unreachable_error(.0))]
    Unreachable(Vec<String>),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
