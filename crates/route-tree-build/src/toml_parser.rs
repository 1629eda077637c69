//! TOML configuration parser for routes.toml.

use std::path::Path;

use route_tree::{BuildError, InstantiationMode, RouteDescriptor};
use serde::Deserialize;

/// Placeholder replaced by the rendered route list in the output template.
pub const ROUTES_PLACEHOLDER: &str = "{routes}";

/// Header written when `[output]` does not set one.
pub const DEFAULT_HEADER: &str = "// @generated by route-tree-build. Do not edit.";

/// Behavior when a nested route has no declared ancestor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnUnreachable {
    /// Leave the route out without a diagnostic
    Ignore,
    /// Leave the route out and emit a cargo warning (default)
    #[default]
    Warn,
    /// Fail the build
    Error,
}

/// Parsed routes configuration.
#[derive(Debug, Clone)]
pub struct RoutesConfig {
    /// Behavior for routes no ancestor adopts
    pub on_unreachable: OnUnreachable,
    /// Lines written before the generated code
    pub header: Vec<String>,
    /// Output template, contains [`ROUTES_PLACEHOLDER`] exactly once
    pub template: String,
    /// Route declarations, in file order
    routes: Vec<RouteDecl>,
}

/// One `[[route]]` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecl {
    pub path: String,
    pub name: Option<String>,
    pub handler: String,
    pub mode: InstantiationMode,
}

/// Raw TOML structure.
#[derive(Debug, Deserialize)]
struct RawRoutesConfig {
    /// "ignore", "warn" (default) or "error"
    on_unreachable: Option<String>,
    output: Option<RawOutput>,
    #[serde(default, rename = "route")]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawOutput {
    header: Option<Vec<String>>,
    template: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    path: String,
    name: Option<String>,
    handler: String,
    mode: Option<InstantiationMode>,
}

impl RoutesConfig {
    /// Parse from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RoutesConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RoutesConfigError::Io(format!("Failed to read {}: {}", path.as_ref().display(), e))
        })?;
        Self::from_str(&content)
    }

    /// Parse from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, RoutesConfigError> {
        let raw: RawRoutesConfig =
            toml::from_str(content).map_err(|e| RoutesConfigError::Parse(e.to_string()))?;

        let on_unreachable = match raw.on_unreachable.as_deref() {
            None | Some("warn") => OnUnreachable::Warn,
            Some("ignore") => OnUnreachable::Ignore,
            Some("error") => OnUnreachable::Error,
            Some(other) => {
                return Err(RoutesConfigError::Validation(format!(
                    "Invalid on_unreachable value '{}': expected 'ignore', 'warn' or 'error'",
                    other
                )));
            }
        };

        let (header, template) = match raw.output {
            Some(output) => (
                output
                    .header
                    .unwrap_or_else(|| vec![DEFAULT_HEADER.to_string()]),
                output
                    .template
                    .unwrap_or_else(|| ROUTES_PLACEHOLDER.to_string()),
            ),
            None => (
                vec![DEFAULT_HEADER.to_string()],
                ROUTES_PLACEHOLDER.to_string(),
            ),
        };

        let placeholders = template.matches(ROUTES_PLACEHOLDER).count();
        if placeholders != 1 {
            return Err(RoutesConfigError::Validation(format!(
                "Output template must contain '{}' exactly once, found {}",
                ROUTES_PLACEHOLDER, placeholders
            )));
        }

        let routes = raw
            .routes
            .into_iter()
            .map(|r| RouteDecl {
                path: r.path,
                name: r.name,
                handler: r.handler,
                mode: r.mode.unwrap_or_default(),
            })
            .collect();

        Ok(Self {
            on_unreachable,
            header,
            template,
            routes,
        })
    }

    /// Get all declarations.
    pub fn routes(&self) -> impl Iterator<Item = &RouteDecl> {
        self.routes.iter()
    }

    /// Get declaration count.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolve every declaration, each on its own.
    pub fn descriptors(&self) -> impl Iterator<Item = Result<RouteDescriptor, BuildError>> + '_ {
        self.routes.iter().map(RouteDecl::to_descriptor)
    }
}

impl RouteDecl {
    /// Resolve into a [`RouteDescriptor`].
    pub fn to_descriptor(&self) -> Result<RouteDescriptor, BuildError> {
        RouteDescriptor::new(&self.path, self.name.as_deref(), &self.handler, self.mode)
    }
}

/// Errors during config parsing.
#[derive(thiserror::Error, Debug)]
pub enum RoutesConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),
    /// TOML parse error
    #[error("Parse error: {0}")]
    Parse(String),
    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),
}
