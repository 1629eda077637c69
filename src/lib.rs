//! # route-tree
//!
//! Turns a flat set of route declarations into a nested routing
//! configuration, at build time.
//!
//! Each declaration is a `(path, name?, handler, mode)` tuple. The nesting is
//! derived from path segments alone: a route is placed under its longest
//! declared prefix, and only renders the part of its path its ancestors have
//! not already rendered.
//!
//! ```text
//! "/"              Shell      →  [ { path: "/", construct: const Shell(), routes: [
//! "/home"          Home       →      { path: "/home", construct: const Home(), routes: [
//! "/home/settings" Settings   →          { path: "/settings", construct: Settings() } ] } ] } ]
//! ```
//!
//! ## Usage
//!
//! ```
//! use route_tree::{build_config, InstantiationMode, RouteDescriptor};
//!
//! let routes = [
//!     RouteDescriptor::new("/", None, "Shell", InstantiationMode::Shared)?,
//!     RouteDescriptor::new("/home", None, "Home", InstantiationMode::Shared)?,
//! ];
//! let config = build_config(routes)?;
//! assert!(config.starts_with("[ { path: \"/\""));
//! # Ok::<(), route_tree::BuildError>(())
//! ```
//!
//! Build scripts should use `route-tree-build`; `route-tree-macro` runs the
//! same pipeline inside a `routes!` invocation.

pub mod builder;
pub mod emit;
pub mod error;
pub mod route;

pub use builder::{build, RouteForest};
pub use emit::{emit, emit_nodes, render};
pub use error::BuildError;
pub use route::{InstantiationMode, NodeId, RouteDescriptor, RoutePath, RouteTree};

/// Build the hierarchy and render it in one step.
///
/// Unreachable nested routes are dropped silently; call [`build`] and
/// inspect [`RouteForest::unreachable`] to act on them.
pub fn build_config<I>(descriptors: I) -> Result<String, BuildError>
where
    I: IntoIterator<Item = RouteDescriptor>,
{
    let forest = build(descriptors)?;
    Ok(render(&forest))
}
