//! Serialization of a built hierarchy into configuration text.
//!
//! Each node becomes one entry, children nested under `routes`:
//!
//! ```text
//! [ { path: "/", construct: const Shell(), routes: [ { path: "/home", construct: const Home() } ] } ]
//! ```
//!
//! Only the segments after a node's `skip` are rendered, so concatenating
//! the paths along a branch yields the full declared path. The output is a
//! pure function of the tree: no sorting, no hashing, no timestamps.

use crate::builder::RouteForest;
use crate::route::{NodeId, RouteTree};

/// Append the configuration for every root of `forest` to `buf`.
pub fn emit(buf: &mut String, forest: &RouteForest) {
    emit_nodes(buf, forest.tree(), forest.roots());
}

/// Render `forest` into a new string.
pub fn render(forest: &RouteForest) -> String {
    let mut buf = String::new();
    emit(&mut buf, forest);
    buf
}

/// Append a `[ ... ]` list holding one entry per node, in order.
pub fn emit_nodes(buf: &mut String, tree: &RouteTree, nodes: &[NodeId]) {
    if nodes.is_empty() {
        buf.push_str("[]");
        return;
    }

    buf.push_str("[ ");
    for (i, &id) in nodes.iter().enumerate() {
        if i > 0 {
            buf.push_str(", ");
        }
        emit_entry(buf, tree, id);
    }
    buf.push_str(" ]");
}

fn emit_entry(buf: &mut String, tree: &RouteTree, id: NodeId) {
    let node = &tree[id];

    buf.push_str("{ path: \"/");
    push_escaped(buf, &node.suffix().join("/"));
    buf.push('"');

    if let Some(name) = node.name() {
        buf.push_str(", name: \"");
        push_escaped(buf, name);
        buf.push('"');
    }

    buf.push_str(", construct: ");
    buf.push_str(node.mode().prefix());
    buf.push_str(node.handler());
    buf.push_str("()");

    if !node.children().is_empty() {
        buf.push_str(", routes: ");
        emit_nodes(buf, tree, node.children());
    }

    buf.push_str(" }");
}

fn push_escaped(buf: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            _ => buf.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::route::{InstantiationMode, RouteDescriptor};

    fn d(path: &str, name: Option<&str>, handler: &str, mode: InstantiationMode) -> RouteDescriptor {
        RouteDescriptor::new(path, name, handler, mode).unwrap()
    }

    #[test]
    fn shell_home_settings() {
        let forest = build([
            d("/", None, "Shell", InstantiationMode::Shared),
            d("/home", None, "Home", InstantiationMode::Shared),
            d("/home/settings", Some("settings"), "Settings", InstantiationMode::Fresh),
        ])
        .unwrap();

        assert_eq!(
            render(&forest),
            concat!(
                "[ { path: \"/\", construct: const Shell(), routes: [ ",
                "{ path: \"/home\", construct: const Home(), routes: [ ",
                "{ path: \"/settings\", name: \"settings\", construct: Settings() }",
                " ] } ] } ]",
            )
        );
    }

    #[test]
    fn multiple_roots_are_siblings() {
        let forest = build([
            d("/a", None, "A", InstantiationMode::Fresh),
            d("/b", Some("b"), "B", InstantiationMode::Fresh),
        ])
        .unwrap();

        assert_eq!(
            render(&forest),
            "[ { path: \"/a\", construct: A() }, { path: \"/b\", name: \"b\", construct: B() } ]"
        );
    }

    #[test]
    fn unreachable_routes_are_not_emitted() {
        let forest = build([
            d("/a", None, "A", InstantiationMode::Fresh),
            d("/z/y", None, "Lost", InstantiationMode::Fresh),
        ])
        .unwrap();

        let text = render(&forest);
        assert!(!text.contains("Lost"));
        assert_eq!(text.matches("construct:").count(), forest.reachable_len());
    }

    #[test]
    fn names_are_escaped() {
        let forest = build([d("/a", Some("say \"hi\" \\o/"), "A", InstantiationMode::Fresh)]).unwrap();
        assert_eq!(
            render(&forest),
            r#"[ { path: "/a", name: "say \"hi\" \\o/", construct: A() } ]"#
        );
    }

    #[test]
    fn empty_list() {
        let mut buf = String::new();
        emit_nodes(&mut buf, &RouteTree::new(), &[]);
        assert_eq!(buf, "[]");
    }

    #[test]
    fn appends_to_existing_buffer() {
        let forest = build([d("/a", None, "A", InstantiationMode::Shared)]).unwrap();
        let mut buf = String::from("routes = ");
        emit(&mut buf, &forest);
        assert_eq!(buf, "routes = [ { path: \"/a\", construct: const A() } ]");
    }
}
