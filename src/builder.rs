//! Hierarchy reconstruction from flat route declarations.
//!
//! ## Algorithm
//!
//! 1. One scan validates uniqueness and partitions the routes into the root
//!    (`/`), top-level routes (one segment) and nested routes (two or more).
//! 2. Top-level routes become children of the root, in declaration order.
//! 3. Nested routes are placed breadth-first by depth. A work item
//!    `(parent, candidates, depth)` keeps the candidates whose segment at
//!    `depth - 1` matches the parent's. If the parent is deeper than `depth`
//!    the item just moves one level down; otherwise every match is attached
//!    to the parent with `skip = depth` and becomes a work item itself.
//!
//! Because levels are processed in order, a route is first attached to a
//! shallow ancestor and later moved under deeper ones, so it ends up under
//! its longest declared prefix:
//!
//! ```text
//! /                      skip 0   "/"
//! └── /home              skip 0   "/home"
//!     ├── /home/a        skip 1   "/a"
//!     │   └── /home/a/b  skip 2   "/b"
//!     └── /home/x/y      skip 1   "/x/y"     (no /home/x declared)
//! ```
//!
//! Nested routes whose first segment has no top-level route are never
//! reached; they are left out of the tree and listed in
//! [`RouteForest::unreachable`].

use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::BuildError;
use crate::route::{NodeId, RouteDescriptor, RoutePath, RouteTree};

/// Result of a successful build.
#[derive(Clone, Debug)]
pub struct RouteForest {
    tree: RouteTree,
    roots: Vec<NodeId>,
    unreachable: Vec<NodeId>,
}

impl RouteForest {
    /// Arena holding every declared route, attached or not.
    #[inline]
    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    /// `[root]` when `/` was declared, otherwise the top-level routes in
    /// declaration order.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Nested routes with no declared ancestor chain, in declaration order.
    #[inline]
    pub fn unreachable(&self) -> &[NodeId] {
        &self.unreachable
    }

    /// Number of routes that will be emitted.
    pub fn reachable_len(&self) -> usize {
        self.tree.len() - self.unreachable.len()
    }

    /// Paths of the unreachable routes, as declared.
    pub fn unreachable_paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.unreachable
            .iter()
            .map(|&id| self.tree[id].path().as_str())
    }
}

/// Build the route hierarchy.
///
/// # Errors
///
/// - [`BuildError::DuplicatePath`] if two routes share a segment sequence
/// - [`BuildError::DuplicateName`] if two routes share a name
/// - [`BuildError::NoTopLevelRoute`] if neither `/` nor a single-segment
///   route exists
pub fn build<I>(descriptors: I) -> Result<RouteForest, BuildError>
where
    I: IntoIterator<Item = RouteDescriptor>,
{
    let mut tree = RouteTree::new();
    let mut seen_paths: HashSet<RoutePath> = HashSet::new();
    let mut seen_names: HashSet<String> = HashSet::new();

    let mut root: Option<NodeId> = None;
    let mut top_level: Vec<NodeId> = Vec::new();
    let mut nested: Vec<NodeId> = Vec::new();

    // 1. Validate and partition
    for descriptor in descriptors {
        if !seen_paths.insert(descriptor.path().clone()) {
            return Err(BuildError::DuplicatePath {
                path: descriptor.path().as_str().to_string(),
            });
        }
        if let Some(name) = descriptor.name()
            && !seen_names.insert(name.to_string())
        {
            return Err(BuildError::DuplicateName {
                name: name.to_string(),
                path: descriptor.path().as_str().to_string(),
            });
        }

        let depth = descriptor.path().depth();
        let id = tree.insert(descriptor);
        match depth {
            0 => root = Some(id),
            1 => top_level.push(id),
            _ => nested.push(id),
        }
    }

    if root.is_none() && top_level.is_empty() {
        return Err(BuildError::NoTopLevelRoute);
    }

    // 2. Top-level routes hang off the root
    if let Some(root) = root {
        for &id in &top_level {
            tree.attach_child(root, id);
        }
    }

    // 3. Nested routes, breadth-first by depth
    place_nested(&mut tree, &top_level, &nested);

    let unreachable: Vec<NodeId> = nested
        .iter()
        .copied()
        .filter(|&id| tree[id].parent().is_none())
        .collect();
    for &id in &unreachable {
        debug!(path = %tree[id].path(), "route has no declared ancestor, excluded");
    }

    let roots = match root {
        Some(root) => vec![root],
        None => top_level,
    };

    debug!(
        routes = tree.len(),
        roots = roots.len(),
        unreachable = unreachable.len(),
        "route hierarchy built"
    );

    Ok(RouteForest {
        tree,
        roots,
        unreachable,
    })
}

/// Pending placement step.
///
/// `candidates` are exactly the nested routes sharing the first
/// `depth - 1` segments of `parent`.
struct Pending {
    parent: NodeId,
    candidates: Rc<[NodeId]>,
    depth: usize,
}

fn place_nested(tree: &mut RouteTree, top_level: &[NodeId], nested: &[NodeId]) {
    if nested.is_empty() {
        return;
    }

    let all: Rc<[NodeId]> = nested.into();
    let mut queue: VecDeque<Pending> = VecDeque::new();
    // Candidates are determined by (parent, depth), so each pair runs once.
    let mut queued: HashSet<(NodeId, usize)> = HashSet::new();

    let mut enqueue = |queue: &mut VecDeque<Pending>, pending: Pending| {
        if queued.insert((pending.parent, pending.depth)) {
            queue.push_back(pending);
        }
    };

    for &parent in top_level {
        enqueue(
            &mut queue,
            Pending {
                parent,
                candidates: Rc::clone(&all),
                depth: 1,
            },
        );
    }

    while let Some(Pending {
        parent,
        candidates,
        depth,
    }) = queue.pop_front()
    {
        let index = depth - 1;
        let parent_segments = tree[parent].segments();
        let key = &parent_segments[index];

        let next: Rc<[NodeId]> = candidates
            .iter()
            .copied()
            .filter(|&c| tree[c].segments().get(index) == Some(key))
            .collect();

        trace!(
            parent = %tree[parent].path(),
            depth,
            candidates = candidates.len(),
            matched = next.len(),
            "placing nested routes"
        );

        if next.is_empty() {
            continue;
        }

        if parent_segments.len() > depth {
            enqueue(
                &mut queue,
                Pending {
                    parent,
                    candidates: next,
                    depth: depth + 1,
                },
            );
            continue;
        }

        for &child in next.iter() {
            if child == parent {
                continue;
            }
            tree.set_skip(child, depth);
            tree.attach_child(parent, child);
            enqueue(
                &mut queue,
                Pending {
                    parent: child,
                    candidates: Rc::clone(&next),
                    depth: depth + 1,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::InstantiationMode;

    fn d(path: &str) -> RouteDescriptor {
        RouteDescriptor::new(path, None, "Page", InstantiationMode::Shared).unwrap()
    }

    fn named(path: &str, name: &str) -> RouteDescriptor {
        RouteDescriptor::new(path, Some(name), "Page", InstantiationMode::Shared).unwrap()
    }

    fn paths(forest: &RouteForest, ids: &[NodeId]) -> Vec<String> {
        ids.iter()
            .map(|&id| forest.tree()[id].path().to_string())
            .collect()
    }

    fn find(forest: &RouteForest, path: &str) -> NodeId {
        forest
            .tree()
            .ids()
            .find(|&id| forest.tree()[id].path().to_string() == path)
            .unwrap()
    }

    fn children_of(forest: &RouteForest, path: &str) -> Vec<String> {
        let id = find(forest, path);
        paths(forest, forest.tree()[id].children())
    }

    #[test]
    fn root_adopts_top_level_in_order() {
        let forest = build([d("/b"), d("/"), d("/a"), d("/c")]).unwrap();

        assert_eq!(paths(&forest, forest.roots()), ["/"]);
        assert_eq!(children_of(&forest, "/"), ["/b", "/a", "/c"]);
    }

    #[test]
    fn without_root_top_level_routes_are_roots() {
        let forest = build([d("/a/x"), d("/a"), d("/b")]).unwrap();

        assert_eq!(paths(&forest, forest.roots()), ["/a", "/b"]);
        assert_eq!(children_of(&forest, "/a"), ["/a/x"]);
        for &root in forest.roots() {
            assert!(forest.tree()[root].parent().is_none());
        }
    }

    #[test]
    fn nested_routes_find_longest_prefix() {
        let forest = build([
            d("/"),
            d("/home"),
            d("/home/a/b"),
            d("/home/settings"),
            d("/home/a"),
            d("/home/x/y"),
            d("/home/settings/advanced"),
        ])
        .unwrap();

        assert_eq!(
            children_of(&forest, "/home"),
            ["/home/settings", "/home/a", "/home/x/y"]
        );
        assert_eq!(children_of(&forest, "/home/a"), ["/home/a/b"]);
        assert_eq!(
            children_of(&forest, "/home/settings"),
            ["/home/settings/advanced"]
        );

        let tree = forest.tree();
        assert_eq!(tree[find(&forest, "/home")].skip(), 0);
        assert_eq!(tree[find(&forest, "/home/a")].skip(), 1);
        assert_eq!(tree[find(&forest, "/home/a/b")].skip(), 2);
        assert_eq!(tree[find(&forest, "/home/x/y")].skip(), 1);
        assert_eq!(tree[find(&forest, "/home/settings/advanced")].skip(), 2);
    }

    #[test]
    fn deep_chain_skips_match_parent_depth() {
        let forest = build([d("/a/b/c/d"), d("/a/b/c"), d("/a/b"), d("/a")]).unwrap();
        let tree = forest.tree();

        assert_eq!(children_of(&forest, "/a"), ["/a/b"]);
        assert_eq!(children_of(&forest, "/a/b"), ["/a/b/c"]);
        assert_eq!(children_of(&forest, "/a/b/c"), ["/a/b/c/d"]);
        assert_eq!(tree[find(&forest, "/a/b/c/d")].suffix(), ["d"]);
        assert_eq!(tree[find(&forest, "/a/b/c/d")].skip(), 3);
    }

    #[test]
    fn same_segment_under_different_prefix_is_not_adopted() {
        let forest = build([d("/home"), d("/home/a/b"), d("/home/x/b/c")]).unwrap();

        assert!(children_of(&forest, "/home/a/b").is_empty());
        assert_eq!(children_of(&forest, "/home"), ["/home/a/b", "/home/x/b/c"]);
        assert_eq!(forest.tree()[find(&forest, "/home/x/b/c")].skip(), 1);
    }

    #[test]
    fn gaps_keep_intermediate_segments_in_suffix() {
        let forest = build([d("/"), d("/a"), d("/a/b/c")]).unwrap();
        let leaf = find(&forest, "/a/b/c");
        assert_eq!(forest.tree()[leaf].suffix(), ["b", "c"]);
    }

    #[test]
    fn orphans_are_reported_not_attached() {
        let forest = build([d("/"), d("/a"), d("/b/c"), d("/b/c/d")]).unwrap();

        let orphans: Vec<_> = forest.unreachable_paths().collect();
        assert_eq!(orphans, ["/b/c", "/b/c/d"]);
        assert_eq!(forest.reachable_len(), 2);
        assert_eq!(forest.tree().preorder(forest.roots()).len(), 2);
    }

    #[test]
    fn root_only_is_valid() {
        let forest = build([d("/")]).unwrap();
        assert_eq!(forest.roots().len(), 1);
        assert!(forest.unreachable().is_empty());
    }

    #[test]
    fn duplicate_path_rejected() {
        let err = build([d("/a"), d("/a")]).unwrap_err();
        assert_eq!(err, BuildError::DuplicatePath { path: "/a".into() });
    }

    #[test]
    fn duplicate_path_compares_segments() {
        let err = build([d("/a/b"), d("/a"), d("a/b/")]).unwrap_err();
        assert_eq!(err, BuildError::DuplicatePath { path: "a/b/".into() });
    }

    #[test]
    fn duplicate_name_rejected_across_paths() {
        let err = build([named("/a", "same"), named("/b", "same")]).unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateName {
                name: "same".into(),
                path: "/b".into()
            }
        );
    }

    #[test]
    fn unnamed_routes_never_clash() {
        assert!(build([d("/a"), d("/b"), named("/c", "c")]).is_ok());
    }

    #[test]
    fn nested_only_has_no_anchor() {
        let err = build([d("/a/b"), d("/a/c")]).unwrap_err();
        assert_eq!(err, BuildError::NoTopLevelRoute);
        assert_eq!(
            build(Vec::<RouteDescriptor>::new()).unwrap_err(),
            BuildError::NoTopLevelRoute
        );
    }
}
