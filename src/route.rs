//! Route descriptors and the per-build arena that holds them.
//!
//! A [`RouteDescriptor`] is immutable apart from its tree membership
//! (`children`, `parent`, `skip`), which only [`RouteTree`] may change.
//! Parents are referenced by [`NodeId`], an index into the arena, so a node
//! can be moved to a new parent without any ownership cycle.

use std::fmt;
use std::ops::Index;

use serde::Deserialize;

use crate::error::BuildError;

/// How the emitted configuration constructs a handler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum InstantiationMode {
    /// One shared constant instance (`const Home()`).
    #[default]
    #[serde(rename = "const")]
    Shared,
    /// A fresh instance per construction (`Home()`).
    #[serde(rename = "new")]
    Fresh,
}

impl InstantiationMode {
    /// Textual modifier placed in front of the handler when emitting.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Shared => "const ",
            Self::Fresh => "",
        }
    }
}

/// A parsed route path.
///
/// Two paths are equal when their segment sequences are equal, so `/a`,
/// `/a/` and `a` all denote the same route.
#[derive(Clone, Debug)]
pub struct RoutePath {
    raw: String,
    segments: Vec<String>,
}

impl RoutePath {
    pub fn parse(raw: &str) -> Result<Self, BuildError> {
        let invalid = || BuildError::InvalidPath {
            path: raw.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid());
        }
        // Query and fragment markers start a new URI component, and
        // whitespace never survives as part of a path.
        if raw
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '?' || c == '#')
        {
            return Err(invalid());
        }

        let segments = raw
            .split('/')
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The path exactly as declared.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Non-empty `/`-separated components, `[]` for `/`.
    #[inline]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl PartialEq for RoutePath {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Eq for RoutePath {}

impl std::hash::Hash for RoutePath {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.segments.hash(state);
    }
}

/// Normalized form: `/` followed by the segments.
impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Check that `handler` names a constructible type: `Home`, `pages::Home`.
pub fn validate_handler(handler: &str) -> Result<(), BuildError> {
    let invalid = |reason: String| BuildError::InvalidHandlerSource {
        handler: handler.to_string(),
        reason,
    };

    if handler.is_empty() {
        return Err(invalid("handler is empty".into()));
    }

    for seg in handler.split("::") {
        if seg.is_empty() {
            return Err(invalid("empty path segment".into()));
        }
        // Valid identifier: starts with letter/underscore, contains alphanumeric/_
        let mut chars = seg.chars();
        if let Some(first) = chars.next()
            && !first.is_alphabetic()
            && first != '_'
        {
            return Err(invalid(format!(
                "segment '{seg}' must start with letter or underscore"
            )));
        }
        if let Some(c) = chars.find(|&c| !c.is_alphanumeric() && c != '_') {
            return Err(invalid(format!(
                "segment '{seg}' contains invalid character '{c}'"
            )));
        }
    }

    Ok(())
}

/// Handle of a descriptor inside a [`RouteTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// One declared route and its place in the tree.
#[derive(Clone, Debug)]
pub struct RouteDescriptor {
    path: RoutePath,
    name: Option<String>,
    handler: String,
    mode: InstantiationMode,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    skip: usize,
}

impl RouteDescriptor {
    /// Create a detached descriptor.
    ///
    /// # Errors
    ///
    /// - [`BuildError::InvalidPath`] when `path` is empty or unparsable
    /// - [`BuildError::InvalidHandlerSource`] when `handler` is not one or
    ///   more identifiers joined by `::`
    pub fn new(
        path: &str,
        name: Option<&str>,
        handler: impl Into<String>,
        mode: InstantiationMode,
    ) -> Result<Self, BuildError> {
        let path = RoutePath::parse(path)?;
        let handler = handler.into();
        validate_handler(&handler)?;

        Ok(Self {
            path,
            name: name.map(String::from),
            handler,
            mode,
            children: Vec::new(),
            parent: None,
            skip: 0,
        })
    }

    #[inline]
    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    #[inline]
    pub fn segments(&self) -> &[String] {
        self.path.segments()
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[inline]
    pub fn handler(&self) -> &str {
        &self.handler
    }

    #[inline]
    pub fn mode(&self) -> InstantiationMode {
        self.mode
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Leading segments already rendered by ancestors.
    #[inline]
    pub fn skip(&self) -> usize {
        self.skip
    }

    /// Segments this node renders itself: `segments[skip..]`.
    pub fn suffix(&self) -> &[String] {
        let segments = self.segments();
        &segments[self.skip.min(segments.len())..]
    }
}

/// Arena owning every descriptor of one build.
#[derive(Clone, Debug, Default)]
pub struct RouteTree {
    nodes: Vec<RouteDescriptor>,
}

impl RouteTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a descriptor into the arena.
    pub fn insert(&mut self, descriptor: RouteDescriptor) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(descriptor);
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Make `child` the last child of `parent`.
    ///
    /// If `child` is already attached somewhere (including to `parent`
    /// itself) it is removed from that parent's children first, so a node is
    /// never listed twice.
    ///
    /// Returns `false` and leaves the tree untouched when `child` is
    /// `parent` or one of its ancestors.
    pub fn attach_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if parent == child || self.is_ancestor(child, parent) {
            return false;
        }

        if let Some(previous) = self.nodes[child.0].parent.take() {
            self.nodes[previous.0].children.retain(|&c| c != child);
        }
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        true
    }

    pub(crate) fn set_skip(&mut self, id: NodeId, skip: usize) {
        self.nodes[id.0].skip = skip;
    }

    /// True if `ancestor` is on the parent chain of `node`.
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.nodes[node.0].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    /// Pre-order ids of every node under (and including) `roots`.
    pub fn preorder(&self, roots: &[NodeId]) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }
        out
    }
}

impl Index<NodeId> for RouteTree {
    type Output = RouteDescriptor;

    fn index(&self, id: NodeId) -> &RouteDescriptor {
        &self.nodes[id.0]
    }
}
