//! # Structural Tracker
//!
//! Builds the scope tree of a unit: type declarations (named, nested, local,
//! anonymous) and callable bodies (methods, constructors, initializer blocks,
//! lambdas).
//!
//! The tree is an arena: nodes live in one `Vec` and refer to each other by
//! [`ScopeId`]. Node 0 is always the [`ScopeKind::Unit`] root spanning the
//! whole text. Children are stored in source order, sibling ranges never
//! overlap and every child range lies inside its parent's.

pub(crate) mod header;
mod tracker;

pub use tracker::track;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

/// The role of a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    /// The root node covering the whole unit.
    Unit,
    Type,
    /// Method, constructor, free function or accessor.
    Method,
    /// Static or instance initializer block.
    Initializer,
    Lambda,
}

impl ScopeKind {
    /// Whether the scope gets its own complexity record.
    #[must_use]
    pub const fn is_callable(self) -> bool {
        matches!(self, Self::Method | Self::Initializer | Self::Lambda)
    }
}

impl fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unit => "unit",
            Self::Type => "type",
            Self::Method => "method",
            Self::Initializer => "initializer",
            Self::Lambda => "lambda",
        })
    }
}

/// Flavor of a [`ScopeKind::Type`] scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Record,
    Struct,
    /// Kotlin `object` / `companion object`.
    Object,
    /// Java `@interface`.
    Annotation,
    /// Anonymous class body or enum-constant body.
    Anonymous,
}

/// Index of a node in a [`ScopeTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const ROOT: Self = Self(0);

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Id of the node stored at arena index `index`, saturating at `u32::MAX`.
    #[inline]
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }
}

/// One node of the scope tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeNode {
    pub kind: ScopeKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub type_kind: Option<TypeKind>,
    /// Declared name, or a synthetic `<...>` name for anonymous scopes.
    pub name: String,
    /// Byte offset where the declaration starts (modifiers, parameters or `new`).
    pub start: usize,
    /// Byte offset one past the closing brace or the last expression token.
    pub end: usize,
    /// Byte offset where the body proper begins (`{`, or the first token after `=>`/`=`).
    pub body_start: usize,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Closed at end-of-unit because its brace was never matched.
    pub unterminated: bool,
}

impl ScopeNode {
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Arena of scope nodes for one unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeTree {
    nodes: Vec<ScopeNode>,
}

impl ScopeTree {
    /// Creates a tree holding only the unit root over `[0, len)`.
    #[must_use]
    pub fn new(name: &str, len: usize) -> Self {
        Self {
            nodes: alloc::vec![ScopeNode {
                kind: ScopeKind::Unit,
                type_kind: None,
                name: String::from(name),
                start: 0,
                end: len,
                body_start: 0,
                parent: None,
                children: Vec::new(),
                unterminated: false,
            }],
        }
    }

    #[must_use]
    pub fn root(&self) -> &ScopeNode {
        &self.nodes[0]
    }

    #[must_use]
    pub fn get(&self, id: ScopeId) -> Option<&ScopeNode> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: ScopeId) -> &mut ScopeNode {
        &mut self.nodes[id.index()]
    }

    /// Appends `node` under `parent` and returns its id.
    pub(crate) fn push(&mut self, parent: ScopeId, mut node: ScopeNode) -> ScopeId {
        let id = ScopeId::from_index(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(node);
        self.nodes[parent.index()].children.push(id);
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root exists from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, root first, in order of opening.
    pub fn iter(&self) -> impl Iterator<Item = (ScopeId, &ScopeNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (ScopeId::from_index(i), n))
    }

    pub fn children(&self, id: ScopeId) -> impl Iterator<Item = &ScopeNode> {
        self.nodes[id.index()]
            .children
            .iter()
            .map(|c| &self.nodes[c.index()])
    }

    /// Nesting depth below the root (root = 0).
    #[must_use]
    pub fn depth(&self, id: ScopeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.index()].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.index()].parent;
        }
        depth
    }

    /// Nearest ancestor of kind [`ScopeKind::Type`], if any.
    #[must_use]
    pub fn enclosing_type(&self, id: ScopeId) -> Option<ScopeId> {
        let mut current = self.nodes[id.index()].parent;
        while let Some(parent) = current {
            if self.nodes[parent.index()].kind == ScopeKind::Type {
                return Some(parent);
            }
            current = self.nodes[parent.index()].parent;
        }
        None
    }

    #[must_use]
    pub fn count(&self, kind: ScopeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, start: usize, end: usize) -> ScopeNode {
        ScopeNode {
            kind: ScopeKind::Method,
            type_kind: None,
            name: String::from(name),
            start,
            end,
            body_start: start,
            parent: None,
            children: Vec::new(),
            unterminated: false,
        }
    }

    #[test]
    fn iter_ids_match_pushed_ids() {
        let mut tree = ScopeTree::new("unit", 20);
        let f = tree.push(ScopeId::ROOT, method("f", 0, 10));
        let g = tree.push(f, method("g", 2, 8));
        let ids: Vec<ScopeId> = tree.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, [ScopeId::ROOT, f, g]);
        assert_eq!(tree.get(g).map(|n| n.parent), Some(Some(f)));
        assert_eq!(tree.depth(g), 2);
    }

    #[test]
    fn oversized_index_saturates() {
        assert_eq!(ScopeId::from_index(3), ScopeId(3));
        assert_eq!(ScopeId::from_index(usize::MAX), ScopeId(u32::MAX));
    }
}
