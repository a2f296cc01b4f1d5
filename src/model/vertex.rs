//! Vertex module for phylogenetic tree representation.

use crate::model::tree::{LabelIndex, TreeIndex};
use std::ops::Deref;

/// During construction, Internal and Leaf vertex might not have parent set yet.
const NO_PARENT_SET: TreeIndex = usize::MAX;

// =#========================================================================#=
// EVENT
// =#========================================================================#=
/// Evolutionary event inferred for an inner vertex of a gene tree.
///
/// Every inner vertex starts out `Unset` and is tagged exactly once per
/// reconciliation pass. Only the few vertices touched by a reroot are ever
/// re-tagged, by the incremental update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Event {
    /// No event inferred (yet)
    #[default]
    Unset,
    /// Gene lineage divergence coincides with a species divergence
    Speciation,
    /// Two gene lineages diverged within a single species lineage
    Duplication,
}

impl Event {
    /// Returns `true` if this event is a duplication.
    pub fn is_duplication(&self) -> bool {
        matches!(self, Event::Duplication)
    }

    /// Returns `true` if this event is a speciation.
    pub fn is_speciation(&self) -> bool {
        matches!(self, Event::Speciation)
    }

    /// Returns `true` if an event has been inferred for this vertex.
    pub fn is_set(&self) -> bool {
        !matches!(self, Event::Unset)
    }
}

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a phylogenetic tree.
///
/// A vertex can be either:
/// - **Root**: Has children, no parent and no branch_length
/// - **Internal**: Has parent and children, no label, might have branch_length
/// - **Leaf**: Has no children, has a taxon (via index) and might have branch_length
///
/// Most trees are binary, but children are kept as a list so that
/// multifurcating gene trees (more than two children per vertex) can be
/// represented for generalized event inference.
///
/// # Invariants
/// - `index` is index in arena; non-negative (guaranteed by `TreeIndex = usize` type)
/// - `branch_length` is non-negative (enforced); might not be set
/// - Internal and Leaf vertices have `parent` as `TreeIndex` of parent in arena;
///   `NO_PARENT_SET = usize::MAX` only during construction
/// - Root and Internal vertices carry an [Event] slot, written by reconciliation
/// - Leaf vertices have a `label_index` into a shared taxon table
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree (has no parent)
    Root {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Indices of the child vertices
        children: Vec<TreeIndex>,
        /// Inferred evolutionary event
        event: Event,
    },
    /// Internal vertex (has parent and children, no label)
    Internal {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Index of the parent vertex
        parent: TreeIndex,
        /// Indices of the child vertices
        children: Vec<TreeIndex>,
        /// Distance to parent node (optional, non-negative if present)
        branch_length: Option<BranchLength>,
        /// Inferred evolutionary event
        event: Event,
    },
    /// Leaf vertex (has parent and taxon, no children)
    Leaf {
        /// Index of this vertex in the tree arena
        index: TreeIndex,
        /// Index into the shared taxon table
        label_index: LabelIndex,
        /// Index of the parent vertex
        parent: TreeIndex,
        /// Distance to parent node (optional, non-negative if present)
        branch_length: Option<BranchLength>,
    },
}

impl Vertex {
    /// Creates a new root vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Indices of the child vertices
    pub fn new_root(index: TreeIndex, children: Vec<TreeIndex>) -> Self {
        Vertex::Root {
            index,
            children,
            event: Event::Unset,
        }
    }

    /// Creates a new internal (non-leaf, non-root) vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `children` - Indices of the child vertices
    /// * `branch_length` - Distance to parent node (non-negative)
    pub fn new_internal(
        index: TreeIndex,
        children: Vec<TreeIndex>,
        branch_length: Option<BranchLength>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent: NO_PARENT_SET,
            children,
            branch_length,
            event: Event::Unset,
        }
    }

    /// Creates a new leaf vertex.
    ///
    /// # Arguments
    /// * `index` - The unique index of this vertex in the tree (arena)
    /// * `branch_length` - Distance to parent node (non-negative)
    /// * `label_index` - Index into the taxon table for this leaf's taxon
    pub fn new_leaf(
        index: TreeIndex,
        branch_length: Option<BranchLength>,
        label_index: LabelIndex,
    ) -> Self {
        Vertex::Leaf {
            index,
            label_index,
            parent: NO_PARENT_SET,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> TreeIndex {
        match self {
            Vertex::Root { index, .. } => *index,
            Vertex::Internal { index, .. } => *index,
            Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns whether this vertex has a [BranchLength].
    pub fn has_branch_length(&self) -> bool {
        match self {
            Vertex::Root { .. } => false,
            Vertex::Internal { branch_length, .. } => branch_length.is_some(),
            Vertex::Leaf { branch_length, .. } => branch_length.is_some(),
        }
    }

    /// Returns the branch length if this is a non-root vertex, else `None`.
    pub fn branch_length(&self) -> Option<BranchLength> {
        match self {
            Vertex::Root { .. } => None,
            Vertex::Internal { branch_length, .. } => *branch_length,
            Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Sets the branch length of a non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_branch_length(&mut self, branch_length: Option<BranchLength>) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set branch length on root vertex"),
            Vertex::Internal { branch_length: bl, .. } => *bl = branch_length,
            Vertex::Leaf { branch_length: bl, .. } => *bl = branch_length,
        }
    }

    /// Returns label index if this is a leaf, else `None`.
    pub fn label_index(&self) -> Option<LabelIndex> {
        match self {
            Vertex::Leaf { label_index, .. } => Some(*label_index),
            _ => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }

    /// Returns the children of this vertex; empty for leaves.
    pub fn children(&self) -> &[TreeIndex] {
        match self {
            Vertex::Root { children, .. } => children,
            Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    /// Replaces the children of a non-leaf vertex.
    ///
    /// # Panics
    /// Panics if called on a leaf.
    pub fn set_children(&mut self, new_children: Vec<TreeIndex>) {
        match self {
            Vertex::Root { children, .. } => *children = new_children,
            Vertex::Internal { children, .. } => *children = new_children,
            Vertex::Leaf { .. } => panic!("Cannot set children on leaf vertex"),
        }
    }

    /// Adds a child to a non-leaf vertex.
    ///
    /// # Panics
    /// Panics if called on a leaf.
    pub fn add_child(&mut self, child: TreeIndex) {
        match self {
            Vertex::Root { children, .. } => children.push(child),
            Vertex::Internal { children, .. } => children.push(child),
            Vertex::Leaf { .. } => panic!("Cannot add child to leaf vertex"),
        }
    }

    /// Removes a child from a non-leaf vertex.
    ///
    /// # Panics
    /// Panics if called on a leaf or if `child` is not a child of this vertex.
    pub fn remove_child(&mut self, child: TreeIndex) {
        let children = match self {
            Vertex::Root { children, .. } => children,
            Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => panic!("Cannot remove child from leaf vertex"),
        };
        let position = children
            .iter()
            .position(|&c| c == child)
            .expect("Vertex to remove is not a child");
        children.remove(position);
    }

    /// Sets new parent for non-root vertex.
    ///
    /// # Panics
    /// Panics if called on root.
    pub fn set_parent(&mut self, parent: TreeIndex) {
        match self {
            Vertex::Root { .. } => panic!("Cannot set parent on root vertex"),
            Vertex::Internal { parent: p, .. } => *p = parent,
            Vertex::Leaf { parent: p, .. } => *p = parent,
        }
    }

    /// Returns the index of parent if this a non-root vertex, else `None`.
    ///
    /// Note that parent might not be set yet during construction.
    pub fn parent_index(&self) -> Option<TreeIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                if *parent == NO_PARENT_SET {
                    None
                } else {
                    Some(*parent)
                }
            }
            Vertex::Root { .. } => None,
        }
    }

    /// Returns `true` if this vertex has a parent set.
    pub fn has_parent(&self) -> bool {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => {
                *parent != NO_PARENT_SET
            }
            Vertex::Root { .. } => false,
        }
    }

    /// Returns the inferred event of this vertex; leaves are always `Unset`.
    pub fn event(&self) -> Event {
        match self {
            Vertex::Root { event, .. } => *event,
            Vertex::Internal { event, .. } => *event,
            Vertex::Leaf { .. } => Event::Unset,
        }
    }

    /// Tags a non-leaf vertex with an inferred event.
    ///
    /// # Panics
    /// Panics if called on a leaf.
    pub fn set_event(&mut self, new_event: Event) {
        match self {
            Vertex::Root { event, .. } => *event = new_event,
            Vertex::Internal { event, .. } => *event = new_event,
            Vertex::Leaf { .. } => panic!("Cannot set event on leaf vertex"),
        }
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a phylogenetic tree, enforced non-negative.
///
/// Represents the evolutionary distance between a vertex and its parent.
/// The value is guaranteed to be non-negative and finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchLength(f64);

impl BranchLength {
    /// Creates a new branch length.
    ///
    /// # Arguments
    /// * `length` - The branch length value (must be non-negative)
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::fmt::Display for BranchLength {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
