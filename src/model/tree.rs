//! Tree module for phylogenetic tree representation.
//!
//! This module provides the core data structures for representing phylogenetic trees:
//! - `Tree`: The main tree structure using the arena pattern for efficient memory layout.
//! - `TreeIndex` is used to index vertices.
//! - `LabelIndex` is used to index taxa in a shared taxon table.

use crate::model::taxon::TaxonTable;
use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type TreeIndex = usize;

/// *During construction only*, index for unset root.
const NO_ROOT_SET_INDEX: TreeIndex = usize::MAX;

/// Index of a taxon in a [TaxonTable].
pub type LabelIndex = usize;

// =#========================================================================#=
// TREE
// =#========================================================================#=
/// A rooted phylogenetic tree represented using the arena pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by [TreeIndex].
/// Aim is to avoid referencing troubles as well as to provide efficient memory layout
/// and cache locality for traversal operations. A deep copy of a tree is a plain
/// [Clone] of the underlying vector.
///
/// # Structure
/// - All vertices (root, internal, and leaves) are stored in the arena
/// - Index of root is maintained; rerooting re-points the root's slot, so
///   vertex indices stay stable across reroots
/// - No assumption on order of indices is maintained (e.g. leaves must not be first `n` indices)
/// - Leaves contain a [LabelIndex] pointing into a shared [TaxonTable]
/// - Branch lengths are optional, but if provided must be non-negative
/// - Children are kept as lists, so multifurcating vertices are representable
///
/// # Construction
/// To construct a tree, specify its size based on the number of leaves, then add vertices
/// one by one, bottom-up. Test validity with [Tree::is_valid].
///
/// # Example
/// ```
/// use phylorec::model::taxon::{Taxon, TaxonTable};
/// use phylorec::model::tree::Tree;
///
/// // Create a tree: ((A,B),C);
/// let mut taxa = TaxonTable::new(3);
/// let mut tree = Tree::new(3);
///
/// let index_a = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name("A")));
/// let index_b = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name("B")));
/// let index_c = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name("C")));
///
/// let index_internal = tree.add_internal_vertex(vec![index_a, index_b], None);
/// tree.add_root(vec![index_internal, index_c]);
///
/// assert!(tree.is_valid());
/// assert!(tree.is_binary());
/// ```
#[derive(Debug, Clone)]
pub struct Tree {
    /// Number of leaf nodes in the tree
    num_leaves_init: usize,

    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: TreeIndex,

    /// Name of tree; optional
    name: Option<String>,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl Tree {
    /// Creates a new tree with capacity for a binary tree with `num_leaves` leaves.
    ///
    /// # Arguments
    /// `num_leaves` - number of leaves of the new tree; must be positive
    pub fn new(num_leaves: usize) -> Self {
        assert!(num_leaves > 0);
        let capacity = 2 * num_leaves - 1;
        Tree {
            num_leaves_init: num_leaves,
            name: None,
            root_index: NO_ROOT_SET_INDEX,
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Attaches a name to this tree.
    pub fn with_name(mut self, name: String) -> Self {
        self.name = Some(name);
        self
    }

    /// Adds a root to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Indices of the root's children
    ///
    /// # Returns
    /// The index of the newly created root vertex.
    pub fn add_root(&mut self, children: Vec<TreeIndex>) -> TreeIndex {
        assert!(!children.is_empty());
        let index = self.vertices.len();
        self.vertices.push(Vertex::new_root(index, children.clone()));

        self.root_index = index;
        for child in children {
            self[child].set_parent(index);
        }

        index
    }

    /// Adds an internal vertex to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `children` - Indices of the child vertices
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    ///
    /// # Returns
    /// The index of the newly created internal vertex.
    pub fn add_internal_vertex(
        &mut self,
        children: Vec<TreeIndex>,
        branch_length: Option<BranchLength>,
    ) -> TreeIndex {
        assert!(!children.is_empty());
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_internal(index, children.clone(), branch_length));

        for child in children {
            self[child].set_parent(index);
        }

        index
    }

    /// Adds a leaf to the tree, assigning a unique index, which gets returned.
    ///
    /// # Arguments
    /// * `branch_length` - Length of incoming branch, i.e. distance to parent (non-negative)
    /// * `label_index` - Index into the taxon table for this leaf's taxon
    ///
    /// # Returns
    /// The index of the newly created leaf vertex.
    pub fn add_leaf(
        &mut self,
        branch_length: Option<BranchLength>,
        label_index: LabelIndex,
    ) -> TreeIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, branch_length, label_index));
        index
    }

    /// Validates the tree structure and all index references.
    ///
    /// Checks:
    /// - Root index is valid and points to a Root vertex
    /// - All vertex indices match their position in the arena
    /// - There are the right number of leaves and only one root
    /// - All child indices are valid and point back to correct parent
    /// - All parent indices are valid and include this vertex as a child
    /// - Root vertex has no parent set, all others have valid parent set
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        // Check root index is set and within bounds
        if self.root_index == NO_ROOT_SET_INDEX || self.root_index >= self.vertices.len() {
            return false;
        }

        // Check root is actually a Root variant
        if !self.vertices[self.root_index].is_root() {
            return false;
        }

        let mut leaf_count = 0;
        let mut found_root = false;

        // Validate each vertex
        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Check that there is only one root
            if vertex.is_root() {
                if found_root {
                    return false;
                } else {
                    found_root = true;
                }
            }

            // Check that there are not too many leaves
            if vertex.is_leaf() {
                leaf_count += 1;
                if leaf_count > self.num_leaves_init {
                    return false;
                }
            }

            // Check children references
            for &child in vertex.children() {
                // Check child index is in bounds
                if child >= self.vertices.len() {
                    return false;
                }

                // Check child points back to this vertex as parent
                if self.vertices[child].parent_index() != Some(index) {
                    return false;
                }
            }

            // Check parent references
            if vertex.is_root() {
                // Root should not have a parent set
                if vertex.has_parent() {
                    return false;
                }
            } else {
                // Non-root must have valid parent
                match vertex.parent_index() {
                    None => return false,
                    Some(parent_index) => {
                        // Check parent index is in bounds
                        if parent_index >= self.vertices.len() {
                            return false;
                        }

                        // Check parent includes this vertex in its children
                        if !self.vertices[parent_index].children().contains(&index) {
                            return false;
                        }
                    }
                }
            }
        }

        // Check that there are enough leaves
        if leaf_count < self.num_leaves_init {
            return false;
        }

        true
    }

    /// Returns whether every non-leaf vertex of this tree has exactly two children.
    pub fn is_binary(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| v.is_leaf() || v.children().len() == 2)
    }

    /// Returns reference to name of this tree, or `None` if not set.
    pub fn name(&self) -> Option<&String> {
        self.name.as_ref()
    }

    /// Returns whether root of tree has been set.
    pub fn is_root_set(&self) -> bool {
        self.root_index != NO_ROOT_SET_INDEX
    }

    /// Returns a reference to the root vertex.
    ///
    /// # Panics
    /// Panics if the root hasn't been set and thus tree hasn't been fully constructed yet.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root vertex.
    ///
    /// This index is stable: rerooting reuses the root's arena slot.
    pub fn root_index(&self) -> TreeIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    pub fn vertex(&self, index: TreeIndex) -> &Vertex {
        &self[index]
    }

    /// Returns a mutable reference to the vertex at the given index.
    pub fn vertex_mut(&mut self, index: TreeIndex) -> &mut Vertex {
        &mut self.vertices[index]
    }

    /// Returns the number of leaves this tree was initialized to hold.
    pub fn num_leaves_init(&self) -> usize {
        self.num_leaves_init
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree.
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns an iterator over the indices of all leaves of this tree.
    pub fn leaf_indices(&self) -> impl Iterator<Item = TreeIndex> + '_ {
        self.vertices.iter().filter(|v| v.is_leaf()).map(|v| v.index())
    }

    /// Returns the lowest common ancestor of two vertices, computed from the
    /// tree topology by ancestor-walk intersection.
    ///
    /// # Panics
    /// Panics if the two vertices are not connected to a common root.
    pub fn lowest_common_ancestor(&self, u: TreeIndex, v: TreeIndex) -> TreeIndex {
        let mut on_path = vec![false; self.vertices.len()];
        let mut walk = Some(u);
        while let Some(index) = walk {
            on_path[index] = true;
            walk = self[index].parent_index();
        }

        let mut other = v;
        loop {
            if on_path[other] {
                return other;
            }
            other = self[other]
                .parent_index()
                .expect("Vertices do not share an ancestor");
        }
    }

    /// Returns an iterator over the vertex indices of this tree in post-order
    /// (children before parents).
    pub fn post_order_indices(&self) -> PostOrderIndices<'_> {
        PostOrderIndices::new(self)
    }

    /// Returns an iterator over the vertex indices of this tree in pre-order
    /// (parents before children).
    pub fn pre_order_indices(&self) -> PreOrderIndices<'_> {
        PreOrderIndices::new(self)
    }
}

impl std::ops::Index<TreeIndex> for Tree {
    type Output = Vertex;

    fn index(&self, index: TreeIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

impl std::ops::IndexMut<TreeIndex> for Tree {
    fn index_mut(&mut self, index: TreeIndex) -> &mut Self::Output {
        &mut self.vertices[index]
    }
}

// ============================================================================
// Rerooting (pub)
// ============================================================================
impl Tree {
    /// Moves the root of this binary tree onto the edge above `vertex`.
    ///
    /// The two edges below the old root position merge into a single edge
    /// (branch lengths summed when both are present), parent/child links
    /// reverse along the path from `vertex`'s parent up to the old root
    /// position, and the root's arena slot is re-pointed onto the edge above
    /// `vertex`, whose length is split evenly between the two new root edges.
    /// Vertex indices are unchanged, so per-index annotations stay aligned.
    ///
    /// Rerooting to the current root, or to a child of the current root, does
    /// not change the rooted topology; these calls leave the tree untouched.
    ///
    /// # Arguments
    /// * `vertex` - The vertex below the new root position
    ///
    /// # Returns
    /// `true` if the tree was rerooted, `false` if the call was a no-op.
    ///
    /// # Panics
    /// Panics if the root does not have exactly two children.
    pub fn reroot_above(&mut self, vertex: TreeIndex) -> bool {
        let root = self.root_index;
        if vertex == root {
            return false;
        }
        let anchor = match self[vertex].parent_index() {
            Some(parent) => parent,
            None => return false,
        };
        if anchor == root {
            return false;
        }

        let root_children = self.root().children().to_vec();
        assert!(root_children.len() == 2, "Reroot requires a binary root");
        let (first, second) = (root_children[0], root_children[1]);
        let merged_length = match (self[first].branch_length(), self[second].branch_length()) {
            (Some(a), Some(b)) => Some(BranchLength::new(*a + *b)),
            _ => None,
        };

        // Path from the new root position up to the old one.
        let mut path = vec![anchor];
        let mut walk = anchor;
        while walk != root {
            walk = self[walk].parent_index().expect("Path to root is broken");
            path.push(walk);
        }
        let old_lengths: Vec<Option<BranchLength>> =
            path.iter().map(|&index| self[index].branch_length()).collect();

        // Reverse parent/child links along the path. The last step replaces
        // the old root by the merged edge between its two former children.
        for pair in 0..path.len() - 1 {
            let lower = path[pair];
            let upper = path[pair + 1];
            if upper == root {
                let sibling = if lower == first { second } else { first };
                self[lower].add_child(sibling);
                self[sibling].set_parent(lower);
                self[sibling].set_branch_length(merged_length);
            } else {
                self[upper].remove_child(lower);
                self[lower].add_child(upper);
                self[upper].set_parent(lower);
                self[upper].set_branch_length(old_lengths[pair]);
            }
        }

        // Splice the root slot onto the edge above `vertex`.
        let split_length = self[vertex]
            .branch_length()
            .map(|length| BranchLength::new(*length / 2.0));
        self[anchor].remove_child(vertex);
        self[root].set_children(vec![anchor, vertex]);
        self[anchor].set_parent(root);
        self[anchor].set_branch_length(split_length);
        self[vertex].set_parent(root);
        self[vertex].set_branch_length(split_length);

        true
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl Tree {
    /// Converts the tree to a Newick format string.
    ///
    /// Leaves are written with the display label of their taxon; branch
    /// lengths are included where present.
    ///
    /// # Arguments
    /// * `taxa` - Taxon table shared by the leaves of this tree
    ///
    /// # Example
    /// ```
    /// use phylorec::model::taxon::{Taxon, TaxonTable};
    /// use phylorec::model::tree::Tree;
    ///
    /// let mut taxa = TaxonTable::new(2);
    /// let mut tree = Tree::new(2);
    /// let a = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name("A")));
    /// let b = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name("B")));
    /// tree.add_root(vec![a, b]);
    ///
    /// assert_eq!(tree.to_newick(&taxa), "(A,B);");
    /// ```
    pub fn to_newick(&self, taxa: &TaxonTable) -> String {
        fn build_branch_length(newick: &mut String, branch_length: Option<BranchLength>) {
            if let Some(branch_length) = branch_length {
                newick.push(':');
                newick.push_str(&branch_length.to_string());
            }
        }

        fn build_newick(tree: &Tree, newick: &mut String, index: TreeIndex, taxa: &TaxonTable) {
            let vertex = &tree[index];

            if vertex.is_leaf() {
                let label_index = vertex.label_index().unwrap();
                let label = taxa
                    .get(label_index)
                    .and_then(|taxon| taxon.display_label())
                    .unwrap_or("?");
                newick.push_str(label);
                build_branch_length(newick, vertex.branch_length());
            } else {
                newick.push('(');
                for (position, &child) in vertex.children().iter().enumerate() {
                    if position > 0 {
                        newick.push(',');
                    }
                    build_newick(tree, newick, child, taxa);
                }
                newick.push(')');

                if !vertex.is_root() {
                    build_branch_length(newick, vertex.branch_length());
                }
            }
        }

        let mut newick = String::with_capacity(self.num_vertices() * 8);
        build_newick(self, &mut newick, self.root_index, taxa);
        newick.push(';');

        newick
    }
}

// =#========================================================================#=
// ITERATORS
// =#========================================================================#=
/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited after all its descendants have been visited.
pub struct PostOrderIndices<'a> {
    tree: &'a Tree,
    stack: Vec<(TreeIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIndices<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push((tree.root_index, false));
        }
        PostOrderIndices { tree, stack }
    }
}

impl Iterator for PostOrderIndices<'_> {
    type Item = TreeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                // Either we've already processed children, or this is a leaf
                return Some(index);
            } else {
                // Mark this vertex as "children will be visited"
                self.stack.push((index, true));

                // Push children in reverse, so the first child is processed first
                for &child in vertex.children().iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
/// Each vertex is visited before any of its descendants.
pub struct PreOrderIndices<'a> {
    tree: &'a Tree,
    stack: Vec<TreeIndex>,
}

impl<'a> PreOrderIndices<'a> {
    fn new(tree: &'a Tree) -> Self {
        let mut stack = Vec::new();
        if tree.is_root_set() {
            stack.push(tree.root_index);
        }
        PreOrderIndices { tree, stack }
    }
}

impl Iterator for PreOrderIndices<'_> {
    type Item = TreeIndex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;

        // Push children in reverse, so the first child is processed first
        for &child in self.tree[index].children().iter().rev() {
            self.stack.push(child);
        }

        Some(index)
    }
}
