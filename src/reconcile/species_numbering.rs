//! Preorder numbering of the species tree.
//!
//! Reconciliation never queries the species tree topology beyond "parent of";
//! instead it compares preorder ranks. Since an ancestor always holds a
//! strictly smaller rank than any of its descendants, the lowest common
//! ancestor of two ranks can be found by repeatedly lifting the larger rank
//! to its parent's rank.

use crate::model::tree::{Tree, TreeIndex};
use crate::reconcile::error::ReconciliationError;

/// Preorder rank of a species tree vertex; the root holds rank 1.
pub type Rank = usize;

/// Rank value marking a gene tree vertex that has not been mapped yet.
pub(crate) const NO_MAPPING: Rank = 0;

// =#========================================================================#=
// SPECIES NUMBERING
// =#========================================================================#=
/// Bijection between species tree vertices and preorder ranks.
///
/// Built once per species tree by a single preorder traversal (root first,
/// children in stored order) and then used read-only.
///
/// # Invariant
/// For any vertex, its rank is strictly smaller than the rank of each of its
/// descendants.
#[derive(Debug, Clone)]
pub struct SpeciesNumbering {
    /// Rank of each vertex, indexed by [TreeIndex]
    ranks: Vec<Rank>,
    /// Vertex holding each rank, indexed by rank - 1
    vertex_at_rank: Vec<TreeIndex>,
}

impl SpeciesNumbering {
    /// Numbers the vertices of the given species tree.
    ///
    /// # Errors
    /// [ReconciliationError::EmptySpeciesTree] if the tree has no vertices,
    /// [ReconciliationError::UnrootedSpeciesTree] if no root has been set.
    pub fn new(species_tree: &Tree) -> Result<Self, ReconciliationError> {
        if species_tree.num_vertices() == 0 {
            return Err(ReconciliationError::EmptySpeciesTree);
        }
        if !species_tree.is_root_set() {
            return Err(ReconciliationError::UnrootedSpeciesTree);
        }

        let mut ranks = vec![NO_MAPPING; species_tree.num_vertices()];
        let mut vertex_at_rank = Vec::with_capacity(species_tree.num_vertices());
        for (position, index) in species_tree.pre_order_indices().enumerate() {
            ranks[index] = position + 1;
            vertex_at_rank.push(index);
        }

        Ok(SpeciesNumbering { ranks, vertex_at_rank })
    }

    /// Returns the rank of the given species tree vertex.
    pub fn rank_of(&self, vertex: TreeIndex) -> Rank {
        self.ranks[vertex]
    }

    /// Returns the species tree vertex holding the given rank.
    pub fn vertex_at(&self, rank: Rank) -> TreeIndex {
        self.vertex_at_rank[rank - 1]
    }

    /// Returns the number of ranks assigned.
    pub fn num_ranks(&self) -> usize {
        self.vertex_at_rank.len()
    }

    /// Returns the rank of the parent of the vertex holding `rank`.
    ///
    /// # Panics
    /// Panics if called on rank 1, which belongs to the root.
    pub fn parent_rank(&self, species_tree: &Tree, rank: Rank) -> Rank {
        let parent = species_tree[self.vertex_at(rank)]
            .parent_index()
            .expect("Rank 1 has no parent rank");
        self.rank_of(parent)
    }

    /// Returns the rank of the lowest common ancestor of the vertices holding
    /// ranks `a` and `b`, by rank-walking.
    ///
    /// Whichever side holds the larger rank is replaced by its parent's rank
    /// until both sides agree. The preorder invariant guarantees the walk
    /// cannot skip past the true common ancestor.
    pub fn lca_rank(&self, species_tree: &Tree, mut a: Rank, mut b: Rank) -> Rank {
        while a != b {
            if a > b {
                a = self.parent_rank(species_tree, a);
            } else {
                b = self.parent_rank(species_tree, b);
            }
        }
        a
    }
}
