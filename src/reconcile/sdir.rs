//! Root search minimizing inferred gene duplications (SDIR).
//!
//! An unrooted gene tree can be rooted on any of its edges; different
//! rootings imply different numbers of inferred duplications. This module
//! walks all rootings of a binary gene tree, keeping the mapping up to date
//! incrementally, and retains every rooting that achieves the global minimum
//! duplication count.

use crate::model::taxon::TaxonTable;
use crate::model::tree::{Tree, TreeIndex};
use crate::reconcile::error::ReconciliationError;
use crate::reconcile::rerootable::RerootableSdi;
use crate::reconcile::sdi::validate_tree_pair;

// =#========================================================================#=
// SDIR
// =#========================================================================#=
/// Search over all rootings of a gene tree for the minimum-duplication
/// rooting(s).
///
/// The input gene tree is never modified; the search works on a private
/// copy. Candidate root positions are enumerated in preorder on the initial
/// rooting, so each reroot moves the root along the tree and the incremental
/// update of [RerootableSdi] applies.
///
/// # Example
/// ```
/// use phylorec::model::taxon::{Taxon, TaxonTable};
/// use phylorec::model::tree::Tree;
/// use phylorec::reconcile::sdir::Sdir;
///
/// let mut taxa = TaxonTable::new(3);
/// let taxon_a = taxa.get_or_insert(Taxon::from_scientific_name("A"));
/// let taxon_b = taxa.get_or_insert(Taxon::from_scientific_name("B"));
/// let taxon_c = taxa.get_or_insert(Taxon::from_scientific_name("C"));
///
/// // Species tree ((A,B),C); gene tree rooted discordantly as ((B,C),A).
/// let mut species_tree = Tree::new(3);
/// let s_a = species_tree.add_leaf(None, taxon_a);
/// let s_b = species_tree.add_leaf(None, taxon_b);
/// let s_c = species_tree.add_leaf(None, taxon_c);
/// let s_ab = species_tree.add_internal_vertex(vec![s_a, s_b], None);
/// species_tree.add_root(vec![s_ab, s_c]);
///
/// let mut gene_tree = Tree::new(3);
/// let g_b = gene_tree.add_leaf(None, taxon_b);
/// let g_c = gene_tree.add_leaf(None, taxon_c);
/// let g_a = gene_tree.add_leaf(None, taxon_a);
/// let g_bc = gene_tree.add_internal_vertex(vec![g_b, g_c], None);
/// gene_tree.add_root(vec![g_bc, g_a]);
///
/// let search = Sdir::new(&gene_tree, &species_tree, &taxa).unwrap();
/// let result = search.root_and_infer().unwrap();
///
/// // Rooting the gene tree between (A,B) and C needs no duplication.
/// assert_eq!(result.min_duplications(), 0);
/// ```
#[derive(Debug)]
pub struct Sdir<'a> {
    gene_tree: &'a Tree,
    species_tree: &'a Tree,
    taxa: &'a TaxonTable,
}

impl<'a> Sdir<'a> {
    /// Creates a root search over the given tree pair.
    ///
    /// # Errors
    /// Fails if either tree is empty or unrooted.
    pub fn new(
        gene_tree: &'a Tree,
        species_tree: &'a Tree,
        taxa: &'a TaxonTable,
    ) -> Result<Self, ReconciliationError> {
        validate_tree_pair(gene_tree, species_tree)?;
        Ok(Sdir {
            gene_tree,
            species_tree,
            taxa,
        })
    }

    /// Evaluates every rooting of the gene tree and returns all rootings
    /// achieving the minimum duplication count.
    ///
    /// A gene tree with at most one leaf is trivially rooted and returned
    /// unchanged with zero duplications. Otherwise both trees must be
    /// completely binary.
    ///
    /// Every vertex in preorder marks a candidate root position on the edge
    /// above it. Rerooting onto the current root or one of its children does
    /// not change the rooted topology and is skipped; rootings equivalent to
    /// the initial one (the edges above the initial root's children) are
    /// walked through but not recorded again.
    ///
    /// # Errors
    /// [ReconciliationError::GeneTreeNotBinary] /
    /// [ReconciliationError::SpeciesTreeNotBinary] if a tree with more than
    /// one leaf is not strictly binary, plus any error of
    /// [Sdi::new](crate::reconcile::sdi::Sdi::new).
    pub fn root_and_infer(&self) -> Result<RootingResult, ReconciliationError> {
        let working = self.gene_tree.clone();
        if working.num_leaves() <= 1 {
            return Ok(RootingResult {
                trees: vec![working],
                min_duplications: 0,
            });
        }

        if !working.is_binary() {
            return Err(ReconciliationError::GeneTreeNotBinary);
        }
        if !self.species_tree.is_binary() {
            return Err(ReconciliationError::SpeciesTreeNotBinary);
        }

        // Candidate root positions, fixed on the initial rooting. The root's
        // slot index stays stable across reroots, so these indices remain
        // meaningful throughout the walk.
        let candidates: Vec<TreeIndex> = working.pre_order_indices().collect();
        let initial_root_children = working.root().children().to_vec();

        let mut sdi = RerootableSdi::new(working, self.species_tree, self.taxa)?;
        sdi.infer_events();

        let mut min_duplications = sdi.duplication_count();
        let mut minimal_trees = vec![sdi.gene_tree().clone()];

        for &candidate in &candidates {
            let root = sdi.gene_tree().root_index();
            if candidate == root {
                continue;
            }
            let prev_children = sdi.gene_tree()[root].children().to_vec();
            if prev_children.contains(&candidate) {
                // Rerooting onto an edge below the root is a no-op.
                continue;
            }

            let prev_root_was_duplication = sdi.gene_tree()[root].event().is_duplication();
            let rerooted = sdi.gene_tree_mut().reroot_above(candidate);
            debug_assert!(rerooted);
            let duplications = sdi.update_after_reroot(
                prev_root_was_duplication,
                prev_children[0],
                prev_children[1],
            );

            if initial_root_children.contains(&candidate) {
                // Same unrooted edge as the initial rooting, already recorded.
                continue;
            }

            if duplications < min_duplications {
                min_duplications = duplications;
                minimal_trees.clear();
                minimal_trees.push(sdi.gene_tree().clone());
            } else if duplications == min_duplications {
                minimal_trees.push(sdi.gene_tree().clone());
            }
        }

        Ok(RootingResult {
            trees: minimal_trees,
            min_duplications,
        })
    }
}

// =#========================================================================#=
// ROOTING RESULT
// =#========================================================================#=
/// Outcome of a duplication-minimizing root search.
#[derive(Debug, Clone)]
pub struct RootingResult {
    /// All rootings achieving the minimum, as annotated deep copies
    trees: Vec<Tree>,
    /// The minimum duplication count over all rootings
    min_duplications: u32,
}

impl RootingResult {
    /// Returns the rootings achieving the minimum duplication count.
    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    /// Consumes the result, returning the minimal rootings.
    pub fn into_trees(self) -> Vec<Tree> {
        self.trees
    }

    /// Returns the minimum duplication count over all rootings.
    pub fn min_duplications(&self) -> u32 {
        self.min_duplications
    }
}
