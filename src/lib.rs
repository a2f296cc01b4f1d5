//! Phylorec reconciles gene family trees against species trees.
//!
//! Given a rooted gene tree and a rooted species tree over the same species,
//! this crate maps every gene tree vertex to a species lineage via lowest
//! common ancestors and labels every inner vertex as a **speciation** or a
//! **gene duplication** (SDI, after Zmasek & Eddy 2001). Core functionality:
//! - Binary inference: post-order LCA mapping with rank-walk comparisons
//!   over a preorder-numbered species tree.
//! - Multifurcating inference: generalization to gene trees whose vertices
//!   have more than two children.
//! - Root search: enumerate all rootings of a rerootable gene tree and keep
//!   those minimizing the duplication count, updating the mapping
//!   incrementally instead of recomputing it per rooting.
//! - Tree model: arena-based trees with index-referenced vertices, shared
//!   taxon tables, and a rerooting primitive; deep copies are flat clones.
//!
//! Reading and writing tree files is out of scope; trees are built and
//! returned in memory ([Tree::to_newick](model::Tree::to_newick) is provided
//! as a write-only convenience).
//!
//! # Usage patterns
//! 1. The functions below cover the common cases with a single call.
//! 2. For access to mappings, traversal counts, or stepwise rerooting, use
//!    [Sdi](reconcile::Sdi), [Gsdi](reconcile::Gsdi),
//!    [RerootableSdi](reconcile::RerootableSdi), and [Sdir](reconcile::Sdir)
//!    directly.
//!
//! # Example
//!
//! Infer events for a gene tree with one duplicated gene:
//! ```
//! use phylorec::infer_events;
//! use phylorec::model::{Taxon, TaxonTable, Tree};
//!
//! let mut taxa = TaxonTable::new(2);
//! let taxon_a = taxa.get_or_insert(Taxon::from_scientific_name("A"));
//! let taxon_b = taxa.get_or_insert(Taxon::from_scientific_name("B"));
//!
//! let mut species_tree = Tree::new(2);
//! let s_a = species_tree.add_leaf(None, taxon_a);
//! let s_b = species_tree.add_leaf(None, taxon_b);
//! species_tree.add_root(vec![s_a, s_b]);
//!
//! // ((A,A),B); - two copies of the A gene
//! let mut gene_tree = Tree::new(3);
//! let g_a1 = gene_tree.add_leaf(None, taxon_a);
//! let g_a2 = gene_tree.add_leaf(None, taxon_a);
//! let g_b = gene_tree.add_leaf(None, taxon_b);
//! let inner = gene_tree.add_internal_vertex(vec![g_a1, g_a2], None);
//! gene_tree.add_root(vec![inner, g_b]);
//!
//! let (annotated, duplications) = infer_events(gene_tree, &species_tree, &taxa).unwrap();
//! assert_eq!(duplications, 1);
//! assert!(annotated.vertex(inner).event().is_duplication());
//! ```

pub mod model;
pub mod reconcile;

use crate::model::TaxonTable;
use crate::model::Tree;
use crate::reconcile::sdir::RootingResult;
use crate::reconcile::{Gsdi, ReconciliationError, Sdi, Sdir};

// ============================================================================
// Quick reconciliation API
// ============================================================================
/// Reconciles a rooted binary gene tree against a species tree, returning
/// the annotated gene tree and its duplication count.
///
/// See [Sdi](reconcile::Sdi) for full documentation.
pub fn infer_events(
    gene_tree: Tree,
    species_tree: &Tree,
    taxa: &TaxonTable,
) -> Result<(Tree, u32), ReconciliationError> {
    let mut sdi = Sdi::new(gene_tree, species_tree, taxa)?;
    sdi.infer_events();
    let duplications = sdi.duplication_count();
    Ok((sdi.into_gene_tree(), duplications))
}

/// Reconciles a rooted, possibly multifurcating gene tree against a species
/// tree, returning the annotated gene tree and its duplication count.
///
/// See [Gsdi](reconcile::Gsdi) for full documentation.
pub fn infer_events_multifurcating(
    gene_tree: Tree,
    species_tree: &Tree,
    taxa: &TaxonTable,
) -> Result<(Tree, u32), ReconciliationError> {
    let mut gsdi = Gsdi::new(gene_tree, species_tree, taxa)?;
    gsdi.infer_events();
    let duplications = gsdi.duplication_count();
    Ok((gsdi.into_gene_tree(), duplications))
}

// ============================================================================
// Quick root search API
// ============================================================================
/// Evaluates every rooting of a binary gene tree and returns all rootings
/// minimizing the inferred duplication count.
///
/// See [Sdir](reconcile::Sdir) for full documentation.
pub fn root_by_minimal_duplications(
    gene_tree: &Tree,
    species_tree: &Tree,
    taxa: &TaxonTable,
) -> Result<RootingResult, ReconciliationError> {
    Sdir::new(gene_tree, species_tree, taxa)?.root_and_infer()
}
