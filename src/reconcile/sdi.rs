//! Speciation/duplication inference for binary gene trees (SDI).
//!
//! Maps every gene tree vertex onto the species tree by lowest common
//! ancestors and tags each inner vertex as a speciation or a gene
//! duplication, following Zmasek & Eddy (2001), Bioinformatics 17(9):821.

use crate::model::taxon::{ComparisonBasis, TaxonTable};
use crate::model::tree::{Tree, TreeIndex};
use crate::model::vertex::Event;
use crate::reconcile::error::ReconciliationError;
use crate::reconcile::species_numbering::{NO_MAPPING, Rank, SpeciesNumbering};
use std::collections::HashMap;

// =#========================================================================#=
// SDI
// =#========================================================================#=
/// Speciation/duplication inference on a rooted binary gene tree.
///
/// The reconciler takes ownership of the gene tree and annotates it in
/// place; the species tree and the taxon table are shared read-only.
/// Construction validates all preconditions, so the inference pass itself
/// cannot fail.
///
/// # Example
/// ```
/// use phylorec::model::taxon::{Taxon, TaxonTable};
/// use phylorec::model::tree::Tree;
/// use phylorec::reconcile::sdi::Sdi;
///
/// let mut taxa = TaxonTable::new(2);
/// let taxon_a = taxa.get_or_insert(Taxon::from_scientific_name("A"));
/// let taxon_b = taxa.get_or_insert(Taxon::from_scientific_name("B"));
///
/// // Species tree (A,B); gene tree ((A,A),B) with a duplicated A gene.
/// let mut species_tree = Tree::new(2);
/// let s_a = species_tree.add_leaf(None, taxon_a);
/// let s_b = species_tree.add_leaf(None, taxon_b);
/// species_tree.add_root(vec![s_a, s_b]);
///
/// let mut gene_tree = Tree::new(3);
/// let g_a1 = gene_tree.add_leaf(None, taxon_a);
/// let g_a2 = gene_tree.add_leaf(None, taxon_a);
/// let g_b = gene_tree.add_leaf(None, taxon_b);
/// let g_dup = gene_tree.add_internal_vertex(vec![g_a1, g_a2], None);
/// gene_tree.add_root(vec![g_dup, g_b]);
///
/// let mut sdi = Sdi::new(gene_tree, &species_tree, &taxa).unwrap();
/// sdi.infer_events();
///
/// assert_eq!(sdi.duplication_count(), 1);
/// assert!(sdi.gene_tree().vertex(g_dup).event().is_duplication());
/// ```
#[derive(Debug)]
pub struct Sdi<'a> {
    /// Gene tree under reconciliation, annotated in place
    pub(crate) gene_tree: Tree,
    /// Species tree, read-only
    pub(crate) species_tree: &'a Tree,
    /// Preorder numbering of the species tree
    pub(crate) species_numbering: SpeciesNumbering,
    /// Species rank each gene tree vertex maps to, indexed by [TreeIndex]
    pub(crate) gene_mapping: Vec<Rank>,
    /// Running total of vertices tagged as duplications
    pub(crate) duplications: u32,
    /// Attribute used to match leaves between the trees
    comparison_basis: ComparisonBasis,
}

impl<'a> Sdi<'a> {
    /// Creates a reconciler for the given tree pair.
    ///
    /// Verifies that both trees are non-empty and rooted, that no gene tree
    /// vertex has more than two children, that the leaves of both trees share
    /// a comparison basis, and that every gene tree leaf matches exactly one
    /// species tree leaf.
    ///
    /// # Arguments
    /// * `gene_tree` - Rooted binary gene tree, taken over and annotated
    /// * `species_tree` - Rooted species tree over the gene tree's species
    /// * `taxa` - Taxon table shared by the leaves of both trees
    pub fn new(
        gene_tree: Tree,
        species_tree: &'a Tree,
        taxa: &TaxonTable,
    ) -> Result<Self, ReconciliationError> {
        validate_tree_pair(&gene_tree, species_tree)?;
        for index in gene_tree.pre_order_indices() {
            if gene_tree[index].children().len() > 2 {
                return Err(ReconciliationError::GeneTreeNotBinary);
            }
        }

        let species_numbering = SpeciesNumbering::new(species_tree)?;
        let comparison_basis = determine_comparison_basis(&gene_tree, species_tree, taxa)?;
        let gene_mapping = initialize_leaf_mapping(
            &gene_tree,
            species_tree,
            taxa,
            &species_numbering,
            comparison_basis,
        )?;

        Ok(Sdi {
            gene_tree,
            species_tree,
            species_numbering,
            gene_mapping,
            duplications: 0,
            comparison_basis,
        })
    }

    /// Maps every gene tree vertex to a species rank and tags every inner
    /// vertex as speciation or duplication.
    ///
    /// Traverses the gene tree post-order. An inner vertex with children
    /// mapped to ranks `a` and `b` maps to their rank-walk lowest common
    /// ancestor; if its own rank equals either child's, its divergence
    /// happened within one species lineage and it is a duplication. A vertex
    /// with a single child inherits that child's mapping and does not count
    /// as a duplication.
    pub fn infer_events(&mut self) {
        let order: Vec<TreeIndex> = self.gene_tree.post_order_indices().collect();
        for index in order {
            if self.gene_tree[index].is_leaf() {
                continue;
            }

            let children = self.gene_tree[index].children().to_vec();
            let (mapping, event) = match children.as_slice() {
                [only] => (self.gene_mapping[*only], Event::Speciation),
                [left, right] => {
                    let a = self.gene_mapping[*left];
                    let b = self.gene_mapping[*right];
                    let mapping = self.species_numbering.lca_rank(self.species_tree, a, b);
                    let event = if mapping == a || mapping == b {
                        Event::Duplication
                    } else {
                        Event::Speciation
                    };
                    (mapping, event)
                }
                _ => unreachable!("Vertex arity was validated on construction"),
            };

            self.gene_mapping[index] = mapping;
            if event.is_duplication() {
                self.duplications += 1;
            }
            self.gene_tree[index].set_event(event);
        }
    }

    /// Clears all inferred events, inner mappings, and the duplication
    /// counter, so the inference pass can be re-run from a clean slate.
    /// Leaf mappings are kept; they only depend on the input taxa.
    pub fn reset(&mut self) {
        self.duplications = 0;
        for index in 0..self.gene_tree.num_vertices() {
            if !self.gene_tree[index].is_leaf() {
                self.gene_mapping[index] = NO_MAPPING;
                self.gene_tree[index].set_event(Event::Unset);
            }
        }
    }

    /// Returns the annotated gene tree.
    pub fn gene_tree(&self) -> &Tree {
        &self.gene_tree
    }

    /// Consumes the reconciler, returning the annotated gene tree.
    pub fn into_gene_tree(self) -> Tree {
        self.gene_tree
    }

    /// Returns the number of vertices currently tagged as duplications.
    pub fn duplication_count(&self) -> u32 {
        self.duplications
    }

    /// Returns the species rank the given gene tree vertex maps to, or
    /// `None` if the vertex has not been mapped yet.
    pub fn mapping_of(&self, vertex: TreeIndex) -> Option<Rank> {
        let rank = self.gene_mapping[vertex];
        (rank != NO_MAPPING).then_some(rank)
    }

    /// Returns the preorder numbering of the species tree.
    pub fn species_numbering(&self) -> &SpeciesNumbering {
        &self.species_numbering
    }

    /// Returns the attribute used to match leaves between the trees.
    pub fn comparison_basis(&self) -> ComparisonBasis {
        self.comparison_basis
    }
}

// ============================================================================
// Shared validation and initialization (crate)
// ============================================================================
/// Checks that both trees are non-empty and rooted.
pub(crate) fn validate_tree_pair(
    gene_tree: &Tree,
    species_tree: &Tree,
) -> Result<(), ReconciliationError> {
    if gene_tree.num_vertices() == 0 {
        return Err(ReconciliationError::EmptyGeneTree);
    }
    if species_tree.num_vertices() == 0 {
        return Err(ReconciliationError::EmptySpeciesTree);
    }
    if !gene_tree.is_root_set() {
        return Err(ReconciliationError::UnrootedGeneTree);
    }
    if !species_tree.is_root_set() {
        return Err(ReconciliationError::UnrootedSpeciesTree);
    }
    Ok(())
}

/// Determines which taxonomy attribute every leaf of both trees supplies,
/// checked in the priority order id, code, scientific name, common name.
pub(crate) fn determine_comparison_basis(
    gene_tree: &Tree,
    species_tree: &Tree,
    taxa: &TaxonTable,
) -> Result<ComparisonBasis, ReconciliationError> {
    let mut all_have_id = true;
    let mut all_have_code = true;
    let mut all_have_scientific = true;
    let mut all_have_common = true;

    for tree in [species_tree, gene_tree] {
        for index in tree.leaf_indices() {
            let label_index = tree[index].label_index().unwrap();
            let taxon = &taxa[label_index];
            if taxon.is_empty() {
                return Err(ReconciliationError::MissingTaxonomy);
            }
            all_have_id &= taxon.id().is_some();
            all_have_code &= taxon.code().is_some();
            all_have_scientific &= taxon.scientific_name().is_some();
            all_have_common &= taxon.common_name().is_some();
        }
    }

    if all_have_id {
        Ok(ComparisonBasis::Id)
    } else if all_have_code {
        Ok(ComparisonBasis::Code)
    } else if all_have_scientific {
        Ok(ComparisonBasis::ScientificName)
    } else if all_have_common {
        Ok(ComparisonBasis::CommonName)
    } else {
        Err(ReconciliationError::IncomparableTaxonomies)
    }
}

/// Maps every gene tree leaf to the rank of its matching species tree leaf.
///
/// Every gene leaf must match exactly one species leaf under the comparison
/// basis; a missing or ambiguous match is a configuration error.
pub(crate) fn initialize_leaf_mapping(
    gene_tree: &Tree,
    species_tree: &Tree,
    taxa: &TaxonTable,
    species_numbering: &SpeciesNumbering,
    basis: ComparisonBasis,
) -> Result<Vec<Rank>, ReconciliationError> {
    let mut species_leaf_ranks: HashMap<&str, Rank> = HashMap::new();
    for index in species_tree.leaf_indices() {
        let taxon = &taxa[species_tree[index].label_index().unwrap()];
        let key = taxon.key(basis).ok_or(ReconciliationError::MissingTaxonomy)?;
        let rank = species_numbering.rank_of(index);
        if species_leaf_ranks.insert(key, rank).is_some() {
            return Err(ReconciliationError::AmbiguousSpeciesTaxon(key.to_string()));
        }
    }

    let mut mapping = vec![NO_MAPPING; gene_tree.num_vertices()];
    for index in gene_tree.leaf_indices() {
        let taxon = &taxa[gene_tree[index].label_index().unwrap()];
        let key = taxon.key(basis).ok_or(ReconciliationError::MissingTaxonomy)?;
        let rank = species_leaf_ranks
            .get(key)
            .ok_or_else(|| ReconciliationError::TaxonNotInSpeciesTree(key.to_string()))?;
        mapping[index] = *rank;
    }

    Ok(mapping)
}
