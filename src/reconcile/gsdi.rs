//! Speciation/duplication inference for multifurcating gene trees (GSDI).
//!
//! Generalizes the binary inference to gene tree vertices with arbitrary
//! child counts. With more than two child lineages, equality of the vertex's
//! mapping with a child's mapping no longer separates duplication from
//! speciation; per-species traversal counters track how many extra lineages
//! passed through each species vertex and decide the event instead.
//!
//! The classification mirrors the generalized inference of the forester
//! library; the branch taken when fewer than two traversals accumulate
//! follows that reference implementation and has not been independently
//! verified.

use crate::model::taxon::{ComparisonBasis, TaxonTable};
use crate::model::tree::{Tree, TreeIndex};
use crate::model::vertex::Event;
use crate::reconcile::error::ReconciliationError;
use crate::reconcile::sdi::{
    determine_comparison_basis, initialize_leaf_mapping, validate_tree_pair,
};
use crate::reconcile::species_numbering::{NO_MAPPING, Rank, SpeciesNumbering};

// =#========================================================================#=
// GSDI
// =#========================================================================#=
/// Generalized speciation/duplication inference on a rooted gene tree whose
/// vertices may have more than two children.
///
/// Ownership and lifecycle match [Sdi](crate::reconcile::sdi::Sdi): the gene
/// tree is taken over and annotated in place, the species tree and taxon
/// table are shared read-only, and all preconditions are validated on
/// construction. Traversal counts are fresh state per inference run, never
/// carried over between runs.
pub struct Gsdi<'a> {
    /// Gene tree under reconciliation, annotated in place
    gene_tree: Tree,
    /// Species tree, read-only
    species_tree: &'a Tree,
    /// Preorder numbering of the species tree
    species_numbering: SpeciesNumbering,
    /// Species rank each gene tree vertex maps to, indexed by [TreeIndex]
    gene_mapping: Vec<Rank>,
    /// Running total of vertices tagged as duplications
    duplications: u32,
    /// Traversal counts of the last run, indexed by species [TreeIndex]
    traversal_counts: Vec<u32>,
    /// Attribute used to match leaves between the trees
    comparison_basis: ComparisonBasis,
}

impl<'a> Gsdi<'a> {
    /// Creates a reconciler for the given tree pair.
    ///
    /// Verifies that both trees are non-empty and rooted, that the leaves of
    /// both trees share a comparison basis, and that every gene tree leaf
    /// matches exactly one species tree leaf. Unlike the binary reconciler,
    /// any vertex arity is accepted.
    pub fn new(
        gene_tree: Tree,
        species_tree: &'a Tree,
        taxa: &TaxonTable,
    ) -> Result<Self, ReconciliationError> {
        validate_tree_pair(&gene_tree, species_tree)?;

        let species_numbering = SpeciesNumbering::new(species_tree)?;
        let comparison_basis = determine_comparison_basis(&gene_tree, species_tree, taxa)?;
        let gene_mapping = initialize_leaf_mapping(
            &gene_tree,
            species_tree,
            taxa,
            &species_numbering,
            comparison_basis,
        )?;

        Ok(Gsdi {
            gene_tree,
            species_tree,
            species_numbering,
            gene_mapping,
            duplications: 0,
            traversal_counts: Vec::new(),
            comparison_basis,
        })
    }

    /// Maps every gene tree vertex to a species rank and tags every inner
    /// vertex as speciation or duplication.
    ///
    /// For a vertex with children mapped to ranks `r_1..r_k`, the currently
    /// largest rank in the set is repeatedly replaced by its parent's rank,
    /// counting a traversal against the species vertex being lifted, until
    /// all ranks converge. The converged rank is the vertex's mapping; the
    /// event is then read off the traversal counts of the mapped species
    /// vertex's children.
    pub fn infer_events(&mut self) {
        let mut counts = vec![0u32; self.species_tree.num_vertices()];

        let order: Vec<TreeIndex> = self.gene_tree.post_order_indices().collect();
        for index in order {
            if self.gene_tree[index].is_leaf() {
                continue;
            }

            let children = self.gene_tree[index].children().to_vec();
            let mapping = self.converge_child_ranks(&children, &mut counts);
            self.gene_mapping[index] = mapping;

            let event = self.classify(mapping, &children, &mut counts);
            if event.is_duplication() {
                self.duplications += 1;
            }
            self.gene_tree[index].set_event(event);
        }

        self.traversal_counts = counts;
    }

    /// Lifts the children's ranks to their common ancestor rank, counting
    /// traversals against every species vertex passed through.
    fn converge_child_ranks(&self, children: &[TreeIndex], counts: &mut [u32]) -> Rank {
        let mut values: Vec<Rank> = children
            .iter()
            .map(|&child| self.gene_mapping[child])
            .collect();

        loop {
            let max = *values.iter().max().unwrap();
            let min = *values.iter().min().unwrap();
            if max == min {
                return max;
            }

            counts[self.species_numbering.vertex_at(max)] += 1;
            let position = values.iter().position(|&value| value == max).unwrap();
            values[position] = self.species_numbering.parent_rank(self.species_tree, max);
        }
    }

    /// Decides the event of a gene tree vertex mapped to `mapping` from the
    /// traversal counts accumulated below that species vertex.
    fn classify(&self, mapping: Rank, children: &[TreeIndex], counts: &mut [u32]) -> Event {
        let direct_children = children
            .iter()
            .filter(|&&child| self.gene_mapping[child] == mapping)
            .count();

        let species_vertex = self.species_numbering.vertex_at(mapping);
        let mut traversals_sum = 0u32;
        let mut max_traversals = 0u32;
        let mut max_traversals_vertex = None;
        for &species_child in self.species_tree[species_vertex].children() {
            let traversals = counts[species_child];
            traversals_sum += traversals;
            if traversals > max_traversals {
                max_traversals = traversals;
                max_traversals_vertex = Some(species_child);
            }
        }

        if direct_children == 0 {
            return Event::Speciation;
        }

        if traversals_sum == 2 {
            Event::Duplication
        } else if traversals_sum > 2 {
            if max_traversals <= 1 {
                Event::Speciation
            } else {
                // Re-seed the dominating lineage so deeper reuse starts over.
                counts[max_traversals_vertex.unwrap()] = 1;
                Event::Duplication
            }
        } else {
            Event::Duplication
        }
    }

    /// Clears all inferred events, inner mappings, traversal counts, and the
    /// duplication counter, so the inference pass can be re-run from a clean
    /// slate. Leaf mappings are kept; they only depend on the input taxa.
    pub fn reset(&mut self) {
        self.duplications = 0;
        self.traversal_counts.clear();
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

    /// Returns the traversal counts of the last inference run, indexed by
    /// species tree vertex. Empty before the first run.
    pub fn traversal_counts(&self) -> &[u32] {
        &self.traversal_counts
    }

    /// Returns the attribute used to match leaves between the trees.
    pub fn comparison_basis(&self) -> ComparisonBasis {
        self.comparison_basis
    }
}
