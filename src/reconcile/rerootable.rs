//! Incremental remapping of a reconciled gene tree after rerooting.
//!
//! Moving the root of a reconciled gene tree by one candidate edge leaves
//! almost every subtree mapping intact: only the former root child that got
//! repositioned under the new root, and the root itself, need recomputation.
//! This makes evaluating many rootings far cheaper than reconciling each
//! rooting from scratch.

use crate::model::taxon::TaxonTable;
use crate::model::tree::{Tree, TreeIndex};
use crate::model::vertex::Event;
use crate::reconcile::error::ReconciliationError;
use crate::reconcile::sdi::Sdi;
use crate::reconcile::species_numbering::Rank;

// =#========================================================================#=
// REROOTABLE SDI
// =#========================================================================#=
/// Binary speciation/duplication inference that can follow a gene tree
/// through a sequence of reroots.
///
/// Run [infer_events](RerootableSdi::infer_events) once; afterwards,
/// alternate between rerooting the gene tree (via
/// [gene_tree_mut](RerootableSdi::gene_tree_mut) and
/// [Tree::reroot_above]) and calling
/// [update_after_reroot](RerootableSdi::update_after_reroot), which patches
/// the mapping instead of recomputing it.
pub struct RerootableSdi<'a> {
    sdi: Sdi<'a>,
}

impl<'a> RerootableSdi<'a> {
    /// Creates a rerootable reconciler; preconditions as
    /// [Sdi::new](crate::reconcile::sdi::Sdi::new).
    pub fn new(
        gene_tree: Tree,
        species_tree: &'a Tree,
        taxa: &TaxonTable,
    ) -> Result<Self, ReconciliationError> {
        Ok(RerootableSdi {
            sdi: Sdi::new(gene_tree, species_tree, taxa)?,
        })
    }

    /// Runs the full inference pass; see
    /// [Sdi::infer_events](crate::reconcile::sdi::Sdi::infer_events).
    pub fn infer_events(&mut self) {
        self.sdi.infer_events();
    }

    /// Patches mapping and events after the gene tree was rerooted by one
    /// candidate edge, returning the updated duplication total.
    ///
    /// Of the two former root children, the one that ended up as a child of
    /// the new root had its children changed by the reroot and is recomputed;
    /// the other kept its entire subtree and is left alone. The root itself
    /// first inherits the relocated old root's event - rerooting never changes
    /// that classification - and is then recomputed against its new children.
    ///
    /// The duplication counter moves only on event flips: +1 when a vertex
    /// newly becomes a duplication, -1 when a formerly counted duplication
    /// reverts to a speciation.
    ///
    /// # Arguments
    /// * `prev_root_was_duplication` - Event of the root before the reroot
    /// * `prev_root_c1` - First child of the root before the reroot
    /// * `prev_root_c2` - Second child of the root before the reroot
    pub fn update_after_reroot(
        &mut self,
        prev_root_was_duplication: bool,
        prev_root_c1: TreeIndex,
        prev_root_c2: TreeIndex,
    ) -> u32 {
        let root = self.sdi.gene_tree.root_index();

        if self.sdi.gene_tree[root].children().contains(&prev_root_c1) {
            self.recalculate_vertex(prev_root_c1);
        } else {
            self.recalculate_vertex(prev_root_c2);
        }

        let inherited = if prev_root_was_duplication {
            Event::Duplication
        } else {
            Event::Speciation
        };
        self.sdi.gene_tree[root].set_event(inherited);
        self.recalculate_vertex(root);

        self.sdi.duplications
    }

    /// Recomputes mapping and event of a single inner vertex by the
    /// LCA-of-children rule, adjusting the duplication counter on flips.
    fn recalculate_vertex(&mut self, vertex: TreeIndex) {
        if self.sdi.gene_tree[vertex].is_leaf() {
            return;
        }
        let was_duplication = self.sdi.gene_tree[vertex].event().is_duplication();

        let children = self.sdi.gene_tree[vertex].children().to_vec();
        debug_assert!(children.len() == 2, "rerooted gene tree must stay binary");
        let a = self.sdi.gene_mapping[children[0]];
        let b = self.sdi.gene_mapping[children[1]];
        let mapping = self
            .sdi
            .species_numbering
            .lca_rank(self.sdi.species_tree, a, b);
        self.sdi.gene_mapping[vertex] = mapping;

        let event = if mapping == a || mapping == b {
            Event::Duplication
        } else {
            Event::Speciation
        };
        self.sdi.gene_tree[vertex].set_event(event);

        match (event.is_duplication(), was_duplication) {
            (true, false) => self.sdi.duplications += 1,
            (false, true) => self.sdi.duplications -= 1,
            _ => {}
        }
    }

    /// Returns the annotated gene tree.
    pub fn gene_tree(&self) -> &Tree {
        self.sdi.gene_tree()
    }

    /// Returns the gene tree for rerooting between incremental updates.
    ///
    /// Intended for [Tree::reroot_above] only; structural changes other than
    /// rerooting invalidate the maintained mapping.
    pub fn gene_tree_mut(&mut self) -> &mut Tree {
        &mut self.sdi.gene_tree
    }

    /// Consumes the reconciler, returning the annotated gene tree.
    pub fn into_gene_tree(self) -> Tree {
        self.sdi.into_gene_tree()
    }

    /// Returns the number of vertices currently tagged as duplications.
    pub fn duplication_count(&self) -> u32 {
        self.sdi.duplication_count()
    }

    /// Returns the species rank the given gene tree vertex maps to, or
    /// `None` if the vertex has not been mapped yet.
    pub fn mapping_of(&self, vertex: TreeIndex) -> Option<Rank> {
        self.sdi.mapping_of(vertex)
    }
}
