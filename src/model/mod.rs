//! Data model for phylogenetic trees and their taxa.
//!
//! # Tree representation
//! Trees are represented by [Tree], which uses the arena pattern to store
//! [Vertex] nodes. Each vertex is either a `Root`, `Internal`, or `Leaf`,
//! referenced by [TreeIndex]. Children are kept as lists, so gene trees with
//! multifurcating vertices are representable next to the common binary case.
//!
//! # Taxon handling
//! Leaves reference a [Taxon] record in a shared [TaxonTable] by
//! [LabelIndex]; a gene tree and the species tree it is reconciled against
//! are expected to share one table. Leaf matching between the two trees is
//! governed by a [ComparisonBasis].

pub mod taxon;
pub mod tree;
pub mod vertex;

pub use taxon::{ComparisonBasis, Taxon, TaxonTable};
pub use tree::{LabelIndex, Tree, TreeIndex};
pub use vertex::{BranchLength, Event, Vertex};
