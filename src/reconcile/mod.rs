//! Gene tree / species tree reconciliation.
//!
//! Explains the shape of a gene family tree against the species tree of the
//! organisms it was sampled from: every inner gene tree vertex is mapped to
//! the species lineage its clade traces back to, and tagged as a speciation
//! (gene divergence at a species split) or a gene duplication (divergence
//! within one species lineage). Based on the SDI algorithm of Zmasek & Eddy
//! (2001), Bioinformatics 17(9):821-828.
//!
//! # Components
//! - [SpeciesNumbering]: preorder ranks over the species tree, enabling
//!   lowest-common-ancestor queries by rank walking alone.
//! - [Sdi]: inference for rooted binary gene trees.
//! - [Gsdi]: generalized inference for multifurcating gene trees, using
//!   traversal counters.
//! - [RerootableSdi]: patches an existing reconciliation after the gene tree
//!   was rerooted by one edge, instead of recomputing it.
//! - [Sdir]: searches all rootings of a gene tree for those minimizing the
//!   duplication count, driving [RerootableSdi] along a preorder walk.
//!
//! All components are synchronous and run to completion; the species tree
//! and the shared [TaxonTable](crate::model::TaxonTable) are only ever read.

pub mod error;
pub mod gsdi;
pub mod rerootable;
pub mod sdi;
pub mod sdir;
pub mod species_numbering;

pub use error::ReconciliationError;
pub use gsdi::Gsdi;
pub use rerootable::RerootableSdi;
pub use sdi::Sdi;
pub use sdir::{RootingResult, Sdir};
pub use species_numbering::{Rank, SpeciesNumbering};
