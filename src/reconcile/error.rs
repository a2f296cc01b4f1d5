//! Error type for reconciliation preconditions.
//!
//! All reconciliation failures are configuration errors in the input trees
//! or their taxa, surfaced by the constructors before any computation runs.
//! The algorithms themselves are pure in-memory computations without
//! transient failure modes.

use std::error::Error;
use std::fmt;

// =#========================================================================#=
// RECONCILIATION ERROR
// =#========================================================================#=
/// Errors raised when a gene tree / species tree pair cannot be reconciled.
#[derive(PartialEq, Debug, Clone)]
pub enum ReconciliationError {
    /// The gene tree has no vertices
    EmptyGeneTree,
    /// The species tree has no vertices
    EmptySpeciesTree,
    /// The gene tree has no root
    UnrootedGeneTree,
    /// The species tree has no root
    UnrootedSpeciesTree,
    /// The gene tree has a vertex with more children than the algorithm supports
    GeneTreeNotBinary,
    /// The species tree has a non-binary vertex where a binary one is required
    SpeciesTreeNotBinary,
    /// A gene tree leaf's taxon has no counterpart among the species tree leaves
    TaxonNotInSpeciesTree(String),
    /// Two species tree leaves carry the same comparison key
    AmbiguousSpeciesTaxon(String),
    /// A leaf carries no taxonomic information at all
    MissingTaxonomy,
    /// The leaves of the two trees share no common taxonomy attribute
    IncomparableTaxonomies,
}

impl fmt::Display for ReconciliationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ReconciliationError::EmptyGeneTree => {
                write!(f, "Gene tree must be non-empty")
            }
            ReconciliationError::EmptySpeciesTree => {
                write!(f, "Species tree must be non-empty")
            }
            ReconciliationError::UnrootedGeneTree => {
                write!(f, "Gene tree must be rooted")
            }
            ReconciliationError::UnrootedSpeciesTree => {
                write!(f, "Species tree must be rooted")
            }
            ReconciliationError::GeneTreeNotBinary => {
                write!(f, "Gene tree must be completely binary")
            }
            ReconciliationError::SpeciesTreeNotBinary => {
                write!(f, "Species tree must be completely binary")
            }
            ReconciliationError::TaxonNotInSpeciesTree(key) => {
                write!(
                    f,
                    "Taxon '{key}' of the gene tree is not represented in the species tree"
                )
            }
            ReconciliationError::AmbiguousSpeciesTaxon(key) => {
                write!(f, "Taxon '{key}' matches more than one species tree leaf")
            }
            ReconciliationError::MissingTaxonomy => {
                write!(f, "Tree leaf has no taxonomic information")
            }
            ReconciliationError::IncomparableTaxonomies => {
                write!(
                    f,
                    "Gene and species tree leaves share no common taxonomy attribute"
                )
            }
        }
    }
}

impl Error for ReconciliationError {}
