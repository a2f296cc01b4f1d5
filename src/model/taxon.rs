//! Taxonomic records for tree leaves.
//!
//! - `Taxon`: identifying attributes of a species, attached to leaves.
//! - `TaxonTable`: joined storage and lookup for taxa of trees on the same species.
//! - `ComparisonBasis`: which attribute is used to match leaves between trees.

use crate::model::tree::LabelIndex;
use std::collections::HashMap;
use std::fmt;

// =#========================================================================#=
// TAXON
// =#========================================================================#=
/// Taxonomic record of a species, with up to four identifying attributes.
///
/// Any subset of the attributes may be present. Which one is used to match
/// leaves between a gene tree and a species tree is decided per
/// reconciliation run (see [ComparisonBasis]).
///
/// # Example
/// ```
/// use phylorec::model::taxon::Taxon;
///
/// let kea = Taxon::new()
///     .with_code("NESNO")
///     .with_scientific_name("Nestor notabilis")
///     .with_common_name("kea");
///
/// assert_eq!(kea.scientific_name(), Some("Nestor notabilis"));
/// assert_eq!(kea.id(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Taxon {
    /// Taxonomy identifier, e.g. an NCBI taxonomy id
    id: Option<String>,
    /// Short mnemonic code, e.g. a UniProt species code
    code: Option<String>,
    /// Scientific (binomial) name
    scientific_name: Option<String>,
    /// Common name
    common_name: Option<String>,
}

impl Taxon {
    /// Creates a taxon without any attribute set.
    pub fn new() -> Self {
        Taxon::default()
    }

    /// Creates a taxon identified by scientific name only.
    pub fn from_scientific_name(name: &str) -> Self {
        Taxon::new().with_scientific_name(name)
    }

    /// Sets the taxonomy identifier of this taxon.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Sets the short code of this taxon.
    pub fn with_code(mut self, code: &str) -> Self {
        self.code = Some(code.to_string());
        self
    }

    /// Sets the scientific name of this taxon.
    pub fn with_scientific_name(mut self, name: &str) -> Self {
        self.scientific_name = Some(name.to_string());
        self
    }

    /// Sets the common name of this taxon.
    pub fn with_common_name(mut self, name: &str) -> Self {
        self.common_name = Some(name.to_string());
        self
    }

    /// Returns the taxonomy identifier, if set.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the short code, if set.
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Returns the scientific name, if set.
    pub fn scientific_name(&self) -> Option<&str> {
        self.scientific_name.as_deref()
    }

    /// Returns the common name, if set.
    pub fn common_name(&self) -> Option<&str> {
        self.common_name.as_deref()
    }

    /// Returns `true` if no attribute is set at all.
    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.code.is_none()
            && self.scientific_name.is_none()
            && self.common_name.is_none()
    }

    /// Returns the attribute selected by `basis`, if present.
    pub fn key(&self, basis: ComparisonBasis) -> Option<&str> {
        match basis {
            ComparisonBasis::Id => self.id(),
            ComparisonBasis::Code => self.code(),
            ComparisonBasis::ScientificName => self.scientific_name(),
            ComparisonBasis::CommonName => self.common_name(),
        }
    }

    /// Returns the best available human-readable label:
    /// scientific name, code, id, or common name, whichever is set first.
    pub fn display_label(&self) -> Option<&str> {
        self.scientific_name()
            .or(self.code())
            .or(self.id())
            .or(self.common_name())
    }
}

// =#========================================================================#=
// COMPARISON BASIS
// =#========================================================================#=
/// Attribute used to test equality between a gene tree leaf and a species
/// tree leaf.
///
/// The basis is fixed once per reconciliation run by inspecting which
/// attribute *every* leaf of both trees supplies, checked in the priority
/// order id, code, scientific name, common name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonBasis {
    /// Match by taxonomy identifier
    Id,
    /// Match by short code
    Code,
    /// Match by scientific name
    ScientificName,
    /// Match by common name
    CommonName,
}

// =#========================================================================#=
// TAXON TABLE
// =#========================================================================#=
/// Maps taxon records to compact indices for efficient storage.
///
/// This bidirectional mapping allows multiple trees over the same species
/// (notably a gene tree and a species tree) to share a single taxon storage,
/// with each leaf referencing its taxon by [LabelIndex]. Records are
/// deduplicated automatically - inserting the same taxon twice returns the
/// same index.
///
/// # Example
/// ```
/// use phylorec::model::taxon::{Taxon, TaxonTable};
///
/// let mut taxa = TaxonTable::new(3);
///
/// let idx_a = taxa.get_or_insert(Taxon::from_scientific_name("Apteryx owenii"));
/// let idx_b = taxa.get_or_insert(Taxon::from_scientific_name("Apteryx haastii"));
/// let idx_a2 = taxa.get_or_insert(Taxon::from_scientific_name("Apteryx owenii"));
///
/// assert_eq!(idx_a, idx_a2);
/// assert_ne!(idx_a, idx_b);
/// assert_eq!(taxa.num_taxa(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct TaxonTable {
    /// Expected number of unique taxa
    capacity: usize,
    /// List of unique taxon records
    taxa: Vec<Taxon>,
    /// Map from record to its index
    map: HashMap<Taxon, usize>,
}

impl TaxonTable {
    /// Creates a new TaxonTable with pre-allocated capacity.
    ///
    /// # Arguments
    /// * `capacity` - Expected number of unique taxa
    pub fn new(capacity: usize) -> Self {
        TaxonTable {
            capacity,
            taxa: Vec::with_capacity(capacity),
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Gets the index for a taxon, inserting it if it doesn't exist.
    ///
    /// If an equal record already exists, returns its existing index.
    /// If the record is new, assigns it the next available index.
    ///
    /// # Arguments
    /// * `taxon` - The taxon record to look up or insert
    ///
    /// # Returns
    /// The index associated with this taxon
    pub fn get_or_insert(&mut self, taxon: Taxon) -> LabelIndex {
        if let Some(&index) = self.map.get(&taxon) {
            index
        } else {
            let index = self.taxa.len();
            self.taxa.push(taxon.clone());
            self.map.insert(taxon, index);

            index
        }
    }

    /// Retrieves the index for a given taxon record.
    ///
    /// # Returns
    /// `Some(index)` if the record exists, `None` otherwise
    pub fn get_index(&self, taxon: &Taxon) -> Option<LabelIndex> {
        self.map.get(taxon).copied()
    }

    /// Retrieves the taxon for a given index.
    ///
    /// # Returns
    /// `Some(&Taxon)` if the index is valid, `None` otherwise
    pub fn get(&self, index: LabelIndex) -> Option<&Taxon> {
        self.taxa.get(index)
    }

    /// Checks if a taxon record exists in the table.
    pub fn contains(&self, taxon: &Taxon) -> bool {
        self.map.contains_key(taxon)
    }

    /// Returns the number of taxa currently stored.
    pub fn num_taxa(&self) -> usize {
        self.taxa.len()
    }

    /// Returns whether the table has reached its expected capacity.
    pub fn is_full(&self) -> bool {
        self.capacity == self.map.len()
    }

    /// Returns reference to the taxa in this table.
    pub fn taxa(&self) -> &[Taxon] {
        &self.taxa
    }
}

impl fmt::Display for TaxonTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "TaxonTable ({}/{} taxa):", self.taxa.len(), self.capacity)?;
        for (index, taxon) in self.taxa.iter().enumerate() {
            writeln!(f, "  [{}] {}", index, taxon.display_label().unwrap_or("?"))?;
        }
        Ok(())
    }
}

impl std::ops::Index<LabelIndex> for TaxonTable {
    type Output = Taxon;

    fn index(&self, index: LabelIndex) -> &Self::Output {
        &self.taxa[index]
    }
}
