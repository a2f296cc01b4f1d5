use phylorec::model::taxon::{ComparisonBasis, Taxon, TaxonTable};

// ============= Taxon Tests =============

#[test]
fn test_taxon_attributes() {
    let kakapo = Taxon::new()
        .with_id("2489341")
        .with_code("STRHA")
        .with_scientific_name("Strigops habroptilus")
        .with_common_name("kakapo");

    assert_eq!(kakapo.id(), Some("2489341"));
    assert_eq!(kakapo.code(), Some("STRHA"));
    assert_eq!(kakapo.scientific_name(), Some("Strigops habroptilus"));
    assert_eq!(kakapo.common_name(), Some("kakapo"));
    assert!(!kakapo.is_empty());
}

#[test]
fn test_empty_taxon() {
    let taxon = Taxon::new();
    assert!(taxon.is_empty());
    assert_eq!(taxon.display_label(), None);
}

#[test]
fn test_taxon_key_follows_basis() {
    let taxon = Taxon::new().with_id("42").with_common_name("kea");

    assert_eq!(taxon.key(ComparisonBasis::Id), Some("42"));
    assert_eq!(taxon.key(ComparisonBasis::Code), None);
    assert_eq!(taxon.key(ComparisonBasis::ScientificName), None);
    assert_eq!(taxon.key(ComparisonBasis::CommonName), Some("kea"));
}

#[test]
fn test_display_label_priority() {
    let full = Taxon::new()
        .with_id("1")
        .with_code("NESNO")
        .with_scientific_name("Nestor notabilis")
        .with_common_name("kea");
    assert_eq!(full.display_label(), Some("Nestor notabilis"));

    let code_only = Taxon::new().with_code("NESNO").with_id("1");
    assert_eq!(code_only.display_label(), Some("NESNO"));

    let common_only = Taxon::new().with_common_name("kea");
    assert_eq!(common_only.display_label(), Some("kea"));
}

// ============= TaxonTable Tests =============

#[test]
fn test_get_or_insert_new_taxon() {
    let mut taxa = TaxonTable::new(5);
    let index_wrybill = taxa.get_or_insert(Taxon::from_scientific_name("Anarhynchus frontalis"));
    assert_eq!(index_wrybill, 0);
    assert!(taxa.contains(&Taxon::from_scientific_name("Anarhynchus frontalis")));
}

#[test]
fn test_get_or_insert_increments_index() {
    let mut taxa = TaxonTable::new(5);
    let index_kaki = taxa.get_or_insert(Taxon::from_scientific_name("Himantopus novaezelandiae"));
    let index_pied = taxa.get_or_insert(Taxon::from_scientific_name("Himantopus leucocephalus"));
    assert_eq!(index_kaki, 0);
    assert_eq!(index_pied, 1);
    assert_eq!(taxa.num_taxa(), 2);
}

#[test]
fn test_get_or_insert_returns_same_index_for_duplicate() {
    let mut taxa = TaxonTable::new(5);
    let index_kakapo = taxa.get_or_insert(Taxon::from_scientific_name("Strigops habroptilus"));
    let index_kea = taxa.get_or_insert(Taxon::from_scientific_name("Nestor notabilis"));
    let index_kaka = taxa.get_or_insert(Taxon::from_scientific_name("Nestor meridionalis"));
    let index_popoka = taxa.get_or_insert(Taxon::from_scientific_name("Strigops habroptilus"));

    assert_eq!(index_kakapo, index_popoka);
    assert_ne!(index_kakapo, index_kea);
    assert_ne!(index_kakapo, index_kaka);
    assert_eq!(taxa.num_taxa(), 3);
}

#[test]
fn test_records_with_different_attributes_are_distinct() {
    let mut taxa = TaxonTable::new(5);
    let by_name = taxa.get_or_insert(Taxon::from_scientific_name("Nestor notabilis"));
    let with_code = taxa.get_or_insert(
        Taxon::from_scientific_name("Nestor notabilis").with_code("NESNO"),
    );

    assert_ne!(by_name, with_code);
    assert_eq!(taxa.num_taxa(), 2);
}

#[test]
fn test_get_returns_record() {
    let mut taxa = TaxonTable::new(5);
    let index_rock_wren = taxa.get_or_insert(Taxon::from_scientific_name("Xenicus gilviventris"));

    let record = taxa.get(index_rock_wren).unwrap();
    assert_eq!(record.scientific_name(), Some("Xenicus gilviventris"));
    assert_eq!(taxa.get(17), None);
}

#[test]
fn test_get_index_and_taxa() {
    let mut taxa = TaxonTable::new(2);
    let takahe = Taxon::from_scientific_name("Porphyrio hochstetteri");
    let index = taxa.get_or_insert(takahe.clone());

    assert_eq!(taxa.get_index(&takahe), Some(index));
    assert_eq!(taxa.get_index(&Taxon::from_scientific_name("Porphyrio melanotus")), None);
    assert_eq!(taxa.taxa().len(), 1);
}

#[test]
fn test_is_full() {
    let mut taxa = TaxonTable::new(2);
    assert!(!taxa.is_full());
    taxa.get_or_insert(Taxon::from_scientific_name("A"));
    taxa.get_or_insert(Taxon::from_scientific_name("B"));
    assert!(taxa.is_full());
}
