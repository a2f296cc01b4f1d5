use phylorec::model::taxon::{ComparisonBasis, Taxon, TaxonTable};
use phylorec::model::tree::Tree;
use phylorec::model::vertex::Event;
use phylorec::reconcile::gsdi::Gsdi;
use phylorec::reconcile::sdi::Sdi;

fn taxon(name: &str) -> Taxon {
    Taxon::from_scientific_name(name)
}

/// ((A,B),C); with A=0, B=1, C=2, ab=3, root=4.
/// Preorder ranks: root=1, ab=2, A=3, B=4, C=5.
fn three_species_tree(taxa: &mut TaxonTable) -> Tree {
    let mut tree = Tree::new(3);
    let a = tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let c = tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let ab = tree.add_internal_vertex(vec![a, b], None);
    tree.add_root(vec![ab, c]);
    tree
}

// ============= Multifurcation Tests =============

#[test]
fn test_trifurcating_vertex_at_species_split() {
    let mut taxa = TaxonTable::new(3);
    let species_tree = three_species_tree(&mut taxa);

    // Unresolved gene tree (A,B,C); all three lineages converge on the root.
    let mut gene_tree = Tree::new(3);
    let a = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let c = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let root = gene_tree.add_root(vec![a, b, c]);

    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    assert_eq!(gsdi.comparison_basis(), ComparisonBasis::ScientificName);
    gsdi.infer_events();

    assert_eq!(gsdi.duplication_count(), 0);
    assert_eq!(gsdi.gene_tree().vertex(root).event(), Event::Speciation);
    assert_eq!(gsdi.mapping_of(root), Some(1));

    // One traversal per leaf lineage, two through the inner species vertex.
    assert_eq!(gsdi.traversal_counts(), &[1, 1, 1, 2, 0]);
}

#[test]
fn test_duplication_with_counter_reseed() {
    let mut taxa = TaxonTable::new(3);
    let species_tree = three_species_tree(&mut taxa);

    // ((A,B),(A,C)); - the root joins two lineages of the (A,B) ancestor.
    let mut gene_tree = Tree::new(4);
    let a1 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let a2 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let c = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let left = gene_tree.add_internal_vertex(vec![a1, b], None);
    let right = gene_tree.add_internal_vertex(vec![a2, c], None);
    let root = gene_tree.add_root(vec![left, right]);

    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    gsdi.infer_events();

    assert_eq!(gsdi.duplication_count(), 1);
    assert_eq!(gsdi.gene_tree().vertex(left).event(), Event::Speciation);
    assert_eq!(gsdi.gene_tree().vertex(right).event(), Event::Speciation);
    assert_eq!(gsdi.gene_tree().vertex(root).event(), Event::Duplication);

    assert_eq!(gsdi.mapping_of(left), Some(2));
    assert_eq!(gsdi.mapping_of(right), Some(1));
    assert_eq!(gsdi.mapping_of(root), Some(1));

    // The dominating lineage through the (A,B) species vertex was re-seeded.
    assert_eq!(gsdi.traversal_counts(), &[2, 1, 1, 1, 0]);
}

#[test]
fn test_unresolved_species_vertex_yields_speciation() {
    let mut taxa = TaxonTable::new(3);

    // Multifurcating species tree (A,B,C); - an unresolved radiation.
    let mut species_tree = Tree::new(3);
    let s_a = species_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let s_b = species_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let s_c = species_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    species_tree.add_root(vec![s_a, s_b, s_c]);

    // ((A,B),C); resolved gene tree under the unresolved radiation.
    let mut gene_tree = Tree::new(3);
    let a = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let c = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let ab = gene_tree.add_internal_vertex(vec![a, b], None);
    let root = gene_tree.add_root(vec![ab, c]);

    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    gsdi.infer_events();

    // No single species lineage is traversed twice, so the gene tree's
    // resolution is not evidence of a duplication.
    assert_eq!(gsdi.duplication_count(), 0);
    assert_eq!(gsdi.gene_tree().vertex(ab).event(), Event::Speciation);
    assert_eq!(gsdi.gene_tree().vertex(root).event(), Event::Speciation);
    assert_eq!(gsdi.traversal_counts(), &[1, 1, 1, 0]);
}

// ============= Binary Agreement Tests =============

#[test]
fn test_agrees_with_binary_inference_on_concordant_trees() {
    let mut taxa = TaxonTable::new(3);
    let species_tree = three_species_tree(&mut taxa);
    let gene_tree = three_species_tree(&mut taxa);

    let mut sdi = Sdi::new(gene_tree.clone(), &species_tree, &taxa).unwrap();
    sdi.infer_events();
    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    gsdi.infer_events();

    assert_eq!(gsdi.duplication_count(), sdi.duplication_count());
    for index in 0..gsdi.gene_tree().num_vertices() {
        assert_eq!(
            gsdi.gene_tree().vertex(index).event(),
            sdi.gene_tree().vertex(index).event()
        );
        assert_eq!(gsdi.mapping_of(index), sdi.mapping_of(index));
    }
}

#[test]
fn test_agrees_with_binary_inference_on_duplicated_gene() {
    let mut taxa = TaxonTable::new(2);
    let mut species_tree = Tree::new(2);
    let s_a = species_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let s_b = species_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    species_tree.add_root(vec![s_a, s_b]);

    // ((A,A),B);
    let mut gene_tree = Tree::new(3);
    let a1 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let a2 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let duplicated = gene_tree.add_internal_vertex(vec![a1, a2], None);
    let root = gene_tree.add_root(vec![duplicated, b]);

    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    gsdi.infer_events();

    assert_eq!(gsdi.duplication_count(), 1);
    assert_eq!(gsdi.gene_tree().vertex(duplicated).event(), Event::Duplication);
    assert_eq!(gsdi.gene_tree().vertex(root).event(), Event::Speciation);
}

#[test]
fn test_quick_api_multifurcating() {
    let mut taxa = TaxonTable::new(3);
    let species_tree = three_species_tree(&mut taxa);

    let mut gene_tree = Tree::new(3);
    let a = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let c = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let root = gene_tree.add_root(vec![a, b, c]);

    let (annotated, duplications) =
        phylorec::infer_events_multifurcating(gene_tree, &species_tree, &taxa).unwrap();

    assert_eq!(duplications, 0);
    assert_eq!(annotated.vertex(root).event(), Event::Speciation);
}

// ============= Run State Tests =============

#[test]
fn test_reset_and_rerun_reproduces_results() {
    let mut taxa = TaxonTable::new(3);
    let species_tree = three_species_tree(&mut taxa);

    let mut gene_tree = Tree::new(4);
    let a1 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let b = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("B")));
    let a2 = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("A")));
    let c = gene_tree.add_leaf(None, taxa.get_or_insert(taxon("C")));
    let left = gene_tree.add_internal_vertex(vec![a1, b], None);
    let right = gene_tree.add_internal_vertex(vec![a2, c], None);
    gene_tree.add_root(vec![left, right]);

    let mut gsdi = Gsdi::new(gene_tree, &species_tree, &taxa).unwrap();
    gsdi.infer_events();

    let first_count = gsdi.duplication_count();
    let first_traversals = gsdi.traversal_counts().to_vec();
    let first_events: Vec<Event> = (0..gsdi.gene_tree().num_vertices())
        .map(|index| gsdi.gene_tree().vertex(index).event())
        .collect();

    gsdi.reset();
    assert_eq!(gsdi.duplication_count(), 0);
    assert!(gsdi.traversal_counts().is_empty());

    gsdi.infer_events();

    assert_eq!(gsdi.duplication_count(), first_count);
    assert_eq!(gsdi.traversal_counts(), first_traversals.as_slice());
    for index in 0..gsdi.gene_tree().num_vertices() {
        assert_eq!(gsdi.gene_tree().vertex(index).event(), first_events[index]);
    }
}
