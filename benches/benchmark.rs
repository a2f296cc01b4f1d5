use criterion::{Criterion, criterion_group, criterion_main};
use phylorec::model::taxon::{Taxon, TaxonTable};
use phylorec::model::tree::Tree;
use phylorec::reconcile::sdi::Sdi;
use phylorec::reconcile::sdir::Sdir;
use std::hint::black_box;

const INFERENCE_LEAVES: usize = 256;
const SEARCH_LEAVES: usize = 64;

/// Caterpillar tree (((T000,T001),T002),...) over shared taxa.
fn caterpillar(num_leaves: usize, taxa: &mut TaxonTable) -> Tree {
    let mut tree = Tree::new(num_leaves);
    let mut spine = tree.add_leaf(
        None,
        taxa.get_or_insert(Taxon::from_scientific_name("T000")),
    );
    for leaf_number in 1..num_leaves {
        let name = format!("T{:03}", leaf_number);
        let leaf = tree.add_leaf(None, taxa.get_or_insert(Taxon::from_scientific_name(&name)));
        if leaf_number + 1 == num_leaves {
            tree.add_root(vec![spine, leaf]);
        } else {
            spine = tree.add_internal_vertex(vec![spine, leaf], None);
        }
    }
    tree
}

fn binary_inference(c: &mut Criterion) {
    let mut taxa = TaxonTable::new(INFERENCE_LEAVES);
    let species_tree = caterpillar(INFERENCE_LEAVES, &mut taxa);
    let gene_tree = caterpillar(INFERENCE_LEAVES, &mut taxa);

    c.bench_function("sdi_caterpillar", |b| {
        b.iter(|| {
            let mut sdi = Sdi::new(gene_tree.clone(), &species_tree, &taxa).unwrap();
            sdi.infer_events();
            black_box(sdi.duplication_count())
        });
    });
}

fn root_search(c: &mut Criterion) {
    let mut taxa = TaxonTable::new(SEARCH_LEAVES);
    let species_tree = caterpillar(SEARCH_LEAVES, &mut taxa);
    let gene_tree = caterpillar(SEARCH_LEAVES, &mut taxa);

    c.bench_function("sdir_caterpillar", |b| {
        b.iter(|| {
            let search = Sdir::new(&gene_tree, &species_tree, &taxa).unwrap();
            black_box(search.root_and_infer().unwrap().min_duplications())
        });
    });
}

criterion_group!(inference, binary_inference);
criterion_group! {
    name = search;
    config = Criterion::default().sample_size(10);
    targets = root_search
}
criterion_main!(inference, search);
