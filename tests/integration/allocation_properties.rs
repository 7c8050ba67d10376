//! Property-based checks of the invariants listed in spec §8: conservation,
//! capacity, frame contiguity, and split marking, over randomly generated
//! document lists. Grounded on the teacher's `tests/property_tests.rs`
//! `proptest!` harness.

use proptest::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use microfilm::model::Project;
use microfilm::{allocate, Document};

fn arb_documents() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec((1i64..4000, any::<bool>()), 1..12).prop_map(|specs| {
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (pages, oversized))| {
                let mut doc = Document::new(format!("{}", i + 1), format!("/tmp/{}.pdf", i + 1));
                doc.pages = pages;
                if oversized {
                    doc.has_oversized = true;
                    doc.total_oversized = (pages / 10).max(1).min(pages);
                    doc.total_references = 1;
                }
                doc
            })
            .collect()
    })
}

fn check_invariants(project: &Project) {
    let allocation = project.film_allocation.as_ref().expect("allocation present");

    // Invariant 1: conservation for 16mm.
    let used_16mm: i64 = allocation.rolls_16mm.iter().map(|r| r.pages_used).sum();
    let expected_16mm: i64 = project.documents.iter().map(|d| d.effective_page_count()).sum();
    assert_eq!(used_16mm, expected_16mm, "16mm conservation violated");

    // Invariant 2: oversized mirror for 35mm.
    let used_35mm: i64 = allocation.rolls_35mm.iter().map(|r| r.pages_used).sum();
    let expected_35mm: i64 = project
        .documents
        .iter()
        .filter(|d| d.has_oversized)
        .map(|d| d.effective_oversized_count())
        .sum();
    assert_eq!(used_35mm, expected_35mm, "35mm oversized mirror violated");
    if !project.has_oversized {
        assert!(allocation.rolls_35mm.is_empty());
    }

    for roll in allocation.rolls_16mm.iter().chain(allocation.rolls_35mm.iter()) {
        // Invariant 3: capacity.
        assert!(roll.pages_used <= roll.capacity);
        assert_eq!(roll.pages_used + roll.pages_remaining, roll.capacity);

        // Invariant 4: frame contiguity.
        let mut expected_start = 1;
        for segment in &roll.segments {
            assert_eq!(segment.frame_range.start, expected_start);
            assert!(segment.frame_range.start <= segment.frame_range.end);
            expected_start = segment.frame_range.end + 1;
        }
        assert_eq!(expected_start - 1, roll.pages_used);
    }

    // Invariant 5: split marking.
    for doc in &project.documents {
        assert_eq!(doc.is_split, doc.roll_count > 1);
    }

    // Invariant 8: reference invariant.
    for doc in &project.documents {
        assert_eq!(doc.reference_pages.len() as i64, doc.ranges.len() as i64);
        for (reference, range) in doc.reference_pages.iter().zip(&doc.ranges) {
            assert_eq!(*reference, range.start);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn allocation_preserves_invariants_for_arbitrary_document_sets(documents in arb_documents()) {
        let mut project = Project::new("RRD99-99", "OU", "");
        project.documents = documents;
        project.recompute_totals();

        allocate::allocate_film(&mut project).unwrap();

        check_invariants(&project);
    }

    #[test]
    fn single_document_pages_never_produce_negative_remaining_capacity(pages in 1i64..10_000) {
        let mut project = Project::new("RRD98-98", "DW", "");
        let mut doc = Document::new("1", "/tmp/1.pdf");
        doc.pages = pages;
        project.documents = vec![doc];
        project.recompute_totals();

        allocate::allocate_film(&mut project).unwrap();

        let allocation = project.film_allocation.unwrap();
        for roll in &allocation.rolls_16mm {
            assert!(roll.pages_remaining >= 0);
        }
    }
}

/// A reproducible, seeded sweep over a larger population of synthetic
/// projects than proptest's default case count, to catch invariant
/// violations that only show up at scale. Uses a fixed seed so failures
/// reproduce deterministically, the way the teacher's benchmark dataset
/// generators (`benches/support/datasets.rs`) use `ChaCha8Rng` for
/// reproducible synthetic inputs.
#[test]
fn seeded_sweep_of_large_synthetic_projects_preserves_invariants() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xF17_u64);

    for trial in 0..200 {
        let doc_count = rng.gen_range(1..20);
        let mut documents = Vec::with_capacity(doc_count);
        for i in 0..doc_count {
            let mut doc = Document::new(format!("{}", i + 1), format!("/tmp/{trial}/{}.pdf", i + 1));
            doc.pages = rng.gen_range(1..8000);
            if rng.gen_bool(0.3) {
                doc.has_oversized = true;
                doc.total_oversized = rng.gen_range(1..=doc.pages.min(50));
                doc.total_references = rng.gen_range(1..=3);
            }
            documents.push(doc);
        }

        let mut project = Project::new(format!("RRD{trial}-{trial}"), "ZZ", "");
        project.documents = documents;
        project.recompute_totals();

        allocate::allocate_film(&mut project).unwrap();

        check_invariants(&project);
    }
}
