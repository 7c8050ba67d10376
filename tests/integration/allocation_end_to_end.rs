use std::fs;

use microfilm::detect::{Dimension, FixedOracle};
use microfilm::model::Project;
use microfilm::{allocate, detect, PageRange, Result};
use tempfile::tempdir;

#[test]
fn pipeline_produces_dual_stream_allocation_for_oversized_project() -> Result<()> {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("1_invoice.pdf"), b"").unwrap();

    let mut project = Project::new("RRD5-5", "OU", "Invoices");
    project.document_folder_path = dir.path().to_path_buf();

    let mut dims = vec![
        Dimension {
            width: 595.0,
            height: 842.0,
        };
        48
    ];
    dims[9] = Dimension {
        width: 900.0,
        height: 1200.0,
    };
    dims[10] = Dimension {
        width: 900.0,
        height: 1200.0,
    };
    let oracle = FixedOracle::new(dims);

    detect::process_documents(&mut project, &oracle)?;
    assert_eq!(project.documents.len(), 1);
    assert!(project.documents[0].has_oversized);
    assert_eq!(project.documents[0].ranges, vec![PageRange::new(10, 11)]);

    detect::compute_references(&mut project)?;
    assert_eq!(project.documents[0].reference_pages, vec![10]);

    allocate::allocate_film(&mut project)?;

    let allocation = project.film_allocation.as_ref().unwrap();
    assert_eq!(allocation.rolls_16mm.len(), 1);
    assert_eq!(allocation.rolls_35mm.len(), 1);

    let conservation_16mm: i64 = allocation.rolls_16mm.iter().map(|r| r.pages_used).sum();
    let expected_16mm: i64 = project.documents.iter().map(|d| d.effective_page_count()).sum();
    assert_eq!(conservation_16mm, expected_16mm);

    let conservation_35mm: i64 = allocation.rolls_35mm.iter().map(|r| r.pages_used).sum();
    let expected_35mm: i64 = project
        .documents
        .iter()
        .filter(|d| d.has_oversized)
        .map(|d| d.effective_oversized_count())
        .sum();
    assert_eq!(conservation_35mm, expected_35mm);

    for roll in allocation.rolls_16mm.iter().chain(allocation.rolls_35mm.iter()) {
        assert_eq!(roll.pages_used + roll.pages_remaining, roll.capacity);
        let mut expected_start = 1;
        for segment in &roll.segments {
            assert_eq!(segment.frame_range.start, expected_start);
            expected_start = segment.frame_range.end + 1;
        }
    }

    Ok(())
}

#[test]
fn split_document_frame_ranges_are_contiguous() -> Result<()> {
    let mut project = Project::new("RRD6-6", "DW", "");
    let mut doc = microfilm::Document::new("1", "/tmp/big.pdf");
    doc.pages = 7000;
    project.documents = vec![doc];
    project.recompute_totals();

    allocate::allocate_film(&mut project)?;

    let allocation = project.film_allocation.unwrap();
    assert_eq!(allocation.rolls_16mm.len(), 3);
    assert!(project.documents[0].is_split);
    assert_eq!(project.documents[0].roll_count, 3);

    let total: i64 = allocation.rolls_16mm.iter().map(|r| r.pages_used).sum();
    assert_eq!(total, 7000);

    assert_eq!(allocation.rolls_16mm[0].segments[0].page_range, PageRange::new(1, 2900));
    assert_eq!(allocation.rolls_16mm[1].segments[0].page_range, PageRange::new(2901, 5800));
    assert_eq!(allocation.rolls_16mm[2].segments[0].page_range, PageRange::new(5801, 7000));

    Ok(())
}

#[test]
fn project_with_no_documents_produces_empty_allocation() -> Result<()> {
    let mut project = Project::new("RRD7-7", "OU", "");
    allocate::allocate_film(&mut project)?;

    let allocation = project.film_allocation.unwrap();
    assert!(allocation.rolls_16mm.is_empty());
    assert!(allocation.rolls_35mm.is_empty());

    Ok(())
}
