//! 16mm and 35mm roll allocation.
//!
//! Both formats share one packing routine, parameterized by
//! `(capacity, padding)` via [`FilmType`]; only the input filter (all
//! documents vs. oversized-only) and the `has_oversized` flag-forcing on
//! segments differ. See spec §4.4-4.6.

use crate::model::{Document, FilmAllocation, FilmRoll, FilmType, PageRange, Project};
use crate::Result;

/// One document's pending placement: a stable identifier and path, the
/// page count to place, and whether every resulting segment should be
/// forced `has_oversized = true` regardless of the source document's
/// flag (the 35mm stream forces this; the 16mm stream does not).
struct PendingPlacement<'a> {
    doc_id: &'a str,
    path: &'a std::path::Path,
    pages: i64,
    force_oversized: bool,
}

/// Packs `placements` into `rolls` (a growing roll list of `film_type`)
/// under the shared fit/new-roll/split policy (spec §4.5): a document
/// that fits goes on the current roll; one that doesn't but is within
/// capacity closes the current roll and starts a new one; one that
/// exceeds capacity is split across consecutive rolls, absolute page
/// numbering preserved across the split (open question 3, resolved by
/// following the source).
///
/// Returns, per placement, `(is_split, roll_count)` for the caller to
/// write back onto the source document.
fn pack(
    rolls: &mut Vec<FilmRoll>,
    film_type: FilmType,
    placements: &[PendingPlacement<'_>],
) -> Result<Vec<(bool, i64)>> {
    if rolls.is_empty() {
        rolls.push(FilmRoll::new(1, film_type));
    }

    let mut results = Vec::with_capacity(placements.len());

    for placement in placements {
        let pages = placement.pages;
        let capacity = film_type.capacity();
        let has_oversized = placement.force_oversized;

        if pages > capacity {
            let mut pages_left = pages;
            let mut start_page = 1i64;
            let mut roll_count = 0i64;

            while pages_left > 0 {
                let current_roll = rolls.last_mut().expect("roll list is never empty mid-pack");
                let pages_to_allocate = pages_left.min(current_roll.pages_remaining);

                if pages_to_allocate > 0 {
                    let end_page = start_page + pages_to_allocate - 1;
                    current_roll.add_segment(
                        placement.doc_id,
                        placement.path,
                        pages_to_allocate,
                        PageRange::new(start_page, end_page),
                        has_oversized,
                    )?;

                    pages_left -= pages_to_allocate;
                    start_page = end_page + 1;
                    roll_count += 1;
                }

                if pages_left > 0 {
                    rolls.last_mut().unwrap().has_split_documents = true;
                    rolls.push(FilmRoll::new(rolls.len() as i64 + 1, film_type));
                }
            }

            results.push((roll_count > 1, roll_count));
        } else {
            let fits = {
                let current_roll = rolls.last().expect("roll list is never empty mid-pack");
                pages <= current_roll.pages_remaining
            };

            if fits {
                rolls
                    .last_mut()
                    .unwrap()
                    .add_segment(placement.doc_id, placement.path, pages, PageRange::new(1, pages), has_oversized)?;
            } else {
                rolls.last_mut().unwrap().mark_partial();
                rolls.push(FilmRoll::new(rolls.len() as i64 + 1, film_type));
                rolls
                    .last_mut()
                    .unwrap()
                    .add_segment(placement.doc_id, placement.path, pages, PageRange::new(1, pages), has_oversized)?;
            }

            results.push((false, 1));
        }
    }

    if let Some(last) = rolls.last_mut() {
        if last.pages_remaining > 0 && !last.is_partial {
            last.mark_partial();
        }
    }

    Ok(results)
}

/// Runs the 16mm allocator over every document in `project`, in its
/// current (already `doc_id`-sorted) order, and writes `is_split`/
/// `roll_count` back onto each document.
fn allocate_16mm(project: &mut Project) -> Result<Vec<FilmRoll>> {
    tracing::info!(documents = project.documents.len(), "allocating 16mm film");

    let placements: Vec<PendingPlacement<'_>> = project
        .documents
        .iter()
        .map(|doc| PendingPlacement {
            doc_id: &doc.doc_id,
            path: &doc.path,
            pages: doc.effective_page_count(),
            force_oversized: false,
        })
        .collect();

    let mut rolls = Vec::new();
    let results = pack(&mut rolls, FilmType::Mm16, &placements)?;

    for (doc, (is_split, roll_count)) in project.documents.iter_mut().zip(results) {
        doc.is_split = is_split;
        doc.roll_count = roll_count;
    }

    tracing::info!(
        rolls = rolls.len(),
        pages = rolls.iter().map(|r| r.pages_used).sum::<i64>(),
        "16mm allocation complete"
    );

    Ok(rolls)
}

/// Runs the 35mm allocator over only the oversized documents in
/// `project`, packing `total_oversized + total_references` pages per
/// document and forcing `has_oversized = true` on every resulting
/// segment (spec §4.6). The 16mm allocator must already have run
/// (`project.documents` carries the final `pages`/`total_references`
/// values it reads, but `is_split`/`roll_count` here reflect 35mm
/// placement, not 16mm).
///
/// Unlike the original implementation, this marks a trailing partial
/// 35mm roll the same way the 16mm stream does (resolved open question,
/// see DESIGN.md).
fn allocate_35mm(project: &Project) -> Result<Vec<FilmRoll>> {
    let oversized: Vec<&Document> = project.documents.iter().filter(|d| d.has_oversized).collect();

    if oversized.is_empty() {
        return Ok(Vec::new());
    }

    tracing::info!(documents = oversized.len(), "allocating 35mm film");

    let placements: Vec<PendingPlacement<'_>> = oversized
        .iter()
        .map(|doc| PendingPlacement {
            doc_id: &doc.doc_id,
            path: &doc.path,
            pages: doc.effective_oversized_count(),
            force_oversized: true,
        })
        .collect();

    let mut rolls = Vec::new();
    pack(&mut rolls, FilmType::Mm35, &placements)?;

    tracing::info!(
        rolls = rolls.len(),
        pages = rolls.iter().map(|r| r.pages_used).sum::<i64>(),
        "35mm allocation complete"
    );

    Ok(rolls)
}

/// Runs the full allocation pipeline for `project`: 16mm over every
/// document, then (only if `project.has_oversized`) 35mm over the
/// oversized subset, and stores the result in
/// `project.film_allocation`.
pub fn allocate_film(project: &mut Project) -> Result<()> {
    tracing::info!(archive_id = %project.archive_id, "starting film allocation");

    let mut allocation = FilmAllocation::new(project.archive_id.clone(), project.project_folder_name.clone());

    if project.documents.is_empty() {
        tracing::warn!("no documents to allocate");
        project.film_allocation = Some(allocation);
        return Ok(());
    }

    allocation.rolls_16mm = allocate_16mm(project)?;

    if project.has_oversized {
        allocation.rolls_35mm = allocate_35mm(project)?;
    }

    tracing::info!(
        rolls_16mm = allocation.rolls_16mm.len(),
        rolls_35mm = allocation.rolls_35mm.len(),
        "film allocation complete"
    );

    project.film_allocation = Some(allocation);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Document;

    fn doc(id: &str, pages: i64) -> Document {
        let mut d = Document::new(id, format!("/tmp/{id}.pdf"));
        d.pages = pages;
        d
    }

    #[test]
    fn s1_empty_oversized_single_partial_roll() {
        let mut project = Project::new("RRD1-1", "OU", "");
        project.documents = vec![doc("1", 100)];
        project.recompute_totals();

        allocate_film(&mut project).unwrap();

        let alloc = project.film_allocation.unwrap();
        assert_eq!(alloc.rolls_16mm.len(), 1);
        let roll = &alloc.rolls_16mm[0];
        assert_eq!(roll.pages_used, 100);
        assert!(roll.is_partial);
        assert_eq!(roll.remaining_capacity, 2800);
        assert_eq!(roll.usable_capacity, 2650);
        assert!(alloc.rolls_35mm.is_empty());
    }

    #[test]
    fn s2_exact_fill_not_partial() {
        let mut project = Project::new("RRD1-1", "OU", "");
        project.documents = vec![doc("1", 2900)];
        project.recompute_totals();

        allocate_film(&mut project).unwrap();

        let alloc = project.film_allocation.unwrap();
        let roll = &alloc.rolls_16mm[0];
        assert_eq!(roll.pages_used, 2900);
        assert_eq!(roll.pages_remaining, 0);
        assert!(!roll.is_partial);
        assert!(!project.documents[0].is_split);
    }

    #[test]
    fn s3_split_across_two_rolls() {
        let mut project = Project::new("RRD1-1", "OU", "");
        project.documents = vec![doc("1", 3500)];
        project.recompute_totals();

        allocate_film(&mut project).unwrap();

        let alloc = project.film_allocation.unwrap();
        assert_eq!(alloc.rolls_16mm.len(), 2);
        assert_eq!(alloc.rolls_16mm[0].pages_used, 2900);
        assert!(alloc.rolls_16mm[0].has_split_documents);
        assert_eq!(alloc.rolls_16mm[1].pages_used, 600);
        assert!(alloc.rolls_16mm[1].is_partial);

        assert!(project.documents[0].is_split);
        assert_eq!(project.documents[0].roll_count, 2);

        let seg0 = &alloc.rolls_16mm[0].segments[0];
        assert_eq!(seg0.page_range, PageRange::new(1, 2900));
        let seg1 = &alloc.rolls_16mm[1].segments[0];
        assert_eq!(seg1.page_range, PageRange::new(2901, 3500));
    }

    #[test]
    fn s4_oversized_small_mirrors_to_35mm() {
        let mut project = Project::new("RRD1-1", "OU", "");
        let mut d = doc("1", 50);
        d.has_oversized = true;
        d.total_oversized = 3;
        d.ranges = vec![PageRange::new(10, 11), PageRange::new(30, 30)];
        d.reference_pages = vec![10, 30];
        d.total_references = 2;
        project.documents = vec![d];
        project.recompute_totals();
        project.has_oversized = true;

        allocate_film(&mut project).unwrap();

        let alloc = project.film_allocation.unwrap();
        assert_eq!(alloc.rolls_16mm.len(), 1);
        assert_eq!(alloc.rolls_16mm[0].segments[0].pages, 52);

        assert_eq!(alloc.rolls_35mm.len(), 1);
        let seg = &alloc.rolls_35mm[0].segments[0];
        assert_eq!(seg.pages, 5);
        assert!(seg.has_oversized);
    }

    #[test]
    fn allocation_is_deterministic_for_identical_input() {
        let mut p1 = Project::new("RRD1-1", "OU", "");
        p1.documents = vec![doc("2", 100), doc("12", 50)];
        p1.recompute_totals();
        let mut p2 = p1.clone();

        allocate_film(&mut p1).unwrap();
        allocate_film(&mut p2).unwrap();

        let a1 = p1.film_allocation.unwrap();
        let a2 = p2.film_allocation.unwrap();
        assert_eq!(a1.rolls_16mm.len(), a2.rolls_16mm.len());
        assert_eq!(a1.rolls_16mm[0].pages_used, a2.rolls_16mm[0].pages_used);
    }
}
