//! Export Writer: the canonical JSON triple. See spec §4.9.
//!
//! Emits `<archive_id>_project_info.json`, `<archive_id>_documents.json`,
//! and `<archive_id>_film_allocation.json` into `<project_path>/.data/`,
//! field-for-field matching the layout the original implementation wrote
//! by hand with `fprintf`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::model::{Document, FilmAllocation, FilmRoll, PageDimension, PageRange, Project};
use crate::{MicrofilmError, Result};

#[derive(Serialize)]
struct ProjectInfo<'a> {
    archive_id: &'a str,
    location: &'a str,
    location_code: &'a str,
    doc_type: &'a str,
    project_path: String,
    project_folder_name: &'a str,
    document_folder_path: Option<String>,
    document_folder_name: Option<&'a str>,
    has_oversized: bool,
    total_pages: i64,
    total_pages_with_refs: i64,
    total_oversized: i64,
    documents_with_oversized: i64,
    comlist_path: Option<String>,
}

#[derive(Serialize)]
struct DocumentInfo<'a> {
    doc_id: &'a str,
    path: String,
    pages: i64,
    has_oversized: bool,
    total_oversized: i64,
    dimensions: Vec<[f64; 4]>,
    ranges: Vec<[i64; 2]>,
    reference_pages: &'a [i64],
    total_references: i64,
    total_pages_with_refs: i64,
    is_split: bool,
    roll_count: i64,
}

#[derive(Serialize)]
struct SegmentInfo<'a> {
    doc_id: &'a str,
    path: String,
    pages: i64,
    page_range: [i64; 2],
    frame_range: [i64; 2],
    document_index: i64,
    has_oversized: bool,
}

#[derive(Serialize)]
struct RollInfo<'a> {
    roll_id: i64,
    film_type: &'a str,
    film_number: &'a str,
    capacity: i64,
    pages_used: i64,
    pages_remaining: i64,
    status: &'a str,
    is_partial: bool,
    remaining_capacity: i64,
    usable_capacity: i64,
    has_split_documents: bool,
    creation_date: &'a str,
    #[serde(rename = "document_segments")]
    segments: Vec<SegmentInfo<'a>>,
}

#[derive(Serialize)]
struct FilmAllocationInfo<'a> {
    archive_id: &'a str,
    project_name: &'a str,
    rolls_16mm: Vec<RollInfo<'a>>,
    rolls_35mm: Vec<RollInfo<'a>>,
    total_rolls_16mm: usize,
    total_rolls_35mm: usize,
    total_pages_16mm: i64,
    total_pages_35mm: i64,
    total_partial_rolls_16mm: i64,
    total_partial_rolls_35mm: i64,
    total_split_documents_16mm: i64,
    total_split_documents_35mm: i64,
    version: &'a str,
    creation_date: &'a str,
}

fn dimension_quadruple(dim: &PageDimension) -> [f64; 4] {
    [dim.width, dim.height, dim.page_index as f64, dim.percent_over]
}

fn range_pair(range: &PageRange) -> [i64; 2] {
    [range.start, range.end]
}

fn document_info(doc: &Document) -> DocumentInfo<'_> {
    DocumentInfo {
        doc_id: &doc.doc_id,
        path: doc.path.to_string_lossy().into_owned(),
        pages: doc.pages,
        has_oversized: doc.has_oversized,
        total_oversized: doc.total_oversized,
        dimensions: doc.dimensions.iter().map(dimension_quadruple).collect(),
        ranges: doc.ranges.iter().map(range_pair).collect(),
        reference_pages: &doc.reference_pages,
        total_references: doc.total_references,
        total_pages_with_refs: doc.pages + doc.total_references,
        is_split: doc.is_split,
        roll_count: doc.roll_count,
    }
}

fn roll_info<'a>(roll: &'a FilmRoll, film_type_str: &'a str) -> RollInfo<'a> {
    RollInfo {
        roll_id: roll.roll_id,
        film_type: film_type_str,
        film_number: &roll.film_number,
        capacity: roll.capacity,
        pages_used: roll.pages_used,
        pages_remaining: roll.pages_remaining,
        status: roll.status.as_str(),
        is_partial: roll.is_partial,
        remaining_capacity: roll.remaining_capacity,
        usable_capacity: roll.usable_capacity,
        has_split_documents: roll.has_split_documents,
        creation_date: &roll.creation_date,
        segments: roll
            .segments
            .iter()
            .map(|s| SegmentInfo {
                doc_id: &s.doc_id,
                path: s.path.to_string_lossy().into_owned(),
                pages: s.pages,
                page_range: range_pair(&s.page_range),
                frame_range: range_pair(&s.frame_range),
                document_index: s.document_index,
                has_oversized: s.has_oversized,
            })
            .collect(),
    }
}

fn film_allocation_info(allocation: &FilmAllocation) -> FilmAllocationInfo<'_> {
    FilmAllocationInfo {
        archive_id: &allocation.archive_id,
        project_name: &allocation.project_name,
        rolls_16mm: allocation.rolls_16mm.iter().map(|r| roll_info(r, "16mm")).collect(),
        rolls_35mm: allocation.rolls_35mm.iter().map(|r| roll_info(r, "35mm")).collect(),
        total_rolls_16mm: allocation.rolls_16mm.len(),
        total_rolls_35mm: allocation.rolls_35mm.len(),
        total_pages_16mm: allocation.total_pages_16mm(),
        total_pages_35mm: allocation.total_pages_35mm(),
        total_partial_rolls_16mm: allocation.total_partial_rolls_16mm(),
        total_partial_rolls_35mm: allocation.total_partial_rolls_35mm(),
        total_split_documents_16mm: allocation.total_split_documents_16mm(),
        total_split_documents_35mm: allocation.total_split_documents_35mm(),
        version: &allocation.version,
        creation_date: &allocation.creation_date,
    }
}

fn data_dir(project: &Project) -> PathBuf {
    project.project_path.join(".data")
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| MicrofilmError::Export(e.to_string()))?;
    fs::write(path, json).map_err(|e| MicrofilmError::Export(format!("{}: {e}", path.display())))
}

/// Writes the project info, documents, and (if present) film allocation
/// JSON files into `<project.project_path>/.data/`, creating that
/// directory if absent.
pub fn export_results(project: &Project) -> Result<PathBuf> {
    let dir = data_dir(project);
    fs::create_dir_all(&dir).map_err(|e| MicrofilmError::Export(format!("{}: {e}", dir.display())))?;

    tracing::info!(dir = %dir.display(), "exporting project results");

    export_project_info(project, &dir)?;
    export_documents(project, &dir)?;

    if let Some(allocation) = &project.film_allocation {
        export_film_allocation(project, allocation, &dir)?;
    }

    tracing::info!(dir = %dir.display(), "export complete");

    Ok(dir)
}

fn export_project_info(project: &Project, dir: &Path) -> Result<()> {
    let info = ProjectInfo {
        archive_id: &project.archive_id,
        location: &project.location,
        location_code: project.location_code(),
        doc_type: &project.doc_type,
        project_path: project.project_path.to_string_lossy().into_owned(),
        project_folder_name: &project.project_folder_name,
        document_folder_path: non_empty_path(&project.document_folder_path),
        document_folder_name: non_empty_str(&project.document_folder_name),
        has_oversized: project.has_oversized,
        total_pages: project.total_pages,
        total_pages_with_refs: project.total_pages_with_refs,
        total_oversized: project.total_oversized,
        documents_with_oversized: project.documents_with_oversized,
        comlist_path: project.spreadsheet_path.as_ref().map(|p| p.to_string_lossy().into_owned()),
    };

    write_json(&dir.join(format!("{}_project_info.json", project.archive_id)), &info)
}

fn export_documents(project: &Project, dir: &Path) -> Result<()> {
    let docs: Vec<DocumentInfo<'_>> = project.documents.iter().map(document_info).collect();
    write_json(&dir.join(format!("{}_documents.json", project.archive_id)), &docs)
}

fn export_film_allocation(project: &Project, allocation: &FilmAllocation, dir: &Path) -> Result<()> {
    let info = film_allocation_info(allocation);
    write_json(&dir.join(format!("{}_film_allocation.json", project.archive_id)), &info)
}

fn non_empty_path(path: &Path) -> Option<String> {
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path.to_string_lossy().into_owned())
    }
}

fn non_empty_str(s: &str) -> Option<&str> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
