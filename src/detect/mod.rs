//! Oversized-page detection and reference-page planning.
//!
//! Enumerates the PDFs in a project's document folder, classifies each
//! page against the oversize threshold via a [`PageDimensionOracle`],
//! merges consecutive oversized pages into ranges, and (in a second pass)
//! computes the reference pages that anchor each range in the 16mm
//! stream. See spec §4.2/§4.3.

use std::path::Path;

use rand::Rng;

use crate::model::{
    compare_documents, Document, PageDimension, PageRange, Project, OVERSIZE_THRESHOLD_HEIGHT,
    OVERSIZE_THRESHOLD_WIDTH,
};
use crate::Result;

/// One page's probed dimensions, 0-based `page_index`.
#[derive(Debug, Clone, Copy)]
pub struct Dimension {
    /// Width in PostScript points.
    pub width: f64,
    /// Height in PostScript points.
    pub height: f64,
}

/// The external page-dimension probe the detector consumes. Out of scope
/// for this engine (spec §1) — production code supplies a real PDF
/// library binding; this crate ships only placeholder implementations.
pub trait PageDimensionOracle {
    /// Returns the page count and per-page dimensions for the PDF at
    /// `path`.
    fn probe(&self, path: &Path) -> Result<(i64, Vec<Dimension>)>;
}

/// A placeholder oracle matching the original implementation's behavior:
/// it has no PDF library linked, so it fabricates a plausible page count
/// (10-60) and a handful of oversized pages (0-4) at random positions.
/// Exists so the pipeline is exercisable end-to-end before a real oracle
/// is wired in; production deployments must substitute one (spec §9).
pub struct RandomOracle;

impl Default for RandomOracle {
    fn default() -> Self {
        Self
    }
}

impl PageDimensionOracle for RandomOracle {
    fn probe(&self, _path: &Path) -> Result<(i64, Vec<Dimension>)> {
        let mut rng = rand::thread_rng();
        let pages = 10 + rng.gen_range(0..50);
        let oversized_count = rng.gen_range(0..5);

        let mut dims = vec![
            Dimension {
                width: 595.0,
                height: 842.0,
            };
            pages as usize
        ];

        for _ in 0..oversized_count {
            let idx = rng.gen_range(0..pages) as usize;
            dims[idx] = Dimension {
                width: OVERSIZE_THRESHOLD_WIDTH + rng.gen_range(0..200) as f64,
                height: OVERSIZE_THRESHOLD_HEIGHT + rng.gen_range(0..200) as f64,
            };
        }

        Ok((pages, dims))
    }
}

/// A fixed-answer oracle for deterministic tests: returns the page count
/// and dimensions it was built with, regardless of the path probed.
pub struct FixedOracle {
    page_count: i64,
    dimensions: Vec<Dimension>,
}

impl FixedOracle {
    /// Builds an oracle that always returns `dimensions` (its length is
    /// the page count).
    pub fn new(dimensions: Vec<Dimension>) -> Self {
        Self {
            page_count: dimensions.len() as i64,
            dimensions,
        }
    }
}

impl PageDimensionOracle for FixedOracle {
    fn probe(&self, _path: &Path) -> Result<(i64, Vec<Dimension>)> {
        Ok((self.page_count, self.dimensions.clone()))
    }
}

/// A page is oversized if either orientation exceeds the threshold,
/// checked symmetrically so a 90°-rotated oversized page still counts.
fn is_oversized(width: f64, height: f64) -> bool {
    (width > OVERSIZE_THRESHOLD_WIDTH && height > OVERSIZE_THRESHOLD_HEIGHT)
        || (width > OVERSIZE_THRESHOLD_HEIGHT && height > OVERSIZE_THRESHOLD_WIDTH)
}

fn percent_over(width: f64, height: f64) -> f64 {
    let width_excess = (width / OVERSIZE_THRESHOLD_WIDTH - 1.0) * 100.0;
    let height_excess = (height / OVERSIZE_THRESHOLD_HEIGHT - 1.0) * 100.0;
    width_excess.max(height_excess).max(0.0)
}

/// Merges 1-based oversized page numbers into inclusive ranges, joining
/// `p` into the current range when `p <= range_end + 1`.
fn merge_ranges(mut pages: Vec<i64>) -> Vec<PageRange> {
    pages.sort_unstable();
    pages.dedup();

    let mut ranges: Vec<PageRange> = Vec::new();
    for page in pages {
        match ranges.last_mut() {
            Some(last) if page <= last.end + 1 => {
                last.end = last.end.max(page);
            }
            _ => ranges.push(PageRange::new(page, page)),
        }
    }
    ranges
}

fn extract_doc_id(filename: &str) -> String {
    let digits: String = filename.chars().take_while(|c| c.is_ascii_digit()).collect();
    if !digits.is_empty() {
        return digits;
    }

    match filename.rfind('.') {
        Some(dot) => filename[..dot].to_string(),
        None => filename.to_string(),
    }
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Processes every PDF in `project.document_folder_path`: extracts each
/// document's `doc_id`, probes its page dimensions via `oracle`, detects
/// and merges oversized ranges, sorts the result by `doc_id`, and
/// recomputes project totals. A single document's oracle failure is
/// logged and that document is skipped; every other error is fatal (spec
/// §7 partial-failure tolerance).
pub fn process_documents(project: &mut Project, oracle: &dyn PageDimensionOracle) -> Result<()> {
    let folder = if project.document_folder_path.as_os_str().is_empty() {
        project.project_path.clone()
    } else {
        project.document_folder_path.clone()
    };

    tracing::info!(folder = %folder.display(), "processing documents");

    let entries = std::fs::read_dir(&folder).map_err(|source| crate::MicrofilmError::DirectoryReadFailed {
        path: folder.clone(),
        source,
    })?;

    let mut documents = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|source| crate::MicrofilmError::DirectoryReadFailed {
            path: folder.clone(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() || !has_pdf_extension(&path) {
            continue;
        }

        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match process_single_document(&filename, &path, oracle) {
            Ok(doc) => documents.push(doc),
            Err(err) => {
                tracing::error!(%filename, error = %err, "failed to process document, skipping");
            }
        }
    }

    documents.sort_by(compare_documents);

    tracing::info!(
        count = documents.len(),
        total_pages = documents.iter().map(|d| d.pages).sum::<i64>(),
        "documents processed"
    );

    project.documents = documents;
    project.recompute_totals();

    Ok(())
}

fn process_single_document(
    filename: &str,
    path: &Path,
    oracle: &dyn PageDimensionOracle,
) -> Result<Document> {
    let doc_id = extract_doc_id(filename);
    let mut doc = Document::new(doc_id, path.to_path_buf());

    let (page_count, dims) = oracle.probe(path)?;
    doc.pages = page_count;

    let mut oversized_pages = Vec::new();
    for (index, dim) in dims.iter().enumerate() {
        if is_oversized(dim.width, dim.height) {
            let page_index = index as i64;
            doc.dimensions.push(PageDimension {
                width: dim.width,
                height: dim.height,
                page_index,
                percent_over: percent_over(dim.width, dim.height),
            });
            oversized_pages.push(page_index + 1);
        }
    }

    if !oversized_pages.is_empty() {
        doc.ranges = merge_ranges(oversized_pages);
        doc.total_oversized = doc.ranges.iter().map(|r| r.len()).sum();
        doc.has_oversized = true;
        tracing::debug!(doc_id = %doc.doc_id, oversized = doc.total_oversized, "oversized pages detected");
    }

    Ok(doc)
}

/// Computes one reference page per merged oversized range, anchored at
/// the range's start page, and updates `project.total_pages_with_refs`.
/// A no-op when the project has no oversized documents (spec §4.3).
pub fn compute_references(project: &mut Project) -> Result<()> {
    if !project.has_oversized {
        tracing::info!("no oversized pages, skipping reference calculation");
        return Ok(());
    }

    tracing::info!("calculating reference page positions");

    for doc in &mut project.documents {
        if !doc.has_oversized || doc.ranges.is_empty() {
            doc.total_references = 0;
            continue;
        }

        doc.reference_pages = doc.ranges.iter().map(|r| r.start).collect();
        doc.total_references = doc.reference_pages.len() as i64;
    }

    project.recompute_totals();

    Ok(())
}
