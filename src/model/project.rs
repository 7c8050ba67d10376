//! The project aggregate: archive metadata, documents, and totals.

use std::path::PathBuf;

use super::{allocation::FilmAllocation, document::Document, location_code};

/// An archive project: identified by `archive_id`, resolved to a document
/// folder and optional companion spreadsheet, aggregating documents and
/// (after allocation) a single [`FilmAllocation`].
#[derive(Debug, Clone)]
pub struct Project {
    /// Short archive code, e.g. `RRD123-4567`.
    pub archive_id: String,
    /// Short location token, e.g. `OU`, `DW`.
    pub location: String,
    /// Free-form document type, possibly empty.
    pub doc_type: String,
    /// The project folder's path.
    pub project_path: PathBuf,
    /// The project folder's name (the last path component).
    pub project_folder_name: String,
    /// The resolved document subfolder's path.
    pub document_folder_path: PathBuf,
    /// The resolved document subfolder's name.
    pub document_folder_name: String,
    /// The resolved companion spreadsheet (COM list) path, if any.
    pub spreadsheet_path: Option<PathBuf>,
    /// This project's documents, sorted by `doc_id` once processed.
    pub documents: Vec<Document>,
    /// Whether any document has oversized pages.
    pub has_oversized: bool,
    /// Sum of `document.pages` across all documents.
    pub total_pages: i64,
    /// `total_pages` plus every document's `total_references`.
    pub total_pages_with_refs: i64,
    /// Sum of `document.total_oversized` across all documents.
    pub total_oversized: i64,
    /// Count of documents with `has_oversized`.
    pub documents_with_oversized: i64,
    /// The resulting film allocation, once allocated.
    pub film_allocation: Option<FilmAllocation>,
}

impl Project {
    /// Creates a project with no documents and no allocation yet.
    pub fn new(archive_id: impl Into<String>, location: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            archive_id: archive_id.into(),
            location: location.into(),
            doc_type: doc_type.into(),
            project_path: PathBuf::new(),
            project_folder_name: String::new(),
            document_folder_path: PathBuf::new(),
            document_folder_name: String::new(),
            spreadsheet_path: None,
            documents: Vec::new(),
            has_oversized: false,
            total_pages: 0,
            total_pages_with_refs: 0,
            total_oversized: 0,
            documents_with_oversized: 0,
            film_allocation: None,
        }
    }

    /// The single-digit film-number location code for this project's
    /// location, per the fixed table in [`crate::model::location_code`].
    pub fn location_code(&self) -> &'static str {
        location_code(&self.location)
    }

    /// Recomputes every project-level total from the current document
    /// list. Called by the detector after processing all documents and
    /// again by the reference planner after computing reference pages.
    pub fn recompute_totals(&mut self) {
        self.total_pages = self.documents.iter().map(|d| d.pages).sum();
        self.total_oversized = self.documents.iter().map(|d| d.total_oversized).sum();
        self.documents_with_oversized = self.documents.iter().filter(|d| d.has_oversized).count() as i64;
        self.has_oversized = self.documents_with_oversized > 0;
        let total_references: i64 = self.documents.iter().map(|d| d.total_references).sum();
        self.total_pages_with_refs = self.total_pages + total_references;
    }
}
