//! Project initialization: folder-naming parsing and document/spreadsheet
//! resolution.
//!
//! Parses a folder name of the form
//! `RRD<archive>-<suffix>_<location>_<doc_type?>`, resolves the document
//! subfolder under an ordered policy, and locates a companion spreadsheet.
//! See spec §4.1; exact edge-case behavior (the `RRD` prefix + minimum
//! length guard, and the project/document-subfolder fallback) follows the
//! original C `project_service.c` implementation, which spec.md defers to.

use std::path::{Path, PathBuf};

use crate::model::Project;
use crate::{MicrofilmError, Result};

const MIN_FOLDER_NAME_LEN: usize = 12;
const ARCHIVE_PREFIX: &str = "RRD";

/// Extracted `(archive_id, location, doc_type)` from a folder name, or
/// `None` if the name does not match the naming convention.
struct Metadata {
    archive_id: String,
    location: String,
    doc_type: String,
}

fn try_extract_metadata(folder_name: &str) -> Option<Metadata> {
    if folder_name.len() < MIN_FOLDER_NAME_LEN || !folder_name.starts_with(ARCHIVE_PREFIX) {
        return None;
    }

    let first_underscore = folder_name.find('_')?;
    let archive_id = folder_name[..first_underscore].to_string();

    let rest = &folder_name[first_underscore + 1..];
    let (location, doc_type) = match rest.find('_') {
        Some(second) => (rest[..second].to_string(), rest[second + 1..].to_string()),
        None => (rest.to_string(), String::new()),
    };

    Some(Metadata {
        archive_id,
        location,
        doc_type,
    })
}

fn folder_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Initializes a project from a filesystem path.
///
/// Returns [`MicrofilmError::PathNotFound`] if `path` is not a directory,
/// and [`MicrofilmError::MalformedFolderName`] if neither `path` nor its
/// parent matches the archive naming convention.
pub fn initialize(path: impl AsRef<Path>) -> Result<Project> {
    let path = path.as_ref();

    if !path.is_dir() {
        return Err(MicrofilmError::PathNotFound(path.to_path_buf()));
    }

    let name = folder_name(path);
    tracing::info!(path = %path.display(), "initializing project");

    let mut project = if let Some(meta) = try_extract_metadata(&name) {
        tracing::debug!(%name, "path appears to be a project folder");
        let mut project = Project::new(meta.archive_id, meta.location, meta.doc_type);
        project.project_path = path.to_path_buf();
        project.project_folder_name = name;

        if let Some(doc_folder) = find_document_folder(path, &project.archive_id)? {
            project.document_folder_name = folder_name(&doc_folder);
            project.document_folder_path = doc_folder;
        } else {
            tracing::warn!("no document subfolder found, defaulting to project path");
            project.document_folder_path = path.to_path_buf();
        }

        project
    } else {
        // Maybe `path` itself is the document subfolder; try the parent.
        let parent = path.parent().ok_or_else(|| {
            MicrofilmError::MalformedFolderName(format!(
                "folder name does not match the archive naming convention: {name}"
            ))
        })?;
        let parent_name = folder_name(parent);

        let meta = try_extract_metadata(&parent_name).ok_or_else(|| {
            MicrofilmError::MalformedFolderName(format!(
                "could not extract project metadata from folder name: {name} or parent: {parent_name}"
            ))
        })?;

        tracing::debug!(%name, "path appears to be a document subfolder");
        let mut project = Project::new(meta.archive_id, meta.location, meta.doc_type);
        project.project_path = parent.to_path_buf();
        project.project_folder_name = parent_name;
        project.document_folder_path = path.to_path_buf();
        project.document_folder_name = name;
        project
    };

    project.spreadsheet_path = find_spreadsheet(&project.project_path, &project.archive_id)?;
    if let Some(ref sheet) = project.spreadsheet_path {
        tracing::info!(spreadsheet = %sheet.display(), "found companion spreadsheet");
    }

    tracing::info!(
        archive_id = %project.archive_id,
        location = %project.location,
        "project initialized"
    );

    Ok(project)
}

/// Resolves the document subfolder under an ordered policy: a folder
/// containing `"PDFs zu"`, else one containing the archive id, else the
/// subfolder with the most `.pdf` files. Returns `None` if no subfolder
/// qualifies, in which case the caller defaults to the project path.
fn find_document_folder(project_path: &Path, archive_id: &str) -> Result<Option<PathBuf>> {
    let subdirs = read_subdirectories(project_path)?;

    if let Some(hit) = subdirs.iter().find(|d| folder_name(d).contains("PDFs zu")) {
        return Ok(Some(hit.clone()));
    }

    if let Some(hit) = subdirs.iter().find(|d| folder_name(d).contains(archive_id)) {
        return Ok(Some(hit.clone()));
    }

    let mut best: Option<(PathBuf, usize)> = None;
    for dir in &subdirs {
        let count = count_pdfs(dir)?;
        if count > 0 && best.as_ref().map(|(_, n)| count > *n).unwrap_or(true) {
            best = Some((dir.clone(), count));
        }
    }

    Ok(best.map(|(d, _)| d))
}

fn read_subdirectories(path: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(path).map_err(|source| MicrofilmError::DirectoryReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MicrofilmError::DirectoryReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        if entry.path().is_dir() {
            dirs.push(entry.path());
        }
    }
    Ok(dirs)
}

fn count_pdfs(dir: &Path) -> Result<usize> {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Ok(0),
    };

    let mut count = 0;
    for entry in entries {
        let entry = entry.map_err(|source| MicrofilmError::DirectoryReadFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.path().is_file() && has_extension(&entry.path(), "pdf") {
            count += 1;
        }
    }
    Ok(count)
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Resolves the companion spreadsheet: the first `.xls`/`.xlsx` file whose
/// name contains the archive id, else the first such file in the folder.
fn find_spreadsheet(folder: &Path, archive_id: &str) -> Result<Option<PathBuf>> {
    let entries = match std::fs::read_dir(folder) {
        Ok(e) => e,
        Err(_) => return Ok(None),
    };

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| MicrofilmError::DirectoryReadFailed {
            path: folder.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && (has_extension(&path, "xls") || has_extension(&path, "xlsx")) {
            candidates.push(path);
        }
    }

    let by_archive_id = candidates
        .iter()
        .find(|p| folder_name(p).contains(archive_id))
        .cloned();

    Ok(by_archive_id.or_else(|| candidates.into_iter().next()))
}
