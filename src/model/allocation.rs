//! The per-project film allocation: two roll streams plus totals.

use super::roll::FilmRoll;

/// The complete film allocation for one project: every 16mm roll, every
/// 35mm roll (empty unless the project has oversized pages), and the
/// per-format totals used for reporting and export.
#[derive(Debug, Clone)]
pub struct FilmAllocation {
    /// The archive this allocation belongs to.
    pub archive_id: String,
    /// The project's folder name, carried through for export/reporting.
    pub project_name: String,
    /// 16mm rolls, in creation order.
    pub rolls_16mm: Vec<FilmRoll>,
    /// 35mm rolls, in creation order. Empty when the project has no
    /// oversized pages.
    pub rolls_35mm: Vec<FilmRoll>,
    /// Format version string, exported verbatim.
    pub version: String,
    /// ISO-8601 timestamp of allocation creation.
    pub creation_date: String,
}

impl FilmAllocation {
    /// Creates an empty allocation for the given archive/project.
    pub fn new(archive_id: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self {
            archive_id: archive_id.into(),
            project_name: project_name.into(),
            rolls_16mm: Vec::new(),
            rolls_35mm: Vec::new(),
            version: "1.0".to_string(),
            creation_date: crate::util::current_timestamp(),
        }
    }

    /// Total frames used across all 16mm rolls.
    pub fn total_pages_16mm(&self) -> i64 {
        self.rolls_16mm.iter().map(|r| r.pages_used).sum()
    }

    /// Total frames used across all 35mm rolls.
    pub fn total_pages_35mm(&self) -> i64 {
        self.rolls_35mm.iter().map(|r| r.pages_used).sum()
    }

    /// Number of partial 16mm rolls.
    pub fn total_partial_rolls_16mm(&self) -> i64 {
        self.rolls_16mm.iter().filter(|r| r.is_partial).count() as i64
    }

    /// Number of partial 35mm rolls.
    pub fn total_partial_rolls_35mm(&self) -> i64 {
        self.rolls_35mm.iter().filter(|r| r.is_partial).count() as i64
    }

    /// Number of 16mm rolls containing at least one split document.
    pub fn total_split_documents_16mm(&self) -> i64 {
        self.rolls_16mm.iter().filter(|r| r.has_split_documents).count() as i64
    }

    /// Number of 35mm rolls containing at least one split document.
    pub fn total_split_documents_35mm(&self) -> i64 {
        self.rolls_35mm.iter().filter(|r| r.has_split_documents).count() as i64
    }
}
