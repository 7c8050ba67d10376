//! Data models for projects, documents, and film rolls.
//!
//! This module defines the core structures that flow through the
//! allocation pipeline: a [`Project`] aggregates [`Document`]s and, once
//! allocated, a single [`FilmAllocation`] of [`FilmRoll`]s.
//!
//! # Key types
//!
//! - [`Project`] — an archive folder's metadata and its documents
//! - [`Document`] — one PDF, its oversized-page ranges, and reference pages
//! - [`FilmRoll`] / [`DocumentSegment`] — a physical roll and its contents
//! - [`FilmAllocation`] — the two roll streams (16mm, 35mm) for a project

mod allocation;
mod document;
mod project;
mod roll;

pub use allocation::FilmAllocation;
pub use document::{compare_documents, Document, PageDimension, PageRange};
pub use project::Project;
pub use roll::{DocumentSegment, FilmRoll, RollStatus};

/// Film stock format. The allocator is parameterized by `(capacity,
/// padding)` rather than subclassed per format — both streams share one
/// packing routine in [`crate::allocate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilmType {
    /// 16mm roll film: the primary stream, carrying every document.
    Mm16,
    /// 35mm roll film: carries only oversized-page spans, mirrored from
    /// the 16mm stream.
    Mm35,
}

impl FilmType {
    /// The roll capacity, in frames, for this format.
    pub const fn capacity(self) -> i64 {
        match self {
            FilmType::Mm16 => CAPACITY_16MM,
            FilmType::Mm35 => CAPACITY_35MM,
        }
    }

    /// The padding reserve, in frames, for this format.
    pub const fn padding(self) -> i64 {
        match self {
            FilmType::Mm16 => PADDING_16MM,
            FilmType::Mm35 => PADDING_35MM,
        }
    }

    /// The wire representation used in the durable store and exported
    /// JSON (`"16mm"` / `"35mm"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            FilmType::Mm16 => "16mm",
            FilmType::Mm35 => "35mm",
        }
    }
}

impl std::fmt::Display for FilmType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum frames on a 16mm roll.
pub const CAPACITY_16MM: i64 = 2900;
/// Maximum frames on a 35mm roll.
pub const CAPACITY_35MM: i64 = 690;
/// Frames reserved at the tail of a partial 16mm roll.
pub const PADDING_16MM: i64 = 150;
/// Frames reserved at the tail of a partial 35mm roll.
pub const PADDING_35MM: i64 = 150;
/// A page is oversized if either orientation exceeds this width in points.
pub const OVERSIZE_THRESHOLD_WIDTH: f64 = 842.0;
/// A page is oversized if either orientation exceeds this height in points.
pub const OVERSIZE_THRESHOLD_HEIGHT: f64 = 1191.0;

/// Maps a location token to its single-digit film-number location code,
/// per the fixed table `{OU -> "1", DW -> "2", otherwise -> "3"}`.
pub fn location_code(location: &str) -> &'static str {
    match location {
        "OU" => "1",
        "DW" => "2",
        _ => "3",
    }
}
