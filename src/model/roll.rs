//! Film roll and document segment models.

use super::{document::PageRange, FilmType};

/// A roll's lifecycle status, as stored in the durable schema's `status`
/// column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollStatus {
    /// The roll can still accept segments.
    Active,
    /// The roll was closed with unused capacity (see `is_partial`).
    Partial,
    /// The roll was filled to capacity.
    Full,
}

impl RollStatus {
    /// The wire representation stored in the database and exported JSON.
    pub const fn as_str(self) -> &'static str {
        match self {
            RollStatus::Active => "active",
            RollStatus::Partial => "partial",
            RollStatus::Full => "full",
        }
    }
}

impl std::fmt::Display for RollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous placement of one document (or a split piece of one) on a
/// single roll.
#[derive(Debug, Clone)]
pub struct DocumentSegment {
    /// The source document's stable identifier.
    pub doc_id: String,
    /// The source document's filesystem path.
    pub path: std::path::PathBuf,
    /// Number of pages placed in this segment.
    pub pages: i64,
    /// The sub-range of the source document placed here. For an unsplit
    /// document this is `{1, pages}`.
    pub page_range: PageRange,
    /// The segment's absolute position on the roll, 1-based inclusive.
    pub frame_range: PageRange,
    /// 1-based insertion order within the roll.
    pub document_index: i64,
    /// Whether this segment carries oversized pages. Always `true` for
    /// 35mm segments regardless of the source document's flag.
    pub has_oversized: bool,
}

/// A physical film roll of a given format, filling up as segments are
/// added.
#[derive(Debug, Clone)]
pub struct FilmRoll {
    /// 1-based index within this format's roll list for the allocation.
    pub roll_id: i64,
    /// The film stock format.
    pub film_type: FilmType,
    /// Maximum frames this roll can hold.
    pub capacity: i64,
    /// Frames consumed so far.
    pub pages_used: i64,
    /// Frames left (`capacity - pages_used`).
    pub pages_remaining: i64,
    /// Segments placed on this roll, in insertion order.
    pub segments: Vec<DocumentSegment>,
    /// The issued film number; empty until [`crate::store::filmnumber`]
    /// assigns one.
    pub film_number: String,
    /// Lifecycle status.
    pub status: RollStatus,
    /// Whether any document placed here continues onto another roll.
    pub has_split_documents: bool,
    /// Whether this roll was closed with unused capacity.
    pub is_partial: bool,
    /// Equal to `pages_remaining` when `is_partial`; `0` otherwise.
    pub remaining_capacity: i64,
    /// `max(0, pages_remaining - padding)` when `is_partial`; `0`
    /// otherwise.
    pub usable_capacity: i64,
    /// ISO-8601 timestamp of roll creation.
    pub creation_date: String,
}

impl FilmRoll {
    /// Creates an empty roll of the given format at the given 1-based
    /// index.
    pub fn new(roll_id: i64, film_type: FilmType) -> Self {
        let capacity = film_type.capacity();
        Self {
            roll_id,
            film_type,
            capacity,
            pages_used: 0,
            pages_remaining: capacity,
            segments: Vec::new(),
            film_number: String::new(),
            status: RollStatus::Active,
            has_split_documents: false,
            is_partial: false,
            remaining_capacity: 0,
            usable_capacity: 0,
            creation_date: crate::util::current_timestamp(),
        }
    }

    /// Appends a segment, advancing `pages_used`/`pages_remaining` and
    /// returning the segment's 1-based `document_index`.
    ///
    /// Returns [`crate::MicrofilmError::Allocation`] if `pages` exceeds
    /// `pages_remaining`; callers (the allocators) are responsible for
    /// never reaching this case.
    pub fn add_segment(
        &mut self,
        doc_id: impl Into<String>,
        path: impl Into<std::path::PathBuf>,
        pages: i64,
        page_range: PageRange,
        has_oversized: bool,
    ) -> crate::Result<i64> {
        if pages > self.pages_remaining {
            return Err(crate::MicrofilmError::Allocation(format!(
                "segment of {pages} pages does not fit in {} remaining frames on roll {}",
                self.pages_remaining, self.roll_id
            )));
        }

        let start_frame = self.pages_used + 1;
        let end_frame = start_frame + pages - 1;
        let document_index = self.segments.len() as i64 + 1;

        self.segments.push(DocumentSegment {
            doc_id: doc_id.into(),
            path: path.into(),
            pages,
            page_range,
            frame_range: PageRange::new(start_frame, end_frame),
            document_index,
            has_oversized,
        });

        self.pages_used += pages;
        self.pages_remaining -= pages;

        Ok(document_index)
    }

    /// Marks this roll partial: it will not be filled further, either
    /// because the next document doesn't fit or because it is the last
    /// roll at the end of allocation.
    pub fn mark_partial(&mut self) {
        self.is_partial = true;
        self.status = RollStatus::Partial;
        self.remaining_capacity = self.pages_remaining;
        self.usable_capacity = (self.pages_remaining - self.film_type.padding()).max(0);
    }
}
