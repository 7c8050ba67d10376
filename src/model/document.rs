//! Document and per-page dimension models.

/// An inclusive, 1-based page range (`start <= end`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PageRange {
    /// First page in the range, 1-based.
    pub start: i64,
    /// Last page in the range, 1-based, inclusive.
    pub end: i64,
}

impl PageRange {
    /// Builds a range, asserting the invariant `start <= end`.
    pub fn new(start: i64, end: i64) -> Self {
        debug_assert!(start <= end, "page range start must not exceed end");
        Self { start, end }
    }

    /// Number of pages covered by this range.
    pub fn len(&self) -> i64 {
        self.end - self.start + 1
    }

    /// A range never contains zero or fewer pages by construction, but the
    /// accessor is provided for clippy's `len_without_is_empty` lint.
    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }
}

/// One page's dimensions, recorded only when the page is oversized.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageDimension {
    /// Page width in PostScript points.
    pub width: f64,
    /// Page height in PostScript points.
    pub height: f64,
    /// 0-based page index within the document.
    pub page_index: i64,
    /// Maximum dimensional excess over the oversize threshold, as a
    /// percentage.
    pub percent_over: f64,
}

/// A single PDF document and everything derived from its page dimensions.
#[derive(Debug, Clone)]
pub struct Document {
    /// Stable identifier: a run of leading digits from the filename, else
    /// the filename stem.
    pub doc_id: String,
    /// Filesystem path to the PDF.
    pub path: std::path::PathBuf,
    /// Regular page count (not including reference pages).
    pub pages: i64,
    /// Whether this document has at least one oversized page.
    pub has_oversized: bool,
    /// Total number of oversized pages across all ranges.
    pub total_oversized: i64,
    /// Dimensions of each oversized page.
    pub dimensions: Vec<PageDimension>,
    /// Consecutive oversized pages merged into inclusive ranges.
    pub ranges: Vec<PageRange>,
    /// One reference page per range, at that range's start page.
    pub reference_pages: Vec<i64>,
    /// `reference_pages.len()`.
    pub total_references: i64,
    /// Whether this document was split across more than one 16mm roll.
    pub is_split: bool,
    /// Number of consecutive 16mm rolls this document occupies.
    pub roll_count: i64,
    /// Foreign key into the companion spreadsheet (COM list), if resolved.
    /// `None` corresponds to the original implementation's sentinel `-1`.
    pub com_id: Option<i64>,
}

impl Document {
    /// Creates a document with no oversized pages and no references yet;
    /// the detector and reference planner populate the rest.
    pub fn new(doc_id: impl Into<String>, path: impl Into<std::path::PathBuf>) -> Self {
        Self {
            doc_id: doc_id.into(),
            path: path.into(),
            pages: 0,
            has_oversized: false,
            total_oversized: 0,
            dimensions: Vec::new(),
            ranges: Vec::new(),
            reference_pages: Vec::new(),
            total_references: 0,
            is_split: false,
            roll_count: 1,
            com_id: None,
        }
    }

    /// `pages + total_references`: the page count the allocators place.
    pub fn effective_page_count(&self) -> i64 {
        self.pages + self.total_references
    }

    /// `total_oversized + total_references`: the page count the 35mm
    /// allocator places for this document.
    pub fn effective_oversized_count(&self) -> i64 {
        self.total_oversized + self.total_references
    }

    /// The numeric portion of `doc_id` used for ordering, falling back to
    /// `i64::MAX` when `doc_id` has no leading digits (lexicographic
    /// tiebreak then applies).
    pub fn numeric_id(&self) -> i64 {
        let digits: String = self.doc_id.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse().unwrap_or(i64::MAX)
    }
}

/// Orders documents by numeric `doc_id`, falling back to lexicographic
/// comparison of the full id on ties (matches spec §4.2 / §4.5).
pub fn compare_documents(a: &Document, b: &Document) -> std::cmp::Ordering {
    a.numeric_id()
        .cmp(&b.numeric_id())
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}
