//! Page-level orchestration.
//!
//! ```text
//! PageInput
//!     ↓
//! [BoxSource] (lines → boxes, or contours → boxes)
//!     ↓
//! Rect[] ──┐
//!          ├─ [match_spans] → Match[] → [WeldClassifier] ─┐
//! spans ───┘                                               ├─→ ClassifiedRecord[]
//! paths + glyphs → [AngleGrouper] ─────────────────────────┘
//! ```
//!
//! A [`SymbolLocator`] holds only configuration and compiled patterns. It
//! keeps no state between pages, so one instance can serve any number of
//! pages or threads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::boxes::{BoxSource, BoxStats, ContourBoxSource, LineBoxSource};
use crate::classify::{AngleGrouper, ClassifiedRecord, SymbolKind, WeldClassifier};
use crate::config::LocatorConfig;
use crate::error::Result;
use crate::geometry::Rect;
use crate::input::RawPage;
use crate::matcher::match_spans;

pub use crate::input::PageInput;

/// Which page geometry symbol boxes are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxGeometry {
    /// Reconstruct boxes from line segments
    #[default]
    Lines,
    /// Simplify traced contours
    Contours,
}

/// Counters for one processed page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    /// Box source counters
    pub boxes: BoxStats,
    /// Span/box containment pairs
    pub matches: usize,
    /// Weld records
    pub welds: usize,
    /// Angle readings
    pub angles: usize,
    /// Boxed text matching no pattern (lenient mode)
    pub plain: usize,
    /// Boxed text matching no pattern (strict mode, kept records only)
    pub rejected: usize,
}

/// Everything found on one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    /// Page number from the input
    pub page: u32,
    /// Weld records in span order, then angle records in path order
    pub records: Vec<ClassifiedRecord>,
    /// The filtered symbol boxes
    pub rects: Vec<Rect>,
    /// Counters
    pub stats: PageStats,
}

impl PageResult {
    /// Records of one kind.
    pub fn records_of(&self, kind: SymbolKind) -> impl Iterator<Item = &ClassifiedRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}

/// Locates weld identifiers and angle readings on pages.
#[derive(Debug, Clone)]
pub struct SymbolLocator {
    config: LocatorConfig,
    geometry: BoxGeometry,
    welds: WeldClassifier,
    angles: AngleGrouper,
}

impl SymbolLocator {
    /// Create a locator, validating the configuration and compiling the
    /// weld patterns.
    pub fn new(config: LocatorConfig) -> Result<Self> {
        config.validate()?;
        let welds = WeldClassifier::new(&config.weld)?;
        let angles = AngleGrouper::new(config.angle.clone());
        Ok(Self {
            config,
            geometry: BoxGeometry::default(),
            welds,
            angles,
        })
    }

    /// Build boxes from `geometry` instead of line segments.
    pub fn with_geometry(mut self, geometry: BoxGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Box geometry in use.
    pub fn geometry(&self) -> BoxGeometry {
        self.geometry
    }

    /// Run every stage on one page.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MalformedInput`] when the page carries a
    /// non-finite coordinate or an inverted box. Degenerate geometry is
    /// counted in [`PageStats`], not reported as an error.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::config::LocatorConfig;
    /// use weldmark::elements::TextSpan;
    /// use weldmark::geometry::LineSegment;
    /// use weldmark::pipeline::{PageInput, SymbolLocator};
    ///
    /// let page = PageInput {
    ///     lines: vec![
    ///         LineSegment::new(0.0, 0.0, 100.0, 0.0),
    ///         LineSegment::new(0.0, 20.0, 100.0, 20.0),
    ///         LineSegment::new(0.0, 0.0, 0.0, 20.0),
    ///         LineSegment::new(100.0, 0.0, 100.0, 20.0),
    ///     ],
    ///     spans: vec![TextSpan::from_bounds(40.0, 5.0, 60.0, 15.0, "W12")],
    ///     ..Default::default()
    /// };
    /// let locator = SymbolLocator::new(LocatorConfig::default()).unwrap();
    /// let result = locator.process_page(&page).unwrap();
    /// assert_eq!(result.records.len(), 1);
    /// assert_eq!(result.records[0].text, "W12");
    /// ```
    pub fn process_page(&self, page: &PageInput) -> Result<PageResult> {
        page.validate()?;

        let (rects, box_stats) = match self.geometry {
            BoxGeometry::Lines => {
                if page.lines.is_empty() && !page.contours.is_empty() {
                    log::warn!(
                        "page {}: no line segments but {} contours; boxes are built from lines",
                        page.page,
                        page.contours.len()
                    );
                }
                LineBoxSource::new(&page.lines).detect(&self.config)
            },
            BoxGeometry::Contours => {
                if page.contours.is_empty() && !page.lines.is_empty() {
                    log::warn!(
                        "page {}: no contours but {} line segments; boxes are built from contours",
                        page.page,
                        page.lines.len()
                    );
                }
                ContourBoxSource::new(&page.contours).detect(&self.config)
            },
        };

        let matches = match_spans(&page.spans, &rects);
        let mut records = self.welds.classify_matches(&matches);
        records.extend(self.angles.group(&page.paths, &page.glyphs));

        let count = |kind| records.iter().filter(|r| r.kind == kind).count();
        let stats = PageStats {
            boxes: box_stats,
            matches: matches.len(),
            welds: count(SymbolKind::Weld),
            angles: count(SymbolKind::Angle),
            plain: count(SymbolKind::Plain),
            rejected: count(SymbolKind::Rejected),
        };
        log::debug!(
            "page {}: {} boxes, {} welds, {} angles",
            page.page,
            rects.len(),
            stats.welds,
            stats.angles
        );

        Ok(PageResult {
            page: page.page,
            records,
            rects,
            stats,
        })
    }

    /// Process pages independently; a failing page does not stop the rest.
    pub fn process_pages(&self, pages: &[PageInput]) -> Vec<Result<PageResult>> {
        pages
            .iter()
            .map(|page| {
                let result = self.process_page(page);
                if let Err(e) = &result {
                    log::warn!("page {} failed: {}", page.page, e);
                }
                result
            })
            .collect()
    }

    /// Decode, validate and process pages as returned by
    /// [`crate::input::parse_pages`].
    ///
    /// Each page is decoded on its own, so a malformed record (a wrong JSON
    /// type included) fails only the page it belongs to.
    pub fn process_raw_pages(&self, pages: Vec<Value>) -> Vec<Result<PageResult>> {
        pages
            .into_iter()
            .enumerate()
            .map(|(i, value)| {
                let number = value.get("page").and_then(Value::as_u64).unwrap_or(0);
                let result = RawPage::from_value(value)
                    .and_then(PageInput::try_from)
                    .and_then(|page| self.process_page(&page));
                if let Err(e) = &result {
                    log::warn!("page {} (position {}) failed: {}", number, i, e);
                }
                result
            })
            .collect()
    }
}
