// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::needless_range_loop)]
// Allow unused for tests
#![cfg_attr(test, allow(dead_code))]
#![cfg_attr(test, allow(unused_variables))]

//! # weldmark
//!
//! Locates annotation symbols on engineering drawings: boxed weld callouts
//! ("W12") and angle readings typeset as digits next to a small degree
//! circle ("45°").
//!
//! ## How it works
//!
//! - **Boxes from lines**: detected line segments are split into horizontal
//!   and vertical sets, extended far past their ends, and every pair of
//!   horizontals is closed against every pair of verticals. Broken corners
//!   and overshooting edges still produce a box.
//! - **Boxes from contours**: closed outlines traced from a raster page are
//!   simplified (Douglas-Peucker) and kept when they are convex
//!   quadrilaterals.
//! - **Matching**: a text span belongs to every box containing its center.
//! - **Classification**: boxed text is tested against an ordered weld
//!   identifier grammar; degree circles are grouped with nearby digits.
//! - **Emission**: records become overlay draw commands and rectangle
//!   annotation requests for external renderers and document writers.
//!
//! Parsing documents, rasterizing pages and OCR are done by collaborators;
//! the crate consumes their output (see [`input`]) and never touches files
//! itself outside the `locate_symbols` binary.
//!
//! ## Quick Start
//!
//! ```
//! use weldmark::config::LocatorConfig;
//! use weldmark::pipeline::{PageInput, SymbolLocator};
//!
//! # fn main() -> weldmark::Result<()> {
//! let page = PageInput::from_json(
//!     r#"{
//!         "lines": [
//!             {"x1": 0, "y1": 0, "x2": 100, "y2": 0},
//!             {"x1": 0, "y1": 20, "x2": 100, "y2": 20},
//!             {"x1": 0, "y1": 0, "x2": 0, "y2": 20},
//!             {"x1": 100, "y1": 0, "x2": 100, "y2": 20}
//!         ],
//!         "spans": [{"x0": 40, "y0": 5, "x1": 60, "y1": 15, "text": "W12"}]
//!     }"#,
//! )?;
//! let locator = SymbolLocator::new(LocatorConfig::default())?;
//! let result = locator.process_page(&page)?;
//! assert_eq!(result.records[0].text, "W12");
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `raster`: contour detection on grayscale images via `imageproc`
//! - `rendering`: paint overlays onto page images via `tiny-skia`. Labels
//!   are painted as filled tabs sized to the text, not as glyphs; use the
//!   SVG overlay when label text must be readable.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Configuration
pub mod config;

// Geometry primitives and page content
pub mod elements;
pub mod geometry;

// Symbol detection
pub mod boxes;
pub mod classify;
pub mod matcher;

// Input, orchestration and output
pub mod emit;
pub mod input;
pub mod pipeline;

pub use classify::{ClassifiedRecord, RecordGeometry, SymbolKind};
pub use config::LocatorConfig;
pub use error::{Error, Result};
pub use pipeline::{BoxGeometry, PageInput, PageResult, PageStats, SymbolLocator};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
