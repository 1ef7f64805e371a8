//! Page content handed to the locator by extraction collaborators.
//!
//! The locator never parses documents itself. A PDF text extractor, an OCR
//! engine or a vector-graphics walker produces these records, and every stage
//! downstream treats them as read-only.
//!
//! ## Example
//!
//! ```
//! use weldmark::elements::{Glyph, PathKind, TextSpan, VectorPath};
//! use weldmark::geometry::Rect;
//!
//! let span = TextSpan::from_bounds(40.0, 5.0, 60.0, 15.0, "W12");
//! assert_eq!(span.center().x, 50.0);
//!
//! let degree = VectorPath::new(Rect::from_points(10.0, 10.0, 12.0, 12.0), PathKind::Curve);
//! assert!(degree.is_closed_curve());
//!
//! let digit = Glyph::new(Rect::from_points(4.0, 9.0, 8.0, 15.0), '3');
//! assert!(digit.is_digit());
//! ```

mod path;
mod text;

pub use path::{PathKind, VectorPath};
pub use text::{Glyph, TextSpan};
