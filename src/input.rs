//! Page input as exchanged with extraction collaborators.
//!
//! Collaborators write one JSON object per page:
//!
//! ```json
//! {
//!   "page": 1,
//!   "lines":    [{"x1": 0, "y1": 0, "x2": 100, "y2": 0}],
//!   "contours": [[{"x": 0, "y": 0}, {"x": 100, "y": 0}, {"x": 100, "y": 20}]],
//!   "spans":    [{"x0": 40, "y0": 5, "x1": 60, "y1": 15, "text": "W12"}],
//!   "paths":    [{"x0": 10, "y0": 10, "x1": 12, "y1": 12, "kind": "c", "closed": true}],
//!   "glyphs":   [{"x0": 4, "y0": 9, "x1": 8, "y1": 15, "char": "3"}]
//! }
//! ```
//!
//! Every record family is optional and every field in a record is
//! optional at the wire level, so a partial record still parses. A field of
//! the wrong JSON type fails [`RawPage::from_value`] for that page only.
//! [`PageInput::try_from`] is where record contents are checked: a missing field, a
//! non-finite coordinate, an inverted box, a glyph that is not exactly one
//! character or an unknown path kind fails the whole page with
//! [`Error::MalformedInput`]. `closed` defaults to `true` when absent.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::boxes::Contour;
use crate::elements::{Glyph, PathKind, TextSpan, VectorPath};
use crate::error::{Error, Result};
use crate::geometry::{LineSegment, Point, Rect};

/// Raw line segment record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLine {
    /// Start x
    pub x1: Option<f64>,
    /// Start y
    pub y1: Option<f64>,
    /// End x
    pub x2: Option<f64>,
    /// End y
    pub y2: Option<f64>,
}

/// Raw contour point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    /// X coordinate
    pub x: Option<f64>,
    /// Y coordinate
    pub y: Option<f64>,
}

/// Raw text span record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSpan {
    /// Left edge
    pub x0: Option<f64>,
    /// Top edge
    pub y0: Option<f64>,
    /// Right edge
    pub x1: Option<f64>,
    /// Bottom edge
    pub y1: Option<f64>,
    /// Span text
    pub text: Option<String>,
}

/// Raw vector path record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPath {
    /// Left edge
    pub x0: Option<f64>,
    /// Top edge
    pub y0: Option<f64>,
    /// Right edge
    pub x1: Option<f64>,
    /// Bottom edge
    pub y1: Option<f64>,
    /// Path kind code ("l", "re", "qu", "c") or full name
    pub kind: Option<String>,
    /// Whether the path is closed (default true)
    pub closed: Option<bool>,
}

/// Raw glyph record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawGlyph {
    /// Left edge
    pub x0: Option<f64>,
    /// Top edge
    pub y0: Option<f64>,
    /// Right edge
    pub x1: Option<f64>,
    /// Bottom edge
    pub y1: Option<f64>,
    /// The glyph's character, as a one-character string
    #[serde(rename = "char")]
    pub ch: Option<String>,
}

/// One page as written by a collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPage {
    /// Page number, for reporting only
    pub page: Option<u32>,
    /// Line segment records
    pub lines: Vec<RawLine>,
    /// Closed contours, one point list each
    pub contours: Vec<Vec<RawPoint>>,
    /// Text span records
    pub spans: Vec<RawSpan>,
    /// Vector path records
    pub paths: Vec<RawPath>,
    /// Glyph records
    pub glyphs: Vec<RawGlyph>,
}

impl RawPage {
    /// Decode one page object, one record at a time.
    ///
    /// A record whose fields have the wrong JSON type fails with
    /// [`Error::MalformedInput`] naming its family and index. Page-level
    /// problems (not an object, a family that is not an array, a bad `page`
    /// number) are reported against the `"page"` record at index 0.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(Error::malformed("page", 0, "expected a JSON object"));
        };
        let page = match map.remove("page") {
            None | Some(Value::Null) => None,
            Some(v) => Some(
                serde_json::from_value(v)
                    .map_err(|e| Error::malformed("page", 0, format!("field 'page': {}", e)))?,
            ),
        };
        Ok(RawPage {
            page,
            lines: records(&mut map, "lines", "line")?,
            contours: records(&mut map, "contours", "contour")?,
            spans: records(&mut map, "spans", "span")?,
            paths: records(&mut map, "paths", "path")?,
            glyphs: records(&mut map, "glyphs", "glyph")?,
        })
    }
}

fn records<T: DeserializeOwned>(
    map: &mut Map<String, Value>,
    key: &str,
    record: &'static str,
) -> Result<Vec<T>> {
    let items = match map.remove(key) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::malformed(
                "page",
                0,
                format!("field '{}' is not an array", key),
            ))
        },
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| Error::malformed(record, i, e.to_string()))
        })
        .collect()
}

/// Parse a JSON document holding a single page object or an array of pages.
///
/// Only JSON syntax is checked here. Pages stay as untyped values until
/// [`RawPage::from_value`] and [`PageInput::try_from`] decode them one at a
/// time, so one bad page does not hide the others.
pub fn parse_pages(json: &str) -> Result<Vec<Value>> {
    Ok(match serde_json::from_str(json)? {
        Value::Array(pages) => pages,
        page => vec![page],
    })
}

/// A validated page, ready for the locator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageInput {
    /// Page number (0 when the collaborator did not say)
    pub page: u32,
    /// Detected line segments
    pub lines: Vec<LineSegment>,
    /// Traced closed contours
    pub contours: Vec<Contour>,
    /// Text spans
    pub spans: Vec<TextSpan>,
    /// Painted vector paths
    pub paths: Vec<VectorPath>,
    /// Individual glyphs
    pub glyphs: Vec<Glyph>,
}

impl PageInput {
    /// Parse and validate a single-page JSON object.
    pub fn from_json(json: &str) -> Result<Self> {
        PageInput::try_from(RawPage::from_value(serde_json::from_str(json)?)?)
    }

    /// Re-check the numeric rules for a page built in code rather than
    /// parsed: every coordinate finite and no box with negative size.
    pub fn validate(&self) -> Result<()> {
        for (i, l) in self.lines.iter().enumerate() {
            if !l.is_finite() {
                return Err(Error::malformed("line", i, "coordinate is not finite"));
            }
        }
        for (i, c) in self.contours.iter().enumerate() {
            if !c.points.iter().all(Point::is_finite) {
                return Err(Error::malformed("contour", i, "coordinate is not finite"));
            }
        }
        check_boxes("span", self.spans.iter().map(|s| &s.bbox))?;
        check_boxes("path", self.paths.iter().map(|p| &p.bbox))?;
        check_boxes("glyph", self.glyphs.iter().map(|g| &g.bbox))?;
        Ok(())
    }
}

fn check_boxes<'a>(record: &'static str, boxes: impl Iterator<Item = &'a Rect>) -> Result<()> {
    for (i, b) in boxes.enumerate() {
        if !b.is_finite() {
            return Err(Error::malformed(record, i, "coordinate is not finite"));
        }
        if b.width < 0.0 || b.height < 0.0 {
            return Err(Error::malformed(record, i, "inverted box"));
        }
    }
    Ok(())
}

impl TryFrom<RawPage> for PageInput {
    type Error = Error;

    fn try_from(raw: RawPage) -> Result<Self> {
        let lines = raw
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| validate_line(i, l))
            .collect::<Result<Vec<_>>>()?;
        let contours = raw
            .contours
            .iter()
            .enumerate()
            .map(|(i, c)| validate_contour(i, c))
            .collect::<Result<Vec<_>>>()?;
        let spans = raw
            .spans
            .into_iter()
            .enumerate()
            .map(|(i, s)| validate_span(i, s))
            .collect::<Result<Vec<_>>>()?;
        let paths = raw
            .paths
            .iter()
            .enumerate()
            .map(|(i, p)| validate_path(i, p))
            .collect::<Result<Vec<_>>>()?;
        let glyphs = raw
            .glyphs
            .iter()
            .enumerate()
            .map(|(i, g)| validate_glyph(i, g))
            .collect::<Result<Vec<_>>>()?;

        Ok(PageInput {
            page: raw.page.unwrap_or(0),
            lines,
            contours,
            spans,
            paths,
            glyphs,
        })
    }
}

fn coordinate(record: &'static str, index: usize, field: &str, value: Option<f64>) -> Result<f64> {
    let v = value.ok_or_else(|| Error::malformed(record, index, format!("missing field '{}'", field)))?;
    if !v.is_finite() {
        return Err(Error::malformed(
            record,
            index,
            format!("field '{}' is not finite", field),
        ));
    }
    Ok(v)
}

fn bounds(
    record: &'static str,
    index: usize,
    x0: Option<f64>,
    y0: Option<f64>,
    x1: Option<f64>,
    y1: Option<f64>,
) -> Result<Rect> {
    let x0 = coordinate(record, index, "x0", x0)?;
    let y0 = coordinate(record, index, "y0", y0)?;
    let x1 = coordinate(record, index, "x1", x1)?;
    let y1 = coordinate(record, index, "y1", y1)?;
    if x1 < x0 || y1 < y0 {
        return Err(Error::malformed(
            record,
            index,
            format!("inverted box ({}, {}) - ({}, {})", x0, y0, x1, y1),
        ));
    }
    Ok(Rect::from_points(x0, y0, x1, y1))
}

fn validate_line(index: usize, raw: &RawLine) -> Result<LineSegment> {
    Ok(LineSegment::new(
        coordinate("line", index, "x1", raw.x1)?,
        coordinate("line", index, "y1", raw.y1)?,
        coordinate("line", index, "x2", raw.x2)?,
        coordinate("line", index, "y2", raw.y2)?,
    ))
}

fn validate_contour(index: usize, raw: &[RawPoint]) -> Result<Contour> {
    let points = raw
        .iter()
        .map(|p| {
            Ok(Point::new(
                coordinate("contour", index, "x", p.x)?,
                coordinate("contour", index, "y", p.y)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Contour::new(points))
}

fn validate_span(index: usize, raw: RawSpan) -> Result<TextSpan> {
    let bbox = bounds("span", index, raw.x0, raw.y0, raw.x1, raw.y1)?;
    let text = raw
        .text
        .ok_or_else(|| Error::malformed("span", index, "missing field 'text'"))?;
    Ok(TextSpan::new(bbox, text))
}

fn validate_path(index: usize, raw: &RawPath) -> Result<VectorPath> {
    let bbox = bounds("path", index, raw.x0, raw.y0, raw.x1, raw.y1)?;
    let code = raw
        .kind
        .as_deref()
        .ok_or_else(|| Error::malformed("path", index, "missing field 'kind'"))?;
    let kind = PathKind::from_code(code)
        .ok_or_else(|| Error::malformed("path", index, format!("unknown path kind '{}'", code)))?;
    let mut path = VectorPath::new(bbox, kind);
    path.closed = raw.closed.unwrap_or(true);
    Ok(path)
}

fn validate_glyph(index: usize, raw: &RawGlyph) -> Result<Glyph> {
    let bbox = bounds("glyph", index, raw.x0, raw.y0, raw.x1, raw.y1)?;
    let s = raw
        .ch
        .as_deref()
        .ok_or_else(|| Error::malformed("glyph", index, "missing field 'char'"))?;
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(Glyph::new(bbox, ch)),
        _ => Err(Error::malformed(
            "glyph",
            index,
            format!("expected exactly one character, got {:?}", s),
        )),
    }
}
