//! Weld identifier recognition for boxed text.
//!
//! The identifier grammar is a priority-ordered list of regular expressions.
//! Each pattern is anchored to the whole text, so `W12` matches `W\d+` but
//! `XW12Y` does not. Text is trimmed, and upper-cased when the classifier is
//! case-insensitive, before matching; patterns are therefore written in upper
//! case.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ClassifiedRecord, RecordGeometry, SymbolKind};
use crate::config::{default_weld_patterns, TieBreak, WeldClassifierConfig};
use crate::error::{Error, Result};
use crate::matcher::Match;

lazy_static! {
    /// The default grammar, compiled once per process
    static ref DEFAULT_PATTERNS: Vec<(String, Regex)> = default_weld_patterns()
        .into_iter()
        .map(|p| {
            let re = Regex::new(&anchored(&p)).unwrap();
            (p, re)
        })
        .collect();
}

fn anchored(pattern: &str) -> String {
    format!("^(?:{})$", pattern)
}

/// A compiled, ordered weld identifier grammar.
#[derive(Debug, Clone)]
pub struct WeldPatterns {
    /// (source pattern, anchored regex), highest priority first
    patterns: Vec<(String, Regex)>,
    case_insensitive: bool,
}

impl WeldPatterns {
    /// Compile a grammar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] naming the first pattern that fails
    /// to compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::classify::WeldPatterns;
    ///
    /// let grammar = WeldPatterns::compile(&[r"FW\d+".to_string()], true).unwrap();
    /// assert_eq!(grammar.classify("fw3"), Some(0));
    /// assert_eq!(grammar.classify("W3"), None);
    ///
    /// assert!(WeldPatterns::compile(&["W(".to_string()], true).is_err());
    /// ```
    pub fn compile(patterns: &[String], case_insensitive: bool) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(&anchored(p))
                    .map(|re| (p.clone(), re))
                    .map_err(|source| Error::InvalidPattern {
                        pattern: p.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            patterns,
            case_insensitive,
        })
    }

    /// Compile the grammar named by a classifier configuration.
    pub fn from_config(config: &WeldClassifierConfig) -> Result<Self> {
        if config.patterns == default_weld_patterns() {
            return Ok(Self {
                patterns: DEFAULT_PATTERNS.clone(),
                case_insensitive: config.case_insensitive,
            });
        }
        Self::compile(&config.patterns, config.case_insensitive)
    }

    /// Trim and, if case-insensitive, upper-case `text`.
    pub fn normalize(&self, text: &str) -> String {
        let trimmed = text.trim();
        if self.case_insensitive {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// Index of the first pattern matching `text`, if any.
    ///
    /// Total: every string either matches a pattern or yields `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use weldmark::classify::WeldPatterns;
    ///
    /// let grammar = WeldPatterns::default();
    /// assert_eq!(grammar.classify("W12"), Some(0));
    /// assert_eq!(grammar.classify(" w12a "), Some(0));
    /// assert_eq!(grammar.classify("42"), Some(1));
    /// assert_eq!(grammar.classify("FW3"), Some(2));
    /// assert_eq!(grammar.classify("NOTE"), None);
    /// ```
    pub fn classify(&self, text: &str) -> Option<usize> {
        let normalized = self.normalize(text);
        self.patterns
            .iter()
            .position(|(_, re)| re.is_match(&normalized))
    }

    /// Source text of the pattern at `index`.
    pub fn pattern(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(|(p, _)| p.as_str())
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the grammar has no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for WeldPatterns {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS.clone(),
            case_insensitive: true,
        }
    }
}

/// Turns span/box matches into weld records.
#[derive(Debug, Clone)]
pub struct WeldClassifier {
    patterns: WeldPatterns,
    strict: bool,
    keep_rejected: bool,
    tie_break: TieBreak,
}

impl WeldClassifier {
    /// Build a classifier, compiling its patterns.
    pub fn new(config: &WeldClassifierConfig) -> Result<Self> {
        Ok(Self {
            patterns: WeldPatterns::from_config(config)?,
            strict: config.strict,
            keep_rejected: config.keep_rejected,
            tie_break: config.tie_break,
        })
    }

    /// The compiled grammar.
    pub fn patterns(&self) -> &WeldPatterns {
        &self.patterns
    }

    /// Kind assigned to `text`.
    pub fn kind_of(&self, text: &str) -> SymbolKind {
        match self.patterns.classify(text) {
            Some(_) => SymbolKind::Weld,
            None if self.strict => SymbolKind::Rejected,
            None => SymbolKind::Plain,
        }
    }

    /// Classify every match, one record per surviving match.
    ///
    /// Matches are expected in [`crate::matcher::match_spans`] order. With
    /// [`TieBreak::SmallestRect`] a span inside several boxes keeps only its
    /// smallest box (lowest box index on equal area). Rejected records are
    /// dropped unless `keep_rejected` is set.
    pub fn classify_matches(&self, matches: &[Match]) -> Vec<ClassifiedRecord> {
        let kept: Vec<&Match> = match self.tie_break {
            TieBreak::KeepAll => matches.iter().collect(),
            TieBreak::SmallestRect => smallest_per_span(matches),
        };

        let mut rejected = 0usize;
        let records: Vec<ClassifiedRecord> = kept
            .into_iter()
            .filter_map(|m| {
                let kind = self.kind_of(&m.span.text);
                if kind == SymbolKind::Rejected && !self.keep_rejected {
                    rejected += 1;
                    return None;
                }
                let value = (kind == SymbolKind::Weld).then(|| self.patterns.normalize(&m.span.text));
                Some(ClassifiedRecord {
                    text: m.span.text.trim().to_string(),
                    kind,
                    text_bbox: m.span.bbox,
                    value,
                    geometry: RecordGeometry::Box { rect_bbox: m.rect },
                })
            })
            .collect();

        if rejected > 0 {
            log::debug!("dropped {} rejected boxed spans", rejected);
        }
        records
    }
}

/// One-shot classification with a configuration.
///
/// Compiles the configured patterns on every call; hold a
/// [`WeldClassifier`] when classifying many pages.
pub fn classify_matches(
    matches: &[Match],
    config: &WeldClassifierConfig,
) -> Result<Vec<ClassifiedRecord>> {
    Ok(WeldClassifier::new(config)?.classify_matches(matches))
}

fn smallest_per_span(matches: &[Match]) -> Vec<&Match> {
    let mut kept: Vec<&Match> = Vec::new();
    for m in matches {
        if let Some(best) = kept.last_mut() {
            if best.span_index == m.span_index {
                let area = m.rect.area();
                let best_area = best.rect.area();
                if area < best_area || (area == best_area && m.rect_index < best.rect_index) {
                    *best = m;
                }
                continue;
            }
        }
        kept.push(m);
    }
    kept
}
