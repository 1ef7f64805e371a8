//! Whole-page processing through the JSON wire format.

use std::fs;
use std::process::Command;

use weldmark::config::TieBreak;
use weldmark::input::parse_pages;
use weldmark::{BoxGeometry, Error, LocatorConfig, PageInput, SymbolKind, SymbolLocator};

const GOOD_PAGE: &str = r#"{
    "page": 1,
    "lines": [
        {"x1": 0, "y1": 0, "x2": 100, "y2": 0},
        {"x1": 0, "y1": 20, "x2": 100, "y2": 20},
        {"x1": 0, "y1": 0, "x2": 0, "y2": 20},
        {"x1": 100, "y1": 0, "x2": 100, "y2": 20},
        {"x1": 300, "y1": 300, "x2": 340, "y2": 340}
    ],
    "spans": [
        {"x0": 40, "y0": 5, "x1": 60, "y1": 15, "text": "W12"},
        {"x0": 400, "y0": 5, "x1": 440, "y1": 15, "text": "NOTE 3"}
    ],
    "paths": [
        {"x0": 510, "y0": 10, "x1": 512, "y1": 12, "kind": "c", "closed": true},
        {"x0": 0, "y0": 0, "x1": 100, "y1": 20, "kind": "re"}
    ],
    "glyphs": [
        {"x0": 500, "y0": 9, "x1": 503, "y1": 15, "char": "4"},
        {"x0": 504, "y0": 9, "x1": 507, "y1": 15, "char": "5"}
    ]
}"#;

const BAD_PAGE: &str = r#"{
    "page": 2,
    "spans": [{"x0": 40, "y0": 5, "x1": 60, "text": "W13"}]
}"#;

mod locator {
    use super::*;

    #[test]
    fn test_good_page() {
        let page = PageInput::from_json(GOOD_PAGE).unwrap();
        let locator = SymbolLocator::new(LocatorConfig::default()).unwrap();
        let result = locator.process_page(&page).unwrap();

        assert_eq!(result.page, 1);
        assert_eq!(result.rects.len(), 1);
        let texts: Vec<&str> = result.records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, vec!["W12", "45°"]);
        assert_eq!(result.stats.boxes.discarded_lines, 1);
        assert_eq!(result.stats.welds, 1);
        assert_eq!(result.stats.angles, 1);
    }

    #[test]
    fn test_malformed_page_is_isolated() {
        let json = format!("[{}, {}, {}]", GOOD_PAGE, BAD_PAGE, GOOD_PAGE);
        let pages = parse_pages(&json).unwrap();
        let locator = SymbolLocator::new(LocatorConfig::default()).unwrap();
        let results = locator.process_raw_pages(pages);

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        match &results[1] {
            Err(Error::MalformedInput {
                record,
                index,
                reason,
            }) => {
                assert_eq!(*record, "span");
                assert_eq!(*index, 0);
                assert!(reason.contains("y1"));
            },
            other => panic!("expected malformed input, got {:?}", other),
        }
        assert_eq!(results[2].as_ref().unwrap().records.len(), 2);
    }

    #[test]
    fn test_wrongly_typed_page_is_isolated() {
        let typed_badly = r#"{
            "page": 2,
            "spans": [{"x0": "forty", "y0": 5, "x1": 60, "y1": 15, "text": "W13"}]
        }"#;
        let json = format!("[{}, {}]", GOOD_PAGE, typed_badly);
        let pages = parse_pages(&json).unwrap();
        assert_eq!(pages.len(), 2);

        let locator = SymbolLocator::new(LocatorConfig::default()).unwrap();
        let results = locator.process_raw_pages(pages);
        assert_eq!(results[0].as_ref().unwrap().records.len(), 2);
        match &results[1] {
            Err(Error::MalformedInput {
                record,
                index,
                reason,
            }) => {
                assert_eq!((*record, *index), ("span", 0));
                assert!(reason.contains("forty"));
            },
            other => panic!("expected malformed input, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_drops_unmatched_text() {
        // Box the "NOTE 3" span too
        let mut page = PageInput::from_json(GOOD_PAGE).unwrap();
        page.lines.extend(
            PageInput::from_json(
                r#"{"lines": [
                    {"x1": 380, "y1": 0, "x2": 460, "y2": 0},
                    {"x1": 380, "y1": 20, "x2": 460, "y2": 20},
                    {"x1": 380, "y1": 0, "x2": 380, "y2": 20},
                    {"x1": 460, "y1": 0, "x2": 460, "y2": 20}
                ]}"#,
            )
            .unwrap()
            .lines,
        );

        // Extended borders also close the spanning boxes; keep the tightest
        let mut config = LocatorConfig::default();
        config.weld.tie_break = TieBreak::SmallestRect;

        let lenient = SymbolLocator::new(config.clone()).unwrap();
        let result = lenient.process_page(&page).unwrap();
        assert_eq!(result.records_of(SymbolKind::Plain).count(), 1);
        assert_eq!(result.records_of(SymbolKind::Weld).count(), 1);

        config.weld.strict = true;
        let strict = SymbolLocator::new(config).unwrap();
        let result = strict.process_page(&page).unwrap();
        assert_eq!(result.records_of(SymbolKind::Plain).count(), 0);
        assert_eq!(result.records_of(SymbolKind::Rejected).count(), 0);
        assert_eq!(result.records_of(SymbolKind::Weld).count(), 1);
    }

    #[test]
    fn test_contour_geometry_from_json() {
        let page = PageInput::from_json(
            r#"{
                "contours": [[
                    {"x": 0, "y": 0}, {"x": 50, "y": 0}, {"x": 100, "y": 0},
                    {"x": 100, "y": 10}, {"x": 100, "y": 20}, {"x": 0, "y": 20}
                ]],
                "spans": [{"x0": 40, "y0": 5, "x1": 60, "y1": 15, "text": "w7"}]
            }"#,
        )
        .unwrap();
        let locator = SymbolLocator::new(LocatorConfig::default())
            .unwrap()
            .with_geometry(BoxGeometry::Contours);
        let result = locator.process_page(&page).unwrap();
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].value.as_deref(), Some("W7"));
    }

    #[test]
    fn test_config_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = LocatorConfig::vector();
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = LocatorConfig::from_json(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, config);
    }
}

mod cli {
    use super::*;

    #[test]
    fn test_cli_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("page.json");
        let svg = dir.path().join("overlay.svg");
        let annotations = dir.path().join("annotations.json");
        fs::write(&input, GOOD_PAGE).unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_locate_symbols"))
            .arg(&input)
            .arg("--svg")
            .arg(&svg)
            .arg("--annotations")
            .arg(&annotations)
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report[0]["records"][0]["text"], "W12");
        assert_eq!(report[0]["records"][1]["kind"], "ANGLE");

        let svg_doc = fs::read_to_string(&svg).unwrap();
        assert!(svg_doc.contains("<rect"));
        assert!(svg_doc.contains("W12"));

        let annots: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&annotations).unwrap()).unwrap();
        assert_eq!(annots.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_cli_reports_failed_page() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pages.json");
        fs::write(&input, format!("[{}, {}]", GOOD_PAGE, BAD_PAGE)).unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_locate_symbols"))
            .arg(&input)
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report[0]["page"], 1);
        assert!(report[1]["error"].as_str().unwrap().contains("span"));
    }

    #[test]
    fn test_cli_unnumbered_pages_get_own_outputs() {
        let page = |x: u32, id: &str| {
            format!(
                r#"{{
                    "lines": [
                        {{"x1": {x0}, "y1": 0, "x2": {x1}, "y2": 0}},
                        {{"x1": {x0}, "y1": 20, "x2": {x1}, "y2": 20}},
                        {{"x1": {x0}, "y1": 0, "x2": {x0}, "y2": 20}},
                        {{"x1": {x1}, "y1": 0, "x2": {x1}, "y2": 20}}
                    ],
                    "spans": [{{"x0": {t0}, "y0": 5, "x1": {t1}, "y1": 15, "text": "{id}"}}]
                }}"#,
                x0 = x,
                x1 = x + 100,
                t0 = x + 40,
                t1 = x + 60,
                id = id
            )
        };
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("pages.json");
        fs::write(&input, format!("[{}, {}]", page(0, "W1"), page(0, "W2"))).unwrap();

        let output = Command::new(env!("CARGO_BIN_EXE_locate_symbols"))
            .arg(&input)
            .arg("--annotations")
            .arg(dir.path().join("ann.json"))
            .output()
            .unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

        for (position, id) in [(0, "W1"), (1, "W2")] {
            let path = dir.path().join(format!("ann-{}-p0.json", position));
            let annots: serde_json::Value =
                serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
            assert_eq!(annots[0]["contents"], id);
        }

        let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(report[1]["position"], 1);
        assert_eq!(report[1]["page"], 0);
    }
}
