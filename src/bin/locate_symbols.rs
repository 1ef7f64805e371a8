//! Locate weld callouts and angle readings on pages exported as JSON.
//!
//! Usage:
//!   locate_symbols <pages.json> [--config cfg.json] [--preset raster|vector]
//!                  [--geometry lines|contours] [--strict]
//!                  [--svg out.svg] [--annotations out.json]
//!
//! `pages.json` holds one page object or an array of them. Records are
//! printed to stdout as JSON, one entry per page. With several pages the
//! SVG and annotation paths get a `-<position>-p<page>` suffix, where
//! `position` counts pages in input order from 0; page numbers may be
//! missing or repeated.
//!
//! Set `RUST_LOG=debug` for per-stage counts.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use weldmark::config::LocatorConfig;
use weldmark::emit::{AnnotationList, ResultEmitter, SvgOverlay};
use weldmark::input::parse_pages;
use weldmark::{BoxGeometry, PageResult, Result, SymbolLocator};

struct Args {
    input: PathBuf,
    config: Option<PathBuf>,
    preset: Option<String>,
    geometry: BoxGeometry,
    strict: bool,
    svg: Option<PathBuf>,
    annotations: Option<PathBuf>,
}

impl Args {
    fn from_args() -> std::result::Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut config = None;
        let mut preset = None;
        let mut geometry = BoxGeometry::Lines;
        let mut strict = false;
        let mut svg = None;
        let mut annotations = None;

        let mut i = 1;
        while i < args.len() {
            let value = |i: usize| {
                args.get(i + 1)
                    .cloned()
                    .ok_or_else(|| format!("{} needs a value", args[i]))
            };
            match args[i].as_str() {
                "--config" => {
                    config = Some(PathBuf::from(value(i)?));
                    i += 1;
                },
                "--preset" => {
                    preset = Some(value(i)?);
                    i += 1;
                },
                "--geometry" => {
                    geometry = match value(i)?.as_str() {
                        "lines" => BoxGeometry::Lines,
                        "contours" => BoxGeometry::Contours,
                        other => return Err(format!("unknown geometry '{}'", other)),
                    };
                    i += 1;
                },
                "--strict" => {
                    strict = true;
                },
                "--svg" => {
                    svg = Some(PathBuf::from(value(i)?));
                    i += 1;
                },
                "--annotations" => {
                    annotations = Some(PathBuf::from(value(i)?));
                    i += 1;
                },
                "--help" | "-h" => return Err(String::new()),
                other if other.starts_with("--") => {
                    return Err(format!("unknown option '{}'", other));
                },
                other => {
                    input = Some(PathBuf::from(other));
                },
            }
            i += 1;
        }

        Ok(Self {
            input: input.ok_or_else(|| "missing input file".to_string())?,
            config,
            preset,
            geometry,
            strict,
            svg,
            annotations,
        })
    }

    fn locator_config(&self) -> std::result::Result<LocatorConfig, String> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
                LocatorConfig::from_json(&json).map_err(|e| e.to_string())?
            },
            None => match self.preset.as_deref() {
                None => LocatorConfig::default(),
                Some("raster") => LocatorConfig::raster(),
                Some("vector") => LocatorConfig::vector(),
                Some(other) => return Err(format!("unknown preset '{}'", other)),
            },
        };
        if self.strict {
            config.weld.strict = true;
        }
        Ok(config)
    }
}

fn page_path(base: &Path, position: usize, page: u32, many: bool) -> PathBuf {
    if !many {
        return base.to_path_buf();
    }
    let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("page");
    let name = match base.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}-{}-p{}.{}", stem, position, page, ext),
        None => format!("{}-{}-p{}", stem, position, page),
    };
    base.with_file_name(name)
}

fn write_outputs(args: &Args, position: usize, result: &PageResult, many: bool) -> Result<()> {
    let emitter = ResultEmitter::default();

    if let Some(base) = &args.svg {
        let extent = result
            .rects
            .iter()
            .copied()
            .chain(result.records.iter().map(|r| r.highlight_rect()))
            .fold((0.0f64, 0.0f64), |(w, h), r| (w.max(r.right()), h.max(r.bottom())));
        let mut svg = SvgOverlay::new(extent.0 + 20.0, extent.1 + 20.0);
        emitter.emit_overlay(&result.records, &mut svg);
        fs::write(page_path(base, position, result.page, many), svg.finish())?;
    }

    if let Some(base) = &args.annotations {
        let mut list = AnnotationList::default();
        emitter.emit_annotations(&result.records, &mut list);
        fs::write(page_path(base, position, result.page, many), list.to_json()?)?;
    }
    Ok(())
}

fn run(args: &Args) -> std::result::Result<bool, String> {
    let config = args.locator_config()?;
    let locator = SymbolLocator::new(config)
        .map_err(|e| e.to_string())?
        .with_geometry(args.geometry);

    let json = fs::read_to_string(&args.input)
        .map_err(|e| format!("cannot read {}: {}", args.input.display(), e))?;
    let pages = parse_pages(&json).map_err(|e| e.to_string())?;
    let many = pages.len() > 1;

    let mut all_ok = true;
    let mut report = Vec::new();
    for (i, result) in locator.process_raw_pages(pages).into_iter().enumerate() {
        match result {
            Ok(result) => {
                write_outputs(args, i, &result, many).map_err(|e| e.to_string())?;
                report.push(serde_json::json!({
                    "position": i,
                    "page": result.page,
                    "records": result.records,
                    "stats": result.stats,
                }));
            },
            Err(e) => {
                all_ok = false;
                eprintln!("page at position {}: {}", i, e);
                report.push(serde_json::json!({ "position": i, "error": e.to_string() }));
            },
        }
    }

    let out = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
    println!("{}", out);
    Ok(all_ok)
}

fn main() -> ExitCode {
    env_logger::init();

    let args = match Args::from_args() {
        Ok(args) => args,
        Err(msg) => {
            if !msg.is_empty() {
                eprintln!("error: {}", msg);
            }
            eprintln!(
                "usage: locate_symbols <pages.json> [--config cfg.json] [--preset raster|vector] \
                 [--geometry lines|contours] [--strict] [--svg out.svg] [--annotations out.json]"
            );
            return ExitCode::from(2);
        },
    };

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(msg) => {
            eprintln!("error: {}", msg);
            ExitCode::from(2)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path_single_page_unchanged() {
        let base = Path::new("out/overlay.svg");
        assert_eq!(page_path(base, 0, 7, false), PathBuf::from("out/overlay.svg"));
    }

    #[test]
    fn test_page_path_unique_per_position() {
        let base = Path::new("out/ann.json");
        assert_eq!(page_path(base, 0, 0, true), PathBuf::from("out/ann-0-p0.json"));
        assert_eq!(page_path(base, 1, 0, true), PathBuf::from("out/ann-1-p0.json"));
        assert_eq!(page_path(Path::new("ann"), 2, 5, true), PathBuf::from("ann-2-p5"));
    }
}
