//! gatha-extract - Extract verse entities from an hOCR file
//!
//! Reads an hOCR document, stitches numbered verses out of its line and word
//! geometry, groups them into single and composite text entities, and writes
//! two CSV tables: `id,label,text_body` and `text_id,verse_number`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use csv::WriterBuilder;
use gatha_core::api::{ExtractOptions, Extraction, extract_from_path};
use gatha_core::entities::{EntityOrder, TextEntity, VerseMapping, parse_pairs};
use gatha_core::params::{ExtractParams, PageWindow};
use serde::Serialize;
use tracing::info;

const DEFAULT_PAIRS: &str = "58-59,104-105,153-154,195-196,229-230,256-257,268-269,271-272";

/// Entity numbering order.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Order {
    /// Composite pairs first, then single verses ascending (default)
    #[default]
    CompositesFirst,
    /// Every entity by its lowest verse number
    ByVerse,
}

impl From<Order> for EntityOrder {
    fn from(order: Order) -> Self {
        match order {
            Order::CompositesFirst => EntityOrder::CompositesFirst,
            Order::ByVerse => EntityOrder::ByVerse,
        }
    }
}

/// Extract numbered verses from an hOCR file into CSV tables.
#[derive(Parser, Debug)]
#[command(name = "gatha-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// hOCR HTML file
    #[arg(long = "in", default_value = "2015.223782.The-Dhammapada_hocr.html")]
    input: PathBuf,

    /// Output CSV for texts (id,label,text_body)
    #[arg(long, default_value = "texts.csv")]
    texts: PathBuf,

    /// Output CSV for text_verses (text_id,verse_number)
    #[arg(long = "text-verses", default_value = "text_verses.csv")]
    text_verses: PathBuf,

    /// Optional JSON dump of entities, mappings and pass statistics
    #[arg(long)]
    json: Option<PathBuf>,

    /// Minimum printed page number to parse (inclusive, hOCR ppageno)
    #[arg(long = "page-min", default_value = "60", allow_negative_numbers = true)]
    page_min: i32,

    /// Maximum printed page number to parse (inclusive, hOCR ppageno)
    #[arg(long = "page-max", default_value = "96", allow_negative_numbers = true)]
    page_max: i32,

    /// Comma-separated composite pairs A-B
    #[arg(long, default_value = DEFAULT_PAIRS)]
    pairs: String,

    /// Fraction of page height below which lines are footnotes
    #[arg(long = "footnote-frac", default_value = "0.82")]
    footnote_frac: f64,

    /// Fraction of page width within which a verse number must start
    #[arg(long = "left-margin-frac", default_value = "0.20")]
    left_margin_frac: f64,

    /// Pixels a word may rise above its line before it counts as a superscript
    #[arg(long = "superscript-rise", default_value = "5")]
    superscript_rise: i32,

    /// Entity numbering order
    #[arg(long, value_enum, default_value = "composites-first")]
    order: Order,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,
}

/// Build extraction options from command line arguments.
fn build_options(args: &Args) -> Result<ExtractOptions> {
    let params = ExtractParams::new(
        args.footnote_frac,
        args.left_margin_frac,
        args.superscript_rise,
    )?;
    let pairs = parse_pairs(&args.pairs).context("invalid --pairs")?;

    Ok(ExtractOptions {
        params,
        window: PageWindow::new(args.page_min, args.page_max),
        pairs,
        order: args.order.into(),
    })
}

fn csv_writer(path: &Path) -> Result<csv::Writer<BufWriter<File>>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(WriterBuilder::new().from_writer(BufWriter::new(file)))
}

fn write_texts<W: Write>(wtr: &mut csv::Writer<W>, entities: &[TextEntity]) -> Result<()> {
    wtr.write_record(["id", "label", "text_body"])?;
    for e in entities {
        wtr.write_record([e.id.to_string(), e.label.clone(), e.body.clone()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_mappings<W: Write>(wtr: &mut csv::Writer<W>, mappings: &[VerseMapping]) -> Result<()> {
    wtr.write_record(["text_id", "verse_number"])?;
    for m in mappings {
        wtr.write_record([m.text_id.to_string(), m.verse_number.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct JsonDump<'a> {
    texts: &'a [TextEntity],
    text_verses: &'a [VerseMapping],
    stats: &'a gatha_core::PassStats,
}

fn write_json(path: &Path, extraction: &Extraction) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut out = BufWriter::new(file);
    let dump = JsonDump {
        texts: &extraction.assembly.entities,
        text_verses: &extraction.assembly.mappings,
        stats: &extraction.stats,
    };
    serde_json::to_writer_pretty(&mut out, &dump)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let options = build_options(args)?;
    let extraction = extract_from_path(&args.input, &options)
        .with_context(|| format!("Failed to extract {}", args.input.display()))?;

    let entities = &extraction.assembly.entities;
    write_texts(&mut csv_writer(&args.texts)?, entities)
        .with_context(|| format!("Failed to write {}", args.texts.display()))?;
    write_mappings(&mut csv_writer(&args.text_verses)?, &extraction.assembly.mappings)
        .with_context(|| format!("Failed to write {}", args.text_verses.display()))?;
    if let Some(ref json) = args.json {
        write_json(json, &extraction)?;
    }

    info!(
        entities = entities.len(),
        texts = %args.texts.display(),
        text_verses = %args.text_verses.display(),
        "extracted text entities"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["gatha-extract"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_match_the_dhammapada_run() {
        let options = build_options(&args(&[])).unwrap();
        assert_eq!(options.window, PageWindow::new(60, 96));
        assert_eq!(options.pairs.len(), 8);
        assert_eq!(options.params, ExtractParams::default());
        assert_eq!(options.order, EntityOrder::CompositesFirst);
    }

    #[test]
    fn malformed_pairs_fail_the_run() {
        assert!(build_options(&args(&["--pairs", "58-59,104"])).is_err());
        assert!(build_options(&args(&["--footnote-frac", "1.5"])).is_err());
    }

    #[test]
    fn writes_csv_tables() {
        let entities = vec![
            TextEntity {
                id: 1,
                label: "58\u{2013}59".to_string(),
                body: "Like a lotus, \"pure\"".to_string(),
            },
            TextEntity {
                id: 2,
                label: "1".to_string(),
                body: "Mind precedes.".to_string(),
            },
        ];
        let mut wtr = WriterBuilder::new().from_writer(Vec::new());
        write_texts(&mut wtr, &entities).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "id,label,text_body\n1,58\u{2013}59,\"Like a lotus, \"\"pure\"\"\"\n2,1,Mind precedes.\n"
        );

        let mappings = [
            VerseMapping {
                text_id: 1,
                verse_number: 58,
            },
            VerseMapping {
                text_id: 1,
                verse_number: 59,
            },
        ];
        let mut wtr = WriterBuilder::new().from_writer(Vec::new());
        write_mappings(&mut wtr, &mappings).unwrap();
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(text, "text_id,verse_number\n1,58\n1,59\n");
    }

    #[test]
    fn runs_end_to_end_on_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.html");
        std::fs::write(
            &input,
            r#"<div class="ocr_page" title="bbox 0 0 1000 1000; ppageno 70">
<span class="ocr_line" title="bbox 40 100 900 130">
<span class="ocrx_word" title="bbox 40 100 70 130">58</span>
<span class="ocrx_word" title="bbox 90 100 200 130">lotus</span>
</span></div>"#,
        )
        .unwrap();
        let texts = dir.path().join("texts.csv");
        let map = dir.path().join("map.csv");
        let json = dir.path().join("out.json");

        let a = args(&[
            "--in",
            input.to_str().unwrap(),
            "--texts",
            texts.to_str().unwrap(),
            "--text-verses",
            map.to_str().unwrap(),
            "--json",
            json.to_str().unwrap(),
        ]);
        run(&a).unwrap();

        assert_eq!(
            std::fs::read_to_string(&texts).unwrap(),
            "id,label,text_body\n1,58\u{2013}59,lotus\n"
        );
        assert_eq!(
            std::fs::read_to_string(&map).unwrap(),
            "text_id,verse_number\n1,58\n1,59\n"
        );
        let dump: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(dump["texts"][0]["label"], "58\u{2013}59");
        assert_eq!(dump["stats"]["pages_seen"], 1);
    }
}
