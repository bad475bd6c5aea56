//! Decodes streams of BER encoded records into JSON documents.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use anyhow::{bail, Context, Result};
use clap::Parser;
use flate2::read::GzDecoder;
use serde::Serialize;
use tracing::{error, info, info_span};
use tracing_subscriber::EnvFilter;
use bertree::asn1::parse_module;
use bertree::decode::RecordReader;
use bertree::resolve::{Document, Options, Resolver};
use bertree::schema::{SchemaTree, TagPathIndex};

#[derive(Parser)]
#[command(name = "bertree", version)]
#[command(about = "Decode BER encoded records into JSON documents")]
struct Cli {
    /// Files to decode, `-` for standard input, `.gz` files are unpacked
    #[arg(
        short, long, num_args = 1..,
        required_unless_present_any = ["dump_schema", "dump_paths"]
    )]
    files: Vec<PathBuf>,

    /// ASN.1 module describing the records
    #[arg(short, long, requires = "top_type")]
    schema: Option<PathBuf>,

    /// Name of the record type in the schema
    #[arg(short, long, requires = "schema")]
    top_type: Option<String>,

    /// Only write these records, starting at 1, e.g. `-i 100 2000 3001`
    #[arg(short, long, num_args = 1..)]
    index: Vec<usize>,

    /// Always write the hex encoding along with decoded text
    #[arg(short = 'x', long)]
    hex_also: bool,

    /// Log tag paths and kinds during decoding, limited to the records
    /// given with `--index`
    #[arg(short, long)]
    debug: bool,

    /// Write the documents to this file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report records that fail to decode and continue with the next one
    #[arg(long)]
    keep_going: bool,

    /// Print the compiled schema tree and exit
    #[arg(long, requires = "schema")]
    dump_schema: bool,

    /// Print the tag-path index of the schema and exit
    #[arg(long, requires = "schema")]
    dump_paths: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(default_filter(cli.debug, &cli.index))
            })
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let tree = match (&cli.schema, &cli.top_type) {
        (Some(path), Some(top)) => Some(load_schema(path, top)?),
        (None, None) => None,
        _ => bail!("a schema needs a top-level type"),
    };

    let mut output: Box<dyn Write> = match cli.output {
        Some(ref path) => {
            let file = File::create(path).with_context(|| {
                format!("create {}", path.display())
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if cli.dump_schema || cli.dump_paths {
        let tree = tree.as_ref().context("dumping requires a schema")?;
        if cli.dump_schema {
            write!(output, "{}", tree)?;
        }
        if cli.dump_paths {
            let index = TagPathIndex::build(tree);
            write!(output, "{}", index.display(tree))?;
        }
        output.flush()?;
        return Ok(())
    }

    let job = Job {
        resolver: Resolver::new(
            tree.as_ref(), Options { hex_also: cli.hex_also }
        ),
        selection: cli.index.iter().copied().collect(),
        keep_going: cli.keep_going,
    };
    for path in &cli.files {
        let input = open_input(path)?;
        job.decode(path, input, &mut output)?;
    }
    output.flush()?;
    Ok(())
}

/// Returns the log filter used unless `RUST_LOG` is set.
///
/// With a record selection, tracing is limited to the spans of the
/// selected records.
fn default_filter(debug: bool, selection: &[usize]) -> String {
    if !debug {
        "bertree=info".into()
    }
    else if selection.is_empty() {
        "bertree=trace".into()
    }
    else {
        "bertree=info,bertree[record{selected=true}]=trace".into()
    }
}

/// Reads the schema and compiles the tree for the top-level type.
fn load_schema(path: &Path, top: &str) -> Result<SchemaTree> {
    let source = fs::read_to_string(path).with_context(|| {
        format!("read {}", path.display())
    })?;
    let module = parse_module(&source).with_context(|| {
        format!("parse {}", path.display())
    })?;
    let tree = SchemaTree::compile(&module, top).with_context(|| {
        format!("compile '{}' from {}", top, path.display())
    })?;
    info!(
        "compiled '{}' from module '{}': {} nodes, {} warnings",
        top, module.name(), tree.len(), tree.warnings().len()
    );
    Ok(tree)
}

/// Opens an input file, unpacking gzip files on the fly.
fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = if path == Path::new("-") {
        Box::new(io::stdin().lock())
    }
    else {
        Box::new(File::open(path).with_context(|| {
            format!("open {}", path.display())
        })?)
    };
    if path.extension().map_or(false, |ext| ext == "gz") {
        Ok(Box::new(BufReader::new(GzDecoder::new(reader))))
    }
    else {
        Ok(Box::new(BufReader::new(reader)))
    }
}


//------------ Job -----------------------------------------------------------

/// What to do with the records of each file.
struct Job<'a> {
    resolver: Resolver<'a>,

    /// The record numbers to write. All records if empty.
    selection: HashSet<usize>,

    keep_going: bool,
}

/// The numbers of one file.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct Summary {
    records: usize,
    nodes: usize,
    written: usize,
    failed: usize,
}

/// A record as written to the output.
#[derive(Serialize)]
struct Record<'a> {
    record: usize,
    document: &'a Document,
}

impl<'a> Job<'a> {
    /// Decodes all records of one input.
    fn decode(
        &self, path: &Path, input: impl Read, output: &mut dyn Write
    ) -> Result<Summary> {
        let start = Instant::now();
        let mut summary = Summary::default();
        for (number, record) in RecordReader::new(input).enumerate() {
            let number = number + 1;
            let selected = self.selection.is_empty()
                || self.selection.contains(&number);
            let span = info_span!("record", number, selected);
            let _enter = span.enter();
            let value = match record {
                Ok(value) => value,
                Err(err) => {
                    // The stream can’t be resynchronized after a broken
                    // record, so this ends the file either way.
                    let err = anyhow::Error::new(err).context(format!(
                        "{}: record {}", path.display(), number
                    ));
                    if !self.keep_going {
                        return Err(err)
                    }
                    error!("{:#}", err);
                    summary.failed += 1;
                    break
                }
            };
            summary.records += 1;
            summary.nodes += value.node_count();
            match self.resolver.resolve(&value) {
                Ok(document) => {
                    if selected {
                        serde_json::to_writer_pretty(
                            &mut *output, &Record { record: number, document: &document }
                        )?;
                        writeln!(output)?;
                        summary.written += 1;
                    }
                }
                Err(err) => {
                    let err = anyhow::Error::new(err).context(format!(
                        "{}: record {}", path.display(), number
                    ));
                    if !self.keep_going {
                        return Err(err)
                    }
                    error!("{:#}", err);
                    summary.failed += 1;
                }
            }
        }

        let elapsed = start.elapsed().as_secs_f64();
        let rate = |count: usize| {
            if elapsed > 0. { count as f64 / elapsed } else { 0. }
        };
        info!(
            file = %path.display(),
            records = summary.records,
            nodes = summary.nodes,
            written = summary.written,
            failed = summary.failed,
            "decoded in {:.3}s, {:.0} records/s, {:.0} nodes/s",
            elapsed, rate(summary.records), rate(summary.nodes)
        );
        Ok(summary)
    }
}


//============ Tests =========================================================
