use anyhow::{Context, Result};
use clap::Parser;
use colsplit::{LineTerminator, SplitConfig, Splitter};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{info, Level};

#[derive(Parser, Debug)]
#[command(name = "colsplit")]
#[command(about = "Split a delimited file into one file per value of a column")]
#[command(long_about = "Split a delimited file into one file per value of a column.\n\n\
The input must be sorted by the split column. A value that reappears after \
another value has been seen aborts the run unless --force is given, in which \
case the file already written for that value is overwritten and its earlier \
rows are lost.")]
#[command(version)]
struct Args {
    /// Input file
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// Column to split into output files (1-n)
    #[arg(short = 'n', long = "column")]
    column: usize,

    /// Stub to use when writing output files
    #[arg(long)]
    stub: String,

    /// Suffix to use when writing output files
    #[arg(long, default_value = ".tsv")]
    suffix: String,

    /// Treat the first line as data instead of a header
    #[arg(long)]
    no_headers: bool,

    /// Field delimiter: a single character, `\t`, or one of tab, comma, semicolon, pipe, space
    #[arg(long, default_value = "tab", value_parser = parse_delimiter_arg)]
    delimiter: u8,

    /// Keep going when a value reappears out of order, overwriting its earlier output
    #[arg(long)]
    force: bool,

    /// Write CRLF line endings instead of LF. The Python version of this tool
    /// wrote \r\n, the csv.writer default; use this to match its output
    #[arg(long)]
    crlf: bool,

    /// Write a JSON run summary to this path
    #[arg(long)]
    stats_out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

fn parse_delimiter_arg(text: &str) -> std::result::Result<u8, String> {
    colsplit::parse_delimiter(text).map_err(|e| e.to_string())
}

fn init_logging(json: bool, quiet: bool) {
    let level = if quiet { Level::WARN } else { Level::INFO };
    // WHY: stdout is left to the caller, progress and errors go to stderr
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

impl Args {
    fn to_config(&self) -> SplitConfig {
        SplitConfig {
            input: self.input.clone(),
            column: self.column,
            output_stub: self.stub.clone(),
            output_suffix: self.suffix.clone(),
            use_headers: !self.no_headers,
            delimiter: self.delimiter,
            force: self.force,
            terminator: if self.crlf {
                LineTerminator::Crlf
            } else {
                LineTerminator::Lf
            },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_json, args.quiet);
    info!(?args, "Parsed CLI arguments");

    let splitter = Splitter::new(args.to_config());
    let summary = splitter
        .run()
        .with_context(|| format!("Failed to split {}", args.input.display()))?;

    if let Some(stats_path) = &args.stats_out {
        summary
            .write_json(stats_path)
            .with_context(|| format!("Failed to write stats to {}", stats_path.display()))?;
        info!("Run summary written to {}", stats_path.display());
    }

    Ok(())
}
