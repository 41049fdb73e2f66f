//! postglyph - Format posts for platforms without rich text

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use postglyph::{ExportFormat, SourceFormat, decode_text, export_content, length_report};

#[derive(Parser)]
#[command(name = "postglyph")]
#[command(version, about = "Format posts for platforms without rich text", long_about = None)]
#[command(after_help = "EXAMPLES:
    postglyph post.md               Print Unicode-styled text
    postglyph post.html -t markdown Convert rich-editor HTML to Markdown
    cat post.md | postglyph --count Style stdin and report the length")]
struct Cli {
    /// Input file (HTML or Markdown); reads stdin when omitted or `-`
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Source format (html, markdown); inferred from the extension
    #[arg(short = 'f', long = "from", value_name = "FORMAT")]
    from: Option<SourceFormat>,

    /// Output format (styled, plain, markdown, html)
    #[arg(short = 't', long = "to", value_name = "FORMAT", default_value = "styled")]
    to: ExportFormat,

    /// Report the plain-text length against the platform limit on stderr
    #[arg(short, long)]
    count: bool,

    /// Print a JSON length report instead of the converted text
    #[arg(long)]
    json: bool,

    /// Suppress output messages
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Serialize)]
struct Report {
    format: String,
    source: String,
    chars_total: usize,
    limit: usize,
    over_limit: bool,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: &Cli) -> Result<(), String> {
    let (content, source) = read_input(cli)?;
    let report = length_report(&content, source);

    if cli.json {
        let report = Report {
            format: cli.to.to_string(),
            source: source.to_string(),
            chars_total: report.chars,
            limit: report.limit,
            over_limit: report.over_limit,
        };
        let json = serde_json::to_string_pretty(&report).map_err(|e| e.to_string())?;
        println!("{json}");
        return Ok(());
    }

    let output = export_content(&content, source, cli.to).map_err(|e| e.to_string())?;
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| {
            if output.ends_with('\n') {
                Ok(())
            } else {
                stdout.write_all(b"\n")
            }
        })
        .map_err(|e| e.to_string())?;

    if cli.count && !cli.quiet {
        let marker = if report.over_limit { " (over limit)" } else { "" };
        eprintln!("{} / {}{marker}", report.chars, report.limit);
    }
    Ok(())
}

fn read_input(cli: &Cli) -> Result<(String, SourceFormat), String> {
    let path = cli.input.as_deref().filter(|p| *p != "-");
    let bytes = match path {
        Some(path) => fs::read(path).map_err(|e| format!("{path}: {e}"))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| e.to_string())?;
            buf
        }
    };

    let source = cli
        .from
        .or_else(|| path.and_then(|p| SourceFormat::from_path(Path::new(p))))
        .unwrap_or_else(|| sniff_source(&bytes));
    Ok((decode_text(&bytes).into_owned(), source))
}

/// Input that opens with a tag is HTML; anything else is Markdown.
fn sniff_source(bytes: &[u8]) -> SourceFormat {
    let first = bytes.iter().find(|b| !b.is_ascii_whitespace());
    if first == Some(&b'<') {
        SourceFormat::Html
    } else {
        SourceFormat::Markdown
    }
}
