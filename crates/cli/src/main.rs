mod echo;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use owo_colors::OwoColorize;
use readeck_export_core::{
    AnnotationSource, ExportConfig, ExportConfigBuilder, Exporter, JsonConfig, annotations_to_json, annotations_to_notes,
    extract_annotations_with_config, fetch_file, fetch_stdin, logseq_config, notes_to_json, notes_to_markdown,
    render_annotation, render_articles,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use echo::{format_size, print_banner, print_info, print_step, print_success, print_warning};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for exported annotations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Logseq,
    Json,
    Markdown,
    Html,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "logseq" => Ok(Self::Logseq),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            _ => Err(format!("Invalid format: {}. Valid options: logseq, json, markdown, html", s)),
        }
    }
}

/// Export highlighted annotations from Readeck bookmarks as Logseq notes
#[derive(Parser, Debug)]
#[command(name = "readeck-export")]
#[command(version = VERSION)]
#[command(about = "Export Readeck annotations as Logseq notes", long_about = None)]
struct Args {
    /// Bookmark ids to export
    #[arg(value_name = "BOOKMARK_ID")]
    ids: Vec<String>,

    /// Extract from a saved article HTML file, or "-" for stdin, instead of the Readeck API
    #[arg(short, long, value_name = "FILE", conflicts_with = "ids")]
    input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format (logseq, json, markdown, html)
    #[arg(short, long, default_value = "logseq", value_name = "FORMAT")]
    format: OutputFormat,

    /// Readeck base URL (default: $READECK_URL or http://localhost:8000)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Readeck API token (default: $READECK_AUTH_TOKEN)
    #[arg(long, value_name = "TOKEN")]
    token: Option<String>,

    /// Annotation source: article HTML or the annotations endpoint
    #[arg(long, value_name = "SOURCE")]
    source: Option<AnnotationSource>,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "readeck_export_core=debug,readeck_export=debug" } else { "warn" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init();
}

/// Merges environment settings with command line overrides.
fn export_config(args: &Args) -> anyhow::Result<ExportConfig> {
    let mut builder = ExportConfigBuilder::from_config(ExportConfig::from_env()?).timeout(args.timeout);
    if let Some(url) = &args.url {
        builder = builder.base_url(url);
    }
    if let Some(token) = &args.token {
        builder = builder.token(token);
    }
    if let Some(source) = args.source {
        builder = builder.source(source);
    }
    if let Some(user_agent) = &args.user_agent {
        builder = builder.user_agent(user_agent);
    }
    Ok(builder.build())
}

/// Extracts annotations from local HTML; no network access.
fn export_input(input: &str, config: &ExportConfig, args: &Args) -> anyhow::Result<String> {
    if args.verbose {
        let from = if input == "-" { "stdin".to_string() } else { format!("file {}", input.bright_white()) };
        print_step(1, 3, &format!("Reading from {from}"));
    }

    let html = if input == "-" {
        fetch_stdin().context("Failed to read from stdin")?
    } else {
        fetch_file(input).with_context(|| format!("Failed to read file: {}", input))?
    };

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        print_step(2, 3, "Extracting annotations");
    }

    let extraction = extract_annotations_with_config(&html, &config.extractor);

    if args.verbose {
        eprintln!("  {} {}", "Annotations:".dimmed(), extraction.annotations.len().to_string().bright_white());
        for issue in &extraction.issues {
            print_warning(&issue.to_string());
        }
    }

    let annotations = &extraction.annotations;
    let output = match args.format {
        OutputFormat::Json => annotations_to_json(annotations, &JsonConfig::default())?,
        OutputFormat::Html => annotations.iter().map(|a| format!("{}\n", a.text)).collect(),
        OutputFormat::Markdown => {
            let notes = annotations_to_notes(annotations, &config.markdown)?;
            notes.iter().map(|n| n.text.as_str()).collect::<Vec<_>>().join("\n\n")
        }
        OutputFormat::Logseq => {
            let notes = annotations_to_notes(annotations, &config.markdown)?;
            notes.iter().map(render_annotation).collect()
        }
    };
    Ok(output)
}

/// Fetches and renders the given bookmarks from Readeck.
async fn export_bookmarks(config: ExportConfig, args: &Args) -> anyhow::Result<String> {
    if args.format == OutputFormat::Html {
        bail!("the html format is only available with --input");
    }

    if args.verbose {
        print_step(1, 3, &format!("Connecting to {}", config.base_url.bright_white().underline()));
        eprintln!("  {} {:?}", "Source:".dimmed(), config.source);
    }

    let exporter = Exporter::new(config).context("Failed to configure Readeck client")?;

    if args.verbose {
        print_step(2, 3, &format!("Exporting {} bookmark(s)", args.ids.len()));
    }

    let notes = exporter.articles(&args.ids).await.context("Failed to export bookmarks")?;

    if args.verbose {
        for note in &notes {
            eprintln!(
                "  {} {} ({} annotations)",
                "•".dimmed(),
                note.bookmark.title.bright_white(),
                note.annotations.len()
            );
        }
    }

    let output = match args.format {
        OutputFormat::Json => notes_to_json(&notes, &JsonConfig::default())?,
        OutputFormat::Markdown => notes_to_markdown(&notes),
        _ => render_articles(&notes, &logseq_config(exporter.config()))?,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "readeck-export", &mut io::stdout());
        return Ok(());
    }

    init_logging(args.verbose);

    if args.verbose {
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let config = export_config(&args).context("Invalid configuration")?;
    debug!(base_url = %config.base_url, source = ?config.source, "configuration loaded");

    let output = match &args.input {
        Some(input) => export_input(input, &config, &args)?,
        None if args.ids.is_empty() => bail!("no bookmark ids given (pass ids or use --input)"),
        None => export_bookmarks(config, &args).await?,
    };

    if args.verbose {
        print_step(3, 3, "Writing output");
        eprintln!("  {} {}", "Format:".dimmed(), format!("{:?}", args.format).bright_white());
        eprintln!();
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None => {
            print!("{}", output);
        }
    }

    Ok(())
}
