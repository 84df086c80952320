//! pdfoutline CLI - PDF heading outline extraction tool

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::batch::{collect_pdf_files, run_batch_with_progress, DocumentReport};
use pdfoutline::extract::read_fragments_json;
use pdfoutline::outline::size_histogram;
use pdfoutline::{
    infer_outline, render, BatchOptions, DocumentStatus, ExtractOptions, FontLevelMap,
    FragmentSource, JsonFormat, OutlineOptions, PdfDocument, PdfOutline,
};

const DEFAULT_INPUT_DIR: &str = "app/input";
const DEFAULT_OUTPUT_DIR: &str = "app/output";

/// Input path meaning "read the PDF from stdin".
const STDIN_PATH: &str = "-";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(version)]
#[command(about = "Infer title and H1-H3 heading outlines from PDF documents", long_about = None)]
struct Cli {
    /// Directory containing PDF files
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory for JSON outlines
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Outline every PDF in a directory
    Batch {
        /// Directory containing PDF files
        #[arg(value_name = "INPUT_DIR", default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory for JSON outlines
        #[arg(value_name = "OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Use one fragment per line instead of per block
        #[arg(long)]
        lines: bool,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Write compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Outline a single PDF
    Outline {
        /// Input PDF file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Use one fragment per line instead of per block
        #[arg(long)]
        lines: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Dump the extracted text fragments as JSON
    Fragments {
        /// Input PDF file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Use one fragment per line instead of per block
        #[arg(long)]
        lines: bool,
    },

    /// Outline a fragment list previously dumped as JSON
    FromFragments {
        /// Fragment JSON file
        #[arg(value_name = "JSON")]
        input: PathBuf,

        /// Document title to use instead of inferring one
        #[arg(long)]
        title: Option<String>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show document information and font-size levels
    Info {
        /// Input PDF file ("-" reads stdin)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Batch {
            input,
            output,
            lines,
            sequential,
            compact,
        }) => cmd_batch(&input, &output, lines, sequential, compact),
        Some(Commands::Outline {
            input,
            output,
            lines,
            compact,
        }) => cmd_outline(&input, output.as_deref(), lines, compact),
        Some(Commands::Fragments {
            input,
            output,
            lines,
        }) => cmd_fragments(&input, output.as_deref(), lines),
        Some(Commands::FromFragments {
            input,
            title,
            compact,
        }) => cmd_from_fragments(&input, title.as_deref(), compact),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: batch over the given or default directories
            let input = cli.input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
            let output = cli.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            cmd_batch(&input, &output, false, false, false)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn extract_options(lines: bool) -> ExtractOptions {
    let options = ExtractOptions::new();
    if lines {
        options.lines()
    } else {
        options
    }
}

fn is_stdin(input: &Path) -> bool {
    input.as_os_str() == STDIN_PATH
}

fn open_document(input: &Path) -> pdfoutline::Result<PdfDocument> {
    if is_stdin(input) {
        PdfDocument::from_reader(io::stdin().lock())
    } else {
        PdfDocument::open(input)
    }
}

fn emit(json: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    lines: bool,
    sequential: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Batch: {} -> {}", input.display(), output.display());

    let mut options = BatchOptions::new()
        .with_extract_options(extract_options(lines))
        .with_json_format(json_format(compact));
    if sequential {
        options = options.sequential();
    }

    let total = if input.is_dir() {
        collect_pdf_files(input)?.len()
    } else {
        0
    };

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let report = run_batch_with_progress(input, output, &options, |doc: &DocumentReport| {
        pb.println(status_line(doc));
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    println!("\n{}", "Batch Summary".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Documents".bold(), report.total());
    println!("{}: {}", "Written".bold(), report.written().to_string().green());
    println!("{}: {}", "Skipped".bold(), report.skipped().to_string().yellow());
    println!("{}: {}", "Failed".bold(), report.failed().to_string().red());
    println!("{}: {}", "Output".bold(), output.display());

    Ok(())
}

fn status_line(doc: &DocumentReport) -> String {
    let name = doc
        .source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match &doc.status {
        DocumentStatus::Written(path) => {
            format!("{} {} -> {}", "Written".green(), name, path.display())
        }
        DocumentStatus::Skipped(reason) => format!("{} {} ({})", "Skipped".yellow(), name, reason),
        DocumentStatus::Failed(e) => format!("{} {}: {}", "Failed".red(), name, e),
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    lines: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Outlining {}", input.display());

    let mut builder = PdfOutline::new();
    if lines {
        builder = builder.lines();
    }

    let outline = if is_stdin(input) {
        builder.outline_reader(io::stdin().lock())?
    } else {
        builder.outline(input)?
    };
    log::debug!("{} headings, title {:?}", outline.len(), outline.title);
    let json = render::to_json(&outline, json_format(compact))?;
    emit(&json, output)
}

fn cmd_fragments(
    input: &Path,
    output: Option<&Path>,
    lines: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Extracting fragments from {}", input.display());

    let doc = open_document(input)?;
    let fragments = doc.fragments(&extract_options(lines).lenient())?;
    let json = render::to_json_value(&fragments, JsonFormat::Pretty)?;
    emit(&json, output)
}

fn cmd_from_fragments(
    input: &Path,
    title: Option<&str>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Outlining fragment dump {}", input.display());

    let fragments = read_fragments_json(input)?;
    log::debug!("{} fragments loaded", fragments.len());
    let outline = infer_outline(&fragments, title, &OutlineOptions::default())?;
    let json = render::to_json(&outline, json_format(compact))?;
    println!("{}", json);
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Reading document information from {}", input.display());

    let doc = open_document(input)?;
    let metadata = doc.metadata();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), metadata.pdf_version);
    println!("{}: {}", "Pages".bold(), metadata.page_count);
    if metadata.page_count > 0 {
        let page_box = doc.page_box(1)?;
        println!(
            "{}: {:.1} x {:.1} pt",
            "Page size".bold(),
            page_box.width(),
            page_box.height()
        );
    }
    println!(
        "{}: {}",
        "Encrypted".bold(),
        if metadata.encrypted { "Yes" } else { "No" }
    );

    if let Some(ref title) = metadata.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }

    // Show levels even when some pages fail to decode
    let fragments = doc.fragments(&ExtractOptions::new().lenient())?;
    let levels = FontLevelMap::from_fragments(&fragments, OutlineOptions::default().heading_levels);
    let histogram = size_histogram(&fragments);

    println!();
    println!("{}", "Font Levels".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "Fragments".bold(), fragments.len());
    println!("{}: {}", "Distinct sizes".bold(), histogram.len());

    for (level, size) in levels.entries() {
        let count = histogram.get(&size).copied().unwrap_or(0);
        println!("{}: {}pt ({} fragments)", level.as_str().bold(), size, count);
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF heading outline extraction tool");
}
