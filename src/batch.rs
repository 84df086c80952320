//! Directory batch processing.
//!
//! Every `*.pdf` in an input directory becomes a `<stem>.json` outline in the
//! output directory. Documents are independent: each one gets its own
//! [`DocumentReport`] and a failure never stops its siblings.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::error::{EmptyContent, Error, Result};
use crate::extract::{ExtractOptions, FragmentSource, PdfDocument};
use crate::outline::{infer_outline, OutlineOptions};
use crate::render::{write_outline, JsonFormat};

/// Options for a batch run.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Fragment extraction options
    pub extract: ExtractOptions,

    /// Heading-inference options
    pub outline: OutlineOptions,

    /// Process documents in parallel
    pub parallel: bool,

    /// Output JSON layout
    pub json_format: JsonFormat,
}

impl BatchOptions {
    /// Create new batch options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extract_options(mut self, extract: ExtractOptions) -> Self {
        self.extract = extract;
        self
    }

    /// Set outline options.
    pub fn with_outline_options(mut self, outline: OutlineOptions) -> Self {
        self.outline = outline;
        self
    }

    /// Process one document at a time.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set output JSON format.
    pub fn with_json_format(mut self, format: JsonFormat) -> Self {
        self.json_format = format;
        self
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            extract: ExtractOptions::default(),
            outline: OutlineOptions::default(),
            parallel: true,
            json_format: JsonFormat::Pretty,
        }
    }
}

/// What happened to one document.
#[derive(Debug)]
pub enum DocumentStatus {
    /// Outline written to this path
    Written(PathBuf),
    /// Nothing to outline
    Skipped(EmptyContent),
    /// Extraction or output failed
    Failed(Error),
}

/// Outcome for one input file.
#[derive(Debug)]
pub struct DocumentReport {
    /// Input PDF path
    pub source: PathBuf,
    /// Result of processing
    pub status: DocumentStatus,
}

impl DocumentReport {
    /// Whether an outline file was produced.
    pub fn is_written(&self) -> bool {
        matches!(self.status, DocumentStatus::Written(_))
    }
}

/// Outcomes for a whole directory, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per input file
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    /// Number of outlines written.
    pub fn written(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Written(_)))
    }

    /// Number of documents skipped for lack of content.
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Skipped(_)))
    }

    /// Number of documents that failed.
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, DocumentStatus::Failed(_)))
    }

    /// Total number of documents seen.
    pub fn total(&self) -> usize {
        self.documents.len()
    }

    fn count(&self, pred: impl Fn(&DocumentStatus) -> bool) -> usize {
        self.documents.iter().filter(|d| pred(&d.status)).count()
    }
}

/// List the PDF files directly inside `dir`, sorted by path.
pub fn collect_pdf_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(dir.as_ref())? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

fn has_pdf_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

/// Output path for a source PDF: `<output_dir>/<stem>.json`.
pub fn output_path_for(source: &Path, output_dir: &Path) -> PathBuf {
    let mut name = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "outline".into());
    name.push(".json");
    output_dir.join(name)
}

/// Outline one PDF and write its JSON next to its siblings.
///
/// Never returns an error: the outcome is folded into the report.
pub fn process_file(source: &Path, output_dir: &Path, options: &BatchOptions) -> DocumentReport {
    log::info!("Processing {}", source.display());

    let status = match outline_to_file(source, output_dir, options) {
        Ok(path) => {
            log::info!("Wrote {}", path.display());
            DocumentStatus::Written(path)
        }
        Err(Error::EmptyContent(reason)) => {
            log::warn!("Skipping {}: {}", source.display(), reason);
            DocumentStatus::Skipped(reason)
        }
        Err(e) => {
            log::error!("Failed {}: {}", source.display(), e);
            DocumentStatus::Failed(e)
        }
    };

    DocumentReport {
        source: source.to_path_buf(),
        status,
    }
}

fn outline_to_file(source: &Path, output_dir: &Path, options: &BatchOptions) -> Result<PathBuf> {
    let doc = PdfDocument::open(source)?;
    let fragments = doc.fragments(&options.extract)?;
    log::info!("{} fragments in {}", fragments.len(), source.display());

    let title = doc.metadata_title();
    let outline = infer_outline(&fragments, title.as_deref(), &options.outline)?;
    log::info!("{} headings in {}", outline.len(), source.display());

    let path = output_path_for(source, output_dir);
    write_outline(&outline, &path, options.json_format)?;
    Ok(path)
}

/// Outline every PDF in `input_dir` into `output_dir`.
///
/// Fails only when the input directory is missing or the output directory
/// cannot be created; per-document problems land in the report.
pub fn run_batch<P: AsRef<Path>, Q: AsRef<Path>>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
) -> Result<BatchReport> {
    run_batch_with_progress(input_dir, output_dir, options, |_| {})
}

/// [`run_batch`] with a callback invoked as each document finishes.
///
/// With parallel processing the callback runs on worker threads in
/// completion order; the returned report is still in input order.
pub fn run_batch_with_progress<P, Q, F>(
    input_dir: P,
    output_dir: Q,
    options: &BatchOptions,
    on_done: F,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    F: Fn(&DocumentReport) + Sync,
{
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    if !input_dir.is_dir() {
        return Err(Error::InputDirNotFound(input_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir)?;

    let files = collect_pdf_files(input_dir)?;
    log::info!("Found {} PDF files in {}", files.len(), input_dir.display());

    let run_one = |path: &PathBuf| {
        let report = process_file(path, output_dir, options);
        on_done(&report);
        report
    };

    let documents: Vec<DocumentReport> = if options.parallel {
        files.par_iter().map(run_one).collect()
    } else {
        files.iter().map(run_one).collect()
    };

    let report = BatchReport { documents };
    log::info!(
        "Batch finished: {} written, {} skipped, {} failed",
        report.written(),
        report.skipped(),
        report.failed()
    );
    Ok(report)
}
