#![allow(
    clippy::needless_pass_by_value, // clap hands over owned values
    clippy::fn_params_excessive_bools, // CLI commands have many boolean flags
)]

//! doctext CLI - plain text extraction from documents and images

mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use config::Config;
use doctext_backend::{Dispatcher, DocumentSource, ExtractionOptions};
use doctext_core::{placeholder, InputFormat};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "doctext",
    about = "Extract plain text from documents and images",
    long_about = "Extract plain text from PDF, DOCX, PPTX, plain text and image files.\n\
                  \n\
                  Degraded extractions print a bracketed placeholder instead of failing.",
    version
)]
struct Args {
    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Show detailed processing information
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Use this configuration file instead of discovering .doctext.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text from a document
    #[command(long_about = "Extract text from a document.\n\
                      \n\
                      The MIME type is guessed from the file extension unless --mime is given.\n\
                      Defaults can be set via .doctext.toml configuration file.\n\
                      \n\
                      Examples:\n\
                        doctext extract report.pdf\n\
                        doctext extract scan.png --no-ocr\n\
                        doctext extract deck.pptx -o deck.txt")]
    Extract {
        /// Input file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Declared MIME type (guessed from the extension when omitted)
        #[arg(long, value_name = "TYPE")]
        mime: Option<String>,

        /// Read the file into memory and extract from the buffer
        #[arg(long)]
        buffer: bool,

        /// Force OCR on
        #[arg(long, conflicts_with = "no_ocr")]
        ocr: bool,

        /// Force OCR off
        #[arg(long)]
        no_ocr: bool,

        /// Skip PDFs larger than this many megabytes
        #[arg(long, value_name = "N")]
        max_pdf_size_mb: Option<f64>,

        /// Write text to this file instead of stdout
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<PathBuf>,
    },

    /// List supported MIME types
    Formats {
        /// Output as JSON instead of table
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(quiet: bool, verbose: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .target(env_logger::Target::Stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_logging(args.quiet, args.verbose);

    if let Err(e) = run(args) {
        eprintln!("{} {e:#}", "Error:".red().bold());
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Commands::Extract {
            input,
            mime,
            buffer,
            ocr,
            no_ocr,
            max_pdf_size_mb,
            output,
        } => {
            let ocr_flag = if ocr {
                Some(true)
            } else if no_ocr {
                Some(false)
            } else {
                None
            };
            let settings = config.extract.unwrap_or_default();
            let options = resolve_options(
                ExtractionOptions::from_environment(),
                ocr_flag.or(settings.ocr),
                max_pdf_size_mb.or(settings.max_pdf_size_mb),
            )?;
            let buffer = buffer || settings.buffer.unwrap_or(false);
            extract_command(
                &input,
                mime.as_deref(),
                buffer,
                options,
                output.as_deref(),
                args.quiet,
            )
        }
        Commands::Formats { json } => formats_command(json),
    }
}

/// Apply CLI and config overrides on top of environment-derived options
fn resolve_options(
    base: ExtractionOptions,
    ocr: Option<bool>,
    max_pdf_size_mb: Option<f64>,
) -> Result<ExtractionOptions> {
    let mut options = base;
    if let Some(ocr) = ocr {
        options = options.with_ocr_available(ocr);
    }
    if let Some(max_mb) = max_pdf_size_mb {
        if !max_mb.is_finite() || max_mb <= 0.0 {
            bail!("--max-pdf-size-mb must be a positive number, got {max_mb}");
        }
        options = options.with_max_pdf_size_mb(max_mb);
    }
    Ok(options)
}

fn guess_mime(input: &Path) -> Result<&'static str> {
    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .with_context(|| format!("No file extension found: {} (use --mime)", input.display()))?;
    InputFormat::from_extension(ext)
        .map(|format| format.mime_type())
        .with_context(|| format!("Unsupported file extension: .{ext} (use --mime)"))
}

fn extract_command(
    input: &Path,
    mime: Option<&str>,
    buffer: bool,
    options: ExtractionOptions,
    output: Option<&Path>,
    quiet: bool,
) -> Result<()> {
    let mime = match mime {
        Some(mime) => mime.to_string(),
        None => guess_mime(input)?.to_string(),
    };
    log::debug!(
        "Extracting {} as {mime} (buffer: {buffer}, ocr: {}, pdf limit: {}MB)",
        input.display(),
        options.ocr_available,
        options.max_pdf_size_mb
    );

    let dispatcher = Dispatcher::new(options);
    let text = if buffer {
        let data =
            fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
        dispatcher.extract(DocumentSource::Bytes(&data), &mime)?
    } else {
        dispatcher.extract(DocumentSource::Path(input), &mime)?
    };

    if placeholder::is_placeholder(&text) && !quiet {
        eprintln!(
            "{} extraction degraded for {}",
            "Warning:".yellow().bold(),
            input.display()
        );
    }

    match output {
        Some(path) => {
            fs::write(path, &text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !quiet {
                eprintln!(
                    "{} {} -> {}",
                    "Extracted".green().bold(),
                    input.display(),
                    path.display()
                );
            }
        }
        None => println!("{text}"),
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct FormatInfo {
    format: InputFormat,
    mime_type: &'static str,
    adapter: &'static str,
    on_failure: &'static str,
}

fn formats_command(json_output: bool) -> Result<()> {
    let dispatcher = Dispatcher::default();
    let formats: Vec<FormatInfo> = InputFormat::ALL
        .into_iter()
        .map(|format| FormatInfo {
            format,
            mime_type: format.mime_type(),
            adapter: dispatcher.backend_for(format).name(),
            on_failure: if format.fails_softly() {
                "placeholder"
            } else {
                "error"
            },
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&formats)?);
        return Ok(());
    }

    println!(
        "{:<8} {:<75} {:<8} {}",
        "FORMAT".bold(),
        "MIME TYPE".bold(),
        "ADAPTER".bold(),
        "ON FAILURE".bold()
    );
    for info in &formats {
        println!(
            "{:<8} {:<75} {:<8} {}",
            info.format.to_string(),
            info.mime_type,
            info.adapter,
            info.on_failure
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_mime() {
        assert_eq!(guess_mime(Path::new("a/report.PDF")).unwrap(), "application/pdf");
        assert_eq!(guess_mime(Path::new("notes.txt")).unwrap(), "text/plain");
        assert_eq!(guess_mime(Path::new("scan.jpg")).unwrap(), "image/jpeg");
        assert!(guess_mime(Path::new("archive.zip")).is_err());
        assert!(guess_mime(Path::new("README")).is_err());
    }

    #[test]
    fn test_resolve_options_overrides() {
        let base = ExtractionOptions::default();
        let options = resolve_options(base, Some(false), Some(10.0)).unwrap();
        assert!(!options.ocr_available);
        assert!((options.max_pdf_size_mb - 10.0).abs() < f64::EPSILON);

        let untouched = resolve_options(base, None, None).unwrap();
        assert_eq!(untouched, base);
    }

    #[test]
    fn test_resolve_options_rejects_bad_limit() {
        let base = ExtractionOptions::default();
        assert!(resolve_options(base, None, Some(0.0)).is_err());
        assert!(resolve_options(base, None, Some(-3.0)).is_err());
        assert!(resolve_options(base, None, Some(f64::NAN)).is_err());
    }
}
