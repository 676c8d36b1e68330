//! docintel CLI - PDF outline extraction and persona analysis tool

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docintel::render::{outline_to_markdown, to_json};
use docintel::{
    extract_document, extract_many, extract_structure_with_options, rank_sections_with_options,
    AnalysisReport, ExtractOptions, HeadingConfig, JsonFormat, PersonaQuery, RankOptions,
};

#[derive(Parser)]
#[command(name = "docintel")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the title and heading outline of a PDF
    Outline {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Render as a Markdown list instead of JSON
        #[arg(short, long)]
        markdown: bool,

        /// Output compact JSON
        #[arg(short, long)]
        compact: bool,

        /// Remove "1.2 "-style numbering from heading text
        #[arg(long)]
        strip_numbering: bool,

        /// Reject documents with more pages than this
        #[arg(long, value_name = "N", env = "DOCINTEL_MAX_PAGES")]
        max_pages: Option<u32>,
    },

    /// Split a PDF into one section per heading
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(short, long)]
        compact: bool,
    },

    /// Rank the sections of several PDFs for a persona and a job
    Analyze {
        /// Input PDF files
        #[arg(value_name = "FILE", required = true)]
        inputs: Vec<PathBuf>,

        /// Who is reading (e.g., "Investment Analyst")
        #[arg(short, long)]
        persona: String,

        /// What they need to get done
        #[arg(short, long)]
        job: String,

        /// Number of sections to condense into excerpts
        #[arg(short = 'k', long, default_value = "5")]
        top_k: usize,

        /// Character budget for each excerpt
        #[arg(long, default_value = "500")]
        excerpt_chars: usize,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(short, long)]
        compact: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            markdown,
            compact,
            strip_numbering,
            max_pages,
        } => cmd_outline(
            &input,
            output.as_deref(),
            markdown,
            compact,
            strip_numbering,
            max_pages,
        ),
        Commands::Sections {
            input,
            output,
            compact,
        } => cmd_sections(&input, output.as_deref(), compact),
        Commands::Analyze {
            inputs,
            persona,
            job,
            top_k,
            excerpt_chars,
            output,
            compact,
        } => cmd_analyze(
            &inputs,
            &persona,
            &job,
            top_k,
            excerpt_chars,
            output.as_deref(),
            compact,
        ),
        Commands::Version => {
            cmd_version();
            Ok(())
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

fn write_output(output: Option<&Path>, content: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    markdown: bool,
    compact: bool,
    strip_numbering: bool,
    max_pages: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = ExtractOptions::new()
        .with_heading_config(HeadingConfig::new().with_strip_numbering(strip_numbering));
    if let Some(limit) = max_pages {
        options = options.with_max_pages(limit);
    }

    let data = fs::read(input)?;
    let outline = extract_structure_with_options(&data, &options)?;

    let rendered = if markdown {
        outline_to_markdown(&outline)
    } else {
        to_json(&outline, json_format(compact))?
    };

    write_output(output, &rendered)
}

fn cmd_sections(
    input: &Path,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    let id = document_ids(&[input.to_path_buf()]).remove(0);
    let doc = extract_document(id, &data, &ExtractOptions::default())?;

    let json = to_json(&doc.sections(), json_format(compact))?;
    write_output(output, &json)
}

fn cmd_analyze(
    inputs: &[PathBuf],
    persona: &str,
    job: &str,
    top_k: usize,
    excerpt_chars: usize,
    output: Option<&Path>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );

    pb.set_message("Reading PDFs...");
    let ids = document_ids(inputs);
    let mut documents = Vec::with_capacity(inputs.len());
    for (id, path) in ids.iter().zip(inputs) {
        documents.push((id.clone(), fs::read(path)?));
    }

    pb.set_message(format!("Extracting {} documents...", documents.len()));
    let mut sections_by_document = HashMap::new();
    for (id, result) in extract_many(&documents, &ExtractOptions::default()) {
        let doc = result.map_err(|e| format!("{}: {}", id, e))?;
        log::info!("{}: {} headings", id, doc.outline.headings.len());
        sections_by_document.insert(id, doc.sections());
    }

    pb.set_message("Ranking sections...");
    let query = PersonaQuery::new(persona, job, ids.iter().cloned());
    let options = RankOptions::new()
        .with_top_k(top_k)
        .with_excerpt_chars(excerpt_chars);
    let result = rank_sections_with_options(&query, &sections_by_document, &options)?;
    pb.finish_and_clear();

    let report = AnalysisReport::new(&query, ids, result);
    let json = to_json(&report, json_format(compact))?;
    write_output(output, &json)
}

/// Document ids from file names, with `#n` suffixes on repeats.
fn document_ids(inputs: &[PathBuf]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    inputs
        .iter()
        .map(|path| {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{}#{}", name, count)
            }
        })
        .collect()
}

fn cmd_version() {
    println!("{} {}", "docintel".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF outline extraction and persona analysis tool");
}
