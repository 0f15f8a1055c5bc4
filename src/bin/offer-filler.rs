//! CLI binary for offer-filler.
//!
//! A thin shim over the library crate that maps subcommands and flags to
//! `WorkflowConfig` / `ResultStore` calls and prints results.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use offer_filler::schema::{self, FieldDiff};
use offer_filler::{
    run_workflow, ProgressCallback, ResultStore, Stage, WorkflowConfig, WorkflowOutcome,
    WorkflowProgressCallback, OFFER_SCHEMA,
};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner on stderr showing the current stage, with one line per document.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Starting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl WorkflowProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        let label = match stage {
            Stage::Configure => "Configuring",
            Stage::Discover => "Discovering",
            Stage::Extract => "Extracting",
            Stage::Consolidate => "Consolidating",
            Stage::BuildPrompt => "Building prompt",
            Stage::Dispatch => "Waiting for LLM",
            Stage::Validate => "Validating",
            Stage::Persist => "Saving",
        };
        self.bar.set_prefix(label);
        self.bar.set_message("");
    }

    fn on_document_start(&self, index: usize, total: usize, filename: &str) {
        self.bar.set_message(format!("{filename} ({index}/{total})"));
    }

    fn on_document_extracted(&self, index: usize, total: usize, filename: &str, pages: usize) {
        self.bar.println(format!(
            "  {} {:>2}/{:<2}  {}  {}",
            green("✓"),
            index,
            total,
            filename,
            dim(&format!("{pages} pages")),
        ));
    }

    fn on_workflow_complete(&self, _documents: usize) {
        self.bar.finish_and_clear();
    }
}

// ── Command line ─────────────────────────────────────────────────────────────

const AFTER_HELP: &str = r#"EXAMPLES:
  # Fill the offer from PDFs using their text layer and OpenAI
  offer-filler process -i ./input -o ./output

  # Scanned documents: OCR (tesseract, Polish) and Claude
  offer-filler process -i ./scans -o ./output -m ocr -p claude

  # Check a saved offer and compare two runs
  offer-filler validate output/filled_offer_20240305_140709.json
  offer-filler compare old.json new.json

  # Print the schema sent to the model, or a blank offer
  offer-filler schema
  offer-filler schema --blank > blank.json

PROVIDERS:
  Name     Default model             Credential
  ───────  ────────────────────────  ─────────────────
  openai   gpt-4-turbo               OPENAI_API_KEY
  claude   claude-3-opus-20240229    ANTHROPIC_API_KEY
  gemini   gemini-pro                GOOGLE_API_KEY

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory); system library otherwise
  RUST_LOG          Overrides the log filter (e.g. offer_filler=debug)

  Variables can also be put in a .env file in the working directory (or a
  parent); values already set in the environment take precedence.
"#;

/// Fill the grid-connection offer form from PDF documents using an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "offer-filler",
    version,
    about = "Automated Offer Form Filler: extract data from PDFs and fill the offer template using LLMs",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process PDF files and fill the offer template.
    Process(ProcessArgs),

    /// Validate a saved offer file against the schema.
    Validate {
        /// JSON file with offer data.
        offer_file: PathBuf,
    },

    /// Compare two offer files and show the differences.
    Compare {
        /// Older offer file.
        file1: PathBuf,
        /// Newer offer file.
        file2: PathBuf,
    },

    /// Print the schema description sent to the model.
    Schema {
        /// Print a blank, schema-conforming offer instead.
        #[arg(long)]
        blank: bool,
    },

    /// Show version information.
    Version,
}

#[derive(clap::Args, Debug)]
struct ProcessArgs {
    /// Folder containing the PDF files to process.
    #[arg(short = 'i', long = "input-folder", env = "OFFER_INPUT_FOLDER")]
    input_folder: PathBuf,

    /// Folder where results are saved.
    #[arg(short = 'o', long = "output-folder", env = "OFFER_OUTPUT_FOLDER")]
    output_folder: PathBuf,

    /// Text extraction method: ocr or text.
    #[arg(short = 'm', long = "extraction-method", env = "OFFER_EXTRACTION_METHOD", default_value = "text")]
    extraction_method: String,

    /// LLM provider: openai, claude, or gemini.
    #[arg(short = 'p', long = "llm-provider", env = "OFFER_LLM_PROVIDER", default_value = "openai")]
    llm_provider: String,

    /// Model ID; defaults to the provider's default model.
    #[arg(long, env = "OFFER_MODEL")]
    model: Option<String>,

    /// API key; defaults to the provider's environment variable.
    #[arg(long)]
    api_key: Option<String>,

    /// Instruction template file replacing the built-in instructions.
    #[arg(long, env = "OFFER_PROMPT_TEMPLATE")]
    template: Option<PathBuf>,

    /// Tesseract language for the ocr method.
    #[arg(long, env = "OFFER_OCR_LANGUAGE", default_value = "pol")]
    ocr_language: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OFFER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OFFER_QUIET")]
    quiet: bool,

    /// Disable the progress spinner (INFO logs are shown instead).
    #[arg(long, env = "OFFER_NO_PROGRESS")]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file; real environment variables win.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // INFO lines would tear the spinner, so only warnings are logged while
    // it is on screen.
    let (filter, show_progress) = match &cli.command {
        Command::Process(args) if args.verbose => ("debug", false),
        Command::Process(args) if args.quiet => ("error", false),
        Command::Process(args) if args.no_progress => ("info", false),
        Command::Process(_) => ("warn", true),
        _ => ("info", false),
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Command::Process(args) => process(args, show_progress).await,
        Command::Validate { offer_file } => validate(offer_file).await,
        Command::Compare { file1, file2 } => compare(file1, file2).await,
        Command::Schema { blank } => print_schema(blank),
        Command::Version => {
            println!("Automated Offer Form Filler v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn process(args: ProcessArgs, show_progress: bool) -> Result<()> {
    let progress: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn WorkflowProgressCallback>)
    } else {
        None
    };
    let config = build_config(&args, progress)?;

    if !args.quiet {
        eprintln!("Input folder:      {}", args.input_folder.display());
        eprintln!("Output folder:     {}", args.output_folder.display());
        eprintln!("Extraction method: {}", args.extraction_method);
        eprintln!("LLM provider:      {}", args.llm_provider);
    }

    let outcome = run_workflow(&args.input_folder, &args.output_folder, &config).await;
    if let Some(ref cb) = config.progress_callback {
        // Clears the spinner on failure too.
        cb.on_workflow_complete(0);
    }
    let outcome = outcome.context("Processing failed")?;

    match outcome {
        WorkflowOutcome::NoInput => {
            if !args.quiet {
                eprintln!(
                    "{} No PDF files found in {}",
                    bold("!"),
                    args.input_folder.display()
                );
            }
        }
        WorkflowOutcome::Completed { result, artifacts } => {
            if !args.quiet {
                eprintln!(
                    "{} Processing completed: {} file(s) via {} ({})",
                    green("✔"),
                    result.request.source_filenames.len(),
                    result.request.provider,
                    result.request.model,
                );
                eprintln!("   offer   →  {}", bold(&artifacts.offer.display().to_string()));
                eprintln!(
                    "   result  →  {}",
                    dim(&artifacts.complete_result.display().to_string())
                );
            }
        }
    }
    Ok(())
}

/// Map CLI args to `WorkflowConfig`.
fn build_config(args: &ProcessArgs, progress: Option<ProgressCallback>) -> Result<WorkflowConfig> {
    let mut builder = WorkflowConfig::builder()
        .extraction_method(&args.extraction_method)
        .provider_name(&args.llm_provider)
        .ocr_language(&args.ocr_language);
    if let Some(ref model) = args.model {
        builder = builder.model(model);
    }
    if let Some(ref key) = args.api_key {
        builder = builder.api_key(key);
    }
    if let Some(ref template) = args.template {
        builder = builder.instruction_template(template);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

async fn validate(path: PathBuf) -> Result<()> {
    let offer = match ResultStore::load_offer(&path).await {
        Ok(offer) => offer,
        Err(e) => {
            eprintln!("{} Invalid offer file: {}", red("✘"), e);
            bail!("validation failed for {}", path.display());
        }
    };
    println!("{} Valid offer file: {}", green("✔"), path.display());
    println!("Project:  {}", display_value(offer.get("formInfo.projectContract")));
    println!("Investor: {}", display_value(offer.get("formInfo.investor")));
    println!("Version:  {}", display_value(offer.get("formInfo.version")));
    Ok(())
}

async fn compare(file1: PathBuf, file2: PathBuf) -> Result<()> {
    let a = ResultStore::load_offer(&file1)
        .await
        .with_context(|| format!("Failed to load {}", file1.display()))?;
    let b = ResultStore::load_offer(&file2)
        .await
        .with_context(|| format!("Failed to load {}", file2.display()))?;

    let differences = schema::diff(&a, &b);
    if differences.is_empty() {
        println!("{} The offers are identical.", green("✔"));
        return Ok(());
    }

    println!("Found {} differences:", differences.len());
    for (path, d) in &differences {
        match d {
            FieldDiff::Changed {
                old_value,
                new_value,
            } => println!(
                "  ~ {path}: '{}' → '{}'",
                display_value(Some(old_value)),
                display_value(Some(new_value))
            ),
            FieldDiff::Added { value } => println!("  + {path}: '{}'", display_value(Some(value))),
            FieldDiff::Removed { value } => {
                println!("  - {path}: '{}'", display_value(Some(value)))
            }
        }
    }
    Ok(())
}

fn print_schema(blank: bool) -> Result<()> {
    if blank {
        let offer = schema::blank_offer(&OFFER_SCHEMA);
        println!(
            "{}",
            serde_json::to_string_pretty(&offer).context("Failed to serialise blank offer")?
        );
    } else {
        println!("{}", schema::describe(&OFFER_SCHEMA));
    }
    Ok(())
}

/// Strings print bare, everything else as compact JSON.
fn display_value(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}
