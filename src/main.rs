//! Batch PDF generation CLI.
//!
//! This binary drives the upload → detect → configure → generate workflow
//! from the command line. Rules are read from a JSON file in the same
//! shape the generation backend accepts.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use pdf_batch::domain::find_section;
use pdf_batch::{
    parse_rules, preview, BackendClient, BatchPlan, CancelToken, ClientConfig, ReplacementRule,
    RuleEngine, TextSection, WizardState,
};

/// Batch PDF Generator
///
/// Replace detected text in a PDF with serial numbers, random numbers or
/// custom text, and generate many copies at once.
#[derive(Parser)]
#[command(name = "pdf-batch")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON configuration file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file and PDF_BATCH_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the preview of every rule in a rules file
    Preview {
        /// Rules file (JSON array)
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,
    },

    /// Compute every copy's replacement texts locally
    Plan {
        /// Rules file (JSON array)
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,

        /// Number of copies (1-1000)
        #[arg(short = 'n', long, default_value_t = 10)]
        copies: u32,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a PDF and print the detected text sections as JSON
    Detect {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output JSON file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Upload, detect, apply rules and download the generated copies
    Run {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Rules file (JSON array); section ids must match detected sections
        #[arg(short, long, value_name = "FILE")]
        rules: PathBuf,

        /// Number of copies (1-1000)
        #[arg(short = 'n', long, default_value_t = 10)]
        copies: u32,

        /// Output file (defaults to the name the backend suggests)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Download one previously generated copy
    Download {
        /// Document id returned by the upload
        #[arg(long, value_name = "ID")]
        pdf_id: String,

        /// One-based copy number
        #[arg(long, value_name = "N")]
        copy: u32,

        /// Output file (defaults to copy_<N>.pdf)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Command handler holding the settings shared by all subcommands.
struct BatchHandler {
    config_path: Option<PathBuf>,
    api_url: Option<String>,
    verbose: bool,
}

impl BatchHandler {
    fn new(config_path: Option<PathBuf>, api_url: Option<String>, verbose: bool) -> Self {
        Self {
            config_path,
            api_url,
            verbose,
        }
    }

    /// Builds the backend client; only network commands need one.
    fn client(&self) -> Result<BackendClient> {
        let mut config = ClientConfig::load(self.config_path.as_deref())
            .with_context(|| "Failed to load configuration")?;
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.clone()).validated()?;
        }
        if self.verbose {
            println!("Backend: {}", config.api_url);
        }
        Ok(BackendClient::new(&config)?)
    }

    fn preview(&self, rules_path: &Path) -> Result<()> {
        let rules = read_rules(rules_path)?;
        for rule in &rules {
            let text = preview(rule)
                .with_context(|| format!("Invalid rule for section '{}'", rule.section_id))?;
            println!("{}: \"{}\" → {}", rule.section_id, rule.original_text, text);
        }
        Ok(())
    }

    fn plan(&self, rules_path: &Path, copies: u32, json: bool) -> Result<()> {
        let rules = read_rules(rules_path)?;
        let plan = RuleEngine::new()
            .plan(&rules, copies)
            .with_context(|| "Planning failed")?;

        if json {
            println!("{}", serde_json::to_string_pretty(&plan)?);
        } else {
            print!("{}", render_plan(&plan));
        }
        Ok(())
    }

    fn detect(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let client = self.client()?;
        let cancel = CancelToken::new();
        let upload = client
            .upload(input, &cancel)
            .with_context(|| "Upload failed")?;
        let sections = client
            .detect_sections(&upload.pdf_id, &cancel)
            .with_context(|| "Text detection failed")?;

        let json = serde_json::to_string_pretty(&sections)?;
        if let Some(output_path) = output {
            std::fs::write(output_path, &json)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Detected {} section(s) in {} → {}",
                sections.len(),
                upload.pdf_id,
                output_path.display()
            );
        } else {
            println!("{}", json);
        }
        Ok(())
    }

    fn run(&self, input: &Path, rules_path: &Path, copies: u32, output: Option<&Path>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let rules = read_rules(rules_path)?;
        if rules.is_empty() {
            anyhow::bail!("No rules in {}", rules_path.display());
        }

        let client = self.client()?;
        let cancel = CancelToken::new();

        let upload = client
            .upload(input, &cancel)
            .with_context(|| "Upload failed")?;
        let sections = client
            .detect_sections(&upload.pdf_id, &cancel)
            .with_context(|| "Text detection failed")?;

        let state = build_state(&upload.pdf_id, sections, rules, copies)?;
        if self.verbose {
            println!("Document: {}", upload.pdf_id);
            println!("Rules:    {}", state.rules().len());
            println!("Copies:   {}", state.num_copies());
        }

        let request = state.generation_request()?;
        let verbose = self.verbose;
        let mut last_percent = None;
        let result = client
            .generate(&request, &cancel, |done, total| {
                if let (true, Some(total)) = (verbose, total.filter(|t| *t > 0)) {
                    let percent = done * 100 / total;
                    if last_percent != Some(percent) {
                        last_percent = Some(percent);
                        eprint!("\rDownloading... {}%", percent);
                    }
                }
            })
            .with_context(|| "Generation failed")?;
        if verbose {
            eprintln!();
        }

        let target = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&result.file_name));
        result
            .save(&target)
            .with_context(|| format!("Failed to write to {}", target.display()))?;

        println!(
            "✓ Successfully generated {} PDF copies → {}",
            state.num_copies(),
            target.display()
        );
        Ok(())
    }

    fn download(&self, pdf_id: &str, copy: u32, output: Option<&Path>) -> Result<()> {
        let client = self.client()?;
        let result = client
            .download_copy(pdf_id, copy, &CancelToken::new())
            .with_context(|| "Download failed")?;

        let target = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&result.file_name));
        result
            .save(&target)
            .with_context(|| format!("Failed to write to {}", target.display()))?;
        println!("✓ Downloaded copy {} → {}", copy, target.display());
        Ok(())
    }
}

fn read_rules(path: &Path) -> Result<Vec<ReplacementRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules from {}", path.display()))?;
    parse_rules(&raw).with_context(|| format!("Invalid rules in {}", path.display()))
}

/// Replays the wizard transitions for rules loaded from a file.
///
/// Each rule selects its section (which must have been detected and not
/// already claimed by an earlier rule) and then replaces the default rule. Rules without original text inherit the
/// detected text of their section.
fn build_state(
    pdf_id: &str,
    sections: Vec<TextSection>,
    rules: Vec<ReplacementRule>,
    copies: u32,
) -> Result<WizardState> {
    let mut state = WizardState::new()
        .pdf_uploaded(pdf_id)
        .sections_detected(sections);

    for mut rule in rules {
        let section = find_section(state.sections(), &rule.section_id)
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Rule refers to section '{}' which was not detected",
                    rule.section_id
                )
            })?;
        if state.is_selected(&section.id) {
            anyhow::bail!("More than one rule for section '{}'", section.id);
        }
        if rule.original_text.is_empty() {
            rule.original_text = section.text.clone();
        }
        state = state.select_section(&section)?;
        state = state.update_rule(&section.id, rule)?;
    }

    Ok(state.set_num_copies(copies)?)
}

fn render_plan(plan: &BatchPlan) -> String {
    let mut out = String::new();
    for copy in &plan.copies {
        out.push_str(&format!("Copy {}:\n", copy.copy_number()));
        for replacement in &copy.replacements {
            out.push_str(&format!(
                "  {} \"{}\" → {}\n",
                replacement.section_id, replacement.original_text, replacement.text
            ));
        }
    }
    out
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose {
        "pdf_batch=debug"
    } else {
        "pdf_batch=warn"
    };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;
    let handler = BatchHandler::new(cli.config.clone(), cli.api_url.clone(), cli.verbose);

    match &cli.command {
        Commands::Preview { rules } => handler.preview(rules)?,
        Commands::Plan {
            rules,
            copies,
            json,
        } => handler.plan(rules, *copies, *json)?,
        Commands::Detect { input, output } => handler.detect(input, output.as_deref())?,
        Commands::Run {
            input,
            rules,
            copies,
            output,
        } => handler.run(input, rules, *copies, output.as_deref())?,
        Commands::Download {
            pdf_id,
            copy,
            output,
        } => handler.download(pdf_id, *copy, output.as_deref())?,
    }

    Ok(())
}
