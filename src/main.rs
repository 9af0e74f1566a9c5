use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sitegen::config::Config;
use sitegen::site::{EscapeOptions, GenerationPipeline, PromptVariant};
use sitegen::{write_bundle, GeminiClient, OutputHandler};

#[derive(Parser)]
#[command(name = "sitegen")]
#[command(about = "Generate a small website (HTML, CSS, JS) from a prompt", long_about = None)]
struct Cli {
    /// Log every model attempt and repair step
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of ~/.sitegen/config.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate index.html, style.css and script.js for a prompt
    Generate {
        /// What the website should be about
        prompt: String,

        /// Directory the files are written to
        #[arg(short, long, default_value = "site")]
        out: PathBuf,

        /// Override the configured prompt variant
        #[arg(long, value_enum)]
        variant: Option<VariantArg>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (API key masked)
    Show,
    /// Write the default configuration file
    Init,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    Dynamic,
    Semantic,
}

impl From<VariantArg> for PromptVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Dynamic => PromptVariant::DynamicRoot,
            VariantArg::Semantic => PromptVariant::SemanticHtml,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    sitegen::logger::init_global_logger(cli.verbose)?;

    let mut output = OutputHandler::new().with_debug(cli.verbose);
    let config = Config::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::Generate {
            prompt,
            out,
            variant,
        } => {
            let ok = run_generate(&mut output, config, &prompt, &out, variant).await?;
            if !ok {
                std::process::exit(1);
            }
        }
        Command::Config { action } => run_config(&mut output, config, cli.config, action)?,
    }

    Ok(())
}

async fn run_generate(
    output: &mut OutputHandler,
    mut config: Config,
    prompt: &str,
    out: &Path,
    variant: Option<VariantArg>,
) -> Result<bool> {
    if let Some(variant) = variant {
        config.generation.variant = variant.into();
    }

    let client = match GeminiClient::from_config(&config.ai) {
        Ok(client) => client,
        Err(err) => {
            output.print_error(&err.to_string())?;
            return Ok(false);
        }
    };

    let pipeline = GenerationPipeline::new(Arc::new(client), config.generation.variant_config())
        .with_escape_options(EscapeOptions {
            expand_tabs: config.generation.expand_tabs,
        });

    output.print_banner()?;
    output.print_prompt(prompt)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Generating your website...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = pipeline.run(prompt).await;
    spinner.finish_and_clear();

    match result {
        Ok(site) => {
            let written = write_bundle(out, &site.bundle)?;
            output.print_site_summary(&site, &written)?;
            Ok(true)
        }
        Err(err) => {
            output.print_error(&err.to_string())?;
            output.print_system("Nothing was written; existing files are unchanged.")?;
            Ok(false)
        }
    }
}

fn run_config(
    output: &mut OutputHandler,
    config: Config,
    path: Option<PathBuf>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let mut shown = config;
            if !shown.ai.api_key.is_empty() {
                shown.ai.api_key = "********".to_string();
            }
            print!("{}", serde_yaml::to_string(&shown)?);
        }
        ConfigAction::Init => {
            let path = path.unwrap_or_else(Config::get_config_path);
            if path.exists() {
                output.print_system(&format!("{} already exists", path.display()))?;
            } else {
                Config::default().save_to_file(&path)?;
                output.print_system(&format!("Wrote {}", path.display()))?;
            }
        }
    }
    Ok(())
}
