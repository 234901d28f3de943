//! Responsive style attribute CLI
//!
//! Compiles query keys, style maps and `data-rsa-style` markup from the
//! command line.
//!
//! # Usage
//!
//! ```bash
//! # Expand query keys against a breakpoint set
//! rsa --breakpoints-css theme.css compile lt-md "screen@md@portrait"
//!
//! # Register a JSON style map and print the stylesheet
//! echo '{"lt-md": "border: 1px solid #000"}' | rsa --config rsa.yaml css
//!
//! # Rewrite markup and append the <style> element
//! rsa html --file page.html --remove --stylesheet
//!
//! # Fingerprint a string
//! rsa hash "@media all:color:red" --seed 42
//! ```

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;

use resp_style_attr::{
    definition_from_css, fingerprint, CompilerConfig, Headless, StyleCompiler,
};

#[derive(Parser)]
#[command(name = "rsa")]
#[command(version)]
#[command(about = "Compile breakpoint query keys and responsive style attributes to CSS")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Compiler configuration (YAML or JSON)
    #[arg(long, short, global = true, env = "RSA_CONFIG")]
    config: Option<PathBuf>,

    /// CSS file to read the `--breakpoints-<key>` custom property from
    #[arg(long, global = true)]
    breakpoints_css: Option<PathBuf>,

    /// Fingerprint seed (overrides the configuration; `hash` defaults to 0)
    #[arg(long, global = true)]
    seed: Option<u32>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand query keys to media queries
    Compile {
        /// Query keys, e.g. `lt-md` or `screen@md@portrait`
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Register a JSON style map and print the resulting CSS
    Css {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Annotate `data-rsa-style` markup with rule markers
    Html {
        /// Input file (reads stdin if not provided)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Drop the source `data-rsa-style` attribute
        #[arg(long)]
        remove: bool,

        /// Append the generated `<style>` element
        #[arg(long)]
        stylesheet: bool,
    },

    /// Print the 53-bit fingerprint of a string
    Hash {
        text: String,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Compile { keys } => cmd_compile(&cli, keys),
        Commands::Css { file } => cmd_css(&cli, file.clone()),
        Commands::Html {
            file,
            remove,
            stylesheet,
        } => cmd_html(&cli, file.clone(), *remove, *stylesheet),
        Commands::Hash { text } => cmd_hash(text, cli.seed.unwrap_or(0), cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

fn cmd_compile(cli: &Cli, keys: &[String]) -> Result<()> {
    let mut compiler = StyleCompiler::new(load_config(cli)?);

    match cli.format {
        OutputFormat::Text => {
            for key in keys {
                println!("{}", compiler.compile_key(key));
            }
        }
        OutputFormat::Json => {
            let queries: serde_json::Map<_, _> = keys
                .iter()
                .map(|key| (key.clone(), json!(compiler.compile_key(key))))
                .collect();
            println!("{}", serde_json::to_string_pretty(&queries)?);
        }
    }
    Ok(())
}

fn cmd_css(cli: &Cli, file: Option<PathBuf>) -> Result<()> {
    let source = read_input(file)?;
    let styles = resp_style_attr::decode_style_map(&source).context("Invalid style map")?;

    let mut compiler = StyleCompiler::new(load_config(cli)?);
    let rules = compiler.push(&styles);

    match cli.format {
        OutputFormat::Text => println!("{}", compiler.css()),
        OutputFormat::Json => {
            let rules: Vec<_> = rules
                .iter()
                .map(|rule| {
                    json!({
                        "key": rule.key,
                        "mediaQuery": rule.media_query,
                        "style": rule.style,
                        "fingerprint": rule.fingerprint,
                        "selector": rule.selector,
                    })
                })
                .collect();
            let output = json!({ "seed": compiler.seed(), "rules": rules, "css": compiler.css() });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn cmd_html(cli: &Cli, file: Option<PathBuf>, remove: bool, stylesheet: bool) -> Result<()> {
    let source = read_input(file)?;
    let mut headless = Headless::new(load_config(cli)?);
    let html = headless.parse(&source, remove);

    match cli.format {
        OutputFormat::Text => {
            print!("{html}");
            if stylesheet {
                print!("{}", headless.stylesheet());
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "html": html,
                "css": headless.css(),
                "seed": headless.compiler().seed(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn cmd_hash(text: &str, seed: u32, format: OutputFormat) -> Result<()> {
    let hash = fingerprint::hash(text, seed);
    match format {
        OutputFormat::Text => println!("{hash}"),
        OutputFormat::Json => println!("{}", json!({ "text": text, "seed": seed, "hash": hash })),
    }
    Ok(())
}

// =============================================================================
// HELPERS
// =============================================================================

fn load_config(cli: &Cli) -> Result<CompilerConfig> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::from_path(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => CompilerConfig::default(),
    };

    if let Some(path) = &cli.breakpoints_css {
        let css = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        match definition_from_css(&css, &config.breakpoint_key) {
            Some(definition) => config.breakpoint_definition = Some(definition),
            None => tracing::warn!(
                "No {} declaration in '{}'",
                config.breakpoint_property(),
                path.display()
            ),
        }
    }

    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn read_input(file: Option<PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read '{}'", path.display())),
        None => {
            if io::stdin().is_terminal() {
                bail!("No input provided. Use --file or pipe input via stdin.");
            }
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
