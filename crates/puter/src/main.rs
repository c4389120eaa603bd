//! # puter
//!
//! Run a Power Puter program from the command line, the way the host node
//! would.
//!
//! ```bash
//! puter --code "a * 2" --input a=21 --output INT
//! puter --file program.py --prompt prompt.json --input steps=30
//! RUST_LOG=puter=debug puter --code "node('Sampler').inputs.seed" --prompt prompt.json
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use puter::value::Map;
use puter::{EvalContext, LanguageFrontend, OutputType, PowerPuter, Prompt, Value};

#[derive(Parser)]
#[command(name = "puter")]
#[command(about = "Evaluate a Power Puter expression program")]
#[command(version)]
struct Cli {
    /// Program source
    #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
    code: Option<String>,

    /// Read the program from a file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Workflow prompt JSON file (node id -> node record)
    #[arg(short, long)]
    prompt: Option<PathBuf>,

    /// Named input, `name=value`; the value is parsed as JSON, else kept as text
    #[arg(short, long = "input", value_name = "NAME=VALUE")]
    inputs: Vec<String>,

    /// Output type: STRING, INT, FLOAT or BOOL
    #[arg(short, long, default_value = "STRING")]
    output: String,

    /// Seed for random_int / random_choice
    #[arg(long)]
    seed: Option<u64>,

    /// Trace statements and builtin calls
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_input(raw: &str) -> Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("input `{}` is not of the form name=value", raw);
    };
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => Value::from(json),
        Err(_) => Value::string(value),
    };
    Ok((name.trim().to_string(), value))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let code = match (&cli.code, &cli.file) {
        (Some(code), _) => code.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("reading program {}", path.display()))?,
        (None, None) => bail!("one of --code or --file is required"),
    };

    let mut ctx = EvalContext::new().with_trace(cli.verbose);
    if let Some(path) = &cli.prompt {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading prompt {}", path.display()))?;
        let prompt = Prompt::from_json_str(&text)
            .with_context(|| format!("loading prompt {}", path.display()))?;
        ctx = ctx.with_prompt(prompt);
    }
    if let Some(seed) = cli.seed {
        ctx = ctx.with_seed(seed);
    }

    let mut inputs = Map::new();
    for raw in &cli.inputs {
        let (name, value) = parse_input(raw)?;
        inputs.insert(name, value);
    }

    let output: OutputType = cli.output.parse().unwrap_or_default();
    let node = PowerPuter::new(ctx);
    match node.run(&code, inputs, output) {
        Ok(value) => {
            println!("{}", value);
            Ok(())
        }
        Err(err) => {
            let frontend = puter::frontends::PuterFrontend::new();
            eprintln!("{}", frontend.format_error(&err, &code));
            std::process::exit(1);
        }
    }
}
