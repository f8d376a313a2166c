use std::{fs, process::ExitCode};

use calcmark::{
    LineResult,
    config::{DEFAULT_MAX_DEPTH, DEFAULT_MAX_TOKENS, Limits},
    error::ConfigError,
    evaluate_document_with_limits,
    interpreter::{classifier::LineType, evaluator::core::Environment, types::currency::ExchangeRates},
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// calcmark evaluates documents that mix prose with calculations, printing
/// what each line is and what it computes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells calcmark to read CONTENTS as a file path instead of a document.
    #[arg(short, long)]
    file: bool,

    /// Exchange rate, e.g. `USD/EUR=0.92`. May be repeated.
    #[arg(long = "rate", value_name = "FROM/TO=RATE")]
    rates: Vec<String>,

    /// Pre-defined literal value, e.g. `tax=8%`. May be repeated.
    #[arg(long = "global", value_name = "NAME=LITERAL")]
    globals: Vec<String>,

    /// Maximum number of tokens per line.
    #[arg(long, default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: usize,

    /// Maximum expression nesting depth.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log classification and evaluation decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    contents: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let default_directive = if args.verbose {
        "calcmark=debug"
    } else {
        "calcmark=warn"
    };
    tracing_subscriber::fmt().with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                                                  EnvFilter::new(default_directive)
                                              }))
                             .with_writer(std::io::stderr)
                             .init();

    let document = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(document) => document,
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents.clone()
    };

    let mut env = match build_environment(&args) {
        Ok(env) => env,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        },
    };

    let limits = Limits { max_tokens: args.max_tokens,
                          max_depth:  args.max_depth, };

    for line in evaluate_document_with_limits(&document, &mut env, &limits) {
        print_line(&line);
    }
    ExitCode::SUCCESS
}

/// Seeds rates and globals before anything is evaluated, so a bad setting
/// stops the run instead of half-applying.
fn build_environment(args: &Args) -> Result<Environment, ConfigError> {
    let mut rates = ExchangeRates::default();
    for pair in &args.rates {
        let (from, to, rate) = ExchangeRates::parse_pair(pair)?;
        rates.insert(&from, &to, rate);
    }

    let mut env = Environment::new().with_exchange_rates(rates);
    for setting in &args.globals {
        let (name, literal) = setting.split_once('=')
                                     .ok_or_else(|| ConfigError::MalformedSetting { setting: setting.clone() })?;
        env.seed_global(name.trim(), literal.trim())?;
    }
    Ok(env)
}

fn print_line(line: &LineResult) {
    match line.line_type {
        LineType::Blank => println!("{:>4}", line.line),
        LineType::Markdown => println!("{:>4}  md", line.line),
        LineType::Calculation => {
            match (&line.value, &line.error) {
                (Some(value), _) => println!("{:>4}  =   {value}", line.line),
                (None, Some(error)) => println!("{:>4}  !   {error}", line.line),
                (None, None) => println!("{:>4}  !", line.line),
            }
            for diagnostic in &line.diagnostics {
                println!("      {diagnostic}");
            }
        },
    }
}
