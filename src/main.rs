use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process,
};

use clap::{Parser, ValueEnum};
use log::info;
use thiserror::Error;

use ll_slr_helper::grammar::{
    analysis::ParserKind, parse::split_input, slr1::ReduceReducePolicy, Analysis,
};
use ll_slr_helper::{Grammar, GrammarError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions
    Prod,
    /// First and follow sets
    Ff,
    /// LL(1) parsing table
    Ll1,
    /// LR(0) automaton
    Lr0fsm,
    /// SLR(1) conflict report
    Slr1,
    /// SLR(1) parsing table
    Slr1table,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ParserChoice {
    Auto,
    Ll1,
    Slr1,
}

/// Checks whether a grammar is LL(1) or SLR(1) and parses strings with it.
#[derive(Parser, Debug)]
#[clap(name = "ll-slr-helper", version)]
struct Args {
    /// What to print
    #[clap(value_enum)]
    outputs: Vec<Output>,

    /// Grammar file, read from stdin when omitted
    #[clap(short, long)]
    grammar: Option<PathBuf>,

    #[clap(short, long, value_enum, default_value_t = OutputFormat::Plain)]
    format: OutputFormat,

    /// Strings to parse, e.g. `1+1` or `id + id`
    #[clap(short, long = "input")]
    inputs: Vec<String>,

    /// File with one string to parse per line
    #[clap(long)]
    inputs_file: Option<PathBuf>,

    #[clap(long, value_enum, default_value_t = ParserChoice::Auto)]
    parser: ParserChoice,

    /// Only report reduce-reduce conflicts whose Follow sets overlap
    #[clap(long)]
    strict_reduce_reduce: bool,

    /// Print every step of the parser
    #[clap(long)]
    trace: bool,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("failed to read {0}: {1}")]
    Read(String, #[source] io::Error),
    #[error("invalid grammar: {0}")]
    Grammar(#[from] GrammarError),
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the grammar is neither LL(1) nor SLR(1), cannot parse")]
    NoParser,
}

fn read_file(path: &PathBuf) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|e| CliError::Read(path.display().to_string(), e))
}

fn print_outputs(args: &Args, a: &Analysis) -> Result<(), CliError> {
    let g = &a.grammar;
    for output in &args.outputs {
        let text = match output {
            Output::Prod => {
                let t = g.to_production_output_vec();
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
            Output::Ff => {
                let t = g.to_non_terminal_output_vec(&a.first, &a.follow);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
            Output::Ll1 => {
                let t = a.ll1.to_output(g);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
            Output::Lr0fsm => {
                let t = a.fsm.to_output(g);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
            Output::Slr1 => {
                let t = a.slr1_report.to_output(g);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
            Output::Slr1table => {
                let t = a.slr1.to_output(g);
                match args.format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::Latex => t.to_latex(),
                    OutputFormat::Json => t.to_json()?,
                }
            }
        };
        println!("{}", text);
    }
    Ok(())
}

fn parse_inputs(args: &Args, a: &Analysis, inputs: &[String]) -> Result<(), CliError> {
    let parser = match args.parser {
        ParserChoice::Ll1 => ParserKind::LL1,
        ParserChoice::Slr1 => ParserKind::SLR1,
        ParserChoice::Auto => a.preferred_parser().ok_or(CliError::NoParser)?,
    };
    info!("parsing {} strings with {:?}", inputs.len(), parser);

    for input in inputs {
        let tokens = split_input(input);
        if args.trace {
            let trace = match parser {
                ParserKind::LL1 => a.ll1.trace(&a.grammar, &tokens).to_plaintext(&a.grammar),
                ParserKind::SLR1 => a.slr1.trace(&a.grammar, &tokens).to_plaintext(&a.grammar),
            };
            println!("{}\n{}\n", input, trace);
        } else {
            match a.parse(parser, &tokens) {
                Ok(()) => println!("{}: accepted", input),
                Err(rejection) => println!("{}: rejected ({})", input, rejection),
            }
        }
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = match &args.grammar {
        Some(path) => read_file(path)?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| CliError::Read("stdin".to_string(), e))?;
            buf
        }
    };

    let policy = if args.strict_reduce_reduce {
        ReduceReducePolicy::FollowOverlap
    } else {
        ReduceReducePolicy::AnyMultiple
    };
    let analysis = Analysis::with_policy(Grammar::parse(&text)?, policy);

    print_outputs(&args, &analysis)?;

    let mut inputs = args.inputs.clone();
    if let Some(path) = &args.inputs_file {
        inputs.extend(
            read_file(path)?
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| l.trim().to_string()),
        );
    }
    if !inputs.is_empty() {
        parse_inputs(&args, &analysis, &inputs)?;
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}
