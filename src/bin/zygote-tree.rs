//! Build an import tree from a JSON input document.
//!
//! Usage:
//!   zygote-tree --input calls.json --out tree.json [options]
//!
//! Options:
//!   --input PATH           Input document: {packages, calls, deps, weights?}
//!   --out PATH             Output tree document
//!   --splits N             Maximum number of splits (default: grow until stable)
//!   --prereq-first         Only split on packages whose prerequisites are committed
//!   --entropy-penalty X    Entropy penalty (default: 0)
//!   --dist-weights         Spread package weights over prerequisites
//!   --dump                 Print the text dump to stdout
//!   --verbose              Log every applied split
//!
//! Logging goes through `tracing`; `RUST_LOG` overrides the default filter.

use std::path::PathBuf;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use zygote_tree::{ImportTree, SplitOpts, TreeInput, Verbosity};

struct Args {
    input: PathBuf,
    out: PathBuf,
    splits: Option<usize>,
    prereq_first: bool,
    entropy_penalty: f64,
    dist_weights: bool,
    dump: bool,
    verbose: bool,
}

const HELP: &str = "zygote-tree

  --input <path>         Input document: {packages, calls, deps, weights?}
  --out <path>           Output tree document
  --splits <n>           Maximum number of splits (default: until stable)
  --prereq-first         Only split on packages whose prerequisites are committed
  --entropy-penalty <x>  Entropy penalty (default: 0)
  --dist-weights         Spread package weights over prerequisites
  --dump                 Print the text dump to stdout
  --verbose              Log every applied split";

fn parse_args() -> Result<Args, String> {
    let mut input = None;
    let mut out = None;
    let mut splits = None;
    let mut prereq_first = false;
    let mut entropy_penalty = 0.0;
    let mut dist_weights = false;
    let mut dump = false;
    let mut verbose = false;

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--input" => input = Some(PathBuf::from(value(&mut it, "--input")?)),
            "--out" => out = Some(PathBuf::from(value(&mut it, "--out")?)),
            "--splits" => {
                let v = value(&mut it, "--splits")?;
                splits = Some(v.parse().map_err(|_| format!("invalid --splits: {v}"))?);
            }
            "--prereq-first" => prereq_first = true,
            "--entropy-penalty" => {
                let v = value(&mut it, "--entropy-penalty")?;
                entropy_penalty = v
                    .parse()
                    .map_err(|_| format!("invalid --entropy-penalty: {v}"))?;
            }
            "--dist-weights" => dist_weights = true,
            "--dump" => dump = true,
            "--verbose" => verbose = true,
            "--help" | "-h" => {
                println!("{HELP}");
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }

    Ok(Args {
        input: input.ok_or("--input is required")?,
        out: out.ok_or("--out is required")?,
        splits,
        prereq_first,
        entropy_penalty,
        dist_weights,
        dump,
        verbose,
    })
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    it.next().ok_or_else(|| format!("{flag} requires a value"))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let input = TreeInput::load(&args.input)?;
    let (calls, deps, weights) = input.into_matrices()?;

    let opts = SplitOpts::builder()
        .maybe_weights(weights)
        .prereq_first(args.prereq_first)
        .entropy_penalty(args.entropy_penalty)
        .dist_weights(args.dist_weights)
        .verbosity(if args.verbose {
            Verbosity::Debug
        } else {
            Verbosity::Info
        })
        .build()?;

    let mut tree = ImportTree::new(calls, deps, opts)?;
    match args.splits {
        Some(n) => tree.do_splits(n)?,
        None => tree.grow()?,
    };

    tree.save(&args.out)?;
    tracing::info!(
        path = %args.out.display(),
        nodes = tree.num_nodes(),
        root_cost = tree.root().rcost(),
        "saved tree"
    );

    if args.dump {
        print!("{}", tree.dump());
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}\n\n{HELP}");
            return ExitCode::from(2);
        }
    };

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
