mod debug_report;

use clap::Parser;
use rbe::{Direction, Engine, Objective, Options};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "RBE_LOG";

/// Rule-based token rewriting engine.
///
/// Reads lines from stdin, splits each on single spaces into tokens, rewrites
/// them with the given rule databases to a fixed point, and prints the result.
#[derive(Parser, Debug)]
#[command(name = "rbe", version)]
#[command(after_help = "Exit codes:\n  0  Success.\n  1  Invalid arguments, unreadable database, or I/O error.\n\n\
Logging is controlled with the RBE_LOG environment variable (e.g. RBE_LOG=debug).")]
struct Cli {
    /// Index of the metric to optimize.
    metric: usize,
    /// Optimization direction: negative minimizes, positive maximizes, 0 leaves input unchanged.
    #[arg(allow_negative_numbers = true)]
    direction: i64,
    /// Rule database files, applied in the given order.
    databases: Vec<PathBuf>,
    /// Stop after this many passes even if no fixed point was reached.
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,
    /// Print a per-pass report for every line on stderr.
    #[arg(short, long)]
    verbose: bool,
    /// Force ANSI color in the report.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,
    /// Disable ANSI color in the report.
    #[arg(long)]
    no_color: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            // --help / --version
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    init_logging();

    let engine = match Engine::from_paths(&cli.databases) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(1);
        }
    };
    tracing::info!(databases = engine.databases().len(), rules = engine.rule_count(), "engine ready");

    let objective = Objective::new(cli.metric, Direction::from_sign(cli.direction));
    let options = Options { max_passes: cli.max_passes };
    let color = if cli.color { true } else { !cli.no_color && io::stderr().is_terminal() };

    match run(&engine, &objective, &options, cli.verbose, color) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).with_target(false).init();
}

/// Rewrite stdin line by line until end of input.
fn run(engine: &Engine, objective: &Objective, options: &Options, verbose: bool, color: bool) -> io::Result<()> {
    let stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();

    for line in stdin.lines() {
        let line = line?;
        let tokens = split_tokens(&line);

        let rewrite = if verbose {
            let res = engine.execute_verbose_with(tokens, objective, options);
            debug_report::print_run(&line, &res, color);
            res.rewrite
        } else {
            engine.execute_with(tokens, objective, options)
        };

        writeln!(stdout, "{}", rewrite.tokens.join(" "))?;
        stdout.flush()?;
    }

    Ok(())
}

/// Split an input line on single spaces. An empty line has no tokens.
fn split_tokens(line: &str) -> Vec<String> {
    if line.is_empty() { Vec::new() } else { line.split(' ').map(str::to_string).collect() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_single_spaces() {
        assert_eq!(split_tokens("a b"), vec!["a", "b"]);
        assert_eq!(split_tokens("a  b"), vec!["a", "", "b"]);
        assert!(split_tokens("").is_empty());
    }

    #[test]
    fn parses_positional_arguments() {
        let cli = Cli::try_parse_from(["rbe", "0", "-1", "a.rbe", "b.rbe"]).unwrap();
        assert_eq!(cli.metric, 0);
        assert_eq!(Direction::from_sign(cli.direction), Direction::Minimize);
        assert_eq!(cli.databases, vec![PathBuf::from("a.rbe"), PathBuf::from("b.rbe")]);
        assert!(cli.max_passes.is_none());
    }

    #[test]
    fn rejects_invalid_metric_and_direction() {
        assert!(Cli::try_parse_from(["rbe", "x", "1"]).is_err());
        assert!(Cli::try_parse_from(["rbe", "-2", "1"]).is_err());
        assert!(Cli::try_parse_from(["rbe", "0", "up"]).is_err());
        assert!(Cli::try_parse_from(["rbe", "0"]).is_err());
    }

    #[test]
    fn parses_options() {
        let cli = Cli::try_parse_from(["rbe", "--max-passes", "3", "-v", "1", "1", "db.rbe"]).unwrap();
        assert_eq!(cli.max_passes, Some(3));
        assert!(cli.verbose);
        assert_eq!(Direction::from_sign(cli.direction), Direction::Maximize);
    }
}
