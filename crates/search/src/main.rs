//! Command-line driver for Monte Carlo tree search sessions.
//!
//! Runs independent searches over the bundled games in parallel and prints
//! one JSON line per session.

mod session;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use montecarlo_games::{known_cities, NgramOverlapScorer, SentenceGame, TravelingTourist};
use montecarlo_mcts::MctsConfig;
use session::{run_sessions, SessionReport};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Monte Carlo tree search over tours and sentences.
#[derive(Parser)]
#[command(name = "montecarlo-search")]
#[command(about = "Run Monte Carlo tree search sessions over the bundled games")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a short closed tour.
    Tour {
        /// Home town, where the tour starts and ends.
        #[arg(long)]
        home: String,

        /// Cities to visit, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        cities: Vec<String>,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// Search for a sentence the n-gram scorer accepts.
    Sentence {
        /// Word every sentence starts with.
        #[arg(long)]
        start: String,

        /// Words that may follow, comma separated.
        #[arg(long, value_delimiter = ',', required = true)]
        vocabulary: Vec<String>,

        /// Text file with one corpus sentence per line.
        #[arg(long)]
        corpus: PathBuf,

        /// Number of words in a finished sentence.
        #[arg(long, default_value = "4")]
        length: usize,

        #[command(flatten)]
        search: SearchArgs,
    },

    /// List the cities with known coordinates.
    Cities,
}

/// Flags shared by every search command.
#[derive(Args)]
struct SearchArgs {
    /// Iterations per session (overrides the config file).
    #[arg(short, long)]
    iterations: Option<usize>,

    /// UCB1 exploration coefficient (overrides the config file).
    #[arg(short, long)]
    exploration: Option<f64>,

    /// Number of independent sessions.
    #[arg(short, long, default_value = "1")]
    sessions: usize,

    /// Seed of the first session; session i uses seed + i.
    #[arg(long, default_value = "42")]
    seed: u64,

    /// TOML file with search parameters.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SearchArgs {
    /// Config file values, then command-line overrides.
    fn mcts_config(&self) -> Result<MctsConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => MctsConfig::default(),
        };
        if let Some(iterations) = self.iterations {
            config.iteration_budget = iterations;
        }
        if let Some(exploration) = self.exploration {
            config.exploration_coefficient = exploration;
        }
        config.validate().context("Invalid search configuration")?;
        Ok(config)
    }
}

fn load_config(path: &Path) -> Result<MctsConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

fn load_corpus(path: &Path) -> Result<NgramOverlapScorer> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read corpus: {:?}", path))?;
    let scorer = NgramOverlapScorer::from_corpus(content.lines());
    if scorer.known_bigram_count() == 0 {
        bail!("Corpus {:?} contains no usable sentence", path);
    }
    info!(
        bigrams = scorer.known_bigram_count(),
        trigrams = scorer.known_trigram_count(),
        "corpus loaded"
    );
    Ok(scorer)
}

fn print_reports(reports: &[SessionReport]) -> Result<()> {
    for report in reports {
        let line = serde_json::to_string(report).context("Failed to serialize session report")?;
        println!("{}", line);
    }
    Ok(())
}

/// Run the tour command.
fn cmd_tour(home: &str, cities: &[String], search: &SearchArgs) -> Result<()> {
    let config = search.mcts_config()?;
    let cities: Vec<&str> = cities.iter().map(String::as_str).collect();
    let game = TravelingTourist::new(home, &cities).context("Failed to plan tour")?;

    info!(
        home,
        cities = game.planned().len(),
        sessions = search.sessions,
        iterations = config.iteration_budget,
        "searching tours"
    );
    let start = Instant::now();
    let reports = run_sessions(&game, &game.initial_state(), &config, search.sessions, search.seed)?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "search complete");

    print_reports(&reports)
}

/// Run the sentence command.
fn cmd_sentence(
    start: &str,
    vocabulary: &[String],
    corpus: &Path,
    length: usize,
    search: &SearchArgs,
) -> Result<()> {
    let config = search.mcts_config()?;
    let scorer = load_corpus(corpus)?;
    let vocabulary: Vec<&str> = vocabulary.iter().map(String::as_str).collect();
    let game = SentenceGame::new(&vocabulary, start, scorer)
        .context("Failed to set up sentence game")?
        .with_sentence_length(length);

    info!(
        start,
        vocabulary = vocabulary.len(),
        length,
        sessions = search.sessions,
        iterations = config.iteration_budget,
        "searching sentences"
    );
    let started = Instant::now();
    let reports = run_sessions(&game, &game.initial_state(), &config, search.sessions, search.seed)?;
    info!(elapsed_ms = started.elapsed().as_millis() as u64, "search complete");

    print_reports(&reports)
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Tour {
            home,
            cities,
            search,
        } => cmd_tour(&home, &cities, &search),
        Commands::Sentence {
            start,
            vocabulary,
            corpus,
            length,
            search,
        } => cmd_sentence(&start, &vocabulary, &corpus, length, &search),
        Commands::Cities => {
            for city in known_cities() {
                println!("{}", city);
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn search_args(config: Option<PathBuf>) -> SearchArgs {
        SearchArgs {
            iterations: None,
            exploration: None,
            sessions: 1,
            seed: 42,
            config,
        }
    }

    #[test]
    fn test_cli_parses_tour() {
        let cli = Cli::try_parse_from([
            "montecarlo-search",
            "tour",
            "--home",
            "Berlin",
            "--cities",
            "Paris,Rome",
            "--sessions",
            "3",
        ])
        .unwrap();

        match cli.command {
            Commands::Tour {
                home,
                cities,
                search,
            } => {
                assert_eq!(home, "Berlin");
                assert_eq!(cities, vec!["Paris", "Rome"]);
                assert_eq!(search.sessions, 3);
                assert_eq!(search.seed, 42);
            }
            _ => panic!("expected tour command"),
        }
    }

    #[test]
    fn test_overrides_win_over_config_file() {
        let path = std::env::temp_dir().join(format!("montecarlo-config-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "exploration_coefficient = 2.0\niteration_budget = 10").unwrap();

        let mut args = search_args(Some(path.clone()));
        args.iterations = Some(25);
        let config = args.mcts_config().unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.iteration_budget, 25);
        assert_eq!(config.exploration_coefficient, 2.0);
    }

    #[test]
    fn test_negative_exploration_rejected() {
        let mut args = search_args(None);
        args.exploration = Some(-1.0);
        assert!(args.mcts_config().is_err());
    }

    #[test]
    fn test_missing_config_file_reports_path() {
        let args = search_args(Some(PathBuf::from("/nonexistent/montecarlo.toml")));
        let err = args.mcts_config().unwrap_err();
        assert!(format!("{:#}", err).contains("montecarlo.toml"));
    }
}
