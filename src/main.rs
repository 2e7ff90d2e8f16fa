//! Sentiscope CLI
//!
//! Command-line dashboard for Sentiscope:
//! - Analyze a text, a CSV file, or a Reddit/Twitter search
//! - Review and clear the recent analyses
//! - Show the sentiment overview
//! - Export history and generate a config file

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use sentiscope::analysis::{Analyzer, SharedHistory};
use sentiscope::config::{generate_default_config, Config};
use sentiscope::history::{export, ExportFormat, RecentHistoryStore, Sentiment, Source};
use sentiscope::overview::{format_relative_time, Overview, SentimentCounts};
use sentiscope::predict::{LabeledText, PredictionClient};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Parser)]
#[command(name = "sentiscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Sentiment analysis dashboard for text, CSV batches and social media")]
#[command(long_about = "Sentiscope sends text to a sentiment prediction service and keeps the ten most recent results.\nAnalyze single texts, CSV files, or Reddit and Twitter searches, then review the overview.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search the usual locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Prediction service URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory holding the recent analyses
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Output format [default: table, json for export]
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a single text
    Analyze {
        /// Text to analyze
        text: String,
    },

    /// Analyze every row of a CSV file's `text` column
    Batch {
        /// Path to CSV file
        path: PathBuf,
    },

    /// Analyze Reddit posts matching a query
    Reddit {
        /// Search query
        query: String,
        /// Number of posts to fetch
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Analyze tweets matching a query
    Twitter {
        /// Search query
        query: String,
        /// Number of tweets to fetch
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show the recent analyses
    History,

    /// Show the sentiment distribution of the recent analyses
    Overview,

    /// Clear the recent analyses
    Clear,

    /// Export the recent analyses
    Export {
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, source) = match &cli.config {
        Some(path) => (Config::load_with_env(path)?, Some(path.clone())),
        None => Config::load_default()?,
    };
    if let Some(url) = &cli.api_url {
        config.prediction.base_url = url.clone();
    }
    if let Some(dir) = &cli.data_dir {
        config.history.data_dir = dir.clone();
    }

    sentiscope::logging::init(&config.logging);
    if let Some(path) = &source {
        tracing::debug!("Loaded config from {:?}", path);
    }
    let format = cli.format.unwrap_or(OutputFormat::Table);
    check_format(&cli.command, format)?;

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(path, &content)?;
                println!("Config written to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let history: SharedHistory = Arc::new(RwLock::new(RecentHistoryStore::open(
        config.history.storage(),
    )));
    let client = PredictionClient::new(config.prediction.client_config())?;
    let analyzer = Analyzer::new(Arc::new(client), Arc::clone(&history));
    let default_limit = config.prediction.default_limit;

    match cli.command {
        Commands::Analyze { text } => {
            let outcome = analyzer.analyze_single(&text).await?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Sentiment: {}", outcome.prediction.sentiment);
                if !outcome.prediction.probabilities.is_empty() {
                    println!();
                    println!("{:<12} {:>8}", "Label", "Score");
                    println!("{}", "-".repeat(21));
                    for (label, p) in Sentiment::ALL.iter().zip(&outcome.prediction.probabilities) {
                        println!("{:<12} {:>7.1}%", label.label(), p * 100.0);
                    }
                }
            }
        }

        Commands::Batch { path } => {
            if !path.exists() {
                anyhow::bail!("File not found: {:?}", path);
            }

            let outcome = analyzer.analyze_batch_file(&path).await?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("Analyzed {} entries from {:?}", outcome.items.len(), path);
                println!();
                print_counts(&outcome.counts);
                println!();
                print_labeled(&outcome.items);
                if outcome.recorded < outcome.items.len() {
                    println!();
                    println!(
                        "(First {} entries added to recent analyses)",
                        outcome.recorded
                    );
                }
            }
        }

        Commands::Reddit { query, limit } => {
            let outcome = analyzer
                .analyze_reddit(&query, limit.unwrap_or(default_limit))
                .await?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.posts.is_empty() {
                println!("No Reddit posts found for \"{}\".", outcome.query);
            } else {
                println!(
                    "Analyzed {} Reddit posts for \"{}\"",
                    outcome.posts.len(),
                    outcome.query
                );
                println!();
                print_counts(&outcome.counts);
                println!();
                println!("{:<12} {:>6}  {:<14} {}", "Sentiment", "Score", "Subreddit", "Title");
                println!("{}", "-".repeat(80));
                for post in &outcome.posts {
                    println!(
                        "{:<12} {:>6}  {:<14} {}",
                        post.sentiment.label(),
                        post.score,
                        post.subreddit.as_deref().unwrap_or("-"),
                        truncate(&post.title, 60)
                    );
                }
            }
        }

        Commands::Twitter { query, limit } => {
            let outcome = analyzer
                .analyze_twitter(&query, limit.unwrap_or(default_limit))
                .await?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else if outcome.tweets.is_empty() {
                println!("No tweets found for \"{}\".", outcome.query);
            } else {
                println!(
                    "Analyzed {} tweets for \"{}\"",
                    outcome.tweets.len(),
                    outcome.query
                );
                println!();
                print_counts(&outcome.counts);
                println!();
                print_labeled(&outcome.tweets);
            }
        }

        Commands::History => {
            let history = history.read().await;

            match format {
                OutputFormat::Json => print!("{}", export(history.list(), ExportFormat::Json)?),
                OutputFormat::Csv => print!("{}", export(history.list(), ExportFormat::Csv)?),
                OutputFormat::Table => {
                    if history.is_empty() {
                        println!("No recent analyses yet. Try analyzing some text!");
                        return Ok(());
                    }

                    let now = Utc::now();
                    println!("{:<8} {:<11} {:<16} {}", "Source", "Sentiment", "When", "Text");
                    println!("{}", "-".repeat(80));
                    for record in history.list() {
                        println!(
                            "{:<8} {:<11} {:<16} {}",
                            record.source,
                            record.sentiment,
                            format_relative_time(record.timestamp, now),
                            truncate(&record.text, 50)
                        );
                    }
                }
            }
        }

        Commands::Overview => {
            let history = history.read().await;
            let overview = Overview::from_records(history.list());

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else if overview.is_empty() {
                println!("No data available yet. Try analyzing some text!");
            } else {
                println!("Distribution ({} analyses)", overview.total);
                println!();
                print_counts(&overview.distribution);
                println!();
                println!("By source");
                println!();
                print!("{:<8}", "");
                for label in Sentiment::ALL {
                    print!(" {:>10}", label.label());
                }
                println!();
                for source in Source::ALL {
                    print!("{:<8}", source.as_str());
                    for label in Sentiment::ALL {
                        print!(" {:>10}", overview.by_source.get(source).get(label));
                    }
                    println!();
                }
            }
        }

        Commands::Clear => {
            history.write().await.clear()?;
            println!("Recent analyses cleared.");
        }

        Commands::Export { output } => {
            let format = export_format(cli.format)?;
            let data = export(history.read().await.list(), format)?;

            match output {
                Some(path) => {
                    std::fs::write(&path, &data)?;
                    println!("Exported to {:?}", path);
                }
                None => print!("{}", data),
            }
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// CSV output only exists for the history listing and export
fn check_format(command: &Commands, format: OutputFormat) -> anyhow::Result<()> {
    let csv_ok = matches!(
        command,
        Commands::History | Commands::Export { .. } | Commands::Config { .. }
    );
    if format == OutputFormat::Csv && !csv_ok {
        anyhow::bail!("--format csv is only supported by `history` and `export`");
    }
    Ok(())
}

/// Export defaults to JSON; a table is not an export format
fn export_format(format: Option<OutputFormat>) -> anyhow::Result<ExportFormat> {
    match format {
        None | Some(OutputFormat::Json) => Ok(ExportFormat::Json),
        Some(OutputFormat::Csv) => Ok(ExportFormat::Csv),
        Some(OutputFormat::Table) => anyhow::bail!("export supports --format json or csv"),
    }
}

/// Distribution as horizontal bars with counts and percentages
fn print_counts(counts: &SentimentCounts) {
    const WIDTH: usize = 30;
    let max = counts.as_array().into_iter().max().unwrap_or(0).max(1);

    for label in Sentiment::ALL {
        let count = counts.get(label);
        let bar = "#".repeat(count * WIDTH / max);
        println!(
            "{:<11} {:<30} {:>4} ({:.1}%)",
            label.label(),
            bar,
            count,
            counts.percentage(label)
        );
    }
}

fn print_labeled(items: &[LabeledText]) {
    println!("{:<12} {}", "Sentiment", "Text");
    println!("{}", "-".repeat(80));
    for item in items {
        println!("{:<12} {}", item.sentiment.label(), truncate(&item.text, 66));
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    let single_line = s.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        single_line
    } else {
        let cut: String = single_line.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_format_rejected() {
        assert!(Cli::try_parse_from(["sentiscope", "--format", "xml", "history"]).is_err());
    }

    #[test]
    fn test_format_parsed_as_enum() {
        let cli = Cli::try_parse_from(["sentiscope", "history", "-f", "csv"]).unwrap();
        assert_eq!(cli.format, Some(OutputFormat::Csv));

        let cli = Cli::try_parse_from(["sentiscope", "overview"]).unwrap();
        assert_eq!(cli.format, None);
    }

    #[test]
    fn test_export_format() {
        assert_eq!(export_format(None).unwrap(), ExportFormat::Json);
        assert_eq!(export_format(Some(OutputFormat::Csv)).unwrap(), ExportFormat::Csv);
        assert!(export_format(Some(OutputFormat::Table)).is_err());
    }

    #[test]
    fn test_csv_only_for_history_and_export() {
        assert!(check_format(&Commands::History, OutputFormat::Csv).is_ok());
        assert!(check_format(&Commands::Export { output: None }, OutputFormat::Csv).is_ok());
        assert!(check_format(&Commands::Overview, OutputFormat::Csv).is_err());
        assert!(check_format(&Commands::Overview, OutputFormat::Json).is_ok());
    }
}
