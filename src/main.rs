//! Name Forge - invent names unlike anything in a reference list
//!
//! Generates candidate names and keeps only those whose phonetic and
//! orthographic similarity to every registered name stays below a threshold.

use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use name_forge::{
    corpus::append_name,
    similarity::{CompositeResult, Metric},
    BatchSampler, CandidateGenerator, CompositeScorer, ForgeConfig, GenerationStrategy, Name,
    NameGenerator, Reduction, ReferenceCorpus, SamplerMetrics, SearchOutcome, SharedCorpus,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status when no candidate fell below the threshold
const EXIT_EXHAUSTED: i32 = 2;

#[derive(Parser)]
#[command(name = "name-forge", version, about = "Invent names that look and sound unlike a reference list")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate names dissimilar from the reference corpus
    Generate(GenerateArgs),
    /// Show the full similarity breakdown between two names
    Compare {
        a: String,
        b: String,
        #[arg(long)]
        json: bool,
    },
    /// List corpus names whose similarity to QUERY is below the threshold
    Search {
        query: String,
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        column: Option<String>,
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// CSV or spreadsheet file with the registered names
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Column holding the names
    #[arg(long)]
    column: Option<String>,
    /// Acceptance threshold on the 0-100 scale
    #[arg(long)]
    threshold: Option<f64>,
    /// How corpus scores are collapsed: mean or max
    #[arg(long)]
    reduction: Option<Reduction>,
    /// Candidate source: syllable or lexical
    #[arg(long)]
    strategy: Option<GenerationStrategy>,
    /// Word list for the lexical strategy
    #[arg(long)]
    words: Option<PathBuf>,
    /// Literal prefix for the lexical strategy
    #[arg(long)]
    prefix: Option<String>,
    /// Names to generate
    #[arg(long, default_value_t = 1)]
    count: usize,
    /// Searches running at once
    #[arg(long, default_value_t = 4)]
    workers: usize,
    #[arg(long)]
    max_attempts: Option<usize>,
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Allow the generator to repeat candidates
    #[arg(long)]
    no_dedup: bool,
    /// Append accepted names to the corpus file
    #[arg(long)]
    save: bool,
    #[arg(long)]
    json: bool,
    /// Keep generating until declined
    #[arg(long)]
    interactive: bool,
}

#[tokio::main]
async fn main() {
    if let Err(e) = name_forge::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Compare { a, b, json } => run_compare(&a, &b, json),
        Command::Search {
            query,
            corpus,
            column,
            threshold,
            json,
        } => run_search(&query, &corpus, column, threshold, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(EXIT_EXHAUSTED),
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Merge CLI flags over the environment configuration
fn build_config(args: &GenerateArgs) -> anyhow::Result<ForgeConfig> {
    let mut config = ForgeConfig::from_env().context("Invalid NAME_FORGE_* environment")?;

    if let Some(path) = &args.corpus {
        config.corpus_path = Some(path.clone());
    }
    if let Some(column) = &args.column {
        config.column = column.clone();
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(threshold) = args.threshold {
        config.sampler.threshold = threshold;
    }
    if let Some(reduction) = args.reduction {
        config.sampler.reduction = reduction;
    }
    if let Some(attempts) = args.max_attempts {
        config.sampler.max_attempts = attempts;
    }
    if let Some(secs) = args.timeout_secs {
        config.sampler.max_duration = Some(Duration::from_secs(secs));
    }
    if args.no_dedup {
        config.sampler.dedup = false;
    }
    if let Some(words) = &args.words {
        config.lexical.words_path = Some(words.clone());
    }
    if let Some(prefix) = &args.prefix {
        config.lexical.prefix = prefix.clone();
    }

    config.sampler.validate()?;
    config.lexical.validate()?;
    Ok(config)
}

/// Load the corpus, or continue with an empty one
fn load_corpus(path: Option<&Path>, column: &str, quiet: bool) -> ReferenceCorpus {
    let Some(path) = path else {
        if !quiet {
            println!("⚠️  No reference corpus configured; every well-formed name will be accepted");
        }
        return ReferenceCorpus::empty();
    };

    match ReferenceCorpus::load(path, column) {
        Ok(corpus) => {
            if !quiet {
                println!("📚 Loaded {} registered names from {}", corpus.len(), path.display());
            }
            corpus
        }
        Err(e) => {
            tracing::warn!(error = %e, "Continuing with an empty corpus");
            eprintln!("{}", e.user_message());
            ReferenceCorpus::empty()
        }
    }
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<bool> {
    let config = build_config(&args)?;
    let quiet = args.json;

    if !quiet {
        println!("🔥 Name Forge");
        println!("═════════════");
    }

    let corpus = SharedCorpus::new(load_corpus(config.corpus_path.as_deref(), &config.column, quiet));
    let generator = CandidateGenerator::from_strategy(config.strategy, &config.lexical)?;
    if !quiet {
        println!(
            "🎲 Strategy: {} | threshold < {} ({})",
            generator.strategy(),
            config.sampler.threshold,
            config.sampler.reduction
        );
        println!();
    }

    let batch = BatchSampler::new(generator, config.sampler.clone(), args.workers)?;
    let save_to = if args.save {
        if config.corpus_path.is_none() {
            eprintln!("⚠️  --save needs a corpus file; accepted names will not be stored");
        }
        config.corpus_path.as_deref()
    } else {
        None
    };

    let mut any_accepted = false;
    loop {
        let spinner = (!quiet).then(|| search_spinner(args.count));
        let report = batch.run(&corpus, args.count).await?;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        any_accepted |= report.accepted_count() > 0;

        if let Some(path) = save_to {
            save_accepted(path, &config.column, &report.outcomes, quiet);
        }

        if quiet {
            let output = serde_json::json!({
                "outcomes": report.outcomes,
                "metrics": report.metrics,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            display_outcomes(&report.outcomes);
            display_metrics(&report.metrics, corpus.len());
        }

        if !args.interactive {
            break;
        }
        let again = inquire::Confirm::new("Generate another?")
            .with_default(true)
            .prompt()
            .unwrap_or(false);
        if !again {
            break;
        }
        println!();
    }

    Ok(any_accepted)
}

fn search_spinner(count: usize) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg} [{elapsed}]") {
        spinner.set_style(style);
    }
    spinner.set_message(format!("🔍 Searching for {} unique name(s)...", count));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

fn save_accepted(path: &Path, column: &str, outcomes: &[SearchOutcome], quiet: bool) {
    for found in outcomes.iter().filter_map(SearchOutcome::accepted) {
        match append_name(path, column, &found.name) {
            Ok(()) => {
                if !quiet {
                    println!("💾 Saved {} to {}", found.name, path.display());
                }
            }
            Err(e) => {
                tracing::warn!(name = %found.name, error = %e, "Accepted name was not saved");
                eprintln!("{}", e.user_message());
            }
        }
    }
}

fn display_outcomes(outcomes: &[SearchOutcome]) {
    for (i, outcome) in outcomes.iter().enumerate() {
        match outcome {
            SearchOutcome::Accepted(found) => {
                match found.score {
                    Some(score) => println!(
                        "{:2}. ✅ {:<16} {} similarity {:.1} after {} attempt(s)",
                        i + 1,
                        found.name,
                        found.reduction,
                        score,
                        found.attempts
                    ),
                    None => println!("{:2}. ✅ {:<16} (empty corpus)", i + 1, found.name),
                }
                if let (Some(closest), Some(closest_score)) = (&found.closest, found.closest_score) {
                    println!("    🔗 Closest: {} ({:.1})", closest, closest_score);
                }
                if let Some(justification) = &found.justification {
                    for op in justification {
                        println!("       • {}", op);
                    }
                }
            }
            SearchOutcome::Exhausted {
                attempts,
                elapsed,
                best,
            } => {
                print!(
                    "{:2}. ❌ No name below the threshold after {} attempt(s) in {:.2}s",
                    i + 1,
                    attempts,
                    elapsed.as_secs_f32()
                );
                if let Some(best) = best {
                    print!(" (best: {} at {:.1})", best.name, best.score);
                }
                println!();
            }
        }
    }
    println!();
}

fn display_metrics(metrics: &SamplerMetrics, corpus_size: usize) {
    println!("📈 Summary:");
    println!("   📊 Attempts: {}", metrics.attempts);
    println!("   🔁 Too similar: {}", metrics.rejected_similar);
    println!("   ♻️  Duplicates: {}", metrics.rejected_duplicate);
    if metrics.rejected_malformed > 0 {
        println!("   ⚠️  Malformed: {}", metrics.rejected_malformed);
    }
    println!("   ✅ Acceptance rate: {:.2}%", metrics.acceptance_rate() * 100.0);
    println!("   📚 Corpus size: {}", corpus_size);
}

fn run_compare(a: &str, b: &str, json: bool) -> anyhow::Result<bool> {
    let a = Name::new(a)?;
    let b = Name::new(b)?;
    let result = CompositeScorer::new().detailed(&a, &b);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_comparison(&result);
    }
    Ok(true)
}

fn display_comparison(result: &CompositeResult) {
    println!("⚖️  {} vs {}", result.candidate, result.reference);
    println!("─────────────────────────");
    for metric in Metric::ALL {
        println!("   {:<12} {:>6.1}", metric.name(), result.breakdown.get(metric));
    }
    println!();
    println!("   🔊 Phonetic:     {:>6.1}", result.phonetic);
    println!("   🔤 Orthographic: {:>6.1}", result.orthographic);
    println!("   📊 Overall:      {:>6.1}", result.overall);

    if let Some(justification) = &result.justification {
        println!();
        if justification.is_empty() {
            println!("✏️  Identical spelling");
        } else {
            println!("✏️  {} edit(s):", justification.len());
            for op in justification {
                println!("   • {}", op);
            }
        }
    }
}

fn run_search(
    query: &str,
    corpus_path: &Path,
    column: Option<String>,
    threshold: Option<f64>,
    json: bool,
) -> anyhow::Result<bool> {
    let config = ForgeConfig::from_env().context("Invalid NAME_FORGE_* environment")?;
    let column = column.unwrap_or(config.column);
    let threshold = threshold.unwrap_or(config.sampler.threshold);
    let query = Name::new(query)?;

    let corpus = ReferenceCorpus::load(corpus_path, &column)
        .with_context(|| format!("Cannot search {}", corpus_path.display()))?;
    let matches = CompositeScorer::new().dissimilar_names(&query, corpus.profiles(), threshold);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        println!(
            "🔍 {} of {} names score below {} against {}:",
            matches.len(),
            corpus.len(),
            threshold,
            query
        );
        for name in &matches {
            println!("   • {}", name);
        }
    }
    Ok(true)
}
