use anyhow::Context;
use clap::{Parser, Subcommand};
use dinex_core::RecommendQuery;
use dinex_similarity::{Recommendation, Recommender};
use dinex_storage::{load_recommender, prepare, StorageError};
use std::path::{Path, PathBuf};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Restaurant recommendations by filter and similarity
#[derive(Parser, Debug)]
#[command(name = "dinex")]
#[command(about = "Find restaurants by city, area, cuisine and rating", long_about = None)]
struct Args {
    /// Directory holding the prepared artifacts
    #[arg(short, long, global = true, env = "DINEX_ARTIFACTS_DIR", default_value = "./artifacts")]
    artifacts_dir: PathBuf,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clean a raw export, fit the encoder and write the artifact bundle
    Prepare {
        /// Raw restaurant export (CSV)
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Recommend restaurants
    Recommend(RecommendArgs),

    /// List the cities, areas and cuisines a query can use
    Options {
        /// Also list areas and the cost range for this city
        #[arg(long)]
        city: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
struct RecommendArgs {
    #[arg(long)]
    city: String,

    #[arg(long)]
    area: String,

    #[arg(long)]
    cuisine: String,

    /// Minimum rating, inclusive
    #[arg(long, default_value_t = 4.0)]
    min_rating: f64,

    /// Preferred cost for two [default: cheapest in the city]
    #[arg(long)]
    cost: Option<f64>,

    /// Number of recommendations
    #[arg(short, default_value_t = 5)]
    k: usize,

    /// Print JSON instead of text
    #[arg(long)]
    json: bool,

    /// Include per-feature score breakdown
    #[arg(long)]
    explain: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Prepare { input } => run_prepare(&input, &args.artifacts_dir),
        Command::Recommend(opts) => {
            let recommender = load(&args.artifacts_dir)?;
            run_recommend(&recommender, opts)
        }
        Command::Options { city } => {
            let recommender = load(&args.artifacts_dir)?;
            run_options(&recommender, city.as_deref());
            Ok(())
        }
    }
}

fn load(dir: &Path) -> anyhow::Result<Recommender> {
    match load_recommender(dir) {
        Ok(recommender) => Ok(recommender),
        Err(e @ StorageError::MissingFile { .. }) => {
            error!("{}", e);
            anyhow::bail!("{e}; run `dinex prepare --input <raw.csv>` first")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load artifacts from {:?}", dir)),
    }
}

fn run_prepare(input: &Path, dir: &Path) -> anyhow::Result<()> {
    info!("Preparing artifacts from {:?}", input);
    let outcome = prepare(input, dir).with_context(|| format!("Failed to prepare {:?}", input))?;

    println!(
        "Prepared {} restaurants ({} raw rows, {} duplicates, {} incomplete) into {}",
        outcome.manifest.row_count,
        outcome.raw_rows,
        outcome.duplicates_dropped,
        outcome.incomplete_dropped,
        dir.display()
    );
    println!("Run id: {}", outcome.manifest.run_id);
    Ok(())
}

fn run_recommend(recommender: &Recommender, opts: RecommendArgs) -> anyhow::Result<()> {
    let cost = opts
        .cost
        .or_else(|| recommender.index().cost_range(&opts.city).map(|(lo, _)| lo))
        .unwrap_or(0.0);

    let query = RecommendQuery::builder()
        .city(opts.city)
        .area(opts.area)
        .cuisine(opts.cuisine)
        .min_rating(opts.min_rating)
        .cost(cost)
        .build()?;

    if opts.explain {
        let response = recommender.recommend_explained(&query, opts.k)?;
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }
        if response.result.is_empty() {
            print_no_matches();
            return Ok(());
        }
        for item in &response.result {
            let rec = Recommendation {
                row: item.row,
                restaurant: item.restaurant.clone(),
                score: item.score,
            };
            print_card(&rec);
            let parts: Vec<String> = item
                .explain
                .iter()
                .map(|(name, share)| format!("{}={:.3}", name, share))
                .collect();
            println!("  Breakdown: {}", parts.join(", "));
            println!();
        }
        println!(
            "{} of {} candidates shown, best score {:.3}",
            response.stats.results_count, response.stats.candidates_count, response.stats.best_score
        );
        return Ok(());
    }

    let results = recommender.recommend(&query, opts.k)?;
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    if results.is_empty() {
        print_no_matches();
        return Ok(());
    }

    println!("Top {} recommended restaurants:", results.len());
    println!();
    for rec in &results {
        print_card(rec);
        println!();
    }
    Ok(())
}

fn run_options(recommender: &Recommender, city: Option<&str>) {
    let index = recommender.index();

    println!("Cities: {}", index.cities().join(" | "));
    println!("Cuisines: {}", index.cuisines().join(" | "));

    if let Some(city) = city {
        let areas = index.areas(city);
        if areas.is_empty() {
            println!("No restaurants in {}", city);
            return;
        }
        println!("Areas in {}: {}", city, areas.join(" | "));
        if let Some((lo, hi)) = index.cost_range(city) {
            println!("Cost for two in {}: ₹{} - ₹{}", city, lo, hi);
        }
    }
}

fn print_card(rec: &Recommendation) {
    let r = &rec.restaurant;
    println!("{}  (score {:.3})", r.name, rec.score);
    println!("  Cuisine: {}", r.cuisine);
    println!("  Location: {}, {}", r.area, r.city);
    println!("  Rating: {} ({} ratings)", r.rating, r.rating_count);
    println!("  Cost for two: ₹{}", r.cost);
}

fn print_no_matches() {
    println!("Sorry, no restaurants match your criteria. Try a different combination.");
}
