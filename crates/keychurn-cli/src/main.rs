use clap::Parser;
use keychurn::GeneratorConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keychurn distribution inspector — draw recency-skewed indices and
/// report how the hot end of the keyspace behaves.
#[derive(Parser)]
#[command(name = "keychurn-cli")]
struct Args {
    /// Optional TOML config file; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of pre-loaded records
    #[arg(long)]
    records: Option<u64>,

    /// Zipfian skew exponent
    #[arg(long)]
    skew: Option<f64>,

    /// Number of draws
    #[arg(long, default_value_t = 10_000)]
    draws: u64,

    /// RNG seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Insert a new record every N draws (0 = population stays fixed)
    #[arg(long, default_value_t = 0)]
    insert_every: u64,

    /// Print every drawn index instead of the summary
    #[arg(long)]
    raw: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    if let Some(records) = args.records {
        config.initial_records = records;
    } else if args.config.is_none() {
        config.initial_records = 1_000;
    }
    if let Some(skew) = args.skew {
        config.skew = skew;
    }

    let (counter, sampler) = config.build()?;

    tracing::info!(
        records = config.initial_records,
        skew = config.skew,
        draws = args.draws,
        insert_every = args.insert_every,
        "drawing"
    );

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut counts: Vec<u64> = Vec::new();
    for i in 0..args.draws {
        if args.insert_every > 0 && i > 0 && i % args.insert_every == 0 {
            counter.advance();
        }
        let index = sampler.next_with(&mut rng)?;
        if args.raw {
            println!("{index}");
        } else {
            let index = index as usize;
            if index >= counts.len() {
                counts.resize(index + 1, 0);
            }
            counts[index] += 1;
        }
    }

    if args.raw {
        return Ok(());
    }

    let Some(last) = counter.last() else {
        return Ok(());
    };
    println!(
        "population {} (grew by {}), {} draws, skew {}",
        counter.records(),
        counter.records() - config.initial_records,
        args.draws,
        config.skew,
    );
    println!("{:>10}  {:>4}  {:>9}  {:>9}", "index", "age", "observed", "expected");
    for age in 0..=last.min(9) {
        let index = (last - age) as usize;
        let observed = counts.get(index).copied().unwrap_or(0) as f64 / args.draws as f64;
        let expected = sampler.expected_frequency(age)?;
        println!("{index:>10}  {age:>4}  {observed:>8.4}%  {expected:>8.4}%",
            observed = observed * 100.0,
            expected = expected * 100.0,
        );
    }

    // Share of draws that landed outside the ten newest records.
    let tail: u64 = counts
        .iter()
        .enumerate()
        .filter(|(i, _)| (*i as u64) + 10 <= last)
        .map(|(_, c)| *c)
        .sum();
    println!(
        "older than the 10 newest: {:.4}% of draws",
        tail as f64 / args.draws as f64 * 100.0
    );

    Ok(())
}
