use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::EnvFilter;
use wordgen_core::model::generator::{BackoffGenerator, load_or_train};

/// Generates pronounceable words from character-level Markov chain models.
///
/// Each corpus file (one word per line) is an independent family. Models are
/// cached next to their corpus, one file per order, and reloaded on the next
/// run instead of retraining.
#[derive(Parser, Debug)]
#[command(name = "wordgen", version)]
struct Args {
    /// Corpus files, one family each
    #[arg(required = true)]
    corpora: Vec<PathBuf>,

    /// Chain depth of the highest-order model
    #[arg(short, long, default_value_t = 3)]
    order: usize,

    /// Weight added to a transition count per observation
    #[arg(short, long, default_value_t = 200)]
    gain: u32,

    /// Minimum emitted word length
    #[arg(long, default_value_t = 6)]
    min: usize,

    /// Maximum emitted word length
    #[arg(long, default_value_t = 12)]
    max: usize,

    /// Number of output lines, one word per family on each
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.order >= 1, "order must be at least 1");
    anyhow::ensure!(args.gain >= 1, "gain must be at least 1");
    anyhow::ensure!(
        args.min <= args.max,
        "minimum length {} exceeds maximum length {}",
        args.min,
        args.max
    );

    let mut generators = Vec::with_capacity(args.corpora.len());
    for (i, path) in args.corpora.iter().enumerate() {
        let models = load_or_train(path, args.order, args.gain)
            .with_context(|| format!("loading models for {}", path.display()))?;
        let generator = match args.seed {
            // One stream per family, offset so families differ
            Some(seed) => BackoffGenerator::with_rng(models, StdRng::seed_from_u64(seed.wrapping_add(i as u64))),
            None => BackoffGenerator::new(models),
        }?;
        generators.push(generator);
    }

    for _ in 0..args.count {
        let words = generators
            .iter_mut()
            .map(|generator| generator.generate_word(args.min, args.max))
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", words.join(" "));
    }

    Ok(())
}
