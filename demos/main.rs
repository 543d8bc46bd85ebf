use seqt_rs::{Seqt, SeqtConfig};
use std::env;
use std::fs;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Feeds a file (or a built-in sample) through the engine and prints every
/// tracked sequence.
///
/// Usage: cargo run --example main [filename]
fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seqt_rs=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = env::args().collect();

    let text = match args.len() {
        1 => "blahblahblahblah".to_string(),
        2 => fs::read_to_string(&args[1]).unwrap_or_else(|e| {
            eprintln!("Cannot read \"{}\": {}", args[1], e);
            std::process::exit(1);
        }),
        _ => {
            eprintln!("Usage: {} [filename]", args[0]);
            std::process::exit(1);
        }
    };

    // the built-in sample is short, so admit anything that repeats
    let config = if args.len() == 1 {
        SeqtConfig::new().with_sigma(0.0).with_min_occurrences(2)
    } else {
        SeqtConfig::default()
    };

    let mut seqt = Seqt::with_config(config).unwrap_or_else(|e| {
        eprintln!("{}", e);
        std::process::exit(1);
    });

    for (count, c) in text.chars().enumerate() {
        if let Err(e) = seqt.ingest(c) {
            eprintln!("Stopped at token {}: {}", count, e);
            std::process::exit(1);
        }

        // Print progress every 100,000 tokens
        if (count + 1) % 100_000 == 0 {
            println!("{}", count + 1);
        }
    }

    print!("{}", seqt);

    let stats = seqt.stats();

    println!("\n=== Statistics ===");
    println!("Tokens read: {}", stats.characters_read);
    println!("Atoms tracked: {}", stats.atoms);
    println!("Composites tracked: {}", stats.composites);
    println!("Composites admitted: {}", stats.admitted_total);
    println!("Eviction passes: {}", stats.evictions);
    println!("Rows evicted: {}", stats.evicted_total);
}
