use std::env;

use rs_mimic_core::{MimicConfig, TextGenerator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // Usage: rs-mimic-exemple <identifier> [count]
    let mut args = env::args().skip(1);
    let identifier = match args.next() {
        Some(identifier) => identifier,
        None => {
            eprintln!("usage: rs-mimic-exemple <identifier> [count]");
            return Ok(());
        }
    };
    let count: usize = match args.next() {
        Some(raw) => raw.parse()?,
        None => 5,
    };

    // Corpus directory, model order, limits and cache size come from
    // MIMIC_* variables (defaults: ./corpus, order 3, 100 words, 1999 chars)
    let config = MimicConfig::from_env()?;
    let generator = TextGenerator::from_config(config)?;

    for i in 0..count {
        match generator.generate_text(&identifier) {
            Ok(text) if text.is_empty() => println!("{}: (no sentence start in this corpus)", i + 1),
            Ok(text) => println!("{}: {}", i + 1, text),
            Err(e) if e.is_not_found() => {
                // Unknown identifier: show what is available instead
                println!("{e}");
                println!("Available corpora:");
                for name in generator.list_corpora()? {
                    println!("  {name}");
                }
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        }
    }

    // Only the first call read the corpus, the others hit the cache
    log::info!("cached models: {:?}", generator.cached_identifiers()?);

    Ok(())
}
