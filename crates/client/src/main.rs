//! `solar-sim`: runs the scripted sandbox scenario headlessly.
//!
//! ```bash
//! SOLAR_SEED=7 SOLAR_TICKS=3000 RUST_LOG=runtime=debug,sim=info cargo run -p solar-client
//! ```

use anyhow::Result;
use solar_client::{SimConfig, logging, run_scenario};

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = logging::setup_logging(&config)?;

    tracing::info!(
        seed = config.game_seed,
        ticks = config.ticks,
        save_dir = %config.save_dir.display(),
        "starting solar sandbox"
    );

    let report = run_scenario(&config)?;

    println!("tick        {}", report.tick);
    println!("hero alive  {}", report.hero_alive);
    println!(
        "charge      {}",
        report
            .charge
            .map_or_else(|| "-".to_owned(), |charge| format!("{charge:.2}"))
    );
    println!("fires       {}", report.fires);
    println!("revealed    {}", report.revealed);
    println!("explosions  {}", report.explosions);
    for (name, count) in &report.events {
        println!("event       {name:<18} {count}");
    }
    Ok(())
}
