//! Unencoded vs [[4,2,2]]-encoded Grover search on the Helmi simulator
//!
//! Runs the configured sweep, then its counterpart (canonical plan, no
//! syndrome) on the same backend, and writes a side-by-side heatmap plus a
//! bar graph.
//!
//! Usage:
//! ```bash
//! cargo run --example helmi_sweep --release
//! cargo run --example helmi_sweep --release -- sweep.json
//! RUST_LOG=info cargo run --example helmi_sweep
//! ```

use anyhow::Context;
use grover_experiment::prelude::*;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║        Grover Search on Helmi - [[4,2,2]] Comparison         ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let config = match std::env::args().nth(1) {
        Some(path) => ExperimentConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path))?,
        None => ExperimentConfig::helmi(SweepMode::Unencoded).with_seed(2024),
    };
    println!("Config: {}\n", config);

    let first = ExperimentRunner::new(config.clone()).run().context("first sweep")?;
    let second = ExperimentRunner::new(config.counterpart())
        .run()
        .context("second sweep")?;

    for outcome in [&first, &second] {
        println!("{}", outcome.title);
        for (state, value) in outcome.accuracy.iter() {
            println!("  {} → {:.3}", state, value);
        }
        if let Some(post) = &outcome.post_selected {
            println!("  post-selected: {}", post);
        }
        println!();
    }

    let figures = render_comparison(&first, &second, &first.label, &config.plot_options())?;
    println!("Heatmap:   {}", figures.heatmap.display());
    println!("Bar graph: {}", figures.bar_graph.display());

    Ok(())
}
