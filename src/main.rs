//! Binary entrypoint: trains a small MLP on synthetic data.
//!
//! Configuration comes from `ELEMENTGRAD_*` environment variables; log
//! verbosity from `RUST_LOG` (default `info`).

use elementgrad::config;

/// Number of predictions printed after training.
const SHOW_PREDICTIONS: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::from_env()?;
    let outcome = elementgrad::run(&config)?;

    if let Some(loss) = outcome.report.final_loss() {
        println!("final loss: {loss:.6}");
    }
    println!("\n--- predictions ---");
    for p in outcome.predictions.iter().take(SHOW_PREDICTIONS) {
        println!(
            "x = {:?} | target {:+.4} | output {:+.4}",
            p.input, p.target, p.output
        );
    }
    Ok(())
}
