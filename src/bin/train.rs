use anyhow::Context;
use clap::Parser;
use milkgrade::boost::BoostParams;
use milkgrade::{TrainConfig, logging, train};
use std::path::PathBuf;
use tracing::info;

/// Train the milk quality classifier and write the model artifact.
#[derive(Parser, Debug)]
#[command(name = "milkgrade-train", version)]
struct Cli {
    /// CSV with pH, temperature, taste, odor, fat, turbidity, colour, grade
    #[arg(long, env = "MILKGRADE_DATA", default_value = "milk_quality_data.csv")]
    data: PathBuf,

    /// Where to write the artifact
    #[arg(long, env = "MILKGRADE_ARTIFACT", default_value = "milk_model.msgpack")]
    output: PathBuf,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_ratio: f64,

    /// Seed for the split and for column subsampling
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    logging::init();
    let cli = Cli::parse();

    let config = TrainConfig {
        data_path: cli.data,
        test_ratio: cli.test_ratio,
        seed: cli.seed,
        params: BoostParams::new().seed(cli.seed),
    };

    info!(data = %config.data_path.display(), "🧠 Training milk quality model");
    let artifact = train::train(&config)
        .with_context(|| format!("training on {} failed", config.data_path.display()))?;

    println!("--- Final Classification Results ---");
    println!("Accuracy Score: {:.4}", artifact.metrics.accuracy);
    for fi in &artifact.importances {
        println!("{:>12} | {:.4}", fi.name, fi.importance);
    }

    println!("💾 Saving model to {:?}", cli.output);
    artifact
        .save(&cli.output)
        .with_context(|| format!("could not save artifact to {}", cli.output.display()))?;
    println!("✅ Milk model and metrics saved to {:?}", cli.output);
    Ok(())
}
