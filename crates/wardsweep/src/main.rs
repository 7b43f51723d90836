use clap::Parser;
use std::path::PathBuf;
use wardsweep::{init_logging, pipeline};

#[derive(Parser, Debug)]
#[command(name = "wardsweep")]
#[command(about = "Summarize a hospital-ward simulation sweep table into reports and plots")]
struct Args {
    /// Path to the sweep table file
    #[arg(short, long, default_value = "BacteriaSim-BR2-table.csv")]
    input: PathBuf,

    /// Directory for reports, plots and the log file
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.out_dir, &args.log_level)?;

    pipeline::run(&args.input, &args.out_dir)?;

    tracing::info!("analysis complete");
    Ok(())
}
