use anyhow::Result;
use chrono::Local;
use clap::Parser;
use respdiff::presentation::cli_summary::{print_perf_summary, print_summary};
use respdiff::presentation::writers::{all_writers, write_to_file, writer_for};
use respdiff::AppConfig;
use std::path::Path;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(
    name = "respdiff",
    about = "respdiff — Compare captured API response folders and flag the differences that matter."
)]
struct Cli {
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Override the source folder from the config file.
    #[arg(long)]
    source: Option<String>,

    /// Override the target folder from the config file.
    #[arg(long)]
    target: Option<String>,

    #[arg(long)]
    dry_run: bool,

    #[arg(short, long, default_value = "all")]
    format: String,

    /// Print per-operation timings after the summary.
    #[arg(long)]
    timings: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "respdiff=info".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut cfg = AppConfig::load(&cli.config)?;
    if let Some(source) = cli.source {
        cfg.source.dir = source;
    }
    if let Some(target) = cli.target {
        cfg.target.dir = target;
    }

    let (report, perf) = respdiff::run_with_timing(&cfg).await?;

    print_summary(&report);
    if cli.timings {
        print_perf_summary(&perf);
    }

    if !cli.dry_run {
        // --- generate subdirectory per run ---
        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let subdir_name = format!("{}_{}", timestamp, report.run_id);
        let output_subdir = Path::new(&cfg.output.dir).join(&subdir_name);

        // create the directory and all parents if needed
        std::fs::create_dir_all(&output_subdir)?;

        match cli.format.as_str() {
            "all" => {
                for writer in all_writers() {
                    write_to_file(&*writer, &report, output_subdir.to_str().unwrap())?;
                }
            }
            fmt => {
                let writer =
                    writer_for(fmt).ok_or_else(|| anyhow::anyhow!("Unknown format: {}", fmt))?;
                write_to_file(&*writer, &report, output_subdir.to_str().unwrap())?;
            }
        }

        println!("Report written to {}", output_subdir.display());
    }

    if !report.all_equal {
        std::process::exit(1);
    }

    Ok(())
}
