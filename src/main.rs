mod engine;
mod error;
mod fetch;
mod notify;
mod scan;
mod source;
mod store;
mod targets;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use clap::{Parser, Subcommand};

use engine::extract;

#[derive(Parser)]
#[command(name = "otoscan", about = "Car listing scanner with mileage-based price segments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan listing pages, alert on in-budget cars and save segment averages
    Scan {
        /// Only targets whose label contains this text (repeatable)
        #[arg(short, long = "target")]
        targets: Vec<String>,
        /// JSON file with [{"label", "url", "source"?}] replacing the built-in targets
        #[arg(long)]
        targets_file: Option<PathBuf>,
        /// Directory for the per-target CSV files
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Targets scanned at the same time
        #[arg(short = 'j', long, default_value_t = scan::DEFAULT_CONCURRENCY)]
        concurrency: usize,
        /// Also print saved records as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// List configured targets
    Targets {
        #[arg(long)]
        targets_file: Option<PathBuf>,
    },
    /// Run the price/mileage extractors on a text fragment
    Extract {
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        mileage: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Scan {
            targets,
            targets_file,
            data_dir,
            concurrency,
            json,
        } => {
            let selected = targets::select(targets::load(targets_file.as_deref())?, &targets);
            if selected.is_empty() {
                println!("No targets match.");
                return Ok(());
            }
            let mut store = store::CsvStore::new(store::data_dir(data_dir.as_deref()));
            let opts = scan::ScanOptions {
                concurrency,
                date: chrono::Local::now().date_naive(),
                json,
            };
            println!("Scanning {} targets...", selected.len());
            let totals =
                scan::scan_all(selected, &opts, Arc::new(notify::ConsoleNotifier), &mut store)
                    .await?;
            totals.print();
            Ok(())
        }
        Commands::Targets { targets_file } => {
            let all = targets::load(targets_file.as_deref())?;
            println!("{:>3} | {:<28} | {:<8} | URL", "#", "Label", "Source");
            println!("{}", "-".repeat(80));
            for (i, t) in all.iter().enumerate() {
                println!(
                    "{:>3} | {:<28} | {:<8} | {}",
                    i + 1,
                    t.label,
                    t.source.to_string(),
                    truncate(&t.url, 60)
                );
            }
            Ok(())
        }
        Commands::Extract { price, mileage } => {
            if let Some(text) = price {
                match extract::parse_price(&text) {
                    Ok(p) => println!("price:   {}", p),
                    Err(e) => println!("price:   error ({})", e),
                }
            }
            if let Some(text) = mileage {
                match extract::parse_mileage(&text) {
                    Ok(m) => println!("mileage: {}", m),
                    Err(e) => println!("mileage: error ({})", e),
                }
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
