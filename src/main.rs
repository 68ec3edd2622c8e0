use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::process;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use wine2weship::cli::Args;
use wine2weship::processor::{reader, transform, writer};
use wine2weship::{FieldMappingTable, ShipmentOutput};

fn main() {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args) {
        eprintln!("Failed to initialise logging: {}", error);
    }

    match run(&args) {
        Ok(()) => process::exit(0),
        Err(error) => {
            eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
            process::exit(1);
        }
    }
}

fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wine2weship={}", args.get_log_level())));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .with_timer(fmt::time::uptime())
                .compact(),
        )
        .try_init()
        .context("tracing subscriber already installed")?;
    Ok(())
}

fn spinner(args: &Args, message: &str) -> Option<ProgressBar> {
    if args.quiet {
        return None;
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();
    let config = args.to_config().context("Invalid options")?;
    let output_path = args.get_output_path();
    debug!("Command line arguments: {:?}", args);

    let pb = spinner(args, "Reading input...");
    let schema = reader::read_template(&args.template, args.delimiter)
        .with_context(|| format!("Failed to load template {}", args.template.display()))?;
    let input = reader::read_source(&args.input_path, args.delimiter)
        .with_context(|| format!("Failed to read export {}", args.input_path.display()))?;

    if let Some(pb) = &pb {
        pb.set_message(format!("Transforming {} rows...", input.height()));
    }
    let output = transform(&input, &schema, FieldMappingTable::weship(), &config)
        .context("Transform failed")?;

    if !args.dry_run {
        if let Some(pb) = &pb {
            pb.set_message(format!("Writing {}...", output_path.display()));
        }
        writer::write_csv(&output.table, &output_path)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        info!("Wrote {}", output_path.display());
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    if args.preview > 0 && !output.table.is_empty() {
        print_preview(&output, args.preview)?;
    }
    print_summary(args, &output, start_time.elapsed());
    Ok(())
}

fn print_preview(output: &ShipmentOutput, rows: usize) -> Result<()> {
    let df = output.table.to_dataframe()?;
    println!("{}", "Preview".bright_yellow());
    println!("{}", df.head(Some(rows)));
    Ok(())
}

fn print_summary(args: &Args, output: &ShipmentOutput, elapsed: Duration) {
    let stats = &output.stats;

    println!("\n{}", "Processing Summary".bright_green().bold());
    println!(
        "  {} {:.2}s",
        "Time elapsed:".bright_cyan(),
        elapsed.as_secs_f64()
    );
    println!(
        "  {} {}",
        "Rows read:".bright_cyan(),
        stats.rows_read.to_string().bright_white()
    );
    println!(
        "  {} {} ({:.1}%)",
        "Rows kept:".bright_cyan(),
        stats.rows_kept.to_string().bright_white().bold(),
        stats.keep_rate()
    );
    println!(
        "  {} {} ({} bottles)",
        "Packages:".bright_cyan(),
        stats.packages.to_string().bright_white().bold(),
        stats.total_units
    );
    if !stats.synthesized_columns.is_empty() {
        println!(
            "  {} {}",
            "Added columns:".bright_yellow(),
            stats.synthesized_columns.join(", ")
        );
    }
    if stats.unresolved_states > 0 {
        println!(
            "  {} {}",
            "Rows without state:".bright_red(),
            stats.unresolved_states.to_string().bright_red().bold()
        );
    }
    if stats.zero_quantity_rows > 0 {
        println!(
            "  {} {}",
            "Rows without quantity:".bright_red(),
            stats.zero_quantity_rows.to_string().bright_red().bold()
        );
    }
    if args.dry_run {
        println!("  {}", "Dry run - no file written".bright_yellow());
    } else {
        println!(
            "  {} {}",
            "Output:".bright_cyan(),
            args.get_output_path().display()
        );
    }
}
