use anyhow::{Context, Result};
use clap::Parser;
use nss_core::logging::{ExportLog, LogLevel};
use nss_export::{build_lookup_registry, run, Config};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "nssport", about = "Export CHR, palette, nametable and bitmap data from NEXXT session files")]
struct Args {
    /// Path to the JSON export config
    #[arg(default_value = "config.json")]
    config: PathBuf,

    /// Verbosity: off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the parsed config as JSON and exit without exporting
    #[arg(long, default_value_t = false)]
    print_config: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = LogLevel::from_str(&args.log_level)
        .with_context(|| format!("unknown log level `{}`", args.log_level))?;

    env_logger::Builder::new()
        .filter_level(level.as_level_filter())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = Config::load(&args.config)
        .with_context(|| format!("loading config {}", args.config.display()))?;

    if args.print_config {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let sink = ExportLog::new(config.log_config.echo(), level);
    let lookups = build_lookup_registry(&config.rgb_lookup_tables, &sink);
    let summary = run(&config, &lookups, &sink);

    if let Some(log_file) = config.log_config.log_file() {
        // A log file failure is reported but does not change the exit status.
        if let Err(e) = sink.write_log_file(Path::new(log_file)) {
            log::error!("unable to write log file {}: {}", log_file, e);
        }
    }

    println!(
        "Export complete: {} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    Ok(())
}
