//! CLI argument definitions for fxsnap.
//!
//! # Commands
//!
//! | Command | Artifact | Description |
//! |---------|----------|-------------|
//! | `rates` | `cb-rates.json` | Scrape central-bank policy rates |
//! | `atr` | `atr-data.json` | Measure daily ATR per currency pair |
//! | `cot` | `cot-data.json` | Reduce CFTC positioning to net percentages |
//! | `all` | all three | Run the three pipelines in order |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--output-dir` | `public` | Directory receiving the artifacts (`FXSNAP_OUTPUT_DIR`) |
//! | `--attempts` | `3` | Fetch attempts per source or pair |
//! | `--retry-delay-ms` | `4000` | Fixed delay between attempts |
//! | `--pacing-ms` | `800` | Pause after each ATR pair |
//! | `--log-level` | `RUST_LOG`, else `info` | Log filter directive |
//!
//! # Examples
//!
//! ```bash
//! fxsnap all
//! FXSNAP_OUTPUT_DIR=site/data fxsnap cot --attempts 5
//! fxsnap atr --log-level fxsnap=debug
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Harvest FX reference snapshots into JSON artifacts.
#[derive(Debug, Parser)]
#[command(name = "fxsnap", author, version, about = "Harvest FX reference snapshots")]
pub struct Cli {
    /// Directory the snapshot files are written to.
    #[arg(long, global = true, env = "FXSNAP_OUTPUT_DIR", default_value = "public")]
    pub output_dir: PathBuf,

    /// Total fetch attempts, including the first one.
    #[arg(
        long,
        global = true,
        default_value_t = 3,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub attempts: u32,

    /// Fixed delay between attempts in milliseconds.
    #[arg(long, global = true, default_value_t = 4000)]
    pub retry_delay_ms: u64,

    /// Pause after each ATR pair in milliseconds.
    #[arg(long, global = true, default_value_t = 800)]
    pub pacing_ms: u64,

    /// Log filter directive, e.g. `debug` or `fxsnap=debug`. Overrides `RUST_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Scrape central-bank policy rates.
    Rates,
    /// Measure daily ATR per currency pair.
    Atr,
    /// Reduce CFTC positioning to net percentages.
    Cot,
    /// Run rates, atr and cot in that order.
    All,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_production_constants() {
        let cli = Cli::try_parse_from(["fxsnap", "rates"]).expect("parses");
        assert_eq!(cli.command, Command::Rates);
        assert_eq!(cli.attempts, 3);
        assert_eq!(cli.retry_delay_ms, 4000);
        assert_eq!(cli.pacing_ms, 800);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn global_options_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "fxsnap",
            "all",
            "--output-dir",
            "out",
            "--attempts",
            "5",
            "--retry-delay-ms",
            "0",
        ])
        .expect("parses");
        assert_eq!(cli.command, Command::All);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.attempts, 5);
        assert_eq!(cli.retry_delay_ms, 0);
    }

    #[test]
    fn zero_attempts_are_rejected() {
        assert!(Cli::try_parse_from(["fxsnap", "cot", "--attempts", "0"]).is_err());
    }
}
