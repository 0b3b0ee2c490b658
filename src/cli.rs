use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "tempwatch")]
#[command(about = "Temperature dashboard over a partitioned reading store")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Reading store database path
    #[arg(long, global = true, default_value = "tempwatch.db")]
    pub db: PathBuf,

    /// Chart window as <number><unit>, e.g. 1d, 12h, "7 day"
    #[arg(long, short = 'p', global = true, default_value = "1d")]
    pub period: String,

    /// Target number of chart points
    #[arg(long, short = 'r', global = true, default_value = "672")]
    pub resolution: u32,

    /// Dashboard refresh interval
    #[arg(long, short = 'i', default_value = "300s", value_parser = parse_duration)]
    pub refresh: Duration,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the most recent reading
    Latest,

    /// Show the range-query plan for the selected period
    Plan {
        /// Window end as Unix epoch seconds (defaults to now)
        #[arg(long)]
        end: Option<i64>,
    },

    /// Fetch and resample the selected period, printing display points
    Export {
        /// Window end as Unix epoch seconds (defaults to now)
        #[arg(long)]
        end: Option<i64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Output as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Bulk-load readings from CSV lines of `timestamp,value`
    Import {
        /// CSV file, or `-` for stdin
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    // Try humantime first
    if let Ok(d) = humantime::parse_duration(s) {
        return Ok(d);
    }

    // Try bare number as seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }

    Err(format!(
        "Invalid duration '{}'. Examples: 30s, 5m, 2h, 1h30m, 90",
        s
    ))
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if self.resolution == 0 {
            return Err("Resolution must be at least 1".to_string());
        }

        if self.refresh < Duration::from_secs(1) {
            return Err(format!(
                "Refresh interval must be at least 1s, got {:?}",
                self.refresh
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_parser_accepts_humantime_and_bare_seconds() {
        assert_eq!(parse_duration("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_duration("90").unwrap(), Duration::from_secs(90));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn zero_resolution_is_rejected() {
        let cli = Cli::parse_from(["tempwatch", "--resolution", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn defaults_parse_cleanly() {
        let cli = Cli::parse_from(["tempwatch"]);
        assert!(cli.validate().is_ok());
        assert_eq!(cli.period, "1d");
        assert_eq!(cli.resolution, 672);
        assert_eq!(cli.refresh, Duration::from_secs(300));
    }
}
