use anyhow::Context;
use clap::Parser;
use std::process::ExitCode;
use tempwatch::cli::{Cli, Command};
use tempwatch::error::exit_code;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::from(exit_code::SUCCESS as u8),
        Err(e) => {
            eprintln!("Error: {e:#}");
            if let Some(tempwatch_err) = e.downcast_ref::<tempwatch::Error>() {
                ExitCode::from(tempwatch_err.exit_code() as u8)
            } else {
                ExitCode::from(exit_code::GENERAL_ERROR as u8)
            }
        }
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Validate CLI arguments
    cli.validate()
        .map_err(|e| anyhow::anyhow!("{}", e))
        .context("Invalid arguments")?;

    match cli.command {
        Some(Command::Latest) => {
            tempwatch::commands::latest::run(&cli.db)?;
        }
        Some(Command::Plan { end }) => {
            tempwatch::commands::plan::run(&cli.period, cli.resolution, end)?;
        }
        Some(Command::Export { end, json, csv }) => {
            tempwatch::commands::export::run(&cli.db, &cli.period, cli.resolution, end, json, csv)?;
        }
        Some(Command::Import { ref file }) => {
            tempwatch::commands::import::run(&cli.db, file)?;
        }
        Some(Command::Completions { shell }) => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tempwatch", &mut std::io::stdout());
        }
        None => {
            // Dashboard mode
            run_dashboard(&cli)?;
        }
    }

    Ok(())
}

fn run_dashboard(cli: &Cli) -> anyhow::Result<()> {
    let store = tempwatch::store::SqliteStore::open(&cli.db)?;

    // An unparseable period is not an error: degrade to latest-only mode.
    let period = tempwatch::period::Period::parse(&cli.period);
    if period.is_none() {
        eprintln!(
            "Warning: invalid period '{}', showing latest reading only",
            cli.period
        );
    }

    tempwatch::tui::run(store, period, cli.resolution, cli.refresh)?;
    Ok(())
}
