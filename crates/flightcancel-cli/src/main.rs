use anyhow::Result;
use clap::{ArgMatches, Command};
use log::LevelFilter;

use flightcancel_cli::classifiers::classify::classify::{
    classify_command, run_classification, ClassifyConfig,
};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(
            env_logger::Env::default().filter_or("FLIGHTCANCEL_LOG", "error,flightcancel=info"),
        )
        .init();

    let matches = Command::new("flightcancel")
        .version(clap::crate_version!())
        .about("\u{2708} flightcancel - Compare classifiers for flight-cancellation prediction")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(classify_command())
        .subcommand(
            Command::new("config").about("Print the default classification config as JSON"),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
        .get_matches();

    match matches.subcommand() {
        Some(("classify", sub_m)) => handle_classify(sub_m),
        Some(("config", _)) => {
            println!("{}", serde_json::to_string_pretty(&ClassifyConfig::default())?);
            Ok(())
        }
        _ => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn handle_classify(matches: &ArgMatches) -> Result<()> {
    let config = ClassifyConfig::from_arguments(matches)?;
    log::info!(
        "[flightcancel] Classifying {:?} (target '{}')",
        config.data_path,
        config.target_column
    );

    match run_classification(&config) {
        Ok(summary) => {
            if !summary.exported {
                log::warn!(
                    "Results were not written to {}",
                    summary.output_file.display()
                );
            }
            if let Some(report) = &summary.report_file {
                eprintln!("[flightcancel] Report written to {}", report.display());
            }
            eprintln!(
                "[flightcancel] Compared {} models on {} test rows.",
                summary.comparison.records().len(),
                summary.n_test
            );
            Ok(())
        }
        Err(e) => {
            log::error!("Classification failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
