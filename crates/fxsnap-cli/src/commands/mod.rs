use std::time::Duration;

use fxsnap_core::{
    AtrPipeline, CotPipeline, Pipeline, PipelineContext, RatesPipeline, RetryConfig, RunOutcome,
    Settings,
};
use tracing::{error, info, Instrument};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// Assembles run settings from defaults plus command-line overrides.
pub fn settings(cli: &Cli) -> Result<Settings, CliError> {
    let mut settings = Settings {
        output_dir: cli.output_dir.clone(),
        retry: RetryConfig::fixed(Duration::from_millis(cli.retry_delay_ms), cli.attempts),
        ..Settings::default()
    };
    settings.atr.pacing = Duration::from_millis(cli.pacing_ms);
    settings.validate()?;
    Ok(settings)
}

/// Pipelines selected by `command`, in run order.
pub fn pipelines(
    command: Command,
    context: &PipelineContext,
    settings: &Settings,
) -> Vec<Box<dyn Pipeline>> {
    let rates = || -> Box<dyn Pipeline> {
        Box::new(RatesPipeline::new(
            context.clone(),
            settings.rates.clone(),
            settings.output_path(&settings.rates.file_name),
        ))
    };
    let atr = || -> Box<dyn Pipeline> {
        Box::new(AtrPipeline::new(
            context.clone(),
            settings.atr.clone(),
            settings.output_path(&settings.atr.file_name),
        ))
    };
    let cot = || -> Box<dyn Pipeline> {
        Box::new(CotPipeline::new(
            context.clone(),
            settings.cot.clone(),
            settings.output_path(&settings.cot.file_name),
        ))
    };

    match command {
        Command::Rates => vec![rates()],
        Command::Atr => vec![atr()],
        Command::Cot => vec![cot()],
        Command::All => vec![rates(), atr(), cot()],
    }
}

/// Runs the selected pipelines one after another and returns the highest exit code.
///
/// A pipeline that errors does not stop the ones after it.
pub async fn run(cli: &Cli) -> Result<u8, CliError> {
    let settings = settings(cli)?;
    let context = PipelineContext::production(settings.retry);
    let mut exit_code = 0;

    for pipeline in pipelines(cli.command, &context, &settings) {
        let name = pipeline.name();
        let span = tracing::info_span!("pipeline", pipeline = name);
        let code = match pipeline.run().instrument(span).await {
            Ok(outcome) => {
                report(name, &outcome);
                outcome.exit_code()
            }
            Err(pipeline_error) => {
                let cli_error = CliError::from(pipeline_error);
                error!(pipeline = name, "{cli_error}");
                println!("{name}: error ({cli_error})");
                cli_error.exit_code()
            }
        };
        exit_code = exit_code.max(code);
    }

    info!(exit_code, "run finished");
    Ok(exit_code)
}

fn report(name: &str, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Written | RunOutcome::KeptPrevious { .. } => {
            info!(pipeline = name, %outcome, "done")
        }
        RunOutcome::WrittenDegraded { .. } | RunOutcome::Failed { .. } => {
            error!(pipeline = name, %outcome, "done")
        }
    }
    println!("{name}: {outcome}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).expect("parses")
    }

    #[test]
    fn settings_apply_overrides() {
        let cli = parse(&[
            "fxsnap",
            "atr",
            "--output-dir",
            "site",
            "--attempts",
            "2",
            "--retry-delay-ms",
            "10",
            "--pacing-ms",
            "0",
        ]);
        let settings = settings(&cli).expect("valid");

        assert_eq!(settings.output_dir, PathBuf::from("site"));
        assert_eq!(settings.retry, RetryConfig::fixed(Duration::from_millis(10), 2));
        assert_eq!(settings.atr.pacing, Duration::ZERO);
        assert_eq!(settings.atr.lookback, 14);
    }

    #[test]
    fn all_runs_every_pipeline_in_order() {
        let cli = parse(&["fxsnap", "all"]);
        let settings = settings(&cli).expect("valid");
        let context = PipelineContext::production(settings.retry);

        let names = pipelines(Command::All, &context, &settings)
            .iter()
            .map(|pipeline| pipeline.name())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["rates", "atr", "cot"]);
    }
}
