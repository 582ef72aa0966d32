//! Generate command handler.

use super::SpinnerObserver;
use atelier::{AtelierConfig, CancellationToken, GenerationOutcome, LogConfig, ModeratedGenerationWorkflow};
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};

/// Runs the full workflow and writes the image as PNG.
///
/// Passing `group_members` turns the generation log on for this run.
/// The first Ctrl-C cancels the run, a second one exits immediately. Exits
/// with status 1 on any rejection or failure.
#[tracing::instrument(skip_all, fields(output = %output.display()))]
pub async fn handle_generate_command(
    config: AtelierConfig,
    prompt: &str,
    output: &Path,
    group_members: Option<String>,
) -> anyhow::Result<ExitCode> {
    let config = match group_members {
        Some(members) => {
            let log = LogConfig::new(true, config.log().path(), members);
            config.with_log(log)
        }
        None => config,
    };

    let workflow = ModeratedGenerationWorkflow::from_config(&config)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling generation");
            on_interrupt.cancel();
        }
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Second interrupt received, exiting");
            std::process::exit(130);
        }
    });

    let spinner = SpinnerObserver::new();
    let outcome = workflow.run_with(prompt, &spinner, &cancel).await;

    match outcome {
        GenerationOutcome::Generated(image) => {
            std::fs::write(output, image.to_png()?)?;
            info!(width = image.width(), height = image.height(), "Image written");
            println!("{}", output.display());
            Ok(ExitCode::SUCCESS)
        }
        rejected_or_failed => {
            eprintln!("{}", rejected_or_failed.user_message());
            if matches!(
                rejected_or_failed,
                GenerationOutcome::RejectedByKeyword(_) | GenerationOutcome::RejectedByClassifier(_)
            ) {
                eprintln!("Mantieni le descrizioni appropriate per tutti.");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
