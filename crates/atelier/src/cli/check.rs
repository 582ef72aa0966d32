//! Check command handler.

use atelier::{AtelierConfig, ModerationVerdict, Moderator, Prompt};
use std::process::ExitCode;

/// Runs both moderation layers and prints the verdict.
///
/// Needs only the classifier key. Exits with status 1 when the prompt is
/// rejected.
#[tracing::instrument(skip_all)]
pub async fn handle_check_command(config: &AtelierConfig, prompt: &str) -> anyhow::Result<ExitCode> {
    if Prompt::new(prompt).is_blank() {
        eprintln!("Per favore, inserisci prima una descrizione!");
        return Ok(ExitCode::FAILURE);
    }

    let moderator = Moderator::from_config(config.blocklist(), config.classifier())?;
    match moderator.moderate(prompt).await {
        ModerationVerdict::Safe => {
            println!("safe");
            Ok(ExitCode::SUCCESS)
        }
        ModerationVerdict::BlockedByKeyword(terms) => {
            println!("blocked by keyword: {}", terms.join(", "));
            Ok(ExitCode::FAILURE)
        }
        ModerationVerdict::BlockedByClassifier(reason) => {
            match reason {
                Some(reason) => println!("blocked by classifier: {}", reason),
                None => println!("blocked by classifier"),
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
