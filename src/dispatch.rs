use crate::rules::{RuleSet, find_matches};
use crate::runner::{self, RunError};
use crate::settings::Settings;
use crate::types::{Notification, NotifyPayload};
use log::{debug, error, info, warn};

/// Run every matching rule for one notification, in catalog order. Per-rule
/// failures are logged and swallowed; they never stop later rules and never
/// reach the HTTP layer. Returns once all subprocess calls have finished.
pub async fn dispatch(rules: &RuleSet, notification: &Notification, settings: &Settings) {
    let reference = &notification.trigger_metadata.r#ref;

    for rule in rules.iter() {
        if rule.repository != notification.repository {
            debug!(
                "rule `{}`: repository `{}` does not match `{}`",
                rule.name, rule.repository, notification.repository
            );
            continue;
        }

        let matches = find_matches(&rule.condition, reference);
        debug!(
            "rule `{}`: condition `{}` has {} match(es) against `{reference}`",
            rule.name,
            rule.condition.as_str(),
            matches.len()
        );
        if matches.is_empty() {
            continue;
        }

        let command = rule.template.expand_all(matches);
        if command.is_empty() {
            warn!("rule `{}`: template expanded to an empty command, skipping", rule.name);
            continue;
        }

        info!("deploying `{}` from {reference}", rule.name);

        // Serializes concurrent notifications that hit the same rule.
        let _guard = rule.guard.lock().await;

        info!("executing shell: {command}");
        match runner::run(&command).await {
            Ok(output) => {
                let text = String::from_utf8_lossy(&output);
                info!("rule `{}` applied: {}", rule.name, text.trim_end());
                notify(
                    settings,
                    format!("deployment succeeded for {} ({reference})", rule.name),
                )
                .await;
            }
            Err(RunError::Exit { status, output }) => {
                error!(
                    "rule `{}` failed with {status}: {}",
                    rule.name,
                    String::from_utf8_lossy(&output).trim_end()
                );
                notify(
                    settings,
                    format!("deployment failed for {}: {status}", rule.name),
                )
                .await;
            }
            Err(err) => {
                error!("rule `{}` failed: {err}", rule.name);
                notify(
                    settings,
                    format!("deployment failed for {}: {err}", rule.name),
                )
                .await;
            }
        }
    }
}

/// Fire-and-forget operator notification. Only active when a webhook URL is
/// configured; failures are logged and otherwise ignored.
async fn notify(settings: &Settings, message: String) {
    let Some(url) = &settings.notify_url else {
        return;
    };

    let payload = NotifyPayload {
        content: format!("{message}\nTimestamp: {}", chrono::Utc::now().to_rfc3339()),
    };

    let client = reqwest::Client::new();
    match client.post(url).json(&payload).send().await {
        Ok(response) if response.status().is_success() => {}
        Ok(response) => warn!("notification webhook returned status {}", response.status()),
        Err(err) => warn!("failed to send notification: {err}"),
    }
}
