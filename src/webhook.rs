use crate::dispatch;
use crate::rules::RuleSet;
use crate::settings::Settings;
use crate::types::Notification;
use log::{debug, error};
use rocket::data::{Data, ToByteUnit};
use rocket::{State, get, post};

/// Liveness probe. No side effects.
#[get("/healthz")]
pub fn healthz() -> &'static str {
    "ok"
}

/// Handler for POST / — the registry build notification.
///
/// Always answers 200. The body is `ok` once the payload parsed and the
/// dispatch loop finished, whatever the rules did, and `error` only when the
/// body was empty or not a valid notification document. Command failures are
/// operator-visible through logs, never through this response.
#[post("/", data = "<data>")]
pub async fn receive(
    rules: &State<RuleSet>,
    settings: &State<Settings>,
    data: Data<'_>,
) -> &'static str {
    let body = match data.open(5.megabytes()).into_bytes().await {
        Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
        Ok(_) => {
            error!("notification body exceeds the size limit");
            return "error";
        }
        Err(err) => {
            error!("failed to read notification body: {err}");
            return "error";
        }
    };

    let notification: Notification = match serde_json::from_slice(&body) {
        Ok(notification) => notification,
        Err(err) => {
            error!("cannot parse notification payload: {err}");
            return "error";
        }
    };

    debug!("payload: {notification:?}");

    dispatch::dispatch(rules, &notification, settings).await;
    "ok"
}
