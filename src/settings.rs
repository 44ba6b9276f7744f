use std::env;

/// Process settings, read from the environment exactly once at startup and
/// passed by reference from there on.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: u16,
    pub debug: bool,
    pub notify_url: Option<String>,
}

impl Settings {
    pub fn from_env() -> Settings {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000);
        let debug = env::var("DEBUG").is_ok_and(|v| !v.is_empty());
        let notify_url = env::var("NOTIFY_WEBHOOK_URL").ok().filter(|v| !v.is_empty());
        Settings {
            port,
            debug,
            notify_url,
        }
    }
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            port: 2000,
            debug: false,
            notify_url: None,
        }
    }
}
