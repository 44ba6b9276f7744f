use crate::rules::{Rule, RuleSet};
use crate::template::{Template, TemplateError};
use crate::types::ConfigDocument;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::Mutex;

/// Errors that abort startup. No partial catalog is ever served.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid condition for service `{service}`: {source}")]
    Condition {
        service: String,
        source: regex::Error,
    },
    #[error("invalid command template for service `{service}`: {source}")]
    Template {
        service: String,
        source: TemplateError,
    },
}

/// Load the config file and compile every rule. Conditions and templates are
/// validated here, once, so no pattern or placeholder error can surface
/// per-request.
pub fn load_rules(path: &Path) -> Result<RuleSet, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    let document: ConfigDocument =
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;

    let mut rules = Vec::with_capacity(document.services.len());
    for spec in document.services {
        let condition = Regex::new(&spec.conditions).map_err(|source| ConfigError::Condition {
            service: spec.name.clone(),
            source,
        })?;
        let template = Template::parse(&spec.cmd).map_err(|source| ConfigError::Template {
            service: spec.name.clone(),
            source,
        })?;
        rules.push(Rule {
            name: spec.name,
            repository: spec.repository,
            condition,
            template,
            guard: Mutex::new(()),
        });
    }
    Ok(RuleSet::new(rules))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_services_in_order() {
        let file = write_config(
            r#"{
                "services": [
                    { "name": "web", "repository": "myorg/app",
                      "conditions": "^refs/heads/(main)$",
                      "cmd": "deploy.sh --branch=\\1" },
                    { "name": "worker", "repository": "myorg/worker",
                      "conditions": "^refs/tags/v(.+)$",
                      "cmd": "deploy-worker.sh \\1" }
                ]
            }"#,
        );
        let rules = load_rules(file.path()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules.names(), ["web", "worker"]);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_rules(Path::new("/nonexistent/config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn unknown_service_field_is_rejected() {
        let file = write_config(
            r#"{ "services": [ { "name": "web", "repository": "r",
                 "conditions": ".", "cmd": "true", "extra": 1 } ] }"#,
        );
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn invalid_condition_names_the_service() {
        let file = write_config(
            r#"{ "services": [ { "name": "broken", "repository": "r",
                 "conditions": "([unclosed", "cmd": "true" } ] }"#,
        );
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Condition { .. }));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn malformed_template_names_the_service() {
        let file = write_config(
            r#"{ "services": [ { "name": "badtpl", "repository": "r",
                 "conditions": ".", "cmd": "deploy \\x" } ] }"#,
        );
        let err = load_rules(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Template { .. }));
        assert!(err.to_string().contains("badtpl"));
    }
}
