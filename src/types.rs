use serde::{Deserialize, Serialize};

/// On-disk configuration document: an ordered list of services.
#[derive(Debug, Deserialize)]
pub struct ConfigDocument {
    pub services: Vec<ServiceSpec>,
}

/// One service entry as written in the config file, before compilation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceSpec {
    pub name: String,
    pub repository: String,
    pub cmd: String,
    pub conditions: String,
}

/// Build notification sent by the container registry. Only `repository` and
/// `trigger_metadata.ref` drive dispatch; everything else is carried through
/// for diagnostic logging. Every field defaults so a sparse payload parses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct Notification {
    pub repository: String,
    pub namespace: String,
    pub name: String,
    pub docker_url: String,
    pub homepage: String,
    pub visibility: String,
    pub build_id: String,
    pub docker_tags: Vec<String>,
    pub trigger_kind: String,
    pub trigger_id: String,
    pub trigger_metadata: TriggerMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct TriggerMetadata {
    pub default_branch: String,
    pub r#ref: String,
    pub commit: String,
    pub commit_info: CommitInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct CommitInfo {
    pub url: String,
    pub message: String,
    pub date: String,
    pub author: CommitActor,
    pub committer: CommitActor,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
#[allow(dead_code)]
pub struct CommitActor {
    pub username: String,
    pub url: String,
    pub avatar_url: String,
}

/// Body POSTed to the operator notification webhook, when configured.
#[derive(Debug, Serialize)]
pub struct NotifyPayload {
    pub content: String,
}
