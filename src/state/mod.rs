//! Persisted installation record.
//!
//! A write-only audit trail: the resolved value of the persisted option
//! subset is serialized once at the end of every run, overwriting any prior
//! record. The orchestrator never reads it back; external test tooling may.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::options::InstallOptions;

/// The audit record written at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedState {
    pub core: bool,
    pub cloudcmd: bool,
    pub nodered: bool,
    pub nginx: bool,
    pub mosquitto: bool,
    pub serial: bool,
    pub wifi: bool,
    pub tools: bool,
    pub template: bool,
    pub cache: bool,
    /// When this record was written.
    pub written_at: DateTime<Utc>,
}

impl PersistedState {
    pub fn from_options(options: &InstallOptions) -> Self {
        Self {
            core: options.core,
            cloudcmd: options.cloudcmd,
            nodered: options.nodered,
            nginx: options.nginx,
            mosquitto: options.mosquitto,
            serial: options.serial,
            wifi: options.wifi,
            tools: options.tools,
            template: options.template,
            cache: options.cache,
            written_at: Utc::now(),
        }
    }
}

/// Write the resolved options to `path`, replacing any prior record.
pub fn persist(options: &InstallOptions, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let record = PersistedState::from_options(options);
    let content = serde_json::to_string_pretty(&record)
        .map_err(|e| anyhow::anyhow!("failed to serialize state record: {e}"))?;
    std::fs::write(path, content)?;
    tracing::debug!(path = %path.display(), "state record written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persist_writes_the_option_subset() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("options.json");
        let options = InstallOptions {
            core: true,
            mosquitto: true,
            ..Default::default()
        };

        persist(&options, &path).unwrap();

        let record: PersistedState =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(record.core);
        assert!(record.mosquitto);
        assert!(!record.nginx);
        assert!(!record.cache);
    }

    #[test]
    fn persist_overwrites_without_merging() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("options.json");

        persist(
            &InstallOptions {
                nginx: true,
                ..Default::default()
            },
            &path,
        )
        .unwrap();
        persist(&InstallOptions::default(), &path).unwrap();

        let record: PersistedState =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(!record.nginx);
    }

    #[test]
    fn persist_creates_parent_directories() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("deep").join("nested").join("options.json");
        persist(&InstallOptions::default(), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn record_keys_are_the_documented_subset() {
        let options = InstallOptions::default();
        let record = PersistedState::from_options(&options);
        let json = serde_json::to_value(&record).unwrap();
        let mut keys: Vec<&str> =
            json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        let mut expected = vec![
            "core",
            "cloudcmd",
            "nodered",
            "nginx",
            "mosquitto",
            "serial",
            "wifi",
            "tools",
            "template",
            "cache",
            "written_at",
        ];
        expected.sort_unstable();
        assert_eq!(keys, expected);
    }
}
