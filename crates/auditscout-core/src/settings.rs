//! Settings store: persisted GitHub publish configuration, Sled-backed.
//!
//! One JSON blob under a fixed key; loaded at startup, overwritten in full on save.

use crate::error::ScoutResult;
use crate::publisher::PublishConfig;
use std::path::Path;

const SETTINGS_DEFAULT_PATH: &str = "./data/auditscout_settings";

/// Key holding the serialized [`PublishConfig`].
pub const GITHUB_CONFIG_KEY: &str = "audit_scout_gh_config";

pub struct SettingsStore {
    db: sled::Db,
}

impl SettingsStore {
    /// Open the store at the given directory, or the default under `./data`.
    pub fn open(path: Option<impl AsRef<Path>>) -> ScoutResult<Self> {
        let p = path
            .map(|x| x.as_ref().to_path_buf())
            .unwrap_or_else(|| Path::new(SETTINGS_DEFAULT_PATH).to_path_buf());
        let db = sled::open(p)?;
        Ok(Self { db })
    }

    /// Saved publish configuration, if any.
    pub fn load_publish_config(&self) -> ScoutResult<Option<PublishConfig>> {
        match self.db.get(GITHUB_CONFIG_KEY.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn save_publish_config(&self, config: &PublishConfig) -> ScoutResult<()> {
        let bytes = serde_json::to_vec(config)?;
        self.db.insert(GITHUB_CONFIG_KEY.as_bytes(), bytes)?;
        self.db.flush()?;
        tracing::info!(owner = %config.owner, repo = %config.repo, path = %config.path, "publish settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PublishConfig {
        PublishConfig {
            token: "ghp_test".into(),
            owner: "acme-corp".into(),
            repo: "audit-risks".into(),
            path: "risks/daily-report.md".into(),
        }
    }

    #[test]
    fn empty_store_has_no_config() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(Some(dir.path())).unwrap();
        assert!(store.load_publish_config().unwrap().is_none());
    }

    #[test]
    fn save_then_load_is_field_for_field_equal() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(Some(dir.path())).unwrap();
        store.save_publish_config(&sample()).unwrap();
        assert_eq!(store.load_publish_config().unwrap(), Some(sample()));
    }

    #[test]
    fn save_overwrites_in_full_and_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SettingsStore::open(Some(dir.path())).unwrap();
            store.save_publish_config(&sample()).unwrap();
            let updated = PublishConfig {
                path: "reports/daily-scan.md".into(),
                ..sample()
            };
            store.save_publish_config(&updated).unwrap();
        }
        let store = SettingsStore::open(Some(dir.path())).unwrap();
        let loaded = store.load_publish_config().unwrap().unwrap();
        assert_eq!(loaded.path, "reports/daily-scan.md");
        assert_eq!(loaded.token, "ghp_test");
    }
}
