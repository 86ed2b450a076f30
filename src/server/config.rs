use anyhow::Result;
use std::path::PathBuf;

use crate::geo::BorderCollection;
use crate::store::{load_current, DataDir, Snapshot};

use super::auth::{secrets_match, Sessions};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub data_dir: Option<PathBuf>,
    pub borders: Option<PathBuf>,
    pub admin_login: String,
    pub admin_password: String,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
            data_dir: None,
            borders: None,
            admin_login: "admin".to_string(),
            admin_password: "admin".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// Everything the handlers share, behind one `web::Data`
pub struct AppState {
    pub config: ServerConfig,
    pub data_dir: DataDir,
    pub snapshot: Snapshot,
    pub sessions: Sessions,
    pub borders: Option<BorderCollection>,
    /// Held for the whole of an upload so imports never overlap
    pub ingest_lock: tokio::sync::Mutex<()>,
}

impl AppState {
    pub fn load(config: ServerConfig) -> Result<Self> {
        let data_dir = DataDir::new(config.data_dir.clone())?;
        data_dir.clean_staging()?;

        let dataset = match load_current(&data_dir) {
            Ok(dataset) => dataset,
            Err(e) => {
                log::warn!("ignoring unreadable database: {:#}", e);
                None
            }
        };
        match &dataset {
            Some(d) => log::info!(
                "loaded {} districts and {} schools from {:?}",
                d.districts.len(),
                d.schools.len(),
                data_dir.root()
            ),
            None => log::info!("no data imported yet in {:?}", data_dir.root()),
        }

        let borders = config
            .borders
            .as_deref()
            .map(BorderCollection::load)
            .transpose()?;
        if let Some(borders) = &borders {
            log::info!("loaded {} border features", borders.len());
        }

        Ok(Self {
            config,
            data_dir,
            snapshot: Snapshot::new(dataset),
            sessions: Sessions::new(),
            borders,
            ingest_lock: tokio::sync::Mutex::new(()),
        })
    }

    pub fn check_credentials(&self, login: &str, password: &str) -> bool {
        secrets_match(login, &self.config.admin_login)
            & secrets_match(password, &self.config.admin_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let state = AppState::load(ServerConfig {
            data_dir: Some(tmp.path().to_path_buf()),
            admin_password: "s3cret".to_string(),
            ..ServerConfig::default()
        })
        .unwrap();

        assert!(state.check_credentials("admin", "s3cret"));
        assert!(!state.check_credentials("admin", "s3cre"));
        assert!(!state.check_credentials("admin", "s3cret "));
        assert!(!state.check_credentials("root", "s3cret"));
        assert!(!state.check_credentials("", ""));
    }
}
