use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub storage_root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 9000)),
            storage_root: PathBuf::from("data/cache"),
        }
    }
}

impl ServerConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading server config {}", path_ref.display()))?;
        let config: ServerConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing server config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(bind: SocketAddr, storage_root: PathBuf) -> Self {
        Self { bind, storage_root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"bind: 0.0.0.0:8080\nstorage_root: /var/lib/dashboard/cache\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.storage_root, PathBuf::from("/var/lib/dashboard/cache"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"storage_root: cache\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = ServerConfig::load(&path).unwrap();
        assert_eq!(cfg.bind, ServerConfig::default().bind);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ServerConfig::load("/nonexistent/cacheserver.yaml").unwrap_err();
        assert!(err.to_string().contains("reading server config"));
    }
}
