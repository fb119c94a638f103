//! Process configuration.
//!
//! Everything is a named constant by design: no CLI flags, no environment
//! variables steer behavior. The exchange rate lives in
//! `churn_model::currency`; this module only decides where the artifact
//! lives and where the page is served.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Candidate artifact locations, tried in order. The first that exists wins;
/// if none exists the primary path is reported in the startup diagnostic.
pub(crate) const ARTIFACT_CANDIDATES: [&str; 3] = [
    "./model_churn_pipeline.json",
    "./model/model_churn_pipeline.json",
    "/etc/churnd/model_churn_pipeline.json",
];

/// Loopback on the port the original tool served its page from.
pub(crate) const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8501";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub artifact_path: PathBuf,
    pub listen_addr: SocketAddr,
}

impl AppConfig {
    pub fn load() -> Self {
        let artifact_path = ARTIFACT_CANDIDATES
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
            .unwrap_or_else(|| PathBuf::from(ARTIFACT_CANDIDATES[0]));

        Self {
            artifact_path,
            // Parse of a literal constant cannot fail.
            listen_addr: DEFAULT_LISTEN_ADDR.parse().expect("valid listen constant"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_constant_parses() {
        let config = AppConfig::load();
        assert_eq!(config.listen_addr.port(), 8501);
        assert!(config.listen_addr.ip().is_loopback());
    }

    #[test]
    fn artifact_falls_back_to_primary_candidate() {
        // Whatever the cwd, the chosen path is one of the candidates.
        let config = AppConfig::load();
        let chosen = config.artifact_path.to_string_lossy().into_owned();
        assert!(ARTIFACT_CANDIDATES.contains(&chosen.as_str()));
    }
}
