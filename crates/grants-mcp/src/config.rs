use std::path::PathBuf;

use crate::error::AppError;

/// Application configuration loaded explicitly from environment variables.
///
/// With no variables set the server serves the embedded catalog on stdio.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// External catalog script replacing the embedded one. `None` uses the embedded catalog.
    pub grants_file: Option<PathBuf>,
    /// TCP address to serve MCP on (e.g. "127.0.0.1:7400"). `None` serves on stdio.
    pub tcp_listen_addr: Option<String>,
}

impl Config {
    /// Optional:
    /// - `GRANTS_FILE`: path to a `window.grantsData = [...];` catalog script
    /// - `MCP_TCP_LISTEN_ADDR`: serve on TCP instead of stdio
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let grants_file = match non_blank(lookup("GRANTS_FILE")) {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.is_file() {
                    return Err(AppError::Config(format!(
                        "GRANTS_FILE not found: {}",
                        path.display()
                    )));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            grants_file,
            tcp_listen_addr: non_blank(lookup("MCP_TCP_LISTEN_ADDR")),
        })
    }

    /// Human-readable catalog origin, reported in logs and `catalog_info`.
    pub fn catalog_source(&self) -> String {
        self.grants_file
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded".to_string())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::Path;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_embedded_catalog_on_stdio() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.grants_file.is_none());
        assert!(config.tcp_listen_addr.is_none());
        assert_eq!(config.catalog_source(), "embedded");
    }

    #[test]
    fn blank_values_are_unset() {
        let config = Config::from_lookup(lookup(&[
            ("GRANTS_FILE", "  "),
            ("MCP_TCP_LISTEN_ADDR", ""),
        ]))
        .unwrap();
        assert!(config.grants_file.is_none());
        assert!(config.tcp_listen_addr.is_none());
    }

    #[test]
    fn existing_grants_file_is_accepted() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../grant-store/data/grants.js");
        let config = Config::from_lookup(lookup(&[
            ("GRANTS_FILE", path),
            ("MCP_TCP_LISTEN_ADDR", "127.0.0.1:7400"),
        ]))
        .unwrap();
        assert_eq!(config.grants_file.as_deref(), Some(Path::new(path)));
        assert_eq!(config.tcp_listen_addr.as_deref(), Some("127.0.0.1:7400"));
        assert!(config.catalog_source().ends_with("grants.js"));
    }

    #[test]
    fn missing_grants_file_is_config_error() {
        let err = Config::from_lookup(lookup(&[("GRANTS_FILE", "/nonexistent/grants.js")]))
            .unwrap_err();
        assert!(matches!(err, AppError::Config(msg) if msg.contains("/nonexistent/grants.js")));
    }
}
