use astview_db_mysql::MysqlConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Daemon configuration.
///
/// `update_interval_sec` carries no default: the reconciliation period is a
/// deployment decision and must come from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// MySQL connection settings.
    #[serde(default)]
    pub mysql: MysqlConfig,

    /// Enables diagnostic logging. An explicit `RUST_LOG` overrides it.
    #[serde(default = "default_debug")]
    pub debug: bool,

    /// Seconds between reconciliation passes. Required, must be >= 1.
    pub update_interval_sec: u64,
}

fn default_debug() -> bool {
    true
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.update_interval_sec == 0 {
            return Err("update_interval_sec must be >= 1".into());
        }
        if self.mysql.host.is_empty() {
            return Err("mysql.host must not be empty".into());
        }
        if self.mysql.port == 0 {
            return Err("mysql.port must be > 0".into());
        }
        if self.mysql.database.is_empty() {
            return Err("mysql.database must not be empty".into());
        }
        if self.mysql.max_connections == 0 {
            return Err("mysql.max_connections must be > 0".into());
        }
        if self.mysql.min_connections > self.mysql.max_connections {
            return Err("mysql.min_connections must be <= mysql.max_connections".into());
        }
        Ok(())
    }

    /// The reconciliation period as a [`Duration`].
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_sec)
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, File};
    use std::path::PathBuf;

    /// Environment overrides honored on top of the config file. The variable
    /// names predate this daemon; deployment scripts already export them.
    const ENV_OVERRIDES: &[(&str, &str)] = &[
        ("MYSQL_HOST", "mysql.host"),
        ("MYSQL_USER", "mysql.user"),
        ("MYSQL_PASSWORD", "mysql.password"),
        ("MYSQL_DB", "mysql.database"),
    ];

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if pathbuf.exists() {
                    builder = builder.add_source(File::from(pathbuf));
                }
            }
            None => {
                // Try default root-level file
                let default_path = PathBuf::from("astview.toml");
                if default_path.exists() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // The documented names don't follow a prefix__section__key scheme,
        // so each one maps to its key explicitly. Empty values fall through
        // to the file and the defaults.
        for (var, key) in ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    builder = builder
                        .set_override(*key, value)
                        .map_err(|e| format!("config override error: {e}"))?;
                }
            }
        }
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let cfg: AppConfig = toml::from_str("update_interval_sec = 30").expect("parse failed");
        assert_eq!(cfg.update_interval_sec, 30);
        assert!(cfg.debug);
        assert_eq!(cfg.mysql.host, "127.0.0.1");
        assert_eq!(cfg.mysql.user, "root");
        assert_eq!(cfg.mysql.password, "");
        assert_eq!(cfg.mysql.database, "asterisk");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_update_interval_is_required() {
        let err = toml::from_str::<AppConfig>("debug = false").expect_err("should fail");
        assert!(err.to_string().contains("update_interval_sec"));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let cfg: AppConfig = toml::from_str("update_interval_sec = 0").expect("parse failed");
        let err = cfg.validate().expect_err("should fail validation");
        assert!(err.contains("update_interval_sec"));
    }

    #[test]
    fn test_pool_bounds_validated() {
        let cfg: AppConfig = toml::from_str(
            "update_interval_sec = 30\n[mysql]\nmin_connections = 4\nmax_connections = 2",
        )
        .expect("parse failed");
        let err = cfg.validate().expect_err("should fail validation");
        assert!(err.contains("min_connections"));
    }

    #[test]
    fn test_mysql_section_parsed() {
        let cfg: AppConfig = toml::from_str(
            r#"
update_interval_sec = 60
debug = false

[mysql]
host = "db1.example.net"
user = "asterisk"
password = "hunter2"
database = "realtime"
"#,
        )
        .expect("parse failed");
        assert!(!cfg.debug);
        assert_eq!(cfg.mysql.host, "db1.example.net");
        assert_eq!(cfg.mysql.user, "asterisk");
        assert_eq!(cfg.mysql.password, "hunter2");
        assert_eq!(cfg.mysql.database, "realtime");
        assert_eq!(cfg.update_interval(), Duration::from_secs(60));
    }
}
