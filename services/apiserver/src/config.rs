use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_INTROSPECTION_TIMEOUT_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Jwt,
    Introspection,
}

impl std::str::FromStr for AuthMode {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "jwt" => Ok(AuthMode::Jwt),
            "introspection" => Ok(AuthMode::Introspection),
            other => bail!("unknown auth mode: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub mode: AuthMode,
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    /// Clock skew allowed on `exp`/`nbf`, in seconds.
    pub jwt_leeway_secs: u64,
    pub introspection_url: Option<String>,
    pub introspection_timeout: Duration,
}

// API server configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub auth: AuthConfig,
    pub banned_words: Vec<String>,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    auth_mode: Option<AuthMode>,
    jwt_secret: Option<String>,
    jwt_issuer: Option<String>,
    jwt_audience: Option<String>,
    jwt_leeway_secs: Option<u64>,
    introspection_url: Option<String>,
    introspection_timeout_ms: Option<u64>,
    banned_words: Option<Vec<String>>,
    cors_origins: Option<Vec<String>>,
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn list_env(key: &str) -> Vec<String> {
    optional_env(key)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("REVIEWHUB_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse REVIEWHUB_BIND")?;
        let metrics_bind = std::env::var("REVIEWHUB_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse REVIEWHUB_METRICS_BIND")?;
        let mode = std::env::var("REVIEWHUB_AUTH_MODE")
            .unwrap_or_else(|_| "jwt".to_string())
            .parse()
            .with_context(|| "parse REVIEWHUB_AUTH_MODE")?;
        let introspection_timeout_ms = match optional_env("REVIEWHUB_INTROSPECTION_TIMEOUT_MS") {
            Some(value) => value
                .parse()
                .with_context(|| "parse REVIEWHUB_INTROSPECTION_TIMEOUT_MS")?,
            None => DEFAULT_INTROSPECTION_TIMEOUT_MS,
        };
        let jwt_leeway_secs = match optional_env("REVIEWHUB_JWT_LEEWAY") {
            Some(value) => value
                .parse()
                .with_context(|| "parse REVIEWHUB_JWT_LEEWAY")?,
            None => 0,
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            auth: AuthConfig {
                mode,
                jwt_secret: optional_env("REVIEWHUB_JWT_SECRET"),
                jwt_issuer: optional_env("REVIEWHUB_JWT_ISSUER"),
                jwt_audience: optional_env("REVIEWHUB_JWT_AUDIENCE"),
                jwt_leeway_secs,
                introspection_url: optional_env("REVIEWHUB_INTROSPECTION_URL"),
                introspection_timeout: Duration::from_millis(introspection_timeout_ms),
            },
            banned_words: list_env("REVIEWHUB_BANNED_WORDS"),
            cors_origins: list_env("REVIEWHUB_CORS_ORIGINS"),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("REVIEWHUB_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read REVIEWHUB_CONFIG: {path}"))?;
            config.apply_yaml(&contents)?;
        }
        Ok(config)
    }

    fn apply_yaml(&mut self, contents: &str) -> Result<()> {
        let override_cfg: ApiConfigOverride =
            serde_yaml::from_str(contents).with_context(|| "parse api server config yaml")?;
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.auth_mode {
            self.auth.mode = value;
        }
        if let Some(value) = override_cfg.jwt_secret {
            self.auth.jwt_secret = Some(value);
        }
        if let Some(value) = override_cfg.jwt_issuer {
            self.auth.jwt_issuer = Some(value);
        }
        if let Some(value) = override_cfg.jwt_audience {
            self.auth.jwt_audience = Some(value);
        }
        if let Some(value) = override_cfg.jwt_leeway_secs {
            self.auth.jwt_leeway_secs = value;
        }
        if let Some(value) = override_cfg.introspection_url {
            self.auth.introspection_url = Some(value);
        }
        if let Some(value) = override_cfg.introspection_timeout_ms {
            self.auth.introspection_timeout = Duration::from_millis(value);
        }
        if let Some(value) = override_cfg.banned_words {
            self.banned_words = value;
        }
        if let Some(value) = override_cfg.cors_origins {
            self.cors_origins = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    struct EnvGuard {
        key: &'static str,
        prev: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: &str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::set_var(key, value);
            }
            Self { key, prev }
        }

        fn unset(key: &'static str) -> Self {
            let prev = std::env::var(key).ok();
            unsafe {
                std::env::remove_var(key);
            }
            Self { key, prev }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.prev {
                Some(value) => unsafe {
                    std::env::set_var(self.key, value);
                },
                None => unsafe {
                    std::env::remove_var(self.key);
                },
            }
        }
    }

    fn clear_env() -> Vec<EnvGuard> {
        [
            "REVIEWHUB_BIND",
            "REVIEWHUB_METRICS_BIND",
            "REVIEWHUB_AUTH_MODE",
            "REVIEWHUB_JWT_SECRET",
            "REVIEWHUB_JWT_ISSUER",
            "REVIEWHUB_JWT_AUDIENCE",
            "REVIEWHUB_JWT_LEEWAY",
            "REVIEWHUB_INTROSPECTION_URL",
            "REVIEWHUB_INTROSPECTION_TIMEOUT_MS",
            "REVIEWHUB_BANNED_WORDS",
            "REVIEWHUB_CORS_ORIGINS",
            "REVIEWHUB_CONFIG",
        ]
        .into_iter()
        .map(EnvGuard::unset)
        .collect()
    }

    #[test]
    #[serial]
    fn defaults_without_env() {
        let _guards = clear_env();
        let config = ApiConfig::from_env().expect("config");
        assert_eq!(config.bind_addr, "0.0.0.0:3000".parse().expect("addr"));
        assert_eq!(config.metrics_bind, "0.0.0.0:9090".parse().expect("addr"));
        assert_eq!(config.auth.mode, AuthMode::Jwt);
        assert!(config.auth.jwt_secret.is_none());
        assert_eq!(config.auth.jwt_leeway_secs, 0);
        assert_eq!(
            config.auth.introspection_timeout,
            Duration::from_millis(DEFAULT_INTROSPECTION_TIMEOUT_MS)
        );
        assert!(config.banned_words.is_empty());
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    #[serial]
    fn env_values_are_parsed() {
        let _guards = clear_env();
        let _bind = EnvGuard::set("REVIEWHUB_BIND", "127.0.0.1:4000");
        let _mode = EnvGuard::set("REVIEWHUB_AUTH_MODE", "Introspection");
        let _url = EnvGuard::set("REVIEWHUB_INTROSPECTION_URL", "http://idp/introspect");
        let _timeout = EnvGuard::set("REVIEWHUB_INTROSPECTION_TIMEOUT_MS", "250");
        let _words = EnvGuard::set("REVIEWHUB_BANNED_WORDS", "frell, , dren");
        let _leeway = EnvGuard::set("REVIEWHUB_JWT_LEEWAY", "30");
        let config = ApiConfig::from_env().expect("config");
        assert_eq!(config.bind_addr.port(), 4000);
        assert_eq!(config.auth.mode, AuthMode::Introspection);
        assert_eq!(
            config.auth.introspection_url.as_deref(),
            Some("http://idp/introspect")
        );
        assert_eq!(config.auth.introspection_timeout, Duration::from_millis(250));
        assert_eq!(config.banned_words, vec!["frell", "dren"]);
        assert_eq!(config.auth.jwt_leeway_secs, 30);
    }

    #[test]
    #[serial]
    fn invalid_env_values_fail_with_context() {
        let _guards = clear_env();
        let _bind = EnvGuard::set("REVIEWHUB_BIND", "not-an-addr");
        let err = ApiConfig::from_env().expect_err("bad bind");
        assert!(err.to_string().contains("REVIEWHUB_BIND"));
        drop(_bind);

        let _mode = EnvGuard::set("REVIEWHUB_AUTH_MODE", "magic");
        let err = ApiConfig::from_env().expect_err("bad mode");
        assert!(err.to_string().contains("REVIEWHUB_AUTH_MODE"));
        drop(_mode);

        let _leeway = EnvGuard::set("REVIEWHUB_JWT_LEEWAY", "-5");
        let err = ApiConfig::from_env().expect_err("bad leeway");
        assert!(err.to_string().contains("REVIEWHUB_JWT_LEEWAY"));
    }

    #[test]
    #[serial]
    fn yaml_overrides_env() {
        let _guards = clear_env();
        let _secret = EnvGuard::set("REVIEWHUB_JWT_SECRET", "from-env");
        let dir = std::env::temp_dir().join(format!("reviewhub-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("apiserver.yaml");
        std::fs::write(
            &path,
            "bind_addr: 127.0.0.1:5000\njwt_secret: from-yaml\njwt_leeway_secs: 15\nbanned_words: [frell]\ncors_origins: [\"http://localhost:8080\"]\n",
        )
        .expect("write yaml");
        let _config = EnvGuard::set("REVIEWHUB_CONFIG", path.to_str().expect("utf8 path"));

        let config = ApiConfig::from_env_or_yaml().expect("config");
        assert_eq!(config.bind_addr.port(), 5000);
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("from-yaml"));
        assert_eq!(config.auth.jwt_leeway_secs, 15);
        assert_eq!(config.banned_words, vec!["frell"]);
        assert_eq!(config.cors_origins, vec!["http://localhost:8080"]);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    #[serial]
    fn missing_yaml_file_is_an_error() {
        let _guards = clear_env();
        let _config = EnvGuard::set("REVIEWHUB_CONFIG", "/nonexistent/reviewhub.yaml");
        let err = ApiConfig::from_env_or_yaml().expect_err("missing file");
        assert!(err.to_string().contains("REVIEWHUB_CONFIG"));
    }
}
