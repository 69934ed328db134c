use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

use crate::transitions::ReschedulePolicy;

/// Runtime settings, read from the environment (and `.env` in debug builds).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub enable_hsts: bool,
    pub snapshot_path: Option<PathBuf>,
    pub reschedule_policy: ReschedulePolicy,
    pub seed_demo: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            frontend_url: "http://localhost:5173".into(),
            enable_hsts: false,
            snapshot_path: None,
            reschedule_policy: ReschedulePolicy::Permissive,
            seed_demo: false,
        }
    }
}

fn flag(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}

impl AppConfig {
    pub fn from_env() -> Self {
        fn parsed_env<T: FromStr>(name: &str, default: T) -> T {
            match std::env::var(name) {
                Ok(raw) => raw.parse().unwrap_or_else(|_| {
                    warn!("ignoring invalid {name}={raw:?}");
                    default
                }),
                Err(_) => default,
            }
        }
        let defaults = Self::default();
        Self {
            host: std::env::var("POSTPLAN_HOST").unwrap_or(defaults.host),
            port: parsed_env("POSTPLAN_PORT", defaults.port),
            frontend_url: std::env::var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            enable_hsts: std::env::var("ENABLE_HSTS").map(|v| flag(&v)).unwrap_or(false),
            snapshot_path: std::env::var("POSTPLAN_SNAPSHOT").ok().filter(|p| !p.is_empty()).map(PathBuf::from),
            reschedule_policy: parsed_env("POSTPLAN_RESCHEDULE_POLICY", defaults.reschedule_policy),
            seed_demo: std::env::var("POSTPLAN_SEED_DEMO").map(|v| flag(&v)).unwrap_or(false),
        }
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
