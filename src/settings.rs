use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

/// Where the timetable lives and how politely we talk to it.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub faculties_path: String,
    pub teachers_path: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
    pub user_agent: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "https://rasp.ssuwt.ru".into(),
            faculties_path: "/gs/faculties/".into(),
            teachers_path: "/gs/teachers/".into(),
            timeout_secs: 20,
            requests_per_second: 4,
            user_agent: concat!("rasp-scrape/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

impl Settings {
    /// Defaults overridden by `RASP_*` environment variables (`RASP_BASE_URL`, ...).
    pub fn from_env() -> Result<Self> {
        Self::from_source(Environment::with_prefix("RASP"))
    }

    pub(crate) fn from_source<S>(source: S) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Settings::default();
        let settings = Config::builder()
            .set_default("base_url", defaults.base_url)?
            .set_default("faculties_path", defaults.faculties_path)?
            .set_default("teachers_path", defaults.teachers_path)?
            .set_default("timeout_secs", defaults.timeout_secs as i64)?
            .set_default("requests_per_second", i64::from(defaults.requests_per_second))?
            .set_default("user_agent", defaults.user_agent)?
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn faculties_url(&self) -> String {
        join_url(&self.base_url, &self.faculties_path)
    }

    pub fn teachers_url(&self) -> String {
        join_url(&self.base_url, &self.teachers_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_point_at_ssuwt() {
        let settings = Settings::default();
        assert_eq!(settings.faculties_url(), "https://rasp.ssuwt.ru/gs/faculties/");
        assert_eq!(settings.teachers_url(), "https://rasp.ssuwt.ru/gs/teachers/");
    }

    #[test]
    fn environment_overrides_defaults() {
        let env = HashMap::from([
            ("RASP_BASE_URL".to_string(), "http://localhost:8080/".to_string()),
            ("RASP_TIMEOUT_SECS".to_string(), "5".to_string()),
        ]);
        let settings =
            Settings::from_source(Environment::with_prefix("RASP").source(Some(env)).try_parsing(true))
                .unwrap();
        assert_eq!(settings.base_url, "http://localhost:8080/");
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.requests_per_second, 4);
        assert_eq!(settings.faculties_url(), "http://localhost:8080/gs/faculties/");
    }
}
