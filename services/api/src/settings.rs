//! Service settings loaded with the `config` crate
//!
//! Every key can be overridden through an `ATTENDANCE_`-prefixed environment
//! variable, e.g. `ATTENDANCE_PRESENCE_URL` or
//! `ATTENDANCE_PRESENCE_FALLBACK=120A3043,120A3038`.

use config::{Config, ConfigError, Environment};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP listen port
    pub port: u16,
    /// RFID reader endpoint returning `{"data": [prn, ...]}`
    pub presence_url: Option<String>,
    /// Registration numbers assumed present when the reader is unavailable
    pub presence_fallback: Vec<String>,
    /// Bucket receiving generated reports
    pub report_bucket: String,
    /// Key prefix for generated reports
    pub report_prefix: String,
    /// Where reports are written before upload
    pub report_dir: PathBuf,
    /// Lifetime of the presigned report URL
    pub report_url_expiry_secs: u64,
    /// Initial password for students imported from a roll list
    pub default_student_password: String,
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_environment(Environment::with_prefix("ATTENDANCE"))
    }

    fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("port", 3001)?
            .set_default("presence_fallback", Vec::<String>::new())?
            .set_default("report_bucket", "attendance-reports")?
            .set_default("report_prefix", "attendanceReport")?
            .set_default(
                "report_dir",
                std::env::temp_dir().to_string_lossy().to_string(),
            )?
            .set_default("report_url_expiry_secs", 604800)?
            .set_default("default_student_password", "Pass@123")?
            .add_source(
                environment
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("presence_fallback"),
            )
            .build()?
            .try_deserialize()
    }
}
