use crate::domain::ports::ConfigProvider;
use crate::matching::weights::Weights;
use crate::utils::error::{MarketplaceError, Result};
use crate::utils::validation::{
    validate_path, validate_positive_number, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_MIN_SCORE: u8 = 60;
pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_REPORT_FILENAME: &str = "matches.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiSettings,
    #[serde(default)]
    pub worker: WorkerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub output: OutputSettings,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerSettings {
    pub id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_min_score")]
    pub min_score: u8,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub weights: Weights,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            top_n: DEFAULT_TOP_N,
            weights: Weights::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_report_filename")]
    pub filename: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            filename: default_report_filename(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

fn default_min_score() -> u8 {
    DEFAULT_MIN_SCORE
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_report_filename() -> String {
    DEFAULT_REPORT_FILENAME.to_string()
}

fn env_placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MarketplaceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DSP_API_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn token(&self) -> Option<&str> {
        self.api
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty() && !env_placeholder().is_match(t))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.api.timeout_seconds.map(Duration::from_secs)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;

        if let Some(timeout) = self.api.timeout_seconds {
            validate_positive_number("api.timeout_seconds", timeout as usize, 1)?;
        }

        validate_range("matching.min_score", self.matching.min_score, 0, 100)?;
        validate_positive_number("matching.top_n", self.matching.top_n, 1)?;
        self.matching.weights.validate()?;

        validate_path("output.output_path", &self.output.output_path)?;
        validate_path("output.filename", &self.output.filename)?;

        if let Some(level) = self.log_level() {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level) {
                return Err(MarketplaceError::InvalidConfigValueError {
                    field: "monitoring.log_level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        Ok(())
    }
}

impl ConfigProvider for AppConfig {
    fn worker_id(&self) -> Option<&str> {
        self.worker.id.as_deref().filter(|id| !id.trim().is_empty())
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn report_filename(&self) -> &str {
        &self.output.filename
    }

    fn min_score(&self) -> u8 {
        self.matching.min_score
    }

    fn top_n(&self) -> usize {
        self.matching.top_n
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
