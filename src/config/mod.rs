pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::AppConfig;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "dsp-marketplace")]
#[command(about = "Rank open DSP shifts for a worker profile")]
pub struct MatchArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "dsp-marketplace.toml")]
    pub config: String,

    /// Worker to match (overrides worker.id)
    #[arg(long)]
    pub worker_id: Option<String>,

    /// Read the worker profile from a JSON file instead of the API
    #[arg(long, requires = "shifts_file")]
    pub profile_file: Option<String>,

    /// Read open shifts from a JSON file instead of the API
    #[arg(long, requires = "profile_file")]
    pub shifts_file: Option<String>,

    /// Minimum score to keep (overrides matching.min_score)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_score: Option<u8>,

    /// Number of matches to keep (overrides matching.top_n)
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Bearer token (overrides api.token)
    #[arg(long, env = "DSP_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Override output directory
    #[arg(long)]
    pub output_path: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log CPU and memory usage per phase
    #[arg(long)]
    pub monitor: bool,

    /// Show what would be matched without writing a report
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl MatchArgs {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(worker_id) = &self.worker_id {
            config.worker.id = Some(worker_id.clone());
        }
        if let Some(min_score) = self.min_score {
            config.matching.min_score = min_score;
        }
        if let Some(top_n) = self.top_n {
            config.matching.top_n = top_n;
        }
        if let Some(token) = &self.token {
            config.api.token = Some(token.clone());
        }
        if let Some(output_path) = &self.output_path {
            config.output.output_path = output_path.clone();
        }
    }
}
