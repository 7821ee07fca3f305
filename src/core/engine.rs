use crate::core::{MatchReport, Pipeline};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct MatchEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> MatchEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        let monitor = SystemMonitor::new(monitor_enabled);
        if monitor.is_enabled() {
            tracing::info!("🔍 System monitoring enabled");
        }
        Self { pipeline, monitor }
    }

    /// 只做 extract + transform，不寫出報表
    pub async fn preview(&self) -> Result<MatchReport> {
        tracing::info!("🔍 Loading worker profile and open shifts...");
        let input = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        tracing::info!("🧮 Scoring {} shifts...", input.shifts.len());
        let report = self.pipeline.transform(input).await?;
        self.monitor.log_stats("Score");

        Ok(report)
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting match run");
        let report = self.preview().await?;
        let kept = report.matches.len();

        tracing::info!("💾 Writing report...");
        let output_path = self.pipeline.load(report).await?;
        self.monitor.log_stats("Write");
        self.monitor.log_final_stats();

        tracing::info!("✅ {} matches written to {}", kept, output_path);
        Ok(output_path)
    }
}
