use crate::core::{ConfigProvider, MatchInput, MatchReport, MatchSource, Pipeline, Storage};
use crate::matching::{get_top_matches, to_ranked, MatchingConfig, ShiftScorer};
use crate::utils::error::Result;
use chrono::Utc;

/// 取得工作者與班表 → 評分排序 → 寫出 JSON 報表
pub struct ShiftMatchPipeline<M: MatchSource, S: Storage, C: ConfigProvider> {
    source: M,
    storage: S,
    config: C,
    scorer: ShiftScorer,
}

impl<M: MatchSource, S: Storage, C: ConfigProvider> ShiftMatchPipeline<M, S, C> {
    pub fn new(source: M, storage: S, config: C) -> Self {
        Self::with_matching(source, storage, config, MatchingConfig::default())
    }

    pub fn with_matching(source: M, storage: S, config: C, matching: MatchingConfig) -> Self {
        Self {
            source,
            storage,
            config,
            scorer: ShiftScorer::new(matching),
        }
    }
}

#[async_trait::async_trait]
impl<M: MatchSource, S: Storage, C: ConfigProvider> Pipeline for ShiftMatchPipeline<M, S, C> {
    async fn extract(&self) -> Result<MatchInput> {
        let worker_id = self.config.worker_id().unwrap_or_default();
        let worker = self.source.load_worker_profile(worker_id).await?;
        let shifts = self.source.load_open_shifts().await?;

        tracing::info!(
            "👤 Loaded profile for {} ({} certifications, {} skills)",
            if worker.name.is_empty() { &worker.id } else { &worker.name },
            worker.certifications.len(),
            worker.skills.len()
        );
        tracing::info!("🗓️ {} open shifts to score", shifts.len());

        Ok(MatchInput { worker, shifts })
    }

    async fn transform(&self, input: MatchInput) -> Result<MatchReport> {
        let min_score = self.config.min_score();
        let top_n = self.config.top_n();

        let scored = self.scorer.calculate_matches(&input.worker, &input.shifts);
        for m in &scored {
            tracing::debug!("{} scored {} ({})", m.shift.id, m.score, m.reasons.join("; "));
        }

        let top = get_top_matches(scored, min_score, top_n);
        tracing::info!(
            "🎯 {} of {} shifts scored at least {} (keeping top {})",
            top.len(),
            input.shifts.len(),
            min_score,
            top_n
        );

        Ok(MatchReport {
            worker_id: input.worker.id.clone(),
            worker_name: input.worker.name.clone(),
            generated_at: Utc::now(),
            shifts_considered: input.shifts.len(),
            min_score,
            top_n,
            matches: to_ranked(&top),
        })
    }

    async fn load(&self, report: MatchReport) -> Result<String> {
        let filename = self.config.report_filename();
        let json_data = serde_json::to_string_pretty(&report)?;

        tracing::debug!("Writing report ({} bytes) to storage", json_data.len());
        self.storage.write_file(filename, json_data.as_bytes()).await?;

        Ok(format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        ))
    }
}
