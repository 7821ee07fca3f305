use crate::domain::model::{ShiftPosting, ShiftStatus, WorkerProfile};
use crate::domain::ports::{MatchSource, Storage};
use crate::utils::error::{MarketplaceError, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// 從本機 JSON 檔讀取工作者資料與班表，離線比對用
pub struct JsonFileSource<S: Storage> {
    storage: S,
    profile_path: String,
    shifts_path: String,
}

/// 班表檔可以是陣列，或 API 匯出的 `{"shifts": [...]}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ShiftFile {
    List(Vec<serde_json::Value>),
    Wrapped { shifts: Vec<serde_json::Value> },
}

impl<S: Storage> JsonFileSource<S> {
    pub fn new(storage: S, profile_path: impl Into<String>, shifts_path: impl Into<String>) -> Self {
        Self {
            storage,
            profile_path: profile_path.into(),
            shifts_path: shifts_path.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> MatchSource for JsonFileSource<S> {
    async fn load_worker_profile(&self, worker_id: &str) -> Result<WorkerProfile> {
        tracing::debug!("📂 Reading worker profile from {}", self.profile_path);
        let data = self.storage.read_file(&self.profile_path).await?;
        let profile: WorkerProfile = serde_json::from_slice(&data)?;

        if !worker_id.is_empty() && !profile.id.is_empty() && profile.id != worker_id {
            return Err(MarketplaceError::NotFound {
                resource: "Worker".to_string(),
                id: worker_id.to_string(),
            });
        }
        Ok(profile)
    }

    async fn load_open_shifts(&self) -> Result<Vec<ShiftPosting>> {
        tracing::debug!("📂 Reading shifts from {}", self.shifts_path);
        let data = self.storage.read_file(&self.shifts_path).await?;
        let raw = match serde_json::from_slice::<ShiftFile>(&data)? {
            ShiftFile::List(shifts) | ShiftFile::Wrapped { shifts } => shifts,
        };
        let mut shifts = ShiftPosting::decode_list(raw);
        shifts.retain(|s| s.status == ShiftStatus::Open);
        Ok(shifts)
    }
}
