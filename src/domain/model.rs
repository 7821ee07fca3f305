use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub city: String,
    pub state: String,
    pub zip: String,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => write!(f, "{}, {}", self.city, self.state),
            (false, true) => write!(f, "{}", self.city),
            (true, false) => write!(f, "{}", self.state),
            (true, true) => write!(f, "{}", self.zip),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Availability {
    pub full_time: bool,
    pub part_time: bool,
    pub weekends: bool,
    pub evenings: bool,
}

/// 時薪區間（美元）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayRange {
    pub min: f64,
    pub max: f64,
}

impl PayRange {
    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && rate <= self.max
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerPreferences {
    pub max_distance_miles: Option<f64>,
    pub pay_range: Option<PayRange>,
    pub preferred_shift_types: Vec<ShiftType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerStats {
    /// 0.0 - 5.0
    pub rating: Option<f64>,
    /// 0.0 - 1.0
    pub completion_rate: Option<f64>,
    pub completed_shifts: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkerProfile {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub certifications: Vec<String>,
    pub skills: Vec<String>,
    pub years_experience: f64,
    pub availability: Availability,
    pub preferences: WorkerPreferences,
    pub stats: WorkerStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftType {
    Day,
    Evening,
    Overnight,
    Weekend,
    LiveIn,
    #[serde(other)]
    Other,
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShiftType::Day => "day",
            ShiftType::Evening => "evening",
            ShiftType::Overnight => "overnight",
            ShiftType::Weekend => "weekend",
            ShiftType::LiveIn => "live-in",
            ShiftType::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftStatus {
    #[default]
    Open,
    Filled,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPosting {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub client_name: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub address: String,
    pub hourly_rate: f64,
    pub shift_type: ShiftType,
    #[serde(default)]
    pub required_credentials: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub urgency: Urgency,
    /// 後端預先算好的距離（英里）
    #[serde(default)]
    pub distance_miles: Option<f64>,
    #[serde(default)]
    pub status: ShiftStatus,
}

impl ShiftPosting {
    pub fn duration_hours(&self) -> f64 {
        (self.ends_at - self.starts_at).num_minutes() as f64 / 60.0
    }

    /// 逐筆解析，缺欄位或格式錯的班表跳過，不影響其他班表
    pub fn decode_list(values: Vec<serde_json::Value>) -> Vec<ShiftPosting> {
        values
            .into_iter()
            .filter_map(|value| {
                let id = value
                    .get("id")
                    .and_then(|v| v.as_str())
                    .unwrap_or("<missing id>")
                    .to_string();
                match serde_json::from_value::<ShiftPosting>(value) {
                    Ok(shift) => Some(shift),
                    Err(e) => {
                        tracing::warn!("⚠️ Skipping malformed shift {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
    }
}

/// 單次比對的結果，不會被持久化
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftMatch<'a> {
    pub shift: &'a ShiftPosting,
    pub score: u8,
    pub reasons: Vec<String>,
}

/// 寫出報表用的擁有型版本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedShift {
    pub rank: usize,
    pub shift: ShiftPosting,
    pub score: u8,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MatchInput {
    pub worker: WorkerProfile,
    pub shifts: Vec<ShiftPosting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub worker_id: String,
    pub worker_name: String,
    pub generated_at: DateTime<Utc>,
    pub shifts_considered: usize,
    pub min_score: u8,
    pub top_n: usize,
    pub matches: Vec<RankedShift>,
}
