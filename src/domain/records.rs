//! Plain CRUD records exchanged with the marketplace backend.

use crate::utils::error::{MarketplaceError, Result};
use crate::utils::validation::{require_text, Validate};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub trainer_id: Option<String>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub enrollment_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 只送出有變更的欄位
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl CoursePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.published.is_none()
    }
}

impl Validate for CoursePatch {
    fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(MarketplaceError::ValidationError {
                message: "Nothing to update".to_string(),
            });
        }
        if let Some(title) = &self.title {
            require_text("Course title", title)?;
        }
        if let Some(price) = self.price {
            if !price.is_finite() || price < 0.0 {
                return Err(MarketplaceError::ValidationError {
                    message: "Course price must be zero or more".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(default)]
    pub course_id: Option<String>,
    #[serde(default)]
    pub shift_id: Option<String>,
    pub payer_id: String,
    pub amount: f64,
    pub commission_rate: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    pub id: String,
    pub worker_id: String,
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub expires_on: Option<NaiveDate>,
    #[serde(default)]
    pub file_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    pub text: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub participant_ids: Vec<String>,
    #[serde(default)]
    pub last_message: Option<Message>,
    #[serde(default)]
    pub unread_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub text: String,
}

impl Validate for NewMessage {
    fn validate(&self) -> Result<()> {
        require_text("Message", &self.text)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    #[default]
    Requested,
    Scheduled,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRequest {
    pub id: String,
    pub worker_id: String,
    pub pickup_address: String,
    pub dropoff_address: String,
    pub requested_for: DateTime<Utc>,
    #[serde(default)]
    pub status: RideStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFair {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub agencies: Vec<String>,
    #[serde(default)]
    pub capacity: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationFlag {
    pub note: String,
    #[serde(default)]
    pub flagged_at: Option<DateTime<Utc>>,
}

/// 舊資料把「已標記」存成 `cancelled` 加上這個前綴的備註
pub const LEGACY_FLAG_PREFIX: &str = "FLAGGED:";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "WireApplication")]
pub struct DspApplication {
    pub id: String,
    pub applicant_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub certifications: Vec<String>,
    pub years_experience: f64,
    pub status: ApplicationStatus,
    pub notes: Option<String>,
    pub flag: Option<ApplicationFlag>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl DspApplication {
    pub fn is_flagged(&self) -> bool {
        self.flag.is_some()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireApplication {
    id: String,
    applicant_name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    certifications: Vec<String>,
    #[serde(default)]
    years_experience: f64,
    #[serde(default)]
    status: ApplicationStatus,
    #[serde(default)]
    notes: Option<String>,
    #[serde(default)]
    flag: Option<ApplicationFlag>,
    #[serde(default)]
    submitted_at: Option<DateTime<Utc>>,
}

impl From<WireApplication> for DspApplication {
    fn from(wire: WireApplication) -> Self {
        let legacy_note = match (&wire.status, &wire.notes, &wire.flag) {
            (ApplicationStatus::Cancelled, Some(note), None) => note
                .strip_prefix(LEGACY_FLAG_PREFIX)
                .map(|rest| rest.trim().to_string()),
            _ => None,
        };

        match legacy_note {
            Some(note) => Self {
                id: wire.id,
                applicant_name: wire.applicant_name,
                email: wire.email,
                phone: wire.phone,
                certifications: wire.certifications,
                years_experience: wire.years_experience,
                status: ApplicationStatus::Pending,
                notes: None,
                flag: Some(ApplicationFlag {
                    note,
                    flagged_at: None,
                }),
                submitted_at: wire.submitted_at,
            },
            None => Self {
                id: wire.id,
                applicant_name: wire.applicant_name,
                email: wire.email,
                phone: wire.phone,
                certifications: wire.certifications,
                years_experience: wire.years_experience,
                status: wire.status,
                notes: wire.notes,
                flag: wire.flag,
                submitted_at: wire.submitted_at,
            },
        }
    }
}

/// 審核動作送出的內容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationReview {
    pub status: ApplicationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub flag: Option<ApplicationFlag>,
}

impl ApplicationReview {
    pub fn approve() -> Self {
        Self {
            status: ApplicationStatus::Approved,
            notes: None,
            flag: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            status: ApplicationStatus::Rejected,
            notes: Some(reason.into()),
            flag: None,
        }
    }

    /// 標記待查，狀態維持 pending
    pub fn flag(note: impl Into<String>) -> Self {
        Self {
            status: ApplicationStatus::Pending,
            notes: None,
            flag: Some(ApplicationFlag {
                note: note.into(),
                flagged_at: Some(Utc::now()),
            }),
        }
    }
}

impl Validate for ApplicationReview {
    fn validate(&self) -> Result<()> {
        if self.status == ApplicationStatus::Rejected {
            require_text("Rejection reason", self.notes.as_deref().unwrap_or_default())?;
        }
        if let Some(flag) = &self.flag {
            require_text("Flag note", &flag.note)?;
            if self.status == ApplicationStatus::Approved {
                return Err(MarketplaceError::ValidationError {
                    message: "An approved application cannot stay flagged".to_string(),
                });
            }
        }
        Ok(())
    }
}
