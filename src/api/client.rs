use crate::domain::model::{ShiftPosting, ShiftStatus, WorkerProfile};
use crate::domain::ports::{MarketplaceApi, MatchSource};
use crate::domain::records::{
    ApplicationReview, Conversation, Course, CoursePatch, DspApplication, Message, NewMessage,
};
use crate::utils::error::{MarketplaceError, Result};
use crate::utils::validation::{validate_url, Validate};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// 帶 bearer token 的 REST 用戶端；不重試、不刷新 token
#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    token: String,
    client: Client,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        Self::with_timeout(base_url, token, None)
    }

    pub fn with_timeout(base_url: &str, token: &str, timeout: Option<Duration>) -> Result<Self> {
        validate_url("api.base_url", base_url)?;
        if token.trim().is_empty() {
            return Err(MarketplaceError::MissingConfigError {
                field: "api.token".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: Url::parse(base_url).map_err(|e| MarketplaceError::ConfigError {
                message: format!("Invalid base URL {}: {}", base_url, e),
            })?,
            token: token.trim().to_string(),
            client: builder.build()?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| MarketplaceError::ConfigError {
                message: format!("Base URL cannot carry a path: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("📡 {} {}", method, url);
        self.client.request(method, url).bearer_auth(&self.token)
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
        id: &str,
    ) -> Result<T> {
        let response = check_status(request.send().await?, resource, id).await?;
        Ok(response.json().await?)
    }

    async fn execute(&self, request: RequestBuilder, resource: &str, id: &str) -> Result<()> {
        check_status(request.send().await?, resource, id).await?;
        Ok(())
    }
}

/// 把非 2xx 回應轉成錯誤，盡量沿用伺服器給的訊息
async fn check_status(response: Response, resource: &str, id: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    });
    tracing::warn!("⚠️ {} {} failed with {}: {}", resource, id, status, message);

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => MarketplaceError::AuthError {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => MarketplaceError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        },
        _ => MarketplaceError::ApiStatusError {
            status: status.as_u16(),
            message,
        },
    })
}

fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn get_trainer_courses(&self) -> Result<Vec<Course>> {
        let url = self.endpoint(&["courses", "trainer"])?;
        let courses: Vec<Course> = self
            .fetch(self.request(Method::GET, url), "Courses", "trainer")
            .await?;
        tracing::info!("📚 Loaded {} trainer courses", courses.len());
        Ok(courses)
    }

    async fn update_course(&self, id: &str, patch: &CoursePatch) -> Result<Course> {
        patch.validate()?;
        let url = self.endpoint(&["courses", id])?;
        self.fetch(self.request(Method::PATCH, url).json(patch), "Course", id)
            .await
    }

    async fn delete_course(&self, id: &str) -> Result<()> {
        let url = self.endpoint(&["courses", id])?;
        self.execute(self.request(Method::DELETE, url), "Course", id)
            .await
    }

    async fn get_conversations(&self) -> Result<Vec<Conversation>> {
        let url = self.endpoint(&["conversations"])?;
        self.fetch(self.request(Method::GET, url), "Conversations", "all")
            .await
    }

    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<Message> {
        let body = NewMessage {
            text: text.trim().to_string(),
        };
        body.validate()?;
        let url = self.endpoint(&["conversations", conversation_id, "messages"])?;
        self.fetch(
            self.request(Method::POST, url).json(&body),
            "Conversation",
            conversation_id,
        )
        .await
    }

    async fn mark_messages_as_read(&self, message_ids: &[String]) -> Result<()> {
        if message_ids.is_empty() {
            return Ok(());
        }

        let mut tasks = JoinSet::new();
        for id in message_ids {
            let url = self.endpoint(&["messages", id.as_str(), "read"])?;
            let request = self.request(Method::PATCH, url);
            let id = id.clone();
            tasks.spawn(async move {
                let response = request.send().await?;
                check_status(response, "Message", &id).await.map(|_| ())
            });
        }

        // 全部等完再回報第一個錯誤，已成功的不回滾
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let outcome = joined.map_err(MarketplaceError::from).and_then(|r| r);
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                tracing::debug!("✅ Marked {} messages as read", message_ids.len());
                Ok(())
            }
        }
    }

    async fn get_open_shifts(&self) -> Result<Vec<ShiftPosting>> {
        let mut url = self.endpoint(&["shifts"])?;
        url.query_pairs_mut().append_pair("status", "open");

        let raw: Vec<serde_json::Value> =
            self.fetch(self.request(Method::GET, url), "Shifts", "open").await?;
        let mut shifts = ShiftPosting::decode_list(raw);
        let fetched = shifts.len();
        shifts.retain(|s| s.status == ShiftStatus::Open);
        if shifts.len() != fetched {
            tracing::debug!("Dropped {} shifts that are no longer open", fetched - shifts.len());
        }
        Ok(shifts)
    }

    async fn get_worker_profile(&self, worker_id: &str) -> Result<WorkerProfile> {
        let url = self.endpoint(&["workers", worker_id, "profile"])?;
        self.fetch(self.request(Method::GET, url), "Worker", worker_id)
            .await
    }

    async fn get_applications(&self) -> Result<Vec<DspApplication>> {
        let url = self.endpoint(&["dsp-applications"])?;
        self.fetch(self.request(Method::GET, url), "Applications", "all")
            .await
    }

    async fn review_application(
        &self,
        id: &str,
        review: &ApplicationReview,
    ) -> Result<DspApplication> {
        review.validate()?;
        let url = self.endpoint(&["dsp-applications", id])?;
        self.fetch(self.request(Method::PATCH, url).json(review), "Application", id)
            .await
    }
}

#[async_trait]
impl MatchSource for ApiClient {
    async fn load_worker_profile(&self, worker_id: &str) -> Result<WorkerProfile> {
        if worker_id.trim().is_empty() {
            return Err(MarketplaceError::MissingConfigError {
                field: "worker.id".to_string(),
            });
        }
        self.get_worker_profile(worker_id).await
    }

    async fn load_open_shifts(&self) -> Result<Vec<ShiftPosting>> {
        self.get_open_shifts().await
    }
}
