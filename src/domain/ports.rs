use crate::domain::model::{MatchInput, MatchReport, ShiftPosting, WorkerProfile};
use crate::domain::records::{
    ApplicationReview, Conversation, Course, CoursePatch, DspApplication, Message,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn worker_id(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn report_filename(&self) -> &str;
    fn min_score(&self) -> u8;
    fn top_n(&self) -> usize;
}

/// 比對流程的資料來源：遠端 API 或本機 JSON
#[async_trait]
pub trait MatchSource: Send + Sync {
    async fn load_worker_profile(&self, worker_id: &str) -> Result<WorkerProfile>;
    async fn load_open_shifts(&self) -> Result<Vec<ShiftPosting>>;
}

/// 後端 REST API 的資料存取層
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn get_trainer_courses(&self) -> Result<Vec<Course>>;
    async fn update_course(&self, id: &str, patch: &CoursePatch) -> Result<Course>;
    async fn delete_course(&self, id: &str) -> Result<()>;

    async fn get_conversations(&self) -> Result<Vec<Conversation>>;
    async fn send_message(&self, conversation_id: &str, text: &str) -> Result<Message>;
    /// 逐筆送出；任一失敗整批失敗，已成功的不回滾
    async fn mark_messages_as_read(&self, message_ids: &[String]) -> Result<()>;

    async fn get_open_shifts(&self) -> Result<Vec<ShiftPosting>>;
    async fn get_worker_profile(&self, worker_id: &str) -> Result<WorkerProfile>;

    async fn get_applications(&self) -> Result<Vec<DspApplication>>;
    async fn review_application(
        &self,
        id: &str,
        review: &ApplicationReview,
    ) -> Result<DspApplication>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<MatchInput>;
    async fn transform(&self, input: MatchInput) -> Result<MatchReport>;
    async fn load(&self, report: MatchReport) -> Result<String>;
}
