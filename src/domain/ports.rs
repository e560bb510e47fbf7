use crate::domain::model::{ServiceDescription, TaskDescription};
use crate::utils::error::ApiError;
use async_trait::async_trait;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The four container API calls the describer is built from. Implementations
/// return a single page per call and are not expected to retry.
#[async_trait]
pub trait ContainerApi: Send + Sync {
    async fn list_services(&self, cluster: &str) -> ApiResult<Vec<String>>;

    async fn describe_services(
        &self,
        cluster: &str,
        service_ids: &[String],
    ) -> ApiResult<Vec<ServiceDescription>>;

    async fn list_tasks(&self, cluster: &str, service_name: &str) -> ApiResult<Vec<String>>;

    async fn describe_tasks(
        &self,
        cluster: &str,
        task_ids: &[String],
    ) -> ApiResult<Vec<TaskDescription>>;
}

/// Source of the settings needed to run one describe: the CLI flags, a TOML
/// file or the Lambda environment.
pub trait ConfigProvider: Send + Sync {
    fn region(&self) -> &str;
    fn cluster_name(&self) -> &str;
    fn endpoint_url(&self) -> Option<&str>;
    fn profile(&self) -> Option<&str>;
    fn max_attempts(&self) -> Option<u32>;
    fn allow_empty_cluster(&self) -> bool;
}
