use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use serde::Deserialize;
use std::env;

/// Invocation payload. Every field falls back to the function's environment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LambdaRequest {
    pub region: Option<String>,
    pub cluster: Option<String>,
    pub allow_empty_cluster: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub region: String,
    pub cluster: String,
    pub endpoint_url: Option<String>,
    pub max_attempts: Option<u32>,
    pub allow_empty_cluster: bool,
}

impl LambdaConfig {
    pub fn from_request(request: &LambdaRequest) -> Result<Self> {
        let region = request
            .region
            .clone()
            .or_else(|| env::var("ECS_REGION").ok())
            .or_else(|| env::var("AWS_REGION").ok());
        let cluster = request
            .cluster
            .clone()
            .or_else(|| env::var("ECS_CLUSTER").ok());

        Ok(Self {
            region: validate_required_field("region", &region)?.clone(),
            cluster: validate_required_field("cluster", &cluster)?.clone(),
            endpoint_url: env::var("ECS_ENDPOINT_URL").ok(),
            max_attempts: env::var("ECS_MAX_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok()),
            allow_empty_cluster: request.allow_empty_cluster.unwrap_or_else(|| {
                env::var("ECS_ALLOW_EMPTY_CLUSTER")
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(false)
            }),
        })
    }
}

impl ConfigProvider for LambdaConfig {
    fn region(&self) -> &str {
        &self.region
    }

    fn cluster_name(&self) -> &str {
        &self.cluster
    }

    fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    fn profile(&self) -> Option<&str> {
        None
    }

    fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    fn allow_empty_cluster(&self) -> bool {
        self.allow_empty_cluster
    }
}
