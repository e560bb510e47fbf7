use crate::core::{ClusterRef, ClusterSnapshot, ContainerApi, TaskDescription};
use crate::utils::error::{DescriberError, Result};

/// What to return when the cluster has no services at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyClusterPolicy {
    /// Fail with `NoServicesFoundError`.
    #[default]
    Error,
    /// Succeed with an empty snapshot.
    EmptySnapshot,
}

/// Walks a cluster's services and collects the tasks of each one.
///
/// Calls are made one after another: ListServices, DescribeServices, then
/// ListTasks/DescribeTasks per service. A service whose tasks cannot be read is
/// logged and left out of the snapshot; any failure before that point fails the
/// whole describe.
pub struct ClusterDescriber<A: ContainerApi> {
    api: A,
    empty_cluster: EmptyClusterPolicy,
}

impl<A: ContainerApi> ClusterDescriber<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            empty_cluster: EmptyClusterPolicy::default(),
        }
    }

    pub fn with_empty_cluster_policy(mut self, policy: EmptyClusterPolicy) -> Self {
        self.empty_cluster = policy;
        self
    }

    pub async fn describe(&self, cluster: &ClusterRef) -> Result<ClusterSnapshot> {
        let name = cluster.name();
        tracing::debug!("Listing services in {}", cluster);

        let service_ids = self.api.list_services(name).await.map_err(|source| {
            DescriberError::ListServicesError {
                cluster: name.to_string(),
                source,
            }
        })?;

        if service_ids.is_empty() {
            return match self.empty_cluster {
                EmptyClusterPolicy::Error => Err(DescriberError::NoServicesFoundError {
                    cluster: name.to_string(),
                }),
                EmptyClusterPolicy::EmptySnapshot => {
                    tracing::info!("No services found in {}, returning empty snapshot", cluster);
                    Ok(ClusterSnapshot::new())
                }
            };
        }

        tracing::debug!("Describing {} services", service_ids.len());
        let services = self
            .api
            .describe_services(name, &service_ids)
            .await
            .map_err(|source| DescriberError::DescribeServicesError {
                cluster: name.to_string(),
                source,
            })?;

        let mut snapshot = ClusterSnapshot::new();
        let mut skipped = 0usize;

        for service in &services {
            match self.list_and_describe_tasks(name, &service.service_name).await {
                Ok(tasks) => {
                    tracing::debug!(
                        "Service {} has {} tasks",
                        service.service_name,
                        tasks.len()
                    );
                    snapshot.insert(service.service_name.clone(), tasks);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::warn!(
                        service = %service.service_name,
                        "Failed to describe tasks, skipping service: {}",
                        e
                    );
                }
            }
        }

        tracing::info!(
            "Described {} services ({} tasks) in {}{}",
            snapshot.len(),
            snapshot.task_count(),
            cluster,
            if skipped > 0 {
                format!(", {} skipped", skipped)
            } else {
                String::new()
            }
        );

        Ok(snapshot)
    }

    /// Tasks of one service in API response order. No task ids is a valid,
    /// empty result.
    pub async fn list_and_describe_tasks(
        &self,
        cluster: &str,
        service_name: &str,
    ) -> Result<Vec<TaskDescription>> {
        let task_ids = self
            .api
            .list_tasks(cluster, service_name)
            .await
            .map_err(|source| DescriberError::ListTasksError {
                cluster: cluster.to_string(),
                service: service_name.to_string(),
                source,
            })?;

        if task_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.api
            .describe_tasks(cluster, &task_ids)
            .await
            .map_err(|source| DescriberError::DescribeTasksError {
                cluster: cluster.to_string(),
                service: service_name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ApiResult, ServiceDescription};
    use crate::utils::error::ApiError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockApi {
        services: Vec<String>,
        tasks: HashMap<String, Vec<String>>,
        failing_list_tasks: Vec<String>,
        fail_list_services: bool,
        fail_describe_services: bool,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl MockApi {
        fn with_services(services: &[(&str, &[&str])]) -> Self {
            Self {
                services: services.iter().map(|(s, _)| s.to_string()).collect(),
                tasks: services
                    .iter()
                    .map(|(s, t)| (s.to_string(), t.iter().map(|t| t.to_string()).collect()))
                    .collect(),
                ..Default::default()
            }
        }

        async fn calls(&self) -> Vec<String> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl ContainerApi for MockApi {
        async fn list_services(&self, cluster: &str) -> ApiResult<Vec<String>> {
            self.calls.lock().await.push(format!("ListServices:{}", cluster));
            if self.fail_list_services {
                return Err(ApiError::new("ListServices", "Cluster not found.")
                    .with_code("ClusterNotFoundException"));
            }
            Ok(self
                .services
                .iter()
                .map(|s| format!("arn:aws:ecs:us-east-1:123456789012:service/{}/{}", cluster, s))
                .collect())
        }

        async fn describe_services(
            &self,
            cluster: &str,
            service_ids: &[String],
        ) -> ApiResult<Vec<ServiceDescription>> {
            self.calls
                .lock()
                .await
                .push(format!("DescribeServices:{}:{}", cluster, service_ids.len()));
            if self.fail_describe_services {
                return Err(ApiError::new("DescribeServices", "throttled"));
            }
            Ok(service_ids
                .iter()
                .map(|arn| ServiceDescription::named(arn.rsplit('/').next().unwrap_or_default()))
                .collect())
        }

        async fn list_tasks(&self, cluster: &str, service_name: &str) -> ApiResult<Vec<String>> {
            self.calls
                .lock()
                .await
                .push(format!("ListTasks:{}:{}", cluster, service_name));
            if self.failing_list_tasks.iter().any(|s| s == service_name) {
                return Err(ApiError::new("ListTasks", "access denied"));
            }
            Ok(self.tasks.get(service_name).cloned().unwrap_or_default())
        }

        async fn describe_tasks(
            &self,
            cluster: &str,
            task_ids: &[String],
        ) -> ApiResult<Vec<TaskDescription>> {
            self.calls
                .lock()
                .await
                .push(format!("DescribeTasks:{}:{}", cluster, task_ids.len()));
            Ok(task_ids.iter().map(TaskDescription::with_arn).collect())
        }
    }

    fn demo_cluster() -> ClusterRef {
        ClusterRef::new("us-east-1", "demo-cluster").unwrap()
    }

    #[tokio::test]
    async fn test_describe_maps_services_to_their_tasks() {
        let api = MockApi::with_services(&[("svcA", &["t1", "t2"]), ("svcB", &[])]);
        let describer = ClusterDescriber::new(api.clone());

        let snapshot = describer.describe(&demo_cluster()).await.unwrap();

        assert_eq!(snapshot.len(), 2);
        let a = snapshot.tasks("svcA").unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0].task_arn.as_deref(), Some("t1"));
        assert_eq!(a[1].task_arn.as_deref(), Some("t2"));
        assert!(snapshot.tasks("svcB").unwrap().is_empty());

        // svcB has no tasks, so DescribeTasks is only issued for svcA
        assert_eq!(
            api.calls().await,
            vec![
                "ListServices:demo-cluster",
                "DescribeServices:demo-cluster:2",
                "ListTasks:demo-cluster:svcA",
                "DescribeTasks:demo-cluster:2",
                "ListTasks:demo-cluster:svcB",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_cluster_is_an_error_by_default() {
        let describer = ClusterDescriber::new(MockApi::default());
        let err = describer.describe(&demo_cluster()).await.unwrap_err();
        assert!(matches!(
            err,
            DescriberError::NoServicesFoundError { ref cluster } if cluster == "demo-cluster"
        ));
    }

    #[tokio::test]
    async fn test_empty_cluster_policy_can_return_empty_snapshot() {
        let api = MockApi::default();
        let describer = ClusterDescriber::new(api.clone())
            .with_empty_cluster_policy(EmptyClusterPolicy::EmptySnapshot);

        let snapshot = describer.describe(&demo_cluster()).await.unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(api.calls().await, vec!["ListServices:demo-cluster"]);
    }

    #[tokio::test]
    async fn test_failed_task_listing_skips_only_that_service() {
        let mut api = MockApi::with_services(&[("web", &["w1"]), ("worker", &["k1"]), ("cron", &[])]);
        api.failing_list_tasks = vec!["worker".to_string()];
        let describer = ClusterDescriber::new(api);

        let snapshot = describer.describe(&demo_cluster()).await.unwrap();

        assert_eq!(snapshot.len(), 2);
        assert!(!snapshot.contains("worker"));
        let names: Vec<&str> = snapshot.service_names().collect();
        assert_eq!(names, vec!["web", "cron"]);
    }

    #[tokio::test]
    async fn test_list_services_failure_is_fatal() {
        let api = MockApi {
            fail_list_services: true,
            ..MockApi::with_services(&[("web", &[])])
        };
        let err = ClusterDescriber::new(api)
            .describe(&demo_cluster())
            .await
            .unwrap_err();

        match err {
            DescriberError::ListServicesError { cluster, source } => {
                assert_eq!(cluster, "demo-cluster");
                assert_eq!(source.code.as_deref(), Some("ClusterNotFoundException"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_describe_services_failure_is_fatal() {
        let api = MockApi {
            fail_describe_services: true,
            ..MockApi::with_services(&[("web", &["w1"])])
        };
        let calls = api.calls.clone();
        let err = ClusterDescriber::new(api)
            .describe(&demo_cluster())
            .await
            .unwrap_err();

        assert!(matches!(err, DescriberError::DescribeServicesError { .. }));
        assert!(!calls.lock().await.iter().any(|c| c.starts_with("ListTasks")));
    }

    #[tokio::test]
    async fn test_list_and_describe_tasks_reports_which_call_failed() {
        let mut api = MockApi::with_services(&[("web", &["w1"])]);
        api.failing_list_tasks = vec!["web".to_string()];
        let describer = ClusterDescriber::new(api);

        let err = describer
            .list_and_describe_tasks("demo-cluster", "web")
            .await
            .unwrap_err();
        match err {
            DescriberError::ListTasksError { service, .. } => assert_eq!(service, "web"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
