use crate::config::{DescribeOptions, EcsSettings};
use crate::core::describer::ClusterDescriber;
use crate::core::{
    ApiResult, ClusterRef, ClusterSnapshot, ContainerApi, ServiceDescription, TaskDescription,
};
use crate::adapters::wire::{self, JsonObject};
use crate::domain::model::ContainerDescription;
use crate::utils::error::{ApiError, DescriberError, Result};
use async_trait::async_trait;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_ecs::config::{ProvideCredentials, Region};
use aws_sdk_ecs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecs::types::{Container, Failure, Service, Task};
use aws_sdk_ecs::Client as EcsClient;

/// `ContainerApi` backed by the Amazon ECS SDK client.
#[derive(Debug, Clone)]
pub struct EcsContainerApi {
    client: EcsClient,
}

impl EcsContainerApi {
    pub fn from_client(client: EcsClient) -> Self {
        Self { client }
    }

    /// Builds a client for `region` from the shared AWS configuration chain
    /// (environment, profile files, container or instance metadata).
    pub async fn connect(region: &str, settings: &EcsSettings) -> Result<Self> {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));

        if let Some(profile) = &settings.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = &settings.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }
        if let Some(max_attempts) = settings.max_attempts {
            loader = loader.retry_config(RetryConfig::standard().with_max_attempts(max_attempts));
        }

        let sdk_config = loader.load().await;
        ensure_credentials(&sdk_config, region).await?;

        tracing::debug!(
            "Created ECS client for {} (endpoint override: {})",
            region,
            settings.endpoint_url.as_deref().unwrap_or("none")
        );
        Ok(Self::from_client(EcsClient::new(&sdk_config)))
    }
}

#[async_trait]
impl ContainerApi for EcsContainerApi {
    async fn list_services(&self, cluster: &str) -> ApiResult<Vec<String>> {
        let output = self
            .client
            .list_services()
            .cluster(cluster)
            .send()
            .await
            .map_err(|e| api_error("ListServices", e))?;

        if output.next_token.is_some() {
            tracing::debug!("ListServices returned more than one page; only the first is used");
        }
        Ok(output.service_arns.unwrap_or_default())
    }

    async fn describe_services(
        &self,
        cluster: &str,
        service_ids: &[String],
    ) -> ApiResult<Vec<ServiceDescription>> {
        let output = self
            .client
            .describe_services()
            .cluster(cluster)
            .set_services(Some(service_ids.to_vec()))
            .send()
            .await
            .map_err(|e| api_error("DescribeServices", e))?;

        log_failures("DescribeServices", output.failures.unwrap_or_default());
        Ok(output
            .services
            .unwrap_or_default()
            .into_iter()
            .filter_map(service_description)
            .collect())
    }

    async fn list_tasks(&self, cluster: &str, service_name: &str) -> ApiResult<Vec<String>> {
        let output = self
            .client
            .list_tasks()
            .cluster(cluster)
            .service_name(service_name)
            .send()
            .await
            .map_err(|e| api_error("ListTasks", e))?;

        Ok(output.task_arns.unwrap_or_default())
    }

    async fn describe_tasks(
        &self,
        cluster: &str,
        task_ids: &[String],
    ) -> ApiResult<Vec<TaskDescription>> {
        let output = self
            .client
            .describe_tasks()
            .cluster(cluster)
            .set_tasks(Some(task_ids.to_vec()))
            .send()
            .await
            .map_err(|e| api_error("DescribeTasks", e))?;

        log_failures("DescribeTasks", output.failures.unwrap_or_default());
        Ok(output
            .tasks
            .unwrap_or_default()
            .into_iter()
            .map(task_description)
            .collect())
    }
}

/// Connects to ECS in the cluster's region and describes the cluster.
pub async fn describe_cluster(
    cluster: &ClusterRef,
    options: &DescribeOptions,
) -> Result<ClusterSnapshot> {
    let api = EcsContainerApi::connect(cluster.region(), &options.ecs).await?;
    ClusterDescriber::new(api)
        .with_empty_cluster_policy(options.empty_cluster)
        .describe(cluster)
        .await
}

/// The SDK resolves credentials lazily, so a missing or broken chain would
/// otherwise only show up as a failed ListServices.
async fn ensure_credentials(sdk_config: &SdkConfig, region: &str) -> Result<()> {
    let client_init_error = |message: String| DescriberError::ClientInitError {
        region: region.to_string(),
        message,
    };

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| client_init_error("no credentials provider configured".to_string()))?;
    provider
        .provide_credentials()
        .await
        .map_err(|e| client_init_error(DisplayErrorContext(&e).to_string()))?;
    Ok(())
}

fn api_error<E, R>(operation: &'static str, err: SdkError<E, R>) -> ApiError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let message = err
        .message()
        .map(str::to_string)
        .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
    let api_err = ApiError::new(operation, message);
    match err.code() {
        Some(code) => api_err.with_code(code),
        None => api_err,
    }
}

fn log_failures(operation: &str, failures: Vec<Failure>) {
    for failure in failures {
        tracing::warn!(
            "{} reported a failure for {}: {}{}",
            operation,
            failure.arn.as_deref().unwrap_or("<unknown>"),
            failure.reason.as_deref().unwrap_or("no reason given"),
            failure
                .detail
                .map(|d| format!(" ({})", d))
                .unwrap_or_default()
        );
    }
}

/// Service ARNs end in `service/<cluster>/<name>` (or `service/<name>` in
/// the old format).
fn service_name_from_arn(arn: &str) -> Option<&str> {
    arn.rsplit('/').next().filter(|name| !name.is_empty() && !name.contains(':'))
}

fn service_description(service: Service) -> Option<ServiceDescription> {
    let name = service
        .service_name
        .clone()
        .or_else(|| {
            service
                .service_arn
                .as_deref()
                .and_then(service_name_from_arn)
                .map(str::to_string)
        });

    let Some(service_name) = name else {
        tracing::warn!("DescribeServices returned a service without name or ARN, ignoring it");
        return None;
    };

    let extra = JsonObject::new()
        .opt("clusterArn", service.cluster_arn)
        .list("loadBalancers", service.load_balancers, wire::load_balancer)
        .list(
            "serviceRegistries",
            service.service_registries,
            wire::service_registry,
        )
        .with("desiredCount", service.desired_count)
        .with("runningCount", service.running_count)
        .with("pendingCount", service.pending_count)
        .list(
            "capacityProviderStrategy",
            service.capacity_provider_strategy,
            wire::capacity_provider_strategy_item,
        )
        .opt("platformVersion", service.platform_version)
        .opt("platformFamily", service.platform_family)
        .object(
            "deploymentConfiguration",
            service.deployment_configuration,
            wire::deployment_configuration,
        )
        .list("taskSets", service.task_sets, wire::task_set)
        .list("deployments", service.deployments, wire::deployment)
        .opt("roleArn", service.role_arn)
        .list("events", service.events, wire::service_event)
        .time("createdAt", service.created_at)
        .list(
            "placementConstraints",
            service.placement_constraints,
            wire::placement_constraint,
        )
        .list(
            "placementStrategy",
            service.placement_strategy,
            wire::placement_strategy,
        )
        .object(
            "networkConfiguration",
            service.network_configuration,
            wire::network_configuration,
        )
        .opt(
            "healthCheckGracePeriodSeconds",
            service.health_check_grace_period_seconds,
        )
        .opt(
            "schedulingStrategy",
            service.scheduling_strategy.as_ref().map(|s| s.as_str()),
        )
        .object(
            "deploymentController",
            service.deployment_controller,
            wire::deployment_controller,
        )
        .list("tags", service.tags, wire::tag)
        .opt("createdBy", service.created_by)
        .with("enableECSManagedTags", service.enable_ecs_managed_tags)
        .opt(
            "propagateTags",
            service.propagate_tags.as_ref().map(|p| p.as_str()),
        )
        .with("enableExecuteCommand", service.enable_execute_command)
        .opt(
            "availabilityZoneRebalancing",
            service
                .availability_zone_rebalancing
                .as_ref()
                .map(|a| a.as_str()),
        )
        .into_fields();

    Some(ServiceDescription {
        service_name,
        service_arn: service.service_arn,
        status: service.status,
        launch_type: service.launch_type.map(|lt| lt.as_str().to_string()),
        task_definition: service.task_definition,
        extra,
    })
}

fn container_description(container: Container) -> ContainerDescription {
    let extra = JsonObject::new()
        .opt("taskArn", container.task_arn)
        .opt("imageDigest", container.image_digest)
        .opt("runtimeId", container.runtime_id)
        .list(
            "networkBindings",
            container.network_bindings,
            wire::network_binding,
        )
        .list(
            "networkInterfaces",
            container.network_interfaces,
            wire::network_interface,
        )
        .list("managedAgents", container.managed_agents, wire::managed_agent)
        .opt("cpu", container.cpu)
        .opt("memory", container.memory)
        .opt("memoryReservation", container.memory_reservation)
        .opt("gpuIds", container.gpu_ids.filter(|ids| !ids.is_empty()))
        .into_fields();

    ContainerDescription {
        name: container.name,
        container_arn: container.container_arn,
        image: container.image,
        last_status: container.last_status,
        health_status: container.health_status.map(|h| h.as_str().to_string()),
        exit_code: container.exit_code,
        reason: container.reason,
        extra,
    }
}

fn task_description(task: Task) -> TaskDescription {
    let extra = JsonObject::new()
        .list("attachments", task.attachments, wire::attachment)
        .list("attributes", task.attributes, wire::attribute)
        .opt("capacityProviderName", task.capacity_provider_name)
        .opt("clusterArn", task.cluster_arn)
        .opt("connectivity", task.connectivity.as_ref().map(|c| c.as_str()))
        .time("connectivityAt", task.connectivity_at)
        .opt("containerInstanceArn", task.container_instance_arn)
        .with("enableExecuteCommand", task.enable_execute_command)
        .time("executionStoppedAt", task.execution_stopped_at)
        .list(
            "inferenceAccelerators",
            task.inference_accelerators,
            wire::inference_accelerator,
        )
        .object("overrides", task.overrides, wire::task_override)
        .opt("platformVersion", task.platform_version)
        .opt("platformFamily", task.platform_family)
        .time("pullStartedAt", task.pull_started_at)
        .time("pullStoppedAt", task.pull_stopped_at)
        .opt("stopCode", task.stop_code.as_ref().map(|c| c.as_str()))
        .time("stoppingAt", task.stopping_at)
        .list("tags", task.tags, wire::tag)
        .with("version", task.version)
        .object(
            "ephemeralStorage",
            task.ephemeral_storage,
            wire::ephemeral_storage,
        )
        .object(
            "fargateEphemeralStorage",
            task.fargate_ephemeral_storage,
            wire::task_ephemeral_storage,
        )
        .into_fields();

    TaskDescription {
        task_arn: task.task_arn,
        task_definition_arn: task.task_definition_arn,
        last_status: task.last_status,
        desired_status: task.desired_status,
        health_status: task.health_status.map(|h| h.as_str().to_string()),
        launch_type: task.launch_type.map(|lt| lt.as_str().to_string()),
        cpu: task.cpu,
        memory: task.memory,
        group: task.group,
        availability_zone: task.availability_zone,
        started_by: task.started_by,
        created_at: wire::timestamp(task.created_at),
        started_at: wire::timestamp(task.started_at),
        stopped_at: wire::timestamp(task.stopped_at),
        stopped_reason: task.stopped_reason,
        containers: task
            .containers
            .unwrap_or_default()
            .into_iter()
            .map(container_description)
            .collect(),
        extra,
    }
}
