//! JSON renderings of ECS SDK shapes that have no `Serialize` impl.
//!
//! Keys use the ECS wire names. Absent values and empty lists are omitted,
//! which is what the service itself does.

use crate::domain::model::ExtraFields;
use aws_sdk_ecs::primitives::DateTime as SmithyDateTime;
use aws_sdk_ecs::types::{
    Attachment, Attribute, CapacityProviderStrategyItem, ContainerOverride, Deployment,
    DeploymentConfiguration, DeploymentController, EphemeralStorage, InferenceAccelerator,
    InferenceAcceleratorOverride, KeyValuePair, LoadBalancer, ManagedAgent, NetworkBinding,
    NetworkConfiguration, NetworkInterface, PlacementConstraint, PlacementStrategy,
    ServiceEvent, ServiceRegistry, Tag, TaskEphemeralStorage, TaskOverride, TaskSet,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

/// Builder for a JSON object that skips absent fields.
#[derive(Debug, Default)]
pub(crate) struct JsonObject(ExtraFields);

impl JsonObject {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub(crate) fn opt(self, key: &str, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.with(key, value),
            None => self,
        }
    }

    pub(crate) fn time(self, key: &str, value: Option<SmithyDateTime>) -> Self {
        self.opt(key, timestamp(value).map(rfc3339))
    }

    pub(crate) fn list<T>(self, key: &str, items: Option<Vec<T>>, render: fn(T) -> Value) -> Self {
        match items.filter(|items| !items.is_empty()) {
            Some(items) => self.with(key, items.into_iter().map(render).collect::<Vec<_>>()),
            None => self,
        }
    }

    pub(crate) fn object<T>(self, key: &str, value: Option<T>, render: fn(T) -> Value) -> Self {
        self.opt(key, value.map(render))
    }

    pub(crate) fn into_fields(self) -> ExtraFields {
        self.0
    }

    fn build(self) -> Value {
        Value::Object(self.0)
    }
}

pub(crate) fn timestamp(value: Option<SmithyDateTime>) -> Option<DateTime<Utc>> {
    value.and_then(|dt| DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos()))
}

/// Same format chrono's serde impl uses for the modelled timestamps.
fn rfc3339(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

pub(crate) fn tag(tag: Tag) -> Value {
    JsonObject::new()
        .opt("key", tag.key)
        .opt("value", tag.value)
        .build()
}

fn key_value(pair: KeyValuePair) -> Value {
    JsonObject::new()
        .opt("name", pair.name)
        .opt("value", pair.value)
        .build()
}

pub(crate) fn attachment(attachment: Attachment) -> Value {
    JsonObject::new()
        .opt("id", attachment.id)
        .opt("type", attachment.r#type)
        .opt("status", attachment.status)
        .list("details", attachment.details, key_value)
        .build()
}

pub(crate) fn attribute(attribute: Attribute) -> Value {
    JsonObject::new()
        .with("name", attribute.name)
        .opt("value", attribute.value)
        .opt("targetType", attribute.target_type.as_ref().map(|t| t.as_str()))
        .opt("targetId", attribute.target_id)
        .build()
}

pub(crate) fn inference_accelerator(accelerator: InferenceAccelerator) -> Value {
    JsonObject::new()
        .with("deviceName", accelerator.device_name)
        .with("deviceType", accelerator.device_type)
        .build()
}

fn inference_accelerator_override(accelerator: InferenceAcceleratorOverride) -> Value {
    JsonObject::new()
        .opt("deviceName", accelerator.device_name)
        .opt("deviceType", accelerator.device_type)
        .build()
}

pub(crate) fn ephemeral_storage(storage: EphemeralStorage) -> Value {
    JsonObject::new().with("sizeInGiB", storage.size_in_gib).build()
}

pub(crate) fn task_ephemeral_storage(storage: TaskEphemeralStorage) -> Value {
    JsonObject::new()
        .with("sizeInGiB", storage.size_in_gib)
        .opt("kmsKeyId", storage.kms_key_id)
        .build()
}

fn container_override(container: ContainerOverride) -> Value {
    let environment_files = container.environment_files.map(|files| {
        files
            .into_iter()
            .map(|file| {
                JsonObject::new()
                    .with("value", file.value)
                    .with("type", file.r#type.as_str())
                    .build()
            })
            .collect::<Vec<_>>()
    });
    let resource_requirements = container.resource_requirements.map(|requirements| {
        requirements
            .into_iter()
            .map(|requirement| {
                JsonObject::new()
                    .with("value", requirement.value)
                    .with("type", requirement.r#type.as_str())
                    .build()
            })
            .collect::<Vec<_>>()
    });

    JsonObject::new()
        .opt("name", container.name)
        .opt("command", container.command)
        .list("environment", container.environment, key_value)
        .opt("environmentFiles", environment_files.filter(|f| !f.is_empty()))
        .opt("cpu", container.cpu)
        .opt("memory", container.memory)
        .opt("memoryReservation", container.memory_reservation)
        .opt(
            "resourceRequirements",
            resource_requirements.filter(|r| !r.is_empty()),
        )
        .build()
}

pub(crate) fn task_override(overrides: TaskOverride) -> Value {
    JsonObject::new()
        .list("containerOverrides", overrides.container_overrides, container_override)
        .opt("cpu", overrides.cpu)
        .list(
            "inferenceAcceleratorOverrides",
            overrides.inference_accelerator_overrides,
            inference_accelerator_override,
        )
        .opt("executionRoleArn", overrides.execution_role_arn)
        .opt("memory", overrides.memory)
        .opt("taskRoleArn", overrides.task_role_arn)
        .object("ephemeralStorage", overrides.ephemeral_storage, ephemeral_storage)
        .build()
}

pub(crate) fn network_binding(binding: NetworkBinding) -> Value {
    JsonObject::new()
        .opt("bindIP", binding.bind_ip)
        .opt("containerPort", binding.container_port)
        .opt("hostPort", binding.host_port)
        .opt("protocol", binding.protocol.as_ref().map(|p| p.as_str()))
        .opt("containerPortRange", binding.container_port_range)
        .opt("hostPortRange", binding.host_port_range)
        .build()
}

pub(crate) fn network_interface(interface: NetworkInterface) -> Value {
    JsonObject::new()
        .opt("attachmentId", interface.attachment_id)
        .opt("privateIpv4Address", interface.private_ipv4_address)
        .opt("ipv6Address", interface.ipv6_address)
        .build()
}

pub(crate) fn managed_agent(agent: ManagedAgent) -> Value {
    JsonObject::new()
        .time("lastStartedAt", agent.last_started_at)
        .opt("name", agent.name.as_ref().map(|n| n.as_str()))
        .opt("reason", agent.reason)
        .opt("lastStatus", agent.last_status)
        .build()
}

pub(crate) fn load_balancer(balancer: LoadBalancer) -> Value {
    JsonObject::new()
        .opt("targetGroupArn", balancer.target_group_arn)
        .opt("loadBalancerName", balancer.load_balancer_name)
        .opt("containerName", balancer.container_name)
        .opt("containerPort", balancer.container_port)
        .build()
}

pub(crate) fn service_registry(registry: ServiceRegistry) -> Value {
    JsonObject::new()
        .opt("registryArn", registry.registry_arn)
        .opt("port", registry.port)
        .opt("containerName", registry.container_name)
        .opt("containerPort", registry.container_port)
        .build()
}

pub(crate) fn capacity_provider_strategy_item(item: CapacityProviderStrategyItem) -> Value {
    JsonObject::new()
        .with("capacityProvider", item.capacity_provider)
        .with("weight", item.weight)
        .with("base", item.base)
        .build()
}

pub(crate) fn network_configuration(config: NetworkConfiguration) -> Value {
    let awsvpc = config.awsvpc_configuration.map(|vpc| {
        JsonObject::new()
            .with("subnets", vpc.subnets)
            .opt("securityGroups", vpc.security_groups)
            .opt("assignPublicIp", vpc.assign_public_ip.as_ref().map(|a| a.as_str()))
            .build()
    });
    JsonObject::new().opt("awsvpcConfiguration", awsvpc).build()
}

pub(crate) fn deployment_configuration(config: DeploymentConfiguration) -> Value {
    let circuit_breaker = config.deployment_circuit_breaker.map(|breaker| {
        JsonObject::new()
            .with("enable", breaker.enable)
            .with("rollback", breaker.rollback)
            .build()
    });
    JsonObject::new()
        .opt("deploymentCircuitBreaker", circuit_breaker)
        .opt("maximumPercent", config.maximum_percent)
        .opt("minimumHealthyPercent", config.minimum_healthy_percent)
        .build()
}

pub(crate) fn deployment_controller(controller: DeploymentController) -> Value {
    JsonObject::new()
        .with("type", controller.r#type.as_str())
        .build()
}

pub(crate) fn deployment(deployment: Deployment) -> Value {
    JsonObject::new()
        .opt("id", deployment.id)
        .opt("status", deployment.status)
        .opt("taskDefinition", deployment.task_definition)
        .with("desiredCount", deployment.desired_count)
        .with("pendingCount", deployment.pending_count)
        .with("runningCount", deployment.running_count)
        .with("failedTasks", deployment.failed_tasks)
        .time("createdAt", deployment.created_at)
        .time("updatedAt", deployment.updated_at)
        .list(
            "capacityProviderStrategy",
            deployment.capacity_provider_strategy,
            capacity_provider_strategy_item,
        )
        .opt("launchType", deployment.launch_type.as_ref().map(|l| l.as_str()))
        .opt("platformVersion", deployment.platform_version)
        .opt("platformFamily", deployment.platform_family)
        .object(
            "networkConfiguration",
            deployment.network_configuration,
            network_configuration,
        )
        .opt("rolloutState", deployment.rollout_state.as_ref().map(|r| r.as_str()))
        .opt("rolloutStateReason", deployment.rollout_state_reason)
        .build()
}

pub(crate) fn task_set(task_set: TaskSet) -> Value {
    JsonObject::new()
        .opt("id", task_set.id)
        .opt("taskSetArn", task_set.task_set_arn)
        .opt("serviceArn", task_set.service_arn)
        .opt("clusterArn", task_set.cluster_arn)
        .opt("startedBy", task_set.started_by)
        .opt("externalId", task_set.external_id)
        .opt("status", task_set.status)
        .opt("taskDefinition", task_set.task_definition)
        .with("computedDesiredCount", task_set.computed_desired_count)
        .with("pendingCount", task_set.pending_count)
        .with("runningCount", task_set.running_count)
        .time("createdAt", task_set.created_at)
        .time("updatedAt", task_set.updated_at)
        .opt("launchType", task_set.launch_type.as_ref().map(|l| l.as_str()))
        .opt("platformVersion", task_set.platform_version)
        .list("loadBalancers", task_set.load_balancers, load_balancer)
        .opt(
            "stabilityStatus",
            task_set.stability_status.as_ref().map(|s| s.as_str()),
        )
        .time("stabilityStatusAt", task_set.stability_status_at)
        .build()
}

pub(crate) fn service_event(event: ServiceEvent) -> Value {
    JsonObject::new()
        .opt("id", event.id)
        .time("createdAt", event.created_at)
        .opt("message", event.message)
        .build()
}

pub(crate) fn placement_constraint(constraint: PlacementConstraint) -> Value {
    JsonObject::new()
        .opt("type", constraint.r#type.as_ref().map(|t| t.as_str()))
        .opt("expression", constraint.expression)
        .build()
}

pub(crate) fn placement_strategy(strategy: PlacementStrategy) -> Value {
    JsonObject::new()
        .opt("type", strategy.r#type.as_ref().map(|t| t.as_str()))
        .opt("field", strategy.field)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ecs::types::{AssignPublicIp, AwsVpcConfiguration, TransportProtocol};

    #[test]
    fn test_absent_fields_and_empty_lists_are_omitted() {
        let value = attachment(Attachment::builder().id("eni-attach-1").build());
        assert_eq!(value, serde_json::json!({ "id": "eni-attach-1" }));
    }

    #[test]
    fn test_wire_names_are_kept() {
        let binding = network_binding(
            NetworkBinding::builder()
                .bind_ip("0.0.0.0")
                .container_port(8080)
                .protocol(TransportProtocol::Tcp)
                .build(),
        );
        assert_eq!(binding["bindIP"], "0.0.0.0");
        assert_eq!(binding["containerPort"], 8080);
        assert_eq!(binding["protocol"], "tcp");

        let storage = ephemeral_storage(EphemeralStorage::builder().size_in_gib(30).build());
        assert_eq!(storage["sizeInGiB"], 30);
    }

    #[test]
    fn test_nested_network_configuration() {
        let vpc = AwsVpcConfiguration::builder()
            .subnets("subnet-1")
            .assign_public_ip(AssignPublicIp::Disabled)
            .build()
            .unwrap();
        let value = network_configuration(
            NetworkConfiguration::builder()
                .awsvpc_configuration(vpc)
                .build(),
        );
        assert_eq!(value["awsvpcConfiguration"]["subnets"][0], "subnet-1");
        assert_eq!(value["awsvpcConfiguration"]["assignPublicIp"], "DISABLED");
    }

    #[test]
    fn test_timestamps_render_as_rfc3339() {
        let event = service_event(
            ServiceEvent::builder()
                .id("e1")
                .created_at(SmithyDateTime::from_secs(1_714_564_800))
                .message("has reached a steady state.")
                .build(),
        );
        assert_eq!(event["createdAt"], "2024-05-01T12:00:00Z");
    }
}
