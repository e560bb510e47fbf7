#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::adapters::ecs::describe_cluster;
use crate::core::describer::EmptyClusterPolicy;
use crate::core::{ClusterRef, ClusterSnapshot, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::{validate_aws_region, validate_range, validate_url};
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
use serde::{Deserialize, Serialize};

/// Upper bound accepted for `max_attempts`.
pub const MAX_ATTEMPTS_LIMIT: u32 = 10;

/// How the ECS client is built. Region comes from the `ClusterRef`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcsSettings {
    pub endpoint_url: Option<String>,
    pub profile: Option<String>,
    /// Total attempts per remote call, including the first. `None` keeps the
    /// SDK default.
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescribeOptions {
    pub ecs: EcsSettings,
    pub empty_cluster: EmptyClusterPolicy,
}

/// A validated cluster reference together with the options to describe it.
#[derive(Debug, Clone)]
pub struct DescribeRequest {
    pub cluster: ClusterRef,
    pub options: DescribeOptions,
}

impl DescribeRequest {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let cluster = ClusterRef::new(config.region(), config.cluster_name())?;
        validate_ecs_settings(config.endpoint_url(), config.max_attempts())?;
        validate_aws_region("region", cluster.region())?;

        Ok(Self {
            cluster,
            options: DescribeOptions {
                ecs: EcsSettings {
                    endpoint_url: config.endpoint_url().map(str::to_string),
                    profile: config.profile().map(str::to_string),
                    max_attempts: config.max_attempts(),
                },
                empty_cluster: if config.allow_empty_cluster() {
                    EmptyClusterPolicy::EmptySnapshot
                } else {
                    EmptyClusterPolicy::Error
                },
            },
        })
    }

    pub async fn run(&self) -> Result<ClusterSnapshot> {
        describe_cluster(&self.cluster, &self.options).await
    }
}

pub(crate) fn validate_ecs_settings(
    endpoint_url: Option<&str>,
    max_attempts: Option<u32>,
) -> Result<()> {
    if let Some(url) = endpoint_url {
        validate_url("endpoint_url", url)?;
    }
    if let Some(attempts) = max_attempts {
        validate_range("max_attempts", attempts, 1, MAX_ATTEMPTS_LIMIT)?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "ecs-describer")]
#[command(about = "Describe every service of an ECS cluster and its tasks as JSON")]
pub struct CliConfig {
    /// AWS region of the cluster
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Cluster name or ARN
    #[arg(long, env = "ECS_CLUSTER")]
    pub cluster: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Write the snapshot to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Override the ECS endpoint (e.g. http://localhost:4566)
    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Named profile from the shared AWS config files
    #[arg(long)]
    pub profile: Option<String>,

    /// Attempts per remote call, including the first
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Return an empty snapshot instead of failing when the cluster has no services
    #[arg(long)]
    pub allow_empty_cluster: bool,

    /// Print compact JSON instead of indented JSON
    #[arg(long)]
    pub compact: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Fills every unset value from the TOML file. Flags given on the command
    /// line win.
    pub fn merge_file(mut self, file: &toml_config::TomlConfig) -> Self {
        self.region = self.region.or_else(|| file.cluster.region.clone());
        self.cluster = self.cluster.or_else(|| file.cluster.name.clone());
        self.endpoint_url = self.endpoint_url.or_else(|| file.aws.endpoint_url.clone());
        self.profile = self.profile.or_else(|| file.aws.profile.clone());
        self.max_attempts = self.max_attempts.or(file.aws.max_attempts);
        self.output = self.output.or_else(|| file.output.path.clone());
        self.allow_empty_cluster |= file.output.allow_empty_cluster;
        self.compact |= !file.output.pretty;
        self
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn region(&self) -> &str {
        self.region.as_deref().unwrap_or_default()
    }

    fn cluster_name(&self) -> &str {
        self.cluster.as_deref().unwrap_or_default()
    }

    fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    fn allow_empty_cluster(&self) -> bool {
        self.allow_empty_cluster
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.region {
            validate_aws_region("region", region)?;
        }
        validate_ecs_settings(self.endpoint_url.as_deref(), self.max_attempts)?;
        if let Some(output) = self.output.as_deref().filter(|o| *o != "-") {
            validate_path("output", output)?;
        }
        Ok(())
    }
}
