pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

#[cfg(feature = "lambda")]
pub use crate::config::lambda::{LambdaConfig, LambdaRequest};

pub use crate::adapters::ecs::{describe_cluster, EcsContainerApi};
pub use crate::adapters::output::OutputTarget;
pub use crate::config::{DescribeOptions, DescribeRequest, EcsSettings};
pub use crate::core::describer::{ClusterDescriber, EmptyClusterPolicy};
pub use crate::core::{
    ClusterRef, ClusterSnapshot, ContainerApi, ServiceDescription, TaskDescription,
};
pub use crate::utils::error::{ApiError, DescriberError, Result};
