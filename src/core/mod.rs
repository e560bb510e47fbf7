pub mod describer;

pub use crate::domain::model::{ClusterRef, ServiceDescription, TaskDescription};
pub use crate::domain::ports::{ApiResult, ConfigProvider, ContainerApi};
pub use crate::domain::snapshot::ClusterSnapshot;
pub use crate::utils::error::Result;
