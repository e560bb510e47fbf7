use crate::domain::model::TaskDescription;
use crate::utils::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Service name to task descriptions, in the order services were enumerated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClusterSnapshot {
    services: IndexMap<String, Vec<TaskDescription>>,
}

impl ClusterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a service's tasks. A repeated name replaces the earlier tasks
    /// but keeps its original position.
    pub fn insert(&mut self, service_name: impl Into<String>, tasks: Vec<TaskDescription>) {
        self.services.insert(service_name.into(), tasks);
    }

    pub fn tasks(&self, service_name: &str) -> Option<&[TaskDescription]> {
        self.services.get(service_name).map(Vec::as_slice)
    }

    pub fn contains(&self, service_name: &str) -> bool {
        self.services.contains_key(service_name)
    }

    pub fn service_names(&self) -> impl Iterator<Item = &str> {
        self.services.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[TaskDescription])> {
        self.services
            .iter()
            .map(|(name, tasks)| (name.as_str(), tasks.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    pub fn task_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
