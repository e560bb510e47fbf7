use crate::core::ConfigProvider;
use crate::utils::error::{DescriberError, Result};
use crate::utils::validation::{validate_aws_region, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub cluster: ClusterSection,
    #[serde(default)]
    pub aws: AwsSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSection {
    pub region: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwsSection {
    pub endpoint_url: Option<String>,
    pub profile: Option<String>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    #[serde(default)]
    pub allow_empty_cluster: bool,
}

fn default_pretty() -> bool {
    true
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: None,
            pretty: default_pretty(),
            allow_empty_cluster: false,
        }
    }
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(DescriberError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| DescriberError::InvalidConfigValueError {
            field: "toml".to_string(),
            value: String::new(),
            reason: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value. Unset variables are left
    /// as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| DescriberError::config(e.to_string()))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn region(&self) -> &str {
        self.cluster.region.as_deref().unwrap_or_default()
    }

    fn cluster_name(&self) -> &str {
        self.cluster.name.as_deref().unwrap_or_default()
    }

    fn endpoint_url(&self) -> Option<&str> {
        self.aws.endpoint_url.as_deref()
    }

    fn profile(&self) -> Option<&str> {
        self.aws.profile.as_deref()
    }

    fn max_attempts(&self) -> Option<u32> {
        self.aws.max_attempts
    }

    fn allow_empty_cluster(&self) -> bool {
        self.output.allow_empty_cluster
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(region) = &self.cluster.region {
            validate_aws_region("cluster.region", region)?;
        }
        super::validate_ecs_settings(self.aws.endpoint_url.as_deref(), self.aws.max_attempts)?;
        if let Some(path) = &self.output.path {
            validate_path("output.path", path)?;
        }
        Ok(())
    }
}
