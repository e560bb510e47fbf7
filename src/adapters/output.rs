use crate::utils::error::Result;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// Where the rendered snapshot goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    pub fn from_path(path: Option<&str>) -> Self {
        match path {
            None | Some("-") => Self::Stdout,
            Some(path) => Self::File(PathBuf::from(path)),
        }
    }

    pub fn write(&self, content: &str) -> Result<()> {
        match self {
            Self::Stdout => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                handle.write_all(content.as_bytes())?;
                handle.write_all(b"\n")?;
                handle.flush()?;
            }
            Self::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                fs::write(path, content)?;
                tracing::debug!("Wrote {} bytes to {}", content.len(), path.display());
            }
        }
        Ok(())
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Stdout => "stdout".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }
}
