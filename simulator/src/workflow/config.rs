use anyhow::Context;
use boardcore::prelude::SessionConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub num_shots: usize,
    pub num_targets: usize,
    pub confidence: f32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub csv_path: PathBuf,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            num_shots: 4,
            num_targets: 5,
            confidence: 0.25,
            frame_width: 1280,
            frame_height: 720,
            csv_path: PathBuf::from("board_results.csv"),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_args(
        num_shots: usize,
        num_targets: usize,
        confidence: f32,
        csv_path: PathBuf,
    ) -> Self {
        Self {
            num_shots,
            num_targets,
            confidence,
            csv_path,
            ..Default::default()
        }
    }

    /// Structural mismatches are fatal before the pipeline starts.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.to_session_config()
            .validate()
            .context("validating workflow config")?;
        Ok(())
    }

    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            num_shots: self.num_shots,
            num_targets: self.num_targets,
            confidence: self.confidence,
            frame_width: self.frame_width,
            frame_height: self.frame_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_session_config() {
        let cfg = WorkflowConfig::from_args(4, 5, 0.3, PathBuf::from("out.csv"));
        let session = cfg.to_session_config();
        assert_eq!(session.num_targets, 5);
        assert_eq!(session.cell_count(), 20);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"num_shots: 3\nnum_targets: 6\nconfidence: 0.4\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.num_shots, 3);
        assert_eq!(cfg.num_targets, 6);
        // Unlisted fields fall back to defaults.
        assert_eq!(cfg.frame_width, 1280);
    }

    #[test]
    fn config_load_rejects_invalid_dimensions() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"num_shots: 0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(WorkflowConfig::load(&path).is_err());
    }
}
