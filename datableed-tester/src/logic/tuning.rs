use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use datableed_game::{ConfigError, TuningConfig, TuningSource};

/// Tuning read from a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileTuning {
    path: PathBuf,
}

impl FileTuning {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FileTuningError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl TuningSource for FileTuning {
    type Error = FileTuningError;

    fn load_tuning(&self) -> Result<TuningConfig, Self::Error> {
        let raw = std::fs::read_to_string(&self.path).map_err(|source| FileTuningError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(TuningConfig::from_json(&raw)?)
    }
}

/// Resolve the tuning bundle for a run, preferring an explicit file.
pub fn resolve_tuning(path: Option<&Path>) -> Result<TuningConfig> {
    match path {
        Some(path) => {
            let tuning = FileTuning::new(path)
                .load_tuning()
                .with_context(|| format!("loading tuning from {}", path.display()))?;
            log::info!("using tuning from {}", path.display());
            Ok(tuning)
        }
        None => Ok(TuningConfig::load_from_static()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(label: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "datableed-tuning-{label}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn file_tuning_overrides_defaults() {
        let path = temp_file("ok", r#"{"trust":{"starting_score":70,"passive_decay_per_scene":2}}"#);
        let tuning = resolve_tuning(Some(&path)).unwrap();
        assert_eq!(tuning.trust.starting_score, 70);
        assert_eq!(tuning.trust.passive_decay_per_scene, 2);
        assert_eq!(tuning.narration, TuningConfig::default().narration);
    }

    #[test]
    fn invalid_file_surfaces_config_error() {
        let path = temp_file("bad", r#"{"trust":{"bad_decision_penalty_fraction":1.5}}"#);
        let err = FileTuning::new(&path).load_tuning().unwrap_err();
        assert!(matches!(
            err,
            FileTuningError::Config(ConfigError::FractionOutOfRange { .. })
        ));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = resolve_tuning(Some(Path::new("/nonexistent/tuning.json"))).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/tuning.json"));
    }

    #[test]
    fn no_path_uses_embedded_tuning() {
        assert_eq!(resolve_tuning(None).unwrap(), TuningConfig::default());
    }
}
