use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenCfg {
    pub out_dir: PathBuf,     // "dataset"
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub interval_ms: u64,     // pause between samples
    pub samples: Option<u32>, // None: run until killed
    pub seed: Option<u64>,    // None: fresh OS entropy
    pub max_attempts: u32,
    pub fallback_margin: f64,
    pub font_dir: PathBuf,
    pub write_manifest: bool,
}

impl Default for GenCfg {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("dataset"),
            canvas_width: 800,
            canvas_height: 600,
            interval_ms: 2000,
            samples: None,
            seed: None,
            max_attempts: layout::placer::MAX_ATTEMPTS,
            fallback_margin: layout::placer::FALLBACK_MARGIN,
            font_dir: PathBuf::from("assets/fonts"),
            write_manifest: true,
        }
    }
}

impl GenCfg {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: GenCfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            bail!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width,
                self.canvas_height
            );
        }
        if self.interval_ms == 0 {
            bail!("interval_ms must be positive");
        }
        if !self.fallback_margin.is_finite() || self.fallback_margin < 0.0 {
            bail!("fallback_margin must be a non-negative number");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"canvas_width": 400, "samples": 3, "seed": 9}"#).unwrap();

        let cfg = GenCfg::load(&path).unwrap();
        assert_eq!(cfg.canvas_width, 400);
        assert_eq!(cfg.canvas_height, 600);
        assert_eq!(cfg.samples, Some(3));
        assert_eq!(cfg.seed, Some(9));
        assert_eq!(cfg.max_attempts, 1000);
        assert_eq!(cfg.out_dir, PathBuf::from("dataset"));
    }

    #[test]
    fn bad_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        std::fs::write(&path, r#"{"canvas_height": 0}"#).unwrap();
        assert!(GenCfg::load(&path).is_err());

        std::fs::write(&path, r#"{"interval_ms": 0}"#).unwrap();
        assert!(GenCfg::load(&path).is_err());

        std::fs::write(&path, "{ not json").unwrap();
        assert!(GenCfg::load(&path).is_err());
    }
}
