use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

/// Where rendered frames go. Every call replaces the previous frame.
pub trait ChartTarget {
    fn present(&mut self, svg: &str) -> Result<()>;
}

/// Keeps the latest frame in a single SVG file, swapped in atomically so a viewer
/// never sees a half-written chart.
pub struct SvgFileTarget {
    path: PathBuf,
    frames: usize,
}

impl SvgFileTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            frames: 0,
        }
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl ChartTarget for SvgFileTarget {
    fn present(&mut self, svg: &str) -> Result<()> {
        let staging = self.path.with_extension("svg.part");
        std::fs::write(&staging, svg)
            .with_context(|| format!("writing {}", staging.display()))?;
        std::fs::rename(&staging, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        self.frames += 1;
        debug!(path = %self.path.display(), frame = self.frames, "chart frame written");
        Ok(())
    }
}
