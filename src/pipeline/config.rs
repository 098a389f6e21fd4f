use std::path::Path;

use anyhow::Context as _;

use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::window::ReadWindow,
    render::line::WidthClass,
    source::SourceKind,
};

/// Where rendered frames go.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Rendered lines to an interactive display.
    #[default]
    Display,
    /// Rendered lines to a text file.
    Text,
    /// In-window bytes, unrendered, to a binary file.
    Raw,
}

/// Resolved settings of one dump run.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DumpConfig {
    /// Data source to read from.
    pub source: SourceKind,
    /// First byte to dump.
    #[serde(default)]
    pub offset: u32,
    /// Number of bytes to dump.
    pub size: u32,
    /// Layout for display output. File outputs always use [`WidthClass::File`].
    #[serde(default = "default_width")]
    pub width: WidthClass,
    /// Output kind.
    #[serde(default)]
    pub output: OutputMode,
}

fn default_width() -> WidthClass {
    WidthClass::File
}

impl DumpConfig {
    /// Display dump of `[offset, offset + size)` from `source`.
    pub fn new(source: SourceKind, offset: u32, size: u32, width: WidthClass) -> Self {
        Self {
            source,
            offset,
            size,
            width,
            output: OutputMode::Display,
        }
    }

    /// Replace the output mode.
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Load a config from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> BindumpResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        Ok(cfg)
    }

    /// Layout actually used for rendering.
    pub fn effective_width(&self) -> WidthClass {
        match self.output {
            OutputMode::Display => self.width,
            OutputMode::Text | OutputMode::Raw => WidthClass::File,
        }
    }

    /// Window described by this config, at the stride of the effective width class.
    pub fn window(&self) -> BindumpResult<ReadWindow> {
        ReadWindow::new(self.effective_width().stride(), self.offset, self.size)
    }

    /// Check that the window can be built and the source is readable.
    pub fn validate(&self) -> BindumpResult<()> {
        self.window()?;
        if self.source == SourceKind::Physical {
            return Err(BindumpError::unsupported(
                "physical memory source is not implemented",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
