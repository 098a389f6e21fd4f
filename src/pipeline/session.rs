use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::frame::Frame,
    foundation::window::ReadWindow,
    pipeline::config::{DumpConfig, OutputMode},
    pipeline::sink::FrameSink,
    render::line::{RenderLine, WidthClass, render_line},
    source::reader::{Source, read_frame},
};

/// Counters collected over one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpStats {
    /// Frames read, rendered and pushed.
    pub frames: u64,
    /// Bytes that came from the source (excludes zero padding).
    pub bytes_sourced: u64,
}

/// Run context: the window plus the frame and line scratch buffers, reused for every
/// frame of the run.
#[derive(Debug)]
pub struct DumpSession {
    config: DumpConfig,
    width: WidthClass,
    window: ReadWindow,
    frame: Frame,
    line: RenderLine,
}

impl DumpSession {
    /// Build the context for `config`.
    pub fn new(config: &DumpConfig) -> BindumpResult<Self> {
        let window = config.window()?;
        Ok(Self {
            config: config.clone(),
            width: config.effective_width(),
            frame: Frame::new(window.stride()),
            line: RenderLine::new(),
            window,
        })
    }

    /// Window of this run.
    pub fn window(&self) -> &ReadWindow {
        &self.window
    }

    /// Layout lines are rendered with.
    pub fn width(&self) -> WidthClass {
        self.width
    }

    /// Walk the window frame by frame: read, render, push to `sink`.
    ///
    /// Raw runs skip rendering and push an empty line. The first failing read, render
    /// or save aborts the run; frames already pushed stay with the sink.
    #[tracing::instrument(
        skip_all,
        fields(
            source = ?self.config.source,
            lower = self.window.lower(),
            upper = self.window.upper(),
            stride = self.window.stride().get(),
        )
    )]
    pub fn run(
        &mut self,
        source: &mut Source<'_>,
        sink: &mut dyn FrameSink,
    ) -> BindumpResult<DumpStats> {
        if source.kind() != self.config.source {
            return Err(BindumpError::invalid_argument(format!(
                "config expects a {:?} source, got {:?}",
                self.config.source,
                source.kind()
            )));
        }

        self.window.rewind();
        let mut stats = DumpStats::default();
        if self.window.is_empty() {
            tracing::debug!("empty window, nothing to dump");
            return Ok(stats);
        }

        sink.begin(&self.window)?;
        while let Some(addr) = self.window.next_frame() {
            self.frame.addr = addr;
            let filled = read_frame(source, &self.window, &mut self.frame)?;
            if self.config.output != OutputMode::Raw {
                render_line(self.width, &self.window, &self.frame, &mut self.line)?;
            }
            sink.push_frame(&self.window, &self.frame, &self.line)?;
            stats.frames += 1;
            stats.bytes_sourced += filled as u64;
        }
        sink.end()?;

        tracing::debug!(
            frames = stats.frames,
            bytes_sourced = stats.bytes_sourced,
            "dump finished"
        );
        Ok(stats)
    }
}

/// One-shot dump of `config` from `source` into `sink`.
pub fn dump(
    config: &DumpConfig,
    source: &mut Source<'_>,
    sink: &mut dyn FrameSink,
) -> BindumpResult<DumpStats> {
    DumpSession::new(config)?.run(source, sink)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
