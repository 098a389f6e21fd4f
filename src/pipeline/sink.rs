use std::io::Write;

use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::frame::Frame,
    foundation::window::ReadWindow,
    render::line::RenderLine,
    save::saver::{Payload, save},
};

/// Consumer of rendered frames, in increasing address order.
pub trait FrameSink {
    /// Called once before the first frame.
    fn begin(&mut self, _window: &ReadWindow) -> BindumpResult<()> {
        Ok(())
    }

    /// Push one frame together with its rendered line.
    fn push_frame(
        &mut self,
        window: &ReadWindow,
        frame: &Frame,
        line: &RenderLine,
    ) -> BindumpResult<()>;

    /// Called once after the last frame.
    fn end(&mut self) -> BindumpResult<()> {
        Ok(())
    }
}

/// Writes each rendered line plus a newline (display or text file).
#[derive(Debug)]
pub struct TextSink<W: Write> {
    dest: W,
    end_addr: u32,
}

impl<W: Write> TextSink<W> {
    /// Wrap an open destination.
    pub fn new(dest: W) -> Self {
        Self { dest, end_addr: 0 }
    }

    /// Return the destination.
    pub fn into_inner(self) -> W {
        self.dest
    }
}

impl<W: Write> FrameSink for TextSink<W> {
    fn begin(&mut self, window: &ReadWindow) -> BindumpResult<()> {
        self.end_addr = window.end();
        Ok(())
    }

    fn push_frame(
        &mut self,
        window: &ReadWindow,
        frame: &Frame,
        line: &RenderLine,
    ) -> BindumpResult<()> {
        save(
            Payload::Text {
                addr: frame.addr,
                line,
            },
            window,
            &mut self.dest,
        )
    }

    fn end(&mut self) -> BindumpResult<()> {
        self.dest
            .flush()
            .map_err(|e| BindumpError::write_failure(self.end_addr, e))
    }
}

/// Writes only the in-window bytes of each frame.
#[derive(Debug)]
pub struct RawSink<W: Write> {
    dest: W,
    end_addr: u32,
}

impl<W: Write> RawSink<W> {
    /// Wrap an open destination.
    pub fn new(dest: W) -> Self {
        Self { dest, end_addr: 0 }
    }

    /// Return the destination.
    pub fn into_inner(self) -> W {
        self.dest
    }
}

impl<W: Write> FrameSink for RawSink<W> {
    fn begin(&mut self, window: &ReadWindow) -> BindumpResult<()> {
        self.end_addr = window.end();
        Ok(())
    }

    fn push_frame(
        &mut self,
        window: &ReadWindow,
        frame: &Frame,
        _line: &RenderLine,
    ) -> BindumpResult<()> {
        save(Payload::Raw(frame), window, &mut self.dest)
    }

    fn end(&mut self) -> BindumpResult<()> {
        self.dest
            .flush()
            .map_err(|e| BindumpError::write_failure(self.end_addr, e))
    }
}

/// In-memory sink for tests and embedding.
#[derive(Debug, Default)]
pub struct InMemorySink {
    lines: Vec<String>,
    raw: Vec<u8>,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines, Latin-1 decoded.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Concatenated in-window bytes of all frames.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, _window: &ReadWindow) -> BindumpResult<()> {
        self.lines.clear();
        self.raw.clear();
        Ok(())
    }

    fn push_frame(
        &mut self,
        window: &ReadWindow,
        frame: &Frame,
        line: &RenderLine,
    ) -> BindumpResult<()> {
        self.lines.push(line.to_latin1_string());
        save(Payload::Raw(frame), window, &mut self.raw)
    }
}
