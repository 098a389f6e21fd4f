use std::io::Write;

use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::frame::Frame,
    foundation::window::ReadWindow,
    render::line::RenderLine,
};

/// What a single save call persists.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    /// A rendered line; written followed by `\n`.
    Text {
        /// Frame address the line belongs to (for error reporting).
        addr: u32,
        /// The rendered line.
        line: &'a RenderLine,
    },
    /// The in-window bytes of a frame, without the zero padding.
    Raw(&'a Frame),
}

/// Write `payload` to `dest`.
///
/// `dest` is owned by the caller and must already be open; it is never flushed or
/// closed here. A destination that stops accepting bytes fails with
/// [`BindumpError::WriteFailure`], and nothing further is written for this payload.
pub fn save(payload: Payload<'_>, window: &ReadWindow, dest: &mut dyn Write) -> BindumpResult<()> {
    match payload {
        Payload::Text { addr, line } => save_text(addr, line, dest),
        Payload::Raw(frame) => save_raw(frame, window, dest),
    }
}

fn save_text(addr: u32, line: &RenderLine, dest: &mut dyn Write) -> BindumpResult<()> {
    dest.write_all(line.as_bytes())
        .map_err(|e| BindumpError::write_failure(addr, e))?;
    dest.write_all(b"\n")
        .map_err(|e| BindumpError::write_failure(addr, e))
}

fn save_raw(frame: &Frame, window: &ReadWindow, dest: &mut dyn Write) -> BindumpResult<()> {
    let (from, to) = window.clip(frame.addr);
    if from == to {
        return Ok(());
    }
    dest.write_all(&frame.bytes()[from..to])
        .map_err(|e| BindumpError::write_failure(frame.addr, e))
}

#[cfg(test)]
#[path = "../../tests/unit/save/saver.rs"]
mod tests;
