//! bindump produces windowed hex + ASCII dumps of memory images and files.
//!
//! # Pipeline overview
//!
//! A run walks a byte window `[offset, offset + size)` one stride-sized frame at a time:
//!
//! 1. **Read**: `Source + ReadWindow -> Frame` (bytes outside the window are zero-filled)
//! 2. **Render**: `Frame -> RenderLine` (layout chosen by [`WidthClass`])
//! 3. **Save**: `RenderLine | Frame -> io::Write` (text line, or the raw in-window bytes)
//!
//! [`DumpSession`] owns the window and the fixed-size scratch buffers and drives the loop
//! against a [`FrameSink`]. Any read or write failure ends the run.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **No allocation per frame**: frame and line buffers are fixed arrays reused every frame.
//! - **Caller-owned handles**: the library never opens, creates or closes files.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod pipeline;
mod render;
mod save;
mod source;

pub use foundation::error::{BindumpError, BindumpResult};
pub use foundation::frame::Frame;
pub use foundation::window::{MAX_STRIDE, ReadWindow, Stride, align_down, align_up};
pub use pipeline::config::{DumpConfig, OutputMode};
pub use pipeline::session::{DumpSession, DumpStats, dump};
pub use pipeline::sink::{FrameSink, InMemorySink, RawSink, TextSink};
pub use render::hex::{byte_to_hex, hex_to_byte, nibble_to_hex};
pub use render::line::{
    FIRST_GLYPH, LAST_GLYPH, MAX_LINE_LEN, RenderLine, WidthClass, glyph, render_line,
};
pub use save::saver::{Payload, save};
pub use source::SourceKind;
pub use source::memory::{ADDRESS_SPACE_LIMIT, AddressSpace, FlatMemory};
pub use source::reader::{ByteSource, Source, read_frame};
