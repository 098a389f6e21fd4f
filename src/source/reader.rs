use std::io::{Read, Seek, SeekFrom};

use crate::{
    foundation::error::{BindumpError, BindumpResult},
    foundation::frame::Frame,
    foundation::window::ReadWindow,
    source::{SourceKind, memory::AddressSpace},
};

/// Seekable byte stream usable as a file source.
pub trait ByteSource: Read + Seek {}

impl<T: Read + Seek> ByteSource for T {}

/// The active data source of a dump run.
///
/// Handles are borrowed: whoever opened the file (or built the memory image) keeps
/// ownership and closes it after the run.
pub enum Source<'a> {
    /// Logical (CPU-visible) memory.
    Logical(&'a dyn AddressSpace),
    /// Physical memory. Not implemented; every read fails with `Unsupported`.
    Physical,
    /// An open file, addressed by byte offset.
    File(&'a mut dyn ByteSource),
}

impl Source<'_> {
    /// Tag of this source.
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Logical(_) => SourceKind::Logical,
            Source::Physical => SourceKind::Physical,
            Source::File(_) => SourceKind::File,
        }
    }
}

impl std::fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Source").field(&self.kind()).finish()
    }
}

/// Fill `frame` with the bytes at `frame.addr` from `source`.
///
/// Bytes outside `window`'s requested range are zeroed rather than read, so a frame
/// straddling the window edge is always fully populated. Returns how many bytes came
/// from the source.
pub fn read_frame(
    source: &mut Source<'_>,
    window: &ReadWindow,
    frame: &mut Frame,
) -> BindumpResult<usize> {
    if frame.stride() != window.stride() {
        return Err(BindumpError::invalid_argument(format!(
            "frame stride {} does not match window stride {}",
            frame.stride().get(),
            window.stride().get()
        )));
    }

    let addr = frame.addr;
    let (from, to) = window.clip(addr);
    // `from` is at most the stride, so this cannot wrap for an in-range frame.
    let start = addr.wrapping_add(from as u32);
    let bytes = frame.bytes_mut();
    bytes.fill(0);

    match source {
        Source::Logical(mem) => {
            if from < to {
                mem.read_into(start, &mut bytes[from..to])?;
            }
        }
        Source::Physical => {
            return Err(BindumpError::unsupported(
                "physical memory source is not implemented",
            ));
        }
        Source::File(file) => {
            if from < to {
                file.seek(SeekFrom::Start(u64::from(start)))
                    .map_err(|e| BindumpError::read_failure(start, e))?;
                file.read_exact(&mut bytes[from..to])
                    .map_err(|e| BindumpError::read_failure(start, e))?;
            }
        }
    }

    let filled = to - from;
    tracing::trace!(addr, filled, "frame read");
    Ok(filled)
}

#[cfg(test)]
#[path = "../../tests/unit/source/reader.rs"]
mod tests;
