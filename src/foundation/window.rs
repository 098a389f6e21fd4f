use crate::foundation::error::{BindumpError, BindumpResult};

/// Largest frame size the fixed scratch buffers are sized for.
pub const MAX_STRIDE: usize = 16;

/// Round `value` down to a multiple of `stride` (a power of two).
pub fn align_down(value: u32, stride: u32) -> u32 {
    value & !(stride - 1)
}

/// Round `value` up to a multiple of `stride` (a power of two), or `None` on overflow.
pub fn align_up(value: u32, stride: u32) -> Option<u32> {
    value
        .checked_add(stride - 1)
        .map(|v| align_down(v, stride))
}

/// Number of bytes fetched and rendered as one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stride(u8);

impl Stride {
    /// Eight-byte frames (narrow displays).
    pub const EIGHT: Stride = Stride(8);
    /// Sixteen-byte frames.
    pub const SIXTEEN: Stride = Stride(16);

    /// Validate a stride: a power of two no larger than [`MAX_STRIDE`].
    pub fn new(bytes: usize) -> BindumpResult<Self> {
        if bytes == 0 || !bytes.is_power_of_two() || bytes > MAX_STRIDE {
            return Err(BindumpError::invalid_argument(format!(
                "stride must be a power of two in 1..={MAX_STRIDE}, got {bytes}"
            )));
        }
        Ok(Self(bytes as u8))
    }

    /// Stride as a byte count.
    pub fn get(self) -> usize {
        usize::from(self.0)
    }

    fn as_u32(self) -> u32 {
        u32::from(self.0)
    }
}

/// Requested byte window and its stride-aligned outer bounds.
///
/// `lower..upper` is what the caller asked for (half-open). `begin..end` is the same
/// window rounded outward to stride boundaries, which is what actually gets visited.
/// The cursor walks `begin..end` one stride at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadWindow {
    stride: Stride,
    lower: u32,
    upper: u32,
    begin: u32,
    end: u32,
    cursor: u32,
}

impl ReadWindow {
    /// Build the window `[offset, offset + size)` for the given stride.
    pub fn new(stride: Stride, offset: u32, size: u32) -> BindumpResult<Self> {
        let upper = offset.checked_add(size).ok_or_else(|| {
            BindumpError::invalid_argument(format!(
                "window 0x{offset:X}+0x{size:X} overflows the 32-bit address range"
            ))
        })?;
        let end = align_up(upper, stride.as_u32()).ok_or_else(|| {
            BindumpError::invalid_argument(format!(
                "window end 0x{upper:X} cannot be aligned to stride {}",
                stride.get()
            ))
        })?;
        let begin = align_down(offset, stride.as_u32());

        Ok(Self {
            stride,
            lower: offset,
            upper,
            begin,
            end,
            cursor: begin,
        })
    }

    /// Frame size for this run.
    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// First requested address (inclusive).
    pub fn lower(&self) -> u32 {
        self.lower
    }

    /// End of the requested range (exclusive).
    pub fn upper(&self) -> u32 {
        self.upper
    }

    /// `lower` rounded down to the stride.
    pub fn begin(&self) -> u32 {
        self.begin
    }

    /// `upper` rounded up to the stride.
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Address of the next frame to visit.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// `true` if no byte was requested.
    pub fn is_empty(&self) -> bool {
        self.lower == self.upper
    }

    /// Half-open membership test against the requested range.
    pub fn contains(&self, addr: u32) -> bool {
        self.lower <= addr && addr < self.upper
    }

    /// Same test for `frame_addr + index`, without wrapping past `u32::MAX`.
    pub fn contains_offset(&self, frame_addr: u32, index: usize) -> bool {
        u32::try_from(index)
            .ok()
            .and_then(|i| frame_addr.checked_add(i))
            .is_some_and(|addr| self.contains(addr))
    }

    /// Sub-range `from..to` of a frame at `frame_addr` that lies inside the window.
    ///
    /// Returns an empty range (`from == to`) when the frame does not overlap.
    pub fn clip(&self, frame_addr: u32) -> (usize, usize) {
        let stride = self.stride.get();
        let from = (self.lower.saturating_sub(frame_addr) as usize).min(stride);
        let to = (self.upper.saturating_sub(frame_addr) as usize).min(stride);
        (from, to.max(from))
    }

    /// Number of frames between `begin` and `end`.
    pub fn frame_count(&self) -> u32 {
        (self.end - self.begin) / self.stride.as_u32()
    }

    /// Return the current cursor and advance it by one stride, or `None` once `end` is reached.
    pub fn next_frame(&mut self) -> Option<u32> {
        if self.cursor >= self.end {
            return None;
        }
        let addr = self.cursor;
        // `end` is stride-aligned, so the cursor saturates exactly at it.
        self.cursor = self.cursor.saturating_add(self.stride.as_u32());
        Some(addr)
    }

    /// Put the cursor back at `begin`.
    pub fn rewind(&mut self) {
        self.cursor = self.begin;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/window.rs"]
mod tests;
