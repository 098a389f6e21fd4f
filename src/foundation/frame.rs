use crate::foundation::window::{MAX_STRIDE, Stride};

/// One stride-sized chunk of source bytes and the address it was read from.
///
/// The backing array is fixed at [`MAX_STRIDE`] and reused for every frame of a run;
/// only the first `stride` bytes are meaningful.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Absolute address of byte 0 (stride-aligned).
    pub addr: u32,
    stride: Stride,
    data: [u8; MAX_STRIDE],
}

impl Frame {
    /// Zeroed frame at address 0.
    pub fn new(stride: Stride) -> Self {
        Self {
            addr: 0,
            stride,
            data: [0; MAX_STRIDE],
        }
    }

    /// Frame at `addr` holding `bytes` (zero-padded to the stride). Extra bytes are ignored.
    pub fn with_bytes(stride: Stride, addr: u32, bytes: &[u8]) -> Self {
        let mut frame = Self::new(stride);
        frame.addr = addr;
        let n = bytes.len().min(stride.get());
        frame.data[..n].copy_from_slice(&bytes[..n]);
        frame
    }

    /// Frame size in bytes.
    pub fn stride(&self) -> Stride {
        self.stride
    }

    /// The `stride` meaningful bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.data[..self.stride.get()]
    }

    /// Mutable view of the `stride` meaningful bytes.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data[..self.stride.get()]
    }
}
