use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{BindumpError, BindumpResult};

/// Size of the flat address space memory sources live in (24-bit).
pub const ADDRESS_SPACE_LIMIT: u32 = 1 << 24;

/// Directly addressable memory, as seen by the logical-memory source.
pub trait AddressSpace {
    /// Copy `out.len()` bytes starting at `addr` into `out`.
    ///
    /// Implementations fail with [`BindumpError::RangeExceeded`] when any requested byte
    /// lies outside the addressable extent.
    fn read_into(&self, addr: u32, out: &mut [u8]) -> BindumpResult<()>;
}

/// A byte image mapped at `base` inside the 24-bit address space.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatMemory {
    base: u32,
    data: Vec<u8>,
    origin: Option<PathBuf>,
}

impl FlatMemory {
    /// Map `data` at `base`.
    pub fn new(base: u32, data: Vec<u8>) -> BindumpResult<Self> {
        let end = u64::from(base) + data.len() as u64;
        if end > u64::from(ADDRESS_SPACE_LIMIT) {
            return Err(BindumpError::invalid_argument(format!(
                "memory image of {} bytes at 0x{base:06X} does not fit the 24-bit address space",
                data.len()
            )));
        }
        Ok(Self {
            base,
            data,
            origin: None,
        })
    }

    /// Load an image file and map it at `base`.
    pub fn load(path: impl AsRef<Path>, base: u32) -> BindumpResult<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)
            .with_context(|| format!("read memory image '{}'", path.display()))?;
        let mut mem = Self::new(base, data)?;
        mem.origin = Some(path.to_path_buf());
        Ok(mem)
    }

    /// First mapped address.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Number of mapped bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// `true` if nothing is mapped.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// File the image was loaded from, if any.
    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl AddressSpace for FlatMemory {
    fn read_into(&self, addr: u32, out: &mut [u8]) -> BindumpResult<()> {
        let start = addr
            .checked_sub(self.base)
            .map(|rel| rel as usize)
            .filter(|rel| rel.saturating_add(out.len()) <= self.data.len())
            .ok_or_else(|| {
                BindumpError::range_exceeded(format!(
                    "0x{addr:06X}+{} is outside mapped memory 0x{:06X}..0x{:06X}",
                    out.len(),
                    self.base,
                    u64::from(self.base) + self.data.len() as u64
                ))
            })?;
        out.copy_from_slice(&self.data[start..start + out.len()]);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/memory.rs"]
mod tests;
