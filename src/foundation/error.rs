/// Convenience result type used across bindump.
pub type BindumpResult<T> = Result<T, BindumpError>;

/// Top-level error taxonomy used by the read/render/save pipeline.
///
/// Every variant is terminal to a dump run: the pipeline never retries and never
/// skips a frame.
#[derive(thiserror::Error, Debug)]
pub enum BindumpError {
    /// Contract violation by the caller (bad stride, overflowing window, invalid config).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested source or mode is not implemented.
    #[error("unsupported: {0}")]
    Unsupported(String),

    /// Seek or read failure on a file source.
    #[error("read error at 0x{addr:06X}: {source}")]
    ReadFailure {
        /// Absolute address of the first byte that could not be read.
        addr: u32,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Short or failed write on the destination.
    #[error("write error at 0x{addr:06X}: {source}")]
    WriteFailure {
        /// Address of the frame being saved.
        addr: u32,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Internal invariant violated or address outside the addressable range.
    #[error("range exceeded: {0}")]
    RangeExceeded(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BindumpError {
    /// Build a [`BindumpError::InvalidArgument`] value.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Build a [`BindumpError::Unsupported`] value.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Build a [`BindumpError::ReadFailure`] value.
    pub fn read_failure(addr: u32, source: std::io::Error) -> Self {
        Self::ReadFailure { addr, source }
    }

    /// Build a [`BindumpError::WriteFailure`] value.
    pub fn write_failure(addr: u32, source: std::io::Error) -> Self {
        Self::WriteFailure { addr, source }
    }

    /// Build a [`BindumpError::RangeExceeded`] value.
    pub fn range_exceeded(msg: impl Into<String>) -> Self {
        Self::RangeExceeded(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
