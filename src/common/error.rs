use thiserror::Error;

use super::codec::Mode;

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error, PartialEq, Eq, Copy, Clone)]
pub enum QRError {
    #[error("Empty data")]
    EmptyData,

    #[error("Mode {0:?} is not supported by the encoder")]
    UnsupportedMode(Mode),

    #[error("Data too long to fit in any version up to 40")]
    CapacityExceeded,

    #[error("Data requires version {required} but version {pinned} was pinned")]
    InvalidPinnedVersion { required: usize, pinned: usize },

    #[error("Invalid version {0}, expected 1 to 40")]
    InvalidVersion(usize),

    #[error("Invalid masking pattern {0}, expected 0 to 7")]
    InvalidMask(u8),

    #[error("Render target of {target}px is smaller than the {required}px needed")]
    RenderTargetTooSmall { target: u32, required: u32 },
}

pub type QRResult<T> = Result<T, QRError>;
