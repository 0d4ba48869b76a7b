//! # qrforge
//!
//! A Rust library for generating QR codes (ISO/IEC 18004, model 2, versions 1-40) with
//! Reed-Solomon error correction.
//!
//! ## Features
//!
//! - **Optimal segmentation**: Text is split into numeric, alphanumeric and byte segments, and the
//!   shortest of several candidate segmentations is kept
//! - **Automatic sizing**: The smallest version that holds the data is picked unless one is pinned
//! - **Reed-Solomon Error Correction**: Built-in error correction with configurable levels (L, M, Q, H)
//! - **Mask selection**: All 8 masks are scored with the standard penalty rules and the lowest wins
//! - **Stage snapshots**: Observe the symbol after each assembly stage
//! - **Rendering**: Grayscale or colored images, fit-to-size images, and terminal strings
//!
//! ## Quick Start
//!
//! ### Simple QR Code Generation
//!
//! ```rust,no_run
//! use qrforge::QRBuilder;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Simplest usage - provide only text, all other settings are automatically chosen
//! let qr = QRBuilder::new("Hello, World!").build()?;
//!
//! let img = qr.render(4); // 4px per module
//! img.save("simple_qr.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrforge::{ECLevel, MaskPattern, QRBuilder, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new("Hello, World!")
//!     .version(Version::new(2))     // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)         // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))    // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! assert_eq!(qr.width(), 25);
//! println!("{}", qr.to_str(1));
//! # Ok(())
//! # }
//! ```
//!
//! ### One call
//!
//! ```rust
//! use qrforge::{encode, ECLevel, QRError};
//!
//! let qr = encode("HELLO WORLD", ECLevel::Q, None, None).unwrap();
//! assert_eq!(*qr.version(), 1);
//!
//! assert_eq!(encode("", ECLevel::L, None, None).unwrap_err(), QRError::EmptyData);
//! assert_eq!(encode("x", ECLevel::L, Some(41), None).unwrap_err(), QRError::InvalidVersion(41));
//! ```
//!
//! ## QR Code Components
//!
//! ### Versions
//! - Versions 1-40, with sizes from 21x21 to 177x177 modules
//!
//! ### Error Correction Levels
//! - **L (Low)**: ~7% error correction
//! - **M (Medium)**: ~15% error correction
//! - **Q (Quartile)**: ~25% error correction
//! - **H (High)**: ~30% error correction
//!
//! ### Logging
//!
//! Every pipeline stage emits `tracing` events. The library never installs a subscriber.

#![allow(clippy::items_after_test_module)]

pub mod builder;
pub(crate) mod common;
pub mod render;

pub use builder::{Module, QRBuilder, Stage, StageSink, State, QR};
pub use common::codec::{Mode, Strategy};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Metadata, Version};
pub use render::{Palette, QUIET_ZONE};

// Encodes text into a finished symbol. Without a version the smallest fitting
// one is used, without a mask the lowest penalty one is chosen.
pub fn encode(
    text: &str,
    ec_level: ECLevel,
    version: Option<usize>,
    mask: Option<u8>,
) -> QRResult<QR> {
    let mut builder = QRBuilder::new(text);
    builder.ec_level(ec_level);
    if let Some(v) = version {
        builder.version(Version::try_from(v)?);
    }
    if let Some(m) = mask {
        builder.mask(MaskPattern::try_from(m)?);
    }
    builder.build()
}
