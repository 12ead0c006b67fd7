//! # Widget Settings
//!
//! Codec for the per-widget settings blob of the portfolio builder.
//! Stored blobs are intended to be JSON but legacy rows may carry control
//! characters, single-quoted strings, or unquoted keys; decoding tolerates
//! all of that and fails open to default settings, since the blob governs
//! cosmetic rendering only. Encoding always produces strict JSON.

pub mod codec;
pub mod error;
pub mod settings;

// Re-exports
pub use codec::{decode, decode_value, encode};
pub use error::CodecError;
pub use settings::{Alignment, FlexDirection, WidgetSettings};
