//! Share-link codecs.
//!
//! - `text`: lossless compression to a URL-safe alphabet
//! - `projection`: canonical payload without session-local fields
//! - `envelope`: versioned `{version, data}` wrapper with legacy fallback

pub mod envelope;
pub mod projection;
pub mod text;
