//! Lossless text compressor with a URL-safe output alphabet.
//!
//! Text is DEFLATE-compressed and then encoded as unpadded URL-safe base64,
//! so the result only contains `[A-Za-z0-9_-]` and can be placed in a query
//! string without percent-encoding. Empty input maps to empty output in both
//! directions.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::Compression;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;

use prompt_builder_types::error::CompressionError;

/// Upper bound on inflated output. Share links and stores are far smaller;
/// anything larger is treated as corrupt.
pub const MAX_DECOMPRESSED_BYTES: u64 = 8 * 1024 * 1024;

/// Compress `text` into a URL-safe string.
pub fn compress(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    match deflate(text.as_bytes()) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(err) => {
            // Writing into a Vec does not fail in practice.
            tracing::error!("deflate into memory buffer failed: {err}");
            String::new()
        }
    }
}

/// Decompress a string produced by [`compress`].
///
/// Malformed input yields an empty string.
pub fn decompress(encoded: &str) -> String {
    match try_decompress(encoded) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!("discarding undecodable payload: {err}");
            String::new()
        }
    }
}

/// Like [`decompress`], but reports why the input could not be decoded.
pub fn try_decompress(encoded: &str) -> Result<String, CompressionError> {
    if encoded.is_empty() {
        return Ok(String::new());
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(encoded.as_bytes())
        .map_err(|e| CompressionError::InvalidEncoding(e.to_string()))?;

    let mut inflated = Vec::new();
    DeflateDecoder::new(bytes.as_slice())
        .take(MAX_DECOMPRESSED_BYTES + 1)
        .read_to_end(&mut inflated)
        .map_err(|e| CompressionError::Inflate(e.to_string()))?;

    if inflated.len() as u64 > MAX_DECOMPRESSED_BYTES {
        return Err(CompressionError::Inflate(format!(
            "output exceeds {MAX_DECOMPRESSED_BYTES} bytes"
        )));
    }

    String::from_utf8(inflated).map_err(|_| CompressionError::InvalidUtf8)
}

fn deflate(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::best());
    encoder.write_all(bytes)?;
    encoder.finish()
}
