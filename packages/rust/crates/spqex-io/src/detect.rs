//! Source content checks.
//!
//! A rewrite must reproduce every untouched byte, so content is only
//! accepted when it decodes exactly: no NULL bytes in the sniffed prefix
//! and valid UTF-8 throughout.

use memchr::memchr;

use crate::error::IoError;

/// Bytes inspected for NULL when sniffing binary content.
const SNIFF_LEN: usize = 8192;

/// Whether the first 8KB of `buffer` contain a NULL byte.
#[must_use]
pub fn is_binary(buffer: &[u8]) -> bool {
    memchr(0, &buffer[..buffer.len().min(SNIFF_LEN)]).is_some()
}

/// Decode a source buffer without loss.
///
/// # Errors
/// `IoError::BinaryFile` when binary content is detected,
/// `IoError::InvalidUtf8` with the offset of the first bad byte otherwise.
pub fn decode_buffer(buffer: Vec<u8>) -> Result<String, IoError> {
    if is_binary(&buffer) {
        return Err(IoError::BinaryFile);
    }
    String::from_utf8(buffer).map_err(|e| IoError::InvalidUtf8(e.utf8_error().valid_up_to()))
}
