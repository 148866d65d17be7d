//! Asynchronous file I/O operations.
//!
//! Powered by Tokio for non-blocking I/O.

use std::path::Path;

use tokio::fs as tokio_fs;
use tokio::io::AsyncReadExt;

use crate::detect::decode_buffer;
use crate::error::IoError;

/// Read text from a file with size and binary checks (asynchronous).
///
/// # Arguments
/// * `path` - Path to the file
/// * `max_bytes` - Maximum file size in bytes
///
/// # Returns
/// Decoded text content or an error.
///
/// # Errors
/// `NotFound` when the metadata lookup fails, `TooLarge` above `max_bytes`,
/// `BinaryFile` for NULL bytes, `System` for read failures.
pub async fn read_text_safe_async<P: AsRef<Path>>(
    path: P,
    max_bytes: u64,
) -> Result<String, IoError> {
    let path = path.as_ref();

    let metadata = tokio_fs::metadata(path)
        .await
        .map_err(|_| IoError::NotFound(path.to_string_lossy().to_string()))?;

    if metadata.len() > max_bytes {
        return Err(IoError::TooLarge(metadata.len(), max_bytes));
    }

    let mut file = tokio_fs::File::open(path).await?;
    let mut buffer = Vec::with_capacity(usize::try_from(metadata.len()).unwrap_or(0));
    file.read_to_end(&mut buffer).await?;

    decode_buffer(buffer)
}

/// Overwrite a file in place with `content` (asynchronous).
///
/// No backup is taken. Existing permissions are whatever the platform
/// keeps for an in-place truncate-and-write.
///
/// # Errors
/// Returns `IoError::System` when the write fails.
pub async fn write_text_async<P: AsRef<Path>>(path: P, content: &str) -> Result<(), IoError> {
    let path = path.as_ref();
    tokio_fs::write(path, content.as_bytes()).await?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}
