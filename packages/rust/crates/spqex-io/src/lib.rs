#![allow(clippy::doc_markdown)]

//! spqex-io - File I/O for spqex
//!
//! Reads Go sources with safety checks, discovers them under a root
//! directory and writes rewritten sources back in place.
//!
//! # Features
//!
//! - **Safety**: Binary detection & Size limits
//! - **Discovery**: Extension filter with `testdata` and hidden-directory pruning
//! - **Async**: Reads and writes go through `tokio::fs`
//!
//! # Architecture
//!
//! ```text
//! spqex-io/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # IoError enum
//! ├── detect.rs   # Binary detection & decoding
//! ├── discover.rs # Source file discovery (walkdir)
//! └── async_io.rs # Asynchronous read/write (Tokio)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use spqex_io::{discover_go_files, read_text_safe_async};
//!
//! for path in discover_go_files("./internal")? {
//!     let source = read_text_safe_async(&path, 1024 * 1024).await?;
//! }
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod async_io;
mod detect;
mod discover;
mod error;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use async_io::{read_text_safe_async, write_text_async};
pub use detect::{decode_buffer, is_binary};
pub use discover::{DiscoverOptions, discover_files, discover_go_files};
pub use error::IoError;

/// Default maximum size of a source file that will be read (1MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024;
