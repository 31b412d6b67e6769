//! # linkpad-core — Editor core for linkpad
//!
//! A byte document stored as a chain of fixed-capacity chunks, cursors that
//! address it, and a keyword scanner that drives highlighting:
//!
//! - **[`grow`]** — `GrowArray`, append-only storage with fallible growth
//! - **[`chunk`]** — `Chunk` nodes and the generational `ChunkArena` holding them
//! - **[`location`]** — `Location` (chunk, offset) cursors and `TextRange`
//! - **[`buffer`]** — `Buffer`: load/save, snapping, movement, byte edits
//! - **[`compact`]** — removal of emptied chunks with cursor repair
//! - **[`keywords`]** — validated `KeywordSet`, plus the built-in C list
//! - **[`scan`]** — single-pass multi-keyword occurrence scanner
//! - **[`highlight`]** — plain/keyword spans for rendering
//! - **[`options`]** — session options and the `set` directive parser
//! - **[`error`]** — the crate-wide `Error` and `Result`
//!
//! Everything is single-threaded and synchronous. A buffer and its cursors
//! belong to one edit session; edits and compaction must not interleave
//! with a scan holding locations into the same buffer.

pub mod buffer;
pub mod chunk;
pub mod compact;
pub mod error;
pub mod grow;
pub mod highlight;
pub mod keywords;
pub mod location;
pub mod options;
pub mod scan;

pub use buffer::{Buffer, Chunks};
pub use chunk::{Chunk, ChunkId};
pub use error::{Error, Result};
pub use grow::GrowArray;
pub use highlight::{Span, spans};
pub use keywords::KeywordSet;
pub use location::{Location, TextRange};
pub use options::Options;
pub use scan::{KeywordMatch, scan, scan_document};
