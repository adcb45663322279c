//! # Onyx Buffer
//!
//! Rope-backed text document with a single cursor, an optional visual
//! selection and grouped undo history.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `Buffer` owns the rope, the cursor and the history
//! - Queries take `&self`; mutations require `&mut self` (exclusive access)
//!
//! ### Infallible API
//! - Out-of-range requests are clamped, never reported as errors
//! - The only panic is [`Buffer::line`] with an index past the last line

mod buffer;
mod cursor;
mod history;
mod selection;

pub use buffer::{Buffer, BufferConfig};
pub use cursor::{ColumnBound, Position};
pub use history::{Edit, EditGroup, EditKind, History};
pub use selection::Selection;
