//! # Onyx Core
//!
//! Modal (Vim-style) key interpretation and command dispatch.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Dispatcher                    │
//! │  ┌─────────────┐  Command  ┌──────────────┐  │
//! │  │ ModalEngine │ ────────► │    Buffer    │  │
//! │  └─────────────┘           └──────────────┘  │
//! │         ▲                   register, events  │
//! └─────────┼────────────────────────────────────┘
//!          Key
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items for cleaner public APIs

pub mod command;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod event;
pub mod key;
pub mod mode;

pub use command::Command;
pub use config::{Config, ConfigError, EditorConfig};
pub use dispatcher::{Dispatcher, Snapshot};
pub use engine::{ModalEngine, Operator};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use key::{Key, KeyParseError, parse_keys};
pub use mode::{CursorShape, Mode};
