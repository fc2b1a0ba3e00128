//! # Tunpu Core Library
//!
//! State machines behind the Tunpu tourism companion, independent of any
//! particular front-end.
//!
//! ## Modules
//!
//! - `lock`: the transient scroll lock that breaks sync feedback loops
//! - `region`: the scrollable-region contract and an animated implementation
//! - `sync`: keeps the hero carousel and the agent strip on one index
//! - `drag`: drag-to-scroll with click suppression
//! - `companion`: the coordinator owning all of the above
//! - `chat`, `generation`: chat history and the text-generation call
//! - `catalog`, `settings`, `theme`: static data, configuration, colours

pub mod catalog;
pub mod chat;
pub mod companion;
pub mod drag;
pub mod generation;
pub mod lock;
pub mod region;
pub mod settings;
pub mod sync;
pub mod theme;

pub use companion::{Companion, Region, View};
pub use settings::Settings;
