//! term-deck: a terminal side panel that hosts a deck of external
//! destinations in switchable embedded panes. Sessions persist across
//! switches, shortcuts cycle with a debounce, the toolbar reorders by drag,
//! and an optional split shows two destinations side by side.

pub mod app;
pub mod catalog;
pub mod commands;
pub mod components;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod frames;
pub mod keybindings;
pub mod registry;
pub mod reorder;
pub mod selection;
pub mod shortcuts;
pub mod split;
pub mod store;
pub mod testing;
pub mod theme;
pub mod toolbar;
pub mod tracing_sub;
pub mod ui;

pub use app::App;
pub use catalog::{Catalog, Target};
pub use error::PersistError;
