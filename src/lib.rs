//! hexdump - terminal hex/ASCII grid viewer
//!
//! The library holds the navigation core (grid geometry, cursor paging,
//! command history, theme) and the terminal rendering used by the binary.

pub mod app;
pub mod buffer;
pub mod config;
pub mod grid;
pub mod logging;
pub mod settings;
pub mod ui;
