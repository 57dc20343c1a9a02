//! GUI module for the Tsend application
//!
//! This module provides the graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - Main GuiApp struct, form state, and the frame loop
//! - `async_job` - Background job polling for the GUI thread
//! - `theme` - Centralized theme and styling (AppTheme)
//! - `helpers` - Formatting helpers for amounts, addresses, and hashes
//! - `notifications` - Notification entries for the activity strip
//! - `views` - View rendering (the airdrop form)
//!
//! ## Usage
//!
//! ```no_run
//! use tsend::config::Config;
//! use tsend::gui;
//!
//! let config = Config::default();
//! gui::launch(config).expect("Failed to launch GUI");
//! ```

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;

// Re-export main public API
pub use app::{launch, GuiApp};

// Re-export commonly used types from submodules for convenience
pub use async_job::AsyncJob;
pub use notifications::{NotificationEntry, NotificationLevel};
pub use theme::{configure_style, AppTheme};
