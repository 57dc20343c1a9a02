//! View modules for the GUI
//!
//! Each submodule implements the rendering for one screen as inherent
//! methods on `GuiApp`, called from the main `App::update` loop in `app.rs`.

pub mod airdrop_form;
