#![windows_subsystem = "windows"]

use anyhow::Result;
use tsend::{config::Config, gui};
use tracing_subscriber;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    // Default config - the GUI loads the saved draft and network selection
    let config = Config::default();
    gui::launch(config)?;

    Ok(())
}
