pub mod canvas;
pub mod config;
pub mod error;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod protocol;
pub mod raster;
pub mod session;
pub mod storage;
pub mod tools;
pub use error::{AppError, AppResult};

use std::io;

/// Serves the line protocol over stdin/stdout until input closes.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting pixpaint");

    let config = config::load_app_config();
    let mut session = session::Session::new(config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    protocol::serve(&mut session, stdin.lock(), stdout.lock())?;

    tracing::info!("session closed");
    Ok(())
}
