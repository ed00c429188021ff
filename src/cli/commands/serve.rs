//! Serve command: host the browser version.

use std::path::PathBuf;

use colored::Colorize;

use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::error::FocusError;
use crate::server::{self, ServerOptions};

/// Merge command-line and `PORT` overrides into the server settings.
#[must_use]
pub fn server_options(args: ServeArgs, config: &Config) -> ServerOptions {
    ServerOptions {
        bind: args.bind.unwrap_or_else(|| config.server.bind.clone()),
        port: args.port.unwrap_or(config.server.port),
        root: args
            .root
            .unwrap_or_else(|| PathBuf::from(&config.server.root)),
    }
}

/// Execute the serve command. Blocks until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the root is missing or the server fails.
pub fn serve(args: ServeArgs, config: &Config) -> Result<String, FocusError> {
    let options = server_options(args, config);
    if !options.root.is_dir() {
        return Err(FocusError::Server(format!(
            "Root directory {} does not exist",
            options.root.display()
        )));
    }
    if !options.root.join("index.html").is_file() {
        log::warn!("No index.html in {}", options.root.display());
    }

    println!(
        "{} http://{}:{}/ {}",
        "Serving".green().bold(),
        options.bind,
        options.port,
        "(Ctrl-C to stop)".dimmed()
    );
    server::run_blocking(options)?;
    Ok("Server stopped".dimmed().to_string())
}
