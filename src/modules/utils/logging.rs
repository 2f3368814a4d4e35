use env_logger::{Builder, WriteStyle};
use log::{error, info, warn, LevelFilter};
use std::fs::OpenOptions;
use std::path::Path;

/// Initialize the logging system, appending to a file next to the stored
/// data. `RUST_LOG` overrides the level picked here.
pub fn init_logging(verbose: bool, log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp_secs()
        .format_module_path(true)
        .write_style(WriteStyle::Auto)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;

    info!("Logging system initialized");
    Ok(())
}

/// Log authentication events
pub fn log_auth_event(event_type: &str, email: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            "Auth event: type={}, account={}, success=true, details={:?}",
            event_type,
            format_sensitive(email),
            details
        );
    } else {
        warn!(
            "Auth event: type={}, account={}, success=false, details={:?}",
            event_type,
            format_sensitive(email),
            details
        );
    }
}

/// Log durable-store operations
pub fn log_store_event(operation: &str, key: &str, success: bool, details: Option<&str>) {
    if success {
        info!(
            "Store operation: op={}, key={}, success=true, details={:?}",
            operation, key, details
        );
    } else {
        error!(
            "Store operation: op={}, key={}, success=false, details={:?}",
            operation, key, details
        );
    }
}

/// Format sensitive data for logging (show only first 2 and last 2 characters)
fn format_sensitive(data: &str) -> String {
    let chars: Vec<char> = data.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
