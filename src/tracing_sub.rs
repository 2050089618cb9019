use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing::Level;

/// Route tracing output to `log_file` when given, stderr otherwise. The UI
/// owns the terminal, so stderr output is only useful when redirected.
/// Safe to call more than once; later calls are no-ops.
pub fn init(log_file: Option<&Path>) {
    if let Some(path) = log_file {
        match File::create(path) {
            Ok(file) => {
                let _ = tracing_subscriber::fmt()
                    .with_max_level(Level::DEBUG)
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(false)
                    .try_init();
                return;
            }
            Err(err) => {
                eprintln!("could not open log file {}: {err}", path.display());
            }
        }
    }
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
