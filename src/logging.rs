use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialise logging. When `debug` is set the default level is `debug` and
/// `RUST_LOG` may override it; otherwise the level is pinned to `info`.
/// With `log_file` set, output is appended to that file instead of stdout.
/// Calling this more than once keeps the first subscriber.
pub fn init(debug: bool, log_file: Option<&Path>) {
    // RUST_LOG only applies in debug mode.
    let level = if debug { "debug" } else { "info" };
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    } else {
        EnvFilter::new(level)
    };

    let file_target = log_file.and_then(|path| {
        let file_name = path.file_name()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Some((dir.to_path_buf(), file_name.to_owned()))
    });

    let _ = match file_target {
        Some((dir, file_name)) => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(tracing_appender::rolling::never(dir, file_name))
            .try_init(),
        None => tracing_subscriber::fmt().with_env_filter(filter).try_init(),
    };
}
