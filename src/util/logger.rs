use log::SetLoggerError;

/// The environment variable read for the log filter, e.g. `HEAPVIEW_LOG=trace`.
/// It takes the same syntax as `RUST_LOG`.
pub const LOG_FILTER_ENV: &str = "HEAPVIEW_LOG";

/// Attempt to init a env_logger for heapview, filtered by [`LOG_FILTER_ENV`]
/// and falling back to `info`.
/// Does nothing if the "builtin_env_logger" feature is disabled, in which case
/// the embedder is expected to install its own `log` implementation.
pub fn try_init() -> Result<(), SetLoggerError> {
    cfg_if::cfg_if! {
        if #[cfg(feature = "builtin_env_logger")] {
            env_logger::try_init_from_env(
                env_logger::Env::new().filter_or(LOG_FILTER_ENV, "info"),
            )
        } else {
            Ok(())
        }
    }
}
