pub mod config;
pub mod habits;
pub mod reminder;

/// Runtime for commands that drive the async core.
pub(crate) fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
}
