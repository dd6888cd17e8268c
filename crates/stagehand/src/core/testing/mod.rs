use tracing::Level;

/// Dummy application context and stub textures for tests.
pub mod dummyctx;
/// Harness driving a scene on the test thread.
pub mod harness;
/// Handlers that record what they receive.
pub mod recorders;

/// Send log output to the test harness's captured output. Safe to call from
/// every test; only the first call installs a subscriber.
pub fn log_to_test_writer() {
    tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_test_writer()
        .try_init()
        .ok();
}
