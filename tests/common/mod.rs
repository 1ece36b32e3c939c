//! Shared test setup: installs a `tracing` subscriber once so `RUST_LOG`
//! can surface the `trace`/`debug` events the decoder and encoder emit
//! when tests are run with `--nocapture`.

use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
