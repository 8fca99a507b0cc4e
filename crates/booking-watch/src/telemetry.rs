use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "booking_watch=info";

/// Filter from `RUST_LOG`, falling back to `default_filter`.
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Install the global subscriber. Called once by the binary; library code only emits events.
pub fn init(default_filter: &str) {
    tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::subscriber::DefaultGuard;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Log output collected for the current thread while the value is alive
    pub(crate) struct CapturedLogs {
        buffer: SharedBuffer,
        _guard: DefaultGuard,
    }

    impl CapturedLogs {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.buffer.0.lock().unwrap().clone()).unwrap()
        }
    }

    /// Route events on this thread into a buffer. Pair with the default
    /// single-threaded `#[tokio::test]` runtime.
    pub(crate) fn capture_logs() -> CapturedLogs {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        CapturedLogs {
            buffer,
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }

    #[test]
    fn test_capture_collects_error_events() {
        let logs = capture_logs();
        tracing::error!("snapshot unavailable");
        assert!(logs.contents().contains("ERROR"));
        assert!(logs.contents().contains("snapshot unavailable"));
    }
}
