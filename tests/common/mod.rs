#![allow(dead_code)]

pub mod runtime {
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Configure the may runtime and install a test tracing subscriber
    /// exactly once per test binary.
    pub fn setup() {
        INIT.call_once(|| {
            may::config().set_stack_size(0x10000);
            let _ = tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .with_test_writer()
                .try_init();
        });
    }
}

pub mod servlets {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use appcontainer::{Servlet, ServletConfig, ServletRequest, ServletResponse};
    use may::sync::mpsc;
    use serde_json::json;

    /// Echoes the request path and body back, tagged with a marker taken
    /// from the `marker` init-parameter.
    pub struct EchoServlet {
        marker: String,
        calls: Arc<AtomicUsize>,
        inits: Arc<AtomicUsize>,
    }

    impl EchoServlet {
        pub fn new() -> Self {
            Self::with_counters(Arc::new(AtomicUsize::new(0)), Arc::new(AtomicUsize::new(0)))
        }

        pub fn with_marker(marker: &str) -> Self {
            let mut servlet = Self::new();
            servlet.marker = marker.to_string();
            servlet
        }

        pub fn with_counters(calls: Arc<AtomicUsize>, inits: Arc<AtomicUsize>) -> Self {
            Self {
                marker: "echo".to_string(),
                calls,
                inits,
            }
        }
    }

    impl Default for EchoServlet {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Servlet for EchoServlet {
        fn init(&mut self, config: ServletConfig) -> anyhow::Result<()> {
            self.inits.fetch_add(1, Ordering::SeqCst);
            if let Some(marker) = config.init_parameter("marker") {
                self.marker = marker.to_string();
            }
            Ok(())
        }

        fn service(
            &self,
            request: &ServletRequest,
            response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *response = ServletResponse::json(
                200,
                json!({
                    "marker": self.marker,
                    "path": request.path,
                    "body": request.body,
                }),
            );
            Ok(())
        }
    }

    /// Always fails in `service`.
    pub struct FailingServlet;

    impl Servlet for FailingServlet {
        fn service(
            &self,
            _request: &ServletRequest,
            _response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("backing store is gone"))
        }
    }

    /// Always panics in `service`.
    pub struct PanickingServlet;

    impl Servlet for PanickingServlet {
        fn service(
            &self,
            _request: &ServletRequest,
            _response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            panic!("servlet blew up");
        }
    }

    /// Always rejects its configuration in `init`.
    pub struct InitFailServlet;

    impl Servlet for InitFailServlet {
        fn init(&mut self, _config: ServletConfig) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("required init parameter missing"))
        }

        fn service(
            &self,
            _request: &ServletRequest,
            _response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            Ok(())
        }
    }

    /// Blocks inside `service` until the test releases it; reports entry
    /// so tests can observe the worker being busy.
    pub struct GateServlet {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl GateServlet {
        /// Returns the servlet plus the test-side ends: a receiver that
        /// fires when `service` is entered and a sender that releases it.
        pub fn new() -> (Self, mpsc::Receiver<()>, mpsc::Sender<()>) {
            let (entered_tx, entered_rx) = mpsc::channel();
            let (release_tx, release_rx) = mpsc::channel();
            let servlet = Self {
                entered: Mutex::new(entered_tx),
                release: Mutex::new(release_rx),
            };
            (servlet, entered_rx, release_tx)
        }
    }

    impl Servlet for GateServlet {
        fn service(
            &self,
            _request: &ServletRequest,
            response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            self.entered
                .lock()
                .expect("gate entered lock")
                .send(())
                .ok();
            self.release
                .lock()
                .expect("gate release lock")
                .recv()
                .ok();
            *response = ServletResponse::json(200, json!({ "gate": "passed" }));
            Ok(())
        }
    }

    /// Shared counters for [`OverlapProbe`].
    #[derive(Default)]
    pub struct OverlapCounters {
        pub active: AtomicUsize,
        pub max_active: AtomicUsize,
        pub total: AtomicUsize,
    }

    /// Records how many `service` calls ever overlapped, to verify the
    /// single-flight guarantee.
    pub struct OverlapProbe {
        counters: Arc<OverlapCounters>,
    }

    impl OverlapProbe {
        pub fn new(counters: Arc<OverlapCounters>) -> Self {
            Self { counters }
        }
    }

    impl Servlet for OverlapProbe {
        fn service(
            &self,
            _request: &ServletRequest,
            response: &mut ServletResponse,
        ) -> anyhow::Result<()> {
            let now_active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.counters
                .max_active
                .fetch_max(now_active, Ordering::SeqCst);

            // Long enough that concurrent submits would overlap if they
            // were not serialized.
            may::coroutine::sleep(Duration::from_millis(20));

            self.counters.total.fetch_add(1, Ordering::SeqCst);
            self.counters.active.fetch_sub(1, Ordering::SeqCst);
            *response = ServletResponse::json(200, json!({ "probe": "done" }));
            Ok(())
        }
    }
}
