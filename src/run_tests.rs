//! Tests for the run module.

use super::*;
use ifwatch::network::{AcquisitionError, HardwareAddress, InterfaceKind, LinkState, RawInterface};
use ifwatch::output::OutputFormat;
use std::collections::VecDeque;
use std::sync::Mutex;

const ETHER: u32 = 1;

/// Backend replaying a list of interface name sets, repeating the last one.
struct SequenceBackend {
    steps: Mutex<VecDeque<Vec<&'static str>>>,
    current: Mutex<Vec<&'static str>>,
}

impl SequenceBackend {
    fn new(steps: Vec<Vec<&'static str>>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            current: Mutex::new(Vec::new()),
        }
    }
}

impl SnapshotBackend for SequenceBackend {
    fn fetch_raw_interfaces(&self) -> Result<Vec<RawInterface>, AcquisitionError> {
        let mut current = self.current.lock().unwrap();
        if let Some(next) = self.steps.lock().unwrap().pop_front() {
            *current = next;
        }
        Ok(current
            .iter()
            .map(|name| RawInterface::new(*name, ETHER))
            .collect())
    }

    fn classify_type(&self, _type_code: u32) -> InterfaceKind {
        InterfaceKind::Ethernet
    }

    fn query_link_state(
        &self,
        _name: &str,
        _kind: InterfaceKind,
    ) -> Result<LinkState, AcquisitionError> {
        Ok(LinkState::new(
            HardwareAddress::from([0x02, 0, 0, 0, 0, 0x01]),
            true,
        ))
    }
}

mod run_error {
    use super::*;

    #[test]
    fn relay_closed_displays_message() {
        let error = RunError::RelayClosed;
        assert_eq!(error.to_string(), "Notification relay closed unexpectedly");
    }

    #[test]
    fn backend_init_is_configuration_error() {
        let error = RunError::BackendInit(InitError::new("sysfs root missing"));

        assert!(error.is_configuration());
        assert!(error.to_string().contains("sysfs root missing"));
    }

    #[test]
    fn output_failure_is_runtime_error() {
        let error = RunError::Output(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));

        assert!(!error.is_configuration());
        assert!(error.to_string().contains("Failed to write output"));
    }
}

mod printer_loop {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn prints_table_then_changes_until_shutdown() {
        let (relay, inbox) = relay::channel();
        let manager = Arc::new(InterfaceManager::new(
            SequenceBackend::new(vec![vec!["eth0"], vec!["eth0", "eth1"]]),
            relay,
        ));
        initial_update(&manager).await;

        let handle = Monitor::polling(Arc::clone(&manager), Duration::from_millis(10)).start();
        let mut out = Vec::new();
        let printer = Printer::new(&mut out, OutputFormat::Text);
        let shutdown = tokio::time::sleep(Duration::from_millis(300));

        print_loop(handle, inbox, printer, Duration::from_millis(50), shutdown)
            .await
            .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("IFACE eth0 02:00:00:00:00:01 Ethernet\n"));
        assert!(out.contains("NEW eth1 02:00:00:00:00:01 Ethernet\n"));
        assert!(out.contains("IFACE eth1 02:00:00:00:00:01 Ethernet\n"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stops_monitor_on_shutdown() {
        let (relay, inbox) = relay::channel();
        let manager = Arc::new(InterfaceManager::new(
            SequenceBackend::new(vec![vec!["eth0"]]),
            relay,
        ));

        let handle = Monitor::polling(Arc::clone(&manager), Duration::from_millis(5)).start();
        let printer = Printer::new(io::sink(), OutputFormat::Json);

        print_loop(handle, inbox, printer, Duration::from_secs(60), async {})
            .await
            .unwrap();

        // The loop owned the only handle; the manager is ours again
        assert_eq!(Arc::strong_count(&manager), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn write_failure_ends_loop() {
        struct BrokenPipe;

        impl Write for BrokenPipe {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let (relay, inbox) = relay::channel();
        let manager = Arc::new(InterfaceManager::new(
            SequenceBackend::new(vec![vec!["eth0"]]),
            relay,
        ));
        initial_update(&manager).await;

        let handle = Monitor::polling(Arc::clone(&manager), Duration::from_secs(60)).start();
        let printer = Printer::new(BrokenPipe, OutputFormat::Text);

        let result = print_loop(
            handle,
            inbox,
            printer,
            Duration::from_millis(10),
            std::future::pending(),
        )
        .await;

        assert!(matches!(result, Err(RunError::Output(_))));
    }
}
