use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use domain::DomainError;
use domain::driver::{ConnectionResolver, ScaleConnection};
use infrastructure::drivers::{
    PortOpener, PortResolver, ReplayConnection, WINDOWS_CANDIDATES, default_candidates,
};

/// Records every open attempt and only succeeds for `available` devices
#[derive(Clone, Default)]
struct RecordingOpener {
    attempts: Arc<Mutex<Vec<(String, Option<Duration>)>>>,
    available: Vec<String>,
}

impl RecordingOpener {
    fn with_available(devices: &[&str]) -> Self {
        Self {
            attempts: Arc::default(),
            available: devices.iter().map(|d| d.to_string()).collect(),
        }
    }

    fn attempted(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect()
    }
}

#[async_trait]
impl PortOpener for RecordingOpener {
    async fn open(
        &self,
        device: &str,
        timeout: Option<Duration>,
    ) -> Result<Box<dyn ScaleConnection>, DomainError> {
        self.attempts
            .lock()
            .unwrap()
            .push((device.to_string(), timeout));

        if self.available.iter().any(|d| d == device) {
            let mut connection = ReplayConnection::from_bytes(device, Vec::new());
            connection.set_timeout(timeout);
            Ok(Box::new(connection))
        } else {
            Err(DomainError::PortUnavailable {
                port: device.to_string(),
                reason: "no such device".to_string(),
            })
        }
    }
}

#[tokio::test]
async fn probing_tries_every_candidate_in_order_before_failing() {
    let opener = RecordingOpener::default();
    let resolver = PortResolver::new(opener.clone());

    let result = resolver.open(None, None).await;

    assert_eq!(opener.attempted(), default_candidates());
    match result {
        Err(DomainError::NoPortFound { tried }) => assert_eq!(tried, default_candidates()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("no port should open"),
    }
}

#[tokio::test]
async fn com_ports_are_probed_in_station_order() {
    let candidates: Vec<String> = WINDOWS_CANDIDATES.iter().map(|s| s.to_string()).collect();
    let opener = RecordingOpener::default();
    let resolver = PortResolver::with_candidates(opener.clone(), candidates);

    let result = resolver.open(None, Some(Duration::from_millis(500))).await;

    let expected = vec![
        "COM1", "COM2", "COM6", "COM5", "COM3", "COM4", "COM7", "COM8", "COM9",
    ];
    assert_eq!(opener.attempted(), expected);
    match result {
        Err(DomainError::NoPortFound { tried }) => assert_eq!(tried, expected),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("no port should open"),
    }
}

#[tokio::test]
async fn probing_stops_at_first_available_candidate() {
    let candidates: Vec<String> = ["COM1", "COM2", "COM6", "COM5"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let opener = RecordingOpener::with_available(&["COM6", "COM5"]);
    let resolver = PortResolver::with_candidates(opener.clone(), candidates);

    let connection = resolver
        .open(None, Some(Duration::from_millis(500)))
        .await
        .unwrap();

    assert_eq!(connection.name(), "COM6");
    assert_eq!(connection.timeout(), Some(Duration::from_millis(500)));
    assert_eq!(opener.attempted(), vec!["COM1", "COM2", "COM6"]);
}

#[tokio::test]
async fn named_device_is_opened_exactly_once() {
    let opener = RecordingOpener::default();
    let resolver = PortResolver::new(opener.clone());

    let result = resolver.resolve(Some("/dev/ttyUSB0"), None).await;

    assert!(matches!(
        result,
        Err(DomainError::PortUnavailable { ref port, .. }) if port == "/dev/ttyUSB0"
    ));
    assert_eq!(opener.attempted(), vec!["/dev/ttyUSB0"]);
}

#[tokio::test]
async fn named_device_receives_timeout() {
    let opener = RecordingOpener::with_available(&["COM3"]);
    let resolver = PortResolver::new(opener.clone());

    let connection = resolver.resolve(Some("COM3"), None).await.unwrap();

    assert_eq!(connection.name(), "COM3");
    assert_eq!(connection.timeout(), None);
    assert_eq!(opener.attempts.lock().unwrap()[0], ("COM3".to_string(), None));
}
