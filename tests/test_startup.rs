//! Startup path: config file to a running controller

use gantrykit::{Config, Direction, JogController, JogLog, Link, LinkConnector, LinkState};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

struct NoDevice;

impl LinkConnector for NoDevice {
    fn pattern(&self) -> String {
        "/dev/ttyUSB*".to_string()
    }

    fn discover(&self) -> Option<String> {
        None
    }

    fn create_link(&self, _port: &str, _log: &JogLog) -> Box<dyn Link> {
        panic!("nothing to connect to")
    }
}

#[tokio::test]
async fn test_config_file_drives_controller() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[jog]\nfeedrate = 2500\ninterval_ms = 20\ndefault_step = 4\n\n[logging]\nhistory_limit = 50\n",
    )
    .unwrap();

    let config = Config::load_or_default(&path).unwrap();
    let controller = JogController::launch(&config, Arc::new(NoDevice)).await;
    assert_eq!(controller.link_state(), LinkState::Simulated);
    assert_eq!(controller.step().get(), 4);

    controller.start_movement(Direction::DownLeft);
    tokio::time::sleep(Duration::from_millis(200)).await;
    controller.shutdown().await;

    let entries = controller.log_entries();
    assert!(entries.len() <= 50);
    assert!(entries
        .iter()
        .any(|e| e.message == "Simulated send: $J=G21G91X-4Y-4F2500"));
}
