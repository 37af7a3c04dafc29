// Each test binary compiles this module independently and uses a subset
#![allow(dead_code)]

pub mod mock_backend;
pub mod mock_drive;
pub mod mock_parser;

pub use mock_backend::MockBackend;
pub use mock_drive::MockDrive;
pub use mock_parser::MockParser;

use siteforge::drive_client::DriveItem;
use siteforge::models::{RadioPlan, RadioPlanSector};

/// Initialize tracing for tests with proper test output handling
pub fn tracing_init() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn file(id: &str, name: &str) -> DriveItem {
    DriveItem {
        id: id.to_string(),
        name: name.to_string(),
        size: Some(1024),
        is_folder: false,
        mime_type: None,
        parent_path: String::new(),
        download_url: None,
        web_url: None,
    }
}

pub fn folder(id: &str, name: &str) -> DriveItem {
    DriveItem {
        id: id.to_string(),
        name: name.to_string(),
        size: None,
        is_folder: true,
        mime_type: None,
        parent_path: String::new(),
        download_url: None,
        web_url: None,
    }
}

/// A three-sector radio plan like the parser produces for a typical site
pub fn sample_radio_plan() -> RadioPlan {
    let sector = |id: &str, azimuth: f64| RadioPlanSector {
        id: id.to_string(),
        azimuth,
        m_tilt: 2.0,
        e_tilt: 4.0,
        antennas: vec!["AQQY".to_string()],
        technologies: vec!["LTE".to_string(), "NR".to_string()],
        ..Default::default()
    };

    RadioPlan {
        site_id: "OSL0042".to_string(),
        project: "Kirkeveien 12".to_string(),
        config: "LLL_".to_string(),
        total_cells: 9,
        sectors: vec![
            sector("A", 0.0),
            sector("B", 120.0),
            sector("C", 240.0),
        ],
        raw_rows: Vec::new(),
    }
}
