use std::fs;
use std::path::PathBuf;

use sketch_solver::settings::SolverSettings;
use sketch_solver::sketch::{Color, Point};
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let settings = SolverSettings::load(&dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, SolverSettings::default());
}

#[test]
fn blank_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sketch_solver.json");
    fs::write(&path, "  \n").unwrap();
    assert_eq!(SolverSettings::load(&path).unwrap(), SolverSettings::default());
}

#[test]
fn saved_settings_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("sketch_solver.json");
    let settings = SolverSettings {
        api_url: "http://solver.local:8900".into(),
        placement_delay_ms: 250,
        stroke_width: 5,
        default_color: Color::rgba(0, 168, 255, 255),
        default_anchor: Point::new(40.0, 80.0),
        submit_empty_canvas: false,
        debug_logging: true,
        log_file: Some(PathBuf::from("solver.log")),
        ..SolverSettings::default()
    };

    settings.save(&path).unwrap();
    assert_eq!(SolverSettings::load(&path).unwrap(), settings);
}

#[test]
fn invalid_json_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sketch_solver.json");
    fs::write(&path, "{ not json").unwrap();
    let err = SolverSettings::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("deserialize settings file"));
}
