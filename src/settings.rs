use crate::sketch::model::{Color, Point};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "sketch_solver.json";
pub const API_URL_ENV: &str = "SKETCH_SOLVER_API_URL";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverSettings {
    /// Base URL of the recognition service; requests go to `<api_url>/calculate`.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Pause between a response arriving and its results appearing.
    #[serde(default = "default_placement_delay_ms")]
    pub placement_delay_ms: u64,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    #[serde(default = "default_color")]
    pub default_color: Color,
    #[serde(default = "default_swatches")]
    pub swatches: Vec<Color>,
    /// Where results go when nothing was drawn and nothing was placed yet.
    #[serde(default = "default_anchor")]
    pub default_anchor: Point,
    #[serde(default = "default_submit_empty_canvas")]
    pub submit_empty_canvas: bool,
    /// When enabled the logger runs at debug level. Defaults to `false`.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_api_url() -> String {
    "http://localhost:8900".to_owned()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_placement_delay_ms() -> u64 {
    1000
}

fn default_stroke_width() -> u32 {
    3
}

fn default_color() -> Color {
    Color::WHITE
}

fn default_anchor() -> Point {
    Point::new(10.0, 200.0)
}

fn default_submit_empty_canvas() -> bool {
    true
}

fn default_swatches() -> Vec<Color> {
    vec![
        Color::rgba(255, 255, 255, 255),
        Color::rgba(238, 51, 51, 255),
        Color::rgba(255, 171, 0, 255),
        Color::rgba(255, 230, 64, 255),
        Color::rgba(61, 220, 132, 255),
        Color::rgba(0, 168, 255, 255),
        Color::rgba(180, 102, 255, 255),
        Color::rgba(255, 105, 180, 255),
    ]
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: default_request_timeout_secs(),
            placement_delay_ms: default_placement_delay_ms(),
            stroke_width: default_stroke_width(),
            default_color: default_color(),
            swatches: default_swatches(),
            default_anchor: default_anchor(),
            submit_empty_canvas: default_submit_empty_canvas(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl SolverSettings {
    /// Reads settings from `path`. A missing or blank file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read settings file {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("deserialize settings file {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create settings folder {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json)
            .with_context(|| format!("write settings file {}", path.display()))
    }

    /// Applies an api url override, ignoring blank values.
    pub fn with_api_url_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url.trim().to_owned();
        }
        self
    }

    pub fn apply_env(self) -> Self {
        self.with_api_url_override(std::env::var(API_URL_ENV).ok())
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}
