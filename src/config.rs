use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use utoipa::ToSchema;

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Allowed CORS origins. Required unless cors_permissive is true.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Explicitly allow all origins (development only). Defaults to false.
    #[serde(default)]
    pub cors_permissive: bool,
    /// Station information feed
    pub stations: DataSource,
    /// Trip table (CSV)
    pub trips: DataSource,
    /// Largest marker radius in pixels, given to the busiest station
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Timeout in seconds for each dataset fetch
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Directory with the map frontend, served for any non-API path
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
    #[serde(default)]
    pub map: MapSettings,
}

/// Where a dataset is read from. Written in YAML as `url: ...` or `path: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "DataSourceConfig")]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DataSourceConfig {
    url: Option<String>,
    path: Option<PathBuf>,
}

impl TryFrom<DataSourceConfig> for DataSource {
    type Error = String;

    fn try_from(raw: DataSourceConfig) -> Result<Self, Self::Error> {
        match (raw.url, raw.path) {
            (Some(url), None) => Ok(DataSource::Url(url)),
            (None, Some(path)) => Ok(DataSource::Path(path)),
            (Some(_), Some(_)) => Err("data source must set either url or path, not both".to_string()),
            (None, None) => Err("data source must set url or path".to_string()),
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataSource::Url(url) => write!(f, "{url}"),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Base map and overlay settings handed to the map frontend
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MapSettings {
    pub style: String,
    /// [lon, lat]
    pub center: [f64; 2],
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    #[serde(default)]
    pub bike_lanes: Vec<LaneLayer>,
    #[serde(default)]
    pub lane_paint: LanePaint,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            style: "mapbox://styles/mapbox/streets-v12".to_string(),
            center: [-71.09415, 42.36027],
            zoom: 12.0,
            min_zoom: 5.0,
            max_zoom: 18.0,
            bike_lanes: Vec::new(),
            lane_paint: LanePaint::default(),
        }
    }
}

/// A GeoJSON line layer drawn on top of the base map
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LaneLayer {
    pub id: String,
    pub source_url: String,
}

/// Paint shared by all bike lane layers
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LanePaint {
    pub color: String,
    pub width: f64,
    pub opacity: f64,
}

impl Default for LanePaint {
    fn default() -> Self {
        Self {
            color: "#32D400".to_string(),
            width: 5.0,
            opacity: 0.6,
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_max_radius() -> f64 {
    crate::services::radius::DEFAULT_MAX_RADIUS
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::ReadError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Load from the path in `BIKEWATCH_CONFIG`, falling back to ./config.yaml
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("BIKEWATCH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load(path)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.cors_permissive && self.cors_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "cors_origins must be set unless cors_permissive is true".to_string(),
            ));
        }
        if !(self.max_radius.is_finite() && self.max_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_radius must be a positive number, got {}",
                self.max_radius
            )));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config: {0}")]
    ParseError(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}
