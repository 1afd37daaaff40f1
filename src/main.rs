mod etl;
mod data;
mod errors;

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use crate::data::tile::{TileCoord, MAX_ZOOM};
use crate::etl::source::HttpSource;
use crate::etl::tile_geojson::{OutputFile, TileGeojsonEtl};
use crate::etl::Etl;
use crate::errors::{Error, ErrorKind, Result};

const DEFAULT_DATA_URL_TEMPLATE: &str =
    "https://tiles.sharedstreets.io/planet-180312/{z}-{x}-{y}.{layer}.pbf";
const DEFAULT_DATA_ZOOM: u32 = 12;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub data_url_template: String,
    pub data_zoom: u32,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            data_url_template: DEFAULT_DATA_URL_TEMPLATE.to_string(),
            data_zoom: DEFAULT_DATA_ZOOM,
            timeout_secs: 60,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl UserConfig {
    fn validate(self) -> Result<Self> {
        if self.data_zoom > MAX_ZOOM {
            return Err(Error::new(
                ErrorKind::Config,
                format!("data_zoom {} is above {}", self.data_zoom, MAX_ZOOM),
            ));
        }
        if !self.data_url_template.contains("{layer}") {
            return Err(Error::new(
                ErrorKind::Config,
                "data_url_template has no {layer} placeholder",
            ));
        }
        Ok(self)
    }
}

/// Download a tile of SharedStreets data as GeoJSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Tile zoom
    zoom: u32,
    /// Tile X coordinate
    x: u32,
    /// Tile Y coordinate
    y: u32,
    /// JSON config file overriding the data source defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Write the document here instead of stdout
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn load_user_config(path: Option<&Path>) -> Result<UserConfig> {
    let config = match path {
        Some(path) => {
            let file = File::open(path).map_err(|err| Error::from(err).context(path.display()))?;
            serde_json::from_reader(file).map_err(|err| Error::from(err).context(path.display()))?
        },
        None => UserConfig::default(),
    };
    config.validate()
}

// stdout carries the document, so logs go to stderr.
fn setup_logging(level: &str) {
    Builder::with_level(level)
        .with_target_writer("*", new_writer(io::stderr()))
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level);

    let user_config = load_user_config(args.config.as_deref())?;
    let tile = TileCoord::new(args.zoom, args.x, args.y)?;
    let source = HttpSource::new(
        Duration::from_secs(user_config.timeout_secs),
        &user_config.user_agent,
    )?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(OutputFile::new(path)),
        None => Box::new(io::stdout().lock()),
    };
    TileGeojsonEtl::new(&user_config, source, tile, writer).process()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_planet_tiles() {
        let config = load_user_config(None).unwrap();
        assert_eq!(config.data_zoom, 12);
        assert_eq!(config.data_url_template, DEFAULT_DATA_URL_TEMPLATE);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: UserConfig = serde_json::from_str(r#"{"data_zoom": 14}"#).unwrap();
        assert_eq!(config.data_zoom, 14);
        assert_eq!(config.data_url_template, DEFAULT_DATA_URL_TEMPLATE);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn unknown_config_key_is_rejected() {
        assert!(serde_json::from_str::<UserConfig>(r#"{"zoom": 14}"#).is_err());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let too_deep = UserConfig { data_zoom: 31, ..Default::default() };
        assert_eq!(too_deep.validate().unwrap_err().kind, ErrorKind::Config);

        let no_layer = UserConfig {
            data_url_template: "https://x/{z}/{x}/{y}.pbf".to_string(),
            ..Default::default()
        };
        assert_eq!(no_layer.validate().unwrap_err().kind, ErrorKind::Config);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_user_config(Some(Path::new("does/not/exist.json"))).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
        assert!(err.message.starts_with("does/not/exist.json"));
    }

    #[test]
    fn parses_positional_tile() {
        let args = Args::try_parse_from(["sharedstreets-tile", "16", "10482", "25330"]).unwrap();
        assert_eq!((args.zoom, args.x, args.y), (16, 10482, 25330));
        assert_eq!(args.log_level, "info");
        assert!(args.config.is_none());
    }

    #[test]
    fn rejects_negative_coordinates() {
        assert!(Args::try_parse_from(["sharedstreets-tile", "16", "-1", "3"]).is_err());
    }
}
