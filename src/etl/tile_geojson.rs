use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::data::geojson::FeatureCollection;
use crate::data::tile::{TileCoord, TileMapper};
use crate::data::TileData;
use crate::errors::Result;
use crate::UserConfig;

use super::fetch_tile::TileFetcher;
use super::project::make_geojson;
use super::source::TileSource;
use super::Etl;

const ETL_NAME: &str = "tile_geojson";

/// Writes to a file that is only created on the first write, so a run that
/// fails before loading leaves no file behind.
pub struct OutputFile {
    path: PathBuf,
    file: Option<File>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutputFile {
            path: path.into(),
            file: None,
        }
    }
}

impl Write for OutputFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.path)?,
        };
        self.file.insert(file).write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

/// Fetches one display tile of SharedStreets data and writes it as a
/// pretty-printed GeoJSON document.
pub struct TileGeojsonEtl<S, W> {
    fetcher: TileFetcher<S>,
    tile: TileCoord,
    writer: W,
}

impl<S: TileSource, W: Write> TileGeojsonEtl<S, W> {
    pub fn new(config: &UserConfig, source: S, tile: TileCoord, writer: W) -> Self {
        TileGeojsonEtl {
            fetcher: TileFetcher::new(
                source,
                TileMapper::new(config.data_zoom),
                &config.data_url_template,
            ),
            tile,
            writer,
        }
    }
}

impl<S: TileSource, W: Write> Etl for TileGeojsonEtl<S, W> {
    type Input = TileData;
    type Output = FeatureCollection;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn extract(&mut self) -> Result<Self::Input> {
        self.fetcher.get_tile(&self.tile)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        make_geojson(&input)
    }

    fn load(&mut self, output: Self::Output) -> Result<()> {
        // Serialize fully before writing so a failure leaves no partial document.
        let bytes = serde_json::to_vec_pretty(&output)?;
        self.writer.write_all(&bytes)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}
