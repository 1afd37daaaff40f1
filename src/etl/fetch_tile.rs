use std::collections::HashSet;

use indexmap::IndexMap;
use log::{debug, info};
use prost::Message;

use crate::data::sharedstreets::{
    Layer, SharedStreetsGeometry, SharedStreetsIntersection, SharedStreetsReference,
};
use crate::data::tile::{is_inside, TileCoord, TileMapper};
use crate::data::TileData;
use crate::errors::Result;

use super::frames::Frames;
use super::source::TileSource;

/// Expands `{z}`, `{x}`, `{y}` and `{layer}` in a layer URL template.
pub fn layer_url(template: &str, data_tile: &TileCoord, layer: Layer) -> String {
    template
        .replace("{z}", &data_tile.zoom.to_string())
        .replace("{x}", &data_tile.x.to_string())
        .replace("{y}", &data_tile.y.to_string())
        .replace("{layer}", layer.name())
}

pub struct TileFetcher<S> {
    source: S,
    mapper: TileMapper,
    url_template: String,
}

impl<S: TileSource> TileFetcher<S> {
    pub fn new(source: S, mapper: TileMapper, url_template: &str) -> Self {
        TileFetcher {
            source,
            mapper,
            url_template: url_template.to_string(),
        }
    }

    /// Fetches one layer of `data_tile` and keeps the records accepted by `keep`,
    /// keyed by `id`. Any fetch or frame error is returned with the layer and URL.
    fn collect_layer<M, K, I>(
        &self,
        data_tile: &TileCoord,
        layer: Layer,
        mut keep: K,
        id: I,
    ) -> Result<IndexMap<String, M>>
    where
        M: Message + Default,
        K: FnMut(&M) -> bool,
        I: Fn(&M) -> &str,
    {
        let url = layer_url(&self.url_template, data_tile, layer);
        let context = format!("{} layer {}", layer, url);
        info!(layer = layer.name(), url = url.as_str(); "Fetching layer");

        let bytes = self.source.fetch(&url).map_err(|err| err.context(&context))?;

        let mut records = IndexMap::new();
        for frame in Frames::<M>::new(&bytes) {
            let record = frame.map_err(|err| err.context(&context))?;
            if keep(&record) {
                records.insert(id(&record).to_string(), record);
            }
        }
        info!(layer = layer.name(), count = records.len(); "Kept records");
        Ok(records)
    }

    /// Geometries touching the display tile, the intersections they end at,
    /// and the references describing them.
    pub fn get_tile(&self, tile: &TileCoord) -> Result<TileData> {
        let data_tile = self.mapper.data_tile(tile);
        let bbox = self.mapper.bbox(tile);
        debug!(
            tile = tile.to_string().as_str(),
            data_tile = data_tile.to_string().as_str(),
            sw_lon = bbox.sw.lon, sw_lat = bbox.sw.lat,
            ne_lon = bbox.ne.lon, ne_lat = bbox.ne.lat;
            "Mapped tile"
        );

        let geometries = self.collect_layer(
            &data_tile,
            Layer::Geometry,
            |geom: &SharedStreetsGeometry| is_inside(&bbox, &geom.lonlats),
            |geom| geom.id.as_str(),
        )?;

        let intersections = {
            let intersection_ids: HashSet<&str> = geometries
                .values()
                .flat_map(|geom| {
                    [geom.from_intersection_id.as_str(), geom.to_intersection_id.as_str()]
                })
                .collect();
            self.collect_layer(
                &data_tile,
                Layer::Intersection,
                |inter: &SharedStreetsIntersection| intersection_ids.contains(inter.id.as_str()),
                |inter| inter.id.as_str(),
            )?
        };

        let references = self.collect_layer(
            &data_tile,
            Layer::Reference,
            |reference: &SharedStreetsReference| geometries.contains_key(&reference.geometry_id),
            |reference| reference.id.as_str(),
        )?;

        Ok(TileData {
            geometries,
            intersections,
            references,
        })
    }
}
