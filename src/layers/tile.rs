use crate::{
    core::{
        config::TileLoadingConfig,
        geo::{LatLng, LatLngBounds, TileCoord},
        viewport::Viewport,
    },
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::{TileCache, TileLoader, TileResponse, TileSource, UrlTemplateSource},
};
use crossbeam_channel::{unbounded, Receiver, TryRecvError};
use fxhash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Background imagery the layer control can switch between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseLayerPreset {
    /// OpenStreetMap standard tiles
    Street,
    /// Esri World Imagery
    Satellite,
    /// CARTO light basemap
    Grayscale,
}

impl BaseLayerPreset {
    pub const ALL: [BaseLayerPreset; 3] = [
        BaseLayerPreset::Street,
        BaseLayerPreset::Satellite,
        BaseLayerPreset::Grayscale,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BaseLayerPreset::Street => "Street",
            BaseLayerPreset::Satellite => "Satellite",
            BaseLayerPreset::Grayscale => "Grayscale",
        }
    }

    pub fn options(&self) -> TileLayerOptions {
        match self {
            BaseLayerPreset::Street => TileLayerOptions::default(),
            BaseLayerPreset::Satellite => TileLayerOptions {
                url_template: "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}".to_string(),
                subdomains: Vec::new(),
                attribution: "Tiles © Esri, Maxar, Earthstar Geographics, and the GIS User Community".to_string(),
                ..TileLayerOptions::default()
            },
            BaseLayerPreset::Grayscale => TileLayerOptions {
                url_template: "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}.png".to_string(),
                subdomains: ["a", "b", "c", "d"].iter().map(|s| s.to_string()).collect(),
                attribution: "© OpenStreetMap contributors © CARTO".to_string(),
                max_zoom: 19,
                ..TileLayerOptions::default()
            },
        }
    }
}

impl std::fmt::Display for BaseLayerPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileLayerOptions {
    /// e.g. "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png"
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub attribution: String,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            subdomains: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            attribution: "© OpenStreetMap contributors".to_string(),
            tile_size: 256,
            min_zoom: 0,
            max_zoom: 18,
        }
    }
}

/// A base layer: works out which tiles the viewport needs, downloads them in
/// the background and keeps the bytes in an LRU cache.
pub struct TileLayer {
    properties: LayerProperties,
    preset: BaseLayerPreset,
    options: TileLayerOptions,
    source: UrlTemplateSource,
    cache: TileCache,
    loader: TileLoader,
    rx: Receiver<TileResponse>,
    loading: FxHashSet<TileCoord>,
    /// Failed tiles and when they failed; retried after `retry_after`
    failed: FxHashMap<TileCoord, Instant>,
    retry_after: Duration,
    max_requests_per_frame: usize,
}

impl TileLayer {
    pub fn from_preset(preset: BaseLayerPreset, config: &TileLoadingConfig) -> Self {
        let options = preset.options();
        let source = UrlTemplateSource::new(options.url_template.clone(), options.subdomains.clone());
        let (tx, rx) = unbounded();
        let id = format!("base-{}", preset.name().to_lowercase());

        Self {
            properties: LayerProperties::new(id, preset.name().to_string(), LayerType::Tile),
            preset,
            options,
            source,
            cache: TileCache::new(config.cache_size),
            loader: TileLoader::new(tx, config.max_attempts),
            rx,
            loading: FxHashSet::default(),
            failed: FxHashMap::default(),
            retry_after: Duration::from_secs(config.retry_after_secs),
            max_requests_per_frame: config.max_requests_per_frame.max(1),
        }
    }

    pub fn preset(&self) -> BaseLayerPreset {
        self.preset
    }

    pub fn options(&self) -> &TileLayerOptions {
        &self.options
    }

    pub fn attribution(&self) -> &str {
        &self.options.attribution
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        self.source.url(coord)
    }

    /// Integer zoom the layer fetches tiles at for this viewport
    pub fn tile_zoom(&self, viewport: &Viewport) -> u8 {
        (viewport.zoom.floor().max(0.0) as u8).clamp(self.options.min_zoom, self.options.max_zoom)
    }

    /// Tiles covering the viewport plus a one-tile margin, clipped to the
    /// world
    pub fn visible_tiles(&self, viewport: &Viewport) -> Vec<TileCoord> {
        let zoom = self.tile_zoom(viewport);
        let tiles_per_axis = 1u32 << zoom;
        let bounds = viewport.bounds();

        let to_tile = |lat: f64, lng: f64| -> (f64, f64) {
            let lat_rad = LatLng::clamp_lat(lat).to_radians();
            let x = (lng + 180.0) / 360.0 * tiles_per_axis as f64;
            let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI)
                / 2.0
                * tiles_per_axis as f64;
            (x, y)
        };

        let (min_x_f, min_y_f) = to_tile(bounds.north_east.lat, bounds.south_west.lng);
        let (max_x_f, max_y_f) = to_tile(bounds.south_west.lat, bounds.north_east.lng);

        let margin: i64 = 1;
        let last = tiles_per_axis as i64 - 1;
        let min_x = (min_x_f.floor() as i64 - margin).clamp(0, last) as u32;
        let max_x = (max_x_f.ceil() as i64 + margin).clamp(0, last) as u32;
        let min_y = (min_y_f.floor() as i64 - margin).clamp(0, last) as u32;
        let max_y = (max_y_f.ceil() as i64 + margin).clamp(0, last) as u32;

        let mut tiles = Vec::new();
        for x in min_x..=max_x {
            for y in min_y..=max_y {
                tiles.push(TileCoord::new(x, y, zoom));
            }
        }
        tiles
    }

    /// Drains finished downloads and starts a bounded number of new ones.
    pub fn update_tiles(&mut self, viewport: &Viewport) {
        loop {
            match self.rx.try_recv() {
                Ok(TileResponse { coord, result }) => {
                    self.loading.remove(&coord);
                    match result {
                        Ok(data) => self.cache.insert(coord, data),
                        Err(err) => {
                            log::debug!("tile {:?} marked failed: {}", coord, err);
                            self.failed.insert(coord, Instant::now());
                        }
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        self.forget_failures(self.tile_zoom(viewport), Instant::now());

        let mut started = 0;
        for coord in self.visible_tiles(viewport) {
            if started >= self.max_requests_per_frame {
                break;
            }
            if self.cache.contains(&coord)
                || self.loading.contains(&coord)
                || self.failed.contains_key(&coord)
            {
                continue;
            }
            self.loading.insert(coord);
            self.loader.start_download(&self.source, coord);
            started += 1;
        }
    }

    /// Keeps failures only for the zoom in view and only until they are due
    /// for another try.
    fn forget_failures(&mut self, zoom: u8, now: Instant) {
        let retry_after = self.retry_after;
        self.failed
            .retain(|coord, failed_at| coord.z == zoom && now.duration_since(*failed_at) < retry_after);
    }

    /// Bytes for `coord`, or for the closest cached ancestor covering it.
    pub fn tile_data(&self, coord: TileCoord) -> Option<(TileCoord, std::sync::Arc<Vec<u8>>)> {
        let mut current = Some(coord);
        while let Some(c) = current {
            if let Some(data) = self.cache.get(&c) {
                return Some((c, data));
            }
            current = c.parent();
        }
        None
    }

    pub fn is_loading(&self) -> bool {
        !self.loading.is_empty()
    }

    pub fn failed_tiles(&self) -> usize {
        self.failed.len()
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }
}

impl std::fmt::Debug for TileLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TileLayer")
            .field("preset", &self.preset)
            .field("cached", &self.cache.len())
            .field("loading", &self.loading.len())
            .finish()
    }
}
