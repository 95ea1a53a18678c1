//! The map composer owns every layer, the layer control, the legends and
//! the viewport, and applies feed results to them as they arrive.
//!
//! ```text
//! Initializing --attach--> AwaitingData --both feeds loaded--> Populated
//! ```
//!
//! Each feed settles independently, in any order. A failed feed leaves its
//! group empty and its legend absent; the composer then stays in
//! `AwaitingData` for good, but the base map keeps working.

use crate::{
    core::{config::MapConfig, geo::Point, viewport::Viewport},
    data::{
        feed::{FeedKind, FeedSource},
        geojson::GeoJson,
    },
    layers::{
        base::LayerTrait, control::LayerControl, group::LayerGroup, tile::TileLayer,
        vector::RenderedItem,
    },
    render::features::{
        boundaries_from_geojson, earthquakes_from_geojson, render_boundaries, render_earthquakes,
        RenderReport,
    },
    style::DepthScale,
    ui::{elements::Position, legend::Legend},
    Result,
};
use futures::stream::{FuturesUnordered, StreamExt};
use serde::{Deserialize, Serialize};

pub const EARTHQUAKE_GROUP_ID: &str = "earthquakes";
pub const BOUNDARY_GROUP_ID: &str = "tectonic-plates";

const EARTHQUAKE_Z_INDEX: i32 = 20;
const BOUNDARY_Z_INDEX: i32 = 10;

/// Initial viewport size until a surface reports its real one
const DEFAULT_VIEW_SIZE: (f64, f64) = (800.0, 600.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComposerState {
    Initializing,
    AwaitingData,
    Populated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeedStatus {
    Pending,
    Loaded { rendered: usize, skipped: usize },
    Failed(String),
}

impl FeedStatus {
    pub fn is_settled(&self) -> bool {
        !matches!(self, FeedStatus::Pending)
    }
}

/// One feed's fetch outcome, as delivered to the composer
#[derive(Debug)]
pub struct FeedEvent {
    pub kind: FeedKind,
    pub result: Result<GeoJson>,
}

impl FeedEvent {
    pub fn new(kind: FeedKind, result: Result<GeoJson>) -> Self {
        Self { kind, result }
    }
}

pub struct MapComposer {
    config: MapConfig,
    state: ComposerState,
    viewport: Viewport,
    depth_scale: DepthScale,
    base_layers: Vec<TileLayer>,
    earthquakes: LayerGroup,
    boundaries: LayerGroup,
    control: LayerControl,
    depth_legend: Option<Legend>,
    boundary_legend: Option<Legend>,
    earthquake_status: FeedStatus,
    boundary_status: FeedStatus,
}

impl MapComposer {
    pub fn new(config: MapConfig) -> Self {
        let mut viewport = Viewport::new(
            config.center,
            config.zoom,
            Point::new(DEFAULT_VIEW_SIZE.0, DEFAULT_VIEW_SIZE.1),
        );
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);

        Self {
            config,
            state: ComposerState::Initializing,
            viewport,
            depth_scale: DepthScale::standard(),
            base_layers: Vec::new(),
            earthquakes: LayerGroup::new(EARTHQUAKE_GROUP_ID, FeedKind::Earthquakes.label())
                .with_z_index(EARTHQUAKE_Z_INDEX),
            boundaries: LayerGroup::new(BOUNDARY_GROUP_ID, FeedKind::TectonicPlates.label())
                .with_z_index(BOUNDARY_Z_INDEX),
            control: LayerControl::new(Position::TopRight),
            depth_legend: None,
            boundary_legend: None,
            earthquake_status: FeedStatus::Pending,
            boundary_status: FeedStatus::Pending,
        }
    }

    /// Creates the base layers, registers them and both overlays with the
    /// layer control. Only the first call has any effect.
    pub fn attach(&mut self) {
        if self.state != ComposerState::Initializing {
            log::warn!("map composer already attached");
            return;
        }

        for preset in &self.config.base_layers {
            let layer = TileLayer::from_preset(*preset, &self.config.tiles);
            self.control.add_base_layer(layer.id(), layer.name());
            self.base_layers.push(layer);
        }
        for group in [&self.earthquakes, &self.boundaries] {
            self.control.add_overlay(group.id(), group.name(), group.is_visible());
        }

        let initial = self.config.initial_base_layer();
        if let Err(err) = self.select_base_layer(initial) {
            log::warn!("no base layer available: {}", err);
        }

        self.state = ComposerState::AwaitingData;
        log::info!(
            "map attached with {} base layers, awaiting feeds",
            self.base_layers.len()
        );
    }

    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// True once neither feed is pending, whatever the outcome.
    pub fn is_settled(&self) -> bool {
        self.earthquake_status.is_settled() && self.boundary_status.is_settled()
    }

    pub fn status(&self, kind: FeedKind) -> &FeedStatus {
        match kind {
            FeedKind::Earthquakes => &self.earthquake_status,
            FeedKind::TectonicPlates => &self.boundary_status,
        }
    }

    pub fn handle(&mut self, event: FeedEvent) {
        match event.kind {
            FeedKind::Earthquakes => self.on_earthquakes(event.result),
            FeedKind::TectonicPlates => self.on_boundaries(event.result),
        }
    }

    pub fn on_earthquakes(&mut self, result: Result<GeoJson>) {
        if !self.accepts(FeedKind::Earthquakes) {
            return;
        }

        self.earthquake_status = match result {
            Ok(geojson) => {
                let quakes = earthquakes_from_geojson(&geojson);
                let report = render_earthquakes(
                    &quakes,
                    &self.depth_scale,
                    self.config.radius_scale,
                    &mut self.earthquakes,
                );
                self.depth_legend = Some(Legend::depth(&self.depth_scale, Position::BottomRight));
                loaded(FeedKind::Earthquakes, report)
            }
            Err(err) => failed(FeedKind::Earthquakes, &err),
        };
        self.refresh_state();
    }

    pub fn on_boundaries(&mut self, result: Result<GeoJson>) {
        if !self.accepts(FeedKind::TectonicPlates) {
            return;
        }

        self.boundary_status = match result {
            Ok(geojson) => {
                let boundaries = boundaries_from_geojson(&geojson);
                let report = render_boundaries(&boundaries, &mut self.boundaries);
                self.boundary_legend = Some(Legend::boundaries(Position::BottomLeft));
                loaded(FeedKind::TectonicPlates, report)
            }
            Err(err) => failed(FeedKind::TectonicPlates, &err),
        };
        self.refresh_state();
    }

    /// Fetches both feeds concurrently and applies each result as soon as it
    /// arrives.
    pub async fn load(&mut self, source: &dyn FeedSource) {
        let mut pending: FuturesUnordered<_> = FeedKind::ALL
            .iter()
            .map(|&kind| async move { FeedEvent::new(kind, source.fetch(kind).await) })
            .collect();

        while let Some(event) = pending.next().await {
            self.handle(event);
        }
    }

    pub fn select_base_layer(&mut self, index: usize) -> Result<()> {
        self.control.select_base_layer(index)?;
        for (i, layer) in self.base_layers.iter_mut().enumerate() {
            layer.set_visible(i == index);
        }
        log::debug!("base layer {} selected", index);
        Ok(())
    }

    pub fn set_overlay_visible(&mut self, kind: FeedKind, visible: bool) -> Result<()> {
        let group = match kind {
            FeedKind::Earthquakes => &mut self.earthquakes,
            FeedKind::TectonicPlates => &mut self.boundaries,
        };
        self.control.set_overlay_visible(group.id(), visible)?;
        group.set_visible(visible);
        Ok(())
    }

    pub fn group(&self, kind: FeedKind) -> &LayerGroup {
        match kind {
            FeedKind::Earthquakes => &self.earthquakes,
            FeedKind::TectonicPlates => &self.boundaries,
        }
    }

    pub fn earthquakes(&self) -> &LayerGroup {
        &self.earthquakes
    }

    pub fn boundaries(&self) -> &LayerGroup {
        &self.boundaries
    }

    pub fn depth_legend(&self) -> Option<&Legend> {
        self.depth_legend.as_ref()
    }

    pub fn boundary_legend(&self) -> Option<&Legend> {
        self.boundary_legend.as_ref()
    }

    /// Legends of the overlays that are loaded and currently shown
    pub fn visible_legends(&self) -> Vec<&Legend> {
        let mut legends = Vec::new();
        if self.earthquakes.is_visible() {
            legends.extend(self.depth_legend.as_ref());
        }
        if self.boundaries.is_visible() {
            legends.extend(self.boundary_legend.as_ref());
        }
        legends
    }

    pub fn layer_control(&self) -> &LayerControl {
        &self.control
    }

    pub fn base_layers(&self) -> &[TileLayer] {
        &self.base_layers
    }

    pub fn active_base_layer(&self) -> Option<&TileLayer> {
        self.base_layers.get(self.control.active_base_index())
    }

    pub fn active_base_layer_mut(&mut self) -> Option<&mut TileLayer> {
        self.base_layers.get_mut(self.control.active_base_index())
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn depth_scale(&self) -> &DepthScale {
        &self.depth_scale
    }

    /// Both overlays in paint order, lowest z-index first
    pub fn overlays(&self) -> Vec<(FeedKind, &LayerGroup)> {
        let mut overlays: Vec<(FeedKind, &LayerGroup)> =
            FeedKind::ALL.iter().map(|kind| (*kind, self.group(*kind))).collect();
        overlays.sort_by_key(|(_, group)| group.z_index());
        overlays
    }

    pub fn set_overlay_z_index(&mut self, kind: FeedKind, z_index: i32) {
        match kind {
            FeedKind::Earthquakes => self.earthquakes.set_z_index(z_index),
            FeedKind::TectonicPlates => self.boundaries.set_z_index(z_index),
        }
    }

    /// Item under a screen point and the overlay it belongs to, searching the
    /// topmost overlay first
    pub fn hit_test(&self, screen: Point) -> Option<(FeedKind, &RenderedItem)> {
        self.overlays().into_iter().rev().find_map(|(kind, group)| {
            group
                .hit_test(&self.viewport, screen)
                .map(|item| (kind, item))
        })
    }

    fn accepts(&mut self, kind: FeedKind) -> bool {
        if self.state == ComposerState::Initializing {
            log::debug!("{} feed arrived before attach, attaching now", kind);
            self.attach();
        }
        if self.status(kind).is_settled() {
            log::warn!("ignoring repeated {} feed result", kind);
            return false;
        }
        true
    }

    fn refresh_state(&mut self) {
        let both_loaded = matches!(self.earthquake_status, FeedStatus::Loaded { .. })
            && matches!(self.boundary_status, FeedStatus::Loaded { .. });

        if both_loaded && self.state != ComposerState::Populated {
            self.state = ComposerState::Populated;
            log::info!("map populated");
        } else if self.is_settled() && !both_loaded {
            log::warn!("feeds settled with failures, map stays partially populated");
        }
    }
}

fn loaded(kind: FeedKind, report: RenderReport) -> FeedStatus {
    log::info!(
        "{} loaded: {} rendered, {} skipped",
        kind,
        report.rendered,
        report.skipped
    );
    FeedStatus::Loaded {
        rendered: report.rendered,
        skipped: report.skipped,
    }
}

fn failed(kind: FeedKind, err: &crate::Error) -> FeedStatus {
    log::error!("{} feed failed, overlay stays empty: {}", kind, err);
    FeedStatus::Failed(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::LatLng;
    use crate::Error;

    const QUAKES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"place": "A", "mag": 5.0, "time": 0},
             "geometry": {"type": "Point", "coordinates": [10.0, 20.0, 95.0]}},
            {"type": "Feature", "properties": {"place": "B", "mag": 2.5, "time": 0},
             "geometry": {"type": "Point", "coordinates": [-70.0, -30.0, 10.0]}},
            {"type": "Feature", "properties": {"place": "C", "mag": 1.0}, "geometry": null}
        ]
    }"#;

    const PLATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"STEPCLASS": "RIF", "PLATEBOUND": "AF-AN", "VELOCITYLE": 14.2},
             "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}}
        ]
    }"#;

    fn attached() -> MapComposer {
        let mut composer = MapComposer::new(MapConfig::default());
        composer.attach();
        composer
    }

    fn quakes() -> Result<GeoJson> {
        GeoJson::from_str(QUAKES)
    }

    fn plates() -> Result<GeoJson> {
        GeoJson::from_str(PLATES)
    }

    fn unreachable() -> Result<GeoJson> {
        Err(Error::Http {
            url: "http://feeds.invalid/plates".to_string(),
            status: 503,
        })
    }

    #[test]
    fn test_attach_builds_layers_and_control() {
        let mut composer = MapComposer::new(MapConfig::default());
        assert_eq!(composer.state(), ComposerState::Initializing);
        assert!(composer.base_layers().is_empty());

        composer.attach();
        assert_eq!(composer.state(), ComposerState::AwaitingData);
        assert_eq!(composer.base_layers().len(), 3);
        assert_eq!(composer.layer_control().base_layers().len(), 3);
        assert_eq!(composer.layer_control().overlays().len(), 2);
        assert!(composer.earthquakes().is_empty());
        assert!(composer.boundaries().is_empty());
        assert!(composer.depth_legend().is_none());

        let visible: Vec<bool> = composer.base_layers().iter().map(|l| l.is_visible()).collect();
        assert_eq!(visible, vec![true, false, false]);

        composer.attach();
        assert_eq!(composer.base_layers().len(), 3);
    }

    #[test]
    fn test_populated_after_both_feeds_in_either_order() {
        let mut composer = attached();
        composer.on_boundaries(plates());
        assert_eq!(composer.state(), ComposerState::AwaitingData);
        assert!(composer.boundary_legend().is_some());
        assert!(composer.depth_legend().is_none());

        composer.on_earthquakes(quakes());
        assert_eq!(composer.state(), ComposerState::Populated);
        assert!(composer.is_settled());
        assert_eq!(
            composer.status(FeedKind::Earthquakes),
            &FeedStatus::Loaded { rendered: 2, skipped: 1 }
        );
        assert_eq!(composer.earthquakes().len(), 2);
        assert_eq!(composer.boundaries().len(), 1);
    }

    #[test]
    fn test_failed_feed_leaves_group_empty() {
        let mut composer = attached();
        composer.handle(FeedEvent::new(FeedKind::Earthquakes, quakes()));
        composer.handle(FeedEvent::new(FeedKind::TectonicPlates, unreachable()));

        assert_eq!(composer.state(), ComposerState::AwaitingData);
        assert!(composer.is_settled());
        assert!(composer.boundaries().is_empty());
        assert!(composer.boundary_legend().is_none());
        assert!(matches!(
            composer.status(FeedKind::TectonicPlates),
            FeedStatus::Failed(reason) if reason.contains("503")
        ));
        assert_eq!(composer.visible_legends().len(), 1);
    }

    #[test]
    fn test_repeated_result_is_ignored() {
        let mut composer = attached();
        composer.on_earthquakes(quakes());
        composer.on_earthquakes(quakes());

        assert_eq!(composer.earthquakes().len(), 2);
    }

    #[test]
    fn test_event_before_attach_attaches_first() {
        let mut composer = MapComposer::new(MapConfig::default());
        composer.on_boundaries(plates());

        assert_eq!(composer.state(), ComposerState::AwaitingData);
        assert_eq!(composer.base_layers().len(), 3);
        assert_eq!(composer.boundaries().len(), 1);
    }

    #[test]
    fn test_toggles_reach_layers_and_control() {
        let mut composer = attached();
        composer.on_earthquakes(quakes());

        composer.set_overlay_visible(FeedKind::Earthquakes, false).unwrap();
        assert!(!composer.earthquakes().is_visible());
        assert_eq!(
            composer.layer_control().is_overlay_visible(EARTHQUAKE_GROUP_ID),
            Some(false)
        );
        assert!(composer.visible_legends().is_empty());

        composer.select_base_layer(2).unwrap();
        assert_eq!(composer.active_base_layer().unwrap().name(), "Grayscale");
        assert!(composer.select_base_layer(3).is_err());
        assert_eq!(composer.active_base_layer().unwrap().name(), "Grayscale");
    }

    #[test]
    fn test_hit_test_finds_marker_popup() {
        let mut composer = attached();
        composer.on_earthquakes(quakes());

        let marker = composer.earthquakes().markers().next().unwrap().position;
        let screen = composer.viewport().lat_lng_to_pixel(&marker);
        let (kind, hit) = composer.hit_test(screen).unwrap();
        assert_eq!(kind, FeedKind::Earthquakes);
        assert_eq!(hit.popup().title, "A");
    }

    #[test]
    fn test_z_index_orders_paint_and_hits() {
        const OVERLAP: &str = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"STEPCLASS": "SUB", "PLATEBOUND": "PA-NA"},
                 "geometry": {"type": "LineString", "coordinates": [[0.0, 20.0], [20.0, 20.0]]}}
            ]
        }"#;
        let mut composer = attached();
        composer.on_earthquakes(quakes());
        composer.on_boundaries(GeoJson::from_str(OVERLAP));

        let kinds: Vec<FeedKind> = composer.overlays().iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![FeedKind::TectonicPlates, FeedKind::Earthquakes]);

        // quake "A" sits on the boundary line at (20, 10)
        let screen = composer.viewport().lat_lng_to_pixel(&LatLng::new(20.0, 10.0));
        assert_eq!(composer.hit_test(screen).unwrap().0, FeedKind::Earthquakes);

        composer.set_overlay_z_index(FeedKind::TectonicPlates, 30);
        let kinds: Vec<FeedKind> = composer.overlays().iter().map(|(kind, _)| *kind).collect();
        assert_eq!(kinds, vec![FeedKind::Earthquakes, FeedKind::TectonicPlates]);
        assert_eq!(composer.hit_test(screen).unwrap().0, FeedKind::TectonicPlates);
    }

    #[test]
    fn test_reversed_zoom_limits_do_not_panic() {
        let config = MapConfig {
            min_zoom: 10.0,
            max_zoom: 5.0,
            ..MapConfig::default()
        };
        let composer = MapComposer::new(config);

        assert_eq!(composer.viewport().min_zoom, 5.0);
        assert_eq!(composer.viewport().max_zoom, 10.0);
        assert_eq!(composer.viewport().zoom, 5.0);
    }
}
