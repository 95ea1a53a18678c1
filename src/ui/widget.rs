use crate::{
    core::{
        composer::MapComposer,
        geo::{LatLng, Point, TileCoord},
    },
    data::feed::FeedKind,
    layers::{
        base::LayerTrait,
        group::LayerGroup,
        tile::{BaseLayerPreset, TileLayer},
        vector::RenderedItem,
    },
    ui::{elements::Position, legend::Legend, popup::PopupContent},
};
use egui::{Color32, ColorImage, FontId, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2, Widget};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ZOOM_SCROLL_SENSITIVITY: f64 = 0.002;
const PANEL_MARGIN: f32 = 10.0;
const ATTRIBUTION_HEIGHT: f32 = 16.0;
const LEGEND_ROW_HEIGHT: f32 = 18.0;
const LEGEND_SWATCH: f32 = 14.0;
const LEGEND_WIDTH: f32 = 200.0;
const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(240, 240, 240, 230);
const DATA_ATTRIBUTION: &str = "Data: USGS, PB2002 (Bird, 2003)";

/// Per-map state kept in egui memory between frames
struct MapViewState {
    textures: LruCache<(BaseLayerPreset, TileCoord), egui::TextureHandle>,
    popup: Option<OpenPopup>,
}

#[derive(Debug, Clone)]
struct OpenPopup {
    overlay: FeedKind,
    anchor: LatLng,
    content: PopupContent,
}

impl MapViewState {
    fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            textures: LruCache::new(capacity),
            popup: None,
        }
    }

    /// Drops the open popup once its overlay is hidden
    fn close_hidden_popup(&mut self, composer: &MapComposer) {
        if let Some(popup) = &self.popup {
            if !composer.group(popup.overlay).is_visible() {
                self.popup = None;
            }
        }
    }
}

/// Paints a [`MapComposer`] and forwards pan, zoom, clicks and layer-control
/// choices back to it.
///
/// ```ignore
/// ui.add(MapView::new(&mut composer));
/// ```
pub struct MapView<'a> {
    composer: &'a mut MapComposer,
    id: Option<egui::Id>,
    interactive: bool,
    show_layer_control: bool,
    show_zoom_controls: bool,
    show_attribution: bool,
}

impl<'a> MapView<'a> {
    pub fn new(composer: &'a mut MapComposer) -> Self {
        Self {
            composer,
            id: None,
            interactive: true,
            show_layer_control: true,
            show_zoom_controls: true,
            show_attribution: true,
        }
    }

    pub fn id(mut self, id: impl Into<egui::Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn layer_control(mut self, show: bool) -> Self {
        self.show_layer_control = show;
        self
    }

    pub fn zoom_controls(mut self, show: bool) -> Self {
        self.show_zoom_controls = show;
        self
    }

    pub fn attribution(mut self, show: bool) -> Self {
        self.show_attribution = show;
        self
    }

    fn handle_input(&mut self, ui: &Ui, rect: Rect, response: &Response, state: &mut MapViewState) {
        let viewport = self.composer.viewport_mut();

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                let focus = ui
                    .input(|i| i.pointer.hover_pos())
                    .map(|pos| local_point(rect, pos));
                let zoom = viewport.zoom + scroll as f64 * ZOOM_SCROLL_SENSITIVITY;
                viewport.zoom_to(zoom, focus);
            }
        }

        if response.dragged() {
            let delta = response.drag_delta();
            if delta.length_sq() > 0.0 {
                viewport.pan(Point::new(delta.x as f64, delta.y as f64));
            }
        }

        if response.double_clicked() {
            let focus = response.interact_pointer_pos().map(|pos| local_point(rect, pos));
            let zoom = viewport.zoom.floor() + 1.0;
            viewport.zoom_to(zoom, focus);
        } else if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let screen = local_point(rect, pos);
                state.popup = self.composer.hit_test(screen).map(|(overlay, item)| OpenPopup {
                    overlay,
                    anchor: match item {
                        RenderedItem::Circle(marker) => marker.position,
                        RenderedItem::Path(_) => self.composer.viewport().pixel_to_lat_lng(&screen),
                    },
                    content: item.popup().clone(),
                });
            }
        }
    }

    fn paint_tiles(&self, ui: &Ui, rect: Rect, layer: &TileLayer, state: &mut MapViewState) {
        let painter = ui.painter_at(rect);
        let viewport = self.composer.viewport();
        let preset = layer.preset();

        for coord in layer.visible_tiles(viewport) {
            let Some((found, bytes)) = layer.tile_data(coord) else {
                continue;
            };

            let texture = match state.textures.get(&(preset, found)) {
                Some(texture) => texture.clone(),
                None => {
                    let Some(image) = decode_tile(&bytes) else {
                        log::warn!("could not decode tile {:?}", found);
                        continue;
                    };
                    let texture = ui.ctx().load_texture(
                        format!("{}-{}-{}-{}", preset.name(), found.z, found.x, found.y),
                        image,
                        egui::TextureOptions::LINEAR,
                    );
                    state.textures.put((preset, found), texture.clone());
                    texture
                }
            };

            let uv = sub_tile_uv(found, coord);
            let bounds = coord.bounds();
            let nw = viewport.lat_lng_to_pixel(&LatLng::new(bounds.north_east.lat, bounds.south_west.lng));
            let se = viewport.lat_lng_to_pixel(&LatLng::new(bounds.south_west.lat, bounds.north_east.lng));
            let tile_rect = Rect::from_two_pos(screen_pos(rect, nw), screen_pos(rect, se));

            painter.image(texture.id(), tile_rect, uv, Color32::WHITE.gamma_multiply(layer.opacity()));
        }
    }

    fn paint_group(&self, ui: &Ui, rect: Rect, group: &LayerGroup) {
        if !group.is_visible() {
            return;
        }
        let painter = ui.painter_at(rect);
        let viewport = self.composer.viewport();
        let visible = rect.expand(64.0);

        for item in group.items() {
            match item {
                RenderedItem::Path(line) => {
                    let color = Color32::from(line.style.color.with_opacity(line.style.opacity));
                    let stroke = Stroke::new(line.style.width, color);
                    for path in &line.paths {
                        let points: Vec<Pos2> = path
                            .iter()
                            .map(|ll| screen_pos(rect, viewport.lat_lng_to_pixel(ll)))
                            .collect();
                        painter.add(egui::Shape::line(points, stroke));
                    }
                }
                RenderedItem::Circle(marker) => {
                    let center = screen_pos(rect, viewport.lat_lng_to_pixel(&marker.position));
                    if !visible.contains(center) {
                        continue;
                    }
                    let radius = marker.display_radius() as f32;
                    let style = &marker.style;
                    painter.circle_filled(
                        center,
                        radius,
                        Color32::from(style.fill_color.with_opacity(style.fill_opacity)),
                    );
                    painter.circle_stroke(
                        center,
                        radius,
                        Stroke::new(
                            style.stroke_width,
                            Color32::from(style.stroke_color.with_opacity(style.stroke_opacity)),
                        ),
                    );
                }
            }
        }
    }

    fn paint_popup(&self, ui: &Ui, rect: Rect, popup: &OpenPopup) {
        let anchor = screen_pos(rect, self.composer.viewport().lat_lng_to_pixel(&popup.anchor));
        if !rect.contains(anchor) {
            return;
        }

        let title_font = FontId::proportional(14.0);
        let row_font = FontId::proportional(12.0);
        let rows: Vec<String> = popup
            .content
            .rows
            .iter()
            .map(|row| format!("{}: {}", row.label, row.value))
            .collect();

        let (title_size, row_sizes) = ui.fonts(|fonts| {
            let title = fonts
                .layout_no_wrap(popup.content.title.clone(), title_font.clone(), Color32::BLACK)
                .size();
            let rows: Vec<Vec2> = rows
                .iter()
                .map(|row| fonts.layout_no_wrap(row.clone(), row_font.clone(), Color32::BLACK).size())
                .collect();
            (title, rows)
        });

        let padding = 8.0;
        let width = row_sizes
            .iter()
            .map(|s| s.x)
            .fold(title_size.x, f32::max)
            + 2.0 * padding;
        let height = title_size.y
            + padding
            + row_sizes.iter().map(|s| s.y + 2.0).sum::<f32>()
            + 2.0 * padding;
        let size = Vec2::new(width, height);
        let popup_rect = Rect::from_min_size(anchor - Vec2::new(width / 2.0, height + 10.0), size);

        let painter = ui.painter();
        painter.rect_filled(popup_rect, 4.0, Color32::WHITE);
        painter.rect_stroke(popup_rect, 4.0, Stroke::new(1.0, Color32::from_gray(120)));
        painter.line_segment([anchor, popup_rect.center_bottom()], Stroke::new(1.0, Color32::from_gray(120)));

        let mut cursor = popup_rect.min + Vec2::splat(padding);
        painter.text(cursor, egui::Align2::LEFT_TOP, &popup.content.title, title_font, Color32::BLACK);
        cursor.y += title_size.y + padding / 2.0;
        painter.line_segment(
            [Pos2::new(popup_rect.min.x + padding, cursor.y), Pos2::new(popup_rect.max.x - padding, cursor.y)],
            Stroke::new(1.0, Color32::from_gray(180)),
        );
        cursor.y += padding / 2.0;
        for (row, row_size) in rows.iter().zip(&row_sizes) {
            painter.text(cursor, egui::Align2::LEFT_TOP, row, row_font.clone(), Color32::DARK_GRAY);
            cursor.y += row_size.y + 2.0;
        }
    }

    fn paint_legend(&self, ui: &Ui, container: Rect, legend: &Legend) {
        let rect = legend.position.calculate_rect(container, legend_size(legend), PANEL_MARGIN);
        let painter = ui.painter();
        painter.rect_filled(rect, 4.0, PANEL_FILL);

        let mut y = rect.min.y + 6.0;
        painter.text(
            Pos2::new(rect.min.x + 8.0, y),
            egui::Align2::LEFT_TOP,
            &legend.title,
            FontId::proportional(13.0),
            Color32::BLACK,
        );
        y += LEGEND_ROW_HEIGHT + 2.0;

        for entry in &legend.entries {
            let swatch = Rect::from_min_size(Pos2::new(rect.min.x + 8.0, y + 2.0), Vec2::splat(LEGEND_SWATCH));
            painter.rect_filled(swatch, 2.0, Color32::from(entry.swatch));
            painter.text(
                Pos2::new(swatch.max.x + 8.0, y),
                egui::Align2::LEFT_TOP,
                &entry.label,
                FontId::proportional(12.0),
                Color32::BLACK,
            );
            y += LEGEND_ROW_HEIGHT;
        }
    }

    /// Base layer radio buttons and overlay checkboxes; choices are applied
    /// to the composer after the panel is drawn.
    fn show_layer_control(&mut self, ui: &Ui, rect: Rect) {
        let control = self.composer.layer_control();
        let position = control.position();
        let mut selected_base = None;
        let mut toggled = Vec::new();

        let area = egui::Area::new(ui.id().with("layer-control"))
            .order(egui::Order::Foreground)
            .fixed_pos(position.calculate_rect(rect, Vec2::new(170.0, 0.0), PANEL_MARGIN).min);
        area.show(ui.ctx(), |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                for (index, entry) in control.base_layers().iter().enumerate() {
                    if ui.radio(index == control.active_base_index(), &entry.name).clicked() {
                        selected_base = Some(index);
                    }
                }
                ui.separator();
                for overlay in control.overlays() {
                    let mut visible = overlay.visible;
                    if ui.checkbox(&mut visible, &overlay.name).changed() {
                        toggled.push((overlay.id.clone(), visible));
                    }
                }
            });
        });

        if let Some(index) = selected_base {
            if let Err(err) = self.composer.select_base_layer(index) {
                log::warn!("base layer change rejected: {}", err);
            }
        }
        for (id, visible) in toggled {
            let kind = FeedKind::ALL
                .into_iter()
                .find(|kind| self.composer.group(*kind).id() == id);
            if let Some(kind) = kind {
                if let Err(err) = self.composer.set_overlay_visible(kind, visible) {
                    log::warn!("overlay toggle rejected: {}", err);
                }
            }
        }
    }

    fn show_zoom_controls(&mut self, ui: &Ui, rect: Rect) {
        let mut delta = 0.0;
        egui::Area::new(ui.id().with("zoom-control"))
            .order(egui::Order::Foreground)
            .fixed_pos(Position::TopLeft.calculate_rect(rect, Vec2::ZERO, PANEL_MARGIN).min)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    if ui.button("+").clicked() {
                        delta += 1.0;
                    }
                    if ui.button("\u{2212}").clicked() {
                        delta -= 1.0;
                    }
                });
            });

        if delta != 0.0 {
            let viewport = self.composer.viewport_mut();
            let zoom = viewport.zoom.round() + delta;
            viewport.zoom_to(zoom, None);
        }
    }

    fn paint_attribution(&self, ui: &Ui, rect: Rect) {
        let mut text = DATA_ATTRIBUTION.to_string();
        if let Some(layer) = self.composer.active_base_layer() {
            text = format!("{} | {}", layer.attribution(), text);
        }

        let strip = Rect::from_min_max(Pos2::new(rect.min.x, rect.max.y - ATTRIBUTION_HEIGHT), rect.max);
        let painter = ui.painter();
        painter.rect_filled(strip, 0.0, Color32::from_rgba_unmultiplied(255, 255, 255, 180));
        painter.text(
            strip.right_center() - Vec2::new(4.0, 0.0),
            egui::Align2::RIGHT_CENTER,
            text,
            FontId::proportional(10.0),
            Color32::from_gray(60),
        );
    }
}

impl Widget for MapView<'_> {
    fn ui(mut self, ui: &mut Ui) -> Response {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.composer
            .viewport_mut()
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        let state_id = self.id.unwrap_or_else(|| ui.id().with("quakemap"));
        let cache_size = self.composer.config().tiles.cache_size;
        let shared = ui.ctx().memory_mut(|mem| {
            mem.data
                .get_temp_mut_or_insert_with(state_id, || Arc::new(Mutex::new(MapViewState::new(cache_size))))
                .clone()
        });
        let Ok(mut state) = shared.lock() else {
            return response;
        };

        if self.interactive {
            self.handle_input(ui, rect, &response, &mut state);
        }

        ui.painter().rect_filled(rect, 0.0, Color32::from_rgb(170, 211, 223));

        let viewport = self.composer.viewport().clone();
        let mut loading = false;
        if let Some(layer) = self.composer.active_base_layer_mut() {
            layer.update_tiles(&viewport);
            loading = layer.is_loading();
        }
        if let Some(layer) = self.composer.active_base_layer() {
            self.paint_tiles(ui, rect, layer, &mut state);
        }

        for (_, group) in self.composer.overlays() {
            self.paint_group(ui, rect, group);
        }

        let legend_area = if self.show_attribution {
            Rect::from_min_max(rect.min, rect.max - Vec2::new(0.0, ATTRIBUTION_HEIGHT))
        } else {
            rect
        };
        for legend in self.composer.visible_legends() {
            self.paint_legend(ui, legend_area, legend);
        }

        state.close_hidden_popup(&*self.composer);
        if let Some(popup) = &state.popup {
            self.paint_popup(ui, rect, popup);
        }

        if self.show_attribution {
            self.paint_attribution(ui, rect);
        }
        if self.show_layer_control {
            self.show_layer_control(ui, rect);
        }
        if self.show_zoom_controls {
            self.show_zoom_controls(ui, rect);
        }

        if loading {
            ui.ctx().request_repaint_after(Duration::from_millis(100));
        }

        response
    }
}

/// Position relative to the map's top-left corner
fn local_point(rect: Rect, pos: Pos2) -> Point {
    Point::new((pos.x - rect.min.x) as f64, (pos.y - rect.min.y) as f64)
}

fn screen_pos(rect: Rect, point: Point) -> Pos2 {
    Pos2::new(rect.min.x + point.x as f32, rect.min.y + point.y as f32)
}

/// Decodes PNG or JPEG tile bytes into an egui image.
pub fn decode_tile(bytes: &[u8]) -> Option<ColorImage> {
    let img = image::load_from_memory(bytes).ok()?.to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Some(ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}

/// Part of ancestor tile `found` that covers `coord`, in texture UVs.
fn sub_tile_uv(found: TileCoord, coord: TileCoord) -> Rect {
    let dz = coord.z.saturating_sub(found.z);
    if dz == 0 {
        return Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
    }
    let span = (1u32 << dz) as f32;
    let offset_x = (coord.x - (found.x << dz)) as f32;
    let offset_y = (coord.y - (found.y << dz)) as f32;
    Rect::from_min_size(
        Pos2::new(offset_x / span, offset_y / span),
        Vec2::splat(1.0 / span),
    )
}

fn legend_size(legend: &Legend) -> Vec2 {
    Vec2::new(
        LEGEND_WIDTH,
        12.0 + LEGEND_ROW_HEIGHT + 2.0 + legend.len() as f32 * LEGEND_ROW_HEIGHT,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::DepthScale;

    #[test]
    fn test_decode_tile() {
        let pixels = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(pixels)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .unwrap();

        let decoded = decode_tile(&bytes).unwrap();
        assert_eq!(decoded.size, [2, 2]);
        assert_eq!(decoded.pixels[0], Color32::from_rgb(10, 20, 30));
        assert!(decode_tile(b"not an image").is_none());
    }

    #[test]
    fn test_popup_closes_with_its_overlay() {
        let mut composer = MapComposer::new(crate::core::config::MapConfig::default());
        composer.attach();
        let mut state = MapViewState::new(4);
        state.popup = Some(OpenPopup {
            overlay: FeedKind::TectonicPlates,
            anchor: LatLng::new(0.0, 0.0),
            content: PopupContent::new("PA-NA"),
        });

        composer.set_overlay_visible(FeedKind::Earthquakes, false).unwrap();
        state.close_hidden_popup(&composer);
        assert!(state.popup.is_some());

        composer.set_overlay_visible(FeedKind::TectonicPlates, false).unwrap();
        state.close_hidden_popup(&composer);
        assert!(state.popup.is_none());
    }

    #[test]
    fn test_sub_tile_uv() {
        let full = sub_tile_uv(TileCoord::new(3, 3, 2), TileCoord::new(3, 3, 2));
        assert_eq!(full, Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)));

        // bottom-right quarter of the parent
        let quarter = sub_tile_uv(TileCoord::new(1, 1, 1), TileCoord::new(3, 3, 2));
        assert_eq!(quarter, Rect::from_min_max(Pos2::new(0.5, 0.5), Pos2::new(1.0, 1.0)));
    }

    #[test]
    fn test_screen_conversions_round_trip() {
        let rect = Rect::from_min_size(Pos2::new(100.0, 50.0), Vec2::new(800.0, 600.0));
        let local = local_point(rect, Pos2::new(150.0, 80.0));

        assert_eq!(local, Point::new(50.0, 30.0));
        assert_eq!(screen_pos(rect, local), Pos2::new(150.0, 80.0));
    }

    #[test]
    fn test_legend_size_grows_with_rows() {
        let depth = Legend::depth(&DepthScale::standard(), Position::BottomRight);
        let boundaries = Legend::boundaries(Position::BottomLeft);

        assert!(legend_size(&depth).y > legend_size(&boundaries).y);
        assert_eq!(legend_size(&depth).x, LEGEND_WIDTH);
    }
}
