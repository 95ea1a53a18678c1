pub mod elements;
pub mod legend;
pub mod popup;

#[cfg(feature = "egui")]
pub mod widget;

pub use elements::Position;
pub use legend::{Legend, LegendEntry};
pub use popup::{PopupContent, PopupRow};

#[cfg(feature = "egui")]
pub use widget::MapView;

#[cfg(feature = "egui")]
pub trait UiMapExt {
    fn quake_map(&mut self, composer: &mut crate::core::composer::MapComposer) -> egui::Response;
}

#[cfg(feature = "egui")]
impl UiMapExt for egui::Ui {
    fn quake_map(&mut self, composer: &mut crate::core::composer::MapComposer) -> egui::Response {
        self.add(MapView::new(composer))
    }
}
