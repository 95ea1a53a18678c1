use anyhow::Context as _;
use quakemap::{
    ui::UiMapExt, FeedKind, FeedLoader, FeedStatus, HttpFeedSource, MapComposer, MapConfig,
};
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Desktop viewer for the earthquake and plate boundary map
fn main() -> anyhow::Result<()> {
    env_logger::init();

    let runtime = Runtime::new().context("failed to start tokio runtime")?;
    let config = MapConfig::default();
    let source = HttpFeedSource::new(config.feeds.clone()).context("failed to build feed client")?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Earthquakes and Plate Boundaries"),
        ..Default::default()
    };

    eframe::run_native(
        "quakemap-app",
        options,
        Box::new(move |cc| Box::new(QuakemapApp::new(cc, runtime, config, Arc::new(source)))),
    )
    .map_err(|err| anyhow::anyhow!("viewer exited with an error: {}", err))?;

    Ok(())
}

struct QuakemapApp {
    composer: MapComposer,
    loader: FeedLoader,
    show_status_panel: bool,
    // keeps the fetch tasks alive for the lifetime of the window
    _runtime: Runtime,
}

impl QuakemapApp {
    fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: Runtime,
        config: MapConfig,
        source: Arc<HttpFeedSource>,
    ) -> Self {
        let mut composer = MapComposer::new(config);
        composer.attach();

        let ctx = cc.egui_ctx.clone();
        let loader = FeedLoader::new().with_notify(move || ctx.request_repaint());
        loader.spawn_all(runtime.handle(), source);
        log::info!("viewer started, feeds requested");

        Self {
            composer,
            loader,
            show_status_panel: true,
            _runtime: runtime,
        }
    }

    fn status_panel(&self, ui: &mut egui::Ui) {
        ui.heading("Feeds");
        ui.separator();

        for kind in FeedKind::ALL {
            let text = match self.composer.status(kind) {
                FeedStatus::Pending => "loading\u{2026}".to_string(),
                FeedStatus::Loaded { rendered, skipped } if *skipped > 0 => {
                    format!("{} shown, {} skipped", rendered, skipped)
                }
                FeedStatus::Loaded { rendered, .. } => format!("{} shown", rendered),
                FeedStatus::Failed(reason) => format!("unavailable: {}", reason),
            };
            ui.label(format!("{}: {}", kind, text));
        }

        ui.separator();
        ui.label(format!("State: {:?}", self.composer.state()));
    }
}

impl eframe::App for QuakemapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.loader.drain_into(&mut self.composer) > 0 {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_status_panel, "Feed Status");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let viewport = self.composer.viewport();
                    ui.label(format!(
                        "Center: {:.4}, {:.4} | Zoom: {:.2}",
                        viewport.center.lat, viewport.center.lng, viewport.zoom
                    ));
                });
            });
        });

        if self.show_status_panel {
            egui::SidePanel::left("status_panel")
                .resizable(true)
                .show(ctx, |ui| self.status_panel(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                ui.quake_map(&mut self.composer);
            });
    }
}
