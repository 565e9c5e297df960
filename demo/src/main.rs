use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use eframe::epaint::Color32;
use egui::ViewportBuilder;
use log::{error, info};
use wkt_viewer::{
    draw_crosshair, AppContext, Color, IngestError, IngestionWorkflow, LayerRenderer, ParseReport, PendingParse,
    RenderConfiguration, UiState, ViewState,
};

const ZOOM_FACTOR: f32 = 1.0;

struct StyleRequest {
    path: PathBuf,
    report: ParseReport,
    stroke: [u8; 3],
    fill: [u8; 3],
}

struct DemoApp {
    context: Arc<AppContext>,
    workflow: IngestionWorkflow,
    pending: Vec<PendingParse>,
    style_requests: VecDeque<StyleRequest>,
    view_state: ViewState,
    ui_state: UiState,
    configuration: RenderConfiguration,
    needs_fit: bool,
    path_input: String,
    status: String,
}

impl DemoApp {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        let context = Arc::new(AppContext::default());
        let workflow = IngestionWorkflow::new(context.clone());

        let mut app = Self {
            context,
            workflow,
            pending: Vec::new(),
            style_requests: VecDeque::new(),
            view_state: Default::default(),
            ui_state: Default::default(),
            configuration: RenderConfiguration::default(),
            needs_fit: false,
            path_input: String::new(),
            status: String::new(),
        };

        for path in paths {
            app.add_file(path);
        }

        app
    }

    fn add_file(&mut self, path: PathBuf) {
        match self.workflow.spawn_parse(&path) {
            Ok(pending) => {
                self.status = format!("Parsing '{}'", path.display());
                self.pending.push(pending);
            }
            Err(error) => {
                error!("Could not add '{}'. error: {}", path.display(), error);
                self.status = error.to_string();
            }
        }
    }

    fn poll_pending(&mut self) {
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for pending in self.pending.drain(..) {
            match pending.try_take() {
                None => still_pending.push(pending),
                Some(Ok(report)) => self.style_requests.push_back(StyleRequest {
                    path: pending.path().to_path_buf(),
                    report,
                    stroke: Color::DEFAULT_STROKE.into(),
                    fill: Color::DEFAULT_FILL.into(),
                }),
                Some(Err(error)) => {
                    error!("Parse failed. path: '{}', error: {}", pending.path().display(), error);
                    self.status = error.to_string();
                }
            }
        }

        self.pending = still_pending;
    }

    fn show_style_dialog(&mut self, ctx: &egui::Context) {
        let Some(request) = self.style_requests.front_mut() else {
            return;
        };

        let mut decision = None;

        egui::Window::new("Choose layer colors")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(format!("{}", request.path.display()));
                ui.label(format!(
                    "valid: {}, invalid: {}",
                    request.report.success_count(),
                    request.report.failure_count()
                ));
                ui.horizontal(|ui| {
                    ui.label("Stroke");
                    ui.color_edit_button_srgb(&mut request.stroke);
                });
                ui.horizontal(|ui| {
                    ui.label("Fill");
                    ui.color_edit_button_srgb(&mut request.fill);
                });
                ui.horizontal(|ui| {
                    if ui.button("Ok").clicked() {
                        decision = Some(Some((Color::from(request.stroke), Color::from(request.fill))));
                    }
                    if ui.button("Cancel").clicked() {
                        decision = Some(None);
                    }
                });
            });

        let Some(colors) = decision else {
            return;
        };
        let Some(request) = self.style_requests.pop_front() else {
            return;
        };

        let mut chooser = move || colors;
        match self
            .workflow
            .register(&request.path, request.report, &mut chooser)
        {
            Ok(outcome) => {
                self.status = match outcome.has_failures() {
                    true => format!(
                        "Added '{}', {} invalid line(s) skipped",
                        outcome.layer_name, outcome.failure_count
                    ),
                    false => format!("Added '{}'", outcome.layer_name),
                };
                self.needs_fit = true;
            }
            Err(IngestError::UserCancelled) => {
                self.status = format!("Cancelled '{}'", request.path.display());
            }
            Err(error) => {
                error!("Could not add layer. error: {}", error);
                self.status = error.to_string();
            }
        }
    }

    fn show_layer_list(&mut self, ui: &mut egui::Ui) {
        let mut remove_index = None;

        for (index, layer) in self
            .context
            .registry()
            .snapshot()
            .iter()
            .enumerate()
        {
            ui.horizontal(|ui| {
                ui.label(format!("{}: {} ({} geometries)", index, layer.name(), layer.features().len()));
                if ui.small_button("Remove").clicked() {
                    remove_index = Some(index);
                }
            });
        }

        if let Some(index) = remove_index {
            if let Err(error) = self.context.registry().remove_layer(index) {
                self.status = error.to_string();
            }
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_pending();
        if !self.pending.is_empty() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("WKT Viewer Demo");
                ui.label("Pan by using left-mouse button + drag, zoom using scroll wheel.");

                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.path_input);
                    if ui.button("Add layer").clicked() && !self.path_input.is_empty() {
                        let path = PathBuf::from(std::mem::take(&mut self.path_input));
                        self.add_file(path);
                    }
                    if ui.button("Fit").clicked() {
                        self.needs_fit = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.checkbox(&mut self.configuration.use_unique_shape_colors, "Unique colors");
                    ui.checkbox(&mut self.configuration.use_shape_numbering, "Shape numbers");
                    ui.checkbox(&mut self.configuration.draw_bounding_boxes, "Bounding boxes");
                    ui.checkbox(&mut self.configuration.draw_origin, "Origin");
                });

                self.show_layer_list(ui);

                ui.label(format!("coords: {:?}", self.ui_state.cursor_world_coords));
                ui.label(&self.status);
            });

        self.show_style_dialog(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = ui.allocate_rect(ui.available_rect_before_wrap(), egui::Sense::drag());
            let viewport = response.rect;

            if self.needs_fit {
                let bbox = self.context.registry().bounding_box();
                self.view_state.fit_view(viewport, &bbox, ZOOM_FACTOR);
                self.needs_fit = false;
            }

            self.ui_state
                .update(ui, &viewport, &response, &mut self.view_state);

            let painter = ui.painter().with_clip_rect(viewport);

            draw_crosshair(&painter, self.ui_state.center_screen_pos, Color32::LIGHT_GRAY);

            let layers = self.context.registry().snapshot();
            LayerRenderer::default().paint_layers(&painter, self.view_state, &layers, &self.configuration);
        });
    }
}

impl Drop for DemoApp {
    fn drop(&mut self) {
        self.context.close();
    }
}

fn main() -> eframe::Result<()> {
    init();

    let paths = std::env::args_os()
        .skip(1)
        .map(PathBuf::from)
        .collect::<Vec<_>>();
    info!("Starting. files: {}", paths.len());

    eframe::run_native(
        "WKT Viewer Demo (egui)",
        eframe::NativeOptions {
            viewport: ViewportBuilder::default().with_inner_size([1024.0, 768.0]),
            ..Default::default()
        },
        Box::new(|_cc| Ok(Box::new(DemoApp::new(paths)))),
    )
}

pub fn init() {
    env_logger::init(); // Log to stderr (optional).

    #[cfg(feature = "profile-with-puffin")]
    {
        start_puffin_server();
    }
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() {
    use tracing::{error, info};

    profiling::puffin::set_scopes_on(true); // tell puffin to collect data

    match puffin_http::Server::new("127.0.0.1:8585") {
        Ok(puffin_server) => {
            info!("Run:  cargo install puffin_viewer && puffin_viewer --url 127.0.0.1:8585");

            std::process::Command::new("puffin_viewer")
                .arg("--url")
                .arg("127.0.0.1:8585")
                .spawn()
                .ok();

            // dropping the server closes it
            #[allow(clippy::mem_forget)]
            std::mem::forget(puffin_server);
        }
        Err(err) => {
            error!("Failed to start puffin server: {err}");
        }
    };
}
