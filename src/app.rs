use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use gantt::chart::Gantt;
use gantt::config::{self, GanttOptions, PopupTrigger};
use gantt::io::{csv_export, csv_import, file};
use gantt::model::calendar::{self, TimeUnit};
use gantt::model::{Language, Project};
use gantt::{GanttEvent, RawTask, RenderSurface, ViewScale};
use tracing::{info, warn};

use crate::ui;
use crate::ui::gantt_chart::SceneSurface;

/// Main application state.
pub struct GanttApp {
    pub project: Project,
    pub chart: Gantt<SceneSurface>,
    events: Receiver<GanttEvent>,
    pub file_path: Option<PathBuf>,
    pub selected_task: Option<String>,
    pub show_about: bool,
    pub status_message: String,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> gantt::Result<Self> {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);
        ui::theme::apply_theme(&cc.egui_ctx);

        let project = Self::sample_project();
        let options = config::load_or_default();
        let (sender, events) = mpsc::channel();
        let chart = Gantt::new(
            SceneSurface::new(cc.egui_ctx.clone()),
            &project.tasks,
            options,
            sender,
        )?;

        Ok(Self {
            project,
            chart,
            events,
            file_path: None,
            selected_task: None,
            show_about: false,
            status_message: "Ready".to_string(),
        })
    }

    /// Generate a sample project for demonstration.
    fn sample_project() -> Project {
        let today = calendar::today();
        let day = |offset: i64| {
            calendar::to_date_string(calendar::add(today, offset, TimeUnit::Day), false)
        };

        let mut project = Project::new("Sample Project");
        project.tasks = vec![
            RawTask::new("Project Kickoff", &day(-5), &day(-3))
                .with_id("kickoff")
                .with_progress(100),
            RawTask::new("Requirements Gathering", &day(-2), &day(4))
                .with_id("requirements")
                .with_progress(60)
                .with_dependencies("kickoff"),
            RawTask::new("Design", &day(5), &day(11))
                .with_id("design")
                .with_progress(20)
                .with_dependencies("requirements"),
            RawTask::new("Implementation", &day(12), &day(30))
                .with_id("build")
                .with_dependencies("design"),
            RawTask::new("Documentation", &day(14), &day(24))
                .with_id("docs")
                .with_dependencies("design"),
            RawTask::new("Testing", &day(25), &day(34))
                .with_id("testing")
                .with_dependencies("build"),
            RawTask::new("Release", &day(35), &day(35))
                .with_id("release")
                .with_dependencies("testing, docs"),
        ];
        project
    }

    // --- File operations ---

    pub fn new_project(&mut self) {
        self.project = Project::default();
        self.file_path = None;
        self.reload_chart();
        self.status_message = "New project created".to_string();
    }

    pub fn open_project(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .pick_file()
        {
            match file::load_project(&path) {
                Ok(project) => {
                    self.project = project;
                    self.file_path = Some(path);
                    self.reload_chart();
                    self.status_message = "Project loaded".to_string();
                }
                Err(e) => {
                    self.status_message = format!("Error loading: {}", e);
                }
            }
        }
    }

    pub fn save_project(&mut self) {
        if let Some(path) = self.file_path.clone() {
            self.project.touch();
            match file::save_project(&self.project, &path) {
                Ok(()) => self.status_message = "Project saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        } else {
            self.save_project_as();
        }
    }

    pub fn save_project_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Gantt Project", &["gantt.json", "json"])
            .set_file_name(format!("{}.gantt.json", self.project.name))
            .save_file()
        {
            self.file_path = Some(path.clone());
            self.project.touch();
            match file::save_project(&self.project, &path) {
                Ok(()) => self.status_message = "Project saved".to_string(),
                Err(e) => self.status_message = format!("Error saving: {}", e),
            }
        }
    }

    pub fn import_csv(&mut self) {
        if !self.project.tasks.is_empty() {
            let confirm = rfd::MessageDialog::new()
                .set_title("Import CSV")
                .set_description("This will replace the current project. Continue?")
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();
            if confirm != rfd::MessageDialogResult::Yes {
                return;
            }
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match csv_import::import_csv(&path) {
                Ok((tasks, skipped)) => {
                    let name = path
                        .file_stem()
                        .and_then(|s| s.to_str())
                        .unwrap_or("Imported Project")
                        .to_string();

                    let count = tasks.len();
                    self.project = Project::new(name);
                    self.project.tasks = tasks;
                    self.file_path = None;
                    self.reload_chart();

                    self.status_message = if skipped > 0 {
                        format!("Imported {} tasks ({} rows skipped)", count, skipped)
                    } else {
                        format!("Imported {} tasks", count)
                    };
                }
                Err(e) => {
                    self.status_message = format!("CSV import failed: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.chart.tasks().is_empty() {
            self.status_message = "Nothing to export, the project has no tasks".to_string();
            return;
        }

        let default_name = format!("{}.csv", self.project.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(default_name)
            .save_file()
        {
            match csv_export::export_csv(self.chart.tasks(), &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    // --- Chart settings ---

    pub fn set_view_mode(&mut self, scale: ViewScale) {
        self.chart.change_view_mode(scale);
    }

    pub fn set_popup_trigger(&mut self, trigger: PopupTrigger) {
        let options = GanttOptions {
            popup_trigger: trigger,
            ..self.chart.options().clone()
        };
        self.apply_options(options);
    }

    pub fn set_language(&mut self, language: Language) {
        let options = GanttOptions {
            language,
            ..self.chart.options().clone()
        };
        self.apply_options(options);
    }

    fn apply_options(&mut self, options: GanttOptions) {
        if let Err(e) = self.chart.set_options(options) {
            self.status_message = format!("Options rejected: {}", e);
        }
    }

    pub fn save_options(&mut self) {
        let Some(path) = config::default_options_path() else {
            self.status_message = "No config directory available".to_string();
            return;
        };
        match config::save_options(self.chart.options(), &path) {
            Ok(()) => {
                info!(path = %path.display(), "saved chart options");
                self.status_message = "Chart options saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving options: {}", e),
        }
    }

    pub fn open_config_folder(&mut self) {
        let Some(dir) = config::default_options_path()
            .and_then(|path| path.parent().map(|p| p.to_path_buf()))
        else {
            return;
        };
        if let Err(e) = std::fs::create_dir_all(&dir).and_then(|_| open::that(&dir)) {
            warn!(error = %e, dir = %dir.display(), "cannot open config folder");
            self.status_message = format!("Cannot open {}: {}", dir.display(), e);
        }
    }

    // --- Chart state ---

    fn reload_chart(&mut self) {
        self.selected_task = None;
        self.chart.refresh(&self.project.tasks);
    }

    fn select_task(&mut self, id: String) {
        if let Some(bar) = self.chart.bar(&id) {
            let x = bar.x - self.chart.options().column_width;
            self.chart.surface_mut().scroll_to(x);
        }
        self.selected_task = Some(id);
    }

    fn task_name(&self, id: &str) -> String {
        self.chart
            .task(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Apply what the chart reported this frame.
    fn drain_events(&mut self) {
        let mut edited = false;
        while let Ok(event) = self.events.try_recv() {
            match event {
                GanttEvent::DateChange {
                    task_id,
                    start,
                    end,
                } => {
                    self.status_message = format!(
                        "Updated '{}' ({} → {})",
                        self.task_name(&task_id),
                        calendar::to_date_string(start, false),
                        calendar::to_date_string(end, false)
                    );
                    edited = true;
                }
                GanttEvent::ProgressChange { task_id, progress } => {
                    self.status_message =
                        format!("'{}' is {}% done", self.task_name(&task_id), progress);
                    edited = true;
                }
                GanttEvent::Click { task_id } => {
                    self.status_message = format!("Selected '{}'", self.task_name(&task_id));
                    self.selected_task = Some(task_id);
                }
                GanttEvent::ViewChange(scale) => {
                    self.status_message = format!("{} view", scale.label());
                }
            }
        }
        if edited {
            self.project.sync_from(self.chart.tasks());
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.chart.surface().fonts_ready() {
            self.chart.surface_mut().set_fonts_ready();
            self.chart.render();
        }

        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        let should_deselect = ctx.input(|i| i.key_pressed(egui::Key::Escape));
        if should_save {
            self.save_project();
        }
        if should_deselect {
            self.chart.clear_selection();
            self.selected_task = None;
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_STATUS)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!("Tasks: {}", self.chart.tasks().len()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                        ui.label(egui::RichText::new(" · ").size(10.5).color(ui::theme::TEXT_DIM));
                        ui.label(
                            egui::RichText::new(format!("Scale: {}", self.chart.view_mode().label()))
                                .size(10.5)
                                .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: task table
        let mut task_action = ui::task_table::TaskTableAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_MIN_WIDTH)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                task_action = ui::task_table::show_task_table(
                    self.chart.tasks(),
                    self.selected_task.as_deref(),
                    ui,
                );
            });
        if let ui::task_table::TaskTableAction::Select(id) = task_action {
            self.select_task(id);
        }

        // Central panel: Gantt chart
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            ui::gantt_chart::show_gantt_chart(&mut self.chart, ui);
        });

        self.drain_events();

        let mut show_about = self.show_about;
        egui::Window::new("About")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Rust Gantt Chart").strong().size(16.0));
                ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(6.0);
                ui.label("Drag bars to move them, their edges to resize and the triangle to set progress.");
                ui.label("Dependent tasks move along with the task they depend on.");
            });
        self.show_about = show_about;
    }
}
