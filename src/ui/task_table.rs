use egui::{RichText, Sense, Ui};
use egui_extras::{Column, TableBuilder};
use gantt::model::calendar;
use gantt::Task;

use crate::ui::theme;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(String),
}

/// Render the left-side task table panel.
pub fn show_task_table(tasks: &[Task], selected_task: Option<&str>, ui: &mut Ui) -> TaskTableAction {
    let mut action = TaskTableAction::None;

    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", tasks.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();

    let header = |ui: &mut Ui, text: &str| {
        ui.label(RichText::new(text).size(9.0).color(theme::TEXT_DIM).strong());
    };

    TableBuilder::new(ui)
        .striped(true)
        .sense(Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(12.0))
        .column(Column::remainder().at_least(90.0).clip(true))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::exact(44.0))
        .header(18.0, |mut row| {
            row.col(|_| {});
            row.col(|ui| header(ui, "TASK"));
            row.col(|ui| header(ui, "START"));
            row.col(|ui| header(ui, "END"));
            row.col(|ui| header(ui, "DONE"));
        })
        .body(|mut body| {
            for task in tasks {
                body.row(22.0, |mut row| {
                    row.set_selected(selected_task == Some(task.id.as_str()));

                    row.col(|ui| {
                        let (dot, _) = ui.allocate_exact_size(egui::vec2(6.0, 6.0), Sense::hover());
                        ui.painter().circle_filled(
                            dot.center(),
                            3.0,
                            theme::bar_color(task.custom_class.as_deref(), task.invalid),
                        );
                    });
                    row.col(|ui| {
                        let color = if task.invalid {
                            theme::TEXT_DIM
                        } else {
                            theme::TEXT_PRIMARY
                        };
                        let response = ui.label(RichText::new(&task.name).size(12.0).color(color));
                        if !task.dependencies.is_empty() {
                            response.on_hover_text(format!(
                                "Depends on {}",
                                task.dependencies.join(", ")
                            ));
                        }
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(calendar::to_date_string(task.start, false))
                                .size(11.0)
                                .color(theme::TEXT_SECONDARY),
                        );
                    });
                    row.col(|ui| {
                        let last = calendar::add(task.end, -1, calendar::TimeUnit::Second);
                        ui.label(
                            RichText::new(calendar::to_date_string(last, false))
                                .size(11.0)
                                .color(theme::TEXT_SECONDARY),
                        );
                    });
                    row.col(|ui| {
                        ui.label(
                            RichText::new(format!("{}%", task.progress))
                                .size(11.0)
                                .color(theme::TEXT_DIM),
                        );
                    });

                    if row.response().clicked() {
                        action = TaskTableAction::Select(task.id.clone());
                    }
                });
            }
        });

    action
}
