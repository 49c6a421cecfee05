use egui::{menu, RichText, Ui};
use egui_phosphor::regular as icons;
use gantt::config::PopupTrigger;
use gantt::model::Language;
use gantt::ViewScale;

use crate::app::GanttApp;
use crate::ui::theme;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  New Project", icons::FILE_PLUS)).clicked() {
                app.new_project();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open...", icons::FOLDER_OPEN)).clicked() {
                app.open_project();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .button(format!("{}  Save          Ctrl+S", icons::FLOPPY_DISK))
                .clicked()
            {
                app.save_project();
                ui.close_menu();
            }
            if ui.button("     Save As...").clicked() {
                app.save_project_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button(format!("{}  Import CSV...", icons::FILE_CSV)).clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button(format!("{}  Export CSV...", icons::EXPORT)).clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            let current = app.chart.view_mode();
            for scale in ViewScale::ALL {
                if ui.radio(current == scale, scale.label()).clicked() {
                    app.set_view_mode(scale);
                    ui.close_menu();
                }
            }
            ui.separator();
            ui.label(RichText::new("Popup").small().weak());
            let trigger = app.chart.options().popup_trigger;
            if ui.radio(trigger == PopupTrigger::Click, "On click").clicked() {
                app.set_popup_trigger(PopupTrigger::Click);
                ui.close_menu();
            }
            if ui
                .radio(trigger == PopupTrigger::MouseOver, "On hover")
                .clicked()
            {
                app.set_popup_trigger(PopupTrigger::MouseOver);
                ui.close_menu();
            }
            ui.separator();
            ui.menu_button(format!("{}  Language", icons::TRANSLATE), |ui| {
                let active = app.chart.options().language;
                for language in Language::ALL {
                    if ui.radio(active == language, language.to_string()).clicked() {
                        app.set_language(language);
                        ui.close_menu();
                    }
                }
            });
        });

        ui.menu_button(RichText::new("  Settings  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  Save Chart Options", icons::GEAR)).clicked() {
                app.save_options();
                ui.close_menu();
            }
            if ui.button(format!("{}  Open Config Folder", icons::FOLDER)).clicked() {
                app.open_config_folder();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button(format!("{}  About", icons::INFO)).clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let modified = if app.file_path.is_some() { "" } else { " (unsaved)" };
            ui.label(
                RichText::new(format!("{}{}", app.project.name, modified))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
