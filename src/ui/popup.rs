use egui::{Id, Order, Pos2, RichText};
use gantt::chart::Popup;

use crate::ui::theme;

/// Task details floating next to the bar they describe.
pub fn show_popup(ctx: &egui::Context, origin: Pos2, popup: &Popup) {
    let pos = Pos2::new(origin.x + popup.x as f32, origin.y + popup.y as f32);
    egui::Area::new(Id::new("gantt_popup"))
        .order(Order::Foreground)
        .fixed_pos(pos)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_max_width(theme::POPUP_WIDTH);
                ui.label(
                    RichText::new(&popup.title)
                        .font(theme::font_header())
                        .strong()
                        .color(theme::TEXT_PRIMARY),
                );
                ui.label(
                    RichText::new(&popup.subtitle)
                        .font(theme::font_sub())
                        .color(theme::TEXT_SECONDARY),
                );
            });
        });
}
