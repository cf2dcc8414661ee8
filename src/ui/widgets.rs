use eframe::egui;
use egui::Layout;

use crate::model::message::Message;
use crate::ui::settings::AppSettings;

pub fn bubble(ui: &mut egui::Ui, color: egui::Color32, text: &str) {
    egui::Frame::new()
        .fill(color)
        .corner_radius(egui::CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(10, 6))
        .show(ui, |ui| {
            ui.set_max_width(ui.available_width() * 0.8);
            ui.label(egui::RichText::new(text).color(egui::Color32::WHITE));
        });
}

pub fn draw_message(ui: &mut egui::Ui, msg: &Message, settings: &AppSettings) {
    let caption = match &msg.timestamp {
        Some(t) => format!("{} · {}", msg.speaker.label(), t.format("%H:%M")),
        None => msg.speaker.label().to_string(),
    };
    let color = settings.speaker_color(&msg.speaker);

    ui.add_space(6.0);

    let layout = if msg.is_player() {
        Layout::top_down(egui::Align::Max)
    } else {
        Layout::top_down(egui::Align::Min)
    };
    ui.with_layout(layout, |ui| {
        ui.label(egui::RichText::new(caption).small().weak());
        bubble(ui, color, &msg.text);
    });
}

/// Scrollable transcript that follows new messages.
pub fn transcript(
    ui: &mut egui::Ui,
    id_salt: &str,
    messages: &[Message],
    busy: bool,
    settings: &AppSettings,
) {
    egui::ScrollArea::vertical()
        .id_salt(id_salt)
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for msg in messages {
                draw_message(ui, msg, settings);
            }
            if busy {
                ui.add_space(8.0);
                ui.vertical_centered(|ui| ui.spinner());
            }
        });
}

/// Multiline input with a Send button. Enter sends, Shift+Enter adds a newline.
/// Returns true when the user asked to send.
pub fn chat_input(
    ui: &mut egui::Ui,
    id: egui::Id,
    text: &mut String,
    hint: &str,
    busy: bool,
) -> bool {
    let mut send_now = false;

    ui.horizontal(|ui| {
        let focused = ui.memory(|m| m.has_focus(id));
        if focused && !busy {
            send_now = ui.input_mut(|i| {
                i.key_pressed(egui::Key::Enter)
                    && !i.modifiers.shift
                    && i.consume_key(egui::Modifiers::NONE, egui::Key::Enter)
            });
        }

        ui.add_enabled(
            !busy,
            egui::TextEdit::multiline(text)
                .id(id)
                .hint_text(hint)
                .desired_rows(2)
                .desired_width(ui.available_width() - 70.0),
        );

        let can_send = !busy && !text.trim().is_empty();
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            send_now = true;
        }
    });

    if send_now {
        ui.memory_mut(|m| m.request_focus(id));
    }
    send_now
}
