use eframe::egui;

use crate::model::inventory::InventoryItem;
use crate::model::player::PlayerInfo;
use crate::ui::game::screen::GameScreen;
use crate::ui::game::session::{ChatTarget, MainView};
use crate::ui::settings::AppSettings;
use crate::ui::widgets;

/* =========================
   Header
   ========================= */

pub fn draw_header(ctx: &egui::Context, screen: &mut GameScreen) {
    egui::TopBottomPanel::top("game_header").show(ctx, |ui| {
        ui.horizontal(|ui| {
            if ui.button("⬅ Title").clicked() {
                screen.return_to_title();
            }
            ui.separator();
            ui.heading(screen.session.title());

            if screen.session.poller.is_pending() {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(egui::RichText::new("The world is being updated...").italics());
                    ui.spinner();
                });
            }
        });
    });
}

/* =========================
   Sidebar
   ========================= */

pub fn draw_sidebar(ctx: &egui::Context, screen: &mut GameScreen) {
    egui::SidePanel::left("game_sidebar")
        .resizable(true)
        .default_width(220.0)
        .min_width(180.0)
        .show(ctx, |ui| {
            let mut picked: Option<String> = None;
            let mut refresh = false;

            ui.horizontal(|ui| {
                let arrow = if screen.npcs_expanded { "▼" } else { "▶" };
                if ui
                    .selectable_label(false, format!("{arrow} NPCs"))
                    .clicked()
                {
                    screen.npcs_expanded = !screen.npcs_expanded;
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if screen.npcs_loading {
                        ui.spinner();
                    } else if ui.small_button("⟳").on_hover_text("Refresh").clicked() {
                        refresh = true;
                    }
                });
            });

            if screen.npcs_expanded {
                let selected = screen.session.selected_npc().map(|n| n.id.clone());
                egui::ScrollArea::vertical()
                    .id_salt("npc_list")
                    .max_height(ui.available_height() * 0.6)
                    .show(ui, |ui| {
                        if screen.session.npcs.is_empty() {
                            ui.label(egui::RichText::new("No NPCs visible").weak());
                        }
                        for npc in &screen.session.npcs {
                            let is_selected = selected.as_deref() == Some(npc.id.as_str());
                            let label = format!("({}) {}", npc.initial(), npc.name);
                            if ui.selectable_label(is_selected, label).clicked() {
                                picked = Some(npc.id.clone());
                            }
                        }
                    });
            }

            ui.separator();

            let view = &mut screen.session.view;
            ui.selectable_value(view, MainView::NpcChat, "💬 NPC Chat");
            let count = screen.session.inventory.len();
            ui.selectable_value(view, MainView::Inventory, format!("🎒 Inventory ({count})"));
            ui.selectable_value(view, MainView::Character, "👤 Character");

            if let Some(id) = picked {
                screen.session.select_npc(&id);
            }
            if refresh {
                screen.refresh_npcs();
            }
        });
}

/* =========================
   Dungeon Master chat
   ========================= */

pub fn draw_dm_chat(ctx: &egui::Context, screen: &mut GameScreen, settings: &AppSettings) {
    egui::TopBottomPanel::bottom("dm_chat")
        .resizable(true)
        .default_height(260.0)
        .min_height(160.0)
        .show(ctx, |ui| {
            ui.strong("Dungeon Master");
            let input_height = 64.0;
            ui.allocate_ui(
                egui::vec2(ui.available_width(), (ui.available_height() - input_height).max(0.0)),
                |ui| {
                    widgets::transcript(
                        ui,
                        "dm_transcript",
                        &screen.session.dm_transcript,
                        screen.dm_busy,
                        settings,
                    );
                },
            );
            ui.separator();
            let send = widgets::chat_input(
                ui,
                egui::Id::new("dm_input"),
                &mut screen.dm_input,
                "Tell the Dungeon Master what you do...",
                screen.dm_busy || screen.loading,
            );
            if send {
                screen.send(ChatTarget::DungeonMaster);
            }
        });
}

/* =========================
   Main window
   ========================= */

pub fn draw_main_window(ctx: &egui::Context, screen: &mut GameScreen, settings: &AppSettings) {
    egui::CentralPanel::default().show(ctx, |ui| {
        if screen.loading {
            ui.centered_and_justified(|ui| ui.spinner());
            return;
        }
        let view = screen.session.view;
        match view {
            MainView::NpcChat => draw_npc_chat(ui, screen, settings),
            MainView::Inventory => draw_inventory(ui, &screen.session.inventory),
            MainView::Character => {
                if draw_character_sheet(ui, screen.session.player.as_ref()) {
                    screen.admin.open();
                }
            }
        }
    });
}

fn draw_npc_chat(ui: &mut egui::Ui, screen: &mut GameScreen, settings: &AppSettings) {
    let Some(npc) = screen.session.selected_npc() else {
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new("Select an NPC to start a conversation.").weak());
        });
        return;
    };
    let heading = format!("Talking to {}", npc.name);
    let npc_id = npc.id.clone();

    ui.heading(heading);
    ui.separator();

    let input_height = 64.0;
    ui.allocate_ui(
        egui::vec2(ui.available_width(), (ui.available_height() - input_height).max(0.0)),
        |ui| {
            widgets::transcript(
                ui,
                &format!("npc_transcript_{npc_id}"),
                screen.session.transcript(&npc_id),
                screen.npc_busy,
                settings,
            );
        },
    );
    ui.separator();

    if widgets::chat_input(
        ui,
        egui::Id::new("npc_input"),
        &mut screen.npc_input,
        "Say something...",
        screen.npc_busy,
    ) {
        screen.send(ChatTarget::SelectedNpc);
    }
}

fn draw_inventory(ui: &mut egui::Ui, items: &[InventoryItem]) {
    ui.heading("Inventory");
    ui.separator();

    if items.is_empty() {
        ui.label("Your inventory is empty.");
        return;
    }

    egui::ScrollArea::vertical().id_salt("inventory").show(ui, |ui| {
        for item in items {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.strong(item.title());
                if !item.description.is_empty() {
                    ui.label(&item.description);
                }
            });
        }
    });
}

/// Returns true when the Admin Tools button was clicked.
fn draw_character_sheet(ui: &mut egui::Ui, player: Option<&PlayerInfo>) -> bool {
    let mut admin = false;

    ui.horizontal(|ui| {
        ui.heading("Character");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            admin = ui.button("🛠 Admin Tools").clicked();
        });
    });
    ui.separator();

    let Some(player) = player else {
        ui.label(egui::RichText::new("No character data.").weak());
        return admin;
    };

    egui::ScrollArea::vertical().id_salt("character").show(ui, |ui| {
        ui.label(egui::RichText::new(&player.name).size(22.0).strong());

        let appearance = player.visual_description.summary();
        if !appearance.is_empty() {
            ui.label(egui::RichText::new(appearance).italics());
        }

        if !player.backstory.is_empty() {
            ui.add_space(6.0);
            ui.collapsing("Backstory", |ui| {
                ui.label(&player.backstory);
            });
        }

        for (category, element) in &player.rpg_elements {
            ui.add_space(6.0);
            ui.collapsing(category, |ui| {
                egui::Grid::new(format!("rpg_{category}"))
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value) in element.rows(category) {
                            ui.label(label);
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.strong("Money:");
            ui.label(player.money_label());
        });
    });

    admin
}
