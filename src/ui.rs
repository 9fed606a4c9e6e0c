use crate::settings::AssetEntry;

/// What the overlay shows about the controller this frame.
pub struct UiStatus<'a> {
    /// Display name of the active character.
    pub active: Option<&'a str>,
    /// Locator the active character was loaded from.
    pub active_locator: Option<&'a str>,
    pub pending: usize,
    pub blink: Option<f32>,
    pub mouth: Option<f32>,
    pub lip_sync: bool,
}

pub struct Ui {
    show_status: bool,
}

impl Default for Ui {
    fn default() -> Self {
        Self { show_status: true }
    }
}

impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw the asset picker. Returns the locator of a clicked asset.
    pub fn show(&mut self, ctx: &egui::Context, assets: &[AssetEntry], status: &UiStatus<'_>) -> Option<String> {
        let mut picked = None;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label("Avatar:");
                for entry in assets {
                    let selected = is_active(entry, status.active_locator);
                    if ui.selectable_label(selected, entry.label.as_str()).clicked() {
                        picked = Some(entry.locator.clone());
                    }
                }
                if status.pending > 0 {
                    ui.separator();
                    ui.spinner();
                }
                ui.separator();
                ui.checkbox(&mut self.show_status, "Status");
            });
        });

        if self.show_status {
            egui::Window::new("Status")
                .default_pos([12.0, 48.0])
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(format!("Character: {}", status.active.unwrap_or("none")));
                    channel_row(ui, "Blink", status.blink);
                    channel_row(ui, "Mouth", status.mouth);
                    ui.label(if status.lip_sync {
                        "Lip-sync: on"
                    } else {
                        "Lip-sync: off"
                    });
                });
        }

        picked
    }
}

fn is_active(entry: &AssetEntry, active_locator: Option<&str>) -> bool {
    active_locator == Some(entry.locator.as_str())
}

fn channel_row(ui: &mut egui::Ui, label: &str, value: Option<f32>) {
    ui.horizontal(|ui| {
        ui.label(label);
        match value {
            Some(v) => {
                ui.add(egui::ProgressBar::new(v).desired_width(120.0));
            }
            None => {
                ui.weak("n/a");
            }
        }
    });
}
