use egui::{Color32, ComboBox, Context, RichText};
use tracing::error;

use super::controls::ControlEvent;
use super::state::{App, LoadStatus};

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context) {
    let mut events: Vec<ControlEvent> = Vec::new();
    let mut export_requested = false;

    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Filters");
        ui.separator();

        if let Some(notice) = side_panel_notice(&app.status) {
            ui.label(notice);
            return;
        }

        // Author selection
        ui.label("Author:");
        let previous = app.filter.author().author().map(str::to_string);
        let mut selected = previous.clone();
        ComboBox::new("author_selector", "")
            .selected_text(app.filter.author().to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut selected, None, "All authors");
                for author in app.controls.author_options() {
                    ui.selectable_value(&mut selected, Some(author.clone()), author);
                }
            });
        if selected != previous {
            events.push(ControlEvent::AuthorChanged(selected));
        }

        ui.separator();

        // File type selection
        ui.label("File types:");
        ui.horizontal(|ui| {
            if ui.button("All").clicked() {
                events.push(ControlEvent::SelectAllFileTypes);
            }
            if ui.button("None").clicked() {
                events.push(ControlEvent::ClearFileTypes);
            }
        });
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (file_type, checked) in app.controls.checkboxes(&app.filter) {
                let mut value = checked;
                if ui.checkbox(&mut value, file_type).changed() {
                    events.push(ControlEvent::FileTypeChanged {
                        file_type: file_type.to_string(),
                        checked: value,
                    });
                }
            }
        });
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Contributions");
        ui.separator();

        match &app.status {
            LoadStatus::Loading => {
                ui.label(format!("Loading {}...", app.config.document.display()));
                ui.spinner();
            }
            LoadStatus::Failed(reason) => {
                ui.colored_label(
                    Color32::RED,
                    format!(
                        "Could not load {}: {}",
                        app.config.document.display(),
                        reason
                    ),
                );
            }
            LoadStatus::Ready => {
                ui.horizontal(|ui| {
                    ui.label("Export to:");
                    ui.text_edit_singleline(&mut app.export_path);
                    if ui.button("Export PNG").clicked() {
                        export_requested = true;
                    }
                });
            }
        }

        if let Some(message) = &app.error_message {
            ui.colored_label(Color32::RED, message);
        }

        ui.separator();
        egui::ScrollArea::vertical().show(ui, |ui| {
            if let Some(texture) = &app.plot_texture {
                ui.image(texture);
            }

            let panel = app.chart.commit_panel();
            if let Some(author) = panel.author() {
                ui.separator();
                ui.heading("Recent Commits:");
                if panel.commits().is_empty() {
                    ui.label(format!("No commits recorded for {}.", author));
                }
                for commit in panel.commits() {
                    ui.label(
                        RichText::new(format!("Commit: {}, Date: {}", commit.hash, commit.date))
                            .strong(),
                    );
                    ui.label(format!("Message: {}", commit.message));
                    ui.add_space(4.0);
                }
            }
        });
    });

    if !events.is_empty() {
        for event in events {
            app.handle(event);
        }
        ctx.request_repaint();
    }

    if export_requested {
        let path = app.export_path.clone();
        if let Err(e) = app.export_chart(&path) {
            error!("Export error: {}", e);
            app.error_message = Some(e.to_string());
        }
    }

    // Update plot if needed
    if app.update_needed {
        load_plot_texture(app, ctx);
        app.update_needed = false;
    }
}

/// Text shown in place of the filters until data is ready.
fn side_panel_notice(status: &LoadStatus) -> Option<&'static str> {
    match status {
        LoadStatus::Loading => Some("Waiting for data..."),
        LoadStatus::Failed(_) => Some("No data"),
        LoadStatus::Ready => None,
    }
}

fn load_plot_texture(app: &mut App, ctx: &Context) {
    app.plot_texture = app.chart.active().map(|chart| {
        let image = egui::ColorImage::from_rgb(
            [chart.width as usize, chart.height as usize],
            &chart.pixels,
        );
        ctx.load_texture("plot_texture", image, egui::TextureOptions::LINEAR)
    });
}
