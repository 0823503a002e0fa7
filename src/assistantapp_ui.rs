use std::time::Duration;

use eframe::egui;

use crate::assistantapp::AssistantApp;
use crate::mode::Mode;

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keep repainting while a reply may arrive from the worker.
        ctx.request_repaint_after(Duration::from_millis(100));

        self.poll_pending(ctx);

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("GPT Assistant");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Clear").clicked() {
                        self.clear_output();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_prompt_area(ui, ctx);
            ui.separator();
            self.render_output_area(ui);
        });
    }
}

impl AssistantApp {
    fn render_prompt_area(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.add_sized(
            [ui.available_width(), 70.0],
            egui::TextEdit::multiline(&mut self.input)
                .hint_text("Enter your text prompt or image description here")
                .desired_rows(3),
        );

        ui.add_space(4.0);

        ui.horizontal(|ui| {
            ui.label("Mode:");
            ui.selectable_value(&mut self.mode, Mode::Chat, Mode::Chat.label());
            ui.selectable_value(
                &mut self.mode,
                Mode::ImageGeneration,
                Mode::ImageGeneration.label(),
            );

            let busy = self.is_busy();
            if ui.add_enabled(!busy, egui::Button::new("Send")).clicked()
                || (!busy && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift))
            {
                self.send_prompt(ctx);
            }

            if busy {
                ui.spinner();
                ui.label("Waiting for reply...");
            }
        });
    }

    fn render_output_area(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = &self.error_message {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Error: ")
                        .strong()
                        .color(egui::Color32::RED),
                );
            });
            ui.label(egui::RichText::new(error).color(egui::Color32::RED));
            return;
        }

        if self.image_texture.is_some() {
            self.render_image(ui);
            return;
        }

        egui::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                if self.output_text.is_empty() {
                    ui.label(egui::RichText::new("Response will be displayed here").weak());
                } else {
                    ui.label(&self.output_text);
                }
            });
    }

    fn render_image(&self, ui: &mut egui::Ui) {
        egui::Frame::dark_canvas(ui.style())
            .stroke(egui::Stroke::new(1.0, egui::Color32::WHITE))
            .show(ui, |ui| {
                if let Some(texture) = &self.image_texture {
                    // Scale to the available area, preserving aspect ratio.
                    let size = texture.size_vec2();
                    let max_size = ui.available_size();
                    let ratio = (max_size.x / size.x).min(max_size.y / size.y);
                    let display_size = egui::vec2(size.x * ratio, size.y * ratio);

                    let image = egui::Image::from_texture(texture).fit_to_exact_size(display_size);
                    ui.add(image);
                }
            });

        if let Some(url) = &self.image_url {
            ui.add_space(4.0);
            ui.label(egui::RichText::new(url).weak().small());
        }
    }
}
