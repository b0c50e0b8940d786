// src/app.rs - Application loop: capture, detect, evaluate, dispatch, render
use std::time::Instant;

use eframe::egui;
use tracing::warn;

use crate::detector::HandDetector;
use crate::gesture::{FingerState, GestureAction, GestureController, Zone};
use crate::keys::KeyInjector;
use crate::landmarks::LandmarkSet;
use crate::ui::{draw_landmarks, draw_zone, Theme, VideoWidget};
use crate::video::CameraSource;

/// Fixed active zone, in frame pixel coordinates.
pub const ACTIVE_ZONE: Zone = Zone {
    left: 800.0,
    top: 200.0,
    right: 1200.0,
    bottom: 500.0,
};

/// Gestures are evaluated on every Nth frame only, to keep dispatch rate
/// low and jitter down; the preview and overlay still update per frame.
const SAMPLE_INTERVAL: u32 = 5;

pub struct HandPilotApp {
    camera: CameraSource,
    detector: HandDetector,
    controller: GestureController,
    injector: KeyInjector,

    theme: Theme,
    video: VideoWidget,

    frame_tick: u32,
    current_landmarks: Option<LandmarkSet>,
    current_fingers: Option<FingerState>,
    hand_in_zone: bool,
    last_action: Option<(GestureAction, Instant)>,
}

impl HandPilotApp {
    pub fn new(camera: CameraSource, detector: HandDetector, injector: KeyInjector) -> Self {
        Self {
            camera,
            detector,
            controller: GestureController::new(ACTIVE_ZONE),
            injector,
            theme: Theme::default(),
            video: VideoWidget::new(),
            frame_tick: 0,
            current_landmarks: None,
            current_fingers: None,
            hand_in_zone: false,
            last_action: None,
        }
    }

    /// One loop iteration: pull a frame, run detection, and on every Nth
    /// frame with a visible hand, evaluate the pose and dispatch a key.
    fn process_frame(&mut self, ctx: &egui::Context) {
        let frame = match self.camera.read_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("dropping frame: {e:#}");
                return;
            }
        };
        self.video.update_frame(ctx, &frame);

        let (width, height) = (frame.width(), frame.height());
        let hands = match self.detector.detect(&frame) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("detection failed for this frame: {e:#}");
                Vec::new()
            }
        };

        // Only the first detected hand drives gestures.
        self.current_landmarks = hands
            .first()
            .map(|hand| LandmarkSet::from_detection(hand, width, height));
        self.hand_in_zone = self
            .current_landmarks
            .as_ref()
            .map_or(false, |lms| self.controller.is_in_zone(lms));
        self.current_fingers = self
            .current_landmarks
            .as_ref()
            .and_then(|lms| GestureController::classify_fingers(lms).ok());

        self.frame_tick += 1;
        if let Some(landmarks) = &self.current_landmarks {
            if self.frame_tick % SAMPLE_INTERVAL == 0 {
                self.frame_tick = 0;
                if let Some(action) = self.controller.evaluate(landmarks, Instant::now()) {
                    if let Err(e) = self.injector.send(action) {
                        warn!("{e:#}");
                    }
                    self.last_action = Some((action, Instant::now()));
                }
            }
        }
    }

    fn render_header(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("HandPilot");
                ui.label(
                    egui::RichText::new("gesture remote for media players")
                        .color(self.theme.text_secondary),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        egui::RichText::new("press Q to quit").color(self.theme.text_secondary),
                    );
                });
            });
            ui.add_space(6.0);
        });
    }

    fn render_status_panel(&self, ctx: &egui::Context) {
        egui::SidePanel::right("status")
            .min_width(230.0)
            .show(ctx, |ui| {
                ui.add_space(10.0);
                ui.heading("Tracking");
                ui.separator();

                let hand_label = if self.current_landmarks.is_some() {
                    egui::RichText::new("hand detected").color(self.theme.success)
                } else {
                    egui::RichText::new("no hand").color(self.theme.text_secondary)
                };
                ui.label(hand_label);

                let zone_label = if self.hand_in_zone {
                    egui::RichText::new("inside active zone").color(self.theme.success)
                } else {
                    egui::RichText::new("outside active zone").color(self.theme.zone_idle)
                };
                ui.label(zone_label);

                if let Some(fingers) = self.current_fingers {
                    ui.add_space(8.0);
                    ui.label("Fingers up (index/middle/ring/pinky):");
                    let pattern: String = fingers
                        .as_array()
                        .iter()
                        .map(|&up| if up { "1 " } else { "0 " })
                        .collect();
                    ui.monospace(pattern.trim_end());
                }

                ui.add_space(14.0);
                ui.heading("Last action");
                ui.separator();
                match self.last_action {
                    Some((action, at)) => {
                        ui.label(
                            egui::RichText::new(action.as_str())
                                .color(self.theme.text_primary)
                                .strong(),
                        );
                        ui.label(
                            egui::RichText::new(format!("{:.1}s ago", at.elapsed().as_secs_f32()))
                                .color(self.theme.text_secondary),
                        );
                    }
                    None => {
                        ui.label(egui::RichText::new("none yet").color(self.theme.text_secondary));
                    }
                }

                ui.add_space(14.0);
                ui.heading("Gestures");
                ui.separator();
                ui.monospace("all four up    play/pause");
                ui.monospace("index+middle   seek forward");
                ui.monospace("index only     seek backward");
                ui.monospace("index+pinky    fullscreen");
            });
    }

    fn render_video(&self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = self.video.show(ui, &self.theme);
            let frame_size = self.camera.resolution();
            let painter = ui.painter_at(rect);

            draw_zone(
                &painter,
                rect,
                frame_size,
                self.controller.zone(),
                self.hand_in_zone,
                &self.theme,
            );
            if let Some(landmarks) = &self.current_landmarks {
                draw_landmarks(&painter, rect, frame_size, landmarks, &self.theme);
            }
        });
    }
}

impl eframe::App for HandPilotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_frame(ctx);

        self.render_header(ctx);
        self.render_status_panel(ctx);
        self.render_video(ctx);

        if ctx.input(|i| i.key_pressed(egui::Key::Q)) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }

        // The camera drives the loop, not UI events.
        ctx.request_repaint();
    }
}
