use crate::cosmetics::domain::beauty_settings::BeautySettings;
use crate::cosmetics::domain::cosmetic_renderer::CosmeticRenderer;
use crate::detection::domain::detection_result::{BoundingBox, DetectionResult};
use crate::shared::frame::Frame;

use super::color_filter::apply_color_filter;
use super::gaussian::{gaussian_kernel_for_sigma, separable_gaussian_blur};
use super::overlay::{fill_ellipse, lerp_rgb, shade_columns, Rgb};

const SHADE: Rgb = [0, 0, 0];
const HIGHLIGHT: Rgb = [255, 255, 255];
const BLUSH: Rgb = [255, 99, 132];
const EAR: Rgb = [139, 79, 44];
const INNER_EAR: Rgb = [255, 179, 189];
const MUZZLE_CENTRE: Rgb = [255, 248, 240];
const MUZZLE_RIM: Rgb = [230, 210, 185];
const NOSE: Rgb = [74, 49, 38];

/// Fraction of the frame width covered by each slim-face shading band.
const SLIM_BAND: f64 = 0.3;

/// Software renderer for the beauty effects, drawn straight into the frame.
pub struct CpuCosmeticRenderer {
    settings: BeautySettings,
}

impl CpuCosmeticRenderer {
    pub fn new(settings: BeautySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BeautySettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut BeautySettings {
        &mut self.settings
    }

    fn slim_face(&self, frame: &mut Frame) {
        let layer = self.settings.slim_face_alpha();
        if layer <= 0.0 {
            return;
        }
        let width = frame.width() as f64;
        let band = width * SLIM_BAND;
        shade_columns(frame, SHADE, |x| {
            let edge_distance = x.min(width - x);
            if edge_distance >= band {
                0.0
            } else {
                layer * 0.8 * (1.0 - edge_distance / band)
            }
        });
    }

    fn big_eyes(&self, frame: &mut Frame, face: &DetectionResult) {
        let strength = self.settings.big_eyes_strength();
        if strength <= 0.0 {
            return;
        }
        let radius = face.bounding_box.width * 0.25 * 0.4;
        let peak = 0.35 * strength;
        for eye in face.eyes() {
            fill_ellipse(frame, eye.x, eye.y, radius, radius, |d| {
                let alpha = if d <= 0.3 {
                    peak
                } else {
                    peak * (1.0 - (d - 0.3) / 0.7)
                };
                (HIGHLIGHT, alpha)
            });
        }
    }

    fn makeup(&self, frame: &mut Frame, face: &DetectionResult) {
        let intensity = self.settings.makeup_intensity();
        if intensity <= 0.0 {
            return;
        }
        let b = &face.bounding_box;
        let (cx, _) = b.center();
        let rx = b.width.min(b.height) / 2.0 * 0.45;
        let ry = rx * 0.65;
        let cy = b.top + b.height * 0.6;
        for side in [-1.0, 1.0] {
            fill_ellipse(frame, cx + side * b.width * 0.25, cy, rx, ry, |_| {
                (BLUSH, 0.7 * intensity)
            });
        }
    }

    fn dog_face(&self, frame: &mut Frame, b: &BoundingBox) {
        let (cx, cy) = b.center();
        let ear_height = b.height * 0.6;
        let ear_width = b.width * 0.45;
        let ear_offset = b.height * 0.1;

        for side in [-1.0, 1.0] {
            let outer = ear_width;
            let inner = b.width * 0.1;
            fill_ellipse(
                frame,
                cx + side * (outer + inner) / 2.0,
                b.top - ear_height * 0.3,
                (outer - inner) / 2.0,
                ear_height * 0.3,
                |_| (EAR, 0.9),
            );
            fill_ellipse(
                frame,
                cx + side * ear_width * 0.45,
                b.top - ear_offset * 0.7,
                ear_width * 0.25,
                ear_height * 0.35,
                |_| (INNER_EAR, 0.8),
            );
        }

        let muzzle_width = b.width * 0.65;
        let muzzle_height = b.height * 0.45;
        let muzzle_top = cy + b.height * 0.05;
        fill_ellipse(
            frame,
            cx,
            muzzle_top,
            muzzle_width / 2.0,
            muzzle_height / 2.0,
            |d| (lerp_rgb(MUZZLE_CENTRE, MUZZLE_RIM, d), 0.95 - 0.05 * d),
        );

        fill_ellipse(
            frame,
            cx,
            muzzle_top + muzzle_height * 0.04,
            muzzle_width * 0.09,
            muzzle_height * 0.14,
            |_| (NOSE, 0.95),
        );
        fill_ellipse(
            frame,
            cx - muzzle_width * 0.08,
            muzzle_top + muzzle_height * 0.01,
            muzzle_width * 0.08 * 0.5,
            muzzle_height * 0.05,
            |_| (HIGHLIGHT, 0.55),
        );
    }

    fn global_filter(&self, frame: &mut Frame) {
        let channels = frame.channels() as usize;
        apply_color_filter(
            frame.data_mut(),
            channels,
            self.settings.brightness(),
            self.settings.saturation(),
            self.settings.contrast(),
        );

        let sigma = self.settings.softening_sigma();
        if sigma > 0.0 {
            let kernel = gaussian_kernel_for_sigma(sigma);
            let (width, height) = (frame.width() as usize, frame.height() as usize);
            let mut temp = Vec::new();
            separable_gaussian_blur(
                frame.data_mut(),
                width,
                height,
                channels,
                3,
                &kernel,
                &mut temp,
            );
        }
    }
}

impl CosmeticRenderer for CpuCosmeticRenderer {
    fn render(&self, frame: &mut Frame, faces: &[DetectionResult]) {
        if !frame.has_color_pixels() {
            log::debug!("Skipping cosmetics on frame {} without colour pixels", frame.index());
            return;
        }

        self.slim_face(frame);
        for face in faces {
            self.big_eyes(frame, face);
            self.makeup(frame, face);
            if self.settings.dog_face {
                self.dog_face(frame, &face.bounding_box);
            }
        }
        self.global_filter(frame);
    }
}
