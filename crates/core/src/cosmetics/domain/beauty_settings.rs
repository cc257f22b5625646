use serde::{Deserialize, Serialize};

/// Adjustable cosmetic effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Effect {
    Whiten,
    SlimFace,
    BigEyes,
    AutoMakeup,
}

/// Effect strengths in `[0, 1]` plus the dog-face overlay toggle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeautySettings {
    pub whiten: f64,
    pub slim_face: f64,
    pub big_eyes: f64,
    pub auto_makeup: f64,
    pub dog_face: bool,
}

impl Default for BeautySettings {
    fn default() -> Self {
        Self {
            whiten: 0.2,
            slim_face: 0.3,
            big_eyes: 0.4,
            auto_makeup: 0.25,
            dog_face: false,
        }
    }
}

impl BeautySettings {
    /// Sets one effect strength, clamped to `[0, 1]`.
    pub fn set(&mut self, effect: Effect, value: f64) {
        let value = if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) };
        match effect {
            Effect::Whiten => self.whiten = value,
            Effect::SlimFace => self.slim_face = value,
            Effect::BigEyes => self.big_eyes = value,
            Effect::AutoMakeup => self.auto_makeup = value,
        }
    }

    pub fn get(&self, effect: Effect) -> f64 {
        match effect {
            Effect::Whiten => self.whiten,
            Effect::SlimFace => self.slim_face,
            Effect::BigEyes => self.big_eyes,
            Effect::AutoMakeup => self.auto_makeup,
        }
    }

    pub fn brightness(&self) -> f64 {
        1.0 + self.whiten * 0.5
    }

    pub fn saturation(&self) -> f64 {
        1.0 + self.auto_makeup * 0.6
    }

    pub fn contrast(&self) -> f64 {
        1.0 + self.auto_makeup * 0.2
    }

    /// Gaussian sigma in pixels of the skin-softening pass; 0 disables it.
    pub fn softening_sigma(&self) -> f64 {
        if self.whiten > 0.0 {
            self.whiten * 2.0
        } else {
            0.0
        }
    }

    /// Opacity of the side shading layer.
    pub fn slim_face_alpha(&self) -> f64 {
        (self.slim_face * 0.45).min(0.45)
    }

    pub fn big_eyes_strength(&self) -> f64 {
        (self.big_eyes * 0.45).min(0.45)
    }

    pub fn makeup_intensity(&self) -> f64 {
        (self.auto_makeup * 0.35).min(0.35)
    }

    /// Equivalent CSS `filter` value for browser-side rendering.
    pub fn css_filter(&self) -> String {
        let mut filter = format!(
            "brightness({:.2}) saturate({:.2}) contrast({:.2})",
            self.brightness(),
            self.saturation(),
            self.contrast()
        );
        if self.whiten > 0.0 {
            filter.push_str(&format!(" blur({:.2}px)", self.softening_sigma()));
        }
        filter
    }
}
