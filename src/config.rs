use crate::constants::*;

/// Page configuration. Defaults come from `constants`; the mount element may
/// override them with `data-*` attributes.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub mount_id: String,
    pub model_src: String,
    pub audio_src: String,
    pub audio_volume: f64,
    pub rotation_step: f32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            mount_id: MOUNT_ID.to_string(),
            model_src: MODEL_SRC.to_string(),
            audio_src: AUDIO_SRC.to_string(),
            audio_volume: AUDIO_VOLUME,
            rotation_step: MODEL_ROTATION_STEP,
        }
    }
}

impl SiteConfig {
    /// Attribute names (without the `data-` prefix) read by [`SiteConfig::with_overrides`].
    pub const KEYS: [&'static str; 4] = ["model-src", "audio-src", "audio-volume", "rotation-speed"];

    /// Apply overrides from `lookup`; malformed values keep the default and are logged.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(src) = lookup("model-src").filter(|s| !s.trim().is_empty()) {
            self.model_src = src.trim().to_string();
        }
        if let Some(src) = lookup("audio-src").filter(|s| !s.trim().is_empty()) {
            self.audio_src = src.trim().to_string();
        }
        if let Some(raw) = lookup("audio-volume") {
            match raw.trim().parse::<f64>() {
                Ok(v) if (0.0..=1.0).contains(&v) => self.audio_volume = v,
                _ => log::warn!("[config] ignoring audio-volume={:?}", raw),
            }
        }
        if let Some(raw) = lookup("rotation-speed") {
            match raw.trim().parse::<f32>() {
                Ok(v) if v.is_finite() => self.rotation_step = v,
                _ => log::warn!("[config] ignoring rotation-speed={:?}", raw),
            }
        }
        self
    }
}
