// Host-side tests for mount attribute overrides.

use rolling_soon_web::config::SiteConfig;
use rolling_soon_web::constants::*;
use std::collections::HashMap;

fn with(attrs: &[(&str, &str)]) -> SiteConfig {
    let map: HashMap<String, String> = attrs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    SiteConfig::default().with_overrides(|key| map.get(key).cloned())
}

#[test]
fn defaults_match_constants() {
    let c = SiteConfig::default();
    assert_eq!(c.mount_id, MOUNT_ID);
    assert_eq!(c.model_src, MODEL_SRC);
    assert_eq!(c.audio_src, AUDIO_SRC);
    assert_eq!(c.audio_volume, AUDIO_VOLUME);
    assert_eq!(c.rotation_step, MODEL_ROTATION_STEP);
    assert_eq!(with(&[]), c);
}

#[test]
fn valid_overrides_apply() {
    let c = with(&[
        ("model-src", " /other/model.glb "),
        ("audio-src", "intro.ogg"),
        ("audio-volume", "0.25"),
        ("rotation-speed", "0.01"),
    ]);
    assert_eq!(c.model_src, "/other/model.glb");
    assert_eq!(c.audio_src, "intro.ogg");
    assert_eq!(c.audio_volume, 0.25);
    assert_eq!(c.rotation_step, 0.01);
}

#[test]
fn malformed_overrides_keep_defaults() {
    let c = with(&[
        ("model-src", "   "),
        ("audio-volume", "1.5"),
        ("rotation-speed", "NaN"),
    ]);
    assert_eq!(c.model_src, MODEL_SRC);
    assert_eq!(c.audio_volume, AUDIO_VOLUME);
    assert_eq!(c.rotation_step, MODEL_ROTATION_STEP);

    let c = with(&[("audio-volume", "loud")]);
    assert_eq!(c.audio_volume, AUDIO_VOLUME);
}

#[test]
fn every_key_is_recognised() {
    let seen = std::cell::RefCell::new(Vec::new());
    SiteConfig::default().with_overrides(|key| {
        seen.borrow_mut().push(key.to_string());
        None
    });
    assert_eq!(seen.into_inner(), SiteConfig::KEYS.to_vec());
}
