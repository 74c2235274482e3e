use crate::constants::{BANNER_ID, MUTE_BUTTON_ID};
use crate::events::ListenerSet;
use crate::state::LoadingBanner;
use web_sys as web;

/// Render the banner state into `#status-banner`.
pub fn sync_banner(document: &web::Document, banner: &LoadingBanner) {
    let Some(el) = document.get_element_by_id(BANNER_ID) else {
        return;
    };
    let cl = el.class_list();
    match banner.text() {
        Some(text) => {
            el.set_text_content(Some(&text));
            _ = cl.remove_1("hidden");
        }
        None => {
            el.set_text_content(None);
            _ = cl.add_1("hidden");
        }
    }
    if banner.is_error() {
        _ = cl.add_1("error");
    } else {
        _ = cl.remove_1("error");
    }
}

#[inline]
fn is_hidden(el: &web::Element) -> bool {
    el.class_list().contains("hidden") || el.has_attribute("hidden")
}

/// Hook the mute button to `on_toggle`. The button ships hidden and stays
/// inert unless the page reveals it.
pub fn wire_mute_button(
    document: &web::Document,
    listeners: &mut ListenerSet,
    on_toggle: impl Fn() -> bool + 'static,
) -> bool {
    let Some(el) = document.get_element_by_id(MUTE_BUTTON_ID) else {
        return false;
    };
    if is_hidden(&el) {
        return false;
    }
    let button = el.clone();
    listeners.add(el.as_ref(), "click", move |_| {
        let muted = on_toggle();
        button.set_text_content(Some(if muted { "Unmute" } else { "Mute" }));
        _ = button.set_attribute("aria-pressed", if muted { "true" } else { "false" });
    });
    true
}
