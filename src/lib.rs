pub mod camera;
pub mod clock;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod input;
pub mod model;
pub mod playback;
pub mod runtime;
pub mod scene;
pub mod state;
pub mod uniforms;
pub mod unlock;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod loader;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;

#[cfg(target_arch = "wasm32")]
pub use web_api::*;

#[cfg(target_arch = "wasm32")]
mod web_api {
    use crate::app::SiteApp;
    use std::cell::RefCell;
    use wasm_bindgen::prelude::*;

    thread_local! {
        static APP: RefCell<Option<SiteApp>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("rolling-soon starting");
        if let Err(e) = mount_app() {
            log::error!("mount error: {:?}", e);
        }
        Ok(())
    }

    fn mount_app() -> anyhow::Result<()> {
        if APP.with(|app| app.borrow().is_some()) {
            return Ok(());
        }
        let document = crate::dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let app = SiteApp::mount(&document)?;
        APP.with(|slot| *slot.borrow_mut() = Some(app));
        Ok(())
    }

    /// Mount again after [`unmount`]. Does nothing while a page is mounted.
    #[wasm_bindgen]
    pub fn mount() -> Result<(), JsValue> {
        mount_app().map_err(|e| JsValue::from_str(&format!("{:?}", e)))
    }

    #[wasm_bindgen]
    pub fn unmount() {
        if let Some(app) = APP.with(|slot| slot.borrow_mut().take()) {
            app.unmount();
        }
    }

    /// Flip the background track's mute state, returning the new value.
    #[wasm_bindgen]
    pub fn toggle_mute() -> bool {
        APP.with(|slot| slot.borrow().as_ref().map(|app| app.toggle_mute()))
            .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn is_muted() -> bool {
        APP.with(|slot| slot.borrow().as_ref().map(|app| app.is_muted()))
            .unwrap_or(false)
    }

    #[wasm_bindgen]
    pub fn is_model_loaded() -> bool {
        APP.with(|slot| slot.borrow().as_ref().map(|app| app.is_model_loaded()))
            .unwrap_or(false)
    }
}
