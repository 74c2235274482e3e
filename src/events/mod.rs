pub mod interaction;
pub mod pointer;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub use interaction::FirstInteraction;
pub use pointer::wire_pointer_controls;

type Listener = Closure<dyn FnMut(web::Event)>;

/// Listeners registered by one owner and removed together.
#[derive(Default)]
pub struct ListenerSet {
    entries: Vec<(web::EventTarget, &'static str, Listener)>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => self.entries.push((target.clone(), event, closure)),
            Err(e) => log::error!("[events] add {} listener failed: {:?}", event, e),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn remove_all(&mut self) {
        for (target, event, closure) in self.entries.drain(..) {
            _ = target
                .remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        }
    }
}

impl Drop for ListenerSet {
    fn drop(&mut self) {
        self.remove_all();
    }
}
