//! Await the first user gesture on a target.
//!
//! One listener covers every [`InteractionKind`]; whichever event arrives first
//! resolves the future and removes all of them in the same step. Cancelling
//! removes them too and resolves with `None`.

use crate::unlock::{InteractionKind, UnlockGate};
use std::cell::RefCell;
use std::future::Future;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

struct Inner {
    gate: RefCell<UnlockGate>,
    target: web::EventTarget,
    listener: RefCell<Option<Closure<dyn FnMut(web::Event)>>>,
    resolve: RefCell<Option<js_sys::Function>>,
}

impl Inner {
    fn detach(&self) {
        if let Some(listener) = self.listener.borrow().as_ref() {
            for kind in InteractionKind::ALL {
                _ = self.target.remove_event_listener_with_callback(
                    kind.event_name(),
                    listener.as_ref().unchecked_ref(),
                );
            }
        }
    }

    fn settle(&self, value: &JsValue) {
        self.detach();
        if let Some(resolve) = self.resolve.borrow_mut().take() {
            _ = resolve.call1(&JsValue::NULL, value);
        }
    }
}

#[derive(Clone)]
pub struct FirstInteraction {
    inner: Rc<Inner>,
}

impl FirstInteraction {
    /// Register on `target` and return the handle plus a future of the winning kind.
    pub fn arm(
        target: &web::EventTarget,
    ) -> (Self, impl Future<Output = Option<InteractionKind>>) {
        let mut resolve_slot: Option<js_sys::Function> = None;
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            resolve_slot = Some(resolve);
        });
        let inner = Rc::new(Inner {
            gate: RefCell::new(UnlockGate::new()),
            target: target.clone(),
            listener: RefCell::new(None),
            resolve: RefCell::new(resolve_slot),
        });

        let weak: Weak<Inner> = Rc::downgrade(&inner);
        let listener = Closure::wrap(Box::new(move |ev: web::Event| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let Some(kind) = InteractionKind::from_event_name(&ev.type_()) else {
                return;
            };
            if inner.gate.borrow_mut().fire(kind) {
                inner.settle(&JsValue::from_str(kind.event_name()));
            }
        }) as Box<dyn FnMut(web::Event)>);
        for kind in InteractionKind::ALL {
            if let Err(e) = target
                .add_event_listener_with_callback(kind.event_name(), listener.as_ref().unchecked_ref())
            {
                log::error!("[unlock] add {} listener failed: {:?}", kind.event_name(), e);
            }
        }
        *inner.listener.borrow_mut() = Some(listener);

        let outcome = async move {
            JsFuture::from(promise)
                .await
                .ok()
                .and_then(|v| v.as_string())
                .and_then(|name| InteractionKind::from_event_name(&name))
        };
        (Self { inner }, outcome)
    }

    pub fn cancel(&self) {
        if self.inner.gate.borrow_mut().cancel() {
            self.inner.settle(&JsValue::NULL);
        }
    }
}
