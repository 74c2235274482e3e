use super::ListenerSet;
use crate::input::{wheel_gesture, ControlGesture, PointerTracker};
use crate::runtime::SceneRuntime;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
fn pointer_css_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    Vec2::new(
        ev.client_x() as f32 - rect.left() as f32,
        ev.client_y() as f32 - rect.top() as f32,
    )
}

fn apply(runtime: &Rc<RefCell<SceneRuntime>>, gesture: ControlGesture) {
    let mut rt = runtime.borrow_mut();
    let height = rt.viewport().css_height as f32;
    let SceneRuntime {
        controls, camera, ..
    } = &mut *rt;
    gesture.apply(controls, camera, height);
}

/// Orbit, pan and zoom the camera from pointer and wheel input on the canvas.
pub fn wire_pointer_controls(
    listeners: &mut ListenerSet,
    canvas: &web::HtmlCanvasElement,
    runtime: Rc<RefCell<SceneRuntime>>,
) {
    let tracker = Rc::new(RefCell::new(PointerTracker::new()));
    let target: &web::EventTarget = canvas.as_ref();

    {
        let tracker = tracker.clone();
        let canvas = canvas.clone();
        listeners.add(target, "pointerdown", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let pos = pointer_css_px(ev, &canvas);
            tracker
                .borrow_mut()
                .pointer_down(ev.pointer_id(), pos, ev.button());
            _ = canvas.set_pointer_capture(ev.pointer_id());
            ev.prevent_default();
        });
    }

    {
        let tracker = tracker.clone();
        let canvas = canvas.clone();
        let runtime = runtime.clone();
        listeners.add(target, "pointermove", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            let pos = pointer_css_px(ev, &canvas);
            let gestures = tracker.borrow_mut().pointer_move(ev.pointer_id(), pos);
            for g in gestures {
                apply(&runtime, g);
            }
        });
    }

    for name in ["pointerup", "pointercancel"] {
        let tracker = tracker.clone();
        let canvas = canvas.clone();
        listeners.add(target, name, move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::PointerEvent>() else {
                return;
            };
            tracker.borrow_mut().pointer_up(ev.pointer_id());
            _ = canvas.release_pointer_capture(ev.pointer_id());
        });
    }

    {
        let runtime = runtime.clone();
        listeners.add(target, "wheel", move |ev: web::Event| {
            let Some(ev) = ev.dyn_ref::<web::WheelEvent>() else {
                return;
            };
            ev.prevent_default();
            let speed = runtime.borrow().controls.zoom_speed;
            if let Some(g) = wheel_gesture(ev.delta_y(), speed) {
                apply(&runtime, g);
            }
        });
    }

    listeners.add(target, "contextmenu", |ev: web::Event| ev.prevent_default());
}
