use crate::overlay;
use pulse_core::{Modifiers, Rig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

fn modifiers_of(ev: &web::KeyboardEvent) -> Modifiers {
    Modifiers {
        ctrl: ev.ctrl_key(),
        shift: ev.shift_key(),
        alt: ev.alt_key(),
        meta: ev.meta_key(),
    }
}

/// Keys the browser would otherwise act on (scrolling, zoom).
fn swallow(code: &str, mods: Modifiers) -> bool {
    let navigation = matches!(
        code,
        "ArrowLeft"
            | "ArrowRight"
            | "ArrowUp"
            | "ArrowDown"
            | "PageUp"
            | "PageDown"
            | "Home"
            | "End"
    );
    let ctrl_chord = matches!(
        code,
        "Equal" | "Minus" | "Digit0" | "KeyS" | "KeyD" | "KeyI" | "KeyU" | "KeyO"
    );
    navigation || (mods.ctrl && ctrl_chord)
}

fn wire_key(rig: &Rc<RefCell<Rig>>, event_name: &str, pressed: bool) {
    let rig = rig.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        let code = ev.code();
        let mods = modifiers_of(&ev);
        if pressed && swallow(&code, mods) {
            ev.prevent_default();
        }
        let Ok(mut r) = rig.try_borrow_mut() else {
            log::warn!("[keys] rig busy, dropped {}", code);
            return;
        };
        r.key(&code, pressed, mods);
        if pressed {
            overlay::refresh(&r.status_line());
        }
    }) as Box<dyn FnMut(_)>);
    if let Some(window) = web::window() {
        _ = window.add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
    }
    closure.forget();
}

pub fn wire_keyboard(rig: &Rc<RefCell<Rig>>) {
    wire_key(rig, "keydown", true);
    wire_key(rig, "keyup", false);
}
