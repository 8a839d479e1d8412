use web_sys as web;

const HUD_ID: &str = "hud";

/// Replace the HUD text. Missing `#hud` is fine; the page may not have one.
#[inline]
pub fn update_hud(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(HUD_ID) {
        el.set_text_content(Some(text));
    }
}

pub fn refresh(text: &str) {
    if let Some(document) = web::window().and_then(|w| w.document()) {
        update_hud(&document, text);
    }
}
