//! Thin helpers over web-sys: lookups, timers, reflow.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::{PageError, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(PageError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(PageError::NoDocument)
}

pub fn body(doc: &Document) -> Result<HtmlElement> {
    doc.body().ok_or(PageError::NoBody)
}

/// All elements matching `selector`, in document order.
pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = root.query_selector_all(selector)?;
    let mut out = Vec::with_capacity(list.length() as usize);
    for i in 0..list.length() {
        if let Some(el) = list.get(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            out.push(el);
        }
    }
    Ok(out)
}

/// Read a layout property so pending class removals are flushed before the
/// next add; without it the browser coalesces remove+add and the CSS
/// animation never restarts.
pub fn force_reflow(doc: &Document) {
    if let Some(body) = doc.body() {
        let _ = body.offset_height();
    }
}

/// Run `f` once after `delay_ms`.
pub fn schedule<F>(delay_ms: u32, f: F) -> Result<i32>
where
    F: FnOnce() + 'static,
{
    let cb = Closure::once_into_js(f);
    let id = window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        clamp_ms(delay_ms),
    )?;
    Ok(id)
}

/// Run `f` every `period_ms` for the rest of the page session.
pub fn schedule_repeating<F>(period_ms: u32, f: F) -> Result<i32>
where
    F: FnMut() + 'static,
{
    let cb = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
    let id = window()?.set_interval_with_callback_and_timeout_and_arguments_0(
        cb.as_ref().unchecked_ref(),
        clamp_ms(period_ms),
    )?;
    cb.forget();
    Ok(id)
}

/// Log and swallow an error from inside a callback; there is nobody to return it to.
pub fn report(context: &str, result: Result<()>) {
    if let Err(err) = result {
        log::warn!("{context}: {err}");
    }
}

fn clamp_ms(ms: u32) -> i32 {
    ms.min(i32::MAX as u32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_ms_saturates() {
        assert_eq!(clamp_ms(800), 800);
        assert_eq!(clamp_ms(u32::MAX), i32::MAX);
    }
}
