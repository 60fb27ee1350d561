//! Smooth scrolling to sections and the mobile hamburger menu.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, ScrollBehavior, ScrollToOptions};

use crate::config::NavConfig;
use crate::dom;
use crate::error::Result;
use crate::page;
use crate::reveal::{self, RevealGroup};

/// Absolute scroll position that puts a section `header_offset` px below the top.
pub fn scroll_target(element_top: f64, scroll_y: f64, header_offset: f64) -> f64 {
    element_top + scroll_y - header_offset
}

/// Whether a rect with the given viewport-relative edges counts as on screen:
/// its top above `ratio` of the viewport and its bottom not scrolled past the top.
pub fn in_viewport(top: f64, bottom: f64, viewport_height: f64, ratio: f64) -> bool {
    top <= viewport_height * ratio && bottom >= 0.0
}

/// Fragment of an anchor href (`"#skills"` -> `"skills"`). `None` when there is
/// no fragment or it is empty.
pub fn fragment(href: &str) -> Option<&str> {
    href.split_once('#')
        .map(|(_, frag)| frag)
        .filter(|frag| !frag.is_empty())
}

/// Icon classes to (remove, add) for a menu that is now `open`.
pub fn icon_swap(open: bool, cfg: &NavConfig) -> (&str, &str) {
    if open {
        (cfg.icon_closed_class.as_str(), cfg.icon_open_class.as_str())
    } else {
        (cfg.icon_open_class.as_str(), cfg.icon_closed_class.as_str())
    }
}

/// Smooth-scroll to the element with `id`; schedules that section's reveal when
/// it has one. Returns `false` when there is no such element.
pub fn scroll_to_section(id: &str) -> Result<bool> {
    let win = dom::window()?;
    let doc = dom::document()?;
    let Some(section) = doc.get_element_by_id(id) else {
        log::debug!("scroll target #{id} not found");
        return Ok(false);
    };
    let (offset, delay, group) = page::with_state(|s| {
        (
            s.config.nav.header_offset_px,
            s.config.nav.reveal_after_scroll_ms,
            RevealGroup::for_section(id, &s.config),
        )
    });
    let top = scroll_target(section.get_bounding_client_rect().top(), win.scroll_y()?, offset);
    let opts = ScrollToOptions::new();
    opts.set_top(top);
    opts.set_behavior(ScrollBehavior::Smooth);
    win.scroll_to_with_scroll_to_options(&opts);

    if let Some(group) = group {
        dom::schedule(delay, move || {
            dom::report("reveal after scroll", reveal::animate_group(group));
        })?;
    }
    Ok(true)
}

/// Viewport test used for the load-time reveal decision.
pub fn is_in_viewport(element: &Element) -> Result<bool> {
    let win = dom::window()?;
    let doc = dom::document()?;
    let rect = element.get_bounding_client_rect();
    let ratio = page::with_state(|s| s.config.reveal.viewport_ratio);
    Ok(in_viewport(rect.top(), rect.bottom(), viewport_height(&win, &doc), ratio))
}

fn viewport_height(win: &web_sys::Window, doc: &Document) -> f64 {
    win.inner_height()
        .ok()
        .and_then(|v| v.as_f64())
        .filter(|h| *h > 0.0)
        .or_else(|| doc.document_element().map(|el| el.client_height() as f64))
        .unwrap_or(0.0)
}

/// Hook up the hamburger toggle and menu links. Returns `false` (and wires
/// nothing) when either the hamburger or the menu is missing.
pub fn wire_mobile_menu(doc: &Document) -> Result<bool> {
    let cfg = page::with_state(|s| s.config.nav.clone());
    let hamburger = doc.get_element_by_id(&cfg.hamburger_id);
    let menu = doc.query_selector(&cfg.menu_selector)?;
    let (Some(hamburger), Some(menu)) = (hamburger, menu) else {
        log::debug!("mobile menu not present, skipping");
        return Ok(false);
    };

    {
        let hamburger_el = hamburger.clone();
        let menu = menu.clone();
        let cfg = cfg.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let open = match menu.class_list().toggle(&cfg.open_class) {
                Ok(open) => open,
                Err(err) => {
                    log::warn!("menu toggle: {err:?}");
                    return;
                }
            };
            dom::report("menu icon", set_icon(&hamburger_el, open, &cfg));
        }) as Box<dyn FnMut(_)>);
        hamburger.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    for link in dom::query_all(doc, &cfg.link_selector)? {
        let hamburger = hamburger.clone();
        let menu = menu.clone();
        let cfg = cfg.clone();
        let anchor = link.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
            evt.prevent_default();
            let target = anchor.get_attribute("href");
            dom::report(
                "menu link",
                close_menu(&menu, &hamburger, &cfg).and_then(|()| {
                    match target.as_deref().and_then(fragment) {
                        Some(id) => scroll_to_section(id).map(|_| ()),
                        None => Ok(()),
                    }
                }),
            );
        }) as Box<dyn FnMut(_)>);
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(true)
}

fn close_menu(menu: &Element, hamburger: &Element, cfg: &NavConfig) -> Result<()> {
    menu.class_list().remove_1(&cfg.open_class)?;
    set_icon(hamburger, false, cfg)
}

fn set_icon(hamburger: &Element, open: bool, cfg: &NavConfig) -> Result<()> {
    let Some(icon) = hamburger.query_selector("i")? else {
        log::debug!("hamburger has no <i> icon, skipping icon swap");
        return Ok(());
    };
    let (remove, add) = icon_swap(open, cfg);
    icon.class_list().remove_1(remove)?;
    icon.class_list().add_1(add)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_target_subtracts_header() {
        assert_eq!(scroll_target(640.0, 0.0, 100.0), 540.0);
        assert_eq!(scroll_target(250.0, 1200.0, 100.0), 1350.0);
        // Section already above the fold.
        assert_eq!(scroll_target(-300.0, 900.0, 100.0), 500.0);
    }

    #[test]
    fn viewport_predicate() {
        let vh = 1000.0;
        assert!(in_viewport(0.0, 400.0, vh, 0.8));
        assert!(in_viewport(800.0, 1400.0, vh, 0.8));
        assert!(!in_viewport(800.1, 1400.0, vh, 0.8));
        assert!(!in_viewport(-600.0, -1.0, vh, 0.8));
        assert!(in_viewport(-600.0, 0.0, vh, 0.8));
    }

    #[test]
    fn fragment_parsing() {
        assert_eq!(fragment("#skills"), Some("skills"));
        assert_eq!(fragment("/index.html#certificates"), Some("certificates"));
        assert_eq!(fragment("#"), None);
        assert_eq!(fragment("https://example.com/cv.pdf"), None);
    }

    #[test]
    fn icon_swap_follows_menu_state() {
        let cfg = NavConfig::default();
        assert_eq!(icon_swap(true, &cfg), ("fa-bars", "fa-times"));
        assert_eq!(icon_swap(false, &cfg), ("fa-times", "fa-bars"));
    }
}
