// Browser tests (wasm-pack test --headless --firefox). They build small DOM
// fixtures and check the star field, reveal and viewport behaviour end to end.
#![cfg(target_arch = "wasm32")]

use starfall_portfolio::{nav, page, reveal, stars, Config, RevealGroup};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::{Document, Element, Event, EventInit, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn doc() -> Document {
    web_sys::window().unwrap().document().unwrap()
}

fn star_children(container: &Element) -> Vec<Element> {
    let list = container.query_selector_all(".star").unwrap();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|n| n.dyn_into::<Element>().unwrap())
        .collect()
}

fn container() -> Element {
    doc().query_selector(".stars-container").unwrap().unwrap()
}

fn append(parent: &Element, tag: &str, class: &str) -> Element {
    let el = doc().create_element(tag).unwrap();
    el.set_class_name(class);
    parent.append_child(&el).unwrap();
    el
}

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn animated(items: &[Element]) -> usize {
    items.iter().filter(|el| el.class_list().contains("animate")).count()
}

fn fast_skills_config(clear_after_ms: u32) -> Config {
    let mut cfg = Config::default();
    cfg.skills.stagger_ms = 10;
    cfg.skills.clear_after_ms = clear_after_ms;
    cfg.nav.reveal_after_scroll_ms = 50;
    cfg
}

#[wasm_bindgen_test]
fn create_stars_fills_container() {
    stars::create_stars().unwrap();
    let stars = star_children(&container());
    assert_eq!(stars.len(), 150);
    for s in &stars {
        let list = s.class_list();
        let sizes = ["small", "medium", "large"].iter().filter(|c| list.contains(**c)).count();
        assert_eq!(sizes, 1, "class was '{}'", s.class_name());
    }
    assert_eq!(stars::check_stars().unwrap(), 150);
}

#[wasm_bindgen_test]
fn rebuild_does_not_duplicate_container() {
    stars::create_stars().unwrap();
    stars::create_stars().unwrap();
    assert_eq!(doc().query_selector_all(".stars-container").unwrap().length(), 1);
    assert_eq!(star_children(&container()).len(), 150);
}

#[wasm_bindgen_test]
fn finished_star_is_replaced() {
    stars::create_stars().unwrap();
    let c = container();
    let first = star_children(&c).remove(0);

    let init = EventInit::new();
    init.set_bubbles(true);
    let evt = Event::new_with_event_init_dict("animationend", &init).unwrap();
    first.dispatch_event(&evt).unwrap();

    assert!(first.parent_element().is_none(), "finished star still attached");
    assert_eq!(star_children(&c).len(), 150);
}

#[wasm_bindgen_test]
fn reveal_clears_flag_before_stagger() {
    let d = doc();
    let body = d.body().unwrap();
    let mut items = Vec::new();
    for _ in 0..3 {
        let el = d.create_element("div").unwrap();
        el.set_class_name("skill-item animate");
        body.append_child(&el).unwrap();
        items.push(el);
    }
    reveal::animate_group(RevealGroup::Skills).unwrap();
    // Every add is deferred through setTimeout, so nothing is set yet.
    for el in &items {
        assert!(!el.class_list().contains("animate"));
    }
    for el in items {
        el.remove();
    }
}

#[wasm_bindgen_test]
fn viewport_checks_top_against_eighty_percent() {
    let d = doc();
    let win = web_sys::window().unwrap();
    let vh = win.inner_height().unwrap().as_f64().unwrap();

    let make = |top: f64| -> HtmlElement {
        let el: HtmlElement = d.create_element("div").unwrap().dyn_into().unwrap();
        el.style()
            .set_css_text(&format!("position:fixed;left:0;top:{top}px;height:10px;width:10px"));
        d.body().unwrap().append_child(&el).unwrap();
        el
    };
    let visible = make(0.0);
    let below = make(vh * 0.9);
    assert!(nav::is_in_viewport(&visible).unwrap());
    assert!(!nav::is_in_viewport(&below).unwrap());
    visible.remove();
    below.remove();
}

#[wasm_bindgen_test]
fn scroll_to_missing_section_is_noop() {
    assert!(!nav::scroll_to_section("no-such-section").unwrap());
}

// The only test that calls `start_portfolio`: menu listeners are bound once per
// page, so the fixture has to exist before the first start.
#[wasm_bindgen_test]
fn second_start_does_not_rewire_menu() {
    let d = doc();
    let body: Element = d.body().unwrap().into();
    let nav_bar = append(&body, "nav", "");
    let hamburger = append(&nav_bar, "div", "");
    hamburger.set_id("hamburger");
    let icon = append(&hamburger, "i", "fas fa-bars");
    let menu = append(&nav_bar, "ul", "nav-menu");
    let link = append(&menu, "a", "");
    link.set_attribute("href", "#contact").unwrap();

    starfall_portfolio::start_portfolio().unwrap();
    starfall_portfolio::start_portfolio().unwrap();

    let hamburger: HtmlElement = hamburger.dyn_into().unwrap();
    hamburger.click();
    assert!(menu.class_list().contains("active"), "one click must open the menu");
    assert!(icon.class_list().contains("fa-times"));
    assert!(!icon.class_list().contains("fa-bars"));

    let init = EventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(true);
    let evt = Event::new_with_event_init_dict("click", &init).unwrap();
    let not_prevented = link.dispatch_event(&evt).unwrap();
    assert!(!not_prevented, "link navigation must be prevented");
    assert!(!menu.class_list().contains("active"));
    assert!(icon.class_list().contains("fa-bars"));

    // Without an icon the menu still toggles.
    icon.remove();
    hamburger.click();
    assert!(menu.class_list().contains("active"));
    hamburger.click();
    assert!(!menu.class_list().contains("active"));

    nav_bar.remove();
    page::reset(Config::default());
}

#[wasm_bindgen_test]
async fn reveal_sets_then_clears_flag() {
    page::reset(fast_skills_config(300));
    let body: Element = doc().body().unwrap().into();
    let items: Vec<Element> = (0..3).map(|_| append(&body, "div", "skill-item")).collect();

    reveal::animate_group(RevealGroup::Skills).unwrap();
    sleep(100).await;
    assert_eq!(animated(&items), 3, "stagger should have reached every item");
    sleep(400).await;
    assert_eq!(animated(&items), 0, "flag must be cleared after clear_after_ms");

    for el in items {
        el.remove();
    }
    page::reset(Config::default());
}

#[wasm_bindgen_test]
async fn restarted_reveal_ignores_stale_clear() {
    page::reset(fast_skills_config(300));
    let body: Element = doc().body().unwrap().into();
    let items: Vec<Element> = (0..2).map(|_| append(&body, "div", "skill-item")).collect();

    reveal::animate_group(RevealGroup::Skills).unwrap();
    sleep(200).await;
    reveal::animate_group(RevealGroup::Skills).unwrap();
    // The first run's clear fires around here; it belongs to a stale epoch.
    sleep(150).await;
    assert_eq!(animated(&items), 2);
    sleep(300).await;
    assert_eq!(animated(&items), 0);

    for el in items {
        el.remove();
    }
    page::reset(Config::default());
}

#[wasm_bindgen_test]
async fn scroll_to_section_schedules_reveal() {
    page::reset(fast_skills_config(1000));
    let body: Element = doc().body().unwrap().into();
    let section = append(&body, "section", "");
    section.set_id("skills");
    let item = append(&section, "div", "skill-item");

    assert!(nav::scroll_to_section("skills").unwrap());
    assert!(!item.class_list().contains("animate"));
    sleep(200).await;
    assert!(item.class_list().contains("animate"), "reveal should follow the scroll");

    section.remove();
    page::reset(Config::default());
}
