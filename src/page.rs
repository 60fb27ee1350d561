//! Page-level state and the load-time wiring of every trigger.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, DocumentReadyState, Element, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

use crate::config::Config;
use crate::dom;
use crate::error::Result;
use crate::nav;
use crate::random::{self, RandomSource};
use crate::reveal::{self, RevealEpochs, RevealGroup};
use crate::stars::{self, StarPool};

/// Tracks the scroll position at the last star rebuild.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollTracker {
    last_y: f64,
    threshold: f64,
}

impl ScrollTracker {
    pub fn new(initial_y: f64, threshold: f64) -> Self {
        Self { last_y: initial_y, threshold }
    }

    /// True (and re-anchors) once `y` has moved more than the threshold away
    /// from the last anchor.
    pub fn observe(&mut self, y: f64) -> bool {
        if (y - self.last_y).abs() > self.threshold {
            self.last_y = y;
            true
        } else {
            false
        }
    }

    pub fn last_y(&self) -> f64 {
        self.last_y
    }
}

/// Everything the page script mutates between callbacks.
pub struct PageState {
    pub config: Config,
    pub pool: StarPool,
    pub rng: Box<dyn RandomSource>,
    pub scroll: ScrollTracker,
    pub reveal: RevealEpochs,
    /// Container currently carrying the star renewal listener.
    pub renewal_bound: Option<Element>,
    /// Set by the first `start`: window, menu and observer listeners are
    /// bound (or queued behind `DOMContentLoaded`) exactly once per page.
    pub wired: bool,
}

impl PageState {
    pub fn new(config: Config) -> Self {
        let scroll = ScrollTracker::new(0.0, config.refresh.scroll_delta_px);
        Self {
            config,
            pool: StarPool::new(),
            rng: random::page_source(),
            scroll,
            reveal: RevealEpochs::default(),
            renewal_bound: None,
            wired: false,
        }
    }
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = RefCell::new(None);
}

/// Run `f` against the page state, creating a default one on first use.
/// `f` must not call back into anything that borrows the state again.
pub fn with_state<R>(f: impl FnOnce(&mut PageState) -> R) -> R {
    PAGE_STATE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let state = slot.get_or_insert_with(|| PageState::new(Config::default()));
        f(state)
    })
}

/// Replace the config and start a fresh pool and scroll anchor. Listener
/// bookkeeping and reveal epochs survive, so nothing is bound twice and timers
/// queued before the reset stay stale.
pub fn reset(config: Config) {
    PAGE_STATE.with(|cell| {
        let mut slot = cell.borrow_mut();
        let mut fresh = PageState::new(config);
        if let Some(old) = slot.take() {
            fresh.renewal_bound = old.renewal_bound;
            fresh.wired = old.wired;
            fresh.reveal = old.reveal;
        }
        *slot = Some(fresh);
    });
}

/// Install `config` and animate the page. Safe to call again; a second call
/// swaps the config and rebuilds the star field.
pub fn start(config: Config) -> Result<()> {
    config.validate()?;
    reset(config);
    let win = dom::window()?;
    let doc = dom::document()?;
    let initial_y = win.scroll_y()?;
    with_state(|s| s.scroll = ScrollTracker::new(initial_y, s.config.refresh.scroll_delta_px));

    let first_start = with_state(|s| !std::mem::replace(&mut s.wired, true));
    match StartAction::plan(first_start, doc.ready_state()) {
        StartAction::WireWhenReady => {
            let closure = Closure::once_into_js(|| dom::report("dom ready", on_dom_ready()));
            doc.add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref())?;
        }
        StartAction::WireNow => on_dom_ready()?,
        StartAction::Refresh => {
            log::debug!("restart: rebuilding stars with the new config");
            stars::create_stars()?;
            set_current_year(&doc);
        }
        // The queued DOMContentLoaded handler reads the new config when it runs.
        StartAction::Nothing => {}
    }
    if first_start {
        bind_window_triggers(&win, &doc)?;
    }
    Ok(())
}

/// What a `start` call does to the document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StartAction {
    /// First start, document still parsing.
    WireWhenReady,
    /// First start, DOM available.
    WireNow,
    /// Restart after the DOM routine already ran: stars and year only.
    Refresh,
    /// Restart while the first DOM routine is still queued.
    Nothing,
}

impl StartAction {
    pub fn plan(first_start: bool, ready: DocumentReadyState) -> Self {
        let loading = ready == DocumentReadyState::Loading;
        match (first_start, loading) {
            (true, true) => StartAction::WireWhenReady,
            (true, false) => StartAction::WireNow,
            (false, false) => StartAction::Refresh,
            (false, true) => StartAction::Nothing,
        }
    }
}

fn on_dom_ready() -> Result<()> {
    log::info!("DOM loaded - initializing animations");
    let doc = dom::document()?;
    stars::create_stars()?;
    set_current_year(&doc);
    nav::wire_mobile_menu(&doc)?;
    observe_sections(&doc)?;
    reveal_visible_sections(&doc)?;
    Ok(())
}

fn set_current_year(doc: &Document) {
    let id = with_state(|s| s.config.nav.year_id.clone());
    if let Some(el) = doc.get_element_by_id(&id) {
        let year = js_sys::Date::new_0().get_full_year();
        el.set_text_content(Some(&year.to_string()));
    }
}

fn sections(doc: &Document) -> Vec<(RevealGroup, Element)> {
    let ids: Vec<(RevealGroup, String)> = with_state(|s| {
        RevealGroup::ALL
            .into_iter()
            .map(|g| (g, s.config.group(g).section_id.clone()))
            .collect()
    });
    ids.into_iter()
        .filter_map(|(g, id)| doc.get_element_by_id(&id).map(|el| (g, el)))
        .collect()
}

fn observe_sections(doc: &Document) -> Result<()> {
    let found = sections(doc);
    if found.is_empty() {
        return Ok(());
    }
    let (threshold, margin) = with_state(|s| {
        (s.config.reveal.observer_threshold, s.config.reveal.observer_root_margin.clone())
    });

    let on_intersect = |entries: js_sys::Array, _obs: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if !entry.is_intersecting() {
                continue;
            }
            let id = entry.target().id();
            log::info!("Section in view: {id}");
            if let Some(group) = with_state(|s| RevealGroup::for_section(&id, &s.config)) {
                dom::report("reveal on intersect", reveal::animate_group(group));
            }
        }
    };
    let callback = Closure::wrap(
        Box::new(on_intersect) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>
    );

    let opts = IntersectionObserverInit::new();
    opts.set_threshold(&JsValue::from_f64(threshold));
    opts.set_root_margin(&margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &opts)?;
    callback.forget();

    for (group, el) in found {
        observer.observe(&el);
        log::info!("Observing {} section", group.label().to_lowercase());
    }
    Ok(())
}

fn reveal_visible_sections(doc: &Document) -> Result<()> {
    let delay = with_state(|s| s.config.reveal.initial_delay_ms);
    for (group, el) in sections(doc) {
        if nav::is_in_viewport(&el)? {
            log::info!("{} visible on load - animating", group.label());
            dom::schedule(delay, move || {
                dom::report("reveal on load", reveal::animate_group(group));
            })?;
        }
    }
    Ok(())
}

fn rebuild_stars(context: &'static str) {
    dom::report(context, stars::create_stars());
}

/// Resize, scroll, load and periodic star rebuilds.
fn bind_window_triggers(win: &Window, doc: &Document) -> Result<()> {
    let refresh = with_state(|s| s.config.refresh.clone());

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let delay = with_state(|s| s.config.refresh.resize_delay_ms);
            dom::report(
                "resize",
                dom::schedule(delay, || rebuild_stars("rebuild after resize")).map(|_| ()),
            );
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let Some(y) = web_sys::window().and_then(|w| w.scroll_y().ok()) else {
                return;
            };
            if with_state(|s| s.scroll.observe(y)) {
                log::debug!("scrolled to {y}, rebuilding stars");
                rebuild_stars("rebuild after scroll");
            }
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // `load` has already fired when we start late; schedule the fallback directly.
    if doc.ready_state() == DocumentReadyState::Complete {
        dom::schedule(refresh.load_delay_ms, || rebuild_stars("rebuild after load"))?;
    } else {
        let closure = Closure::once_into_js(|| {
            let delay = with_state(|s| s.config.refresh.load_delay_ms);
            dom::report(
                "load",
                dom::schedule(delay, || rebuild_stars("rebuild after load")).map(|_| ()),
            );
        });
        win.add_event_listener_with_callback("load", closure.unchecked_ref())?;
    }

    if refresh.interval_ms > 0 {
        dom::schedule_repeating(refresh.interval_ms, || rebuild_stars("periodic rebuild"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_tracker_reanchors_only_past_threshold() {
        let mut t = ScrollTracker::new(0.0, 500.0);
        assert!(!t.observe(300.0));
        assert!(!t.observe(500.0));
        assert!(t.observe(501.0));
        assert_eq!(t.last_y(), 501.0);
        assert!(!t.observe(900.0));
        assert!(t.observe(0.0));
        assert_eq!(t.last_y(), 0.0);
    }

    #[test]
    fn with_state_lazily_creates_defaults() {
        PAGE_STATE.with(|cell| cell.replace(None));
        let count = with_state(|s| s.config.stars.count);
        assert_eq!(count, 150);
        assert!(with_state(|s| s.pool.is_empty()));
    }

    #[test]
    fn reset_swaps_config_but_keeps_listener_bookkeeping() {
        PAGE_STATE.with(|cell| cell.replace(None));
        with_state(|s| s.wired = true);
        let mut cfg = Config::default();
        cfg.stars.count = 12;
        reset(cfg);
        with_state(|s| {
            assert_eq!(s.config.stars.count, 12);
            assert!(s.wired);
        });
    }

    #[test]
    fn reset_keeps_pre_reset_reveal_timers_stale() {
        PAGE_STATE.with(|cell| cell.replace(None));
        let stale = with_state(|s| s.reveal.begin(RevealGroup::Skills));
        reset(Config::default());
        let fresh = with_state(|s| s.reveal.begin(RevealGroup::Skills));
        with_state(|s| {
            assert!(!s.reveal.is_current(RevealGroup::Skills, stale));
            assert!(s.reveal.is_current(RevealGroup::Skills, fresh));
        });
    }

    #[test]
    fn restart_never_rewires_listeners() {
        use DocumentReadyState::*;
        assert_eq!(StartAction::plan(true, Loading), StartAction::WireWhenReady);
        assert_eq!(StartAction::plan(true, Interactive), StartAction::WireNow);
        assert_eq!(StartAction::plan(true, Complete), StartAction::WireNow);
        assert_eq!(StartAction::plan(false, Complete), StartAction::Refresh);
        assert_eq!(StartAction::plan(false, Interactive), StartAction::Refresh);
        assert_eq!(StartAction::plan(false, Loading), StartAction::Nothing);
    }
}
