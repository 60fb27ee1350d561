//! Falling star field.
//!
//! Stars live in a fixed-size pool: slot `i` of [`StarPool`] describes the DOM
//! star carrying `data-slot="i"`. When a star finishes its fall the container's
//! single `animationend` listener regenerates that slot and swaps in a fresh
//! element, so the population stays constant without per-star closures.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement};

use crate::config::StarConfig;
use crate::dom;
use crate::error::{PageError, Result};
use crate::page;
use crate::random::RandomSource;

pub const STAR_CLASS: &str = "star";
const SLOT_ATTR: &str = "data-slot";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeClass {
    Small,
    Medium,
    Large,
}

impl SizeClass {
    /// Split `[0, max_size)` into equal thirds (`<1`, `<2`, rest for the stock 3.0).
    pub fn classify(size: f64, max_size: f64) -> Self {
        let third = max_size / 3.0;
        if size < third {
            SizeClass::Small
        } else if size < 2.0 * third {
            SizeClass::Medium
        } else {
            SizeClass::Large
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizeClass::Small => "small",
            SizeClass::Medium => "medium",
            SizeClass::Large => "large",
        }
    }
}

/// Randomized attributes of one star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StarSpec {
    pub size: f64,
    pub size_class: SizeClass,
    pub left_vw: f64,
    pub top_px: f64,
    pub duration_s: f64,
    pub delay_s: f64,
}

impl StarSpec {
    pub fn generate(rng: &mut dyn RandomSource, cfg: &StarConfig) -> Self {
        let size = rng.next_unit() * cfg.max_size;
        let left_vw = rng.next_unit() * 100.0;
        let top_px = -(rng.next_unit() * cfg.top_spread_px);
        let duration_s = cfg.min_duration_s + rng.next_unit() * cfg.duration_spread_s;
        let delay_s = rng.next_unit() * cfg.max_delay_s;
        Self {
            size,
            size_class: SizeClass::classify(size, cfg.max_size),
            left_vw,
            top_px,
            duration_s,
            delay_s,
        }
    }

    pub fn class_name(&self) -> String {
        format!("{STAR_CLASS} {}", self.size_class.as_str())
    }

    /// Inline style properties for the star element.
    pub fn style_properties(&self) -> [(&'static str, String); 4] {
        [
            ("left", format!("{:.3}vw", self.left_vw)),
            ("top", format!("{:.3}px", self.top_px)),
            ("animation-duration", format!("{:.3}s", self.duration_s)),
            ("animation-delay", format!("{:.3}s", self.delay_s)),
        ]
    }
}

#[derive(Debug, Default)]
pub struct StarPool {
    slots: Vec<StarSpec>,
}

impl StarPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every slot and generate `count` fresh ones.
    pub fn refill(&mut self, count: usize, rng: &mut dyn RandomSource, cfg: &StarConfig) {
        self.slots.clear();
        self.slots.reserve(count);
        for _ in 0..count {
            self.slots.push(StarSpec::generate(rng, cfg));
        }
    }

    /// Append one star, returning its slot.
    pub fn push(&mut self, rng: &mut dyn RandomSource, cfg: &StarConfig) -> usize {
        self.slots.push(StarSpec::generate(rng, cfg));
        self.slots.len() - 1
    }

    /// Regenerate `slot` in place. `None` if the slot does not exist.
    pub fn renew(
        &mut self,
        slot: usize,
        rng: &mut dyn RandomSource,
        cfg: &StarConfig,
    ) -> Option<StarSpec> {
        let spec = StarSpec::generate(rng, cfg);
        let entry = self.slots.get_mut(slot)?;
        *entry = spec;
        Some(spec)
    }

    pub fn get(&self, slot: usize) -> Option<&StarSpec> {
        self.slots.get(slot)
    }

    pub fn slots(&self) -> &[StarSpec] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// --- DOM ----------------------------------------------------------------------

/// Ensure the container exists, wipe it, and fill it with a full pool of stars.
pub fn create_stars() -> Result<()> {
    let doc = dom::document()?;
    let (cfg, specs) = page::with_state(|s| {
        let cfg = s.config.stars.clone();
        s.pool.refill(cfg.count, s.rng.as_mut(), &cfg);
        (cfg, s.pool.slots().to_vec())
    });
    let container = ensure_container(&doc, &cfg.container_class)?;
    container.set_inner_html("");
    for (slot, spec) in specs.iter().enumerate() {
        let star = build_star(&doc, slot, spec)?;
        container.append_child(&star)?;
    }
    bind_renewal(&container)?;
    log::debug!("created {} stars", specs.len());
    Ok(())
}

/// Append one freshly randomized star to `container`.
pub fn create_star(container: &Element) -> Result<HtmlElement> {
    let doc = dom::document()?;
    let (slot, spec) = page::with_state(|s| {
        let cfg = s.config.stars.clone();
        let slot = s.pool.push(s.rng.as_mut(), &cfg);
        (slot, s.pool.slots()[slot])
    });
    let star = build_star(&doc, slot, &spec)?;
    container.append_child(&star)?;
    bind_renewal(container)?;
    Ok(star)
}

/// Log every star's timing; returns the star count.
pub fn check_stars() -> Result<usize> {
    let doc = dom::document()?;
    let stars = dom::query_all(&doc, &format!(".{STAR_CLASS}"))?;
    log::info!("Total stars: {}", stars.len());
    for (i, el) in stars.iter().enumerate() {
        if let Some(html) = el.dyn_ref::<HtmlElement>() {
            let style = html.style();
            log::info!(
                "Star {}: {} {}",
                i + 1,
                style.get_property_value("animation-duration")?,
                style.get_property_value("animation-delay")?
            );
        }
    }
    Ok(stars.len())
}

fn ensure_container(doc: &Document, class: &str) -> Result<Element> {
    if let Some(el) = doc.query_selector(&format!(".{class}"))? {
        return Ok(el);
    }
    let el = doc.create_element("div")?;
    el.set_class_name(class);
    dom::body(doc)?.append_child(&el)?;
    Ok(el)
}

fn build_star(doc: &Document, slot: usize, spec: &StarSpec) -> Result<HtmlElement> {
    let star: HtmlElement = doc
        .create_element("div")?
        .dyn_into()
        .map_err(|_| PageError::UnexpectedElement("HtmlElement"))?;
    star.set_class_name(&spec.class_name());
    star.set_attribute(SLOT_ATTR, &slot.to_string())?;
    let style = star.style();
    for (name, value) in spec.style_properties() {
        style.set_property(name, &value)?;
    }
    Ok(star)
}

/// One `animationend` listener per container. Rebinding happens only when the
/// container element itself was replaced.
fn bind_renewal(container: &Element) -> Result<()> {
    let already = page::with_state(|s| s.renewal_bound.as_ref() == Some(container));
    if already {
        return Ok(());
    }
    let bound = container.clone();
    let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
        let Some(star) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        if !star.class_list().contains(STAR_CLASS) {
            return;
        }
        // Stars wiped by a rebuild are detached and must not be replaced.
        if star.parent_element().as_ref() != Some(&bound) {
            return;
        }
        dom::report("star renewal", renew_star(&bound, &star));
    }) as Box<dyn FnMut(_)>);
    container.add_event_listener_with_callback("animationend", closure.as_ref().unchecked_ref())?;
    closure.forget();
    page::with_state(|s| s.renewal_bound = Some(container.clone()));
    Ok(())
}

fn renew_star(container: &Element, old: &Element) -> Result<()> {
    let doc = dom::document()?;
    let slot = old.get_attribute(SLOT_ATTR).and_then(|v| v.parse::<usize>().ok());
    let (slot, spec) = page::with_state(|s| {
        let cfg = s.config.stars.clone();
        match slot.and_then(|i| s.pool.renew(i, s.rng.as_mut(), &cfg).map(|spec| (i, spec))) {
            Some(hit) => hit,
            None => {
                let i = s.pool.push(s.rng.as_mut(), &cfg);
                (i, s.pool.slots()[i])
            }
        }
    });
    old.remove();
    let star = build_star(&doc, slot, &spec)?;
    container.append_child(&star)?;
    Ok(())
}
