//! Page tuning knobs. `Config::default()` matches the stock portfolio stylesheet;
//! with the `serde` feature any subset of fields can be overridden from JSON.

use crate::error::{PageError, Result};
use crate::reveal::RevealGroup;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Upper bound on the star pool; past this the page stutters on low-end phones.
pub const MAX_STAR_COUNT: usize = 2000;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct Config {
    pub stars: StarConfig,
    pub skills: GroupConfig,
    pub certificates: GroupConfig,
    pub reveal: RevealConfig,
    pub nav: NavConfig,
    pub refresh: RefreshConfig,
}

/// Star field population and per-particle randomization ranges.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StarConfig {
    pub count: usize,
    pub container_class: String,
    /// Raw size is drawn from `[0, max_size)`; thirds map to small/medium/large.
    pub max_size: f64,
    /// Stars start somewhere in `(-top_spread_px, 0]` above the viewport.
    pub top_spread_px: f64,
    pub min_duration_s: f64,
    pub duration_spread_s: f64,
    pub max_delay_s: f64,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            count: 150,
            container_class: "stars-container".into(),
            max_size: 3.0,
            top_spread_px: 100.0,
            min_duration_s: 2.0,
            duration_spread_s: 4.0,
            max_delay_s: 2.0,
        }
    }
}

/// One reveal group (skills, certificates). Overriding a group from JSON
/// replaces it whole: the two groups have different defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupConfig {
    pub section_id: String,
    pub selector: String,
    pub stagger_ms: u32,
    pub clear_after_ms: u32,
}

impl GroupConfig {
    pub fn skills() -> Self {
        Self {
            section_id: "skills".into(),
            selector: ".skill-item".into(),
            stagger_ms: 100,
            clear_after_ms: 3000,
        }
    }

    pub fn certificates() -> Self {
        Self {
            section_id: "certificates".into(),
            selector: ".cert-card".into(),
            stagger_ms: 200,
            clear_after_ms: 4000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stars: StarConfig::default(),
            skills: GroupConfig::skills(),
            certificates: GroupConfig::certificates(),
            reveal: RevealConfig::default(),
            nav: NavConfig::default(),
            refresh: RefreshConfig::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RevealConfig {
    pub animate_class: String,
    pub observer_threshold: f64,
    pub observer_root_margin: String,
    /// Fraction of the viewport height a section top must be above to count as visible.
    pub viewport_ratio: f64,
    pub initial_delay_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            animate_class: "animate".into(),
            observer_threshold: 0.3,
            observer_root_margin: "0px 0px -100px 0px".into(),
            viewport_ratio: 0.8,
            initial_delay_ms: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct NavConfig {
    pub header_offset_px: f64,
    pub reveal_after_scroll_ms: u32,
    pub hamburger_id: String,
    pub menu_selector: String,
    pub link_selector: String,
    pub open_class: String,
    pub icon_closed_class: String,
    pub icon_open_class: String,
    pub year_id: String,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            header_offset_px: 100.0,
            reveal_after_scroll_ms: 800,
            hamburger_id: "hamburger".into(),
            menu_selector: ".nav-menu".into(),
            link_selector: ".nav-menu a".into(),
            open_class: "active".into(),
            icon_closed_class: "fa-bars".into(),
            icon_open_class: "fa-times".into(),
            year_id: "current-year".into(),
        }
    }
}

/// Star field rebuild triggers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RefreshConfig {
    pub resize_delay_ms: u32,
    pub scroll_delta_px: f64,
    pub load_delay_ms: u32,
    /// 0 disables the periodic rebuild.
    pub interval_ms: u32,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            resize_delay_ms: 100,
            scroll_delta_px: 500.0,
            load_delay_ms: 1000,
            interval_ms: 30_000,
        }
    }
}

impl Config {
    pub fn group(&self, group: RevealGroup) -> &GroupConfig {
        match group {
            RevealGroup::Skills => &self.skills,
            RevealGroup::Certificates => &self.certificates,
        }
    }

    #[cfg(feature = "serde_json")]
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Config =
            serde_json::from_str(json).map_err(|e| PageError::ConfigParse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.stars;
        if s.count == 0 || s.count > MAX_STAR_COUNT {
            return Err(invalid(format!(
                "stars.count must be in 1..={MAX_STAR_COUNT}, got {}",
                s.count
            )));
        }
        if !(s.max_size > 0.0 && s.max_size.is_finite()) {
            return Err(invalid(format!("stars.max_size must be > 0, got {}", s.max_size)));
        }
        if !(s.min_duration_s > 0.0 && s.min_duration_s.is_finite()) {
            return Err(invalid(format!(
                "stars.min_duration_s must be > 0, got {}",
                s.min_duration_s
            )));
        }
        for (name, v) in [
            ("stars.duration_spread_s", s.duration_spread_s),
            ("stars.max_delay_s", s.max_delay_s),
            ("stars.top_spread_px", s.top_spread_px),
            ("refresh.scroll_delta_px", self.refresh.scroll_delta_px),
        ] {
            if !(v >= 0.0 && v.is_finite()) {
                return Err(invalid(format!("{name} must be >= 0, got {v}")));
            }
        }
        let r = &self.reveal;
        if !(0.0..=1.0).contains(&r.observer_threshold) {
            return Err(invalid(format!(
                "reveal.observer_threshold must be in [0, 1], got {}",
                r.observer_threshold
            )));
        }
        if !(r.viewport_ratio > 0.0 && r.viewport_ratio <= 1.0) {
            return Err(invalid(format!(
                "reveal.viewport_ratio must be in (0, 1], got {}",
                r.viewport_ratio
            )));
        }
        if !self.nav.header_offset_px.is_finite() {
            return Err(invalid("nav.header_offset_px must be finite".into()));
        }
        for (name, v) in [
            ("stars.container_class", &s.container_class),
            ("skills.section_id", &self.skills.section_id),
            ("skills.selector", &self.skills.selector),
            ("certificates.section_id", &self.certificates.section_id),
            ("certificates.selector", &self.certificates.selector),
            ("reveal.animate_class", &r.animate_class),
            ("nav.hamburger_id", &self.nav.hamburger_id),
            ("nav.menu_selector", &self.nav.menu_selector),
            ("nav.link_selector", &self.nav.link_selector),
            ("nav.open_class", &self.nav.open_class),
            ("nav.icon_closed_class", &self.nav.icon_closed_class),
            ("nav.icon_open_class", &self.nav.icon_open_class),
            ("nav.year_id", &self.nav.year_id),
        ] {
            if v.trim().is_empty() {
                return Err(invalid(format!("{name} must not be empty")));
            }
        }
        if self.skills.section_id == self.certificates.section_id {
            return Err(invalid(format!(
                "skills and certificates share section id '{}'",
                self.skills.section_id
            )));
        }
        Ok(())
    }
}

fn invalid(msg: String) -> PageError {
    PageError::InvalidConfig(msg)
}
