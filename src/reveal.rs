//! Staggered `animate` class reveals for the skills and certificates sections.

use crate::config::{Config, GroupConfig};
use crate::dom;
use crate::error::Result;
use crate::page;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RevealGroup {
    Skills,
    Certificates,
}

impl RevealGroup {
    pub const ALL: [RevealGroup; 2] = [RevealGroup::Skills, RevealGroup::Certificates];

    /// Group whose section carries `id`, if any.
    pub fn for_section(id: &str, cfg: &Config) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|g| cfg.group(*g).section_id == id)
    }

    pub fn label(self) -> &'static str {
        match self {
            RevealGroup::Skills => "Skills",
            RevealGroup::Certificates => "Certificates",
        }
    }

    fn index(self) -> usize {
        match self {
            RevealGroup::Skills => 0,
            RevealGroup::Certificates => 1,
        }
    }
}

/// Timer layout for one reveal run: member `i` gets the class at `delays[i]`,
/// everyone loses it at `clear_after_ms`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealPlan {
    delays: Vec<u32>,
    clear_after_ms: u32,
}

impl RevealPlan {
    pub fn new(members: usize, cfg: &GroupConfig) -> Self {
        let delays = (0..members)
            .map(|i| cfg.stagger_ms.saturating_mul(i.min(u32::MAX as usize) as u32))
            .collect();
        Self { delays, clear_after_ms: cfg.clear_after_ms }
    }

    pub fn delays(&self) -> &[u32] {
        &self.delays
    }

    pub fn clear_after_ms(&self) -> u32 {
        self.clear_after_ms
    }
}

/// Per-group run counter. Each call to [`animate_group`] opens a new epoch;
/// timers from older epochs find themselves stale and do nothing.
#[derive(Clone, Debug, Default)]
pub struct RevealEpochs {
    current: [u64; 2],
}

impl RevealEpochs {
    pub fn begin(&mut self, group: RevealGroup) -> u64 {
        let slot = &mut self.current[group.index()];
        *slot = slot.wrapping_add(1);
        *slot
    }

    pub fn is_current(&self, group: RevealGroup, epoch: u64) -> bool {
        self.current[group.index()] == epoch
    }
}

/// Restart the reveal for `group`: clear, reflow, stagger in, clear again.
pub fn animate_group(group: RevealGroup) -> Result<()> {
    let (cfg, class, epoch) = page::with_state(|s| {
        (
            s.config.group(group).clone(),
            s.config.reveal.animate_class.clone(),
            s.reveal.begin(group),
        )
    });
    let doc = dom::document()?;
    let members = dom::query_all(&doc, &cfg.selector)?;
    for m in &members {
        m.class_list().remove_1(&class)?;
    }
    dom::force_reflow(&doc);

    let plan = RevealPlan::new(members.len(), &cfg);
    for (member, &delay) in members.iter().zip(plan.delays()) {
        let member = member.clone();
        let class = class.clone();
        dom::schedule(delay, move || {
            if is_current(group, epoch) {
                dom::report("reveal", member.class_list().add_1(&class).map_err(Into::into));
            }
        })?;
    }
    dom::schedule(plan.clear_after_ms(), move || {
        if !is_current(group, epoch) {
            return;
        }
        for m in &members {
            dom::report("reveal clear", m.class_list().remove_1(&class).map_err(Into::into));
        }
    })?;
    log::debug!("{} reveal started on {} members", group.label(), plan.delays().len());
    Ok(())
}

pub fn animate_all() -> Result<()> {
    for group in RevealGroup::ALL {
        animate_group(group)?;
    }
    Ok(())
}

fn is_current(group: RevealGroup, epoch: u64) -> bool {
    page::with_state(|s| s.reveal.is_current(group, epoch))
}
