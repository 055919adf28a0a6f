//! Strategy-selection policies.
//!
//! Two interchangeable policies sit behind [`StrategySelector`]: structural
//! detection, and the older hostname table. Their strategies recover fields
//! differently and neither subsumes the other, so the choice is left to
//! configuration.

use crate::config::SelectionMode;
use crate::detector;
use crate::page::Page;
use crate::strategies::StrategyKind;

/// Picks the strategy for a fetched page.
pub trait StrategySelector: Send + Sync {
    fn select(&self, page: &Page) -> StrategyKind;
}

/// Classifies pages by platform fingerprint.
pub struct StructuralSelector;

impl StrategySelector for StructuralSelector {
    fn select(&self, page: &Page) -> StrategyKind {
        detector::detect(page).into()
    }
}

/// Hostnames with a hand-written strategy.
pub const KNOWN_DOMAINS: [(&str, StrategyKind); 3] = [
    ("regine-sa.com", StrategyKind::RegineSa),
    ("darenfactory.com", StrategyKind::DarenFactory),
    ("factory-moon.com", StrategyKind::FactoryMoon),
];

/// Matches the page's host against [`KNOWN_DOMAINS`], defaulting to generic.
pub struct DomainSelector;

impl DomainSelector {
    pub fn kind_for_domain(domain: &str) -> StrategyKind {
        let domain = domain.to_lowercase();
        KNOWN_DOMAINS
            .iter()
            .find(|(known, _)| domain.contains(*known))
            .map_or(StrategyKind::Generic, |(_, kind)| *kind)
    }
}

impl StrategySelector for DomainSelector {
    fn select(&self, page: &Page) -> StrategyKind {
        Self::kind_for_domain(page.domain())
    }
}

pub fn selector_for(mode: SelectionMode) -> Box<dyn StrategySelector> {
    match mode {
        SelectionMode::Structural => Box::new(StructuralSelector),
        SelectionMode::Domain => Box::new(DomainSelector),
    }
}
