//! Field-extraction strategies.
//!
//! Every strategy is a stateless unit struct implementing
//! [`ExtractionStrategy`]. Structural variants are picked by the platform
//! detector; the legacy per-domain variants only by hostname.

use std::fmt;

use serde::Serialize;

use crate::detector::Platform;
use crate::error::{RequiredField, StrategyError};
use crate::models::ProductRecord;
use crate::page::Page;

pub mod chain;
pub mod daren_factory;
pub mod factory_moon;
pub mod generic;
pub mod regine;
pub mod salla;
pub mod zid;

/// Tag of every strategy variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Salla,
    Zid,
    Generic,
    RegineSa,
    DarenFactory,
    FactoryMoon,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Salla => "salla",
            Self::Zid => "zid",
            Self::Generic => "generic",
            Self::RegineSa => "regine_sa",
            Self::DarenFactory => "daren_factory",
            Self::FactoryMoon => "factory_moon",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Platform> for StrategyKind {
    fn from(platform: Platform) -> Self {
        match platform {
            Platform::Salla => Self::Salla,
            Platform::Zid => Self::Zid,
            Platform::Generic => Self::Generic,
        }
    }
}

/// The extraction contract shared by every strategy.
///
/// Implementors supply the name and price chains; secondary fields default
/// to the shared chains. `extract` never returns a record without a name
/// and a positive price.
pub trait ExtractionStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    fn extract_name(&self, page: &Page) -> Option<String>;

    fn extract_price(&self, page: &Page) -> Option<f64>;

    /// Fills optional fields. Must not overwrite anything already set.
    fn extract_secondary(&self, page: &Page, record: &mut ProductRecord) {
        chain::fill_secondary(page, record);
    }

    /// Error raised when a required chain runs dry.
    fn missing(&self, field: RequiredField) -> StrategyError {
        match field {
            RequiredField::Name => StrategyError::MissingName,
            RequiredField::Price => StrategyError::MissingPrice,
        }
    }

    fn extract(&self, page: &Page) -> Result<ProductRecord, StrategyError> {
        let name = self
            .extract_name(page)
            .ok_or_else(|| self.missing(RequiredField::Name))?;
        let price = self
            .extract_price(page)
            .filter(|p| p.is_finite() && *p > 0.0)
            .ok_or_else(|| self.missing(RequiredField::Price))?;

        let mut record = ProductRecord::new(&name, price, self.kind());
        self.extract_secondary(page, &mut record);
        Ok(record)
    }
}

/// The strategy implementing `kind`.
pub fn strategy_for(kind: StrategyKind) -> &'static dyn ExtractionStrategy {
    match kind {
        StrategyKind::Salla => &salla::SallaStrategy,
        StrategyKind::Zid => &zid::ZidStrategy,
        StrategyKind::Generic => &generic::GenericStrategy,
        StrategyKind::RegineSa => &regine::RegineStrategy,
        StrategyKind::DarenFactory => &daren_factory::DarenFactoryStrategy,
        StrategyKind::FactoryMoon => &factory_moon::FactoryMoonStrategy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_maps_to_its_own_strategy() {
        for kind in [
            StrategyKind::Salla,
            StrategyKind::Zid,
            StrategyKind::Generic,
            StrategyKind::RegineSa,
            StrategyKind::DarenFactory,
            StrategyKind::FactoryMoon,
        ] {
            assert_eq!(strategy_for(kind).kind(), kind);
        }
    }

    #[test]
    fn platforms_convert_to_structural_kinds() {
        assert_eq!(StrategyKind::from(Platform::Salla), StrategyKind::Salla);
        assert_eq!(StrategyKind::from(Platform::Zid), StrategyKind::Zid);
        assert_eq!(StrategyKind::from(Platform::Generic), StrategyKind::Generic);
        assert_eq!(StrategyKind::FactoryMoon.to_string(), "factory_moon");
    }
}
