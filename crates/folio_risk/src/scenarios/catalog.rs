//! Stress scenario catalogue.

use serde::Serialize;
use std::fmt;

/// Qualitative likelihood label of a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Probability {
    /// Unlikely.
    Low,
    /// Plausible.
    Medium,
    /// Likely.
    High,
}

impl fmt::Display for Probability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        })
    }
}

/// The five catalogued stress scenarios.
///
/// # Examples
///
/// ```rust
/// use folio_risk::scenarios::ScenarioKind;
///
/// let kind = ScenarioKind::from_id("market-crash").unwrap();
/// assert_eq!(kind, ScenarioKind::MarketCrash);
/// assert_eq!(kind.headline_impact_pct(), -15.2);
/// assert!(ScenarioKind::from_id("alien-invasion").is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioKind {
    /// Broad equity sell-off.
    MarketCrash,
    /// Technology-led rally.
    TechBoom,
    /// Inflation and rates shock.
    InflationSpike,
    /// Economic contraction.
    Recession,
    /// Broad market rally.
    BullMarket,
}

impl ScenarioKind {
    /// Every scenario in catalogue order.
    pub fn all() -> [Self; 5] {
        [
            Self::MarketCrash,
            Self::TechBoom,
            Self::InflationSpike,
            Self::Recession,
            Self::BullMarket,
        ]
    }

    /// Looks up a scenario by its identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        Self::all().into_iter().find(|kind| kind.id() == id)
    }

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Self::MarketCrash => "market-crash",
            Self::TechBoom => "tech-boom",
            Self::InflationSpike => "inflation-spike",
            Self::Recession => "recession",
            Self::BullMarket => "bull-market",
        }
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MarketCrash => "Market Crash",
            Self::TechBoom => "Tech Sector Boom",
            Self::InflationSpike => "Inflation Spike",
            Self::Recession => "Economic Recession",
            Self::BullMarket => "Bull Market",
        }
    }

    /// One-line description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MarketCrash => "S&P 500 drops by 20% over 3 months",
            Self::TechBoom => "Technology stocks rally 30%",
            Self::InflationSpike => "Inflation rises to 8%, interest rates increase",
            Self::Recession => "GDP contracts for two consecutive quarters",
            Self::BullMarket => "Broad market rally across all sectors",
        }
    }

    /// Portfolio-level headline impact in percent.
    pub fn headline_impact_pct(&self) -> f64 {
        match self {
            Self::MarketCrash => -15.2,
            Self::TechBoom => 22.5,
            Self::InflationSpike => -8.3,
            Self::Recession => -12.7,
            Self::BullMarket => 18.4,
        }
    }

    /// Likelihood label.
    pub fn probability(&self) -> Probability {
        match self {
            Self::MarketCrash | Self::Recession => Probability::Low,
            Self::TechBoom | Self::InflationSpike => Probability::Medium,
            Self::BullMarket => Probability::High,
        }
    }

    /// Catalogue entry.
    pub fn definition(&self) -> ScenarioDefinition {
        ScenarioDefinition {
            id: self.id(),
            name: self.name(),
            description: self.description(),
            headline_impact_pct: self.headline_impact_pct(),
            probability: self.probability(),
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Immutable catalogue entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Headline impact in percent.
    pub headline_impact_pct: f64,
    /// Likelihood label.
    pub probability: Probability,
}

/// All catalogue entries in order.
pub fn catalogue() -> Vec<ScenarioDefinition> {
    ScenarioKind::all().iter().map(ScenarioKind::definition).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_has_five_unique_ids() {
        let defs = catalogue();
        assert_eq!(defs.len(), 5);
        let mut ids: Vec<&str> = defs.iter().map(|d| d.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_id_round_trip() {
        for kind in ScenarioKind::all() {
            assert_eq!(ScenarioKind::from_id(kind.id()), Some(kind));
            assert_eq!(kind.to_string(), kind.id());
        }
    }

    #[test]
    fn test_headline_impacts() {
        assert_eq!(ScenarioKind::TechBoom.headline_impact_pct(), 22.5);
        assert_eq!(ScenarioKind::InflationSpike.headline_impact_pct(), -8.3);
        assert_eq!(ScenarioKind::Recession.headline_impact_pct(), -12.7);
        assert_eq!(ScenarioKind::BullMarket.headline_impact_pct(), 18.4);
    }

    #[test]
    fn test_probability_labels() {
        assert_eq!(ScenarioKind::MarketCrash.probability(), Probability::Low);
        assert_eq!(ScenarioKind::TechBoom.probability(), Probability::Medium);
        assert_eq!(ScenarioKind::BullMarket.probability().to_string(), "High");
    }

    #[test]
    fn test_definition_serialises_camel_case() {
        let value = serde_json::to_value(ScenarioKind::MarketCrash.definition()).unwrap();
        assert_eq!(value["headlineImpactPct"], -15.2);
        assert_eq!(value["probability"], "Low");
    }
}
