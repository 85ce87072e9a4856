//! # Stress Scenarios
//!
//! - `catalog`: the five named scenarios and their headline impacts
//! - `engine`: request shaping, response filtering and the scenario line
//! - `factor`: in-process factor-model implementation of the scenario service

mod catalog;
mod engine;
pub mod factor;

pub use catalog::{catalogue, Probability, ScenarioDefinition, ScenarioKind};
pub use engine::{
    headline_impact, interpret, scenario_line, shape_request, ScenarioEngine, ScenarioResult,
};
pub use factor::FactorModelEvaluator;
