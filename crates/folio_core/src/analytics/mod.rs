//! Derived analytics over upstream series.

mod rolling;

pub use rolling::{rolling_risk, RollingPoint, RollingWindow};
