//! Numeric parameters supplied by the host.
//!
//! Every field has a default, so a graph document may carry a partial
//! `"config"` object:
//!
//! ```json
//! {
//!   "alpha_decay": 0.0228,
//!   "velocity_decay": 0.6,
//!   "link": { "distance": 150.0, "iterations": 2 },
//!   "charge": { "strength": -400.0, "theta": 0.9 },
//!   "center": null,
//!   "collision": { "radius": 60.0 }
//! }
//! ```
//!
//! A force set to `null` is disabled.

use serde::{Deserialize, Serialize};

use crate::error::{Result, invalid};

use super::integrator::{Cooling, default_alpha_decay};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Rest length for links without their own.
    pub distance: f64,
    /// Stiffness for links without their own; `None` uses `1 / min(degree)`.
    pub stiffness: Option<f64>,
    /// Spring passes per tick.
    pub iterations: usize,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            distance: 150.0,
            stiffness: None,
            iterations: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ChargeConfig {
    /// Negative repels, positive attracts.
    pub strength: f64,
    /// Barnes-Hut opening ratio (cell width / distance).
    pub theta: f64,
    pub distance_min: f64,
    pub distance_max: Option<f64>,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            strength: -400.0,
            theta: 0.9,
            distance_min: 1.0,
            distance_max: None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CenterConfig {
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

impl Default for CenterConfig {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            strength: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Radius for nodes without a radius hint.
    pub radius: f64,
    pub strength: f64,
    pub iterations: usize,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            radius: 60.0,
            strength: 1.0,
            iterations: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub alpha_decay: f64,
    pub alpha_min: f64,
    pub alpha_target: f64,
    /// Fraction of velocity kept each tick, in `[0, 1]`.
    pub velocity_decay: f64,
    /// Alpha target held while at least one node is being dragged.
    pub drag_alpha_target: f64,
    pub link: Option<LinkConfig>,
    pub charge: Option<ChargeConfig>,
    pub center: Option<CenterConfig>,
    pub collision: Option<CollisionConfig>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            alpha_decay: default_alpha_decay(),
            alpha_min: 0.001,
            alpha_target: 0.0,
            velocity_decay: 0.6,
            drag_alpha_target: 0.3,
            link: Some(LinkConfig::default()),
            charge: Some(ChargeConfig::default()),
            center: Some(CenterConfig::default()),
            collision: Some(CollisionConfig::default()),
        }
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(name, value, "must be finite"))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(invalid(name, value, "must not be negative"));
    }
    Ok(())
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(invalid(name, value, "must be within [0, 1]"));
    }
    Ok(())
}

fn at_least_one(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(invalid(name, 0.0, "must be at least 1"));
    }
    Ok(())
}

impl SimulationConfig {
    /// Config with every force disabled; handy for testing one force at a time.
    pub fn without_forces() -> Self {
        Self {
            link: None,
            charge: None,
            center: None,
            collision: None,
            ..Self::default()
        }
    }

    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = Some(link);
        self
    }

    pub fn with_charge(mut self, charge: ChargeConfig) -> Self {
        self.charge = Some(charge);
        self
    }

    pub fn with_center(mut self, center: CenterConfig) -> Self {
        self.center = Some(center);
        self
    }

    pub fn with_collision(mut self, collision: CollisionConfig) -> Self {
        self.collision = Some(collision);
        self
    }

    pub fn validate(&self) -> Result<()> {
        unit_interval("alpha_decay", self.alpha_decay)?;
        unit_interval("alpha_min", self.alpha_min)?;
        unit_interval("alpha_target", self.alpha_target)?;
        unit_interval("velocity_decay", self.velocity_decay)?;
        unit_interval("drag_alpha_target", self.drag_alpha_target)?;

        if let Some(link) = &self.link {
            non_negative("link.distance", link.distance)?;
            if let Some(stiffness) = link.stiffness {
                non_negative("link.stiffness", stiffness)?;
            }
            at_least_one("link.iterations", link.iterations)?;
        }

        if let Some(charge) = &self.charge {
            finite("charge.strength", charge.strength)?;
            non_negative("charge.theta", charge.theta)?;
            non_negative("charge.distance_min", charge.distance_min)?;
            if let Some(distance_max) = charge.distance_max {
                non_negative("charge.distance_max", distance_max)?;
                if distance_max < charge.distance_min {
                    return Err(invalid(
                        "charge.distance_max",
                        distance_max,
                        "must not be below charge.distance_min",
                    ));
                }
            }
        }

        if let Some(center) = &self.center {
            finite("center.x", center.x)?;
            finite("center.y", center.y)?;
            non_negative("center.strength", center.strength)?;
        }

        if let Some(collision) = &self.collision {
            non_negative("collision.radius", collision.radius)?;
            unit_interval("collision.strength", collision.strength)?;
            at_least_one("collision.iterations", collision.iterations)?;
        }

        Ok(())
    }

    /// Cooling parameters for a fresh run at full heat.
    pub(crate) fn cooling(&self) -> Cooling {
        Cooling {
            alpha: 1.0,
            alpha_target: self.alpha_target,
            alpha_decay: self.alpha_decay,
            alpha_min: self.alpha_min,
            velocity_decay: self.velocity_decay,
        }
    }

    pub(crate) fn center_point(&self) -> (f64, f64) {
        self.center
            .map(|center| (center.x, center.y))
            .unwrap_or((0.0, 0.0))
    }
}
