//! Ordered processing pipelines
//!
//! A pipeline is the list of transforms to run against one surface, in the
//! order given. Every step is validated before the first one runs, so a
//! typo in the last step never leaves a half-processed surface behind.
//!
//! Steps can be written as text (`buffer`, `rollcoin:5:trim`,
//! `laplacian:10`, `offset:-0.3`) or loaded from JSON:
//!
//! ```json
//! {"steps": [
//!   {"op": "buffer"},
//!   {"op": "rolling_coin", "radius": 5, "trim": true},
//!   {"op": "laplacian", "iterations": 10}
//! ]}
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use bathysmooth_core::raster::DepthGrid;
use bathysmooth_core::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::morphology::{rolling_coin, shoal_buffer, StructuringElement};
use crate::smoothing::{laplacian_smooth, validate_iterations};
use crate::surface::{validate_offset, vertical_offset};

/// One transform with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    /// 3x3 shoal buffering
    Buffer,
    /// Rolling-coin smoothing with a coin of `radius`, optionally trimmed
    RollingCoin {
        radius: usize,
        #[serde(default)]
        trim: bool,
    },
    /// Laplacian smoothing for `iterations` rounds
    Laplacian { iterations: usize },
    /// Vertical offset by `value`
    Offset { value: f32 },
}

impl Step {
    /// Short human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Step::Buffer => "shoal buffering",
            Step::RollingCoin { .. } => "rolling coin",
            Step::Laplacian { .. } => "laplacian smoothing",
            Step::Offset { .. } => "vertical offset",
        }
    }

    /// Check the step's parameters without touching any data
    pub fn validate(&self) -> Result<()> {
        match *self {
            Step::Buffer => Ok(()),
            Step::RollingCoin { radius, trim } => StructuringElement::validate_params(radius, trim),
            Step::Laplacian { iterations } => validate_iterations(iterations),
            Step::Offset { value } => validate_offset(value),
        }
    }

    /// Run the step against `grid`
    pub fn apply(&self, grid: &mut DepthGrid) -> Result<()> {
        match *self {
            Step::Buffer => shoal_buffer(grid),
            Step::RollingCoin { radius, trim } => {
                let coin = StructuringElement::build(radius, trim)?;
                debug!(
                    radius = coin.radius(),
                    cells = coin.active_count(),
                    "coin built"
                );
                rolling_coin(grid, &coin)
            }
            Step::Laplacian { iterations } => laplacian_smooth(grid, iterations),
            Step::Offset { value } => vertical_offset(grid, value),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Buffer => write!(f, "buffer"),
            Step::RollingCoin { radius, trim } => {
                write!(f, "rollcoin:{}:{}", radius, if *trim { "trim" } else { "notrim" })
            }
            Step::Laplacian { iterations } => write!(f, "laplacian:{}", iterations),
            Step::Offset { value } => write!(f, "offset:{}", value),
        }
    }
}

impl FromStr for Step {
    type Err = Error;

    /// Parse `buffer`, `rollcoin:R[:trim|notrim]`, `laplacian:N` or
    /// `offset:V`. Only the syntax is checked here; see [`Step::validate`].
    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').map(str::trim).collect();
        let op = parts[0].to_lowercase();

        let bad = |msg: &str| Error::Pipeline(format!("invalid step '{}': {}", s.trim(), msg));

        match (op.as_str(), &parts[1..]) {
            ("buffer", []) => Ok(Step::Buffer),
            ("rollcoin" | "rolling-coin" | "rolling_coin", [radius, rest @ ..]) => {
                let radius = radius
                    .parse::<usize>()
                    .map_err(|_| bad("radius must be a whole number"))?;
                let trim = match rest {
                    [] | ["notrim"] => false,
                    ["trim"] => true,
                    _ => return Err(bad("expected 'trim' or 'notrim' after the radius")),
                };
                Ok(Step::RollingCoin { radius, trim })
            }
            ("laplacian", [iterations]) => iterations
                .parse::<usize>()
                .map(|iterations| Step::Laplacian { iterations })
                .map_err(|_| bad("iterations must be a whole number")),
            ("offset", [value]) => value
                .parse::<f32>()
                .map(|value| Step::Offset { value })
                .map_err(|_| bad("offset must be a number")),
            _ => Err(bad(
                "expected buffer, rollcoin:R[:trim|notrim], laplacian:N or offset:V",
            )),
        }
    }
}

/// Ordered list of steps applied to one surface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub steps: Vec<Step>,
}

impl Pipeline {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Append a step
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Parse a pipeline from its JSON form
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Pipeline(format!("invalid pipeline JSON: {e}")))
    }

    /// Serialise the pipeline to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Pipeline(e.to_string()))
    }

    /// Check every step; fails on the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.steps.is_empty() {
            return Err(Error::invalid_parameter(
                "steps",
                "[]",
                "pipeline needs at least one step",
            ));
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| Error::Pipeline(format!("step {} ({}): {}", i + 1, step, e)))?;
        }
        Ok(())
    }

    /// Validate, then run every step against `grid` in order
    pub fn run(&self, grid: &mut DepthGrid) -> Result<()> {
        self.validate()?;

        let total = self.steps.len();
        for (i, step) in self.steps.iter().enumerate() {
            info!("Step {}/{}: {} ({})", i + 1, total, step.name(), step);
            let start = Instant::now();
            step.apply(grid)?;
            debug!(elapsed = ?start.elapsed(), "step finished");
        }
        Ok(())
    }
}

impl FromIterator<Step> for Pipeline {
    fn from_iter<I: IntoIterator<Item = Step>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
