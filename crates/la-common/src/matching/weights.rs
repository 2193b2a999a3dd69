use serde::{Deserialize, Serialize};
use tracing::warn;

/// Equal-thirds fallback used when no weight is positive.
pub const EQUAL_WEIGHTS: WeightTriple = WeightTriple {
    total_load: 1.0 / 3.0,
    active_load: 1.0 / 3.0,
    skill: 1.0 / 3.0,
};

/// Relative importance of the three ranking signals (p1, p2, p3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTriple {
    /// p1: balance by total assigned leads.
    pub total_load: f64,
    /// p2: balance by currently active leads.
    pub active_load: f64,
    /// p3: skill quality.
    pub skill: f64,
}

impl Default for WeightTriple {
    fn default() -> Self {
        EQUAL_WEIGHTS
    }
}

impl WeightTriple {
    pub fn new(total_load: f64, active_load: f64, skill: f64) -> Self {
        Self {
            total_load,
            active_load,
            skill,
        }
    }

    pub fn sum(&self) -> f64 {
        self.total_load + self.active_load + self.skill
    }

    /// Scale to sum 1.0. Negative and non-finite weights count as zero; if
    /// nothing positive remains the result is [`EQUAL_WEIGHTS`].
    pub fn normalized(&self) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let cleaned = Self::new(
            clean(self.total_load),
            clean(self.active_load),
            clean(self.skill),
        );

        let sum = cleaned.sum();
        if sum <= 0.0 {
            warn!(
                total_load = self.total_load,
                active_load = self.active_load,
                skill = self.skill,
                "no positive ranking weight; using equal thirds"
            );
            return EQUAL_WEIGHTS;
        }

        Self::new(
            cleaned.total_load / sum,
            cleaned.active_load / sum,
            cleaned.skill / sum,
        )
    }
}

impl From<(f64, f64, f64)> for WeightTriple {
    fn from((total_load, active_load, skill): (f64, f64, f64)) -> Self {
        Self::new(total_load, active_load, skill)
    }
}
