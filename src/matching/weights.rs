use crate::utils::error::{MarketplaceError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// 預設配分（總和 100）
/// 證照與距離、時薪是硬條件，其他為加分項
pub const DEFAULT_WEIGHTS: Weights = Weights {
    credentials: 35.0,
    distance: 25.0,
    pay_rate: 20.0,
    skills: 5.0,
    shift_type: 5.0,
    urgency: 5.0,
    rating: 5.0,
};

pub const TOTAL_POINTS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub credentials: f64,
    pub distance: f64,
    pub pay_rate: f64,
    pub skills: f64,
    pub shift_type: f64,
    pub urgency: f64,
    pub rating: f64,
}

impl Default for Weights {
    fn default() -> Self {
        DEFAULT_WEIGHTS
    }
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.credentials
            + self.distance
            + self.pay_rate
            + self.skills
            + self.shift_type
            + self.urgency
            + self.rating
    }

    fn entries(&self) -> [(&'static str, f64); 7] {
        [
            ("credentials", self.credentials),
            ("distance", self.distance),
            ("pay_rate", self.pay_rate),
            ("skills", self.skills),
            ("shift_type", self.shift_type),
            ("urgency", self.urgency),
            ("rating", self.rating),
        ]
    }
}

impl Validate for Weights {
    fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(MarketplaceError::InvalidConfigValueError {
                    field: format!("matching.weights.{}", name),
                    value: value.to_string(),
                    reason: "Weight must be a non-negative number".to_string(),
                });
            }
        }

        let sum = self.sum();
        if (sum - TOTAL_POINTS).abs() > 1e-6 {
            return Err(MarketplaceError::ConfigValidationError {
                field: "matching.weights".to_string(),
                message: format!("Weights must add up to {}, got {}", TOTAL_POINTS, sum),
            });
        }
        Ok(())
    }
}
