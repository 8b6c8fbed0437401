//! Scroll speed schedule settings.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Invalid scroll settings.
#[derive(Debug, Error, PartialEq)]
pub enum ScrollConfigError {
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("near_threshold ({near}) must be below catch_up_threshold ({catch_up})")]
    ThresholdOrder { near: f32, catch_up: f32 },
}

/// Speeds are in pixels per tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub base_speed: f32,
    /// Used when the view lags the target by more than `catch_up_threshold`.
    pub catch_up_speed: f32,
    /// Multiplier on `base_speed` between the two thresholds.
    pub mid_speed_multiplier: f32,
    pub catch_up_threshold: f32,
    pub near_threshold: f32,
    /// Distance at which the view snaps onto the target.
    pub snap_epsilon: f32,
    /// Added to the manual speed every tick a hold persists.
    pub hold_accel_step: f32,
    pub hold_accel_max: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            base_speed: 10.0,
            catch_up_speed: 25.0,
            mid_speed_multiplier: 1.5,
            catch_up_threshold: 100.0,
            near_threshold: 30.0,
            snap_epsilon: 0.5,
            hold_accel_step: 0.5,
            hold_accel_max: 30.0,
        }
    }
}

impl ScrollConfig {
    pub fn validate(&self) -> Result<(), ScrollConfigError> {
        let positive = [
            ("base_speed", self.base_speed),
            ("catch_up_speed", self.catch_up_speed),
            ("mid_speed_multiplier", self.mid_speed_multiplier),
            ("catch_up_threshold", self.catch_up_threshold),
            ("near_threshold", self.near_threshold),
            ("snap_epsilon", self.snap_epsilon),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ScrollConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("hold_accel_step", self.hold_accel_step),
            ("hold_accel_max", self.hold_accel_max),
        ];
        for (field, value) in non_negative {
            if value.is_nan() || value < 0.0 {
                return Err(ScrollConfigError::NotPositive { field, value });
            }
        }

        if self.near_threshold >= self.catch_up_threshold {
            return Err(ScrollConfigError::ThresholdOrder {
                near: self.near_threshold,
                catch_up: self.catch_up_threshold,
            });
        }

        Ok(())
    }

    /// Pursuit speed for a given distance to the target.
    pub fn speed_for_distance(&self, distance: f32) -> f32 {
        if distance > self.catch_up_threshold {
            self.catch_up_speed
        } else if distance > self.near_threshold {
            self.base_speed * self.mid_speed_multiplier
        } else {
            self.base_speed
        }
    }
}
