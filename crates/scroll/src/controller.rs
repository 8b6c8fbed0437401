//! Per-tick scroll pursuit and manual hold handling.

use crate::config::ScrollConfig;
use crate::{HoldDirection, ScrollState};

/// Owns the presented and target offsets of the marquee.
#[derive(Debug, Clone)]
pub struct ScrollController {
    config: ScrollConfig,
    current: f32,
    target: f32,
    hold: Option<HoldDirection>,
    hold_accel: f32,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::with_config(ScrollConfig::default())
    }
}

impl ScrollController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ScrollConfig) -> Self {
        Self {
            config,
            current: 0.0,
            target: 0.0,
            hold: None,
            hold_accel: 0.0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Offset currently presented.
    pub fn offset(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_holding(&self) -> bool {
        self.hold.is_some()
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            current_offset: self.current,
            target_offset: self.target,
            manual_direction: self.hold.map(|d| d.sign() as i8).unwrap_or(0),
            hold_accel: self.hold_accel,
        }
    }

    /// Back to the origin for a newly loaded phrase.
    ///
    /// A held key stays held: the hold continues from the origin with its
    /// acceleration restarted.
    pub fn reset(&mut self) {
        self.current = 0.0;
        self.target = 0.0;
        self.hold_accel = 0.0;
        if let Some(direction) = self.hold {
            tracing::debug!(?direction, "scroll_hold_carried_over_reset");
        }
    }

    /// Aim at the anchor so it sits in the middle of the viewport.
    ///
    /// Ignored while a manual hold is active. Returns whether the target
    /// changed.
    pub fn retarget(&mut self, viewport_width: f32, anchor_center: f32) -> bool {
        if self.hold.is_some() {
            return false;
        }

        let target = viewport_width / 2.0 - anchor_center;
        if (target - self.target).abs() < f32::EPSILON {
            return false;
        }

        tracing::trace!(from = self.target, to = target, "scroll_retarget");
        self.target = target;
        true
    }

    /// Start (or redirect) a manual hold.
    pub fn begin_hold(&mut self, direction: HoldDirection) {
        if self.hold == Some(direction) {
            return;
        }

        tracing::debug!(?direction, offset = self.current, "scroll_hold_start");
        self.hold = Some(direction);
        self.hold_accel = 0.0;
        self.target = self.current;
    }

    /// Hand control back to automatic pursuit without moving the view.
    pub fn end_hold(&mut self) {
        if self.hold.take().is_none() {
            return;
        }

        tracing::debug!(offset = self.current, "scroll_hold_end");
        self.hold_accel = 0.0;
        self.target = self.current;
    }

    /// Advance one presentation frame and return the offset to present.
    pub fn tick(&mut self) -> f32 {
        match self.hold {
            Some(direction) => self.tick_manual(direction),
            None => self.tick_pursuit(),
        }
        self.current
    }

    fn tick_manual(&mut self, direction: HoldDirection) {
        self.current += direction.sign() * (self.config.base_speed + self.hold_accel);
        self.hold_accel =
            (self.hold_accel + self.config.hold_accel_step).min(self.config.hold_accel_max);
        self.target = self.current;
    }

    fn tick_pursuit(&mut self) {
        let delta = self.target - self.current;
        let distance = delta.abs();

        if distance <= self.config.snap_epsilon {
            self.current = self.target;
            return;
        }

        let step = self.config.speed_for_distance(distance).min(distance);
        self.current += step.copysign(delta);
    }
}
