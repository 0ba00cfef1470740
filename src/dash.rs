use crate::math::Float;
use crate::MovementConfig;

/// The dash charge pool.
///
/// Charges are spent one per dash, and reload one at a time while below the maximum. Between
/// two dashes there is always at least an intermission, even when charges remain.
#[derive(Debug, Clone, PartialEq)]
pub struct DashState {
    charges_available: u32,
    max_charges: u32,
    intermission_timer: Float,
    reload_timer: Float,
}

impl DashState {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            charges_available: config.max_dash_charges,
            max_charges: config.max_dash_charges,
            intermission_timer: 0.0,
            reload_timer: 0.0,
        }
    }

    pub fn charges_available(&self) -> u32 {
        self.charges_available
    }

    pub fn intermission_timer(&self) -> Float {
        self.intermission_timer
    }

    pub fn reload_timer(&self) -> Float {
        self.reload_timer
    }

    pub fn can_dash(&self) -> bool {
        self.intermission_timer <= 0.0 && 0 < self.charges_available
    }

    /// Spend a charge and start the intermission. Returns `false`, without changing anything, if
    /// a dash is not possible right now.
    pub fn try_consume(&mut self, config: &MovementConfig) -> bool {
        if !self.can_dash() {
            return false;
        }
        self.charges_available -= 1;
        self.intermission_timer = config.dash_intermission_time;
        true
    }

    pub fn tick(&mut self, frame_duration: Float, config: &MovementConfig) {
        if self.charges_available < self.max_charges {
            self.reload_timer += frame_duration;
            if config.dash_reload_time <= self.reload_timer {
                self.charges_available += 1;
                self.reload_timer = 0.0;
            }
        } else {
            self.reload_timer = 0.0;
        }
        if 0.0 < self.intermission_timer {
            self.intermission_timer -= frame_duration;
        }
    }
}
