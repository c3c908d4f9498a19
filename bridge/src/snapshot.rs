use std::time::Instant;

use crate::host::{Handle, ModelHash};

/// Whether the player was in a vehicle, and which.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Occupancy {
    OnFoot,
    /// `name` is resolved on entry so the exit prompt can still refer to it.
    InVehicle {
        handle: Handle,
        model: ModelHash,
        name: String,
    },
}

/// Last observed value of every monitored dimension.
///
/// `None` means "never observed": the next observation only sets the
/// baseline and can never fire a reaction, whatever its value.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub occupancy: Option<Occupancy>,
    pub weather: Option<i32>,
    pub hour: Option<i32>,
    pub zone: Option<String>,
    pub switch_marker: Option<i32>,
    pub health_percent: Option<f32>,
    pub in_mission: Option<bool>,
    pub wanted_level: Option<u32>,
    pub last_commentary: Instant,
}

impl Snapshot {
    pub fn new(started: Instant) -> Self {
        Self {
            occupancy: None,
            weather: None,
            hour: None,
            zone: None,
            switch_marker: None,
            health_percent: None,
            in_mission: None,
            wanted_level: None,
            last_commentary: started,
        }
    }
}
