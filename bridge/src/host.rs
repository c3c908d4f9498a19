/// Read-only view of the running game, queried fresh every tick.
///
/// Results are point-in-time values; all history lives in
/// [`crate::snapshot::Snapshot`].
use std::cell::Cell;

use serde::Deserialize;

/// Entity handle (ped, vehicle) or player index as handed out by the host.
pub type Handle = i32;
/// Opaque model identifier.
pub type ModelHash = u32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub trait HostQuery {
    /// Index of the local player.
    fn player(&self) -> Handle;
    /// Ped the local player controls.
    fn player_ped(&self) -> Handle;
    /// Vehicle `ped` currently occupies, if any.
    fn vehicle_of(&self, ped: Handle) -> Option<Handle>;
    fn vehicle_model(&self, vehicle: Handle) -> ModelHash;
    fn vehicle_class(&self, vehicle: Handle) -> i32;
    /// Display name for a vehicle model, if the host knows one.
    fn model_display_name(&self, model: ModelHash) -> Option<String>;
    fn position(&self, entity: Handle) -> Vector3;
    fn health(&self, entity: Handle) -> f32;
    fn max_health(&self, entity: Handle) -> f32;
    fn weather(&self) -> i32;
    /// `(hour, minute)` of the in-world clock.
    fn time_of_day(&self) -> (i32, i32);
    /// Zone code at `position`; `None` or empty when the host has no answer.
    fn zone_at(&self, position: Vector3) -> Option<String>;
    fn mission_active(&self) -> bool;
    fn wanted_level(&self, player: Handle) -> u32;
    /// Opaque marker that changes whenever the controlled character switches.
    fn switch_marker(&self) -> i32;
}

/// Vehicle occupied in a [`HostSample`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SampleVehicle {
    pub handle: Handle,
    pub model: ModelHash,
    pub class: i32,
    #[serde(default)]
    pub name: Option<String>,
}

/// Every query result for one frame, recorded or scripted.
///
/// Used by the replay harness and as the fake host in tests.  Counts how
/// many queries it has answered so callers can tell whether a tick touched
/// the host at all.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostSample {
    pub player: Handle,
    pub ped: Handle,
    pub vehicle: Option<SampleVehicle>,
    pub position: Vector3,
    pub health: f32,
    pub max_health: f32,
    pub weather: i32,
    pub hour: i32,
    pub minute: i32,
    pub zone: Option<String>,
    pub mission: bool,
    pub wanted: u32,
    pub switch_marker: i32,
    #[serde(skip)]
    queries: Cell<usize>,
}

impl Default for HostSample {
    fn default() -> Self {
        Self {
            player: 0,
            ped: 1,
            vehicle: None,
            position: Vector3::default(),
            health: 200.0,
            max_health: 200.0,
            weather: 1,
            hour: 12,
            minute: 0,
            zone: Some("DOWNT".to_string()),
            mission: false,
            wanted: 0,
            switch_marker: 0,
            queries: Cell::new(0),
        }
    }
}

impl HostSample {
    /// Number of [`HostQuery`] calls answered so far.
    pub fn query_count(&self) -> usize {
        self.queries.get()
    }

    fn hit(&self) {
        self.queries.set(self.queries.get() + 1);
    }

    fn vehicle_by_handle(&self, handle: Handle) -> Option<&SampleVehicle> {
        self.vehicle.as_ref().filter(|v| v.handle == handle)
    }
}

impl HostQuery for HostSample {
    fn player(&self) -> Handle {
        self.hit();
        self.player
    }

    fn player_ped(&self) -> Handle {
        self.hit();
        self.ped
    }

    fn vehicle_of(&self, ped: Handle) -> Option<Handle> {
        self.hit();
        if ped != self.ped {
            return None;
        }
        self.vehicle.as_ref().map(|v| v.handle)
    }

    fn vehicle_model(&self, vehicle: Handle) -> ModelHash {
        self.hit();
        self.vehicle_by_handle(vehicle).map_or(0, |v| v.model)
    }

    fn vehicle_class(&self, vehicle: Handle) -> i32 {
        self.hit();
        self.vehicle_by_handle(vehicle).map_or(-1, |v| v.class)
    }

    fn model_display_name(&self, model: ModelHash) -> Option<String> {
        self.hit();
        self.vehicle
            .as_ref()
            .filter(|v| v.model == model)
            .and_then(|v| v.name.clone())
    }

    fn position(&self, _entity: Handle) -> Vector3 {
        self.hit();
        self.position
    }

    fn health(&self, _entity: Handle) -> f32 {
        self.hit();
        self.health
    }

    fn max_health(&self, _entity: Handle) -> f32 {
        self.hit();
        self.max_health
    }

    fn weather(&self) -> i32 {
        self.hit();
        self.weather
    }

    fn time_of_day(&self) -> (i32, i32) {
        self.hit();
        (self.hour, self.minute)
    }

    fn zone_at(&self, _position: Vector3) -> Option<String> {
        self.hit();
        self.zone.clone()
    }

    fn mission_active(&self) -> bool {
        self.hit();
        self.mission
    }

    fn wanted_level(&self, _player: Handle) -> u32 {
        self.hit();
        self.wanted
    }

    fn switch_marker(&self) -> i32 {
        self.hit();
        self.switch_marker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_sample_uses_defaults() {
        let s: HostSample = toml::from_str("weather = 6\nzone = \"AIRP\"\n").unwrap();
        assert_eq!(s.weather, 6);
        assert_eq!(s.zone.as_deref(), Some("AIRP"));
        assert_eq!(s.health, 200.0);
        assert!(s.vehicle.is_none());
    }

    #[test]
    fn vehicle_queries_follow_the_occupied_vehicle() {
        let s = HostSample {
            vehicle: Some(SampleVehicle {
                handle: 42,
                model: 0xB779_A091,
                class: 7,
                name: Some("ZENTORNO".to_string()),
            }),
            ..HostSample::default()
        };
        let ped = s.player_ped();
        assert_eq!(s.vehicle_of(ped), Some(42));
        assert_eq!(s.vehicle_model(42), 0xB779_A091);
        assert_eq!(s.vehicle_class(42), 7);
        assert_eq!(s.model_display_name(0xB779_A091).as_deref(), Some("ZENTORNO"));
        assert_eq!(s.vehicle_of(ped + 1), None);
        assert_eq!(s.vehicle_model(7), 0);
    }

    #[test]
    fn queries_are_counted() {
        let s = HostSample::default();
        assert_eq!(s.query_count(), 0);
        s.weather();
        s.time_of_day();
        assert_eq!(s.query_count(), 2);
    }
}
