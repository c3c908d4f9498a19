/// Per-tick state diffing.
///
/// Every tick each enabled check pulls fresh values from the host, compares
/// them with the [`Snapshot`], sends a prompt when its predicate holds, and
/// then records the new value.  Checks are independent: none exits early and
/// none reads another's fields.  The snapshot is updated even when the
/// channel drops the prompt, so a transition is never reported twice.
///
/// Check order within a tick:
///   1. Vehicle occupancy        (Vehicle)
///   2. Weather, hour, zone      (Environment)
///   3. Character switch, health (Character)
///   4. Mission flag             (Mission)
///   5. Wanted level             (General)
///   6. Periodic commentary      (Commentary)
use std::time::{Duration, Instant};

use crate::channel::Notify;
use crate::config::ReactionsConfig;
use crate::host::{HostQuery, ModelHash};
use crate::lookup::{self, UNKNOWN_VEHICLE};
use crate::settings::{Category, Settings};
use crate::snapshot::{Occupancy, Snapshot};

pub struct DiffEngine {
    snapshot: Snapshot,
    commentary_interval: Duration,
    low_health_percent: f32,
}

impl DiffEngine {
    pub fn new(reactions: &ReactionsConfig, started: Instant) -> Self {
        Self {
            snapshot: Snapshot::new(started),
            commentary_interval: reactions.effective_commentary_interval(),
            low_health_percent: reactions.low_health_percent,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Runs every enabled check once. Returns how many prompts were sent.
    pub fn tick(
        &mut self,
        host: &dyn HostQuery,
        settings: &Settings,
        notifier: &mut dyn Notify,
        now: Instant,
    ) -> usize {
        let mut fired = 0;

        if settings.is_enabled(Category::Vehicle) {
            fired += self.check_vehicle(host, notifier);
        }
        if settings.is_enabled(Category::Environment) {
            fired += self.check_weather(host, notifier);
            fired += self.check_hour(host, notifier);
            fired += self.check_zone(host, notifier);
        }
        if settings.is_enabled(Category::Character) {
            fired += self.check_switch(host, notifier);
            fired += self.check_health(host, notifier);
        }
        if settings.is_enabled(Category::Mission) {
            fired += self.check_mission(host, notifier);
        }
        if settings.is_enabled(Category::General) {
            fired += self.check_wanted(host, notifier);
        }
        if settings.is_enabled(Category::Commentary) {
            fired += self.check_commentary(notifier, now);
        }

        fired
    }

    fn check_vehicle(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let ped = host.player_ped();
        let current = host
            .vehicle_of(ped)
            .map(|handle| (handle, host.vehicle_model(handle)));

        let (next, prompt) = match (self.snapshot.occupancy.take(), current) {
            (Some(Occupancy::OnFoot), Some((handle, model))) => {
                let name = vehicle_name(host, model);
                let class = host.vehicle_class(handle);
                let prompt = format!(
                    "I just got into a {name} ({}). It's worth about ${}. React to this!",
                    lookup::vehicle_class_name(class),
                    lookup::vehicle_value(class),
                );
                (Occupancy::InVehicle { handle, model, name }, Some(prompt))
            }
            (Some(Occupancy::InVehicle { name, .. }), None) => {
                let prompt = format!("I just got out of the {name}. Say something about it.");
                (Occupancy::OnFoot, Some(prompt))
            }
            (Some(Occupancy::InVehicle { model: prev_model, name, .. }), Some((handle, model))) => {
                let name = if prev_model == model {
                    name
                } else {
                    vehicle_name(host, model)
                };
                (Occupancy::InVehicle { handle, model, name }, None)
            }
            (None, Some((handle, model))) => {
                let name = vehicle_name(host, model);
                (Occupancy::InVehicle { handle, model, name }, None)
            }
            (_, None) => (Occupancy::OnFoot, None),
        };

        let fired = emit(notifier, prompt);
        self.snapshot.occupancy = Some(next);
        fired
    }

    fn check_weather(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let current = host.weather();
        let prompt = match self.snapshot.weather {
            Some(prev) if prev != current => Some(format!(
                "The weather just changed to {}. Comment on it!",
                lookup::weather_name(current)
            )),
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.weather = Some(current);
        fired
    }

    fn check_hour(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let (hour, _minute) = host.time_of_day();
        if !(0..24).contains(&hour) {
            return 0;
        }
        let prompt = match self.snapshot.hour {
            Some(prev) if prev != hour => Some(format!(
                "It's now {hour}:00 in the game. {} Say something about the time of day.",
                time_of_day_phrase(hour)
            )),
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.hour = Some(hour);
        fired
    }

    fn check_zone(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let ped = host.player_ped();
        let position = host.position(ped);
        let Some(current) = host.zone_at(position).filter(|z| !z.is_empty()) else {
            return 0;
        };
        let prompt = match &self.snapshot.zone {
            Some(prev) if *prev != current => Some(format!(
                "I'm now in {}. Tell me something about this area!",
                lookup::zone_name(&current)
            )),
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.zone = Some(current);
        fired
    }

    fn check_switch(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let current = host.switch_marker();
        let prompt = match self.snapshot.switch_marker {
            Some(prev) if prev != current => Some(
                "The player just switched to a different character. React to the character switch!"
                    .to_string(),
            ),
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.switch_marker = Some(current);
        fired
    }

    fn check_health(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let ped = host.player_ped();
        let health = host.health(ped);
        let max_health = host.max_health(ped);
        if !health.is_finite() || !max_health.is_finite() || max_health <= 0.0 {
            return 0;
        }
        let percent = health / max_health * 100.0;
        let low = self.low_health_percent;
        let prompt = match self.snapshot.health_percent {
            Some(prev) if percent < low && prev >= low => {
                Some("The player's health is really low! Say something concerned!".to_string())
            }
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.health_percent = Some(percent);
        fired
    }

    fn check_mission(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let current = host.mission_active();
        let prompt = match (self.snapshot.in_mission, current) {
            (Some(false), true) => Some("A mission just started! Get excited!"),
            (Some(true), false) => Some("The mission ended. Comment on how it went!"),
            _ => None,
        };
        let fired = emit(notifier, prompt.map(str::to_string));
        self.snapshot.in_mission = Some(current);
        fired
    }

    fn check_wanted(&mut self, host: &dyn HostQuery, notifier: &mut dyn Notify) -> usize {
        let player = host.player();
        let current = host.wanted_level(player);
        let prompt = match self.snapshot.wanted_level {
            Some(prev) if current > prev => Some(format!(
                "The player's wanted level just increased to {current} stars! React to the police chase!"
            )),
            Some(prev) if current == 0 && prev > 0 => {
                Some("The wanted level is gone! The player escaped the cops!".to_string())
            }
            // Partial decreases are not worth a comment.
            _ => None,
        };
        let fired = emit(notifier, prompt);
        self.snapshot.wanted_level = Some(current);
        fired
    }

    fn check_commentary(&mut self, notifier: &mut dyn Notify, now: Instant) -> usize {
        let elapsed = now.saturating_duration_since(self.snapshot.last_commentary);
        if elapsed < self.commentary_interval {
            return 0;
        }
        let fired = emit(
            notifier,
            Some(
                "Make a random observation or comment about what's happening in GTA V right now."
                    .to_string(),
            ),
        );
        self.snapshot.last_commentary = now;
        fired
    }
}

fn emit(notifier: &mut dyn Notify, prompt: Option<String>) -> usize {
    match prompt {
        Some(prompt) => {
            log::info!("reaction: {prompt}");
            notifier.chat(&prompt);
            1
        }
        None => 0,
    }
}

fn vehicle_name(host: &dyn HostQuery, model: ModelHash) -> String {
    host.model_display_name(model)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_VEHICLE.to_string())
}

/// Coarse bucket for an hour in `0..24`.
pub fn time_of_day_phrase(hour: i32) -> &'static str {
    match hour {
        6..=11 => "It's morning.",
        12..=17 => "It's afternoon.",
        18..=21 => "It's evening.",
        _ => "It's night time.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Transcript;
    use crate::host::{HostSample, SampleVehicle};
    use crate::keyboard::VK_F9;

    const FRAME: Duration = Duration::from_millis(16);

    struct Harness {
        engine: DiffEngine,
        settings: Settings,
        transcript: Transcript,
        started: Instant,
        frame: u32,
    }

    impl Harness {
        fn new() -> Self {
            let started = Instant::now();
            Self {
                engine: DiffEngine::new(&ReactionsConfig::default(), started),
                settings: Settings::new(VK_F9),
                transcript: Transcript::new(),
                started,
                frame: 0,
            }
        }

        /// Ticks once per sample and returns the prompts sent on each tick.
        fn run(&mut self, samples: &[HostSample]) -> Vec<Vec<String>> {
            samples
                .iter()
                .map(|sample| {
                    self.frame += 1;
                    let now = self.started + FRAME * self.frame;
                    self.engine
                        .tick(sample, &self.settings, &mut self.transcript, now);
                    self.transcript.drain()
                })
                .collect()
        }
    }

    fn zentorno(handle: i32) -> SampleVehicle {
        SampleVehicle {
            handle,
            model: 0xB779_A091,
            class: 7,
            name: Some("ZENTORNO".to_string()),
        }
    }

    fn with<F: FnOnce(&mut HostSample)>(f: F) -> HostSample {
        let mut s = HostSample::default();
        f(&mut s);
        s
    }

    fn fired_count(ticks: &[Vec<String>]) -> Vec<usize> {
        ticks.iter().map(Vec::len).collect()
    }

    // ── first observation ─────────────────────────────────────────────────────

    #[test]
    fn first_tick_only_sets_baselines() {
        let mut h = Harness::new();
        let first = with(|s| {
            s.vehicle = Some(zentorno(5));
            s.weather = 7;
            s.hour = 3;
            s.zone = Some("AIRP".to_string());
            s.switch_marker = 9;
            s.health = 10.0;
            s.mission = true;
            s.wanted = 4;
        });
        let ticks = h.run(&[first]);
        assert!(ticks[0].is_empty(), "unexpected: {:?}", ticks[0]);

        let snap = h.engine.snapshot();
        assert_eq!(snap.weather, Some(7));
        assert_eq!(snap.hour, Some(3));
        assert_eq!(snap.zone.as_deref(), Some("AIRP"));
        assert_eq!(snap.switch_marker, Some(9));
        assert_eq!(snap.in_mission, Some(true));
        assert_eq!(snap.wanted_level, Some(4));
        assert_eq!(snap.health_percent, Some(5.0));
        assert!(matches!(snap.occupancy, Some(Occupancy::InVehicle { handle: 5, .. })));
    }

    // ── vehicle ───────────────────────────────────────────────────────────────

    #[test]
    fn vehicle_enter_and_exit_fire_once_each() {
        let mut h = Harness::new();
        let on_foot = HostSample::default();
        let driving = with(|s| s.vehicle = Some(zentorno(5)));
        let ticks = h.run(&[on_foot.clone(), driving.clone(), driving, on_foot]);

        assert_eq!(fired_count(&ticks), [0, 1, 0, 1]);
        assert_eq!(
            ticks[1][0],
            "CHAT:I just got into a ZENTORNO (Super). It's worth about $500000. React to this!"
        );
        assert_eq!(
            ticks[3][0],
            "CHAT:I just got out of the ZENTORNO. Say something about it."
        );
    }

    #[test]
    fn unnamed_vehicle_uses_fallback_name() {
        let mut h = Harness::new();
        let driving = with(|s| {
            s.vehicle = Some(SampleVehicle {
                handle: 3,
                model: 1,
                class: 99,
                name: None,
            })
        });
        let ticks = h.run(&[HostSample::default(), driving]);
        assert_eq!(
            ticks[1][0],
            "CHAT:I just got into a Unknown Vehicle (Unknown). It's worth about $25000. React to this!"
        );
    }

    #[test]
    fn swapping_vehicles_without_getting_out_is_silent() {
        let mut h = Harness::new();
        let a = with(|s| s.vehicle = Some(zentorno(5)));
        let b = with(|s| {
            s.vehicle = Some(SampleVehicle {
                handle: 6,
                model: 2,
                class: 1,
                name: Some("ASEA".to_string()),
            })
        });
        let ticks = h.run(&[HostSample::default(), a, b, HostSample::default()]);
        assert_eq!(fired_count(&ticks), [0, 1, 0, 1]);
        assert!(ticks[3][0].contains("ASEA"));
    }

    // ── environment ───────────────────────────────────────────────────────────

    #[test]
    fn weather_fires_only_on_real_change() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.weather = 3),
            with(|s| s.weather = 3),
            with(|s| s.weather = 6),
        ]);
        assert_eq!(fired_count(&ticks), [0, 0, 1]);
        assert_eq!(
            ticks[2][0],
            "CHAT:The weather just changed to Raining. Comment on it!"
        );
    }

    #[test]
    fn hour_change_names_the_time_of_day() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.hour = 5),
            with(|s| s.hour = 6),
            with(|s| s.hour = 6),
            with(|s| s.hour = 22),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1, 0, 1]);
        assert_eq!(
            ticks[1][0],
            "CHAT:It's now 6:00 in the game. It's morning. Say something about the time of day."
        );
        assert!(ticks[3][0].contains("It's night time."));
    }

    #[test]
    fn out_of_range_hour_is_ignored() {
        let mut h = Harness::new();
        let ticks = h.run(&[with(|s| s.hour = -1), with(|s| s.hour = 8)]);
        assert_eq!(fired_count(&ticks), [0, 0]);
        assert_eq!(h.engine.snapshot().hour, Some(8));
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(time_of_day_phrase(0), "It's night time.");
        assert_eq!(time_of_day_phrase(5), "It's night time.");
        assert_eq!(time_of_day_phrase(6), "It's morning.");
        assert_eq!(time_of_day_phrase(11), "It's morning.");
        assert_eq!(time_of_day_phrase(12), "It's afternoon.");
        assert_eq!(time_of_day_phrase(17), "It's afternoon.");
        assert_eq!(time_of_day_phrase(18), "It's evening.");
        assert_eq!(time_of_day_phrase(21), "It's evening.");
        assert_eq!(time_of_day_phrase(22), "It's night time.");
    }

    #[test]
    fn zone_change_uses_friendly_name_or_raw_code() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.zone = Some("DOWNT".to_string())),
            with(|s| s.zone = Some("AIRP".to_string())),
            with(|s| s.zone = Some("SECRET".to_string())),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1, 1]);
        assert_eq!(
            ticks[1][0],
            "CHAT:I'm now in Los Santos Airport. Tell me something about this area!"
        );
        assert!(ticks[2][0].contains("I'm now in SECRET."));
    }

    #[test]
    fn empty_zone_is_not_an_observation() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.zone = None),
            with(|s| s.zone = Some(String::new())),
            with(|s| s.zone = Some("DOWNT".to_string())),
            with(|s| s.zone = Some(String::new())),
            with(|s| s.zone = Some("DOWNT".to_string())),
        ]);
        assert_eq!(fired_count(&ticks), [0, 0, 0, 0, 0]);
        assert_eq!(h.engine.snapshot().zone.as_deref(), Some("DOWNT"));
    }

    // ── character ─────────────────────────────────────────────────────────────

    #[test]
    fn switch_marker_change_fires() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.switch_marker = -1),
            with(|s| s.switch_marker = -1),
            with(|s| s.switch_marker = 2),
        ]);
        assert_eq!(fired_count(&ticks), [0, 0, 1]);
        assert!(ticks[2][0].starts_with("CHAT:The player just switched"));
    }

    #[test]
    fn low_health_fires_on_each_downward_crossing() {
        let mut h = Harness::new();
        let samples: Vec<_> = [50.0, 40.0, 25.0, 20.0, 35.0, 15.0]
            .into_iter()
            .map(|hp| {
                with(|s| {
                    s.health = hp;
                    s.max_health = 100.0;
                })
            })
            .collect();
        let ticks = h.run(&samples);
        assert_eq!(fired_count(&ticks), [0, 0, 1, 0, 0, 1]);
        assert_eq!(
            ticks[2][0],
            "CHAT:The player's health is really low! Say something concerned!"
        );
    }

    #[test]
    fn health_is_normalised_by_max_health() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| {
                s.health = 300.0;
                s.max_health = 400.0;
            }),
            with(|s| {
                s.health = 100.0;
                s.max_health = 400.0;
            }),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1]);
        assert_eq!(h.engine.snapshot().health_percent, Some(25.0));
    }

    #[test]
    fn zero_max_health_is_skipped() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.health = 150.0),
            with(|s| s.max_health = 0.0),
        ]);
        assert_eq!(fired_count(&ticks), [0, 0]);
        assert_eq!(h.engine.snapshot().health_percent, Some(75.0));
    }

    // ── mission ───────────────────────────────────────────────────────────────

    #[test]
    fn mission_start_and_end() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.mission = false),
            with(|s| s.mission = true),
            with(|s| s.mission = true),
            with(|s| s.mission = false),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1, 0, 1]);
        assert_eq!(ticks[1][0], "CHAT:A mission just started! Get excited!");
        assert_eq!(ticks[3][0], "CHAT:The mission ended. Comment on how it went!");
    }

    // ── wanted level ──────────────────────────────────────────────────────────

    #[test]
    fn wanted_level_escalation_and_escape() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.wanted = 0),
            with(|s| s.wanted = 1),
            with(|s| s.wanted = 2),
            with(|s| s.wanted = 0),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1, 1, 1]);
        assert_eq!(
            ticks[1][0],
            "CHAT:The player's wanted level just increased to 1 stars! React to the police chase!"
        );
        assert!(ticks[2][0].contains("increased to 2 stars"));
        assert_eq!(
            ticks[3][0],
            "CHAT:The wanted level is gone! The player escaped the cops!"
        );
    }

    #[test]
    fn partial_wanted_decrease_is_silent_but_recorded() {
        let mut h = Harness::new();
        let ticks = h.run(&[
            with(|s| s.wanted = 0),
            with(|s| s.wanted = 3),
            with(|s| s.wanted = 1),
            with(|s| s.wanted = 2),
        ]);
        assert_eq!(fired_count(&ticks), [0, 1, 0, 1]);
        assert_eq!(h.engine.snapshot().wanted_level, Some(2));
    }

    // ── commentary ────────────────────────────────────────────────────────────

    #[test]
    fn commentary_fires_after_interval_and_resets() {
        let started = Instant::now();
        let mut engine = DiffEngine::new(&ReactionsConfig::default(), started);
        let settings = Settings::new(VK_F9);
        let mut t = Transcript::new();
        let sample = HostSample::default();

        engine.tick(&sample, &settings, &mut t, started + Duration::from_secs(299));
        assert!(t.drain().is_empty());

        engine.tick(&sample, &settings, &mut t, started + Duration::from_secs(300));
        assert_eq!(
            t.drain(),
            ["CHAT:Make a random observation or comment about what's happening in GTA V right now."]
        );

        engine.tick(&sample, &settings, &mut t, started + Duration::from_secs(301));
        assert!(t.drain().is_empty());

        engine.tick(&sample, &settings, &mut t, started + Duration::from_secs(600));
        assert_eq!(t.drain().len(), 1);
    }

    // ── gating ────────────────────────────────────────────────────────────────

    #[test]
    fn disabled_category_neither_fires_nor_observes() {
        let mut h = Harness::new();
        h.settings.toggle(Category::Environment);
        h.run(&[with(|s| s.weather = 3), with(|s| s.weather = 6)]);
        assert_eq!(h.engine.snapshot().weather, None);

        h.settings.toggle(Category::Environment);
        let ticks = h.run(&[with(|s| s.weather = 6), with(|s| s.weather = 2)]);
        assert_eq!(fired_count(&ticks), [0, 1]);
    }

    #[test]
    fn checks_are_independent_within_a_tick() {
        let mut h = Harness::new();
        let before = HostSample::default();
        let after = with(|s| {
            s.vehicle = Some(zentorno(5));
            s.weather = 6;
            s.hour = 19;
            s.zone = Some("AIRP".to_string());
            s.switch_marker = 1;
            s.health = 20.0;
            s.mission = true;
            s.wanted = 2;
        });
        let ticks = h.run(&[before, after]);
        assert_eq!(ticks[1].len(), 8);
        assert!(ticks[1][0].contains("got into"));
        assert!(ticks[1][7].contains("wanted level"));
    }

    // ── dropped messages ──────────────────────────────────────────────────────

    /// A channel that loses everything, like a companion that is not running.
    struct Blackhole {
        attempts: usize,
    }

    impl Notify for Blackhole {
        fn send(&mut self, _command: &crate::channel::Command<'_>) {
            self.attempts += 1;
        }
    }

    #[test]
    fn dropped_prompt_still_advances_snapshot() {
        let started = Instant::now();
        let mut engine = DiffEngine::new(&ReactionsConfig::default(), started);
        let settings = Settings::new(VK_F9);
        let mut lost = Blackhole { attempts: 0 };

        engine.tick(&with(|s| s.weather = 3), &settings, &mut lost, started + FRAME);
        engine.tick(&with(|s| s.weather = 6), &settings, &mut lost, started + FRAME * 2);
        assert_eq!(lost.attempts, 1);
        assert_eq!(engine.snapshot().weather, Some(6));

        engine.tick(&with(|s| s.weather = 6), &settings, &mut lost, started + FRAME * 3);
        assert_eq!(lost.attempts, 1);

        let mut transcript = Transcript::new();
        engine.tick(&with(|s| s.weather = 6), &settings, &mut transcript, started + FRAME * 4);
        assert!(transcript.drain().is_empty());
        assert_eq!(engine.snapshot().weather, Some(6));
    }

    #[test]
    fn absent_companion_does_not_cause_repeat_prompts() {
        use crate::channel::PipeChannel;
        use crate::config::ChannelConfig;

        let dir = tempfile::tempdir().unwrap();
        let config = ChannelConfig {
            endpoint: dir.path().join("absent.sock").to_string_lossy().into_owned(),
            ..ChannelConfig::default()
        };
        let mut pipe = PipeChannel::new(&config).unwrap();

        let mut h = Harness::new();
        for (i, weather) in [3, 6, 6].into_iter().enumerate() {
            pipe.begin_tick();
            let now = h.started + FRAME * (i as u32 + 1);
            h.engine
                .tick(&with(|s| s.weather = weather), &h.settings, &mut pipe, now);
        }
        assert_eq!(h.engine.snapshot().weather, Some(6));

        let ticks = h.run(&[with(|s| s.weather = 6), with(|s| s.weather = 6)]);
        assert_eq!(fired_count(&ticks), [0, 0]);
    }
}
