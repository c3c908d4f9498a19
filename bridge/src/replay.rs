/// Offline driver: feeds a recorded (or hand-written) trace of host frames
/// through the full tick loop.
///
/// Trace format (TOML), one `[[frame]]` per tick:
///
/// ```toml
/// [[frame]]
/// at_ms = 0
/// keys = ["F9"]          # keys held during this frame
/// weather = 3
/// zone = "AIRP"
/// vehicle = { handle = 5, model = 3078201489, class = 7, name = "ZENTORNO" }
/// ```
///
/// Any `HostSample` field may be given; omitted fields take their defaults.
use std::collections::BTreeSet;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::channel::Notify;
use crate::host::HostSample;
use crate::keyboard::{self, KeyStates};
use crate::overlay::TextOverlay;
use crate::script::{Script, TickOutcome};

#[derive(Debug, Deserialize)]
pub struct Trace {
    #[serde(rename = "frame", default)]
    pub frames: Vec<Frame>,
}

#[derive(Debug, Deserialize)]
pub struct Frame {
    /// Offset from the start of the trace.
    #[serde(default)]
    pub at_ms: u64,
    /// Names of keys held during this frame (see [`keyboard::parse_vk`]).
    #[serde(default)]
    pub keys: Vec<String>,
    #[serde(flatten)]
    pub sample: HostSample,
    #[serde(skip)]
    key_codes: BTreeSet<u32>,
}

impl Frame {
    pub fn key_codes(&self) -> &BTreeSet<u32> {
        &self.key_codes
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: usize,
    pub menu_frames: usize,
    pub prompts: usize,
}

/// Parses and validates a trace: key names must be known and frame times
/// must not go backwards.
pub fn parse(content: &str) -> Result<Trace> {
    let mut trace: Trace = toml::from_str(content).context("Failed to parse trace")?;
    let mut last_ms = 0;
    for (i, frame) in trace.frames.iter_mut().enumerate() {
        if frame.at_ms < last_ms {
            bail!("frame {i}: at_ms {} is earlier than the previous frame ({last_ms})", frame.at_ms);
        }
        last_ms = frame.at_ms;
        for name in &frame.keys {
            match keyboard::parse_vk(name) {
                Some(code) => {
                    frame.key_codes.insert(code);
                }
                None => bail!("frame {i}: unknown key {name:?}"),
            }
        }
    }
    Ok(trace)
}

pub fn load(path: &Path) -> Result<Trace> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid trace file: {}", path.display()))
}

/// Runs every frame through `script`, timing each tick at `started + at_ms`.
///
/// Key state is driven the way the host's keyboard callback would: a key
/// listed in a frame is pressed, a key missing from the next frame is released.
/// `after_tick` sees the script and the overlay after each tick.
pub fn replay<N, F>(
    trace: &Trace,
    script: &mut Script<N>,
    started: Instant,
    realtime: bool,
    mut after_tick: F,
) -> ReplaySummary
where
    N: Notify,
    F: FnMut(&Frame, TickOutcome, &mut Script<N>, &TextOverlay),
{
    let mut overlay = TextOverlay::default();
    let mut summary = ReplaySummary::default();
    let mut held = BTreeSet::new();

    for frame in &trace.frames {
        let at = started + Duration::from_millis(frame.at_ms);
        if realtime {
            std::thread::sleep(at.saturating_duration_since(Instant::now()));
        }

        apply_keys(script.keys(), &held, frame.key_codes());
        held.clone_from(frame.key_codes());

        let outcome = script.tick(&frame.sample, &mut overlay, at);
        summary.frames += 1;
        match outcome {
            TickOutcome::MenuOpen => summary.menu_frames += 1,
            TickOutcome::Diffed(n) => summary.prompts += n,
        }
        after_tick(frame, outcome, script, &overlay);
    }

    log::info!(
        "replay: {} frames, {} with menu open, {} prompts",
        summary.frames,
        summary.menu_frames,
        summary.prompts
    );
    summary
}

fn apply_keys(keys: &KeyStates, previously_held: &BTreeSet<u32>, held: &BTreeSet<u32>) {
    for &code in previously_held.difference(held) {
        keys.observe_raw_key(code, false);
    }
    for &code in held {
        keys.observe_raw_key(code, true);
    }
}
