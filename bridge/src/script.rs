/// The per-frame tick loop.
///
/// [`Script`] owns every piece of mutable state (settings, menu, snapshot,
/// channel) and is driven once per host frame.  The only state shared with
/// another actor is [`KeyStates`], which the host's keyboard callback writes.
///
/// Menu handling and state diffing never run in the same tick: while the
/// menu is open the overlay is drawn and the diff engine is skipped entirely.
use std::sync::Arc;
use std::time::Instant;

use crate::channel::Notify;
use crate::config::Config;
use crate::engine::DiffEngine;
use crate::host::HostQuery;
use crate::keyboard::KeyStates;
use crate::menu::{Menu, MenuInput};
use crate::overlay::{MenuView, Overlay};
use crate::settings::Settings;

pub const GREETING: &str = "GTA 5 MSAgent integration is now active!";

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Menu was open; the overlay was drawn and no state was diffed.
    MenuOpen,
    /// Diff engine ran and sent this many prompts.
    Diffed(usize),
}

pub struct Script<N: Notify> {
    keys: Arc<KeyStates>,
    settings: Settings,
    menu: Menu,
    engine: DiffEngine,
    notifier: N,
}

impl<N: Notify> Script<N> {
    pub fn new(config: &Config, keys: Arc<KeyStates>, notifier: N, started: Instant) -> Self {
        let menu_key = config.menu.key_code();
        Self {
            keys,
            settings: Settings::from_config(&config.reactions, menu_key),
            menu: Menu::new(),
            engine: DiffEngine::new(&config.reactions, started),
            notifier,
        }
    }

    /// Clears key state and greets the companion.  Call once before the first tick.
    pub fn start(&mut self) {
        self.keys.reset_all();
        log::info!("script: started, menu key {:#04x}", self.settings.menu_key());
        self.notifier.speak(GREETING);
    }

    pub fn tick(&mut self, host: &dyn HostQuery, overlay: &mut dyn Overlay, now: Instant) -> TickOutcome {
        self.notifier.begin_tick();
        let input = MenuInput::poll(&self.keys, self.settings.menu_key());
        self.menu.update(input, &mut self.settings, &mut self.notifier);

        if self.menu.is_open() {
            overlay.draw(&MenuView::new(&self.menu, &self.settings));
            return TickOutcome::MenuOpen;
        }

        let fired = self
            .engine
            .tick(host, &self.settings, &mut self.notifier, now);
        TickOutcome::Diffed(fired)
    }

    pub fn keys(&self) -> &Arc<KeyStates> {
        &self.keys
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn engine(&self) -> &DiffEngine {
        &self.engine
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }
}
