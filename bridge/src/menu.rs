/// In-game toggle menu driven by key-release edges.
///
/// The menu key opens and closes it; while open, Up/Down move the selection
/// (wrapping) and Enter flips the selected category.  All four keys are polled
/// exactly once per tick, open or not, so their edge history never goes stale
/// while the menu is closed.
use crate::channel::Notify;
use crate::keyboard::{KeyStates, VK_DOWN, VK_RETURN, VK_UP};
use crate::settings::{Category, Settings};

pub const ITEM_COUNT: usize = Category::ALL.len();

/// Release edges seen this tick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MenuInput {
    pub toggle: bool,
    pub up: bool,
    pub down: bool,
    pub confirm: bool,
}

impl MenuInput {
    /// Advances the edge history of the menu key and the three navigation keys.
    pub fn poll(keys: &KeyStates, menu_key: u32) -> Self {
        Self {
            toggle: keys.is_key_just_released(menu_key),
            up: keys.is_key_just_released(VK_UP),
            down: keys.is_key_just_released(VK_DOWN),
            confirm: keys.is_key_just_released(VK_RETURN),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Menu {
    open: bool,
    selected: usize,
}

impl Menu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_category(&self) -> Category {
        Category::ALL[self.selected]
    }

    /// Applies one tick of input.  Announcements go out through `notifier`.
    pub fn update(&mut self, input: MenuInput, settings: &mut Settings, notifier: &mut dyn Notify) {
        if input.toggle {
            self.open = !self.open;
            log::debug!("menu: {}", if self.open { "opened" } else { "closed" });
            if self.open {
                notifier.speak("Opening MSAgent reactions menu!");
            }
        }

        if !self.open {
            return;
        }

        if input.up {
            self.selected = (self.selected + ITEM_COUNT - 1) % ITEM_COUNT;
        }
        if input.down {
            self.selected = (self.selected + 1) % ITEM_COUNT;
        }
        if input.confirm {
            let category = self.selected_category();
            let enabled = settings.toggle(category);
            let state = if enabled { "enabled" } else { "disabled" };
            log::info!("menu: {} {state}", category.label());
            notifier.speak(&format!("Setting {state}!"));
        }
    }
}
