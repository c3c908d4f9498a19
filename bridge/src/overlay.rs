/// What the host should paint while the menu is open.
///
/// Drawing itself belongs to the host; this module only builds the view and
/// defines the sink it is handed to.
use crate::keyboard;
use crate::menu::Menu;
use crate::settings::Settings;

pub const TITLE: &str = "MSAgent-AI Reactions";

#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub label: &'static str,
    pub enabled: bool,
}

impl MenuItem {
    /// `"<label>: ON"` / `"<label>: OFF"`.
    pub fn text(&self) -> String {
        format!("{}: {}", self.label, if self.enabled { "ON" } else { "OFF" })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuView {
    pub title: &'static str,
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub instructions: String,
}

impl MenuView {
    pub fn new(menu: &Menu, settings: &Settings) -> Self {
        Self {
            title: TITLE,
            items: settings
                .entries()
                .map(|(label, enabled)| MenuItem { label, enabled })
                .collect(),
            selected: menu.selected(),
            instructions: format!(
                "Arrow Keys: Navigate | Enter: Toggle | {}: Close",
                keyboard::vk_name(settings.menu_key())
            ),
        }
    }
}

/// Paints the menu. Called once per tick while the menu is open.
pub trait Overlay {
    fn draw(&mut self, view: &MenuView);
}

/// Renders to plain text lines, keeping only the latest frame.
#[derive(Debug, Default)]
pub struct TextOverlay {
    pub lines: Vec<String>,
    pub frames: usize,
}

impl Overlay for TextOverlay {
    fn draw(&mut self, view: &MenuView) {
        self.frames += 1;
        self.lines.clear();
        self.lines.push(view.title.to_string());
        for (i, item) in view.items.iter().enumerate() {
            let marker = if i == view.selected { '>' } else { ' ' };
            self.lines.push(format!("{marker} {}", item.text()));
        }
        self.lines.push(view.instructions.clone());
    }
}
