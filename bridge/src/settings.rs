use crate::config::ReactionsConfig;

/// Independently toggleable groups of reactions, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Vehicle,
    Mission,
    Environment,
    Character,
    General,
    Commentary,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Vehicle,
        Category::Mission,
        Category::Environment,
        Category::Character,
        Category::General,
        Category::Commentary,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Vehicle => "Vehicle Reactions",
            Category::Mission => "Mission Reactions",
            Category::Environment => "Environment Reactions",
            Category::Character => "Character Reactions",
            Category::General => "General Reactions",
            Category::Commentary => "Live Commentary",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Which reaction categories are live. Mutated only by the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    enabled: [bool; Category::ALL.len()],
    menu_key: u32,
}

impl Settings {
    /// All categories enabled.
    pub fn new(menu_key: u32) -> Self {
        Self {
            enabled: [true; Category::ALL.len()],
            menu_key,
        }
    }

    pub fn from_config(reactions: &ReactionsConfig, menu_key: u32) -> Self {
        let mut settings = Self::new(menu_key);
        for category in Category::ALL {
            settings.enabled[category.index()] = reactions.is_enabled(category);
        }
        settings
    }

    pub fn is_enabled(&self, category: Category) -> bool {
        self.enabled[category.index()]
    }

    /// Flips `category` and returns its new state.
    pub fn toggle(&mut self, category: Category) -> bool {
        let flag = &mut self.enabled[category.index()];
        *flag = !*flag;
        *flag
    }

    pub fn menu_key(&self) -> u32 {
        self.menu_key
    }

    /// `(label, enabled)` pairs in menu order.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, bool)> + '_ {
        Category::ALL
            .into_iter()
            .map(|c| (c.label(), self.is_enabled(c)))
    }
}
