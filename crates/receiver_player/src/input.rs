//! Per-tick input snapshot

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A player control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    Trigger,
    SlideLock,
    Safety,
    AutoModToggle,
    PullBackSlide,
    SwingOutCylinder,
    CloseCylinder,
    ExtractorRod,
    Hammer,
    Insert,
    EjectDrop,
    Holster,
    /// Number keys 1-10
    Inventory(u8),
    HoldToAim,
    AimToggle,
    Get,
}

impl Button {
    /// Every button, number keys included
    pub fn all() -> Vec<Button> {
        let mut buttons = vec![
            Button::Trigger,
            Button::SlideLock,
            Button::Safety,
            Button::AutoModToggle,
            Button::PullBackSlide,
            Button::SwingOutCylinder,
            Button::CloseCylinder,
            Button::ExtractorRod,
            Button::Hammer,
            Button::Insert,
            Button::EjectDrop,
            Button::Holster,
            Button::HoldToAim,
            Button::AimToggle,
            Button::Get,
        ];
        buttons.extend((1..=10).map(Button::Inventory));
        buttons
    }

    /// Look a button up by its binding name, e.g. `"pull_back_slide"` or
    /// `"inventory_3"`
    pub fn from_name(name: &str) -> Option<Button> {
        let name = name.trim().to_lowercase().replace(['-', ' '], "_");
        if let Some(key) = name.strip_prefix("inventory_") {
            return key
                .parse::<u8>()
                .ok()
                .filter(|key| (1..=10).contains(key))
                .map(Button::Inventory);
        }
        let button = match name.as_str() {
            "trigger" => Button::Trigger,
            "slide_lock" => Button::SlideLock,
            "safety" => Button::Safety,
            "auto_mod_toggle" => Button::AutoModToggle,
            "pull_back_slide" => Button::PullBackSlide,
            "swing_out_cylinder" => Button::SwingOutCylinder,
            "close_cylinder" => Button::CloseCylinder,
            "extractor_rod" => Button::ExtractorRod,
            "hammer" => Button::Hammer,
            "insert" => Button::Insert,
            "eject_drop" => Button::EjectDrop,
            "holster" => Button::Holster,
            "hold_to_aim" => Button::HoldToAim,
            "aim_toggle" => Button::AimToggle,
            "get" => Button::Get,
            _ => return None,
        };
        Some(button)
    }
}

/// Button levels and edges plus mouse motion for one tick
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    held: HashSet<Button>,
    pressed: HashSet<Button>,
    released: HashSet<Button>,
    /// Mouse motion in axis units
    pub mouse_x: f32,
    pub mouse_y: f32,
    /// Scroll wheel, in cylinder chambers; fractions toward zero are dropped
    pub scroll: f32,
}

impl InputFrame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive edges from the buttons held last tick and this tick
    pub fn from_levels(previous: &HashSet<Button>, current: &HashSet<Button>) -> Self {
        Self {
            held: current.clone(),
            pressed: current.difference(previous).copied().collect(),
            released: previous.difference(current).copied().collect(),
            ..Default::default()
        }
    }

    /// Button went down this tick (and is held)
    pub fn with_pressed(mut self, button: Button) -> Self {
        self.held.insert(button);
        self.pressed.insert(button);
        self
    }

    /// Button is held without a new edge
    pub fn with_held(mut self, button: Button) -> Self {
        self.held.insert(button);
        self
    }

    pub fn with_released(mut self, button: Button) -> Self {
        self.held.remove(&button);
        self.released.insert(button);
        self
    }

    pub fn with_mouse(mut self, x: f32, y: f32) -> Self {
        self.mouse_x = x;
        self.mouse_y = y;
        self
    }

    pub fn with_scroll(mut self, scroll: f32) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    pub fn released(&self, button: Button) -> bool {
        self.released.contains(&button)
    }

    /// Number key pressed this tick, 1-10
    pub fn inventory_key(&self) -> Option<usize> {
        (1..=10u8)
            .find(|key| self.pressed(Button::Inventory(*key)))
            .map(usize::from)
    }
}
