//! Objects the player can carry

use receiver_core::ObjectId;
use receiver_weapon::{Magazine, Weapon};
use serde::{Deserialize, Serialize};

/// Hand-held flashlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashlight {
    id: ObjectId,
    on: bool,
}

impl Flashlight {
    /// A flashlight that is switched on
    pub fn new(id: ObjectId) -> Self {
        Self { id, on: true }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn turn_on(&mut self) {
        self.on = true;
    }

    pub fn turn_off(&mut self) {
        self.on = false;
    }
}

/// Category of a carried object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Gun,
    Magazine,
    Flashlight,
}

/// An object stowed in an inventory slot.
///
/// The slot owns it; taking it out moves it to the hand, the gun or the
/// world.
#[derive(Debug, Clone)]
pub enum Item {
    Gun(Box<Weapon>),
    Magazine(Magazine),
    Flashlight(Flashlight),
}

impl Item {
    pub fn id(&self) -> ObjectId {
        match self {
            Item::Gun(weapon) => weapon.id(),
            Item::Magazine(magazine) => magazine.id(),
            Item::Flashlight(flashlight) => flashlight.id(),
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Gun(_) => ItemKind::Gun,
            Item::Magazine(_) => ItemKind::Magazine,
            Item::Flashlight(_) => ItemKind::Flashlight,
        }
    }

    pub fn as_magazine(&self) -> Option<&Magazine> {
        match self {
            Item::Magazine(magazine) => Some(magazine),
            _ => None,
        }
    }

    pub fn as_weapon(&self) -> Option<&Weapon> {
        match self {
            Item::Gun(weapon) => Some(weapon),
            _ => None,
        }
    }
}

impl From<Weapon> for Item {
    fn from(weapon: Weapon) -> Self {
        Item::Gun(Box::new(weapon))
    }
}

impl From<Magazine> for Item {
    fn from(magazine: Magazine) -> Self {
        Item::Magazine(magazine)
    }
}

impl From<Flashlight> for Item {
    fn from(flashlight: Flashlight) -> Self {
        Item::Flashlight(flashlight)
    }
}
