//! Equipment slots

use crate::item::{Item, ItemKind};
use receiver_core::ObjectId;
use receiver_math::{Pose, Spring};
use serde::{Deserialize, Serialize};

/// Number of equipment slots, bound to keys 1-10
pub const SLOT_COUNT: usize = 10;

/// What a slot shows, for routing and prompts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotKind {
    Gun,
    Magazine,
    Flashlight,
    Empty,
    /// The item just left and is still animating out
    Emptying,
}

/// A pending inventory key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotRequest {
    /// Holster the drawn gun, or draw the first stowed one
    Holster,
    /// Zero-based slot index
    Slot(usize),
}

impl SlotRequest {
    /// Request for number key `key` (1-10); `None` for other keys
    pub fn from_key(key: usize) -> Option<Self> {
        (1..=SLOT_COUNT).contains(&key).then(|| SlotRequest::Slot(key - 1))
    }
}

#[derive(Debug, Clone)]
pub enum SlotContent {
    Empty,
    Holding(Item),
    /// Id of the item that left, kept until the slot settles
    Emptying(ObjectId),
}

/// One equipment slot.
///
/// The display spring runs from 0 (at the hand or gun) to 1 (stowed), and
/// `start` is where the item was, relative to the camera, when it went in.
#[derive(Debug, Clone)]
pub struct Slot {
    content: SlotContent,
    spring: Spring,
    start: Pose,
}

impl Slot {
    pub fn new(strength: f32, damping: f32) -> Self {
        Self {
            content: SlotContent::Empty,
            spring: Spring::new(1.0, 1.0, strength, damping),
            start: Pose::IDENTITY,
        }
    }

    pub fn kind(&self) -> SlotKind {
        match &self.content {
            SlotContent::Empty => SlotKind::Empty,
            SlotContent::Emptying(_) => SlotKind::Emptying,
            SlotContent::Holding(item) => match item.kind() {
                ItemKind::Gun => SlotKind::Gun,
                ItemKind::Magazine => SlotKind::Magazine,
                ItemKind::Flashlight => SlotKind::Flashlight,
            },
        }
    }

    pub fn content(&self) -> &SlotContent {
        &self.content
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.content {
            SlotContent::Holding(item) => Some(item),
            _ => None,
        }
    }

    /// Id of the object held or leaving
    pub fn object_id(&self) -> Option<ObjectId> {
        match &self.content {
            SlotContent::Empty => None,
            SlotContent::Holding(item) => Some(item.id()),
            SlotContent::Emptying(id) => Some(*id),
        }
    }

    pub fn spring(&self) -> &Spring {
        &self.spring
    }

    /// Camera-relative pose the item flew in from
    pub fn start_pose(&self) -> Pose {
        self.start
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.content, SlotContent::Empty)
    }

    /// Put an item in and start the fly-in
    pub(crate) fn stow(&mut self, item: Item, start: Pose) {
        self.content = SlotContent::Holding(item);
        self.spring.state = 0.0;
        self.spring.target_state = 1.0;
        self.start = start;
    }

    /// Put an item in already at rest
    pub(crate) fn place(&mut self, item: Item) {
        self.content = SlotContent::Holding(item);
        self.spring.state = 1.0;
        self.spring.target_state = 1.0;
    }

    /// Take the item out and start the fly-out
    pub(crate) fn take(&mut self) -> Option<Item> {
        let SlotContent::Holding(item) = &self.content else {
            return None;
        };
        let id = item.id();
        let SlotContent::Holding(item) =
            std::mem::replace(&mut self.content, SlotContent::Emptying(id))
        else {
            return None;
        };
        self.spring.target_state = 0.0;
        self.spring.state = 1.0;
        Some(item)
    }

    /// Step the display spring; an emptying slot frees up once it rests
    pub(crate) fn advance(&mut self, dt: f32, settle_epsilon: f32) {
        if self.is_empty() {
            return;
        }
        if matches!(self.content, SlotContent::Emptying(_))
            && self.spring.is_settled_at_zero(settle_epsilon)
        {
            self.content = SlotContent::Empty;
            self.spring.state = 0.0;
        }
        self.spring.update(dt);
    }
}
