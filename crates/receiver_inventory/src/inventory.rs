//! Inventory controller

use crate::hand::{Hand, HandSprings};
use crate::item::{Flashlight, Item, ItemKind};
use crate::slot::{Slot, SlotContent, SlotKind, SlotRequest, SLOT_COUNT};
use receiver_core::{ObjectId, SimRng};
use receiver_math::Pose;
use receiver_weapon::{Magazine, Weapon};
use serde::{Deserialize, Serialize};

/// Where the camera and carried objects are this tick
pub trait PoseSource {
    fn camera_pose(&self) -> Pose;

    /// World pose of a carried object, if the host tracks it
    fn object_pose(&self, id: ObjectId) -> Option<Pose>;
}

/// Inventory tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub slot_spring_strength: f32,
    pub slot_spring_damping: f32,
    /// Strength of the hold and ground springs
    pub hand_spring_strength: f32,
    pub hand_spring_damping: f32,
    /// Speed and position below which an emptying slot frees up
    pub settle_epsilon: f32,
    /// Hold spring value at which a magazine reaches the well
    pub insert_threshold: f32,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            slot_spring_strength: 100.0,
            slot_spring_damping: 0.000001,
            hand_spring_strength: 100.0,
            hand_spring_damping: 0.00001,
            settle_epsilon: 0.01,
            insert_threshold: 0.01,
        }
    }
}

impl InventoryConfig {
    pub fn with_slot_spring(mut self, strength: f32, damping: f32) -> Self {
        self.slot_spring_strength = strength;
        self.slot_spring_damping = damping;
        self
    }

    pub fn with_hand_spring(mut self, strength: f32, damping: f32) -> Self {
        self.hand_spring_strength = strength;
        self.hand_spring_damping = damping;
        self
    }
}

/// Inventory events
#[derive(Debug, Clone, PartialEq)]
pub enum InventoryEvent {
    /// Drawn gun went into a slot
    GunHolstered { slot: usize, id: ObjectId },
    /// Gun came out of a slot into the hands
    GunDrawn { slot: usize, id: ObjectId },
    /// Magazine or flashlight went into a slot
    Stowed {
        slot: usize,
        id: ObjectId,
        kind: ItemKind,
    },
    /// Magazine or flashlight came out of a slot
    Taken {
        slot: usize,
        id: ObjectId,
        kind: ItemKind,
    },
    /// Ejected magazine caught by the off hand
    MagazineCaught { id: ObjectId },
    /// Magazine handed over to the gun's well
    MagazineInserted { id: ObjectId },
    /// Magazine let go into the world
    MagazineDropped { id: ObjectId },
}

/// Where a carried object currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Drawn,
    /// Seated in (or sliding out of) the drawn gun
    InDrawnGun,
    Hand,
    /// Held flashlight
    Held,
    Slot(usize),
    /// Seated in a gun stowed in the slot
    InSlottedGun(usize),
}

/// The player's ten slots, off hand, drawn gun, flashlight and loose rounds.
///
/// Every object has exactly one owner here; moving it between slot, hand,
/// gun and world is a move of the value itself.
#[derive(Debug, Clone)]
pub struct InventoryController {
    config: InventoryConfig,
    slots: Vec<Slot>,
    drawn: Option<Weapon>,
    hand: Hand,
    flashlight: Option<Flashlight>,
    loose_rounds: u32,
    pending: Option<SlotRequest>,
    queue_drop: bool,
    springs: HandSprings,
    events: Vec<InventoryEvent>,
}

impl InventoryController {
    /// Empty inventory, nothing drawn
    pub fn new(config: InventoryConfig) -> Self {
        let slots = (0..SLOT_COUNT)
            .map(|_| Slot::new(config.slot_spring_strength, config.slot_spring_damping))
            .collect();
        let springs = HandSprings::new(config.hand_spring_strength, config.hand_spring_damping);
        Self {
            config,
            slots,
            drawn: None,
            hand: Hand::Empty,
            flashlight: None,
            loose_rounds: 0,
            pending: None,
            queue_drop: false,
            springs,
            events: Vec::new(),
        }
    }

    /// Start with a gun drawn
    pub fn with_drawn(mut self, weapon: Weapon) -> Self {
        self.drawn = Some(weapon);
        self
    }

    /// Start holding a switched-on flashlight
    pub fn with_flashlight(mut self, mut flashlight: Flashlight) -> Self {
        flashlight.turn_on();
        self.flashlight = Some(flashlight);
        self
    }

    pub fn with_loose_rounds(mut self, rounds: u32) -> Self {
        self.loose_rounds = rounds;
        self
    }

    /// Start with a magazine in the off hand
    pub fn with_hand(mut self, magazine: Magazine) -> Self {
        self.springs.hold.state = 1.0;
        self.springs.hold.target_state = 1.0;
        self.hand = Hand::Hold(magazine);
        self
    }

    /// Place an item in a slot at rest; hands it back if the slot is taken
    pub fn place(&mut self, index: usize, item: impl Into<Item>) -> Result<(), Item> {
        let item = item.into();
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_empty() => {
                slot.place(item);
                Ok(())
            }
            _ => Err(item),
        }
    }

    // ---- accessors ----

    pub fn config(&self) -> &InventoryConfig {
        &self.config
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn drawn(&self) -> Option<&Weapon> {
        self.drawn.as_ref()
    }

    pub fn drawn_mut(&mut self) -> Option<&mut Weapon> {
        self.drawn.as_mut()
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn flashlight(&self) -> Option<&Flashlight> {
        self.flashlight.as_ref()
    }

    pub fn loose_rounds(&self) -> u32 {
        self.loose_rounds
    }

    pub fn springs(&self) -> &HandSprings {
        &self.springs
    }

    pub fn pending_request(&self) -> Option<SlotRequest> {
        self.pending
    }

    pub fn is_drop_queued(&self) -> bool {
        self.queue_drop
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<InventoryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Every carried object and where it is
    pub fn contents(&self) -> Vec<(Location, ObjectId)> {
        let mut contents = Vec::new();
        if let Some(weapon) = &self.drawn {
            contents.push((Location::Drawn, weapon.id()));
            if let Some(magazine) = weapon.automatic().and_then(|a| a.magazine()) {
                contents.push((Location::InDrawnGun, magazine.id()));
            }
        }
        if let Some(magazine) = self.hand.magazine() {
            contents.push((Location::Hand, magazine.id()));
        }
        if let Some(flashlight) = &self.flashlight {
            contents.push((Location::Held, flashlight.id()));
        }
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(item) = slot.item() else {
                continue;
            };
            contents.push((Location::Slot(index), item.id()));
            if let Some(magazine) = item
                .as_weapon()
                .and_then(Weapon::automatic)
                .and_then(|a| a.magazine())
            {
                contents.push((Location::InSlottedGun(index), magazine.id()));
            }
        }
        contents
    }

    // ---- slot routing ----

    /// Queue a number key or holster press; resolved by [`Self::route_pending`]
    pub fn request_slot(&mut self, request: SlotRequest) {
        self.pending = Some(request);
    }

    /// Resolve the pending request. Returns true when a second press on
    /// the slot a magazine just left sends that magazine into the gun.
    pub fn route_pending(&mut self, poses: &dyn PoseSource) -> bool {
        if let Some(weapon) = &self.drawn {
            if weapon.is_mag_currently_ejecting() || weapon.ready_to_remove_mag() {
                return false;
            }
        }
        let Some(request) = self.pending else {
            return false;
        };
        if self.hand.is_inserting() {
            return false;
        }

        let mut buffer = false;
        let mut insert = false;
        match request {
            SlotRequest::Holster => {
                buffer = self.toggle_holster(poses);
            }
            SlotRequest::Slot(index) if index < SLOT_COUNT => {
                insert = self.route_to_slot(index, poses);
            }
            SlotRequest::Slot(index) => {
                log::warn!("inventory request for missing slot {}", index);
            }
        }

        if !buffer {
            self.pending = None;
        }
        insert
    }

    /// Holster into the first empty slot or draw the first stowed gun.
    /// True when the request must wait for an emptying slot.
    fn toggle_holster(&mut self, poses: &dyn PoseSource) -> bool {
        if let Some(weapon) = self.drawn.take() {
            let Some(index) = self.empty_slot() else {
                self.drawn = Some(weapon);
                return self.slots.iter().any(|s| s.kind() == SlotKind::Emptying);
            };
            let id = weapon.id();
            let start = start_pose(poses, id);
            self.slots[index].stow(weapon.into(), start);
            self.events.push(InventoryEvent::GunHolstered { slot: index, id });
            log::debug!("holstered {} in slot {}", id, index + 1);
            return false;
        }

        let Some(index) = self.slots.iter().position(|s| s.kind() == SlotKind::Gun) else {
            return false;
        };
        if let Some(Item::Gun(weapon)) = self.slots[index].take() {
            let id = weapon.id();
            self.drawn = Some(*weapon);
            self.events.push(InventoryEvent::GunDrawn { slot: index, id });
            log::debug!("drew {} from slot {}", id, index + 1);
        }
        false
    }

    fn route_to_slot(&mut self, index: usize, poses: &dyn PoseSource) -> bool {
        let kind = self.slots[index].kind();

        if self.hand.is_holding() && kind == SlotKind::Empty {
            if let Some(magazine) = self.hand.take() {
                let id = magazine.id();
                let start = start_pose(poses, id);
                self.slots[index].stow(magazine.into(), start);
                self.stowed(index, id, ItemKind::Magazine);
            }
        } else if self.hand.is_holding()
            && kind == SlotKind::Emptying
            && self.slots[index].object_id() == self.hand.magazine().map(Magazine::id)
            && self
                .drawn
                .as_ref()
                .map_or(false, |weapon| !weapon.is_there_a_mag_in_gun())
        {
            self.start_insert();
            return true;
        } else if self.hand.is_empty() && kind == SlotKind::Magazine {
            if let Some(Item::Magazine(magazine)) = self.slots[index].take() {
                self.taken(index, magazine.id(), ItemKind::Magazine);
                self.springs.hold.state = 1.0;
                self.springs.hold.target_state = 1.0;
                self.hand = Hand::Hold(magazine);
            }
        } else if self.hand.is_empty() && kind == SlotKind::Empty && self.flashlight.is_some() {
            if let Some(mut flashlight) = self.flashlight.take() {
                flashlight.turn_off();
                let id = flashlight.id();
                let start = start_pose(poses, id);
                self.slots[index].stow(flashlight.into(), start);
                self.stowed(index, id, ItemKind::Flashlight);
            }
        } else if self.flashlight.is_none() && kind == SlotKind::Flashlight {
            if let Some(Item::Flashlight(mut flashlight)) = self.slots[index].take() {
                flashlight.turn_on();
                self.taken(index, flashlight.id(), ItemKind::Flashlight);
                self.flashlight = Some(flashlight);
            }
        }
        false
    }

    fn stowed(&mut self, slot: usize, id: ObjectId, kind: ItemKind) {
        log::debug!("stowed {:?} {} in slot {}", kind, id, slot + 1);
        self.events.push(InventoryEvent::Stowed { slot, id, kind });
    }

    fn taken(&mut self, slot: usize, id: ObjectId, kind: ItemKind) {
        log::debug!("took {:?} {} from slot {}", kind, id, slot + 1);
        self.events.push(InventoryEvent::Taken { slot, id, kind });
    }

    // ---- hand ----

    fn start_insert(&mut self) {
        self.springs.hold.target_state = 0.0;
        self.hand.restage(true);
    }

    /// Insert press: start moving the held magazine to an empty well
    pub fn begin_insert(&mut self) -> bool {
        let well_free = self
            .drawn
            .as_ref()
            .map_or(false, |weapon| weapon.has_slide() && !weapon.is_there_a_mag_in_gun());
        if self.hand.is_holding() && well_free {
            self.start_insert();
            return true;
        }
        false
    }

    /// Eject/drop handling; call every tick with the button-down edge.
    ///
    /// A held magazine is let go and returned for the world to own. With the
    /// hand empty the drawn gun's magazine release is pressed, or a drop is
    /// queued while one is already sliding out. A pending insert is
    /// cancelled.
    pub fn eject_or_drop(&mut self, pressed: bool) -> Option<Magazine> {
        let mut dropped = None;
        if (pressed || self.queue_drop) && self.hand.is_holding() {
            dropped = self.hand.take();
            self.queue_drop = false;
            if let Some(magazine) = &dropped {
                log::debug!("dropped magazine {}", magazine.id());
                self.events
                    .push(InventoryEvent::MagazineDropped { id: magazine.id() });
            }
        }

        if pressed {
            if self.hand.is_empty() {
                if let Some(weapon) = self.drawn.as_mut() {
                    if weapon.is_mag_currently_ejecting() {
                        self.queue_drop = true;
                    } else {
                        weapon.mag_eject();
                    }
                }
            } else if self.hand.is_inserting() {
                self.hand.restage(false);
                self.springs.hold.target_state = 1.0;
            }
        }
        dropped
    }

    /// Pick up a magazine from the world.
    ///
    /// Returns whether this is the first time any player held it, or hands
    /// the magazine back if the off hand is full.
    pub fn grab_magazine(&mut self, mut magazine: Magazine, ground: Pose) -> Result<bool, Magazine> {
        if !self.hand.is_empty() {
            return Err(magazine);
        }
        let first_hold = !magazine.has_been_held;
        magazine.has_been_held = true;

        self.springs.mag_ground_pose = ground;
        self.springs.mag_ground.state = 1.0;
        self.springs.mag_ground.vel = 1.0;
        self.springs.hold.state = 1.0;
        self.springs.hold.vel = 0.0;
        self.springs.hold.target_state = 1.0;
        log::debug!("picked up magazine {}", magazine.id());
        self.hand = Hand::Hold(magazine);
        Ok(first_hold)
    }

    /// Pick up a flashlight from the world; hands it back if one is held
    pub fn grab_flashlight(&mut self, mut flashlight: Flashlight, ground: Pose) -> Result<(), Flashlight> {
        if self.flashlight.is_some() {
            return Err(flashlight);
        }
        flashlight.turn_on();
        self.springs.flash_ground_pose = ground;
        self.springs.flash_ground.state = 1.0;
        self.springs.flash_ground.vel = 1.0;
        self.flashlight = Some(flashlight);
        Ok(())
    }

    /// A loose round reached the player
    pub fn collect_round(&mut self) {
        self.loose_rounds += 1;
    }

    /// Insert press with a loose round: load the open cylinder of the
    /// drawn gun, or the held magazine when holstered
    pub fn insert_round(&mut self, rng: &mut SimRng) -> bool {
        if self.loose_rounds == 0 {
            return false;
        }
        let loaded = match (self.drawn.as_mut(), &mut self.hand) {
            (Some(weapon), _) => weapon.add_round_to_cylinder(rng),
            (None, Hand::Hold(magazine)) => magazine.add_round(),
            (None, _) => false,
        };
        if loaded {
            self.loose_rounds -= 1;
        }
        loaded
    }

    /// Thumb a round out of the held magazine into the loose rounds
    pub fn remove_round_from_mag(&mut self) -> bool {
        if self.drawn.is_some() {
            return false;
        }
        let Hand::Hold(magazine) = &mut self.hand else {
            return false;
        };
        if magazine.remove_round_animated() {
            self.loose_rounds += 1;
            return true;
        }
        false
    }

    // ---- per tick ----

    /// Advance hand transfers and display springs by `dt` seconds
    pub fn advance(&mut self, dt: f32) {
        self.catch_ejected_magazine();
        self.transfer_to_gun();

        if let Some(magazine) = self.hand.magazine_mut() {
            magazine.advance(dt);
        }
        let settle_epsilon = self.config.settle_epsilon;
        for slot in &mut self.slots {
            slot.advance(dt, settle_epsilon);
        }

        if !self.hand.is_empty() {
            self.springs.hold.update(dt);
            self.springs.mag_ground.update(dt);
        }
        self.springs.flash_ground.update(dt);
    }

    fn catch_ejected_magazine(&mut self) {
        if !self.hand.is_empty() {
            return;
        }
        let Some(weapon) = self.drawn.as_mut() else {
            return;
        };
        if !weapon.ready_to_remove_mag() {
            return;
        }
        if let Some(magazine) = weapon.remove_mag() {
            self.events
                .push(InventoryEvent::MagazineCaught { id: magazine.id() });
            self.springs.hold.state = 0.0;
            self.springs.hold.vel = 0.0;
            self.springs.hold.target_state = 1.0;
            self.hand = Hand::Hold(magazine);
        }
    }

    fn transfer_to_gun(&mut self) {
        if !self.hand.is_inserting() || self.springs.hold.state >= self.config.insert_threshold {
            return;
        }
        let Some(weapon) = self.drawn.as_mut() else {
            return;
        };
        let Some(magazine) = self.hand.take() else {
            return;
        };
        let id = magazine.id();
        match weapon.insert_mag(magazine) {
            Ok(()) => {
                self.events.push(InventoryEvent::MagazineInserted { id });
            }
            Err(magazine) => {
                log::warn!("gun refused magazine {}", id);
                self.springs.hold.target_state = 1.0;
                self.hand = Hand::Hold(magazine);
            }
        }
    }

    // ---- queries ----

    /// Holding an empty magazine with rounds to load it from
    pub fn should_holster_gun(&self) -> bool {
        self.loose_rounds > 0
            && self
                .hand
                .magazine()
                .map_or(false, |magazine| magazine.num_rounds() == 0)
    }

    pub fn can_load_bullets_in_mag(&self) -> bool {
        self.drawn.is_none()
            && self.loose_rounds > 0
            && matches!(&self.hand, Hand::Hold(magazine) if !magazine.is_full())
    }

    pub fn can_remove_bullet_from_mag(&self) -> bool {
        self.drawn.is_none()
            && matches!(&self.hand, Hand::Hold(magazine) if magazine.num_rounds() > 0)
    }

    pub fn should_draw_weapon(&self) -> bool {
        self.drawn.is_none() && !self.can_load_bullets_in_mag()
    }

    /// Slot of the stowed magazine with the most rounds; empty magazines
    /// never count
    pub fn most_loaded_mag_slot(&self) -> Option<usize> {
        let mut best: Option<(usize, u32)> = None;
        for (index, slot) in self.slots.iter().enumerate() {
            let Some(rounds) = slot
                .item()
                .and_then(Item::as_magazine)
                .map(Magazine::num_rounds)
            else {
                continue;
            };
            if rounds > best.map_or(0, |(_, most)| most) {
                best = Some((index, rounds));
            }
        }
        best.map(|(index, _)| index)
    }

    /// A stowed magazine holds more rounds than the one in hand
    pub fn should_put_mag_in_inventory(&self) -> bool {
        let Some(held) = self.hand.magazine() else {
            return false;
        };
        let Some(index) = self.most_loaded_mag_slot() else {
            return false;
        };
        self.slots[index]
            .item()
            .and_then(Item::as_magazine)
            .map_or(false, |magazine| magazine.num_rounds() > held.num_rounds())
    }

    pub fn empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.kind() == SlotKind::Empty)
    }

    pub fn flashlight_slot(&self) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.kind() == SlotKind::Flashlight)
    }

    /// Slot currently animating the given object out
    pub fn emptying_slot_of(&self, id: ObjectId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| matches!(s.content(), SlotContent::Emptying(left) if *left == id))
    }
}

impl Default for InventoryController {
    fn default() -> Self {
        Self::new(InventoryConfig::default())
    }
}

fn start_pose(poses: &dyn PoseSource, id: ObjectId) -> Pose {
    let camera = poses.camera_pose();
    poses
        .object_pose(id)
        .unwrap_or(camera)
        .relative_to(&camera)
}
