//! # receiver_inventory - Player Inventory
//!
//! Ten equipment slots, the off hand and the drawn gun, with the routing
//! that turns a number key into the right transfer.
//!
//! # Features
//!
//! - Slots holding a gun, magazine or flashlight, with fly-in/out springs
//! - Off hand that holds a magazine or feeds it into the gun
//! - Holster/draw with buffering while a slot is still emptying
//! - Double-tap a slot to send its magazine straight into the gun
//! - Loose rounds for loading magazines and cylinders
//!
//! # Example
//!
//! ```ignore
//! use receiver_inventory::prelude::*;
//!
//! let mut inventory = InventoryController::default().with_drawn(gun);
//! inventory.place(1, spare_mag)?;
//!
//! inventory.request_slot(SlotRequest::Slot(1));
//! inventory.route_pending(&host);
//! inventory.advance(dt);
//! ```

pub mod hand;
pub mod inventory;
pub mod item;
pub mod slot;

pub mod prelude {
    pub use crate::hand::{Hand, HandSprings};
    pub use crate::inventory::{
        InventoryConfig, InventoryController, InventoryEvent, Location, PoseSource,
    };
    pub use crate::item::{Flashlight, Item, ItemKind};
    pub use crate::slot::{Slot, SlotContent, SlotKind, SlotRequest, SLOT_COUNT};
}

pub use prelude::*;
