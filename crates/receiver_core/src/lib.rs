//! # receiver_core - Gameplay Core
//!
//! Small primitives shared by every gameplay crate:
//! - **Identity**: [`ObjectId`] names a gun, magazine or flashlight no matter
//!   which container currently owns it
//! - **Randomness**: [`SimRng`] is the one seedable stream all cosmetic
//!   variance is drawn from, so a seed reproduces a whole session

pub mod id;
pub mod rng;

pub use id::*;
pub use rng::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::id::{IdAllocator, ObjectId};
    pub use crate::rng::SimRng;
}
