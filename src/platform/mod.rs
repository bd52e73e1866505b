//! Platform glue between raw host events and the simulation
//!
//! - Held-key input state, turned into one `TickInput` per frame
//! - Pausable game clock fed to the simulation's deadline timers

pub mod input;
pub mod time;

pub use input::InputState;
pub use time::GameClock;
