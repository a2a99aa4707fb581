mod entity;
pub mod port;
pub mod time;

pub use entity::{Attributes, BinaryState, EntityId};
