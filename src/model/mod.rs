pub mod common;
pub mod contact;
pub mod tags;

pub use common::*;
pub use contact::*;
pub use tags::*;
