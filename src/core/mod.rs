// Core module containing M16 constants
pub mod constants;

pub use constants::*;
