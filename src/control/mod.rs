//! Speed control: the temperature→speed curve and the mode/speed state.

pub mod curve;
pub mod speed;
