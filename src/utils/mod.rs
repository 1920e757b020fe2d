pub mod json;
pub mod round;
