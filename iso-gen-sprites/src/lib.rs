#[cfg(feature = "generator")]
pub mod generator;
pub mod layout;
