// mod.rs - Profile file loaders

pub mod delimited;

pub use delimited::{Delimiter, ProfileReader};
