// mod.rs - Data structures module

pub mod loaders;
pub mod profile;

// Re-export main types for convenience
pub use loaders::{Delimiter, ProfileReader};
pub use profile::{DatabaseStatistics, Profile, ProfileDatabase};
