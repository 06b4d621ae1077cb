//! Core value types for the Orca client.

pub mod alignment;
pub mod audio;
pub mod params;

pub use alignment::*;
pub use audio::*;
pub use params::*;
