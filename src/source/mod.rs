//! Source units and the collaborators that locate units and measure images.

pub mod errors;
pub mod image;
pub mod resolver;
pub mod unit;

pub use errors::*;
pub use image::*;
pub use resolver::*;
pub use unit::*;
