#[macro_use]
pub mod graph;
pub mod circuits;
pub use circuits::*;
pub use graph::*;
