mod adder;
mod gates;
mod latch;
mod mux;
mod register;
mod xor;
pub use adder::*;
pub use gates::*;
pub use latch::*;
pub use mux::*;
pub use register::*;
pub use xor::*;
