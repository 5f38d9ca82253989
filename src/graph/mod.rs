mod block;
mod bus;
mod circuit;
mod error;
mod gate;
mod label;
mod library;
#[macro_use]
mod node;
mod transistor;
pub use block::*;
pub use bus::*;
pub use circuit::*;
pub use error::*;
pub use gate::*;
pub use label::*;
pub use library::*;
pub use node::*;
pub use transistor::*;
