use super::node::NodeIndex;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// One of the three terminals of a [Transistor]: base, collector,
/// emitter.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Terminal {
    B,
    C,
    E,
}

impl Display for Terminal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Terminal::B => write!(f, "B"),
            Terminal::C => write!(f, "C"),
            Terminal::E => write!(f, "E"),
        }
    }
}

/// The simulator's primitive: an NPN-like switch between collector and
/// emitter, controlled by the base.
///
/// A transistor owns exactly three distinct arena nodes. The bridge is
/// a pure function of the base value at evaluation time; the owning
/// [Gate](super::Gate) mirrors it as a dynamic C–E adjacency edge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Transistor {
    pub(super) base: NodeIndex,
    pub(super) collector: NodeIndex,
    pub(super) emitter: NodeIndex,
    pub(super) bridge: bool,
}

impl Transistor {
    pub(super) fn new(base: NodeIndex, collector: NodeIndex, emitter: NodeIndex) -> Transistor {
        Transistor {
            base,
            collector,
            emitter,
            bridge: false,
        }
    }

    /// Returns the arena node behind `terminal`.
    pub fn terminal(&self, terminal: Terminal) -> NodeIndex {
        match terminal {
            Terminal::B => self.base,
            Terminal::C => self.collector,
            Terminal::E => self.emitter,
        }
    }

    /// Returns true if the collector-emitter bridge is currently closed.
    pub fn is_conducting(&self) -> bool {
        self.bridge
    }
}
