use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The logic level carried by a [Node].
///
/// `Unknown` means the node has not been driven yet this cycle; every
/// changeable node starts a cycle as `Unknown` and transistor bases read
/// it as "not conducting".
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Signal {
    Low,
    High,
    Unknown,
}

impl Signal {
    pub fn from_bool(value: bool) -> Signal {
        if value {
            Signal::High
        } else {
            Signal::Low
        }
    }

    #[inline]
    pub fn is_high(self) -> bool {
        self == Signal::High
    }

    /// Reads the signal as a bit, treating `Unknown` as 0.
    pub fn bit_lossy(self) -> bool {
        self.is_high()
    }

    /// The effective value of a clock-gated pin: the wire value ANDed
    /// with the clock phase. An undriven (`Unknown`) wire passes the
    /// clock through, which is what gated latch pins rely on.
    pub fn gated(self, clock: Clock) -> Signal {
        match (self, clock) {
            (Signal::Low, _) => Signal::Low,
            (_, Clock::Low) => Signal::Low,
            (Signal::High, Clock::High) | (Signal::Unknown, Clock::High) => Signal::High,
        }
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Signal::High => write!(f, "1"),
            Signal::Low => write!(f, "0"),
            Signal::Unknown => write!(f, "?"),
        }
    }
}

/// The global two-phase clock, supplied by the caller on every
/// evaluation. The engine has no timer of its own.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum Clock {
    Low,
    High,
}

/// A single signal carrier in a block's node arena.
///
/// Non-changeable nodes (the rails and forced constant inputs) never
/// mutate after construction; [Node::set] silently refuses the write.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Node {
    pub value: Signal,
    pub changeable: bool,
}

impl Node {
    pub fn new() -> Node {
        Node {
            value: Signal::Unknown,
            changeable: true,
        }
    }

    pub fn constant(value: Signal) -> Node {
        Node {
            value,
            changeable: false,
        }
    }

    #[inline]
    pub fn set(&mut self, value: Signal) {
        if self.changeable {
            self.value = value;
        }
    }

    /// Resets a changeable node to `Unknown`.
    #[inline]
    pub fn clear(&mut self) {
        if self.changeable {
            self.value = Signal::Unknown;
        }
    }

    /// Pins the node to `value` permanently.
    pub fn force(&mut self, value: Signal) {
        self.value = value;
        self.changeable = false;
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

/// Represents the index of a node in a block's arena.
///
/// Node identity is the index: two freshly minted nodes are distinct
/// even when their contents are equal, and adjacency is always keyed by
/// index, never by value.
#[repr(transparent)]
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NodeIndex {
    pub(crate) idx: usize,
}

/// Returns a new [NodeIndex] from a provided usize.
#[macro_export]
macro_rules! ni {
    ( $x:expr ) => {{
        $crate::graph::NodeIndex::new($x)
    }};
}

/// The [NodeIndex] of the GND rail in any flat [Gate](super::Gate) arena.
///
/// Having it be a constant greatly simplifies both implementation and use.
pub const GND: NodeIndex = ni!(0);
/// The [NodeIndex] of the VCC rail in any flat [Gate](super::Gate) arena.
///
/// Having it be a constant greatly simplifies both implementation and use.
pub const VCC: NodeIndex = ni!(1);

impl NodeIndex {
    pub const fn new(idx: usize) -> NodeIndex {
        NodeIndex { idx }
    }

    pub fn is_gnd(&self) -> bool {
        *self == GND
    }

    pub fn is_vcc(&self) -> bool {
        *self == VCC
    }

    /// Returns true if `self` is one of the two reserved rail slots.
    #[inline]
    pub fn is_rail(&self) -> bool {
        *self == GND || *self == VCC
    }
}

impl Display for NodeIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rails_are_reserved() {
        assert!(GND.is_rail());
        assert!(VCC.is_rail());
        assert!(!ni!(2).is_rail());
    }

    #[test]
    fn test_constant_nodes_refuse_writes() {
        let mut vcc = Node::constant(Signal::High);
        vcc.set(Signal::Low);
        vcc.clear();
        assert_eq!(vcc.value, Signal::High);
    }

    #[test]
    fn test_gating() {
        assert_eq!(Signal::High.gated(Clock::High), Signal::High);
        assert_eq!(Signal::High.gated(Clock::Low), Signal::Low);
        assert_eq!(Signal::Low.gated(Clock::High), Signal::Low);
        assert_eq!(Signal::Unknown.gated(Clock::High), Signal::High);
        assert_eq!(Signal::Unknown.gated(Clock::Low), Signal::Low);
    }
}
