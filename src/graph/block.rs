use super::bus::Bus;
use super::circuit::Circuit;
use super::error::SimError;
use super::gate::Gate;
use super::node::{Clock, Signal};
use serde::{Deserialize, Serialize};

/// The capability set of an evaluable unit.
///
/// A sub-block of a composite is opaque to its parent: the parent only
/// reads and writes its bus pins and asks it to run. The two concrete
/// variants are the flat [Gate] and the composite [Circuit].
pub trait Block {
    fn name(&self) -> &str;
    fn inputs(&self) -> &Bus;
    fn outputs(&self) -> &Bus;

    /// Total number of transistors, recursively for composites.
    fn transistor_count(&self) -> usize;
    /// Number of arena nodes owned directly by this block.
    fn node_count(&self) -> usize;

    /// Clears every changeable node back to `Unknown`, recursively.
    ///
    /// This is an explicit full wipe; it is *not* performed between
    /// evaluation cycles, because latch feedback is carried by the node
    /// graph between ticks.
    fn reset(&mut self);

    /// Executes one evaluation cycle under the given clock phase.
    fn run(&mut self, clock: Clock);

    fn input_signal(&self, position: usize) -> Signal;
    fn set_input_signal(&mut self, position: usize, value: Signal);
    fn output_signal(&self, position: usize) -> Signal;
    fn set_output_signal(&mut self, position: usize, value: Signal);
    /// Pins an input to a constant value; the node stops being
    /// changeable.
    fn force_input(&mut self, position: usize, value: Signal);

    fn is_input(&self, label: &str) -> bool {
        self.inputs().contains(label)
    }

    fn is_output(&self, label: &str) -> bool {
        self.outputs().contains(label)
    }

    /// One full clock cycle: the high phase writes through clock-gated
    /// pins, the low phase lets cross-coupled feedback settle and hold.
    fn tick(&mut self) {
        self.run(Clock::High);
        self.run(Clock::Low);
    }

    /// Loads the input bus positionally from `values`.
    fn set_input_values(&mut self, values: &[bool]) -> Result<(), SimError> {
        if values.len() != self.inputs().len() {
            return Err(SimError::SizeMismatch {
                block: self.name().into(),
                expected: self.inputs().len(),
                actual: values.len(),
            });
        }
        for (position, &value) in values.iter().enumerate() {
            self.set_input_signal(position, Signal::from_bool(value));
        }
        Ok(())
    }

    /// Loads the input bus positionally from raw signals, `Unknown`
    /// included.
    fn set_input_signals(&mut self, values: &[Signal]) -> Result<(), SimError> {
        if values.len() != self.inputs().len() {
            return Err(SimError::SizeMismatch {
                block: self.name().into(),
                expected: self.inputs().len(),
                actual: values.len(),
            });
        }
        for (position, &value) in values.iter().enumerate() {
            self.set_input_signal(position, value);
        }
        Ok(())
    }

    /// Loads input values by label.
    fn set_inputs_labeled(&mut self, values: &[(&str, bool)]) -> Result<(), SimError> {
        for &(label, value) in values {
            let position = self.inputs().position(label).ok_or_else(|| {
                SimError::UnknownLabel {
                    block: self.name().into(),
                    label: label.into(),
                }
            })?;
            self.set_input_signal(position, Signal::from_bool(value));
        }
        Ok(())
    }

    /// Loads a group of numbered input labels from a two's-complement
    /// integer: label `P{i}` receives bit `i` of `value`.
    fn set_input_group(&mut self, prefix: &str, value: i64) -> Result<(), SimError> {
        let group = group_positions(self.inputs(), prefix);
        if group.is_empty() {
            return Err(SimError::UnknownLabel {
                block: self.name().into(),
                label: prefix.into(),
            });
        }
        for (position, bit) in group {
            let driven = bit < 64 && (value >> bit) & 1 == 1;
            self.set_input_signal(position, Signal::from_bool(driven));
        }
        Ok(())
    }

    /// Collects a group of numbered output labels into an unsigned
    /// integer; `Unknown` bits read as 0.
    fn output_group_u64(&self, prefix: &str) -> Result<u64, SimError> {
        let group = group_positions(self.outputs(), prefix);
        if group.is_empty() {
            return Err(SimError::UnknownLabel {
                block: self.name().into(),
                label: prefix.into(),
            });
        }
        let mut value = 0;
        for (position, bit) in group {
            if bit < 64 && self.output_signal(position).bit_lossy() {
                value |= 1 << bit;
            }
        }
        Ok(value)
    }

    /// Collects a group of numbered output labels into a signed
    /// integer, sign-extending from the highest labeled bit.
    fn output_group_i64(&self, prefix: &str) -> Result<i64, SimError> {
        let group = group_positions(self.outputs(), prefix);
        if group.is_empty() {
            return Err(SimError::UnknownLabel {
                block: self.name().into(),
                label: prefix.into(),
            });
        }
        let top = group.iter().map(|&(_, bit)| bit).max().unwrap_or(0);
        let mut value: u64 = 0;
        for &(position, bit) in &group {
            if bit < 64 && self.output_signal(position).bit_lossy() {
                value |= 1 << bit;
            }
        }
        if top < 63 && value >> top & 1 == 1 {
            value |= !0u64 << (top + 1);
        }
        Ok(value as i64)
    }

    fn output_value(&self, label: &str) -> Result<Signal, SimError> {
        let position = self.outputs().position(label).ok_or_else(|| {
            SimError::UnknownLabel {
                block: self.name().into(),
                label: label.into(),
            }
        })?;
        Ok(self.output_signal(position))
    }

    /// Reads a single output as a bit; `Unknown` reads as 0.
    fn output_bit(&self, label: &str) -> Result<bool, SimError> {
        Ok(self.output_value(label)?.bit_lossy())
    }

    /// Renders the output bus in position order.
    fn render_outputs(&self, sep: &str) -> String {
        (0..self.outputs().len())
            .map(|p| self.output_signal(p).to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// (position, bit index) pairs of the labels `P{i}` in `bus`.
fn group_positions(bus: &Bus, prefix: &str) -> Vec<(usize, u32)> {
    bus.labels()
        .iter()
        .enumerate()
        .filter_map(|(position, label)| {
            let digits = label.strip_prefix(prefix)?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            Some((position, digits.parse().ok()?))
        })
        .collect()
}

/// A fully built part: either a flat transistor network or a composite.
///
/// Composites store their sub-blocks as [Part]s so that a whole netlist
/// clones and serializes by value while staying behind the [Block]
/// seam.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Part {
    Gate(Gate),
    Circuit(Circuit),
}

macro_rules! on_part {
    ($self:ident, $block:ident => $e:expr) => {
        match $self {
            Part::Gate($block) => $e,
            Part::Circuit($block) => $e,
        }
    };
}

impl Block for Part {
    fn name(&self) -> &str {
        on_part!(self, b => b.name())
    }
    fn inputs(&self) -> &Bus {
        on_part!(self, b => b.inputs())
    }
    fn outputs(&self) -> &Bus {
        on_part!(self, b => b.outputs())
    }
    fn transistor_count(&self) -> usize {
        on_part!(self, b => b.transistor_count())
    }
    fn node_count(&self) -> usize {
        on_part!(self, b => b.node_count())
    }
    fn reset(&mut self) {
        on_part!(self, b => b.reset())
    }
    fn run(&mut self, clock: Clock) {
        on_part!(self, b => b.run(clock))
    }
    fn input_signal(&self, position: usize) -> Signal {
        on_part!(self, b => b.input_signal(position))
    }
    fn set_input_signal(&mut self, position: usize, value: Signal) {
        on_part!(self, b => b.set_input_signal(position, value))
    }
    fn output_signal(&self, position: usize) -> Signal {
        on_part!(self, b => b.output_signal(position))
    }
    fn set_output_signal(&mut self, position: usize, value: Signal) {
        on_part!(self, b => b.set_output_signal(position, value))
    }
    fn force_input(&mut self, position: usize, value: Signal) {
        on_part!(self, b => b.force_input(position, value))
    }
}

impl From<Gate> for Part {
    fn from(gate: Gate) -> Part {
        Part::Gate(gate)
    }
}

impl From<Circuit> for Part {
    fn from(circuit: Circuit) -> Part {
        Part::Circuit(circuit)
    }
}
