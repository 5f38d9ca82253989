use super::gates::{and_gate, nor_gate, not_gate};
use crate::graph::*;

/// Returns a clock-gated D latch.
///
/// The data input and its inverse feed two And gates whose other inputs
/// are clock-gated; the Ands drive a cross-coupled Nor pair. While the
/// clock is high the pair is written, while it is low the pair holds,
/// so one [tick](Block::tick) stores the current `in`.
///
/// # Examples
/// ```
/// # use switchsim::{dff, Block};
/// let mut dff = dff().unwrap();
/// dff.set_input_values(&[true]).unwrap();
/// dff.tick();
/// assert_eq!(dff.output_bit("out").unwrap(), true);
///
/// dff.set_input_values(&[false]).unwrap();
/// dff.tick();
/// assert_eq!(dff.output_bit("out").unwrap(), false);
/// ```
pub fn dff() -> Result<Circuit, SimError> {
    let mut dff = Circuit::new("Dff", &["in"], &["out"])?;
    dff.add_component(&not_gate()?);
    dff.add_component_n(&and_gate()?, 2);
    dff.add_component_n(&nor_gate()?, 2);
    dff.set_as_input(0, "in", "in")?;
    dff.set_as_input(1, "a", "in")?;
    dff.connect(0, "out", 2, "b")?;
    dff.connect(1, "out", 3, "a")?;
    dff.connect(2, "out", 4, "b")?;
    dff.connect(3, "out", 4, "a")?;
    dff.connect(4, "out", 3, "b")?;
    dff.set_as_output(4, "out", "out")?;
    dff.set_as_clock(1, "b")?;
    dff.set_as_clock(2, "a")?;
    Ok(dff)
}

/// Returns a 1-bit storage cell: a [dff] whose write path is qualified
/// by a `load` line. With `load=0` the stored bit survives any number
/// of ticks; with `load=1` the next tick stores `in`.
pub fn bit() -> Result<Circuit, SimError> {
    let mut bit = Circuit::new("Bit", &["in", "load"], &["out"])?;
    bit.add_component(&not_gate()?);
    bit.add_component_n(&and_gate()?, 2);
    bit.add_component_n(&nor_gate()?, 2);
    bit.add_component(&and_gate()?);
    bit.set_as_input(0, "in", "in")?;
    bit.set_as_input(1, "a", "in")?;
    bit.connect(0, "out", 2, "b")?;
    bit.connect(1, "out", 3, "a")?;
    bit.connect(2, "out", 4, "b")?;
    bit.connect(3, "out", 4, "a")?;
    bit.connect(4, "out", 3, "b")?;
    bit.set_as_output(4, "out", "out")?;
    bit.set_as_input(5, "a", "load")?;
    bit.set_as_clock(5, "b")?;
    bit.connect(5, "out", 1, "b")?;
    bit.connect(5, "out", 2, "a")?;
    Ok(bit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dff_stores_on_every_tick() {
        let mut dff = dff().unwrap();
        for value in [false, true, true, false, true] {
            dff.set_input_values(&[value]).unwrap();
            dff.tick();
            assert_eq!(dff.output_bit("out").unwrap(), value);
        }
    }

    #[test]
    fn test_dff_holds_without_clock() {
        let mut dff = dff().unwrap();
        dff.set_input_values(&[true]).unwrap();
        dff.tick();

        // The clock stays low: the input no longer writes through.
        dff.set_input_values(&[false]).unwrap();
        dff.run(Clock::Low);
        dff.run(Clock::Low);
        assert_eq!(dff.output_bit("out").unwrap(), true);
    }

    #[test]
    fn test_bit_load_sequence() {
        let mut bit = bit().unwrap();
        // (in, load) -> stored value after a full tick.
        let sequence = [
            ((false, true), false),
            ((true, false), false),
            ((false, false), false),
            ((true, false), false),
            ((true, true), true),
            ((false, false), true),
            ((true, false), true),
            ((false, false), true),
        ];
        for ((input, load), expected) in sequence {
            bit.set_input_values(&[input, load]).unwrap();
            bit.tick();
            assert_eq!(
                bit.output_bit("out").unwrap(),
                expected,
                "in={} load={}",
                input,
                load
            );
        }
    }

    #[test]
    fn test_bit_clone_carries_no_state() {
        let mut bit = bit().unwrap();
        bit.set_input_values(&[true, true]).unwrap();
        bit.tick();
        assert_eq!(bit.output_bit("out").unwrap(), true);

        // A fresh build starts empty even though the original holds 1.
        let mut fresh = super::bit().unwrap();
        fresh.set_input_values(&[false, true]).unwrap();
        fresh.tick();
        assert_eq!(fresh.output_bit("out").unwrap(), false);
        assert_eq!(bit.output_bit("out").unwrap(), true);
    }
}
