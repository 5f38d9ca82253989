use super::gates::{and_gate, nand_gate, not_gate, or_gate};
use crate::graph::*;

/// Returns an Xor built from composition: `out = And(Nand(a, b), Or(a, b))`.
pub fn xor() -> Result<Circuit, SimError> {
    let mut xor = Circuit::new("Xor", &["a", "b"], &["out"])?;
    xor.add_component(&nand_gate()?);
    xor.add_component(&or_gate()?);
    xor.add_component(&and_gate()?);
    xor.set_as_input(0, "a", "a")?;
    xor.set_as_input(0, "b", "b")?;
    xor.connect(0, "a", 1, "a")?;
    xor.connect(0, "b", 1, "b")?;
    xor.connect(0, "out", 2, "a")?;
    xor.connect(1, "out", 2, "b")?;
    xor.set_as_output(2, "out", "out")?;
    Ok(xor)
}

/// Returns an Xnor: an [xor] followed by an inverter.
pub fn xnor() -> Result<Circuit, SimError> {
    let mut xnor = Circuit::new("Xnor", &["a", "b"], &["out"])?;
    xnor.add_component(&xor()?);
    xnor.add_component(&not_gate()?);
    xnor.set_as_input(0, "a", "a")?;
    xnor.set_as_input(0, "b", "b")?;
    xnor.connect(0, "out", 1, "in")?;
    xnor.set_as_output(1, "out", "out")?;
    Ok(xnor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xor() {
        let mut xor = xor().unwrap();
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            xor.set_input_values(&[a, b]).unwrap();
            xor.run(Clock::Low);
            assert_eq!(xor.output_bit("out").unwrap(), a ^ b, "a={} b={}", a, b);
        }
    }

    #[test]
    fn test_xnor() {
        let mut xnor = xnor().unwrap();
        for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
            xnor.set_input_values(&[a, b]).unwrap();
            xnor.run(Clock::Low);
            assert_eq!(xnor.output_bit("out").unwrap(), a == b, "a={} b={}", a, b);
        }
    }
}
