use super::gates::{and_gate, or_gate};
use super::xor::xor;
use crate::graph::*;

/// Returns a half adder: `sum = Xor(a, b)`, `carry = And(a, b)`.
pub fn half_adder() -> Result<Circuit, SimError> {
    let mut ha = Circuit::new("HalfAdder", &["a", "b"], &["sum", "carry"])?;
    ha.add_component(&xor()?);
    ha.add_component(&and_gate()?);
    ha.set_as_input(0, "a", "a")?;
    ha.set_as_input(0, "b", "b")?;
    ha.set_as_input(1, "a", "a")?;
    ha.set_as_input(1, "b", "b")?;
    ha.set_as_output(0, "out", "sum")?;
    ha.set_as_output(1, "out", "carry")?;
    Ok(ha)
}

/// Returns a full adder: two chained [half_adder]s with their carries
/// Or'd together.
pub fn full_adder() -> Result<Circuit, SimError> {
    let mut fa = Circuit::new("FullAdder", &["a", "b", "c"], &["sum", "carry"])?;
    fa.add_component_n(&half_adder()?, 2);
    fa.add_component(&or_gate()?);
    fa.set_as_input(0, "a", "a")?;
    fa.set_as_input(0, "b", "b")?;
    fa.set_as_input(1, "b", "c")?;
    fa.connect(0, "sum", 1, "a")?;
    fa.set_as_output(1, "sum", "sum")?;
    fa.connect(0, "carry", 2, "a")?;
    fa.connect(1, "carry", 2, "b")?;
    fa.set_as_output(2, "out", "carry")?;
    Ok(fa)
}

/// Returns a 16-bit ripple-carry adder: a [half_adder] on bit 0 and a
/// [full_adder] chain above it. Inputs `a15 … a0` and `b15 … b0`,
/// outputs `out15 … out0`; label `0` is the least significant bit and
/// overflow wraps (two's complement).
pub fn adder16() -> Result<Circuit, SimError> {
    let mut input_labels = labels("a", 16);
    input_labels.extend(labels("b", 16));
    let input_labels: Vec<&str> = input_labels.iter().map(String::as_str).collect();
    let output_labels = labels("out", 16);
    let output_labels: Vec<&str> = output_labels.iter().map(String::as_str).collect();

    let mut adder = Circuit::new("Add16", &input_labels, &output_labels)?;
    adder.add_component(&half_adder()?);
    adder.add_component_n(&full_adder()?, 15);
    for i in 0..16 {
        adder.set_as_input(i, "a", &format!("a{}", i))?;
        adder.set_as_input(i, "b", &format!("b{}", i))?;
        adder.set_as_output(i, "sum", &format!("out{}", i))?;
    }
    for i in 1..16 {
        adder.connect(i - 1, "carry", i, "c")?;
    }
    Ok(adder)
}

/// Returns a 16-bit incrementer: an [adder16] with its `b` bus forced
/// to the constant 1.
pub fn inc16() -> Result<Circuit, SimError> {
    let input_labels = labels("inp", 16);
    let input_labels: Vec<&str> = input_labels.iter().map(String::as_str).collect();
    let output_labels = labels("out", 16);
    let output_labels: Vec<&str> = output_labels.iter().map(String::as_str).collect();

    let mut inc = Circuit::new("Inc16", &input_labels, &output_labels)?;
    inc.add_component(&adder16()?);
    for i in 0..16 {
        inc.set_as_input(0, &format!("a{}", i), &format!("inp{}", i))?;
        inc.set_as_output(0, &format!("out{}", i), &format!("out{}", i))?;
    }
    inc.set_high_input(0, "b0")?;
    for i in 1..16 {
        inc.set_low_input(0, &format!("b{}", i))?;
    }
    Ok(inc)
}
