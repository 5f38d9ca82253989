use crate::graph::*;

/// Returns an inverter: one transistor with the output tapped on the
/// collector side.
///
/// `in=0 → out=1`, `in=1 → out=0`.
pub fn not_gate() -> Result<Gate, SimError> {
    let mut not = Gate::new("Not", 1, &["in"], &["out"])?;
    not.set_as_vcc(0, Terminal::C)?;
    not.set_as_gnd(0, Terminal::E)?;
    not.set_as_input(0, Terminal::B, "in")?;
    not.set_as_output(0, Terminal::C, "out")?;
    Ok(not)
}

/// Returns an And gate: two transistors in series between the rails,
/// output tapped on the emitter of the chain.
pub fn and_gate() -> Result<Gate, SimError> {
    let mut and = Gate::new("And", 2, &["a", "b"], &["out"])?;
    and.set_as_vcc(0, Terminal::C)?;
    and.set_as_gnd(1, Terminal::E)?;
    and.connect(0, Terminal::E, 1, Terminal::C)?;
    and.set_as_input(0, Terminal::B, "a")?;
    and.set_as_input(1, Terminal::B, "b")?;
    and.set_as_output(1, Terminal::E, "out")?;
    Ok(and)
}

/// Returns an Or gate: two transistors in parallel between the rails,
/// output tapped on the shared emitter.
pub fn or_gate() -> Result<Gate, SimError> {
    let mut or = Gate::new("Or", 2, &["a", "b"], &["out"])?;
    or.set_as_vcc(0, Terminal::C)?;
    or.set_as_gnd(1, Terminal::E)?;
    or.connect(0, Terminal::C, 1, Terminal::C)?;
    or.connect(0, Terminal::E, 1, Terminal::E)?;
    or.set_as_input(0, Terminal::B, "a")?;
    or.set_as_input(1, Terminal::B, "b")?;
    or.set_as_output(1, Terminal::E, "out")?;
    Ok(or)
}

/// Returns a Nand gate: the And chain with the output tapped on the
/// collector side instead.
pub fn nand_gate() -> Result<Gate, SimError> {
    let mut nand = Gate::new("Nand", 2, &["a", "b"], &["out"])?;
    nand.set_as_vcc(0, Terminal::C)?;
    nand.set_as_gnd(1, Terminal::E)?;
    nand.connect(0, Terminal::E, 1, Terminal::C)?;
    nand.set_as_input(0, Terminal::B, "a")?;
    nand.set_as_input(1, Terminal::B, "b")?;
    nand.set_as_output(1, Terminal::C, "out")?;
    Ok(nand)
}

/// Returns a Nor gate: the Or pair with the output tapped on the
/// collector side instead.
pub fn nor_gate() -> Result<Gate, SimError> {
    let mut nor = Gate::new("Nor", 2, &["a", "b"], &["out"])?;
    nor.set_as_vcc(0, Terminal::C)?;
    nor.set_as_gnd(1, Terminal::E)?;
    nor.connect(0, Terminal::C, 1, Terminal::C)?;
    nor.connect(0, Terminal::E, 1, Terminal::E)?;
    nor.set_as_input(0, Terminal::B, "a")?;
    nor.set_as_input(1, Terminal::B, "b")?;
    nor.set_as_output(1, Terminal::C, "out")?;
    Ok(nor)
}

/// Returns an 8-way Or: eight parallel transistors, inputs `in7 … in0`.
pub fn or8way_gate() -> Result<Gate, SimError> {
    let input_labels = labels("in", 8);
    let input_labels: Vec<&str> = input_labels.iter().map(String::as_str).collect();
    let mut or8 = Gate::new("Or8way", 8, &input_labels, &["out"])?;
    or8.set_as_vcc(0, Terminal::C)?;
    or8.set_as_gnd(0, Terminal::E)?;
    for i in 1..8 {
        or8.connect(0, Terminal::C, i, Terminal::C)?;
        or8.connect(0, Terminal::E, i, Terminal::E)?;
    }
    for i in 0..8 {
        or8.set_as_input(i, Terminal::B, &format!("in{}", i))?;
    }
    or8.set_as_output(0, Terminal::E, "out")?;
    Ok(or8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table2(gate: &mut Gate, expected: [bool; 4]) {
        for (i, (a, b)) in [(false, false), (false, true), (true, false), (true, true)]
            .into_iter()
            .enumerate()
        {
            gate.set_input_values(&[a, b]).unwrap();
            gate.run(Clock::Low);
            assert_eq!(
                gate.output_bit("out").unwrap(),
                expected[i],
                "{}({}, {})",
                gate.name(),
                a,
                b
            );
        }
    }

    #[test]
    fn test_not() {
        let mut not = not_gate().unwrap();
        for (input, expected) in [(false, true), (true, false)] {
            not.set_input_values(&[input]).unwrap();
            not.run(Clock::Low);
            assert_eq!(not.output_bit("out").unwrap(), expected);
        }
    }

    #[test]
    fn test_and() {
        table2(&mut and_gate().unwrap(), [false, false, false, true]);
    }

    #[test]
    fn test_or() {
        table2(&mut or_gate().unwrap(), [false, true, true, true]);
    }

    #[test]
    fn test_nand() {
        table2(&mut nand_gate().unwrap(), [true, true, true, false]);
    }

    #[test]
    fn test_nor() {
        table2(&mut nor_gate().unwrap(), [true, false, false, false]);
    }

    #[test]
    fn test_or8way() {
        let mut or8 = or8way_gate().unwrap();
        or8.set_input_group("in", 0).unwrap();
        or8.run(Clock::Low);
        assert_eq!(or8.output_bit("out").unwrap(), false);

        for bit in 0..8 {
            or8.set_input_group("in", 1 << bit).unwrap();
            or8.run(Clock::Low);
            assert_eq!(or8.output_bit("out").unwrap(), true, "bit {}", bit);
        }
    }

    #[test]
    fn test_transistor_counts() {
        assert_eq!(not_gate().unwrap().transistor_count(), 1);
        assert_eq!(and_gate().unwrap().transistor_count(), 2);
        assert_eq!(or8way_gate().unwrap().transistor_count(), 8);
    }
}
