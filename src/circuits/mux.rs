use super::gates::{and_gate, not_gate, or_gate};
use crate::graph::*;

/// Returns a 2-way multiplexer: `out = a` when `sel=0`, `out = b` when
/// `sel=1`.
///
/// Built as `Or(And(Not(sel), a), And(sel, b))`.
pub fn mux() -> Result<Circuit, SimError> {
    let mut mux = Circuit::new("Mux", &["a", "b", "sel"], &["out"])?;
    mux.add_component(&not_gate()?);
    mux.add_component_n(&and_gate()?, 2);
    mux.add_component(&or_gate()?);
    mux.set_as_input(1, "b", "a")?;
    mux.set_as_input(2, "b", "b")?;
    mux.set_as_output(3, "out", "out")?;
    mux.connect(1, "out", 3, "a")?;
    mux.connect(2, "out", 3, "b")?;
    mux.set_as_input(0, "in", "sel")?;
    mux.set_as_input(2, "a", "sel")?;
    mux.connect(0, "out", 1, "a")?;
    Ok(mux)
}

/// Returns a 4-way multiplexer over inputs `a…d`, addressed by
/// `sel1 sel0`.
pub fn mux4way() -> Result<Circuit, SimError> {
    let mut m = Circuit::new("Mux4way", &["a", "b", "c", "d", "sel1", "sel0"], &["out"])?;
    m.add_component_n(&mux()?, 3);
    m.set_as_input(2, "sel", "sel1")?;
    m.set_as_input(0, "sel", "sel0")?;
    m.set_as_input(1, "sel", "sel0")?;
    m.set_as_input(0, "a", "a")?;
    m.set_as_input(0, "b", "b")?;
    m.set_as_input(1, "a", "c")?;
    m.set_as_input(1, "b", "d")?;
    m.set_as_output(2, "out", "out")?;
    m.connect(0, "out", 2, "a")?;
    m.connect(1, "out", 2, "b")?;
    Ok(m)
}

/// Returns a 16-bit wide 2-way multiplexer: 16 [mux]es sharing one
/// `sel` line.
pub fn mux16() -> Result<Circuit, SimError> {
    let mut input_labels = labels("a", 16);
    input_labels.extend(labels("b", 16));
    input_labels.push("sel".into());
    let input_labels: Vec<&str> = input_labels.iter().map(String::as_str).collect();
    let output_labels = labels("out", 16);
    let output_labels: Vec<&str> = output_labels.iter().map(String::as_str).collect();

    let mut m = Circuit::new("Mux16", &input_labels, &output_labels)?;
    m.add_component_n(&mux()?, 16);
    for i in 0..16 {
        m.set_as_input(i, "a", &format!("a{}", i))?;
        m.set_as_input(i, "b", &format!("b{}", i))?;
        m.set_as_input(i, "sel", "sel")?;
        m.set_as_output(i, "out", &format!("out{}", i))?;
    }
    Ok(m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mux_exhaustive() {
        let mut mux = mux().unwrap();
        for a in [false, true] {
            for b in [false, true] {
                for sel in [false, true] {
                    mux.set_input_values(&[a, b, sel]).unwrap();
                    mux.run(Clock::Low);
                    let expected = if sel { b } else { a };
                    assert_eq!(
                        mux.output_bit("out").unwrap(),
                        expected,
                        "a={} b={} sel={}",
                        a,
                        b,
                        sel
                    );
                }
            }
        }
    }

    #[test]
    fn test_mux4way() {
        let mut m = mux4way().unwrap();
        // Inputs are a, b, c, d; the selected one is d when sel1 sel0 = 11.
        for (sel1, sel0, expected) in [
            (false, false, "a"),
            (false, true, "b"),
            (true, false, "c"),
            (true, true, "d"),
        ] {
            for selected_high in [false, true] {
                m.set_inputs_labeled(&[
                    ("a", expected == "a" && selected_high),
                    ("b", expected == "b" && selected_high),
                    ("c", expected == "c" && selected_high),
                    ("d", expected == "d" && selected_high),
                    ("sel1", sel1),
                    ("sel0", sel0),
                ])
                .unwrap();
                m.run(Clock::Low);
                assert_eq!(
                    m.output_bit("out").unwrap(),
                    selected_high,
                    "sel={}{} expecting {}",
                    sel1 as u8,
                    sel0 as u8,
                    expected
                );
            }
        }
    }

    #[test]
    fn test_mux16() {
        let mut m = mux16().unwrap();
        m.set_input_group("a", 0xF0F0).unwrap();
        m.set_input_group("b", 0x0F0F).unwrap();

        m.set_inputs_labeled(&[("sel", false)]).unwrap();
        m.run(Clock::Low);
        assert_eq!(m.output_group_u64("out").unwrap(), 0xF0F0);

        m.set_inputs_labeled(&[("sel", true)]).unwrap();
        m.run(Clock::Low);
        assert_eq!(m.output_group_u64("out").unwrap(), 0x0F0F);
    }
}
