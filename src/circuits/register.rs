use super::latch::bit;
use crate::graph::*;

/// Returns a 16-bit [register](https://en.wikipedia.org/wiki/Hardware_register):
/// sixteen [bit] cells sharing one `load` line and the global clock.
///
/// Inputs `in15 … in0` plus `load`, outputs `out15 … out0`.
pub fn register16() -> Result<Circuit, SimError> {
    let mut input_labels = labels("in", 16);
    input_labels.push("load".into());
    let input_labels: Vec<&str> = input_labels.iter().map(String::as_str).collect();
    let output_labels = labels("out", 16);
    let output_labels: Vec<&str> = output_labels.iter().map(String::as_str).collect();

    let mut register = Circuit::new("Register", &input_labels, &output_labels)?;
    register.add_component_n(&bit()?, 16);
    for i in 0..16 {
        register.set_as_input(i, "in", &format!("in{}", i))?;
        register.set_as_input(i, "load", "load")?;
        register.set_as_output(i, "out", &format!("out{}", i))?;
    }
    Ok(register)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(register: &mut Circuit, value: i64, load: bool) -> u64 {
        register.set_input_group("in", value).unwrap();
        register.set_inputs_labeled(&[("load", load)]).unwrap();
        register.tick();
        register.output_group_u64("out").unwrap()
    }

    #[test]
    fn test_register_loads_and_holds() {
        let mut register = register16().unwrap();

        assert_eq!(tick(&mut register, 0x5555, true), 0x5555);
        assert_eq!(tick(&mut register, 0xFFFF, false), 0x5555);
        assert_eq!(tick(&mut register, 0x0000, false), 0x5555);
        assert_eq!(tick(&mut register, 0xAAAA, true), 0xAAAA);
        assert_eq!(tick(&mut register, 0xFFFF, false), 0xAAAA);
        assert_eq!(tick(&mut register, 0x0000, true), 0x0000);
    }

    #[test]
    fn test_register_width() {
        let register = register16().unwrap();
        assert_eq!(register.inputs().len(), 17);
        assert_eq!(register.outputs().len(), 16);
        // 16 bits of 6 sub-blocks: 1 + 2 + 2 + 2 + 2 + 2 transistors.
        assert_eq!(register.transistor_count(), 16 * 11);
    }
}
