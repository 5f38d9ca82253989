use super::block::{Block, Part};
use super::error::SimError;
use super::node::Signal;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// A directory of saved parts.
///
/// Every part is serialized under `<name>.sim`; loading returns a fresh
/// clone, so a library doubles as a prototype store: load the same name
/// twice and you get two independent state carriers.
///
/// # Examples
/// ```no_run
/// # use switchsim::graph::{Library, Gate, Terminal, Block};
/// let library = Library::open("lib").unwrap();
///
/// let mut not = Gate::new("Not", 1, &["in"], &["out"]).unwrap();
/// not.set_as_vcc(0, Terminal::C).unwrap();
/// not.set_as_gnd(0, Terminal::E).unwrap();
/// not.set_as_input(0, Terminal::B, "in").unwrap();
/// not.set_as_output(0, Terminal::C, "out").unwrap();
/// library.save(&not).unwrap();
///
/// let fresh = library.load("Not").unwrap();
/// assert_eq!(fresh.name(), "Not");
/// ```
pub struct Library {
    dir: PathBuf,
}

impl Library {
    /// Opens (and creates, if needed) the library at `dir`, persisting
    /// the rail constants once at initialization.
    pub fn open<P: Into<PathBuf>>(dir: P) -> Result<Library, SimError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let library = Library { dir };
        library.persist_constant("VCC", Signal::High)?;
        library.persist_constant("GND", Signal::Low)?;
        Ok(library)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn persist_constant(&self, name: &str, value: Signal) -> Result<(), SimError> {
        let path = self.path_of(name);
        if !path.exists() {
            fs::write(&path, serde_json::to_vec(&value)?)?;
        }
        Ok(())
    }

    /// The on-disk path of `name`, with the `.sim` suffix appended when
    /// missing.
    fn path_of(&self, name: &str) -> PathBuf {
        if name.ends_with(".sim") {
            self.dir.join(name)
        } else {
            self.dir.join(format!("{}.sim", name))
        }
    }

    /// Serializes `part` under its own name.
    pub fn save<B: Clone + Into<Part>>(&self, part: &B) -> Result<(), SimError> {
        let part: Part = part.clone().into();
        let name = part.name().to_string();
        self.save_as(&part, &name)
    }

    /// Serializes `part` under an explicit `name`.
    pub fn save_as<B: Clone + Into<Part>>(&self, part: &B, name: &str) -> Result<(), SimError> {
        let part: Part = part.clone().into();
        let path = self.path_of(name);
        fs::write(&path, serde_json::to_vec(&part)?)?;
        info!("saved {} to {}", part.name(), path.display());
        Ok(())
    }

    /// Reads back the part saved under `name` as a fresh clone.
    pub fn load(&self, name: &str) -> Result<Part, SimError> {
        let path = self.path_of(name);
        let bytes = fs::read(&path)?;
        let part = serde_json::from_slice(&bytes)?;
        info!("loaded {} from {}", name, path.display());
        Ok(part)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Clock, Gate, Terminal};

    fn not_gate() -> Gate {
        let mut not = Gate::new("Not", 1, &["in"], &["out"]).unwrap();
        not.set_as_vcc(0, Terminal::C).unwrap();
        not.set_as_gnd(0, Terminal::E).unwrap();
        not.set_as_input(0, Terminal::B, "in").unwrap();
        not.set_as_output(0, Terminal::C, "out").unwrap();
        not
    }

    #[test]
    fn test_rails_are_persisted_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).unwrap();
        assert!(library.dir().join("VCC.sim").exists());
        assert!(library.dir().join("GND.sim").exists());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).unwrap();
        library.save(&not_gate()).unwrap();

        let mut original = not_gate();
        let mut loaded = library.load("Not").unwrap();
        for input in [false, true] {
            original.set_input_values(&[input]).unwrap();
            loaded.set_input_values(&[input]).unwrap();
            original.run(Clock::Low);
            loaded.run(Clock::Low);
            assert_eq!(
                original.output_value("out").unwrap(),
                loaded.output_value("out").unwrap()
            );
        }
    }

    #[test]
    fn test_suffix_is_appended_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).unwrap();
        library.save_as(&not_gate(), "inverter").unwrap();
        assert!(library.dir().join("inverter.sim").exists());
        assert!(library.load("inverter.sim").is_ok());
    }

    #[test]
    fn test_missing_part_is_a_persistence_failure() {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::open(dir.path()).unwrap();
        assert!(matches!(
            library.load("nope"),
            Err(SimError::Persistence(_))
        ));
    }
}
