use super::block::{Block, Part};
use super::bus::Bus;
use super::error::SimError;
use super::node::{Clock, Node, NodeIndex, Signal};
use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::Path;

/// Index into a composite's pin table.
pub(super) type PinId = usize;

/// A participant in the circuitry map: a registered sub-block, or the
/// composite's own boundary acting as the root of the dependency graph.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
enum BlockKey {
    Root,
    Comp(usize),
}

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
enum PortDir {
    In,
    Out,
}

/// Where a pin lives: which block owns it, on which bus, at which
/// position.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
struct PinRef {
    owner: BlockKey,
    dir: PortDir,
    pos: usize,
}

/// One dependency-graph entry. Levels start unassigned at -1 and are
/// recomputed from scratch whenever the topology changes.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct CircuitryEntry {
    level: i32,
    same: SmallVec<[BlockKey; 2]>,
    children: SmallVec<[BlockKey; 4]>,
}

impl CircuitryEntry {
    fn new() -> CircuitryEntry {
        CircuitryEntry {
            level: -1,
            same: SmallVec::new(),
            children: SmallVec::new(),
        }
    }
}

/// A composite: a block with zero native transistors that owns a list
/// of cloned sub-blocks and evaluates them in dependency order.
///
/// The composite's connectivity is a pin graph: one vertex for every
/// boundary bus node and every sub-block bus node, with the wires the
/// designer declared as edges. Evaluation propagates the boundary
/// inputs inward, runs every sub-block in scheduled order and carries
/// each sub-block's outputs onward, treating every sub-block as an
/// opaque [Block].
///
/// Cross-coupled feedback (latches) is legal: mutually dependent
/// sub-blocks are promoted to same-level peers and their shared state
/// is carried by the pin nodes between successive clock cycles.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    nodes: Vec<Node>,
    inputs: Bus,
    outputs: Bus,
    components: Vec<Part>,
    pins: Vec<PinRef>,
    /// Per component: (input pin base, output pin base).
    comp_pins: Vec<(PinId, PinId)>,
    connections: Vec<IndexSet<PinId>>,
    /// Slot 0 is the root; component `i` lives in slot `i + 1`.
    circuitry: Vec<CircuitryEntry>,
    clocked: Vec<PinId>,
    #[serde(skip)]
    schedule: Option<Vec<usize>>,
    // Traversal scratch, allocated once instead of in the hot loop.
    #[serde(skip)]
    visited: FixedBitSet,
    #[serde(skip)]
    stack: Vec<PinId>,
}

impl Circuit {
    /// Allocates a composite with zero native transistors.
    pub fn new(
        name: &str,
        input_labels: &[&str],
        output_labels: &[&str],
    ) -> Result<Circuit, SimError> {
        let n_in = input_labels.len();
        let n_out = output_labels.len();
        let nodes = vec![Node::new(); n_in + n_out];
        let input_ids = (0..n_in).map(NodeIndex::new).collect();
        let output_ids = (n_in..n_in + n_out).map(NodeIndex::new).collect();
        let inputs = Bus::with_labels(name, input_ids, input_labels)?;
        let outputs = Bus::with_labels(name, output_ids, output_labels)?;

        let mut pins = Vec::with_capacity(n_in + n_out);
        for pos in 0..n_in {
            pins.push(PinRef {
                owner: BlockKey::Root,
                dir: PortDir::In,
                pos,
            });
        }
        for pos in 0..n_out {
            pins.push(PinRef {
                owner: BlockKey::Root,
                dir: PortDir::Out,
                pos,
            });
        }
        let connections = vec![IndexSet::new(); pins.len()];

        Ok(Circuit {
            name: name.into(),
            nodes,
            inputs,
            outputs,
            components: Vec::new(),
            pins,
            comp_pins: Vec::new(),
            connections,
            circuitry: vec![CircuitryEntry::new()],
            clocked: Vec::new(),
            schedule: None,
            visited: FixedBitSet::default(),
            stack: Vec::new(),
        })
    }

    fn err(&self, reason: String) -> SimError {
        SimError::MalformedNetlist {
            block: self.name.clone(),
            reason,
        }
    }

    fn slot(key: BlockKey) -> usize {
        match key {
            BlockKey::Root => 0,
            BlockKey::Comp(i) => i + 1,
        }
    }

    fn key(slot: usize) -> BlockKey {
        if slot == 0 {
            BlockKey::Root
        } else {
            BlockKey::Comp(slot - 1)
        }
    }

    /// Appends a clone of `prototype` as a sub-block and returns its
    /// positional index (declaration order).
    ///
    /// The clone rebuilds fresh nodes and fresh adjacency: placing two
    /// copies of the same part produces two independent state carriers.
    pub fn add_component<B: Clone + Into<Part>>(&mut self, prototype: &B) -> usize {
        let part: Part = prototype.clone().into();
        let index = self.components.len();
        let in_base = self.pins.len();
        for pos in 0..part.inputs().len() {
            self.pins.push(PinRef {
                owner: BlockKey::Comp(index),
                dir: PortDir::In,
                pos,
            });
            self.connections.push(IndexSet::new());
        }
        let out_base = self.pins.len();
        for pos in 0..part.outputs().len() {
            self.pins.push(PinRef {
                owner: BlockKey::Comp(index),
                dir: PortDir::Out,
                pos,
            });
            self.connections.push(IndexSet::new());
        }
        self.comp_pins.push((in_base, out_base));
        self.components.push(part);
        self.circuitry.push(CircuitryEntry::new());
        self.schedule = None;
        index
    }

    /// Appends `count` clones of `prototype`; returns their indices.
    pub fn add_component_n<B: Clone + Into<Part>>(
        &mut self,
        prototype: &B,
        count: usize,
    ) -> std::ops::Range<usize> {
        let start = self.components.len();
        for _ in 0..count {
            self.add_component(prototype);
        }
        start..start + count
    }

    pub fn components(&self) -> &[Part] {
        &self.components
    }

    /// Resolves `(component, port)` to a pin, preferring input labels
    /// when a label appears on both buses.
    fn comp_pin(&self, index: usize, port: &str) -> Result<(PinId, PortDir), SimError> {
        let comp = self
            .components
            .get(index)
            .ok_or_else(|| self.err(format!("component {} is not registered", index)))?;
        if let Some(pos) = comp.inputs().position(port) {
            return Ok((self.comp_pins[index].0 + pos, PortDir::In));
        }
        if let Some(pos) = comp.outputs().position(port) {
            return Ok((self.comp_pins[index].1 + pos, PortDir::Out));
        }
        Err(SimError::UnknownLabel {
            block: format!("{}.{}", self.name, comp.name()),
            label: port.into(),
        })
    }

    fn entry_mut(&mut self, key: BlockKey) -> &mut CircuitryEntry {
        &mut self.circuitry[Self::slot(key)]
    }

    fn add_child(&mut self, parent: BlockKey, child: BlockKey) {
        let entry = self.entry_mut(parent);
        if !entry.children.contains(&child) {
            entry.children.push(child);
        }
    }

    fn add_same(&mut self, from: BlockKey, to: BlockKey) {
        let entry = self.entry_mut(from);
        if !entry.same.contains(&to) {
            entry.same.push(to);
        }
    }

    /// Wires two sub-block ports together and records the dependency:
    /// output→input makes the consumer a child, input↔input makes the
    /// two sub-blocks same-level peers, output↔output is illegal.
    pub fn connect(
        &mut self,
        ia: usize,
        port_a: &str,
        ib: usize,
        port_b: &str,
    ) -> Result<(), SimError> {
        let (pin_a, dir_a) = self.comp_pin(ia, port_a)?;
        let (pin_b, dir_b) = self.comp_pin(ib, port_b)?;
        match (dir_a, dir_b) {
            (PortDir::Out, PortDir::Out) => {
                return Err(self.err(format!(
                    "connection {}:{} to {}:{} not allowed (both outputs)",
                    ia, port_a, ib, port_b
                )));
            }
            (PortDir::Out, PortDir::In) => {
                self.add_child(BlockKey::Comp(ia), BlockKey::Comp(ib));
            }
            (PortDir::In, PortDir::Out) => {
                self.add_child(BlockKey::Comp(ib), BlockKey::Comp(ia));
            }
            (PortDir::In, PortDir::In) => {
                self.add_same(BlockKey::Comp(ia), BlockKey::Comp(ib));
            }
        }
        self.connections[pin_a].insert(pin_b);
        self.connections[pin_b].insert(pin_a);
        self.schedule = None;
        Ok(())
    }

    /// Routes the external input `label` to a sub-block port. The wire
    /// is unidirectional: the boundary drives the pin, never the
    /// reverse.
    pub fn set_as_input(&mut self, index: usize, port: &str, label: &str) -> Result<(), SimError> {
        let (pin, _) = self.comp_pin(index, port)?;
        let pos = self
            .inputs
            .position(label)
            .ok_or_else(|| SimError::UnknownLabel {
                block: self.name.clone(),
                label: label.into(),
            })?;
        self.connections[pos].insert(pin);
        self.add_child(BlockKey::Root, BlockKey::Comp(index));
        self.schedule = None;
        Ok(())
    }

    /// Routes a sub-block port to the external output `label`,
    /// unidirectionally.
    pub fn set_as_output(&mut self, index: usize, port: &str, label: &str) -> Result<(), SimError> {
        let (pin, _) = self.comp_pin(index, port)?;
        let pos = self
            .outputs
            .position(label)
            .ok_or_else(|| SimError::UnknownLabel {
                block: self.name.clone(),
                label: label.into(),
            })?;
        self.connections[pin].insert(self.inputs.len() + pos);
        self.add_child(BlockKey::Comp(index), BlockKey::Root);
        self.schedule = None;
        Ok(())
    }

    /// Permanently forces a sub-block input port High (a literal 1).
    pub fn set_high_input(&mut self, index: usize, port: &str) -> Result<(), SimError> {
        self.force_pin(index, port, Signal::High)
    }

    /// Permanently forces a sub-block input port Low (a literal 0).
    pub fn set_low_input(&mut self, index: usize, port: &str) -> Result<(), SimError> {
        self.force_pin(index, port, Signal::Low)
    }

    fn force_pin(&mut self, index: usize, port: &str, value: Signal) -> Result<(), SimError> {
        let (pin, dir) = self.comp_pin(index, port)?;
        if dir != PortDir::In {
            return Err(self.err(format!("cannot force output port {}:{}", index, port)));
        }
        let pos = self.pins[pin].pos;
        self.components[index].force_input(pos, value);
        Ok(())
    }

    /// Marks a sub-block input port as clock-gated: its effective value
    /// is the wire value ANDed with the clock phase of every run.
    pub fn set_as_clock(&mut self, index: usize, port: &str) -> Result<(), SimError> {
        let (pin, dir) = self.comp_pin(index, port)?;
        if dir != PortDir::In {
            return Err(self.err(format!("cannot clock-gate output port {}:{}", index, port)));
        }
        if !self.clocked.contains(&pin) {
            self.clocked.push(pin);
        }
        Ok(())
    }

    fn pin_signal(&self, pin: PinId) -> Signal {
        let r = self.pins[pin];
        match (r.owner, r.dir) {
            (BlockKey::Root, PortDir::In) => self.nodes[self.inputs.id(r.pos).idx].value,
            (BlockKey::Root, PortDir::Out) => self.nodes[self.outputs.id(r.pos).idx].value,
            (BlockKey::Comp(i), PortDir::In) => self.components[i].input_signal(r.pos),
            (BlockKey::Comp(i), PortDir::Out) => self.components[i].output_signal(r.pos),
        }
    }

    fn set_pin_signal(&mut self, pin: PinId, value: Signal) {
        let r = self.pins[pin];
        match (r.owner, r.dir) {
            (BlockKey::Root, PortDir::In) => self.nodes[self.inputs.id(r.pos).idx].set(value),
            (BlockKey::Root, PortDir::Out) => self.nodes[self.outputs.id(r.pos).idx].set(value),
            (BlockKey::Comp(i), PortDir::In) => self.components[i].set_input_signal(r.pos, value),
            (BlockKey::Comp(i), PortDir::Out) => self.components[i].set_output_signal(r.pos, value),
        }
    }

    /// Copies signal values through the pin graph starting at `origin`,
    /// with the same predecessor-copy semantics as the flat gate
    /// traversal.
    fn propagate_pin(&mut self, origin: PinId) {
        self.visited.grow(self.pins.len());
        self.visited.clear();
        self.stack.clear();
        self.visited.insert(origin);
        self.stack.push(origin);
        while let Some(from) = self.stack.pop() {
            let value = self.pin_signal(from);
            for k in 0..self.connections[from].len() {
                let to = match self.connections[from].get_index(k) {
                    Some(&to) => to,
                    None => continue,
                };
                if !self.visited.contains(to) {
                    self.visited.insert(to);
                    self.set_pin_signal(to, value);
                    self.stack.push(to);
                }
            }
        }
    }

    /// Promotes every mutually dependent child pair (cross-coupled
    /// blocks) to symmetric same-level peers, so a strict child order is
    /// never forced on feedback.
    fn reconcile_cycles(&mut self) {
        for a in 0..self.circuitry.len() {
            let a_key = Self::key(a);
            let children: Vec<BlockKey> = self.circuitry[a].children.to_vec();
            for c in children {
                let c_slot = Self::slot(c);
                if self.circuitry[c_slot].children.contains(&a_key) {
                    self.circuitry[a].children.retain(|k| *k != c);
                    self.circuitry[c_slot].children.retain(|k| *k != a_key);
                    self.add_same(a_key, c);
                    self.add_same(c, a_key);
                }
            }
        }
    }

    /// Assigns dependency levels and returns the evaluation order:
    /// components sorted by ascending level, stable on declaration
    /// order.
    ///
    /// Iterative relaxation from the root: a child is pushed to
    /// `parent + 1`, a same-level peer inherits the parent's level if
    /// higher and is then re-relaxed through its own children. Levels
    /// are capped at the component count; hitting the cap means a
    /// feedback loop the mutual-pair rule could not collapse, which is
    /// logged and otherwise ignored so evaluation stays total.
    fn compute_schedule(&mut self) -> Vec<usize> {
        self.reconcile_cycles();
        for entry in &mut self.circuitry {
            entry.level = -1;
        }
        let cap = self.components.len() as i32;
        let mut work: Vec<(BlockKey, i32)> = vec![(BlockKey::Root, 0)];
        while let Some((key, level)) = work.pop() {
            let slot = Self::slot(key);
            if level <= self.circuitry[slot].level {
                continue;
            }
            if level > cap {
                warn!(
                    "{}: level cap {} hit, feedback loop not collapsed by peer promotion",
                    self.name, cap
                );
                continue;
            }
            self.circuitry[slot].level = level;
            for peer in self.circuitry[slot].same.clone() {
                if let BlockKey::Comp(_) = peer {
                    if self.circuitry[Self::slot(peer)].level < level {
                        work.push((peer, level));
                    }
                }
            }
            for child in self.circuitry[slot].children.clone() {
                if let BlockKey::Comp(_) = child {
                    work.push((child, level + 1));
                }
            }
        }

        let mut order: Vec<usize> = (0..self.components.len()).collect();
        order.sort_by_key(|&i| self.circuitry[i + 1].level);
        debug!(
            "{}: schedule {:?}",
            self.name,
            order
                .iter()
                .map(|&i| (i, self.circuitry[i + 1].level))
                .collect::<Vec<_>>()
        );
        order
    }

    /// Dumps the pin graph in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format
    /// to `path`.
    pub fn dump_dot(&self, path: &Path) -> Result<(), SimError> {
        use petgraph::dot::{Config, Dot};
        use std::io::Write;
        let mut f = std::fs::File::create(path)?;
        let mut graph = petgraph::Graph::<_, ()>::new();
        let index: Vec<_> = (0..self.pins.len())
            .map(|pin| graph.add_node(self.pin_name(pin)))
            .collect();
        for (from, neighbors) in self.connections.iter().enumerate() {
            graph.extend_with_edges(neighbors.iter().map(|&to| (index[from], index[to])));
        }
        write!(f, "{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))?;
        Ok(())
    }

    fn pin_name(&self, pin: PinId) -> String {
        let r = self.pins[pin];
        match (r.owner, r.dir) {
            (BlockKey::Root, PortDir::In) => format!("in:{}", self.inputs.label(r.pos)),
            (BlockKey::Root, PortDir::Out) => format!("out:{}", self.outputs.label(r.pos)),
            (BlockKey::Comp(i), PortDir::In) => {
                format!("{}#{}.{}", self.components[i].name(), i, self.components[i].inputs().label(r.pos))
            }
            (BlockKey::Comp(i), PortDir::Out) => {
                format!("{}#{}.{}", self.components[i].name(), i, self.components[i].outputs().label(r.pos))
            }
        }
    }
}

impl Block for Circuit {
    fn name(&self) -> &str {
        &self.name
    }

    fn inputs(&self) -> &Bus {
        &self.inputs
    }

    fn outputs(&self) -> &Bus {
        &self.outputs
    }

    fn transistor_count(&self) -> usize {
        self.components.iter().map(|c| c.transistor_count()).sum()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
        for component in &mut self.components {
            component.reset();
        }
    }

    /// One evaluation cycle under `clock`.
    ///
    /// Boundary inputs are propagated onto sub-block pins, sub-blocks
    /// run in scheduled order, and every sub-block's outputs are
    /// propagated onward as soon as it has run. The clock phase recurses
    /// into nested composites.
    fn run(&mut self, clock: Clock) {
        // Clock-gated pins forget the previous phase; everything else
        // retains its value so latch feedback survives between cycles.
        for k in 0..self.clocked.len() {
            let pin = self.clocked[k];
            self.set_pin_signal(pin, Signal::Unknown);
        }
        for pos in 0..self.inputs.len() {
            self.propagate_pin(pos);
        }
        if self.schedule.is_none() {
            self.schedule = Some(self.compute_schedule());
        }
        let order = self.schedule.clone().unwrap_or_default();
        for &ci in &order {
            for k in 0..self.clocked.len() {
                let pin = self.clocked[k];
                if let BlockKey::Comp(owner) = self.pins[pin].owner {
                    if owner == ci {
                        let wired = self.pin_signal(pin);
                        self.set_pin_signal(pin, wired.gated(clock));
                    }
                }
            }
            self.components[ci].run(clock);
            let (_, out_base) = self.comp_pins[ci];
            for pos in 0..self.components[ci].outputs().len() {
                self.propagate_pin(out_base + pos);
            }
        }
    }

    fn input_signal(&self, position: usize) -> Signal {
        self.nodes[self.inputs.id(position).idx].value
    }

    fn set_input_signal(&mut self, position: usize, value: Signal) {
        self.nodes[self.inputs.id(position).idx].set(value);
    }

    fn output_signal(&self, position: usize) -> Signal {
        self.nodes[self.outputs.id(position).idx].value
    }

    fn set_output_signal(&mut self, position: usize, value: Signal) {
        self.nodes[self.outputs.id(position).idx].set(value);
    }

    fn force_input(&mut self, position: usize, value: Signal) {
        self.nodes[self.inputs.id(position).idx].force(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Terminal;
    use crate::Gate;

    fn not_gate() -> Gate {
        let mut not = Gate::new("Not", 1, &["in"], &["out"]).unwrap();
        not.set_as_vcc(0, Terminal::C).unwrap();
        not.set_as_gnd(0, Terminal::E).unwrap();
        not.set_as_input(0, Terminal::B, "in").unwrap();
        not.set_as_output(0, Terminal::C, "out").unwrap();
        not
    }

    fn nor_gate() -> Gate {
        let mut nor = Gate::new("Nor", 2, &["a", "b"], &["out"]).unwrap();
        nor.set_as_vcc(0, Terminal::C).unwrap();
        nor.set_as_gnd(1, Terminal::E).unwrap();
        nor.connect(0, Terminal::C, 1, Terminal::C).unwrap();
        nor.connect(0, Terminal::E, 1, Terminal::E).unwrap();
        nor.set_as_input(0, Terminal::B, "a").unwrap();
        nor.set_as_input(1, Terminal::B, "b").unwrap();
        nor.set_as_output(1, Terminal::C, "out").unwrap();
        nor
    }

    /// Two chained inverters: a buffer.
    fn buffer() -> Circuit {
        let not = not_gate();
        let mut buffer = Circuit::new("Buffer", &["in"], &["out"]).unwrap();
        buffer.add_component_n(&not, 2);
        buffer.set_as_input(0, "in", "in").unwrap();
        buffer.connect(0, "out", 1, "in").unwrap();
        buffer.set_as_output(1, "out", "out").unwrap();
        buffer
    }

    #[test]
    fn test_double_negation_is_identity() {
        let mut buffer = buffer();
        for input in [false, true] {
            buffer.set_input_values(&[input]).unwrap();
            buffer.run(Clock::Low);
            assert_eq!(buffer.output_bit("out").unwrap(), input);
        }
    }

    #[test]
    fn test_chain_levels_follow_the_data_flow() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut buffer = buffer();
        buffer.run(Clock::Low);
        assert_eq!(buffer.circuitry[1].level, 1);
        assert_eq!(buffer.circuitry[2].level, 2);
    }

    #[test]
    fn test_output_to_output_is_rejected() {
        let not = not_gate();
        let mut c = Circuit::new("Bad", &["in"], &["out"]).unwrap();
        c.add_component_n(&not, 2);
        assert!(matches!(
            c.connect(0, "out", 1, "out"),
            Err(SimError::MalformedNetlist { .. })
        ));
    }

    #[test]
    fn test_unregistered_component_is_rejected() {
        let mut c = Circuit::new("Empty", &["in"], &["out"]).unwrap();
        assert!(matches!(
            c.set_as_input(0, "in", "in"),
            Err(SimError::MalformedNetlist { .. })
        ));
    }

    #[test]
    fn test_cross_coupled_pair_becomes_peers() {
        // An SR latch: two cross-coupled Nors.
        let nor = nor_gate();
        let mut latch = Circuit::new("SrLatch", &["s", "r"], &["q"]).unwrap();
        latch.add_component_n(&nor, 2);
        latch.set_as_input(0, "a", "r").unwrap();
        latch.set_as_input(1, "a", "s").unwrap();
        latch.connect(0, "out", 1, "b").unwrap();
        latch.connect(1, "out", 0, "b").unwrap();
        latch.set_as_output(0, "out", "q").unwrap();

        latch.set_inputs_labeled(&[("s", true), ("r", false)]).unwrap();
        latch.run(Clock::Low);
        latch.set_inputs_labeled(&[("s", false), ("r", false)]).unwrap();
        latch.run(Clock::Low);
        assert_eq!(latch.output_bit("q").unwrap(), true);

        latch.set_inputs_labeled(&[("s", false), ("r", true)]).unwrap();
        latch.run(Clock::Low);
        latch.set_inputs_labeled(&[("s", false), ("r", false)]).unwrap();
        latch.run(Clock::Low);
        assert_eq!(latch.output_bit("q").unwrap(), false);

        // Both ended up peers at the same level.
        assert_eq!(latch.circuitry[1].level, latch.circuitry[2].level);
        assert!(latch.circuitry[1].same.contains(&BlockKey::Comp(1)));
        assert!(latch.circuitry[2].same.contains(&BlockKey::Comp(0)));
    }

    #[test]
    fn test_forced_inputs_survive_runs() {
        let not = not_gate();
        let mut c = Circuit::new("Const", &["unused"], &["out"]).unwrap();
        c.add_component(&not);
        c.set_high_input(0, "in").unwrap();
        c.set_as_output(0, "out", "out").unwrap();
        for _ in 0..3 {
            c.run(Clock::Low);
            assert_eq!(c.output_bit("out").unwrap(), false);
        }
    }

    #[test]
    fn test_clone_is_independent() {
        let mut buffer = buffer();
        let mut copy = buffer.clone();
        buffer.set_input_values(&[true]).unwrap();
        buffer.run(Clock::Low);

        // The clone did not observe the original's run.
        copy.set_input_values(&[false]).unwrap();
        copy.run(Clock::Low);
        assert_eq!(buffer.output_bit("out").unwrap(), true);
        assert_eq!(copy.output_bit("out").unwrap(), false);
    }
}
