use super::block::Block;
use super::bus::Bus;
use super::error::SimError;
use super::node::{Clock, Node, NodeIndex, Signal, GND, VCC};
use super::transistor::{Terminal, Transistor};
use fixedbitset::FixedBitSet;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::path::Path;

/// A flat transistor network: the base evaluable unit of the simulator.
///
/// Conceptually a gate is an undirected graph of wires. Its vertices
/// are the two supply rails, the input and output bus nodes and every
/// transistor terminal; its edges are the wires declared by the
/// designer plus the dynamic collector-emitter bridges. There are no
/// built-in truth tables: behavior emerges from whether a conductive
/// path exists from VCC to GND once the bridges have switched.
///
/// # Examples
/// ```
/// # use switchsim::graph::{Gate, Terminal, Block, Clock};
/// let mut not = Gate::new("Not", 1, &["in"], &["out"]).unwrap();
/// not.set_as_vcc(0, Terminal::C).unwrap();
/// not.set_as_gnd(0, Terminal::E).unwrap();
/// not.set_as_input(0, Terminal::B, "in").unwrap();
/// not.set_as_output(0, Terminal::C, "out").unwrap();
///
/// not.set_input_values(&[false]).unwrap();
/// not.run(Clock::Low);
/// assert_eq!(not.output_bit("out").unwrap(), true);
///
/// not.set_input_values(&[true]).unwrap();
/// not.run(Clock::Low);
/// assert_eq!(not.output_bit("out").unwrap(), false);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Gate {
    name: String,
    nodes: Vec<Node>,
    inputs: Bus,
    outputs: Bus,
    transistors: Vec<Transistor>,
    connections: Vec<IndexSet<NodeIndex>>,
    /// Per output position: true if the output was tapped on the
    /// collector side.
    inverted: Vec<bool>,
    // Traversal scratch, allocated once instead of in the hot loop.
    #[serde(skip)]
    visited: FixedBitSet,
    #[serde(skip)]
    stack: Vec<NodeIndex>,
}

impl Gate {
    /// Allocates an empty transistor network.
    ///
    /// The arena reserves slot 0 for GND and slot 1 for VCC, then holds
    /// the input bus, the output bus and B/C/E for every transistor.
    pub fn new(
        name: &str,
        n_transistors: usize,
        input_labels: &[&str],
        output_labels: &[&str],
    ) -> Result<Gate, SimError> {
        let mut nodes = vec![Node::constant(Signal::Low), Node::constant(Signal::High)];

        let mint = |n: usize, nodes: &mut Vec<Node>| -> SmallVec<[NodeIndex; 4]> {
            (0..n)
                .map(|_| {
                    nodes.push(Node::new());
                    NodeIndex::new(nodes.len() - 1)
                })
                .collect()
        };

        let input_ids = mint(input_labels.len(), &mut nodes);
        let output_ids = mint(output_labels.len(), &mut nodes);
        let inputs = Bus::with_labels(name, input_ids, input_labels)?;
        let outputs = Bus::with_labels(name, output_ids, output_labels)?;

        let transistors = (0..n_transistors)
            .map(|_| {
                let terminals = mint(3, &mut nodes);
                Transistor::new(terminals[0], terminals[1], terminals[2])
            })
            .collect();

        let connections = vec![IndexSet::new(); nodes.len()];
        let inverted = vec![false; output_labels.len()];
        Ok(Gate {
            name: name.into(),
            nodes,
            inputs,
            outputs,
            transistors,
            connections,
            inverted,
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

    fn terminal(&self, q: usize, terminal: Terminal) -> Result<NodeIndex, SimError> {
        self.transistors
            .get(q)
            .map(|t| t.terminal(terminal))
            .ok_or_else(|| self.err(format!("transistor {} is not registered", q)))
    }

    fn connect_nodes(&mut self, a: NodeIndex, b: NodeIndex) {
        self.connections[a.idx].insert(b);
        self.connections[b.idx].insert(a);
    }

    fn disconnect_nodes(&mut self, a: NodeIndex, b: NodeIndex) {
        self.connections[a.idx].shift_remove(&b);
        self.connections[b.idx].shift_remove(&a);
    }

    /// Wires two transistor terminals together.
    pub fn connect(
        &mut self,
        qa: usize,
        ta: Terminal,
        qb: usize,
        tb: Terminal,
    ) -> Result<(), SimError> {
        let a = self.terminal(qa, ta)?;
        let b = self.terminal(qb, tb)?;
        self.connect_nodes(a, b);
        Ok(())
    }

    /// Removes a declared wire between two transistor terminals.
    pub fn disconnect(
        &mut self,
        qa: usize,
        ta: Terminal,
        qb: usize,
        tb: Terminal,
    ) -> Result<(), SimError> {
        let a = self.terminal(qa, ta)?;
        let b = self.terminal(qb, tb)?;
        self.disconnect_nodes(a, b);
        Ok(())
    }

    /// Routes the external input `label` to a transistor terminal.
    pub fn set_as_input(&mut self, q: usize, t: Terminal, label: &str) -> Result<(), SimError> {
        let terminal = self.terminal(q, t)?;
        let pin = self
            .inputs
            .id_of(label)
            .ok_or_else(|| SimError::UnknownLabel {
                block: self.name.clone(),
                label: label.into(),
            })?;
        self.connect_nodes(terminal, pin);
        Ok(())
    }

    /// Routes a transistor terminal to the external output `label`.
    ///
    /// The tap side is recorded as the output polarity: collector taps
    /// are inverted, emitter taps are not.
    pub fn set_as_output(&mut self, q: usize, t: Terminal, label: &str) -> Result<(), SimError> {
        let terminal = self.terminal(q, t)?;
        let position = self
            .outputs
            .position(label)
            .ok_or_else(|| SimError::UnknownLabel {
                block: self.name.clone(),
                label: label.into(),
            })?;
        let pin = self.outputs.id(position);
        self.connect_nodes(terminal, pin);
        self.inverted[position] = t == Terminal::C;
        Ok(())
    }

    /// Ties a transistor terminal to the VCC rail.
    pub fn set_as_vcc(&mut self, q: usize, t: Terminal) -> Result<(), SimError> {
        let terminal = self.terminal(q, t)?;
        self.connect_nodes(terminal, VCC);
        Ok(())
    }

    /// Ties a transistor terminal to the GND rail.
    pub fn set_as_gnd(&mut self, q: usize, t: Terminal) -> Result<(), SimError> {
        let terminal = self.terminal(q, t)?;
        self.connect_nodes(terminal, GND);
        Ok(())
    }

    pub fn transistors(&self) -> &[Transistor] {
        &self.transistors
    }

    /// Returns true if the adjacency currently holds an edge between
    /// `a` and `b`.
    pub fn are_connected(&self, a: NodeIndex, b: NodeIndex) -> bool {
        self.connections[a.idx].contains(&b)
    }

    /// Copies signal values through the node graph starting at
    /// `origin`.
    ///
    /// Iterative DFS with an explicit stack; each visited node copies
    /// the value of the node it was discovered from, so a
    /// non-changeable node (a rail or a forced constant) refuses the
    /// write and re-sources its own value downstream.
    fn propagate(&mut self, origin: NodeIndex) {
        self.visited.grow(self.nodes.len());
        self.visited.clear();
        self.stack.clear();
        self.visited.insert(origin.idx);
        self.stack.push(origin);
        while let Some(from) = self.stack.pop() {
            let value = self.nodes[from.idx].value;
            for &to in &self.connections[from.idx] {
                if !self.visited.contains(to.idx) {
                    self.visited.insert(to.idx);
                    self.nodes[to.idx].set(value);
                    self.stack.push(to);
                }
            }
        }
    }

    /// Returns true if a conductive path exists from VCC to GND through
    /// the current adjacency, bridges included.
    fn is_short_circuit(&mut self) -> bool {
        self.visited.grow(self.nodes.len());
        self.visited.clear();
        self.stack.clear();
        self.visited.insert(VCC.idx);
        self.stack.push(VCC);
        while let Some(from) = self.stack.pop() {
            if from == GND {
                return true;
            }
            for &to in &self.connections[from.idx] {
                if !self.visited.contains(to.idx) {
                    self.visited.insert(to.idx);
                    self.stack.push(to);
                }
            }
        }
        false
    }

    /// The transistor logic step: every bridge switches from its base
    /// value and the C-E adjacency edges are rewired to match.
    fn logic(&mut self) {
        for i in 0..self.transistors.len() {
            let q = self.transistors[i];
            let closed = self.nodes[q.base.idx].value.is_high();
            self.transistors[i].bridge = closed;
            if closed {
                self.connections[q.collector.idx].insert(q.emitter);
                self.connections[q.emitter.idx].insert(q.collector);
            } else {
                self.connections[q.collector.idx].shift_remove(&q.emitter);
                self.connections[q.emitter.idx].shift_remove(&q.collector);
            }
        }
    }

    /// Dumps the node graph in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language)) format
    /// to `path`, to be visualized by many supported tools.
    pub fn dump_dot(&self, path: &Path) -> Result<(), SimError> {
        use petgraph::dot::{Config, Dot};
        use std::io::Write;
        let mut f = std::fs::File::create(path)?;
        let mut graph = petgraph::Graph::<_, ()>::new();
        let index: Vec<_> = (0..self.nodes.len())
            .map(|i| graph.add_node(self.node_name(NodeIndex::new(i))))
            .collect();
        for (from, neighbors) in self.connections.iter().enumerate() {
            graph.extend_with_edges(
                neighbors
                    .iter()
                    .filter(|to| from < to.idx)
                    .map(|to| (index[from], index[to.idx])),
            );
        }
        write!(f, "{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel]))?;
        Ok(())
    }

    /// Human-readable name of an arena node, for graph dumps.
    fn node_name(&self, id: NodeIndex) -> String {
        if id == GND {
            return "GND".into();
        }
        if id == VCC {
            return "VCC".into();
        }
        if let Some(p) = self.inputs.ids().iter().position(|&i| i == id) {
            return format!("in:{}", self.inputs.label(p));
        }
        if let Some(p) = self.outputs.ids().iter().position(|&i| i == id) {
            return format!("out:{}", self.outputs.label(p));
        }
        for (qi, q) in self.transistors.iter().enumerate() {
            for t in [Terminal::B, Terminal::C, Terminal::E] {
                if q.terminal(t) == id {
                    return format!("Q{}.{}", qi, t);
                }
            }
        }
        format!("n{}", id)
    }
}

impl Block for Gate {
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
        self.transistors.len()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn reset(&mut self) {
        for node in &mut self.nodes {
            node.clear();
        }
    }

    /// One evaluation cycle. The clock is ignored: flat gates are pure
    /// conductivity networks, clock gating lives at the composite level.
    fn run(&mut self, _clock: Clock) {
        // Terminals are re-derived every cycle; bus pins belong to the
        // caller and retain whatever was driven onto them.
        for i in 0..self.transistors.len() {
            let q = self.transistors[i];
            self.nodes[q.base.idx].clear();
            self.nodes[q.collector.idx].clear();
            self.nodes[q.emitter.idx].clear();
        }
        for position in 0..self.inputs.len() {
            self.propagate(self.inputs.id(position));
        }
        self.logic();
        let short = self.is_short_circuit();
        for position in 0..self.outputs.len() {
            let id = self.outputs.id(position);
            let level = short != self.inverted[position];
            self.nodes[id.idx].set(Signal::from_bool(level));
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
