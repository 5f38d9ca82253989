use super::error::SimError;
use super::node::{Node, NodeIndex};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// An ordered, labeled group of arena nodes representing a multi-bit
/// signal.
///
/// The bus does not own the node values; it maps symbolic labels to
/// positions and positions to [NodeIndex]es in the owning block's
/// arena. Default labels are the descending integers `N-1 … 0`,
/// reflecting the MSB-first convention: position 0 carries the highest
/// label, and label `0` is the least significant bit.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Bus {
    ids: SmallVec<[NodeIndex; 4]>,
    labels: Vec<String>,
}

impl Bus {
    /// Returns a new [Bus] over `ids` with the default descending labels.
    pub fn new(ids: SmallVec<[NodeIndex; 4]>) -> Bus {
        let labels = (0..ids.len()).rev().map(|i| i.to_string()).collect();
        Bus { ids, labels }
    }

    /// Returns a new [Bus] over `ids` labeled by `labels`.
    ///
    /// `block` is only used to identify the owner in error messages.
    pub fn with_labels(
        block: &str,
        ids: SmallVec<[NodeIndex; 4]>,
        labels: &[&str],
    ) -> Result<Bus, SimError> {
        let mut bus = Bus::new(ids);
        bus.set_labels(block, labels)?;
        Ok(bus)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[NodeIndex] {
        &self.ids
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Returns the position of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn id(&self, position: usize) -> NodeIndex {
        self.ids[position]
    }

    /// Returns the [NodeIndex] behind `label`, if present.
    pub fn id_of(&self, label: &str) -> Option<NodeIndex> {
        self.position(label).map(|p| self.ids[p])
    }

    pub fn label(&self, position: usize) -> &str {
        &self.labels[position]
    }

    /// Replaces the labeling wholesale. The labeling must stay
    /// injective and cover every position.
    pub fn set_labels(&mut self, block: &str, labels: &[&str]) -> Result<(), SimError> {
        if labels.len() != self.ids.len() {
            return Err(SimError::SizeMismatch {
                block: block.into(),
                expected: self.ids.len(),
                actual: labels.len(),
            });
        }
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].contains(label) {
                return Err(SimError::MalformedNetlist {
                    block: block.into(),
                    reason: format!("duplicate label `{}`", label),
                });
            }
        }
        self.labels = labels.iter().map(|l| l.to_string()).collect();
        Ok(())
    }

    /// Renders the bus values in position order.
    pub fn render(&self, nodes: &[Node], sep: &str) -> String {
        self.ids
            .iter()
            .map(|id| nodes[id.idx].value.to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }

    /// Renders the bus values in an arbitrary label `order`.
    pub fn render_ordered(
        &self,
        block: &str,
        nodes: &[Node],
        sep: &str,
        order: &[&str],
    ) -> Result<String, SimError> {
        let mut parts = Vec::with_capacity(order.len());
        for label in order {
            let id = self.id_of(label).ok_or_else(|| SimError::UnknownLabel {
                block: block.into(),
                label: label.to_string(),
            })?;
            parts.push(nodes[id.idx].value.to_string());
        }
        Ok(parts.join(sep))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Signal;
    use crate::ni;
    use smallvec::smallvec;

    fn bus_of(n: usize) -> (Vec<Node>, Bus) {
        let nodes = vec![Node::new(); n];
        let ids = (0..n).map(NodeIndex::new).collect();
        (nodes, Bus::new(ids))
    }

    #[test]
    fn test_default_labels_are_descending() {
        let (_, bus) = bus_of(4);
        assert_eq!(bus.labels(), ["3", "2", "1", "0"]);
        assert_eq!(bus.position("0"), Some(3));
    }

    #[test]
    fn test_relabeling_is_checked() {
        let (_, mut bus) = bus_of(2);
        bus.set_labels("test", &["a", "b"]).unwrap();
        assert_eq!(bus.id_of("b"), Some(NodeIndex::new(1)));

        assert!(bus.set_labels("test", &["a"]).is_err());
        assert!(bus.set_labels("test", &["a", "a"]).is_err());
    }

    #[test]
    fn test_render_orders() {
        let (mut nodes, mut bus) = bus_of(3);
        bus.set_labels("test", &["a", "b", "c"]).unwrap();
        nodes[0].set(Signal::High);
        nodes[1].set(Signal::Low);

        assert_eq!(bus.render(&nodes, ""), "10?");
        assert_eq!(
            bus.render_ordered("test", &nodes, ", ", &["c", "a"]).unwrap(),
            "?, 1"
        );
        assert!(bus.render_ordered("test", &nodes, "", &["nope"]).is_err());
    }

    #[test]
    fn test_explicit_ids() {
        let ids: SmallVec<[NodeIndex; 4]> = smallvec![ni!(7), ni!(9)];
        let bus = Bus::with_labels("test", ids, &["hi", "lo"]).unwrap();
        assert_eq!(bus.id(0), ni!(7));
        assert_eq!(bus.id_of("lo"), Some(ni!(9)));
    }
}
