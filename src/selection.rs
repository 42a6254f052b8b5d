use crate::graph::{JointId, NodeId};
use std::collections::HashSet;

/// Answers "is this currently selected?" for the routing core.
///
/// Selection means the item moves together with whatever is being dragged,
/// which relaxes the first/last joint lock and disqualifies alignment targets.
pub trait SelectionQuery {
    fn is_node_selected(&self, node: NodeId) -> bool;
    fn is_joint_selected(&self, joint: JointId) -> bool;
}

/// Anything that can be selected in the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Selectable {
    Node(NodeId),
    Joint(JointId),
}

#[derive(Default, Debug)]
pub struct SelectionManager {
    selected: HashSet<Selectable>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle selection of an item based on interaction modifiers
    pub fn handle_interaction(&mut self, item: Selectable, shift_held: bool) {
        if shift_held {
            if !self.selected.remove(&item) {
                self.selected.insert(item);
            }
        } else {
            if self.selected.len() == 1 && self.selected.contains(&item) {
                return;
            }
            self.selected.clear();
            self.selected.insert(item);
        }
    }

    /// Clear the current selection
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Replace the current selection with a new set of items
    pub fn replace_selection<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = Selectable>,
    {
        self.selected.clear();
        self.selected.extend(items);
    }

    pub fn contains(&self, item: Selectable) -> bool {
        self.selected.contains(&item)
    }

    pub fn iter(&self) -> std::collections::hash_set::Iter<'_, Selectable> {
        self.selected.iter()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl SelectionQuery for SelectionManager {
    fn is_node_selected(&self, node: NodeId) -> bool {
        self.contains(Selectable::Node(node))
    }

    fn is_joint_selected(&self, joint: JointId) -> bool {
        self.contains(Selectable::Joint(joint))
    }
}
