//! Node selection and the pending-connection gesture.
//!
//! Session-local state: which nodes are selected, and which node (if any) is
//! armed as the source of the next connection. Never persisted.

use crate::types::{Mindmap, NodeId};

/// What a click on a node resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click completed a pending connection gesture; the caller should
    /// connect the two nodes. The selection was left untouched.
    Connect {
        /// The armed source node
        from: NodeId,
        /// The clicked destination node
        to: NodeId,
    },
    /// The click updated the selection.
    Selected,
}

/// Which nodes are selected plus the armed connection source, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    selected: Vec<NodeId>,
    connecting_from: Option<NodeId>,
}

impl SelectionState {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// The selected node ids, in selection order.
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Returns `true` if the given node is selected.
    pub fn is_selected(&self, id: &NodeId) -> bool {
        self.selected.contains(id)
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// The selected node, if exactly one node is selected.
    pub fn single(&self) -> Option<&NodeId> {
        match self.selected.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    /// The armed connection source, if a connection gesture is pending.
    pub fn connecting_from(&self) -> Option<&NodeId> {
        self.connecting_from.as_ref()
    }

    /// Replaces the selection with a single node.
    pub fn select_only(&mut self, id: &NodeId) {
        self.selected.clear();
        self.selected.push(id.clone());
    }

    /// Toggles a node's membership in the multi-selection.
    pub fn toggle(&mut self, id: &NodeId) {
        if let Some(index) = self.selected.iter().position(|s| s == id) {
            self.selected.remove(index);
        } else {
            self.selected.push(id.clone());
        }
    }

    /// Clears the selection and any pending connection gesture.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.connecting_from = None;
    }

    /// Resolves a click on a node.
    ///
    /// If a connection gesture is pending and the clicked node is not its
    /// source, the click is consumed as "complete the connection" and the
    /// selection stays as it was. Otherwise the click updates the selection:
    /// plain clicks select only the clicked node, `multi` (shift) clicks
    /// toggle its membership.
    pub fn click(&mut self, id: &NodeId, multi: bool) -> ClickOutcome {
        if let Some(source) = self.connecting_from.clone() {
            if source != *id {
                self.connecting_from = None;
                return ClickOutcome::Connect {
                    from: source,
                    to: id.clone(),
                };
            }
        }
        if multi {
            self.toggle(id);
        } else {
            self.select_only(id);
        }
        ClickOutcome::Selected
    }

    /// Arms or disarms a node as the connection source.
    ///
    /// Arming a different node moves the gesture to it; re-invoking on the
    /// already-armed node cancels the gesture.
    pub fn toggle_connect_source(&mut self, id: &NodeId) {
        if self.connecting_from.as_ref() == Some(id) {
            self.connecting_from = None;
        } else {
            self.connecting_from = Some(id.clone());
        }
    }

    /// Cancels a pending connection gesture, keeping the selection.
    pub fn cancel_connection(&mut self) {
        self.connecting_from = None;
    }

    /// The set of nodes a drag starting on `pressed` should move: the whole
    /// selection if the pressed node is part of it, otherwise just the
    /// pressed node (without touching the selection).
    pub fn drag_targets(&self, pressed: &NodeId) -> Vec<NodeId> {
        if self.is_selected(pressed) {
            self.selected.clone()
        } else {
            vec![pressed.clone()]
        }
    }

    /// Drops every reference to nodes that no longer exist in the document.
    ///
    /// Called after deletions and imports so the selection and the armed
    /// connection source can never point at a missing node.
    pub fn purge_missing(&mut self, map: &Mindmap) {
        self.selected.retain(|id| map.contains_node(id));
        if let Some(source) = &self.connecting_from {
            if !map.contains_node(source) {
                self.connecting_from = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NodeType;
    use egui::Pos2;

    fn id(s: &str) -> NodeId {
        NodeId::from(s)
    }

    #[test]
    fn test_select_only_replaces_selection() {
        let mut sel = SelectionState::new();
        sel.select_only(&id("a"));
        sel.select_only(&id("b"));

        assert_eq!(sel.selected(), &[id("b")]);
        assert_eq!(sel.single(), Some(&id("b")));
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut sel = SelectionState::new();

        sel.toggle(&id("a"));
        sel.toggle(&id("b"));
        assert!(sel.is_selected(&id("a")));
        assert!(sel.is_selected(&id("b")));
        assert_eq!(sel.len(), 2);
        assert_eq!(sel.single(), None);

        sel.toggle(&id("a"));
        assert!(!sel.is_selected(&id("a")));
        assert_eq!(sel.selected(), &[id("b")]);
    }

    #[test]
    fn test_plain_click_selects_single() {
        let mut sel = SelectionState::new();
        sel.toggle(&id("a"));
        sel.toggle(&id("b"));

        let outcome = sel.click(&id("c"), false);

        assert_eq!(outcome, ClickOutcome::Selected);
        assert_eq!(sel.selected(), &[id("c")]);
    }

    #[test]
    fn test_click_completes_pending_connection() {
        let mut sel = SelectionState::new();
        sel.select_only(&id("a"));
        sel.toggle_connect_source(&id("a"));

        let outcome = sel.click(&id("b"), false);

        assert_eq!(
            outcome,
            ClickOutcome::Connect {
                from: id("a"),
                to: id("b"),
            }
        );
        // Completing a connection consumes the click without re-selecting.
        assert_eq!(sel.selected(), &[id("a")]);
        assert_eq!(sel.connecting_from(), None);
    }

    #[test]
    fn test_shift_click_also_completes_pending_connection() {
        let mut sel = SelectionState::new();
        sel.toggle_connect_source(&id("a"));

        let outcome = sel.click(&id("b"), true);

        assert!(matches!(outcome, ClickOutcome::Connect { .. }));
        assert!(sel.is_empty());
    }

    #[test]
    fn test_click_on_armed_source_selects_it_and_keeps_gesture() {
        let mut sel = SelectionState::new();
        sel.toggle_connect_source(&id("a"));

        let outcome = sel.click(&id("a"), false);

        assert_eq!(outcome, ClickOutcome::Selected);
        assert_eq!(sel.selected(), &[id("a")]);
        assert_eq!(sel.connecting_from(), Some(&id("a")));
    }

    #[test]
    fn test_toggle_connect_source_arms_moves_and_cancels() {
        let mut sel = SelectionState::new();

        sel.toggle_connect_source(&id("a"));
        assert_eq!(sel.connecting_from(), Some(&id("a")));

        sel.toggle_connect_source(&id("b"));
        assert_eq!(sel.connecting_from(), Some(&id("b")));

        sel.toggle_connect_source(&id("b"));
        assert_eq!(sel.connecting_from(), None);
    }

    #[test]
    fn test_clear_drops_selection_and_gesture() {
        let mut sel = SelectionState::new();
        sel.select_only(&id("a"));
        sel.toggle_connect_source(&id("b"));

        sel.clear();

        assert!(sel.is_empty());
        assert_eq!(sel.connecting_from(), None);
    }

    #[test]
    fn test_drag_targets_capture_rule() {
        let mut sel = SelectionState::new();
        sel.toggle(&id("a"));
        sel.toggle(&id("b"));

        assert_eq!(sel.drag_targets(&id("a")), vec![id("a"), id("b")]);
        assert_eq!(sel.drag_targets(&id("c")), vec![id("c")]);
        // Pressing an unselected node does not alter the selection itself.
        assert_eq!(sel.selected(), &[id("a"), id("b")]);
    }

    #[test]
    fn test_purge_missing_drops_stale_references() {
        let mut map = Mindmap::new();
        let kept = map.add_node(Pos2::ZERO, NodeType::Root, "Kept");

        let mut sel = SelectionState::new();
        sel.toggle(&kept);
        sel.toggle(&id("gone"));
        sel.toggle_connect_source(&id("gone"));

        sel.purge_missing(&map);

        assert_eq!(sel.selected(), &[kept.clone()]);
        assert_eq!(sel.connecting_from(), None);
    }
}
