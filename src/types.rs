//! Core data types and structures for the mind-map canvas.
//!
//! This module defines the graph document (nodes plus connections), the
//! operations that mutate it, and its JSON wire format for import/export.

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::constants::{CHILD_NODE_OFFSET, DEFAULT_NODE_LABEL, NEW_CHILD_LABEL};

/// Unique identifier for mind-map nodes.
///
/// Stored as an opaque string so that imported documents may carry ids from
/// other tools; freshly created nodes use a UUID in string form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Generates a fresh unique node id.
    pub fn new() -> Self {
        NodeId(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId(value)
    }
}

/// Semantic tag of a mind-map node, used only for default styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The central idea of a map
    Root,
    /// A primary branch off the root
    Main,
    /// A leaf-level idea
    Sub,
}

impl NodeType {
    /// All node types, in the order offered by the type selector.
    pub const ALL: [NodeType; 3] = [NodeType::Root, NodeType::Main, NodeType::Sub];

    /// Human-readable name for UI labels.
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Root => "Root",
            NodeType::Main => "Main",
            NodeType::Sub => "Sub",
        }
    }
}

/// Represents a single node in the mind map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MindmapNode {
    /// Unique identifier for this node
    pub id: NodeId,
    /// User-editable label (may span multiple lines)
    pub text: String,
    /// Semantic tag controlling the node's default styling
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// Horizontal position in canvas coordinates, independent of pan/zoom
    pub x: f32,
    /// Vertical position in canvas coordinates, independent of pan/zoom
    pub y: f32,
}

impl MindmapNode {
    /// Creates a new node with a fresh unique id.
    ///
    /// Non-finite coordinates are normalized to the origin so that a node can
    /// never poison downstream geometry with NaN or infinity.
    ///
    /// # Arguments
    ///
    /// * `position` - Where to place the node, in canvas coordinates
    /// * `node_type` - The semantic tag for the node
    /// * `text` - The initial label
    pub fn new(position: Pos2, node_type: NodeType, text: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            text: text.into(),
            node_type,
            x: finite_or_zero(position.x),
            y: finite_or_zero(position.y),
        }
    }

    /// The node's position as a point in canvas coordinates.
    pub fn position(&self) -> Pos2 {
        Pos2::new(self.x, self.y)
    }

    /// Moves the node by a canvas-space delta, keeping coordinates finite.
    pub fn translate(&mut self, delta: Vec2) {
        self.x = finite_or_zero(self.x + delta.x);
        self.y = finite_or_zero(self.y + delta.y);
    }
}

/// Represents a connection between two nodes.
///
/// Stored directed in creation order, but treated as undirected for
/// existence checks: at most one connection may link any pair of nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    /// ID of the node the connection starts from
    pub from: NodeId,
    /// ID of the node the connection ends at
    pub to: NodeId,
}

impl Connection {
    /// Creates a new connection between two nodes.
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }

    /// Returns `true` if either endpoint is the given node.
    pub fn touches(&self, id: &NodeId) -> bool {
        self.from == *id || self.to == *id
    }

    /// Returns `true` if the connection links the given pair, in either direction.
    pub fn links(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.from == *a && self.to == *b) || (self.from == *b && self.to == *a)
    }
}

/// The mind-map document: every node and every connection between them.
///
/// This is the unit of import/export and the unit owned by the hosting
/// application; all mutation goes through the methods below, which absorb
/// invalid input as no-ops instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mindmap {
    /// All nodes, in insertion order (later nodes draw on top)
    pub nodes: Vec<MindmapNode>,
    /// All connections between nodes
    pub connections: Vec<Connection>,
}

impl Mindmap {
    /// Creates a new empty mind map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize the mind map to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a mind map from a JSON string.
    ///
    /// The document must carry `nodes` and `connections` as correctly-typed
    /// arrays; anything else is rejected without touching any existing state.
    /// Accepted documents are sanitized so that every graph invariant holds
    /// even if the file was edited by hand.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut map: Mindmap = serde_json::from_str(json)?;
        map.sanitize();
        Ok(map)
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &NodeId) -> Option<&MindmapNode> {
        self.nodes.iter().find(|node| node.id == *id)
    }

    /// Looks up a node by id, mutably.
    pub fn node_mut(&mut self, id: &NodeId) -> Option<&mut MindmapNode> {
        self.nodes.iter_mut().find(|node| node.id == *id)
    }

    /// Returns `true` if a node with the given id exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Adds a new node to the map.
    ///
    /// # Arguments
    ///
    /// * `position` - Where to place the node, in canvas coordinates
    /// * `node_type` - The semantic tag for the node
    /// * `text` - The initial label
    ///
    /// # Returns
    ///
    /// The ID of the newly added node.
    pub fn add_node(&mut self, position: Pos2, node_type: NodeType, text: impl Into<String>) -> NodeId {
        let node = MindmapNode::new(position, node_type, text);
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Adds a child node offset from the given parent, plus the connection
    /// from parent to child.
    ///
    /// # Arguments
    ///
    /// * `parent` - The ID of the node to branch from
    ///
    /// # Returns
    ///
    /// The ID of the new child, or `None` if the parent does not exist.
    pub fn add_child(&mut self, parent: &NodeId) -> Option<NodeId> {
        let origin = self.node(parent)?.position();
        let position = origin + Vec2::new(CHILD_NODE_OFFSET.0, CHILD_NODE_OFFSET.1);
        let child = self.add_node(position, NodeType::Sub, NEW_CHILD_LABEL);
        self.connections.push(Connection::new(parent.clone(), child.clone()));
        Some(child)
    }

    /// Replaces a node's label with the trimmed text.
    ///
    /// Text that trims to nothing is replaced with a placeholder label so a
    /// node can never end up visually unlabeled.
    ///
    /// # Returns
    ///
    /// `true` if the node exists and its text was updated.
    pub fn edit_text(&mut self, id: &NodeId, text: &str) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let trimmed = text.trim();
        node.text = if trimmed.is_empty() {
            DEFAULT_NODE_LABEL.to_string()
        } else {
            trimmed.to_string()
        };
        true
    }

    /// Removes every listed node and all connections touching any of them.
    ///
    /// The node removal and the connection cleanup happen in the same
    /// operation, so the document never holds a dangling endpoint.
    ///
    /// # Returns
    ///
    /// `true` if at least one node was removed.
    pub fn remove_nodes(&mut self, ids: &[NodeId]) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|node| !ids.contains(&node.id));
        if self.nodes.len() == before {
            return false;
        }
        self.connections
            .retain(|conn| !ids.iter().any(|id| conn.touches(id)));
        true
    }

    /// Changes a node's semantic tag.
    ///
    /// # Returns
    ///
    /// `true` if the node exists and its type was updated.
    pub fn set_node_type(&mut self, id: &NodeId, node_type: NodeType) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        node.node_type = node_type;
        true
    }

    /// Adds a connection between two existing nodes.
    ///
    /// Self-connections, connections with a missing endpoint, and duplicates
    /// of an existing connection (in either direction) are absorbed as no-ops.
    ///
    /// # Arguments
    ///
    /// * `from` - The ID of the source node
    /// * `to` - The ID of the destination node
    ///
    /// # Returns
    ///
    /// `true` if a new connection was added.
    pub fn connect(&mut self, from: &NodeId, to: &NodeId) -> bool {
        if from == to {
            return false;
        }
        if !self.contains_node(from) || !self.contains_node(to) {
            return false;
        }
        if self.is_connected(from, to) {
            return false;
        }
        self.connections.push(Connection::new(from.clone(), to.clone()));
        true
    }

    /// Returns `true` if the two nodes are connected, in either direction.
    pub fn is_connected(&self, a: &NodeId, b: &NodeId) -> bool {
        self.connections.iter().any(|conn| conn.links(a, b))
    }

    /// Moves every listed node by a canvas-space delta.
    ///
    /// # Returns
    ///
    /// `true` if at least one node was moved.
    pub fn translate_nodes(&mut self, ids: &[NodeId], delta: Vec2) -> bool {
        let mut moved = false;
        for node in self.nodes.iter_mut().filter(|node| ids.contains(&node.id)) {
            node.translate(delta);
            moved = true;
        }
        moved
    }

    /// Restores every graph invariant after external mutation.
    ///
    /// Duplicate node ids keep their first occurrence; self-connections,
    /// connections with a missing endpoint, and duplicate connections between
    /// the same pair are dropped; non-finite coordinates are normalized to
    /// the origin. A document that already satisfies the invariants passes
    /// through unchanged.
    pub fn sanitize(&mut self) {
        let mut seen_ids: HashSet<NodeId> = HashSet::new();
        self.nodes.retain(|node| seen_ids.insert(node.id.clone()));
        for node in &mut self.nodes {
            node.x = finite_or_zero(node.x);
            node.y = finite_or_zero(node.y);
        }

        let mut seen_pairs: HashSet<(NodeId, NodeId)> = HashSet::new();
        self.connections.retain(|conn| {
            if conn.from == conn.to {
                return false;
            }
            if !seen_ids.contains(&conn.from) || !seen_ids.contains(&conn.to) {
                return false;
            }
            seen_pairs.insert(pair_key(&conn.from, &conn.to))
        });
    }
}

/// Order-independent key for a pair of node ids.
fn pair_key(a: &NodeId, b: &NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_map() -> (Mindmap, NodeId, NodeId) {
        let mut map = Mindmap::new();
        let a = map.add_node(Pos2::new(100.0, 100.0), NodeType::Root, "Idea");
        let b = map.add_node(Pos2::new(300.0, 100.0), NodeType::Main, "Branch");
        (map, a, b)
    }

    #[test]
    fn test_node_creation() {
        let node = MindmapNode::new(Pos2::new(100.0, 200.0), NodeType::Main, "Test Node");

        assert_eq!(node.text, "Test Node");
        assert_eq!(node.node_type, NodeType::Main);
        assert_eq!(node.position(), Pos2::new(100.0, 200.0));
        assert!(!node.id.as_str().is_empty());
    }

    #[test]
    fn test_node_creation_normalizes_non_finite_coordinates() {
        let node = MindmapNode::new(Pos2::new(f32::NAN, f32::INFINITY), NodeType::Sub, "Weird");

        assert_eq!(node.position(), Pos2::new(0.0, 0.0));
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = MindmapNode::new(Pos2::ZERO, NodeType::Sub, "A");
        let b = MindmapNode::new(Pos2::ZERO, NodeType::Sub, "B");

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_connection_touches_and_links() {
        let conn = Connection::new(NodeId::from("a"), NodeId::from("b"));

        assert!(conn.touches(&NodeId::from("a")));
        assert!(conn.touches(&NodeId::from("b")));
        assert!(!conn.touches(&NodeId::from("c")));
        assert!(conn.links(&NodeId::from("a"), &NodeId::from("b")));
        assert!(conn.links(&NodeId::from("b"), &NodeId::from("a")));
        assert!(!conn.links(&NodeId::from("a"), &NodeId::from("c")));
    }

    #[test]
    fn test_mindmap_default_is_empty() {
        let map = Mindmap::default();

        assert!(map.nodes.is_empty());
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_add_node() {
        let mut map = Mindmap::new();

        let id = map.add_node(Pos2::new(50.0, 60.0), NodeType::Root, "Center");

        assert_eq!(map.nodes.len(), 1);
        assert!(map.contains_node(&id));
        assert_eq!(map.node(&id).unwrap().text, "Center");
    }

    #[test]
    fn test_add_child_offsets_and_connects() {
        let (mut map, a, _) = two_node_map();

        let child = map.add_child(&a).unwrap();

        let parent_pos = map.node(&a).unwrap().position();
        let child_pos = map.node(&child).unwrap().position();
        assert_eq!(child_pos, parent_pos + Vec2::new(150.0, 100.0));
        assert_eq!(map.node(&child).unwrap().text, "New Branch");
        assert_eq!(map.node(&child).unwrap().node_type, NodeType::Sub);
        assert!(map.is_connected(&a, &child));
    }

    #[test]
    fn test_add_child_missing_parent_is_noop() {
        let mut map = Mindmap::new();

        assert!(map.add_child(&NodeId::from("ghost")).is_none());
        assert!(map.nodes.is_empty());
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_edit_text_trims() {
        let (mut map, a, _) = two_node_map();

        assert!(map.edit_text(&a, "  Renamed  \n"));

        assert_eq!(map.node(&a).unwrap().text, "Renamed");
    }

    #[test]
    fn test_edit_text_empty_becomes_placeholder() {
        let (mut map, a, _) = two_node_map();

        assert!(map.edit_text(&a, "   \n\t"));

        assert_eq!(map.node(&a).unwrap().text, "New Node");
    }

    #[test]
    fn test_edit_text_missing_node_is_noop() {
        let (mut map, _, _) = two_node_map();

        assert!(!map.edit_text(&NodeId::from("ghost"), "Anything"));
    }

    #[test]
    fn test_connect_adds_single_connection() {
        let (mut map, a, b) = two_node_map();

        assert!(map.connect(&a, &b));

        assert_eq!(map.connections.len(), 1);
        assert_eq!(map.connections[0].from, a);
        assert_eq!(map.connections[0].to, b);
    }

    #[test]
    fn test_connect_rejects_self_connection() {
        let (mut map, a, _) = two_node_map();

        assert!(!map.connect(&a, &a));
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_connect_rejects_missing_endpoint() {
        let (mut map, a, _) = two_node_map();
        let ghost = NodeId::from("ghost");

        assert!(!map.connect(&a, &ghost));
        assert!(!map.connect(&ghost, &a));
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_connect_duplicate_is_noop_in_either_direction() {
        let (mut map, a, b) = two_node_map();

        assert!(map.connect(&a, &b));
        assert!(!map.connect(&a, &b));
        assert!(!map.connect(&b, &a));

        assert_eq!(map.connections.len(), 1);
    }

    #[test]
    fn test_remove_nodes_cascades_to_connections() {
        let (mut map, a, b) = two_node_map();
        let c = map.add_node(Pos2::new(500.0, 100.0), NodeType::Sub, "Leaf");
        map.connect(&a, &b);
        map.connect(&b, &c);
        map.connect(&a, &c);
        assert_eq!(map.connections.len(), 3);

        assert!(map.remove_nodes(&[b.clone()]));

        assert_eq!(map.nodes.len(), 2);
        assert_eq!(map.connections.len(), 1);
        assert!(map.connections[0].links(&a, &c));
    }

    #[test]
    fn test_remove_nodes_accepts_multiple_ids() {
        let (mut map, a, b) = two_node_map();
        map.connect(&a, &b);

        assert!(map.remove_nodes(&[a, b]));

        assert!(map.nodes.is_empty());
        assert!(map.connections.is_empty());
    }

    #[test]
    fn test_remove_nodes_missing_id_is_noop() {
        let (mut map, _, _) = two_node_map();

        assert!(!map.remove_nodes(&[NodeId::from("ghost")]));
        assert_eq!(map.nodes.len(), 2);
    }

    #[test]
    fn test_set_node_type() {
        let (mut map, a, _) = two_node_map();

        assert!(map.set_node_type(&a, NodeType::Sub));
        assert_eq!(map.node(&a).unwrap().node_type, NodeType::Sub);

        assert!(!map.set_node_type(&NodeId::from("ghost"), NodeType::Root));
    }

    #[test]
    fn test_translate_nodes_moves_only_listed() {
        let (mut map, a, b) = two_node_map();

        assert!(map.translate_nodes(&[a.clone()], Vec2::new(10.0, -5.0)));

        assert_eq!(map.node(&a).unwrap().position(), Pos2::new(110.0, 95.0));
        assert_eq!(map.node(&b).unwrap().position(), Pos2::new(300.0, 100.0));
    }

    #[test]
    fn test_create_and_connect_scenario() {
        let mut map = Mindmap::new();

        let idea = map.add_node(Pos2::new(100.0, 100.0), NodeType::Root, "Idea");
        assert_eq!(map.nodes.len(), 1);

        let branch = map.add_node(Pos2::new(300.0, 100.0), NodeType::Main, "Branch");
        assert_eq!(map.nodes.len(), 2);

        assert!(map.connect(&idea, &branch));
        assert_eq!(map.connections.len(), 1);

        assert!(map.remove_nodes(&[idea]));
        assert!(map.connections.is_empty());
        assert_eq!(map.nodes.len(), 1);
        assert_eq!(map.nodes[0].text, "Branch");
    }

    #[test]
    fn test_serialization_wire_format() {
        let (mut map, a, b) = two_node_map();
        map.connect(&a, &b);

        let json = map.to_json().unwrap();

        assert!(json.contains("\"nodes\""));
        assert!(json.contains("\"connections\""));
        assert!(json.contains("\"type\": \"root\""));
        assert!(json.contains("\"type\": \"main\""));
        assert!(json.contains("\"x\": 100.0"));
        assert!(json.contains("\"from\""));
    }

    #[test]
    fn test_roundtrip_serialization() {
        let (mut map, a, b) = two_node_map();
        map.connect(&a, &b);

        let json = map.to_json().unwrap();
        let restored = Mindmap::from_json(&json).unwrap();

        assert_eq!(restored, map);
    }

    #[test]
    fn test_from_json_accepts_foreign_string_ids() {
        let json = r#"{
            "nodes": [
                {"id": "1", "text": "Main Idea", "type": "root", "x": 600.0, "y": 400.0},
                {"id": "2", "text": "Branch 1", "type": "main", "x": 400.0, "y": 300.0}
            ],
            "connections": [{"from": "1", "to": "2"}]
        }"#;

        let map = Mindmap::from_json(json).unwrap();

        assert_eq!(map.nodes.len(), 2);
        assert_eq!(map.connections.len(), 1);
        assert!(map.is_connected(&NodeId::from("1"), &NodeId::from("2")));
    }

    #[test]
    fn test_from_json_rejects_malformed_input() {
        assert!(Mindmap::from_json("{not json").is_err());
        assert!(Mindmap::from_json("[]").is_err());
        assert!(Mindmap::from_json(r#"{"nodes": []}"#).is_err());
        assert!(Mindmap::from_json(r#"{"nodes": {}, "connections": []}"#).is_err());
        assert!(Mindmap::from_json(r#"{"nodes": [], "connections": 7}"#).is_err());
    }

    #[test]
    fn test_from_json_rejects_unknown_node_type() {
        let json = r#"{
            "nodes": [{"id": "1", "text": "X", "type": "galaxy", "x": 0.0, "y": 0.0}],
            "connections": []
        }"#;

        assert!(Mindmap::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_drops_invalid_connections() {
        let json = r#"{
            "nodes": [
                {"id": "1", "text": "A", "type": "root", "x": 0.0, "y": 0.0},
                {"id": "2", "text": "B", "type": "sub", "x": 10.0, "y": 10.0}
            ],
            "connections": [
                {"from": "1", "to": "2"},
                {"from": "2", "to": "1"},
                {"from": "1", "to": "1"},
                {"from": "1", "to": "ghost"}
            ]
        }"#;

        let map = Mindmap::from_json(json).unwrap();

        assert_eq!(map.connections.len(), 1);
        assert!(map.is_connected(&NodeId::from("1"), &NodeId::from("2")));
    }

    #[test]
    fn test_sanitize_keeps_first_duplicate_node_id() {
        let mut map = Mindmap {
            nodes: vec![
                MindmapNode {
                    id: NodeId::from("dup"),
                    text: "First".to_string(),
                    node_type: NodeType::Root,
                    x: 0.0,
                    y: 0.0,
                },
                MindmapNode {
                    id: NodeId::from("dup"),
                    text: "Second".to_string(),
                    node_type: NodeType::Sub,
                    x: 50.0,
                    y: 50.0,
                },
            ],
            connections: Vec::new(),
        };

        map.sanitize();

        assert_eq!(map.nodes.len(), 1);
        assert_eq!(map.nodes[0].text, "First");
    }

    #[test]
    fn test_sanitize_normalizes_non_finite_coordinates() {
        let mut map = Mindmap {
            nodes: vec![MindmapNode {
                id: NodeId::from("n"),
                text: "N".to_string(),
                node_type: NodeType::Sub,
                x: f32::NAN,
                y: f32::NEG_INFINITY,
            }],
            connections: Vec::new(),
        };

        map.sanitize();

        assert_eq!(map.nodes[0].position(), Pos2::new(0.0, 0.0));
    }

    #[test]
    fn test_sanitize_is_identity_on_valid_documents() {
        let (mut map, a, b) = two_node_map();
        map.connect(&a, &b);
        let before = map.clone();

        map.sanitize();

        assert_eq!(map, before);
    }
}
