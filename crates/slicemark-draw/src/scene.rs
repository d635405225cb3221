//! Retained scene graph for the draw stage.
//!
//! The layout built by the draw tool is:
//!
//! ```text
//! stage
//!   └── draw layer
//!         └── position group   tag = "slice-#_frame-#"
//!               └── shape group  tag = annotation id, name = "{kind}-group"
//!                     ├── shape       (geometry)
//!                     ├── label
//!                     └── decoration  (ticks, arcs...)
//! ```
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. A node can exist
//! detached from the stage (e.g. a deleted annotation kept for undo). Lookups
//! go through [`NodeRole`] rather than names.

use slicemark_core::{DrawError, Point2D, Result};
use std::collections::BTreeMap;
use std::fmt;

use crate::label::LabelText;

/// Distance, in real coordinates, within which a path counts as hit.
pub const HIT_TOLERANCE: f64 = 4.0;

/// Handle of a node in the scene arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Role of a node in the draw layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    Stage,
    Layer,
    PositionGroup,
    ShapeGroup,
    Shape,
    Label,
    Decoration,
    Trash,
}

/// What a node draws.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContent {
    /// Container without geometry of its own
    Group,
    /// Polyline (or polygon when `closed`) in node-local coordinates
    Path { points: Vec<Point2D>, closed: bool },
    /// Text label anchored at the node position
    Label(LabelText),
}

/// Description of a node subtree to instantiate.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub role: NodeRole,
    pub name: String,
    pub content: NodeContent,
    pub position: Point2D,
    pub stroke: Option<String>,
    pub stroke_width: f64,
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// A group spec.
    pub fn group(role: NodeRole, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
            content: NodeContent::Group,
            position: Point2D::zero(),
            stroke: None,
            stroke_width: 0.0,
            children: Vec::new(),
        }
    }

    /// A path spec.
    pub fn path(role: NodeRole, points: Vec<Point2D>, closed: bool, stroke: impl Into<String>) -> Self {
        Self {
            role,
            name: String::new(),
            content: NodeContent::Path { points, closed },
            position: Point2D::zero(),
            stroke: Some(stroke.into()),
            stroke_width: 1.0,
            children: Vec::new(),
        }
    }

    /// A label spec anchored at `position`.
    pub fn label(text: LabelText, position: Point2D) -> Self {
        Self {
            role: NodeRole::Label,
            name: "label".to_string(),
            content: NodeContent::Label(text),
            position,
            stroke: None,
            stroke_width: 0.0,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }
}

/// One node of the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    id: NodeId,
    role: NodeRole,
    name: String,
    tag: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    content: NodeContent,
    position: Point2D,
    scale: Point2D,
    stroke: Option<String>,
    stroke_width: f64,
    listening: bool,
    visible: bool,
    draggable: bool,
    hit_graph_enabled: bool,
}

impl SceneNode {
    fn new(id: NodeId, role: NodeRole, content: NodeContent) -> Self {
        Self {
            id,
            role,
            name: String::new(),
            tag: None,
            parent: None,
            children: Vec::new(),
            content,
            position: Point2D::zero(),
            scale: Point2D::new(1.0, 1.0),
            stroke: None,
            stroke_width: 0.0,
            listening: true,
            visible: true,
            draggable: false,
            hit_graph_enabled: true,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier tag: position scope id for position groups, annotation id for shape groups.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn scale(&self) -> Point2D {
        self.scale
    }

    pub fn stroke(&self) -> Option<&str> {
        self.stroke.as_deref()
    }

    pub fn stroke_width(&self) -> f64 {
        self.stroke_width
    }

    pub fn is_listening(&self) -> bool {
        self.listening
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn is_hit_graph_enabled(&self) -> bool {
        self.hit_graph_enabled
    }

    /// Label content, if this is a label node.
    pub fn label(&self) -> Option<&LabelText> {
        match &self.content {
            NodeContent::Label(label) => Some(label),
            _ => None,
        }
    }

    /// Path points in node-local coordinates, if this is a path node.
    pub fn points(&self) -> Option<&[Point2D]> {
        match &self.content {
            NodeContent::Path { points, .. } => Some(points),
            _ => None,
        }
    }
}

/// The draw stage: an arena of nodes rooted at a stage node.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    nodes: BTreeMap<NodeId, SceneNode>,
    root: NodeId,
    next_id: u64,
}

impl Scene {
    /// Creates a scene holding only the stage node.
    pub fn new() -> Self {
        let root = NodeId(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(root, SceneNode::new(root, NodeRole::Stage, NodeContent::Group));
        Self {
            nodes,
            root,
            next_id: 1,
        }
    }

    /// The stage node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a draw layer on top of the existing ones.
    pub fn add_layer(&mut self) -> NodeId {
        let layer = self.create_node(NodeRole::Layer, NodeContent::Group);
        self.attach(self.root, layer);
        layer
    }

    /// Creates a detached node.
    pub fn create_node(&mut self, role: NodeRole, content: NodeContent) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, SceneNode::new(id, role, content));
        id
    }

    /// Instantiates a detached subtree from a spec and returns its root.
    pub fn instantiate(&mut self, spec: &NodeSpec) -> NodeId {
        let id = self.create_node(spec.role, spec.content.clone());
        if let Some(node) = self.nodes.get_mut(&id) {
            node.name = spec.name.clone();
            node.position = spec.position;
            node.stroke = spec.stroke.clone();
            node.stroke_width = spec.stroke_width;
        }
        for child_spec in &spec.children {
            let child = self.instantiate(child_spec);
            self.attach(id, child);
        }
        id
    }

    /// Deep copy of a subtree, detached. Tags are copied as-is.
    pub fn deep_clone(&mut self, id: NodeId) -> Result<NodeId> {
        let source = self.node(id)?.clone();
        let copy = NodeId(self.next_id);
        self.next_id += 1;
        let mut node = source.clone();
        node.id = copy;
        node.parent = None;
        node.children = Vec::new();
        self.nodes.insert(copy, node);
        for child in source.children {
            let child_copy = self.deep_clone(child)?;
            self.attach(copy, child_copy);
        }
        Ok(copy)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn node(&self, id: NodeId) -> Result<&SceneNode> {
        self.nodes.get(&id).ok_or_else(|| unknown(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut SceneNode> {
        self.nodes.get_mut(&id).ok_or_else(|| unknown(id))
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId]> {
        Ok(self.node(id)?.children())
    }

    /// Direct children with the given role, in draw order.
    pub fn children_by_role(&self, id: NodeId, role: NodeRole) -> Result<Vec<NodeId>> {
        Ok(self
            .node(id)?
            .children
            .iter()
            .copied()
            .filter(|child| self.nodes.get(child).is_some_and(|n| n.role == role))
            .collect())
    }

    /// First direct child with the given role.
    pub fn child_by_role(&self, id: NodeId, role: NodeRole) -> Result<Option<NodeId>> {
        Ok(self.children_by_role(id, role)?.into_iter().next())
    }

    /// Direct children with the given role and tag.
    pub fn children_with_tag(&self, id: NodeId, role: NodeRole, tag: &str) -> Result<Vec<NodeId>> {
        Ok(self
            .children_by_role(id, role)?
            .into_iter()
            .filter(|child| self.nodes.get(child).and_then(|n| n.tag.as_deref()) == Some(tag))
            .collect())
    }

    /// Appends `child` to `parent`, detaching it from any previous parent.
    pub fn add(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert(parent, child, index)
    }

    /// Inserts `child` into `parent` at `index` (clamped to the child count).
    pub fn insert(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        self.node(parent)?;
        self.node(child)?;
        if parent == child || self.is_ancestor(child, parent) {
            return Err(DrawError::UnknownNode {
                node: format!("{} cannot contain its ancestor {}", parent, child),
            }
            .into());
        }
        self.remove(child)?;
        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    fn is_ancestor(&self, candidate: NodeId, mut id: NodeId) -> bool {
        while let Some(parent) = self.nodes.get(&id).and_then(|n| n.parent) {
            if parent == candidate {
                return true;
            }
            id = parent;
        }
        false
    }

    /// Detaches a node from its parent, keeping it in the arena.
    ///
    /// Returns the former parent and index, if it was attached.
    pub fn remove(&mut self, id: NodeId) -> Result<Option<(NodeId, usize)>> {
        let Some(parent) = self.node(id)?.parent else {
            return Ok(None);
        };
        let siblings = &mut self.node_mut(parent)?.children;
        let index = siblings.iter().position(|c| *c == id);
        if let Some(index) = index {
            siblings.remove(index);
        }
        self.node_mut(id)?.parent = None;
        Ok(index.map(|index| (parent, index)))
    }

    /// Detaches a node and drops it with its whole subtree.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        self.remove(id)?;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
            }
        }
        Ok(())
    }

    /// True if the node is reachable from the stage node.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || (self.contains(id) && self.is_ancestor(self.root, id))
    }

    pub fn position(&self, id: NodeId) -> Result<Point2D> {
        Ok(self.node(id)?.position)
    }

    pub fn set_position(&mut self, id: NodeId, position: Point2D) -> Result<()> {
        self.node_mut(id)?.position = position;
        Ok(())
    }

    pub fn translate(&mut self, id: NodeId, translation: Point2D) -> Result<()> {
        let node = self.node_mut(id)?;
        node.position = node.position + translation;
        Ok(())
    }

    /// Position of the node in real coordinates (sum of ancestor positions).
    pub fn absolute_position(&self, id: NodeId) -> Result<Point2D> {
        let mut position = self.node(id)?.position;
        let mut current = self.node(id)?.parent;
        while let Some(parent) = current {
            let node = self.node(parent)?;
            position = position + node.position;
            current = node.parent;
        }
        Ok(position)
    }

    /// Path points in real coordinates.
    pub fn absolute_points(&self, id: NodeId) -> Result<Vec<Point2D>> {
        let origin = self.absolute_position(id)?;
        Ok(self
            .node(id)?
            .points()
            .map(|points| points.iter().map(|p| *p + origin).collect())
            .unwrap_or_default())
    }

    pub fn set_scale(&mut self, id: NodeId, scale: Point2D) -> Result<()> {
        self.node_mut(id)?.scale = scale;
        Ok(())
    }

    pub fn set_tag(&mut self, id: NodeId, tag: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.tag = Some(tag.into());
        Ok(())
    }

    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_stroke(&mut self, id: NodeId, stroke: Option<String>) -> Result<()> {
        self.node_mut(id)?.stroke = stroke;
        Ok(())
    }

    pub fn set_listening(&mut self, id: NodeId, listening: bool) -> Result<()> {
        self.node_mut(id)?.listening = listening;
        Ok(())
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.node_mut(id)?.visible = visible;
        Ok(())
    }

    pub fn set_draggable(&mut self, id: NodeId, draggable: bool) -> Result<()> {
        self.node_mut(id)?.draggable = draggable;
        Ok(())
    }

    pub fn set_hit_graph_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.node_mut(id)?.hit_graph_enabled = enabled;
        Ok(())
    }

    /// Mutable access to a label node's content.
    pub fn label_mut(&mut self, id: NodeId) -> Result<&mut LabelText> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Label(label) => Ok(label),
            _ => Err(DrawError::UnknownNode {
                node: format!("{} is not a label", id),
            }
            .into()),
        }
    }

    /// Topmost listening node drawn at `point` (real coordinates).
    ///
    /// Invisible subtrees, non-listening nodes (and their descendants) and
    /// layers with a disabled hit graph are skipped.
    pub fn intersection(&self, point: Point2D) -> Option<NodeId> {
        let mut hit = None;
        self.hit_walk(self.root, Point2D::zero(), point, &mut hit);
        hit
    }

    fn hit_walk(&self, id: NodeId, origin: Point2D, point: Point2D, hit: &mut Option<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        if !node.visible || !node.listening {
            return;
        }
        if node.role == NodeRole::Layer && !node.hit_graph_enabled {
            return;
        }
        let origin = origin + node.position;
        if node_contains(node, origin, point) {
            *hit = Some(id);
        }
        for child in &node.children {
            self.hit_walk(*child, origin, point, hit);
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

fn unknown(id: NodeId) -> slicemark_core::Error {
    DrawError::UnknownNode {
        node: id.to_string(),
    }
    .into()
}

fn node_contains(node: &SceneNode, origin: Point2D, point: Point2D) -> bool {
    match &node.content {
        NodeContent::Group => false,
        NodeContent::Path { points, closed } => {
            let absolute: Vec<Point2D> = points.iter().map(|p| *p + origin).collect();
            path_contains(&absolute, *closed, point)
        }
        NodeContent::Label(label) => {
            let width = label.text.chars().count() as f64 * label.font_size * 0.6;
            let height = label.font_size;
            point.x() >= origin.x()
                && point.x() <= origin.x() + width
                && point.y() >= origin.y()
                && point.y() <= origin.y() + height
        }
    }
}

fn path_contains(points: &[Point2D], closed: bool, point: Point2D) -> bool {
    match points {
        [] => false,
        [single] => single.distance(&point) <= HIT_TOLERANCE,
        _ => {
            let near_stroke = points
                .windows(2)
                .any(|w| segment_distance(w[0], w[1], point) <= HIT_TOLERANCE);
            let near_closing = closed
                && segment_distance(points[points.len() - 1], points[0], point) <= HIT_TOLERANCE;
            near_stroke || near_closing || (closed && polygon_contains(points, point))
        }
    }
}

fn segment_distance(a: Point2D, b: Point2D, p: Point2D) -> f64 {
    let ab = b - a;
    let length_sq = ab.x() * ab.x() + ab.y() * ab.y();
    if length_sq == 0.0 {
        return a.distance(&p);
    }
    let ap = p - a;
    let t = ((ap.x() * ab.x() + ap.y() * ab.y()) / length_sq).clamp(0.0, 1.0);
    let projection = Point2D::new(a.x() + t * ab.x(), a.y() + t * ab.y());
    projection.distance(&p)
}

fn polygon_contains(points: &[Point2D], p: Point2D) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let (pi, pj) = (points[i], points[j]);
        if (pi.y() > p.y()) != (pj.y() > p.y())
            && p.x() < (pj.x() - pi.x()) * (p.y() - pi.y()) / (pj.y() - pi.y()) + pi.x()
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
