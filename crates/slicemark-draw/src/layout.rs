//! Position scope addressing.
//!
//! Annotations are grouped under one position group per (slice, frame) pair.
//! The group is tagged with [`PositionScopeId`], rendered as
//! `slice-<k>_frame-<f>`.

use serde::{Deserialize, Serialize};
use slicemark_core::{DrawError, Result};
use std::fmt;
use std::str::FromStr;

use crate::scene::{NodeContent, NodeId, NodeRole, Scene};

/// Identifier of the annotations visible at one (slice, frame) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionScopeId {
    pub slice: usize,
    pub frame: usize,
}

impl PositionScopeId {
    pub fn new(slice: usize, frame: usize) -> Self {
        Self { slice, frame }
    }
}

impl fmt::Display for PositionScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slice-{}_frame-{}", self.slice, self.frame)
    }
}

impl FromStr for PositionScopeId {
    type Err = DrawError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || DrawError::InvalidTarget {
            reason: format!("'{}' is not a position scope id", s),
        };
        let rest = s.strip_prefix("slice-").ok_or_else(invalid)?;
        let (slice, frame) = rest.split_once("_frame-").ok_or_else(invalid)?;
        Ok(Self {
            slice: slice.parse().map_err(|_| invalid())?,
            frame: frame.parse().map_err(|_| invalid())?,
        })
    }
}

/// Scope identifier for a (slice, frame) pair.
pub fn position_scope_id(slice: usize, frame: usize) -> PositionScopeId {
    PositionScopeId::new(slice, frame)
}

/// Finds the position group tagged `id` under `layer`.
///
/// More than one match means the layout was corrupted and is reported as
/// [`DrawError::LayoutInvariant`].
pub fn resolve_scope(scene: &Scene, layer: NodeId, id: &PositionScopeId) -> Result<Option<NodeId>> {
    let tag = id.to_string();
    let mut groups = scene.children_with_tag(layer, NodeRole::PositionGroup, &tag)?;
    match groups.len() {
        0 | 1 => Ok(groups.pop()),
        found => {
            tracing::error!("{} position groups found for {}", found, tag);
            Err(DrawError::LayoutInvariant { scope: tag, found }.into())
        }
    }
}

/// Creates a detached, visible position group tagged `id`.
pub fn create_scope(scene: &mut Scene, id: &PositionScopeId) -> Result<NodeId> {
    let group = scene.create_node(NodeRole::PositionGroup, NodeContent::Group);
    scene.set_name(group, "position-group")?;
    scene.set_tag(group, id.to_string())?;
    scene.set_visible(group, true)?;
    Ok(group)
}

/// Existing scope, or a new detached one when none exists yet.
///
/// The boolean is true when the scope was created by this call.
pub fn resolve_or_create_scope(
    scene: &mut Scene,
    layer: NodeId,
    id: &PositionScopeId,
) -> Result<(NodeId, bool)> {
    match resolve_scope(scene, layer, id)? {
        Some(group) => Ok((group, false)),
        None => Ok((create_scope(scene, id)?, true)),
    }
}

/// Annotation groups placed at scope `id`, in draw order.
pub fn shape_groups_at(scene: &Scene, layer: NodeId, id: &PositionScopeId) -> Result<Vec<NodeId>> {
    match resolve_scope(scene, layer, id)? {
        Some(group) => scene.children_by_role(group, NodeRole::ShapeGroup),
        None => Ok(Vec::new()),
    }
}
