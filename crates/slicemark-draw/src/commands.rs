//! Undoable draw commands.
//!
//! Each command wraps one scene mutation on an annotation group. Commands
//! borrow the stage only while mutating it; hooks run after the borrow is
//! released so listeners may inspect the scene.

use slicemark_core::{DrawError, DrawEvent, DrawEventKind, EventHook, Point2D, Result, Shared};
use std::fmt;

use crate::scene::{NodeId, Scene};

/// A command that can be executed and undone on the draw stage.
pub trait Command {
    /// Executes the command.
    fn execute(&mut self, stage: &Shared<Scene>) -> Result<()>;

    /// Undoes the command.
    fn undo(&mut self, stage: &Shared<Scene>) -> Result<()>;

    /// Returns the name of the command for display.
    fn name(&self) -> &str;
}

/// Post-execute and post-undo callbacks.
#[derive(Clone, Default)]
pub struct CommandHooks {
    pub on_execute: Option<EventHook>,
    pub on_undo: Option<EventHook>,
}

impl CommandHooks {
    /// Same hook for both directions.
    pub fn both(hook: EventHook) -> Self {
        Self {
            on_execute: Some(hook.clone()),
            on_undo: Some(hook),
        }
    }

    fn executed(&self, event: DrawEvent) {
        if let Some(hook) = &self.on_execute {
            hook(&event);
        }
    }

    fn undone(&self, event: DrawEvent) {
        if let Some(hook) = &self.on_undo {
            hook(&event);
        }
    }
}

impl fmt::Debug for CommandHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHooks")
            .field("on_execute", &self.on_execute.is_some())
            .field("on_undo", &self.on_undo.is_some())
            .finish()
    }
}

fn group_event(scene: &Scene, kind: DrawEventKind, group: NodeId, shape_name: &str) -> DrawEvent {
    match scene.node(group).ok().and_then(|n| n.tag()) {
        Some(id) => DrawEvent::for_group(kind, id, shape_name),
        None => {
            let mut event = DrawEvent::new(kind);
            event.shape_name = Some(shape_name.to_string());
            event
        }
    }
}

/// Places an annotation group under its position scope.
///
/// A transient command has no scope: it attaches the group straight to the
/// layer for previews, and never fires hooks.
#[derive(Debug, Clone)]
pub struct DrawGroup {
    pub group: NodeId,
    pub scope: Option<NodeId>,
    pub layer: NodeId,
    pub shape_name: String,
    name: String,
    attached_scope: bool,
    hooks: CommandHooks,
}

/// Translates every child of an annotation group.
#[derive(Debug, Clone)]
pub struct MoveGroup {
    pub group: NodeId,
    pub translation: Point2D,
    pub shape_name: String,
    name: String,
    hooks: CommandHooks,
}

/// Detaches an annotation group from its scope.
#[derive(Debug, Clone)]
pub struct DeleteGroup {
    pub group: NodeId,
    pub shape_name: String,
    name: String,
    slot: Option<(NodeId, usize)>,
    hooks: CommandHooks,
}

#[derive(Debug, Clone)]
pub enum DrawCommand {
    DrawGroup(DrawGroup),
    MoveGroup(MoveGroup),
    DeleteGroup(DeleteGroup),
}

impl DrawCommand {
    /// Create command placing `group` under `scope` (itself placed under `layer`).
    pub fn draw(group: NodeId, scope: NodeId, layer: NodeId, shape_name: impl Into<String>) -> Self {
        let shape_name = shape_name.into();
        DrawCommand::DrawGroup(DrawGroup {
            group,
            scope: Some(scope),
            layer,
            name: format!("Draw-{}", shape_name),
            shape_name,
            attached_scope: false,
            hooks: CommandHooks::default(),
        })
    }

    /// Silent create command used to render previews.
    pub fn transient(group: NodeId, layer: NodeId, shape_name: impl Into<String>) -> Self {
        let shape_name = shape_name.into();
        DrawCommand::DrawGroup(DrawGroup {
            group,
            scope: None,
            layer,
            name: format!("Draw-{}", shape_name),
            shape_name,
            attached_scope: false,
            hooks: CommandHooks::default(),
        })
    }

    /// Move command, or `None` for a zero translation.
    pub fn translate(group: NodeId, translation: Point2D, shape_name: impl Into<String>) -> Option<Self> {
        if translation.is_zero() {
            return None;
        }
        let shape_name = shape_name.into();
        Some(DrawCommand::MoveGroup(MoveGroup {
            group,
            translation,
            name: format!("Move-{}", shape_name),
            shape_name,
            hooks: CommandHooks::default(),
        }))
    }

    pub fn delete(group: NodeId, shape_name: impl Into<String>) -> Self {
        let shape_name = shape_name.into();
        DrawCommand::DeleteGroup(DeleteGroup {
            group,
            name: format!("Delete-{}", shape_name),
            shape_name,
            slot: None,
            hooks: CommandHooks::default(),
        })
    }

    /// Attaches hooks. Transient commands ignore them.
    pub fn with_hooks(mut self, hooks: CommandHooks) -> Self {
        match &mut self {
            DrawCommand::DrawGroup(cmd) if cmd.scope.is_some() => cmd.hooks = hooks,
            DrawCommand::DrawGroup(_) => {}
            DrawCommand::MoveGroup(cmd) => cmd.hooks = hooks,
            DrawCommand::DeleteGroup(cmd) => cmd.hooks = hooks,
        }
        self
    }

    /// Annotation group the command acts on.
    pub fn group(&self) -> NodeId {
        match self {
            DrawCommand::DrawGroup(cmd) => cmd.group,
            DrawCommand::MoveGroup(cmd) => cmd.group,
            DrawCommand::DeleteGroup(cmd) => cmd.group,
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, DrawCommand::DrawGroup(cmd) if cmd.scope.is_none())
    }
}

impl Command for DrawCommand {
    fn execute(&mut self, stage: &Shared<Scene>) -> Result<()> {
        match self {
            DrawCommand::DrawGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    match cmd.scope {
                        Some(scope) => {
                            if scene.parent(scope)?.is_none() {
                                scene.add(cmd.layer, scope)?;
                                cmd.attached_scope = true;
                            }
                            if scene.parent(cmd.group)? != Some(scope) {
                                scene.add(scope, cmd.group)?;
                            }
                        }
                        None => scene.add(cmd.layer, cmd.group)?,
                    }
                    group_event(&scene, DrawEventKind::Create, cmd.group, &cmd.shape_name)
                };
                if cmd.scope.is_some() {
                    tracing::debug!("{} executed on {}", cmd.name, cmd.group);
                    cmd.hooks.executed(event);
                }
            }
            DrawCommand::MoveGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    translate_children(&mut scene, cmd.group, cmd.translation)?;
                    group_event(&scene, DrawEventKind::Move, cmd.group, &cmd.shape_name)
                };
                tracing::debug!("{} by {} executed", cmd.name, cmd.translation);
                cmd.hooks.executed(event);
            }
            DrawCommand::DeleteGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    let slot = scene.remove(cmd.group)?;
                    if slot.is_none() {
                        return Err(DrawError::UnknownNode {
                            node: format!("{} is not attached", cmd.group),
                        }
                        .into());
                    }
                    cmd.slot = slot;
                    group_event(&scene, DrawEventKind::Delete, cmd.group, &cmd.shape_name)
                };
                tracing::debug!("{} executed on {}", cmd.name, cmd.group);
                cmd.hooks.executed(event);
            }
        }
        Ok(())
    }

    fn undo(&mut self, stage: &Shared<Scene>) -> Result<()> {
        match self {
            DrawCommand::DrawGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    scene.remove(cmd.group)?;
                    if let Some(scope) = cmd.scope {
                        if cmd.attached_scope && scene.children(scope)?.is_empty() {
                            scene.remove(scope)?;
                            cmd.attached_scope = false;
                        }
                    }
                    group_event(&scene, DrawEventKind::Delete, cmd.group, &cmd.shape_name)
                };
                if cmd.scope.is_some() {
                    tracing::debug!("{} undone on {}", cmd.name, cmd.group);
                    cmd.hooks.undone(event);
                }
            }
            DrawCommand::MoveGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    translate_children(&mut scene, cmd.group, -cmd.translation)?;
                    group_event(&scene, DrawEventKind::Move, cmd.group, &cmd.shape_name)
                };
                tracing::debug!("{} undone", cmd.name);
                cmd.hooks.undone(event);
            }
            DrawCommand::DeleteGroup(cmd) => {
                let event = {
                    let mut scene = stage.borrow_mut();
                    if let Some((parent, index)) = cmd.slot.take() {
                        scene.insert(parent, cmd.group, index)?;
                    }
                    group_event(&scene, DrawEventKind::Create, cmd.group, &cmd.shape_name)
                };
                tracing::debug!("{} undone on {}", cmd.name, cmd.group);
                cmd.hooks.undone(event);
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self {
            DrawCommand::DrawGroup(cmd) => &cmd.name,
            DrawCommand::MoveGroup(cmd) => &cmd.name,
            DrawCommand::DeleteGroup(cmd) => &cmd.name,
        }
    }
}

/// Translates every direct child of `group`.
pub fn translate_children(scene: &mut Scene, group: NodeId, translation: Point2D) -> Result<()> {
    let children = scene.children(group)?.to_vec();
    for child in children {
        scene.translate(child, translation)?;
    }
    Ok(())
}
