//! The draw tool: turns pointer input into annotations on the draw stage.
//!
//! This module is split into submodules:
//! - `gesture`: point collection, live preview and finalization
//! - `drag`: drag-to-move / drag-to-delete, hover and label edition
//! - `operations`: display toggling, layer rendering, clone and delete

mod drag;
mod gesture;
mod operations;

pub use drag::DragOutcome;
pub use gesture::{DeferredInsertion, Gesture, PointBuffer};

use slicemark_core::{
    DrawError, DrawEvent, DrawEventKind, EventDispatcher, EventHook, ListenerId, Point2D, Result,
};
use slicemark_settings::{DrawConfig, Style};
use std::collections::HashSet;
use std::rc::Rc;

use crate::commands::CommandHooks;
use crate::editor::{ShapeEditor, TrackingEditor};
use crate::factory::ShapeRegistry;
use crate::host::DrawHost;
use crate::layout::{position_scope_id, PositionScopeId};
use crate::scene::{NodeId, Scene};
use drag::DragSession;

/// Draw tool bound to one host.
pub struct DrawTool<H: DrawHost> {
    host: H,
    registry: ShapeRegistry,
    shape_name: String,
    style: Style,
    config: DrawConfig,
    editor: Box<dyn ShapeEditor>,
    dispatcher: Rc<EventDispatcher>,
    gesture: Gesture,
    preview: Option<NodeId>,
    draw_layer: Option<NodeId>,
    trash: Option<NodeId>,
    drag: Option<DragSession>,
    interactive: HashSet<NodeId>,
}

impl<H: DrawHost> DrawTool<H> {
    /// Creates a tool with the given factories and anchor editor.
    ///
    /// The shape kind defaults to the first registered factory; call
    /// [`DrawTool::init`] once the host is ready.
    pub fn new(host: H, registry: ShapeRegistry, editor: Box<dyn ShapeEditor>, config: DrawConfig) -> Self {
        let dispatcher = Rc::new(EventDispatcher::new());
        let mut editor = editor;
        editor.set_draw_event_callback(fire_hook(&dispatcher));
        Self {
            host,
            shape_name: registry.first().unwrap_or_default().to_string(),
            registry,
            style: config.style.clone(),
            config,
            editor,
            dispatcher,
            gesture: Gesture::Idle,
            preview: None,
            draw_layer: None,
            trash: None,
            drag: None,
            interactive: HashSet::new(),
        }
    }

    /// Tool with the reference factories, a tracking editor and default config.
    pub fn with_defaults(host: H) -> Self {
        Self::new(
            host,
            ShapeRegistry::with_defaults(),
            Box::new(TrackingEditor::new()),
            DrawConfig::default(),
        )
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn registry(&self) -> &ShapeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ShapeRegistry {
        &mut self.registry
    }

    pub fn editor(&self) -> &dyn ShapeEditor {
        self.editor.as_ref()
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn config(&self) -> &DrawConfig {
        &self.config
    }

    pub fn shape_name(&self) -> &str {
        &self.shape_name
    }

    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.dispatcher
    }

    /// Hooks that forward command events to the dispatcher.
    pub fn hooks(&self) -> CommandHooks {
        CommandHooks::both(fire_hook(&self.dispatcher))
    }

    /// Registers a lifecycle listener.
    pub fn add_event_listener<F>(&self, kind: DrawEventKind, listener: F) -> ListenerId
    where
        F: Fn(&DrawEvent) + 'static,
    {
        self.dispatcher.add_listener(kind, listener)
    }

    pub fn remove_event_listener(&self, kind: DrawEventKind, id: ListenerId) -> bool {
        self.dispatcher.remove_listener(kind, id)
    }

    pub(crate) fn fire(&self, event: &DrawEvent) {
        tracing::debug!("Firing {}", event.description());
        self.dispatcher.fire(event);
    }

    /// Selects the shape kind used by the next gesture.
    pub fn set_shape_kind(&mut self, name: &str) -> Result<()> {
        if !self.registry.contains(name) {
            tracing::warn!("Rejected unknown shape kind '{}'", name);
            return Err(DrawError::UnknownShape {
                name: name.to_string(),
            }
            .into());
        }
        self.shape_name = name.to_string();
        Ok(())
    }

    pub fn set_line_colour(&mut self, colour: impl Into<String>) {
        self.style.set_line_colour(colour);
    }

    /// Default shape kind, style scale from the host window, line colour re-applied.
    pub fn init(&mut self) -> Result<()> {
        let first = self
            .registry
            .first()
            .ok_or(DrawError::EmptyRegistry)?
            .to_string();
        self.set_shape_kind(&first)?;
        self.style.set_scale(self.host.window_scale());
        let colour = self.style.line_colour().to_string();
        self.set_line_colour(colour);
        tracing::debug!("Draw tool initialised with '{}'", self.shape_name);
        Ok(())
    }

    /// Makes a finalized shape interactive: draggable, hover, drag and double-click.
    pub fn set_shape_on(&mut self, shape: NodeId) -> Result<()> {
        self.host.draw_stage().borrow_mut().set_draggable(shape, true)?;
        self.interactive.insert(shape);
        Ok(())
    }

    /// Removes the shape's handlers. A destroyed shape is only forgotten.
    pub fn set_shape_off(&mut self, shape: NodeId) -> Result<()> {
        self.interactive.remove(&shape);
        let stage = self.host.draw_stage();
        let mut scene = stage.borrow_mut();
        if scene.contains(shape) {
            scene.set_draggable(shape, false)?;
        }
        Ok(())
    }

    pub fn is_shape_on(&self, shape: NodeId) -> bool {
        self.interactive.contains(&shape)
    }

    pub(crate) fn require_interactive(&self, shape: NodeId) -> Result<()> {
        if self.is_shape_on(shape) {
            Ok(())
        } else {
            Err(DrawError::NotInteractive {
                node: shape.to_string(),
            }
            .into())
        }
    }

    /// Draw layer in use; falls back to the host's current layer before `display`.
    pub(crate) fn layer(&self) -> NodeId {
        self.draw_layer
            .unwrap_or_else(|| self.host.current_draw_layer())
    }

    /// Scope of the host's current slice and frame.
    pub fn current_scope_id(&self) -> PositionScopeId {
        position_scope_id(self.host.current_position().k, self.host.current_frame())
    }

    /// Disables the editor and clears its binding.
    pub(crate) fn unbind_editor(&mut self) -> Result<()> {
        let stage = self.host.draw_stage();
        self.editor.disable(&mut stage.borrow_mut())?;
        self.editor.set_shape(None);
        self.editor.set_image(None);
        Ok(())
    }

    /// Display name of the kind behind an annotation group.
    pub(crate) fn display_name_of(&self, scene: &Scene, group: NodeId) -> String {
        let name = scene.node(group).map(|n| n.name().to_string()).unwrap_or_default();
        self.registry
            .display_name_for(&name)
            .map(str::to_string)
            .unwrap_or(name)
    }

    /// Real coordinate under a screen offset, per the host's current view.
    pub(crate) fn real_position(&self, screen: Point2D) -> Point2D {
        self.host.viewport().to_real(screen)
    }
}

fn fire_hook(dispatcher: &Rc<EventDispatcher>) -> EventHook {
    let dispatcher = Rc::clone(dispatcher);
    Rc::new(move |event: &DrawEvent| dispatcher.fire(event))
}
