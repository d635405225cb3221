//! Headless replay of scripted input against the draw tool.
//!
//! A script is a JSON document listing pointer, drag, key and clock steps.
//! Pointer coordinates are screen coordinates; the image coordinate is derived
//! from the host view.

use serde::{Deserialize, Serialize};
use slicemark_core::{
    DrawError, DrawEvent, DrawEventKind, Error, ImageGeometry, Point2D, Result, SlicePosition,
};
use slicemark_draw::{
    DragEvent, DrawHost, DrawTool, KeyEvent, NodeId, NodeRole, PointerEvent, ShapeRegistry,
    TrackingEditor, Viewport,
};
use slicemark_settings::DrawConfig;
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use crate::host::MemoryHost;
use crate::types::{AnnotationSummary, ReplayReport, StepFailure};

fn default_slice_count() -> usize {
    1
}

/// Layer index as typed by a user or given as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerInput {
    Index(i64),
    Text(String),
}

/// One scripted input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Shape { name: String },
    Display { on: bool },
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up { x: f64, y: f64 },
    Out { x: f64, y: f64 },
    /// Advances the clock by `ms` and runs due deferred insertions.
    Tick { ms: u64 },
    /// Drags the shape under (x, y) to (to_x, to_y).
    Drag { x: f64, y: f64, to_x: f64, to_y: f64 },
    /// Double-clicks the shape under (x, y); a missing text cancels the prompt.
    Label {
        x: f64,
        y: f64,
        #[serde(default)]
        text: Option<String>,
    },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    Slice { k: usize },
    Frame { f: usize },
    #[serde(rename = "clone")]
    CloneTo {
        layer: LayerInput,
        #[serde(default)]
        restart: bool,
    },
    Delete,
    Undo,
    Redo,
}

/// A replay script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default = "default_slice_count")]
    pub slice_count: usize,
    #[serde(default)]
    pub image: Option<ImageGeometry>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let script = Self::from_json(&content)?;
        tracing::debug!("Loaded {} steps from {}", script.steps.len(), path.display());
        Ok(script)
    }
}

/// A draw tool on an in-memory host, recording every lifecycle event.
pub struct Replay {
    tool: DrawTool<MemoryHost>,
    log: Rc<RefCell<Vec<DrawEvent>>>,
    failures: Vec<StepFailure>,
}

impl Replay {
    pub fn new(script: &Script, config: DrawConfig) -> Result<Self> {
        let host = MemoryHost::new(script.slice_count).with_image(script.image.clone());
        let mut tool = DrawTool::new(
            host,
            ShapeRegistry::with_defaults(),
            Box::new(TrackingEditor::new()),
            config,
        );
        tool.init()?;
        tool.display(true)?;

        let log = Rc::new(RefCell::new(Vec::new()));
        for kind in DrawEventKind::ALL {
            let sink = Rc::clone(&log);
            tool.add_event_listener(kind, move |event| sink.borrow_mut().push(event.clone()));
        }
        Ok(Self {
            tool,
            log,
            failures: Vec::new(),
        })
    }

    pub fn tool(&self) -> &DrawTool<MemoryHost> {
        &self.tool
    }

    pub fn tool_mut(&mut self) -> &mut DrawTool<MemoryHost> {
        &mut self.tool
    }

    /// Runs every step. Rejected steps are recorded and skipped; a broken
    /// scene layout aborts the replay.
    pub fn run(&mut self, steps: &[Step]) -> Result<()> {
        for (index, step) in steps.iter().enumerate() {
            match self.apply(step) {
                Ok(()) => {}
                Err(Error::Draw(err)) if err.is_invariant_violation() => {
                    tracing::error!("Step {} broke the scene: {}", index, err);
                    return Err(err.into());
                }
                Err(err) => {
                    tracing::warn!("Step {} rejected: {}", index, err);
                    self.failures.push(StepFailure {
                        step: index,
                        message: err.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn apply(&mut self, step: &Step) -> Result<()> {
        tracing::debug!("Replaying {:?}", step);
        let view = self.tool.host().viewport();
        match step {
            Step::Shape { name } => self.tool.set_shape_kind(name),
            Step::Display { on } => self.tool.display(*on),
            Step::Down { x, y } => self.tool.pointer_down(&pointer(&view, *x, *y)),
            Step::Move { x, y } => self.tool.pointer_move(&pointer(&view, *x, *y)),
            Step::Up { x, y } => self.tool.pointer_up(&pointer(&view, *x, *y)).map(|_| ()),
            Step::Out { x, y } => self.tool.pointer_out(&pointer(&view, *x, *y)).map(|_| ()),
            Step::Tick { ms } => {
                self.tool.host_mut().advance(Duration::from_millis(*ms));
                self.tool.run_pending_tasks();
                Ok(())
            }
            Step::Drag { x, y, to_x, to_y } => self.drag(*x, *y, *to_x, *to_y),
            Step::Label { x, y, text } => {
                let shape = self.shape_at(*x, *y)?;
                self.tool.host_mut().set_prompt_answer(text.clone());
                self.tool.double_click(shape).map(|_| ())
            }
            Step::Key { key, ctrl, shift } => {
                self.tool.key_down(&KeyEvent {
                    key: key.clone(),
                    ctrl: *ctrl,
                    shift: *shift,
                });
                Ok(())
            }
            Step::Slice { k } => {
                let position = self.tool.host().position().with_slice(*k);
                self.move_viewer(position, None)
            }
            Step::Frame { f } => {
                let position = self.tool.host().position();
                self.move_viewer(position, Some(*f))
            }
            Step::CloneTo { layer, restart } => match layer {
                LayerInput::Index(index) => self.tool.clone_draw(*index, *restart).map(|_| ()),
                LayerInput::Text(text) => self
                    .tool
                    .clone_draw_from_input(text, *restart)
                    .map(|_| ()),
            },
            Step::Delete => self.tool.delete_draw(None),
            Step::Undo => {
                self.tool.host_mut().undo()?;
                self.tool.update_draw_layer()
            }
            Step::Redo => {
                self.tool.host_mut().redo()?;
                self.tool.update_draw_layer()
            }
        }
    }

    fn move_viewer(&mut self, position: SlicePosition, frame: Option<usize>) -> Result<()> {
        self.tool.host_mut().set_current_position(position);
        if let Some(frame) = frame {
            self.tool.host_mut().set_frame(frame);
        }
        self.tool.update_draw_layer()
    }

    /// Interactive shape under a screen location.
    fn shape_at(&self, x: f64, y: f64) -> Result<NodeId> {
        let host = self.tool.host();
        let real = host.viewport().to_real(Point2D::new(x, y));
        let scene = host.stage().borrow();
        let shape = match scene.intersection(real) {
            Some(node) => match scene.parent(node)? {
                Some(group) => scene.child_by_role(group, NodeRole::Shape)?,
                None => None,
            },
            None => None,
        };
        shape.ok_or_else(|| DrawError::NoSelection.into())
    }

    fn drag(&mut self, x: f64, y: f64, to_x: f64, to_y: f64) -> Result<()> {
        let shape = self.shape_at(x, y)?;
        let view = self.tool.host().viewport();
        let delta = view.to_real(Point2D::new(to_x, to_y)) - view.to_real(Point2D::new(x, y));
        let start = self.tool.host().stage().borrow().position(shape)?;
        let event = DragEvent::new(start + delta, Point2D::new(to_x, to_y));

        self.tool.drag_start(shape)?;
        self.tool.drag_move(&event)?;
        let outcome = self.tool.drag_end(&event)?;
        tracing::debug!("Drag of {} ended: {:?}", shape, outcome);
        Ok(())
    }

    pub fn events(&self) -> Vec<DrawEvent> {
        self.log.borrow().clone()
    }

    /// Snapshot of the session: event log and every annotation on the stage.
    pub fn report(&self) -> Result<ReplayReport> {
        let host = self.tool.host();
        let scene = host.stage().borrow();
        let mut annotations = Vec::new();
        for scope in scene.children_by_role(host.layer(), NodeRole::PositionGroup)? {
            let scope_tag = scene.node(scope)?.tag().unwrap_or_default().to_string();
            for group in scene.children_by_role(scope, NodeRole::ShapeGroup)? {
                let node = scene.node(group)?;
                let kind = self
                    .tool
                    .registry()
                    .display_name_for(node.name())
                    .unwrap_or(node.name())
                    .to_string();
                let label = match scene.child_by_role(group, NodeRole::Label)? {
                    Some(label) => scene
                        .node(label)?
                        .label()
                        .map(|l| l.text.clone())
                        .unwrap_or_default(),
                    None => String::new(),
                };
                let points = match scene.child_by_role(group, NodeRole::Shape)? {
                    Some(shape) => scene.absolute_points(shape)?,
                    None => Vec::new(),
                };
                annotations.push(AnnotationSummary {
                    id: node.tag().unwrap_or_default().to_string(),
                    kind,
                    scope: scope_tag.clone(),
                    label,
                    points,
                });
            }
        }
        Ok(ReplayReport {
            events: self.events(),
            annotations,
            failures: self.failures.clone(),
            undo_depth: host.undo_stack().len(),
        })
    }
}

fn pointer(view: &Viewport, x: f64, y: f64) -> PointerEvent {
    PointerEvent::from_screen(Point2D::new(x, y), view)
}

/// Replays `script` with `config` and reports the final state.
pub fn run_script(script: &Script, config: DrawConfig) -> Result<ReplayReport> {
    let mut replay = Replay::new(script, config)?;
    replay.run(&script.steps)?;
    replay.report()
}
