//! Recording host used by the tool tests.
#![allow(dead_code)]

use slicemark_core::{shared, DrawEvent, DrawEventKind, ImageGeometry, Point2D, Shared, SlicePosition};
use slicemark_draw::{
    CursorStyle, DrawCommand, DrawHost, DrawTool, HostEventKind, KeyEvent, NodeId, NodeRole,
    PointerEvent, Scene, UndoStack, Viewport,
};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

pub struct FakeHost {
    pub stage: Shared<Scene>,
    pub layer: NodeId,
    pub position: SlicePosition,
    pub frame: usize,
    pub undo: UndoStack,
    pub clock: Duration,
    pub subscriptions: HashSet<HostEventKind>,
    pub canvas_listening: bool,
    pub viewport: Viewport,
    pub window_scale: f64,
    pub slice_count: usize,
    pub keys: Vec<KeyEvent>,
    pub cursor: CursorStyle,
    pub prompt_answer: Option<String>,
    pub prompts: Vec<String>,
    pub image: Option<ImageGeometry>,
}

impl FakeHost {
    pub fn new() -> Self {
        let mut scene = Scene::new();
        let layer = scene.add_layer();
        Self {
            stage: shared(scene),
            layer,
            position: SlicePosition::default(),
            frame: 0,
            undo: UndoStack::new(),
            clock: Duration::ZERO,
            subscriptions: HashSet::new(),
            canvas_listening: false,
            viewport: Viewport::default(),
            window_scale: 1.0,
            slice_count: 5,
            keys: Vec::new(),
            cursor: CursorStyle::Default,
            prompt_answer: None,
            prompts: Vec::new(),
            image: None,
        }
    }

    pub fn advance(&mut self, millis: u64) {
        self.clock += Duration::from_millis(millis);
    }

    pub fn undo_last(&mut self) -> bool {
        self.undo.undo(&self.stage).unwrap()
    }
}

impl DrawHost for FakeHost {
    fn draw_stage(&self) -> Shared<Scene> {
        Rc::clone(&self.stage)
    }

    fn current_draw_layer(&self) -> NodeId {
        self.layer
    }

    fn image(&self) -> Option<ImageGeometry> {
        self.image.clone()
    }

    fn current_position(&self) -> SlicePosition {
        self.position
    }

    fn current_frame(&self) -> usize {
        self.frame
    }

    fn set_current_position(&mut self, position: SlicePosition) {
        self.position = position;
    }

    fn push_undo(&mut self, command: DrawCommand) {
        self.undo.push(command);
    }

    fn add_host_listener(&mut self, kind: HostEventKind) {
        self.subscriptions.insert(kind);
    }

    fn remove_host_listener(&mut self, kind: HostEventKind) {
        self.subscriptions.remove(&kind);
    }

    fn set_canvas_listening(&mut self, listening: bool) {
        self.canvas_listening = listening;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn window_scale(&self) -> f64 {
        self.window_scale
    }

    fn slice_count(&self) -> usize {
        self.slice_count
    }

    fn on_keydown(&mut self, event: &KeyEvent) {
        self.keys.push(event.clone());
    }

    fn now(&self) -> Duration {
        self.clock
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn prompt_label(&mut self, title: &str, _current: &str) -> Option<String> {
        self.prompts.push(title.to_string());
        self.prompt_answer.clone()
    }
}

/// Initialised and displayed tool on a fresh host.
pub fn tool() -> DrawTool<FakeHost> {
    let mut tool = DrawTool::with_defaults(FakeHost::new());
    tool.init().unwrap();
    tool.display(true).unwrap();
    tool
}

/// Draws a shape of the current kind from `from` to `to` and returns its group.
pub fn draw(tool: &mut DrawTool<FakeHost>, from: (f64, f64), to: (f64, f64)) -> NodeId {
    tool.pointer_down(&PointerEvent::at(from.0, from.1)).unwrap();
    tool.pointer_move(&PointerEvent::at(to.0, to.1)).unwrap();
    tool.pointer_up(&PointerEvent::at(to.0, to.1))
        .unwrap()
        .expect("annotation committed")
}

pub fn shape_of(tool: &DrawTool<FakeHost>, group: NodeId) -> NodeId {
    tool.host()
        .stage
        .borrow()
        .child_by_role(group, NodeRole::Shape)
        .unwrap()
        .expect("group has a shape")
}

/// Positions of every child of `group`.
pub fn child_positions(tool: &DrawTool<FakeHost>, group: NodeId) -> Vec<Point2D> {
    let scene = tool.host().stage.borrow();
    scene
        .children(group)
        .unwrap()
        .iter()
        .map(|child| scene.position(*child).unwrap())
        .collect()
}

/// Records the kinds of the events fired on the tool's dispatcher.
pub fn record_events(tool: &DrawTool<FakeHost>) -> Rc<RefCell<Vec<DrawEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in DrawEventKind::ALL {
        let sink = Rc::clone(&log);
        tool.add_event_listener(kind, move |event| sink.borrow_mut().push(event.clone()));
    }
    log
}

pub fn kinds(log: &Rc<RefCell<Vec<DrawEvent>>>) -> Vec<DrawEventKind> {
    log.borrow().iter().map(|e| e.kind).collect()
}
