//! In-memory viewer hosting the draw tool for headless sessions.

use slicemark_core::{shared, ImageGeometry, Result, Shared, SlicePosition};
use slicemark_draw::{
    CursorStyle, DrawCommand, DrawHost, HostEventKind, KeyEvent, NodeId, Scene, UndoStack,
    Viewport,
};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::Duration;

/// A viewer without a window: one stage, one draw layer, a manual clock.
pub struct MemoryHost {
    stage: Shared<Scene>,
    layer: NodeId,
    position: SlicePosition,
    frame: usize,
    slice_count: usize,
    image: Option<ImageGeometry>,
    viewport: Viewport,
    window_scale: f64,
    undo: UndoStack,
    clock: Duration,
    subscriptions: HashSet<HostEventKind>,
    canvas_listening: bool,
    cursor: CursorStyle,
    prompt_answer: Option<String>,
    keys: Vec<KeyEvent>,
}

impl MemoryHost {
    pub fn new(slice_count: usize) -> Self {
        let mut scene = Scene::new();
        let layer = scene.add_layer();
        Self {
            stage: shared(scene),
            layer,
            position: SlicePosition::default(),
            frame: 0,
            slice_count,
            image: None,
            viewport: Viewport::default(),
            window_scale: 1.0,
            undo: UndoStack::new(),
            clock: Duration::ZERO,
            subscriptions: HashSet::new(),
            canvas_listening: false,
            cursor: CursorStyle::Default,
            prompt_answer: None,
            keys: Vec::new(),
        }
    }

    pub fn with_image(mut self, image: Option<ImageGeometry>) -> Self {
        self.image = image;
        self
    }

    pub fn stage(&self) -> &Shared<Scene> {
        &self.stage
    }

    pub fn layer(&self) -> NodeId {
        self.layer
    }

    pub fn position(&self) -> SlicePosition {
        self.position
    }

    pub fn set_frame(&mut self, frame: usize) {
        self.frame = frame;
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn set_window_scale(&mut self, scale: f64) {
        self.window_scale = scale;
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.undo.undo(&self.stage)
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.undo.redo(&self.stage)
    }

    /// Advances the clock driving deferred anchor insertion.
    pub fn advance(&mut self, delta: Duration) {
        self.clock += delta;
    }

    pub fn is_subscribed(&self, kind: HostEventKind) -> bool {
        self.subscriptions.contains(&kind)
    }

    pub fn canvas_listening(&self) -> bool {
        self.canvas_listening
    }

    pub fn cursor(&self) -> CursorStyle {
        self.cursor
    }

    /// Answer given to the next label prompt; `None` cancels it.
    pub fn set_prompt_answer(&mut self, answer: Option<String>) {
        self.prompt_answer = answer;
    }

    pub fn keys(&self) -> &[KeyEvent] {
        &self.keys
    }
}

impl DrawHost for MemoryHost {
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
        tracing::debug!("Viewer moved to {}", position);
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
        tracing::debug!("Key forwarded: {}", event.key);
        self.keys.push(event.clone());
    }

    fn now(&self) -> Duration {
        self.clock
    }

    fn set_cursor(&mut self, cursor: CursorStyle) {
        self.cursor = cursor;
    }

    fn prompt_label(&mut self, title: &str, current: &str) -> Option<String> {
        tracing::debug!("{} (was '{}')", title, current);
        self.prompt_answer.take()
    }
}
