//! Undo history for hosts.
//!
//! The draw tool executes commands itself before handing them over, so
//! [`UndoStack::push`] only records them.

use slicemark_core::{Result, Shared};

use crate::commands::{Command, DrawCommand};
use crate::scene::Scene;

/// Maximum number of commands kept.
pub const MAX_UNDO_DEPTH: usize = 50;

#[derive(Debug, Default)]
pub struct UndoStack {
    undo_stack: Vec<DrawCommand>,
    redo_stack: Vec<DrawCommand>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an already executed command.
    pub fn push(&mut self, cmd: DrawCommand) {
        tracing::debug!("Undo stack push: {}", cmd.name());
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_DEPTH {
            self.undo_stack.remove(0);
        }
    }

    /// Undo last change
    pub fn undo(&mut self, stage: &Shared<Scene>) -> Result<bool> {
        let Some(mut cmd) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = cmd.undo(stage) {
            self.undo_stack.push(cmd);
            return Err(e);
        }
        self.redo_stack.push(cmd);
        Ok(true)
    }

    /// Redo last undo
    pub fn redo(&mut self, stage: &Shared<Scene>) -> Result<bool> {
        let Some(mut cmd) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = cmd.execute(stage) {
            self.redo_stack.push(cmd);
            return Err(e);
        }
        self.undo_stack.push(cmd);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of commands that can be undone.
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Most recent undoable command.
    pub fn last(&self) -> Option<&DrawCommand> {
        self.undo_stack.last()
    }

    /// Clear history stacks
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
