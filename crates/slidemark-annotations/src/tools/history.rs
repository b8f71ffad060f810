//! Undo/redo checkpoints for an in-progress path.

use crate::model::ShapeJson;

/// Full-shape snapshots, newest last.
#[derive(Debug, Clone, Default)]
pub struct ShapeHistory {
    undo_stack: Vec<ShapeJson>,
    redo_stack: Vec<ShapeJson>,
}

impl ShapeHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh commit invalidates any forward history.
    pub fn checkpoint(&mut self, snapshot: ShapeJson) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Push without touching the redo stack (used while replaying a redo).
    pub fn push_undo(&mut self, snapshot: ShapeJson) {
        self.undo_stack.push(snapshot);
    }

    pub fn push_redo(&mut self, snapshot: ShapeJson) {
        self.redo_stack.push(snapshot);
    }

    pub fn pop_undo(&mut self) -> Option<ShapeJson> {
        self.undo_stack.pop()
    }

    pub fn pop_redo(&mut self) -> Option<ShapeJson> {
        self.redo_stack.pop()
    }

    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
}
