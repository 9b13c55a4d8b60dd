use crate::ast::FunctionDef;
use crate::value::Value;
use indexmap::IndexMap;
use std::rc::Rc;

/// One layer of bindings. Insertion order is kept so dumps are stable.
pub type Frame = IndexMap<Rc<str>, Value>;

/// The run-time scope stack. Index 0 is the global frame; every decree call
/// pushes one frame and pops it when the call ends, however it ends.
///
/// Visibility is dynamic: a read searches every frame from the top down, so a
/// decree sees its caller's bindings, not the ones where it was declared.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub fn new() -> Self {
        let mut frames = Vec::with_capacity(8);
        frames.push(Frame::new());
        Self { frames }
    }

    /// Number of frames, always at least one.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn global(&self) -> &Frame {
        &self.frames[0]
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Searches from the topmost frame down to the global one.
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.frames.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Index of the topmost frame that binds `name`.
    pub fn find_frame(&self, name: &str) -> Option<usize> {
        self.frames.iter().rposition(|frame| frame.contains_key(name))
    }

    /// Finds the topmost binding of `name` that holds a decree. Bindings of
    /// the same name holding anything else are passed over.
    pub fn lookup_function(&self, name: &str) -> Option<Rc<FunctionDef>> {
        self.frames
            .iter()
            .rev()
            .filter_map(|frame| frame.get(name))
            .find_map(|value| value.as_function().cloned())
    }

    /// Writes into the topmost frame, shadowing any outer binding.
    pub fn assign(&mut self, name: Rc<str>, value: Value) {
        if let Some(top) = self.frames.last_mut() {
            top.insert(name, value);
        }
    }

    pub fn define_global(&mut self, name: Rc<str>, value: Value) {
        self.frames[0].insert(name, value);
    }

    /// Overwrites `name` in a specific frame. Returns false if there is no such frame.
    pub fn set_in_frame(&mut self, index: usize, name: Rc<str>, value: Value) -> bool {
        match self.frames.get_mut(index) {
            Some(frame) => {
                frame.insert(name, value);
                true
            }
            None => false,
        }
    }

    /// Runs `body` with `frame` pushed on top. The frame is popped before
    /// returning whatever `body` produced, errors included.
    pub fn with_frame<T>(&mut self, frame: Frame, body: impl FnOnce(&mut Self) -> T) -> T {
        self.frames.push(frame);
        let result = body(self);
        self.frames.pop();
        result
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
