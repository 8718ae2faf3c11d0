//! Interaction state of a floating sticky: drag tracking, size clamping and the
//! local edit buffer. Nothing here touches the DOM; `components::sticky_note` supplies
//! the window listeners through [`PointerCapture`].

use crate::models::{FloatingNote, NoteColor, Point, Size};

pub(crate) const MIN_EDGE: f64 = 100.0;
pub(crate) const FALLBACK_EDGE: f64 = 200.0;

/// One side of a floating note. Missing, zero or non-finite input falls back to
/// `FALLBACK_EDGE`; anything else is raised to at least `MIN_EDGE`.
pub(crate) fn clamp_edge(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v != 0.0 => v.max(MIN_EDGE),
        _ => FALLBACK_EDGE,
    }
}

pub(crate) fn resize(width: Option<f64>, height: Option<f64>) -> Size {
    Size {
        width: clamp_edge(width),
        height: clamp_edge(height),
    }
}

impl Default for Size {
    fn default() -> Self {
        resize(None, None)
    }
}

impl Size {
    pub fn with_width(self, width: Option<f64>) -> Self {
        Self {
            width: clamp_edge(width),
            ..self
        }
    }

    pub fn with_height(self, height: Option<f64>) -> Self {
        Self {
            height: clamp_edge(height),
            ..self
        }
    }
}

/// Process-wide pointer listeners held for the lifetime of a drag.
pub(crate) trait PointerCapture {
    /// Register move + release listeners.
    fn acquire(&mut self);
    /// Deregister whatever `acquire` registered.
    fn release(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DragState {
    Idle,
    Dragging { offset: Point },
}

/// Two-state drag machine. Entering `Dragging` acquires the capture, leaving it (or
/// dropping the tracker mid-drag) releases it, so listeners never outlive a drag.
pub(crate) struct DragTracker<C: PointerCapture> {
    state: DragState,
    capture: C,
}

impl<C: PointerCapture> DragTracker<C> {
    pub fn new(capture: C) -> Self {
        Self {
            state: DragState::Idle,
            capture,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    #[cfg(test)]
    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn start(&mut self, pointer: Point, position: Point) {
        let offset = pointer.offset_from(position);
        let was_idle = !self.is_dragging();
        self.state = DragState::Dragging { offset };
        if was_idle {
            self.capture.acquire();
        }
    }

    /// New top-left corner for the note, or `None` when no drag is active.
    pub fn pointer_move(&mut self, pointer: Point) -> Option<Point> {
        match self.state {
            DragState::Dragging { offset } => Some(pointer.offset_from(offset)),
            DragState::Idle => None,
        }
    }

    pub fn end(&mut self) {
        if self.is_dragging() {
            self.state = DragState::Idle;
            self.capture.release();
        }
    }
}

impl<C: PointerCapture> Drop for DragTracker<C> {
    fn drop(&mut self) {
        self.end();
    }
}

/// Local edit buffer of a floating note.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct FloatingEditor {
    editing: bool,
    buffer: String,
}

impl FloatingEditor {
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn begin(&mut self, content: &str) {
        self.editing = true;
        self.buffer = content.to_string();
    }

    pub fn input(&mut self, text: &str) {
        if self.editing {
            self.buffer = text.to_string();
        }
    }

    /// Commit the buffer and leave edit mode. `None` if not editing.
    pub fn save(&mut self) -> Option<String> {
        if !self.editing {
            return None;
        }
        self.editing = false;
        Some(std::mem::take(&mut self.buffer))
    }

    pub fn cancel(&mut self) {
        self.editing = false;
        self.buffer.clear();
    }
}

const CASCADE_STEP: f64 = 24.0;
const CASCADE_SLOTS: usize = 10;

/// A fresh sticky for the board: unique id, cascaded below-right of the previous
/// ones and cycling through the palette.
pub(crate) fn spawn_floating(existing: &[FloatingNote], now: i64) -> FloatingNote {
    let mut stamp = now;
    let id = loop {
        let candidate = format!("sticky-{stamp}");
        if !existing.iter().any(|n| n.id == candidate) {
            break candidate;
        }
        stamp += 1;
    };
    let slot = (existing.len() % CASCADE_SLOTS) as f64;
    let offset = CASCADE_STEP * (slot + 1.0);
    FloatingNote {
        id,
        content: String::new(),
        position: Point::new(offset, offset),
        size: Size::default(),
        color: NoteColor::PALETTE[existing.len() % NoteColor::PALETTE.len()],
    }
}

/// The stickies on the board plus whether they need writing out.
///
/// Moves mark the board unsaved only once the drag finishes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Board {
    notes: Vec<FloatingNote>,
    unsaved: bool,
    moving: bool,
}

impl Board {
    pub fn new(notes: Vec<FloatingNote>) -> Self {
        Self {
            notes,
            ..Self::default()
        }
    }

    pub fn notes(&self) -> &[FloatingNote] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&FloatingNote> {
        self.notes.iter().find(|n| n.id == id)
    }

    fn with_note(&mut self, id: &str, f: impl FnOnce(&mut FloatingNote)) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                f(n);
                true
            }
            None => false,
        }
    }

    pub fn add(&mut self, now: i64) -> String {
        let note = spawn_floating(&self.notes, now);
        let id = note.id.clone();
        self.notes.push(note);
        self.unsaved = true;
        id
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        let removed = self.notes.len() != before;
        self.unsaved |= removed;
        removed
    }

    pub fn set_content(&mut self, id: &str, content: String) -> bool {
        let changed = self.with_note(id, |n| n.content = content);
        self.unsaved |= changed;
        changed
    }

    pub fn set_size(&mut self, id: &str, size: Size) -> bool {
        let changed = self.with_note(id, |n| n.size = size);
        self.unsaved |= changed;
        changed
    }

    pub fn move_to(&mut self, id: &str, position: Point) -> bool {
        let changed = self.with_note(id, |n| n.position = position);
        self.moving |= changed;
        changed
    }

    pub fn finish_move(&mut self) {
        self.unsaved |= std::mem::take(&mut self.moving);
    }

    /// `true` once per batch of changes that should be written.
    pub fn take_unsaved(&mut self) -> bool {
        std::mem::take(&mut self.unsaved)
    }
}
