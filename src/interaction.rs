//! Pointer handling: hover classification and the idle / moving / resizing
//! state machine that drives [`CropRectangle`].

use eframe::egui::{CursorIcon, Pos2, Rect};

use crate::control_point::control_points;
use crate::crop::{CropRectangle, ResizeDir};

/// What the pointer is over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hit {
    #[default]
    None,
    Move,
    Resize(ResizeDir),
}

impl Hit {
    pub fn cursor(self) -> CursorIcon {
        match self {
            Hit::None => CursorIcon::Default,
            Hit::Move => CursorIcon::Move,
            Hit::Resize(dir) => dir.cursor(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Moving,
    Resizing(ResizeDir),
}

/// Result of a pointer move while dragging.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragEvent {
    Moved { changed: bool },
    Resized { changed: bool },
}

impl DragEvent {
    pub fn changed(self) -> bool {
        match self {
            DragEvent::Moved { changed } | DragEvent::Resized { changed } => changed,
        }
    }
}

/// What limits the rectangle during a drag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constraints {
    /// Canvas-relative rect of the displayed image.
    pub bounds: Rect,
    /// Width / height lock, 0 for free-form.
    pub ratio: f32,
    /// A fixed crop size can only be moved.
    pub fixed_size: bool,
}

impl Constraints {
    pub fn free_form(&self) -> bool {
        self.ratio <= 0.0
    }
}

/// Classify `pos` against `rect`. Handles win over the interior; among
/// handles the first match in [`ResizeDir::ALL`] order wins.
pub fn classify(pos: Pos2, rect: &CropRectangle, constraints: &Constraints) -> Hit {
    if !constraints.fixed_size {
        if let Some(point) = control_points(rect, constraints.free_form())
            .into_iter()
            .find(|point| point.contains(pos))
        {
            return Hit::Resize(point.dir);
        }
    }
    if rect.contains(pos) {
        Hit::Move
    } else {
        Hit::None
    }
}

/// Pointer state. All positions are canvas-relative.
#[derive(Clone, Debug, Default)]
pub struct Interaction {
    state: DragState,
    hover: Hit,
    last_pos: Pos2,
}

impl Interaction {
    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn hover(&self) -> Hit {
        self.hover
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    /// Cursor to show for the current state.
    pub fn cursor(&self) -> CursorIcon {
        match self.state {
            DragState::Idle => self.hover.cursor(),
            DragState::Moving => CursorIcon::Move,
            DragState::Resizing(dir) => dir.cursor(),
        }
    }

    /// Re-classify the hover target. Ignored while a drag is in progress so
    /// the resize direction cannot change mid-gesture.
    pub fn pointer_hover(
        &mut self,
        pos: Pos2,
        rect: &CropRectangle,
        constraints: &Constraints,
    ) -> Hit {
        if !self.is_dragging() {
            self.hover = classify(pos, rect, constraints);
        }
        self.hover
    }

    /// Start a gesture from whatever is under `pos`. Returns the new state.
    pub fn pointer_down(
        &mut self,
        pos: Pos2,
        rect: &CropRectangle,
        constraints: &Constraints,
    ) -> DragState {
        let hit = self.pointer_hover(pos, rect, constraints);
        self.last_pos = pos;
        self.state = match hit {
            Hit::None => DragState::Idle,
            Hit::Move => DragState::Moving,
            Hit::Resize(dir) => DragState::Resizing(dir),
        };
        if self.is_dragging() {
            log::debug!("pointer down at {pos:?}: {:?}", self.state);
        }
        self.state
    }

    /// Feed a pointer position. While dragging this moves or resizes `rect`
    /// by the delta since the previous position; while idle it only updates
    /// the hover target and returns `None`.
    pub fn pointer_move(
        &mut self,
        pos: Pos2,
        rect: &mut CropRectangle,
        constraints: &Constraints,
    ) -> Option<DragEvent> {
        let delta = pos - self.last_pos;
        self.last_pos = pos;

        match self.state {
            DragState::Idle => {
                self.pointer_hover(pos, rect, constraints);
                None
            }
            DragState::Moving => {
                let before = *rect;
                rect.translate(delta, constraints.bounds);
                Some(DragEvent::Moved {
                    changed: *rect != before,
                })
            }
            DragState::Resizing(dir) => {
                let changed = rect.resize(dir, delta, constraints.ratio, constraints.bounds);
                Some(DragEvent::Resized { changed })
            }
        }
    }

    pub fn pointer_up(&mut self) {
        if self.is_dragging() {
            log::debug!("pointer up, leaving {:?}", self.state);
        }
        self.state = DragState::Idle;
    }
}
