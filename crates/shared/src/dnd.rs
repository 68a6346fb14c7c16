//! Drag-and-drop session.
//!
//! Pointer events from a front end are fed into a `DragSession`, which
//! distinguishes a click from a drag with a small movement threshold and turns
//! a completed drag into a `DropCommand` for the board controller.

use crate::models::BucketId;

/// Movement threshold in pixels to start dragging
pub const DRAG_THRESHOLD_PX: i32 = 5;

/// What is being dragged and where it was picked up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragPayload {
    pub item_id: String,
    pub source: BucketId,
}

/// A completed drag, ready to be applied to the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropCommand {
    pub item_id: String,
    pub from: BucketId,
    pub to: BucketId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    /// Pointer is down on an item but has not moved far enough yet
    Pending { payload: DragPayload, origin: (i32, i32) },
    Dragging {
        payload: DragPayload,
        hover: Option<BucketId>,
    },
}

#[derive(Debug, Default)]
pub struct DragSession {
    state: DragState,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Pointer pressed on an item
    pub fn press(&mut self, item_id: impl Into<String>, source: BucketId, x: i32, y: i32) {
        self.state = DragState::Pending {
            payload: DragPayload {
                item_id: item_id.into(),
                source,
            },
            origin: (x, y),
        };
    }

    /// Pointer moved; returns true when this movement started the drag
    pub fn pointer_moved(&mut self, x: i32, y: i32) -> bool {
        let started = match &self.state {
            DragState::Pending { payload, origin }
                if (x - origin.0).abs() > DRAG_THRESHOLD_PX || (y - origin.1).abs() > DRAG_THRESHOLD_PX =>
            {
                Some(payload.clone())
            }
            _ => None,
        };

        match started {
            Some(payload) => {
                self.state = DragState::Dragging { payload, hover: None };
                true
            }
            None => false,
        }
    }

    /// Pointer is over a drop zone (or none)
    pub fn hover(&mut self, target: Option<BucketId>) {
        if let DragState::Dragging { hover, .. } = &mut self.state {
            *hover = target;
        }
    }

    /// Drop on an explicit target
    ///
    /// Returns `None` for a click (never dragged), when idle, or when the
    /// target is the bucket the item came from.
    pub fn drop_on(&mut self, target: BucketId) -> Option<DropCommand> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { payload, .. } if payload.source != target => Some(DropCommand {
                item_id: payload.item_id,
                from: payload.source,
                to: target,
            }),
            _ => None,
        }
    }

    /// Pointer released; drops on the hovered zone if there is one
    pub fn release(&mut self) -> Option<DropCommand> {
        let hovered = match &self.state {
            DragState::Dragging { hover, .. } => hover.clone(),
            _ => None,
        };
        match hovered {
            Some(target) => self.drop_on(target),
            None => {
                self.cancel();
                None
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}
