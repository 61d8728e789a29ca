//! Drag gesture state machine.
//!
//! `Idle -> Pressed -> Dragging -> Idle`. A press only becomes a drag once the
//! pointer travels past the activation distance; releasing before that is a
//! click. The controller never touches the store: it reports what the gesture
//! meant and the caller decides what to mutate.

use crate::card::{CardId, CardStatus};
use crate::geometry::Point;
use crate::placement::{resolve_placement, BoardLayout, Placement};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingPress {
    pub card_id: CardId,
    pub origin_column: CardStatus,
    pub press_point: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveDrag {
    pub card_id: CardId,
    pub origin_column: CardStatus,
    pub pointer: Point,
    /// Column currently highlighted as the drop target.
    pub hover: Option<CardStatus>,
    pub placement: Option<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Pressed(PendingPress),
    Dragging(ActiveDrag),
}

/// A committed cross-column move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveIntent {
    pub card_id: CardId,
    pub from: CardStatus,
    pub to: CardStatus,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Released before activation: open the card.
    Click { card_id: CardId },
    Move(MoveIntent),
    /// Dropped back on the originating column.
    NoOp { card_id: CardId },
    Cancelled { card_id: CardId },
    /// Nothing was pressed.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoverChange {
    pub previous: Option<CardStatus>,
    pub current: Option<CardStatus>,
}

#[derive(Debug, Clone)]
pub struct DragController {
    activation_distance: f64,
    phase: DragPhase,
}

impl DragController {
    pub fn new(activation_distance: f64) -> Self {
        Self {
            activation_distance,
            phase: DragPhase::Idle,
        }
    }

    pub fn activation_distance(&self) -> f64 {
        self.activation_distance
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn active_card(&self) -> Option<CardId> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed(p) => Some(p.card_id),
            DragPhase::Dragging(d) => Some(d.card_id),
        }
    }

    /// Column to render as the drop target.
    pub fn highlight(&self) -> Option<CardStatus> {
        match self.phase {
            DragPhase::Dragging(d) => d.hover,
            _ => None,
        }
    }

    /// Starts tracking a press. Returns false if a gesture is already running.
    pub fn press(&mut self, card_id: CardId, origin_column: CardStatus, at: Point) -> bool {
        if self.phase != DragPhase::Idle {
            return false;
        }
        self.phase = DragPhase::Pressed(PendingPress {
            card_id,
            origin_column,
            press_point: at,
        });
        true
    }

    /// Feeds one pointer-move tick. Returns the highlight change, if any.
    pub fn pointer_move(&mut self, at: Point, layout: &BoardLayout) -> Option<HoverChange> {
        match self.phase {
            DragPhase::Idle => None,
            DragPhase::Pressed(press) => {
                if press.press_point.distance_to(at) <= self.activation_distance {
                    return None;
                }
                self.phase = DragPhase::Dragging(ActiveDrag {
                    card_id: press.card_id,
                    origin_column: press.origin_column,
                    pointer: at,
                    hover: None,
                    placement: None,
                });
                self.track(at, layout)
            }
            DragPhase::Dragging(_) => self.track(at, layout),
        }
    }

    fn track(&mut self, at: Point, layout: &BoardLayout) -> Option<HoverChange> {
        let DragPhase::Dragging(ref mut drag) = self.phase else {
            return None;
        };
        let placement = resolve_placement(at, drag.card_id, layout);
        drag.pointer = at;
        drag.placement = placement;

        let current = placement.map(|p| p.column);
        if current == drag.hover {
            return None;
        }
        let previous = drag.hover;
        drag.hover = current;
        Some(HoverChange { previous, current })
    }

    /// Ends the gesture at `at` and reports what it meant. Always returns to idle.
    pub fn release(&mut self, at: Point, layout: &BoardLayout) -> DragOutcome {
        // A release far from the press without intermediate moves is still a drag.
        if let DragPhase::Pressed(press) = self.phase {
            if press.press_point.distance_to(at) <= self.activation_distance {
                self.phase = DragPhase::Idle;
                return DragOutcome::Click {
                    card_id: press.card_id,
                };
            }
            self.pointer_move(at, layout);
        }

        let phase = std::mem::take(&mut self.phase);
        let DragPhase::Dragging(drag) = phase else {
            return DragOutcome::Ignored;
        };

        match resolve_placement(at, drag.card_id, layout) {
            None => DragOutcome::Cancelled {
                card_id: drag.card_id,
            },
            Some(placement) if placement.column == drag.origin_column => DragOutcome::NoOp {
                card_id: drag.card_id,
            },
            Some(placement) => DragOutcome::Move(MoveIntent {
                card_id: drag.card_id,
                from: drag.origin_column,
                to: placement.column,
                index: placement.index,
            }),
        }
    }

    /// Abandons the gesture (escape key, focus loss).
    pub fn cancel(&mut self) -> DragOutcome {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => DragOutcome::Ignored,
            DragPhase::Pressed(p) => DragOutcome::Cancelled { card_id: p.card_id },
            DragPhase::Dragging(d) => DragOutcome::Cancelled { card_id: d.card_id },
        }
    }
}

impl Default for DragController {
    fn default() -> Self {
        Self::new(taskboard_core::config::DEFAULT_ACTIVATION_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::placement::{CardRegion, ColumnRegion};
    use uuid::Uuid;

    fn layout(card_id: CardId) -> BoardLayout {
        BoardLayout {
            columns: vec![
                ColumnRegion {
                    status: CardStatus::Todo,
                    rect: Rect::new(0.0, 0.0, 100.0, 400.0),
                },
                ColumnRegion {
                    status: CardStatus::InProgress,
                    rect: Rect::new(120.0, 0.0, 100.0, 400.0),
                },
                ColumnRegion {
                    status: CardStatus::Done,
                    rect: Rect::new(240.0, 0.0, 100.0, 400.0),
                },
            ],
            cards: vec![CardRegion {
                card_id,
                status: CardStatus::Todo,
                rect: Rect::new(10.0, 40.0, 80.0, 40.0),
            }],
        }
    }

    const PRESS: Point = Point::new(50.0, 60.0);

    #[test]
    fn test_small_movement_is_a_click() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        assert!(drag.press(id, CardStatus::Todo, PRESS));

        assert_eq!(drag.pointer_move(Point::new(53.0, 64.0), &layout), None);
        assert!(!drag.is_dragging());

        let outcome = drag.release(Point::new(53.0, 64.0), &layout);
        assert_eq!(outcome, DragOutcome::Click { card_id: id });
        assert_eq!(drag.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_threshold_must_be_exceeded() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);

        drag.pointer_move(Point::new(55.0, 60.0), &layout);
        assert!(!drag.is_dragging());
        drag.pointer_move(Point::new(55.1, 60.0), &layout);
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_hover_changes_reported_once_per_column() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);

        let change = drag.pointer_move(Point::new(60.0, 200.0), &layout).unwrap();
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some(CardStatus::Todo));

        assert_eq!(drag.pointer_move(Point::new(61.0, 210.0), &layout), None);

        let change = drag.pointer_move(Point::new(290.0, 200.0), &layout).unwrap();
        assert_eq!(change.previous, Some(CardStatus::Todo));
        assert_eq!(change.current, Some(CardStatus::Done));
        assert_eq!(drag.highlight(), Some(CardStatus::Done));

        let change = drag.pointer_move(Point::new(230.0, 200.0), &layout).unwrap();
        assert_eq!(change.current, None);
        assert_eq!(drag.highlight(), None);
    }

    #[test]
    fn test_drop_on_other_column_is_a_move() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);
        drag.pointer_move(Point::new(290.0, 200.0), &layout);

        let outcome = drag.release(Point::new(290.0, 200.0), &layout);
        assert_eq!(
            outcome,
            DragOutcome::Move(MoveIntent {
                card_id: id,
                from: CardStatus::Todo,
                to: CardStatus::Done,
                index: 0,
            })
        );
        assert_eq!(drag.highlight(), None);
        assert_eq!(drag.active_card(), None);
    }

    #[test]
    fn test_drop_on_origin_is_noop() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);
        drag.pointer_move(Point::new(50.0, 300.0), &layout);

        assert_eq!(
            drag.release(Point::new(50.0, 300.0), &layout),
            DragOutcome::NoOp { card_id: id }
        );
    }

    #[test]
    fn test_release_outside_regions_cancels() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);
        drag.pointer_move(Point::new(110.0, 200.0), &layout);

        assert_eq!(
            drag.release(Point::new(110.0, 200.0), &layout),
            DragOutcome::Cancelled { card_id: id }
        );
    }

    #[test]
    fn test_release_without_moves_far_away_still_drags() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        drag.press(id, CardStatus::Todo, PRESS);

        let outcome = drag.release(Point::new(170.0, 300.0), &layout);
        assert!(matches!(
            outcome,
            DragOutcome::Move(MoveIntent { to: CardStatus::InProgress, .. })
        ));
    }

    #[test]
    fn test_cancel_resets_state() {
        let id = Uuid::new_v4();
        let layout = layout(id);
        let mut drag = DragController::new(5.0);
        assert_eq!(drag.cancel(), DragOutcome::Ignored);

        drag.press(id, CardStatus::Todo, PRESS);
        drag.pointer_move(Point::new(290.0, 200.0), &layout);
        assert_eq!(drag.cancel(), DragOutcome::Cancelled { card_id: id });
        assert_eq!(drag.highlight(), None);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_second_press_while_active_is_rejected() {
        let id = Uuid::new_v4();
        let mut drag = DragController::default();
        assert!(drag.press(id, CardStatus::Todo, PRESS));
        assert!(!drag.press(Uuid::new_v4(), CardStatus::Done, PRESS));
        assert_eq!(drag.active_card(), Some(id));
    }

    #[test]
    fn test_release_when_idle_is_ignored() {
        let mut drag = DragController::default();
        assert_eq!(
            drag.release(PRESS, &BoardLayout::default()),
            DragOutcome::Ignored
        );
    }
}
