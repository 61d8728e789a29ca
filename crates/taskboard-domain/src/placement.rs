//! Closest-center placement resolution for drag-and-drop.
//!
//! The resolver is a pure function of the pointer position and the rendered
//! layout. It knows nothing about the store or the drag lifecycle, which keeps
//! it testable with hand-built layouts.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::board_view::BoardView;
use crate::card::{CardId, CardStatus};
use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnRegion {
    pub status: CardStatus,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardRegion {
    pub card_id: CardId,
    pub status: CardStatus,
    pub rect: Rect,
}

/// Rendered bounding boxes of every column and every visible card.
/// Card regions are listed in render order within their column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardLayout {
    pub columns: Vec<ColumnRegion>,
    pub cards: Vec<CardRegion>,
}

/// Grid parameters for [`BoardLayout::uniform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub origin: Point,
    pub column_width: f64,
    pub column_gap: f64,
    pub column_height: f64,
    pub header_height: f64,
    pub card_inset: f64,
    pub card_height: f64,
    pub card_gap: f64,
}

impl Default for LayoutMetrics {
    fn default() -> Self {
        Self {
            origin: Point::new(0.0, 0.0),
            column_width: 300.0,
            column_gap: 16.0,
            column_height: 800.0,
            header_height: 48.0,
            card_inset: 8.0,
            card_height: 80.0,
            card_gap: 8.0,
        }
    }
}

impl BoardLayout {
    /// Lays the view out as fixed-width columns with stacked cards.
    pub fn uniform(view: &BoardView, metrics: LayoutMetrics) -> Self {
        let mut layout = BoardLayout::default();
        for (i, column) in view.columns().enumerate() {
            let x = metrics.origin.x + i as f64 * (metrics.column_width + metrics.column_gap);
            layout.columns.push(ColumnRegion {
                status: column.status,
                rect: Rect::new(x, metrics.origin.y, metrics.column_width, metrics.column_height),
            });
            for (j, card) in column.cards.iter().enumerate() {
                let y = metrics.origin.y
                    + metrics.header_height
                    + j as f64 * (metrics.card_height + metrics.card_gap);
                layout.cards.push(CardRegion {
                    card_id: card.id,
                    status: column.status,
                    rect: Rect::new(
                        x + metrics.card_inset,
                        y,
                        metrics.column_width - 2.0 * metrics.card_inset,
                        metrics.card_height,
                    ),
                });
            }
        }
        layout
    }

    pub fn column_region(&self, status: CardStatus) -> Option<&ColumnRegion> {
        self.columns.iter().find(|c| c.status == status)
    }

    pub fn card_region(&self, card_id: CardId) -> Option<&CardRegion> {
        self.cards.iter().find(|c| c.card_id == card_id)
    }

    fn cards_in(&self, status: CardStatus, active: CardId) -> impl Iterator<Item = &CardRegion> {
        self.cards
            .iter()
            .filter(move |c| c.status == status && c.card_id != active)
    }
}

/// Where a drop would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub column: CardStatus,
    /// Card under the pointer's nearest center, if a card won.
    pub over_card: Option<CardId>,
    /// Insertion index within `column`, not counting the dragged card.
    pub index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    status: CardStatus,
    // 0 = column region, 1 = card region
    kind: u8,
    render_index: usize,
    card_id: Option<CardId>,
}

impl Candidate {
    fn cmp_rank(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.status.order().cmp(&other.status.order()))
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.render_index.cmp(&other.render_index))
    }
}

/// Resolves the destination for `active_card_id` dropped at `pointer`.
///
/// Returns `None` when the pointer is outside every column and card region.
/// An empty column under the pointer wins outright; otherwise the region
/// (column or card, excluding the dragged card) with the nearest center wins.
/// Equal distances go to the column earlier in todo, in_progress, done.
pub fn resolve_placement(
    pointer: Point,
    active_card_id: CardId,
    layout: &BoardLayout,
) -> Option<Placement> {
    let hit_column = layout
        .columns
        .iter()
        .filter(|c| c.rect.contains(pointer))
        .min_by_key(|c| c.status.order());
    let hit_card = layout
        .cards
        .iter()
        .any(|c| c.card_id != active_card_id && c.rect.contains(pointer));

    if hit_column.is_none() && !hit_card {
        return None;
    }

    if let Some(column) = hit_column {
        if layout.cards_in(column.status, active_card_id).next().is_none() {
            return Some(Placement {
                column: column.status,
                over_card: None,
                index: 0,
            });
        }
    }

    let column_candidates = layout.columns.iter().enumerate().map(|(i, c)| Candidate {
        distance: pointer.distance_to(c.rect.center()),
        status: c.status,
        kind: 0,
        render_index: i,
        card_id: None,
    });
    let card_candidates = layout
        .cards
        .iter()
        .enumerate()
        .filter(|(_, c)| c.card_id != active_card_id)
        .map(|(i, c)| Candidate {
            distance: pointer.distance_to(c.rect.center()),
            status: c.status,
            kind: 1,
            render_index: i,
            card_id: Some(c.card_id),
        });

    let best = column_candidates
        .chain(card_candidates)
        .min_by(|a, b| a.cmp_rank(b))?;

    let index = match best.card_id {
        Some(card_id) => layout
            .cards_in(best.status, active_card_id)
            .position(|c| c.card_id == card_id)
            .unwrap_or(0),
        None => layout.cards_in(best.status, active_card_id).count(),
    };

    Some(Placement {
        column: best.status,
        over_card: best.card_id,
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn column(status: CardStatus, x: f64) -> ColumnRegion {
        ColumnRegion {
            status,
            rect: Rect::new(x, 0.0, 100.0, 400.0),
        }
    }

    fn card_at(status: CardStatus, x: f64, y: f64) -> CardRegion {
        CardRegion {
            card_id: Uuid::new_v4(),
            status,
            rect: Rect::new(x + 10.0, y, 80.0, 40.0),
        }
    }

    fn three_columns() -> BoardLayout {
        BoardLayout {
            columns: vec![
                column(CardStatus::Todo, 0.0),
                column(CardStatus::InProgress, 120.0),
                column(CardStatus::Done, 240.0),
            ],
            cards: Vec::new(),
        }
    }

    #[test]
    fn test_outside_every_region_is_none() {
        let layout = three_columns();
        assert_eq!(resolve_placement(Point::new(110.0, 50.0), Uuid::new_v4(), &layout), None);
        assert_eq!(resolve_placement(Point::new(50.0, 500.0), Uuid::new_v4(), &layout), None);
    }

    #[test]
    fn test_empty_column_wins_directly() {
        let mut layout = three_columns();
        // A card in todo sits close to the pointer, but the pointer is inside
        // the empty in_progress column.
        layout.cards.push(card_at(CardStatus::Todo, 0.0, 0.0));
        let placement = resolve_placement(Point::new(121.0, 10.0), Uuid::new_v4(), &layout).unwrap();
        assert_eq!(placement.column, CardStatus::InProgress);
        assert_eq!(placement.over_card, None);
        assert_eq!(placement.index, 0);
    }

    #[test]
    fn test_active_card_does_not_count_as_occupant() {
        let mut layout = three_columns();
        let active = card_at(CardStatus::Done, 240.0, 60.0);
        layout.cards.push(active);
        layout.cards.push(card_at(CardStatus::Todo, 0.0, 60.0));

        let placement = resolve_placement(Point::new(250.0, 390.0), active.card_id, &layout).unwrap();
        assert_eq!(placement.column, CardStatus::Done);
        assert_eq!(placement.over_card, None);
    }

    #[test]
    fn test_nearest_card_center_wins() {
        let mut layout = three_columns();
        let first = card_at(CardStatus::Done, 240.0, 60.0);
        let second = card_at(CardStatus::Done, 240.0, 110.0);
        layout.cards.extend([first, second]);

        let placement =
            resolve_placement(second.rect.center(), Uuid::new_v4(), &layout).unwrap();
        assert_eq!(placement.column, CardStatus::Done);
        assert_eq!(placement.over_card, Some(second.card_id));
        assert_eq!(placement.index, 1);
    }

    #[test]
    fn test_column_center_beats_far_cards() {
        let mut layout = three_columns();
        layout.cards.push(card_at(CardStatus::InProgress, 120.0, 0.0));
        layout.cards.push(card_at(CardStatus::InProgress, 120.0, 50.0));

        let center = layout.columns[1].rect.center();
        let placement = resolve_placement(center, Uuid::new_v4(), &layout).unwrap();
        assert_eq!(placement.column, CardStatus::InProgress);
        assert_eq!(placement.over_card, None);
        assert_eq!(placement.index, 2);
    }

    #[test]
    fn test_tie_prefers_earlier_column() {
        // Adjacent columns sharing an edge; the pointer sits on that edge at
        // the same height as both centers.
        let mut layout = BoardLayout {
            columns: vec![
                column(CardStatus::Done, 100.0),
                column(CardStatus::InProgress, 0.0),
            ],
            cards: Vec::new(),
        };
        layout.cards.push(card_at(CardStatus::InProgress, 0.0, 0.0));
        layout.cards.push(card_at(CardStatus::Done, 100.0, 0.0));

        let pointer = Point::new(100.0, 200.0);
        for _ in 0..10 {
            let placement = resolve_placement(pointer, Uuid::new_v4(), &layout).unwrap();
            assert_eq!(placement.column, CardStatus::InProgress);
        }

        layout.columns.push(column(CardStatus::Todo, -100.0));
        layout.cards.push(card_at(CardStatus::Todo, -100.0, 0.0));
        let placement = resolve_placement(Point::new(0.0, 200.0), Uuid::new_v4(), &layout).unwrap();
        assert_eq!(placement.column, CardStatus::Todo);
    }

    #[test]
    fn test_pointer_on_card_outside_column_still_resolves() {
        let layout = BoardLayout {
            columns: vec![column(CardStatus::Todo, 0.0)],
            cards: vec![CardRegion {
                card_id: Uuid::new_v4(),
                status: CardStatus::Todo,
                rect: Rect::new(90.0, 0.0, 40.0, 40.0),
            }],
        };
        let placement = resolve_placement(Point::new(125.0, 20.0), Uuid::new_v4(), &layout).unwrap();
        assert_eq!(placement.column, CardStatus::Todo);
    }

    #[test]
    fn test_uniform_layout_places_cards_inside_columns() {
        let cards: Vec<_> = (0..3)
            .map(|i| crate::Card {
                id: Uuid::new_v4(),
                project_id: Uuid::nil(),
                name: format!("c{i}"),
                description: String::new(),
                priority: Default::default(),
                tags: Default::default(),
                status: CardStatus::ALL[i],
                created_by: Uuid::nil(),
                created_at: chrono::Utc::now(),
            })
            .collect();
        let view = crate::board_view::group_by_column(&cards);
        let layout = BoardLayout::uniform(&view, LayoutMetrics::default());

        assert_eq!(layout.columns.len(), 3);
        assert_eq!(layout.cards.len(), 3);
        for card in &layout.cards {
            let col = layout.column_region(card.status).unwrap();
            assert!(col.rect.contains(card.rect.center()));
        }
        assert!(layout.card_region(cards[2].id).is_some());
    }
}
