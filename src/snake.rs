use std::collections::VecDeque;

use crate::entity::{EntityId, EntityKind};
use crate::event::Event;
use crate::tile::{Color, Coordinate, Direction, Tile};

/// Multi-segment actor. The head is the front of `body`.
///
/// Growth is tracked by `target_len`: a move always prepends a head, and the
/// tail is only trimmed down to `target_len` once the move has settled.
#[derive(Debug, Clone)]
pub struct Snake {
    body: VecDeque<Tile>,
    target_len: usize,
    direction: Direction,
}

impl Snake {
    /// Creates a straight snake of `length` segments with its head at `head`,
    /// the body trailing away from `direction`.
    #[must_use]
    pub fn new(head: Coordinate, direction: Direction, length: usize, color: Color) -> Self {
        let mut body = VecDeque::with_capacity(length);
        let mut tile = Tile::new(head, color);
        for _ in 0..length.max(1) {
            body.push_back(tile);
            tile = tile.shift(direction.opposite());
        }

        Self {
            target_len: body.len(),
            body,
            direction,
        }
    }

    /// Creates a snake from explicit segments (front is head).
    ///
    /// Returns `None` for an empty segment list.
    #[must_use]
    pub fn from_segments(
        segments: Vec<Coordinate>,
        direction: Direction,
        color: Color,
    ) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }

        let body: VecDeque<Tile> = segments
            .into_iter()
            .map(|coord| Tile::new(coord, color))
            .collect();

        Some(Self {
            target_len: body.len(),
            body,
            direction,
        })
    }

    /// Changes heading unless `direction` would reverse onto the body.
    ///
    /// Returns whether the change was accepted.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if direction == self.direction.opposite() {
            log::trace!("ignoring reversal from {:?} to {direction:?}", self.direction);
            return false;
        }

        self.direction = direction;
        true
    }

    /// First half of a move: prepends the new head and returns it.
    ///
    /// The tail stays in place until [`Snake::settle`] so that collision
    /// reactions published in between can still extend the target length.
    pub fn advance(&mut self) -> Tile {
        let new_head = self.head().shift(self.direction);
        self.body.push_front(new_head);
        new_head
    }

    /// Second half of a move: trims the tail down to the target length.
    pub fn settle(&mut self) {
        self.body.truncate(self.target_len.max(1));
    }

    /// Reacts to overlapping `other`. Eating a fruit grows the target length
    /// and yields the event to publish.
    pub fn notify_collision(
        &mut self,
        me: EntityId,
        other: EntityId,
        kind: EntityKind,
    ) -> Option<Event> {
        match kind {
            EntityKind::Fruit => {
                self.target_len += 1;
                Some(Event::Eaten {
                    eater: me,
                    eaten: other,
                })
            }
            EntityKind::Snake | EntityKind::Background => None,
        }
    }

    /// Returns true if the head shares a cell with any other segment.
    #[must_use]
    pub fn head_overlaps_body(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|segment| *segment == head)
    }

    /// Returns the current head tile.
    ///
    /// The body is never empty: both constructors yield at least one
    /// segment and `settle` never trims below one.
    #[must_use]
    pub fn head(&self) -> Tile {
        self.body[0]
    }

    #[must_use]
    pub fn occupies(&self, coord: Coordinate) -> bool {
        self.body.iter().any(|segment| segment.coord == coord)
    }

    /// Returns current segment count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    #[must_use]
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Iterates over segments from head to tail.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.body.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::Snake;
    use crate::entity::{EntityId, EntityKind};
    use crate::event::Event;
    use crate::tile::{Color, Coordinate, Direction};

    fn coords(snake: &Snake) -> Vec<Coordinate> {
        snake.tiles().map(|tile| tile.coord).collect()
    }

    #[test]
    fn new_snake_trails_behind_heading() {
        let snake = Snake::new(Coordinate::new(10, 5), Direction::Left, 3, Color::Green);

        assert_eq!(
            coords(&snake),
            vec![
                Coordinate::new(10, 5),
                Coordinate::new(10, 6),
                Coordinate::new(10, 7)
            ]
        );
        assert_eq!(snake.target_len(), 3);
    }

    #[test]
    fn snake_moves_one_cell_per_tick() {
        let mut snake = Snake::new(Coordinate::new(5, 5), Direction::Right, 2, Color::Green);

        snake.advance();
        assert_eq!(snake.len(), 3);
        snake.settle();

        assert_eq!(snake.head().coord, Coordinate::new(5, 6));
        assert_eq!(
            coords(&snake),
            vec![Coordinate::new(5, 6), Coordinate::new(5, 5)]
        );
    }

    #[test]
    fn eating_before_settle_keeps_previous_tail() {
        let mut snake = Snake::new(Coordinate::new(5, 5), Direction::Right, 2, Color::Green);
        let me = EntityId::new(1);
        let fruit = EntityId::new(2);

        snake.advance();
        let event = snake.notify_collision(me, fruit, EntityKind::Fruit);
        snake.settle();

        assert_eq!(
            event,
            Some(Event::Eaten {
                eater: me,
                eaten: fruit,
            })
        );
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.target_len(), 3);
    }

    #[test]
    fn non_fruit_collision_does_not_grow() {
        let mut snake = Snake::new(Coordinate::new(5, 5), Direction::Right, 2, Color::Green);

        let event = snake.notify_collision(EntityId::new(1), EntityId::new(0), EntityKind::Snake);

        assert_eq!(event, None);
        assert_eq!(snake.target_len(), 2);
    }

    #[test]
    fn direction_change_rejects_reverse() {
        let mut snake = Snake::new(Coordinate::new(5, 5), Direction::Up, 3, Color::Green);

        assert!(!snake.set_direction(Direction::Down));
        assert_eq!(snake.direction(), Direction::Up);

        assert!(snake.set_direction(Direction::Left));
        assert_eq!(snake.direction(), Direction::Left);
    }

    #[test]
    fn head_overlap_is_detected_before_settle() {
        let mut snake = Snake::from_segments(
            vec![
                Coordinate::new(2, 2),
                Coordinate::new(2, 1),
                Coordinate::new(3, 1),
                Coordinate::new(3, 2),
            ],
            Direction::Down,
            Color::Green,
        )
        .expect("segments are non-empty");

        snake.advance();

        assert!(snake.head_overlaps_body());
    }

    #[test]
    fn empty_segment_list_is_rejected() {
        assert!(Snake::from_segments(Vec::new(), Direction::Left, Color::Green).is_none());
    }

    #[test]
    fn zero_length_snake_still_has_a_head() {
        let mut snake = Snake::new(Coordinate::new(3, 3), Direction::Left, 0, Color::Green);

        snake.advance();
        snake.settle();

        assert_eq!(snake.len(), 1);
        assert_eq!(snake.head().coord, Coordinate::new(3, 2));
    }
}
