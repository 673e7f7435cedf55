use std::collections::HashSet;

use log::{debug, info, trace, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::entity::{Entity, EntityId, Fruit};
use crate::error::BoardError;
use crate::event::{Event, EventBus};
use crate::grid::GridSize;
use crate::snake::Snake;
use crate::tile::{Color, Coordinate, Tile};

/// Random draws tried before falling back to scanning every free cell.
pub const FRUIT_SAMPLE_ATTEMPTS: usize = 64;

/// Result of moving one entity by a single cell.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct MoveOutcome {
    /// Head coordinate after the move.
    pub head: Coordinate,
    /// The new head landed on one of the mover's own pre-trim segments.
    pub self_collision: bool,
    /// A fruit was eaten this move.
    pub ate: bool,
    /// An eaten fruit could not be replaced because no cell is free.
    pub board_full: bool,
}

/// Entity registry and sole collision authority.
///
/// Entities live in an arena addressed by [`EntityId`]; slots are reused
/// after removal. Iteration and rendering follow registration order.
#[derive(Debug, Clone)]
pub struct Board {
    grid: GridSize,
    slots: Vec<Option<Entity>>,
    order: Vec<EntityId>,
    bus: EventBus,
    fruit_color: Color,
    rng: StdRng,
    board_full: bool,
}

impl Board {
    #[must_use]
    pub fn new(grid: GridSize, fruit_color: Color, rng: StdRng) -> Self {
        Self {
            grid,
            slots: Vec::new(),
            order: Vec::new(),
            bus: EventBus::new(),
            fruit_color,
            rng,
            board_full: false,
        }
    }

    #[must_use]
    pub fn grid(&self) -> GridSize {
        self.grid
    }

    /// Registers `entity` and subscribes it to the bus.
    pub fn add_object(&mut self, entity: Entity) -> EntityId {
        let id = match self.slots.iter().position(Option::is_none) {
            Some(index) => {
                self.slots[index] = Some(entity);
                EntityId::new(index)
            }
            None => {
                self.slots.push(Some(entity));
                EntityId::new(self.slots.len() - 1)
            }
        };

        self.order.push(id);
        self.bus.subscribe(id);
        trace!("registered entity {id}");
        id
    }

    /// Unsubscribes and removes `id`, returning the entity.
    pub fn remove_object(&mut self, id: EntityId) -> Result<Entity, BoardError> {
        let entity = self
            .slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(BoardError::UnknownEntity(id))?;

        self.bus.unsubscribe(id);
        self.order.retain(|registered| *registered != id);
        trace!("removed entity {id}");
        Ok(entity)
    }

    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn snake_mut(&mut self, id: EntityId) -> Option<&mut Snake> {
        self.get_mut(id).and_then(Entity::as_snake_mut)
    }

    /// Iterates live entities in registration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.get(*id).map(|entity| (*id, entity)))
    }

    /// Iterates the fruits currently on the board.
    pub fn fruits(&self) -> impl Iterator<Item = (EntityId, Fruit)> + '_ {
        self.entities()
            .filter_map(|(id, entity)| entity.as_fruit().map(|fruit| (id, fruit)))
    }

    /// Returns true if any non-background entity occupies `coord`.
    #[must_use]
    pub fn is_occupied(&self, coord: Coordinate) -> bool {
        self.entities()
            .any(|(_, entity)| !entity.is_background() && entity.occupies(coord))
    }

    /// Returns the first non-background entity, in registration order, whose
    /// tiles intersect those of `id`.
    #[must_use]
    pub fn detect_collision(&self, id: EntityId) -> Option<EntityId> {
        let entity = self.get(id)?;
        self.collision_for(entity, Some(id))
    }

    fn collision_for(&self, entity: &Entity, exclude: Option<EntityId>) -> Option<EntityId> {
        let occupied: HashSet<Coordinate> = entity.tiles().map(|tile| tile.coord).collect();

        self.entities()
            .filter(|(other_id, other)| Some(*other_id) != exclude && !other.is_background())
            .find(|(_, other)| other.tiles().any(|tile| occupied.contains(&tile.coord)))
            .map(|(other_id, _)| other_id)
    }

    /// Moves a snake entity one cell and settles every reaction.
    ///
    /// Returns `Ok(None)` for entities that cannot move.
    pub fn move_object(&mut self, id: EntityId) -> Result<Option<MoveOutcome>, BoardError> {
        let entity = self.get_mut(id).ok_or(BoardError::UnknownEntity(id))?;
        let Some(snake) = entity.as_snake_mut() else {
            trace!("ignoring move request for static entity {id}");
            return Ok(None);
        };

        let length_before = snake.target_len();
        let head = snake.advance();
        let self_collision = snake.head_overlaps_body();

        self.board_full = false;
        self.bus.publish(Event::Moved { mover: id });
        self.dispatch();

        let snake = self.snake_mut(id).ok_or(BoardError::UnknownEntity(id))?;
        let ate = snake.target_len() > length_before;
        snake.settle();

        Ok(Some(MoveOutcome {
            head: head.coord,
            self_collision,
            ate,
            board_full: self.board_full,
        }))
    }

    /// Drains the bus, handling each event after the previous one settled.
    fn dispatch(&mut self) {
        while let Some(event) = self.bus.next_event() {
            match event {
                Event::Moved { mover } => self.notify_object_moved(mover),
                Event::Collided { target, other } => self.deliver_collision(target, other),
                Event::Eaten { eater, eaten } => self.notify_object_eaten(eater, eaten),
            }
        }
    }

    fn notify_object_moved(&mut self, mover: EntityId) {
        if let Some(other) = self.detect_collision(mover) {
            debug!("entity {mover} collided with {other}");
            self.bus.publish(Event::Collided {
                target: mover,
                other,
            });
        }
    }

    fn deliver_collision(&mut self, target: EntityId, other: EntityId) {
        if !self.bus.is_subscribed(target) {
            return;
        }
        let Some(kind) = self.get(other).map(Entity::kind) else {
            return;
        };

        let reaction = self
            .get_mut(target)
            .and_then(Entity::as_snake_mut)
            .and_then(|snake| snake.notify_collision(target, other, kind));

        if let Some(event) = reaction {
            self.bus.publish(event);
        }
    }

    fn notify_object_eaten(&mut self, eater: EntityId, eaten: EntityId) {
        if let Err(error) = self.remove_object(eaten) {
            warn!("eaten entity vanished before removal: {error}");
            return;
        }
        debug!("entity {eater} ate fruit {eaten}");

        match self.create_fruit() {
            Ok(_) => {}
            Err(BoardError::Full { cells }) => {
                info!("board full ({cells} cells), no fruit placed");
                self.board_full = true;
            }
            Err(error) => warn!("fruit replacement failed: {error}"),
        }
    }

    /// Places a fruit on a uniformly random free cell.
    ///
    /// Tries [`FRUIT_SAMPLE_ATTEMPTS`] random cells first, then picks among
    /// all free cells. Fails with [`BoardError::Full`] when none remain.
    pub fn create_fruit(&mut self) -> Result<EntityId, BoardError> {
        for attempt in 0..FRUIT_SAMPLE_ATTEMPTS {
            let coord = Coordinate::new(
                self.rng.gen_range(0..i32::from(self.grid.rows)),
                self.rng.gen_range(0..i32::from(self.grid.cols)),
            );
            let candidate = Entity::Fruit(Fruit::new(coord, self.fruit_color));

            if self.collision_for(&candidate, None).is_none() {
                debug!("fruit placed at {coord} after {} draws", attempt + 1);
                return Ok(self.add_object(candidate));
            }
        }

        let free: Vec<Coordinate> = self
            .grid
            .coordinates()
            .filter(|coord| !self.is_occupied(*coord))
            .collect();

        if free.is_empty() {
            return Err(BoardError::Full {
                cells: self.grid.total_cells(),
            });
        }

        let coord = free[self.rng.gen_range(0..free.len())];
        debug!("fruit placed at {coord} by scanning {} free cells", free.len());
        Ok(self.add_object(Entity::Fruit(Fruit::new(coord, self.fruit_color))))
    }

    /// Replaces every fruit with one at `coord`.
    ///
    /// Fails without touching the board when `coord` is off the grid or
    /// covered by anything other than a fruit.
    pub fn place_fruit(&mut self, coord: Coordinate) -> Result<EntityId, BoardError> {
        let blocked = self.entities().any(|(_, entity)| {
            !entity.is_background() && entity.as_fruit().is_none() && entity.occupies(coord)
        });
        if !self.grid.contains(coord) || blocked {
            return Err(BoardError::Occupied(coord));
        }

        let existing: Vec<EntityId> = self.fruits().map(|(id, _)| id).collect();
        for id in existing {
            self.remove_object(id)?;
        }

        Ok(self.add_object(Entity::Fruit(Fruit::new(coord, self.fruit_color))))
    }

    /// Collects every tile to draw, background first.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.entities()
            .flat_map(|(_, entity)| entity.tiles())
            .filter(|tile| self.grid.contains(tile.coord))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::Board;
    use crate::entity::{Checkerboard, Entity, Fruit};
    use crate::error::BoardError;
    use crate::grid::GridSize;
    use crate::snake::Snake;
    use crate::tile::{Color, Coordinate, Direction};

    fn board(rows: u16, cols: u16, seed: u64) -> Board {
        let grid = GridSize::new(rows, cols);
        let mut board = Board::new(grid, Color::Red, StdRng::seed_from_u64(seed));
        board.add_object(Entity::Background(Checkerboard::new(
            grid,
            [Color::White, Color::Black],
        )));
        board
    }

    fn snake_at(head: Coordinate, direction: Direction, length: usize) -> Entity {
        Entity::Snake(Snake::new(head, direction, length, Color::Green))
    }

    #[test]
    fn detect_collision_skips_background_and_self() {
        let mut board = board(6, 6, 1);
        let snake = board.add_object(snake_at(Coordinate::new(2, 2), Direction::Left, 3));

        assert_eq!(board.detect_collision(snake), None);

        let fruit = board.add_object(Entity::Fruit(Fruit::new(Coordinate::new(2, 3), Color::Red)));
        assert_eq!(board.detect_collision(snake), Some(fruit));
        assert_eq!(board.detect_collision(fruit), Some(snake));
    }

    #[test]
    fn detect_collision_returns_first_in_registration_order() {
        let mut board = board(6, 6, 1);
        let snake = board.add_object(snake_at(Coordinate::new(2, 2), Direction::Left, 3));
        let first = board.add_object(Entity::Fruit(Fruit::new(Coordinate::new(2, 4), Color::Red)));
        board.add_object(Entity::Fruit(Fruit::new(Coordinate::new(2, 3), Color::Red)));

        assert_eq!(board.detect_collision(snake), Some(first));
    }

    #[test]
    fn eating_grows_snake_and_relocates_fruit() {
        let mut board = board(10, 10, 7);
        let snake = board.add_object(snake_at(Coordinate::new(5, 5), Direction::Right, 2));
        let fruit = board.place_fruit(Coordinate::new(5, 6)).expect("cell is free");

        let outcome = board
            .move_object(snake)
            .expect("snake is registered")
            .expect("snakes can move");

        assert!(outcome.ate);
        assert!(!outcome.board_full);
        assert_eq!(board.get(snake).and_then(Entity::as_snake).map(Snake::len), Some(3));

        let fruits: Vec<_> = board.fruits().collect();
        assert_eq!(fruits.len(), 1);
        let (relocated_id, relocated) = fruits[0];
        assert_eq!(relocated_id, fruit);
        assert_ne!(relocated.coord(), Coordinate::new(5, 6));
        assert!(!board.get(snake).expect("snake").occupies(relocated.coord()));
    }

    #[test]
    fn fruit_spawn_never_overlaps_occupied_cells() {
        let mut board = board(4, 4, 3);
        board.add_object(snake_at(Coordinate::new(0, 0), Direction::Left, 1));
        board.add_object(snake_at(Coordinate::new(1, 0), Direction::Left, 4));

        for _ in 0..100 {
            let id = board.create_fruit().expect("free cells remain");
            let coord = board.get(id).and_then(Entity::as_fruit).expect("fruit").coord();
            assert_ne!(coord, Coordinate::new(0, 0));
            assert_ne!(coord.row, 1);
            board.remove_object(id).expect("fruit registered");
        }
    }

    #[test]
    fn create_fruit_finds_last_free_cell() {
        let mut board = board(1, 4, 11);
        board.add_object(Entity::Snake(Snake::from_segments(
            vec![
                Coordinate::new(0, 0),
                Coordinate::new(0, 1),
                Coordinate::new(0, 3),
            ],
            Direction::Left,
            Color::Green,
        )
        .expect("segments are non-empty")));

        let id = board.create_fruit().expect("one cell is free");

        assert_eq!(
            board.get(id).and_then(Entity::as_fruit).map(Fruit::coord),
            Some(Coordinate::new(0, 2))
        );
    }

    #[test]
    fn create_fruit_on_full_board_fails() {
        let mut board = board(1, 3, 5);
        board.add_object(snake_at(Coordinate::new(0, 0), Direction::Left, 3));

        assert_eq!(board.create_fruit(), Err(BoardError::Full { cells: 3 }));
    }

    #[test]
    fn eating_last_free_cell_reports_full_board() {
        let mut board = board(1, 3, 5);
        let snake = board.add_object(snake_at(Coordinate::new(0, 1), Direction::Left, 2));
        board.place_fruit(Coordinate::new(0, 0)).expect("cell is free");

        let outcome = board.move_object(snake).expect("registered").expect("movable");

        assert!(outcome.ate);
        assert!(outcome.board_full);
        assert_eq!(board.fruits().count(), 0);
    }

    #[test]
    fn moving_background_is_ignored() {
        let mut board = board(3, 3, 1);
        let background = board.entities().next().map(|(id, _)| id).expect("background");

        assert_eq!(board.move_object(background), Ok(None));
    }

    #[test]
    fn remove_object_frees_slot_for_reuse() {
        let mut board = board(3, 3, 1);
        let fruit = board.add_object(Entity::Fruit(Fruit::new(Coordinate::new(1, 1), Color::Red)));

        board.remove_object(fruit).expect("registered");
        assert_eq!(board.remove_object(fruit).err(), Some(BoardError::UnknownEntity(fruit)));

        let reused = board.add_object(Entity::Fruit(Fruit::new(Coordinate::new(2, 2), Color::Red)));
        assert_eq!(reused, fruit);
    }

    #[test]
    fn rejected_fruit_placement_keeps_existing_fruit() {
        let mut board = board(5, 5, 2);
        board.add_object(snake_at(Coordinate::new(1, 1), Direction::Left, 2));
        let fruit = board.place_fruit(Coordinate::new(3, 3)).expect("cell is free");

        assert_eq!(
            board.place_fruit(Coordinate::new(1, 1)),
            Err(BoardError::Occupied(Coordinate::new(1, 1)))
        );
        assert_eq!(
            board.place_fruit(Coordinate::new(5, 0)),
            Err(BoardError::Occupied(Coordinate::new(5, 0)))
        );

        let fruits: Vec<_> = board.fruits().collect();
        assert_eq!(fruits.len(), 1);
        assert_eq!(fruits[0].0, fruit);
        assert_eq!(fruits[0].1.coord(), Coordinate::new(3, 3));
    }

    #[test]
    fn fruit_can_be_placed_over_existing_fruit() {
        let mut board = board(5, 5, 2);
        board.place_fruit(Coordinate::new(3, 3)).expect("cell is free");

        board.place_fruit(Coordinate::new(3, 3)).expect("fruit cells are replaceable");

        assert_eq!(board.fruits().count(), 1);
    }

    #[test]
    fn tiles_render_background_first() {
        let mut board = board(2, 2, 1);
        board.place_fruit(Coordinate::new(1, 1)).expect("cell is free");

        let tiles = board.tiles();

        assert_eq!(tiles.len(), 5);
        assert_eq!(tiles[0].color, Color::White);
        assert_eq!(tiles[4].color, Color::Red);
    }
}
