use std::collections::VecDeque;

use crate::Coords;
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    pub fn delta(self) -> (i16, i16) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn head_char(self) -> char {
        match self {
            Up => '^',
            Down => 'v',
            Left => '<',
            Right => '>',
        }
    }
}

/// The snake's body, head first.
#[derive(Clone, Debug, PartialEq)]
pub struct Snake {
    body: VecDeque<Coords>,
    direction: Direction,
}

impl Snake {
    /// Lays out `size` cells ending at `head`, trailing away from `direction`.
    pub fn new(head: Coords, size: usize, direction: Direction) -> Self {
        let back = direction.opposite().delta();

        let body = (0..size.max(1) as i16)
            .map(|i| (head.0 + back.0 * i, head.1 + back.1 * i))
            .collect();
        Snake { body, direction }
    }

    pub fn body(&self) -> &VecDeque<Coords> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    /// Where the head would land after one step in the current direction.
    pub fn next_head(&self) -> Coords {
        let (dx, dy) = self.direction.delta();
        let head = self.head();
        (head.0 + dx, head.1 + dy)
    }

    /// True when moving the head to `pos` would bite the body. The tail is
    /// exempt because it moves out of the way on the same step.
    pub fn bites_itself(&self, pos: Coords) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|&c| c == pos)
    }

    /// Pushes a new head and drops the tail unless `grow` is set.
    pub fn advance(&mut self, new_head: Coords, grow: bool) {
        self.body.push_front(new_head);

        if !grow {
            self.body.pop_back();
        }
    }

    /// Turns unless `new_direction` would reverse the snake onto itself.
    pub fn set_direction(&mut self, new_direction: Direction) -> bool {
        if new_direction == self.direction.opposite() {
            return false;
        }
        self.direction = new_direction;
        true
    }

    pub fn get_direction(&self) -> Direction {
        self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposites() {
        for dir in Direction::ALL.iter() {
            assert_eq!(dir.opposite().opposite(), *dir);
            let (dx, dy) = dir.delta();
            assert_eq!(dir.opposite().delta(), (-dx, -dy));
        }
    }

    #[test]
    fn test_new_snake_trails_behind_head() {
        let snake = Snake::new((5, 5), 3, Right);
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![(5, 5), (4, 5), (3, 5)]);
        assert_eq!(snake.head(), (5, 5));
        assert_eq!(snake.body().back(), Some(&(3, 5)));

        let snake = Snake::new((5, 5), 2, Up);
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![(5, 5), (5, 6)]);
    }

    #[test]
    fn test_zero_size_still_has_a_head() {
        let snake = Snake::new((1, 1), 0, Left);
        assert_eq!(snake.len(), 1);
    }

    #[test]
    fn test_advance_without_growth_drops_tail() {
        let mut snake = Snake::new((5, 5), 3, Right);
        let head = snake.next_head();
        assert_eq!(head, (6, 5));

        snake.advance(head, false);
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![(6, 5), (5, 5), (4, 5)]);
    }

    #[test]
    fn test_advance_with_growth_keeps_tail() {
        let mut snake = Snake::new((5, 5), 3, Right);
        let head = snake.next_head();
        snake.advance(head, true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.body().back(), Some(&(3, 5)));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut snake = Snake::new((5, 5), 3, Right);
        assert!(!snake.set_direction(Left));
        assert_eq!(snake.get_direction(), Right);

        assert!(snake.set_direction(Up));
        assert_eq!(snake.get_direction(), Up);
        assert!(!snake.set_direction(Down));
        assert_eq!(snake.get_direction(), Up);
    }

    #[test]
    fn test_tail_cell_is_not_a_bite() {
        let mut snake = Snake::new((0, 1), 1, Up);
        snake.advance((0, 0), true);
        snake.advance((1, 0), true);
        snake.advance((1, 1), true);
        // body: (1,1) (1,0) (0,0) (0,1)
        assert!(!snake.bites_itself((0, 1)));
        assert!(snake.bites_itself((1, 0)));
        assert!(snake.bites_itself((0, 0)));
    }
}
