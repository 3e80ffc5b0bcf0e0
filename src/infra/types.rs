/// Identifier of a unit, unique within one episode.
pub type UnitId = u32;

/// Identifier of the player controlling a unit.
pub type PlayerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance: `max(|dx|, |dy|)`.
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    /// One step toward `target` in the 8-neighbourhood.
    pub fn step_toward(&self, target: &Position) -> Position {
        Position::new(
            self.x + (target.x - self.x).signum(),
            self.y + (target.y - self.y).signum(),
        )
    }

    pub fn neighbors(&self) -> [Position; 8] {
        [
            Position::new(self.x, self.y - 1),     // North
            Position::new(self.x + 1, self.y - 1), // North-east
            Position::new(self.x + 1, self.y),     // East
            Position::new(self.x + 1, self.y + 1), // South-east
            Position::new(self.x, self.y + 1),     // South
            Position::new(self.x - 1, self.y + 1), // South-west
            Position::new(self.x - 1, self.y),     // West
            Position::new(self.x - 1, self.y - 1), // North-west
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    pub fn from_size(width: i32, height: i32) -> Self {
        Self {
            min_x: 0,
            max_x: width - 1,
            min_y: 0,
            max_y: height - 1,
        }
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= self.min_x && pos.x <= self.max_x && pos.y >= self.min_y && pos.y <= self.max_y
    }
}
