use std::fmt;

/// The four grid moves.
///
/// The declaration order is the enumeration order used everywhere: backups
/// evaluate actions in this order and keep the first one that attains the
/// maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Right,
    Left,
    Down,
    Up,
}

impl Action {
    /// All actions in enumeration order.
    pub const ALL: [Action; 4] = [Action::Right, Action::Left, Action::Down, Action::Up];

    /// Row and column offset of the move.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Right => (0, 1),
            Action::Left => (0, -1),
            Action::Down => (1, 0),
            Action::Up => (-1, 0),
        }
    }

    /// Position of the action in [`Action::ALL`].
    pub fn index(self) -> usize {
        match self {
            Action::Right => 0,
            Action::Left => 1,
            Action::Down => 2,
            Action::Up => 3,
        }
    }

    pub fn arrow(self) -> char {
        match self {
            Action::Right => '→',
            Action::Left => '←',
            Action::Down => '↓',
            Action::Up => '↑',
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Right => "right",
            Action::Left => "left",
            Action::Down => "down",
            Action::Up => "up",
        };
        f.write_str(name)
    }
}
