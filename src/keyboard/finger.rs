#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    pub fn opposite(self) -> Self {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Finger {
    Pinky,
    Ring,
    Middle,
    Index,
    Thumb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FingerAssignment {
    pub hand: Hand,
    pub finger: Finger,
}

impl FingerAssignment {
    pub fn new(hand: Hand, finger: Finger) -> Self {
        Self { hand, finger }
    }

    pub fn label(&self) -> String {
        let hand = match self.hand {
            Hand::Left => "left",
            Hand::Right => "right",
        };
        let finger = match self.finger {
            Finger::Pinky => "pinky",
            Finger::Ring => "ring",
            Finger::Middle => "middle",
            Finger::Index => "index",
            Finger::Thumb => "thumb",
        };
        format!("{hand} {finger}")
    }
}

/// Touch-typing finger for a key at `row`/`col` of the four character rows.
/// Assignment is positional, so it holds for every layout.
pub fn finger_for_position(row: usize, col: usize) -> FingerAssignment {
    use Finger::*;
    use Hand::*;

    // Number row is shifted one column to the left relative to the letter rows.
    let col = if row == 0 { col.saturating_sub(1) } else { col };
    match col {
        0 => FingerAssignment::new(Left, Pinky),
        1 => FingerAssignment::new(Left, Ring),
        2 => FingerAssignment::new(Left, Middle),
        3 | 4 => FingerAssignment::new(Left, Index),
        5 | 6 => FingerAssignment::new(Right, Index),
        7 => FingerAssignment::new(Right, Middle),
        8 => FingerAssignment::new(Right, Ring),
        _ => FingerAssignment::new(Right, Pinky),
    }
}
