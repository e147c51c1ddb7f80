//! Soldier locomotion state machine
//!
//! Fourteen sprite frames encode where a soldier faces and which half of a
//! stride it is in. Turning goes through an intermediate frame, so pressing
//! the opposite direction has to pick a side to turn through; the side of the
//! last completed turn decides it.
//!
//! The transitions are a literal table, one rule per (state, intent) pair.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the four movement and firing directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Up,
    Down,
    Left,
    Right,
}

impl Facing {
    /// Column order of the transition table
    pub const ALL: [Facing; 4] = [Facing::Up, Facing::Down, Facing::Left, Facing::Right];

    /// Unit vector in screen space (y grows downward)
    pub fn unit(self) -> Vec2 {
        match self {
            Facing::Up => Vec2::new(0.0, -1.0),
            Facing::Down => Vec2::new(0.0, 1.0),
            Facing::Left => Vec2::new(-1.0, 0.0),
            Facing::Right => Vec2::new(1.0, 0.0),
        }
    }

    pub fn is_horizontal(self) -> bool {
        matches!(self, Facing::Left | Facing::Right)
    }

    const fn column(self) -> usize {
        match self {
            Facing::Up => 0,
            Facing::Down => 1,
            Facing::Left => 2,
            Facing::Right => 3,
        }
    }
}

/// Sprite frame of a soldier; the discriminant is the frame index
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionState {
    #[default]
    FacingUp = 0,
    TurnUpRight = 1,
    FacingRight = 2,
    /// Also the first half of a downward stride
    TurnRightDown = 3,
    FacingDown = 4,
    TurnDownLeft = 5,
    FacingLeft = 6,
    /// Also the first half of an upward stride
    TurnLeftUp = 7,
    StrideUp = 8,
    StrideRightA = 9,
    StrideRightB = 10,
    StrideDown = 11,
    StrideLeftA = 12,
    StrideLeftB = 13,
}

impl LocomotionState {
    pub const COUNT: usize = 14;

    pub const ALL: [LocomotionState; Self::COUNT] = [
        LocomotionState::FacingUp,
        LocomotionState::TurnUpRight,
        LocomotionState::FacingRight,
        LocomotionState::TurnRightDown,
        LocomotionState::FacingDown,
        LocomotionState::TurnDownLeft,
        LocomotionState::FacingLeft,
        LocomotionState::TurnLeftUp,
        LocomotionState::StrideUp,
        LocomotionState::StrideRightA,
        LocomotionState::StrideRightB,
        LocomotionState::StrideDown,
        LocomotionState::StrideLeftA,
        LocomotionState::StrideLeftB,
    ];

    /// Sprite frame index
    #[inline]
    pub fn frame(self) -> usize {
        self as usize
    }

    pub fn from_frame(frame: usize) -> Option<Self> {
        Self::ALL.get(frame).copied()
    }

    /// Direction a shot from this frame travels
    ///
    /// The two diagonal turn frames (up-right, down-left) have no aim.
    pub fn aim(self) -> Option<Facing> {
        use LocomotionState::*;
        match self {
            FacingUp | TurnLeftUp | StrideUp => Some(Facing::Up),
            FacingRight | StrideRightA | StrideRightB => Some(Facing::Right),
            FacingDown | TurnRightDown | StrideDown => Some(Facing::Down),
            FacingLeft | StrideLeftA | StrideLeftB => Some(Facing::Left),
            TurnUpRight | TurnDownLeft => None,
        }
    }
}

/// Everything the state machine remembers between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Gait {
    pub state: LocomotionState,
    /// Picks which stride frame comes next
    pub parity: bool,
    /// Side the last completed turn came from
    pub last_turn: Option<Facing>,
}

/// Outcome of one rule: where to go and what to remember
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub to: LocomotionState,
    pub parity: Option<bool>,
    pub last_turn: Option<Facing>,
    /// Direction the body moves on this step, if it moves
    pub stride: Option<Facing>,
}

impl Step {
    const fn to(to: LocomotionState) -> Self {
        Self {
            to,
            parity: None,
            last_turn: None,
            stride: None,
        }
    }

    const fn parity(mut self, parity: bool) -> Self {
        self.parity = Some(parity);
        self
    }

    const fn turned(mut self, from: Facing) -> Self {
        self.last_turn = Some(from);
        self
    }

    const fn stride(mut self, facing: Facing) -> Self {
        self.stride = Some(facing);
        self
    }
}

/// A table entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Go(Step),
    /// Alternate stride frames on parity
    Stride { even: Step, odd: Step },
    /// Reversal: turn back through the side of the last turn; hold if unknown
    Reverse {
        turns: [(Facing, Step); 2],
        otherwise: Option<Step>,
    },
}

impl Rule {
    /// Step selected by this rule for the given gait, `None` to hold
    pub fn resolve(&self, gait: &Gait) -> Option<Step> {
        match *self {
            Rule::Go(step) => Some(step),
            Rule::Stride { even, odd } => Some(if gait.parity { odd } else { even }),
            Rule::Reverse { turns, otherwise } => turns
                .iter()
                .find(|(side, _)| gait.last_turn == Some(*side))
                .map(|(_, step)| *step)
                .or(otherwise),
        }
    }
}

const fn go(step: Step) -> Rule {
    Rule::Go(step)
}

const fn always(step: Step) -> [Rule; 4] {
    [go(step), go(step), go(step), go(step)]
}

/// Transition table indexed by `[state.frame()][intent]`, columns Up, Down, Left, Right
pub static TRANSITIONS: [[Rule; 4]; LocomotionState::COUNT] = {
    use Facing::{Down, Left, Right, Up};
    use LocomotionState::*;
    [
        // FacingUp
        [
            Rule::Stride {
                even: Step::to(TurnLeftUp).parity(true).stride(Up),
                odd: Step::to(StrideUp).parity(false).stride(Up),
            },
            Rule::Reverse {
                turns: [
                    (Left, Step::to(TurnLeftUp).parity(true)),
                    (Right, Step::to(TurnUpRight)),
                ],
                otherwise: Some(Step::to(TurnUpRight)),
            },
            go(Step::to(TurnLeftUp).parity(true)),
            go(Step::to(TurnUpRight)),
        ],
        // TurnUpRight
        [
            go(Step::to(FacingUp).turned(Right)),
            go(Step::to(FacingRight).turned(Up)),
            go(Step::to(FacingUp).turned(Right)),
            go(Step::to(FacingRight).turned(Up)),
        ],
        // FacingRight
        [
            go(Step::to(TurnUpRight)),
            go(Step::to(TurnRightDown).parity(true)),
            Rule::Reverse {
                turns: [
                    (Up, Step::to(TurnUpRight)),
                    (Down, Step::to(TurnRightDown).parity(true)),
                ],
                otherwise: None,
            },
            Rule::Stride {
                even: Step::to(StrideRightB).parity(true).stride(Right),
                odd: Step::to(StrideRightA).parity(false).stride(Right),
            },
        ],
        // TurnRightDown
        [
            go(Step::to(FacingRight).turned(Down)),
            go(Step::to(FacingDown).turned(Right).stride(Down)),
            go(Step::to(FacingDown).turned(Right)),
            go(Step::to(FacingRight).turned(Down)),
        ],
        // FacingDown
        [
            Rule::Reverse {
                turns: [
                    (Right, Step::to(TurnRightDown).parity(true)),
                    (Left, Step::to(TurnDownLeft)),
                ],
                otherwise: None,
            },
            Rule::Stride {
                even: Step::to(TurnRightDown).parity(true).stride(Down),
                odd: Step::to(StrideDown).parity(false).stride(Down),
            },
            go(Step::to(TurnDownLeft)),
            go(Step::to(TurnRightDown).parity(true)),
        ],
        // TurnDownLeft
        [
            go(Step::to(FacingLeft).turned(Down)),
            go(Step::to(FacingDown).turned(Left)),
            go(Step::to(FacingLeft).turned(Down)),
            go(Step::to(FacingDown).turned(Left)),
        ],
        // FacingLeft
        [
            go(Step::to(TurnLeftUp).parity(true)),
            go(Step::to(TurnDownLeft)),
            Rule::Stride {
                even: Step::to(StrideLeftB).parity(true).stride(Left),
                odd: Step::to(StrideLeftA).parity(false).stride(Left),
            },
            Rule::Reverse {
                turns: [
                    (Down, Step::to(TurnDownLeft)),
                    (Up, Step::to(TurnLeftUp).parity(true)),
                ],
                otherwise: None,
            },
        ],
        // TurnLeftUp
        [
            go(Step::to(FacingUp).turned(Left).stride(Up)),
            go(Step::to(FacingLeft).turned(Up)),
            go(Step::to(FacingLeft).turned(Up)),
            go(Step::to(FacingUp).turned(Left)),
        ],
        // Stride frames finish their stride whatever the input
        always(Step::to(FacingUp).stride(Up)),
        always(Step::to(FacingRight).stride(Right)),
        always(Step::to(FacingRight).stride(Right)),
        always(Step::to(FacingDown).stride(Down)),
        always(Step::to(FacingLeft).stride(Left)),
        always(Step::to(FacingLeft).stride(Left)),
    ]
};

/// Rule for a state and intent
pub fn rule(state: LocomotionState, intent: Facing) -> &'static Rule {
    &TRANSITIONS[state.frame()][intent.column()]
}

/// Pure transition: next gait and the stride direction, if the step moves
pub fn transition(gait: Gait, intent: Facing) -> (Gait, Option<Facing>) {
    let Some(step) = rule(gait.state, intent).resolve(&gait) else {
        return (gait, None);
    };
    let next = Gait {
        state: step.to,
        parity: step.parity.unwrap_or(gait.parity),
        last_turn: step.last_turn.or(gait.last_turn),
    };
    (next, step.stride)
}

impl Gait {
    /// Advance one step toward `intent`
    pub fn advance(&mut self, intent: Facing) -> Option<Facing> {
        let (next, stride) = transition(*self, intent);
        *self = next;
        stride
    }
}
