/// What the character is doing, as far as animation and UI are concerned.
///
/// This is derived from the movement state every time it's asked for, and never fed back into
/// the movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocomotionState {
    Idle,
    Walking,
    Sprinting,
    Crouching,
    Sliding,
    Rising,
    Falling,
    NoClip,
}

impl LocomotionState {
    pub fn is_grounded(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Walking | Self::Sprinting | Self::Crouching | Self::Sliding
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStatus {
    pub state: LocomotionState,
    pub is_sliding: bool,
    pub is_crouching: bool,
    pub dash_charges: u32,
    pub jump_consumed: bool,
    pub double_jump_consumed: bool,
}

impl MovementStatus {
    /// Status of a module that has no abilities of its own.
    pub fn bare(state: LocomotionState) -> Self {
        Self {
            state,
            is_sliding: false,
            is_crouching: false,
            dash_charges: 0,
            jump_consumed: false,
            double_jump_consumed: false,
        }
    }
}
