//! First-interaction gate used to satisfy browser autoplay rules.

/// Window events that count as a user gesture for starting audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Click,
    TouchStart,
    KeyDown,
    Resize,
    Load,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 5] = [
        InteractionKind::Click,
        InteractionKind::TouchStart,
        InteractionKind::KeyDown,
        InteractionKind::Resize,
        InteractionKind::Load,
    ];

    #[inline]
    pub fn event_name(self) -> &'static str {
        match self {
            InteractionKind::Click => "click",
            InteractionKind::TouchStart => "touchstart",
            InteractionKind::KeyDown => "keydown",
            InteractionKind::Resize => "resize",
            InteractionKind::Load => "load",
        }
    }

    #[inline]
    pub fn from_event_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.event_name() == name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GateState {
    Armed,
    Fired(InteractionKind),
    Cancelled,
}

/// Resolves exactly once: on the first interaction, or on cancellation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnlockGate {
    state: GateState,
}

impl Default for UnlockGate {
    fn default() -> Self {
        Self {
            state: GateState::Armed,
        }
    }
}

impl UnlockGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self) -> bool {
        self.state == GateState::Armed
    }

    /// True only for the interaction that resolves the gate.
    pub fn fire(&mut self, kind: InteractionKind) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.state = GateState::Fired(kind);
        true
    }

    /// True if the gate was still armed.
    pub fn cancel(&mut self) -> bool {
        if !self.is_armed() {
            return false;
        }
        self.state = GateState::Cancelled;
        true
    }

    pub fn outcome(&self) -> Option<InteractionKind> {
        match self.state {
            GateState::Fired(kind) => Some(kind),
            _ => None,
        }
    }
}
