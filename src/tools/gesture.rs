use thiserror::Error;

pub type GestureResult<T> = std::result::Result<T, GestureError>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GestureError {
    #[error("invalid gesture transition: from {from:?} using event {event:?}")]
    InvalidTransition {
        from: GesturePhase,
        event: GestureEvent,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GesturePhase {
    #[default]
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    Press,
    Drag,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTransition {
    pub from: GesturePhase,
    pub event: GestureEvent,
    pub to: GesturePhase,
}

/// Press/drag/release lifecycle of a single tool.
#[derive(Debug, Clone, Default)]
pub struct GestureMachine {
    phase: GesturePhase,
    last_transition: Option<GestureTransition>,
}

impl GestureMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == GesturePhase::Active
    }

    pub fn last_transition(&self) -> Option<GestureTransition> {
        self.last_transition
    }

    pub fn can_transition(&self, event: GestureEvent) -> bool {
        self.next_phase(event).is_some()
    }

    pub fn next_phase(&self, event: GestureEvent) -> Option<GesturePhase> {
        use GestureEvent::*;
        match (self.phase, event) {
            // A new press abandons whatever gesture was in flight.
            (_, Press) => Some(GesturePhase::Active),
            (GesturePhase::Active, Drag) => Some(GesturePhase::Active),
            (GesturePhase::Active, Release) => Some(GesturePhase::Idle),
            _ => None,
        }
    }

    pub fn transition(&mut self, event: GestureEvent) -> GestureResult<GesturePhase> {
        let next = self.next_phase(event).ok_or_else(|| {
            let from = self.phase;
            tracing::debug!(from = ?from, event = ?event, "ignoring gesture event");
            GestureError::InvalidTransition { from, event }
        })?;
        if event != GestureEvent::Drag {
            tracing::debug!(from = ?self.phase, event = ?event, to = ?next, "gesture transition");
        }

        self.last_transition = Some(GestureTransition {
            from: self.phase,
            event,
            to: next,
        });
        self.phase = next;
        Ok(next)
    }

    /// Drops any gesture in flight without recording a transition.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
    }
}
