use std::fmt;

/// Lifecycle of the active key's draft.
///
/// ```text
/// Idle -> Loading -> Ready -> Dirty -> Saving -> Ready
///                                           \-> Conflict -> Ready | Saving
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// No key selected.
    #[default]
    Idle,
    /// Waiting for the latest settings of the selected key.
    Loading,
    /// Draft matches the last loaded or saved revision.
    Ready,
    /// Draft has unsaved edits.
    Dirty,
    /// A write is in flight.
    Saving,
    /// The last write was rejected; waiting for pull or force.
    Conflict,
}

impl SessionState {
    /// Whether field edits are accepted.
    ///
    /// Edits while saving are accepted and queue a follow-up save.
    pub fn accepts_edits(self) -> bool {
        matches!(self, Self::Ready | Self::Dirty | Self::Saving)
    }

    /// Whether a save can be started.
    pub fn can_save(self) -> bool {
        matches!(self, Self::Ready | Self::Dirty)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Dirty => "dirty",
            Self::Saving => "saving",
            Self::Conflict => "in conflict",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(SessionState::Idle, false, false)]
    #[case(SessionState::Loading, false, false)]
    #[case(SessionState::Ready, true, true)]
    #[case(SessionState::Dirty, true, true)]
    #[case(SessionState::Saving, true, false)]
    #[case(SessionState::Conflict, false, false)]
    fn capabilities(#[case] state: SessionState, #[case] edits: bool, #[case] save: bool) {
        assert_eq!(state.accepts_edits(), edits);
        assert_eq!(state.can_save(), save);
    }

    #[test]
    fn default_is_idle() {
        assert_eq!(SessionState::default(), SessionState::Idle);
        assert_eq!(SessionState::Conflict.to_string(), "in conflict");
    }
}
