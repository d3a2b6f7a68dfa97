use std::fmt;

use crate::error::TransitionError;

/// Lifecycle state of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentState {
    /// Known by id only; code not requested yet.
    #[default]
    Unfetched,
    /// Code requested, not yet defined.
    Fetching,
    /// Defined (factory available), factory not run.
    Fetched,
    /// Factory ran; handlers are live.
    Loaded,
    /// Last fetch failed or did not define the component. Retryable.
    Error,
}

/// Named state change requested on a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    Fetch,
    Define,
    Load,
    Fail,
}

impl ComponentState {
    /// Applies `t` according to the transition table.
    ///
    /// | from | transition | to |
    /// |---|---|---|
    /// | `Unfetched`, `Error` | `Fetch` | `Fetching` |
    /// | anything but `Loaded` | `Define` | `Fetched` |
    /// | `Fetched` | `Load` | `Loaded` |
    /// | `Fetching` | `Fail` | `Error` |
    ///
    /// # Example
    /// ```
    /// use wcrouter::{ComponentState, Transition};
    ///
    /// let s = ComponentState::Unfetched.apply(Transition::Fetch).unwrap();
    /// assert_eq!(s, ComponentState::Fetching);
    /// assert!(ComponentState::Loaded.apply(Transition::Load).is_err());
    /// ```
    pub fn apply(self, t: Transition) -> Result<Self, TransitionError> {
        use ComponentState::*;
        match (self, t) {
            (Unfetched | Error, Transition::Fetch) => Ok(Fetching),
            (Unfetched | Fetching | Fetched | Error, Transition::Define) => Ok(Fetched),
            (Fetched, Transition::Load) => Ok(Loaded),
            (Fetching, Transition::Fail) => Ok(Error),
            (from, t) => Err(TransitionError::Invalid {
                from: from.to_string(),
                transition: t.to_string(),
            }),
        }
    }

    /// True for states whose deliveries must be buffered.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Unfetched | Self::Fetching | Self::Error)
    }

    /// True for states from which a fetch may be issued.
    pub fn can_fetch(self) -> bool {
        matches!(self, Self::Unfetched | Self::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unfetched => "unfetched",
            Self::Fetching => "fetching",
            Self::Fetched => "fetched",
            Self::Loaded => "loaded",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ComponentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Transition::Fetch => "fetch",
            Transition::Define => "define",
            Transition::Load => "load",
            Transition::Fail => "fail",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComponentState::*;

    #[test]
    fn test_happy_path() {
        let s = Unfetched
            .apply(Transition::Fetch)
            .and_then(|s| s.apply(Transition::Define))
            .and_then(|s| s.apply(Transition::Load))
            .unwrap();
        assert_eq!(s, Loaded);
    }

    #[test]
    fn test_failure_is_retryable() {
        let s = Fetching.apply(Transition::Fail).unwrap();
        assert_eq!(s, Error);
        assert!(s.can_fetch());
        assert_eq!(s.apply(Transition::Fetch).unwrap(), Fetching);
    }

    #[test]
    fn test_define_from_any_unloaded_state() {
        for s in [Unfetched, Fetching, Fetched, Error] {
            assert_eq!(s.apply(Transition::Define).unwrap(), Fetched);
        }
    }

    #[test]
    fn test_rejections() {
        let cases = [
            (Loaded, Transition::Define),
            (Loaded, Transition::Load),
            (Unfetched, Transition::Load),
            (Fetched, Transition::Fetch),
            (Fetching, Transition::Fetch),
            (Unfetched, Transition::Fail),
            (Fetched, Transition::Fail),
        ];
        for (from, t) in cases {
            let err = from.apply(t).unwrap_err();
            assert_eq!(
                err,
                TransitionError::Invalid {
                    from: from.to_string(),
                    transition: t.to_string()
                }
            );
        }
    }
}
