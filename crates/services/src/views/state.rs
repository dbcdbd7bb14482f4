use serde::Serialize;

use crate::error::GatewayError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewError {
    /// The requested learner does not exist; render a call to action.
    NotFound,
    /// Storage or gateway failure.
    Unavailable,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NotFound => "Profile not found. Create a profile to get started.",
            ViewError::Unavailable => "Something went wrong. Please try again.",
        }
    }
}

impl From<&GatewayError> for ViewError {
    fn from(err: &GatewayError) -> Self {
        if err.is_not_found() {
            ViewError::NotFound
        } else {
            ViewError::Unavailable
        }
    }
}

/// Lifecycle of one view: `Idle → Loading → Loaded | Failed`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum ViewState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(ViewError),
}

impl<T> ViewState<T> {
    /// Start (or restart) a load. Ignored while a load is in flight.
    pub fn begin(&mut self) -> bool {
        if matches!(self, ViewState::Loading) {
            tracing::debug!("view load already in flight");
            return false;
        }
        *self = ViewState::Loading;
        true
    }

    /// Settle a load. Only accepted while `Loading`.
    pub fn resolve(&mut self, outcome: Result<T, ViewError>) -> bool {
        if !matches!(self, ViewState::Loading) {
            tracing::debug!(state = self.name(), "ignoring resolve outside loading");
            return false;
        }
        *self = match outcome {
            Ok(view) => ViewState::Loaded(view),
            Err(err) => ViewState::Failed(err),
        };
        true
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            ViewState::Idle => "idle",
            ViewState::Loading => "loading",
            ViewState::Loaded(_) => "loaded",
            ViewState::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(view) => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_loaded(self) -> Option<T> {
        match self {
            ViewState::Loaded(view) => Some(view),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<ViewError> {
        match self {
            ViewState::Failed(err) => Some(*err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        let mut state: ViewState<u32> = ViewState::default();
        assert_eq!(state, ViewState::Idle);
        assert!(state.begin());
        assert_eq!(state, ViewState::Loading);
        assert!(state.resolve(Ok(7)));
        assert_eq!(state.loaded(), Some(&7));
    }

    #[test]
    fn resolve_outside_loading_is_ignored() {
        let mut state: ViewState<u32> = ViewState::Idle;
        assert!(!state.resolve(Ok(1)));
        assert_eq!(state, ViewState::Idle);

        state.begin();
        state.resolve(Err(ViewError::NotFound));
        assert!(!state.resolve(Ok(2)));
        assert_eq!(state.error(), Some(ViewError::NotFound));
    }

    #[test]
    fn settled_state_can_reload() {
        let mut state: ViewState<u32> = ViewState::Failed(ViewError::Unavailable);
        assert!(state.begin());
        assert!(!state.begin());
        assert!(state.resolve(Ok(3)));
        assert_eq!(state.into_loaded(), Some(3));
    }

    #[test]
    fn gateway_errors_map_to_view_errors() {
        let missing = GatewayError::NotFound("learner");
        assert_eq!(ViewError::from(&missing), ViewError::NotFound);
        let broken = GatewayError::Storage(storage::repository::StorageError::Connection(
            "closed".into(),
        ));
        assert_eq!(ViewError::from(&broken), ViewError::Unavailable);
    }

    #[test]
    fn serializes_with_state_tag() {
        let state: ViewState<u32> = ViewState::Loaded(5);
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"state":"loaded","data":5}"#);
        let failed: ViewState<u32> = ViewState::Failed(ViewError::NotFound);
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"state":"failed","data":"not_found"}"#
        );
    }
}
