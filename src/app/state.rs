// src/app/state.rs
// Defines state-related enums and structs for ModelDeck: application status, inter-thread messages.

use crate::app::api::{Capabilities, Model, User};

// --- Application State Enums ---

/// Represents the possible operational statuses of the application.
#[derive(Clone, Debug, PartialEq)]
pub enum AppStatus {
    Idle,
    /// The application is fetching capabilities, users and the model list from the server.
    FetchingModels,
    /// Contains the name of the model being deleted.
    DeletingModel(String),
    /// The last operation completed successfully.
    Success,
    /// Contains the error_message.
    Error(String),
}

impl AppStatus {
    /// Whether a background operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        !matches!(self, AppStatus::Idle | AppStatus::Success | AppStatus::Error(_))
    }

    /// Whether a new fetch or delete may be dispatched right now.
    ///
    /// The dispatching call flips the status to the in-flight variant under
    /// the same lock it checked this predicate under, so at most one
    /// operation can be started per gate pass.
    pub fn can_begin_operation(&self) -> bool {
        !self.is_busy()
    }
}

/// Defines messages passed from background tasks (server interactions)
/// or the logger to the main UI thread via an MPSC channel to trigger updates.
#[derive(Debug)]
pub enum UpdateMessage {
    /// A log message (typically INFO level or lower) to be displayed in the UI.
    Log(String),
    /// An update to the human-readable status text displayed to the user.
    StatusText(String),
    /// A change in the overall application status.
    Status(AppStatus),
    /// A new list of models received from the annotation server.
    ModelList(Vec<Model>),
    /// The registered users known to the annotation server.
    Users(Vec<User>),
    /// The installed-capability flags reported by the annotation server.
    Capabilities(Capabilities),
}

/// True when `new` settles a delete that was in flight. The store refreshes
/// the model list once in response; the refresh path alone owns the status
/// text so the messages arrive in order.
pub fn delete_settled_ok(old: &AppStatus, new: &AppStatus) -> bool {
    matches!(old, AppStatus::DeletingModel(_)) && matches!(new, AppStatus::Success)
}

/// True when `new` ends an in-flight fetch with an error. This counts as one
/// completed load attempt, otherwise the load-gate would re-fire every frame
/// against an unreachable server.
pub fn fetch_settled_err(old: &AppStatus, new: &AppStatus) -> bool {
    matches!(old, AppStatus::FetchingModels) && matches!(new, AppStatus::Error(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_statuses_block_a_second_dispatch() {
        assert!(!AppStatus::FetchingModels.can_begin_operation());
        assert!(!AppStatus::DeletingModel("my-detector".to_string()).can_begin_operation());
        assert!(AppStatus::FetchingModels.is_busy());
        assert!(AppStatus::DeletingModel("my-detector".to_string()).is_busy());
    }

    #[test]
    fn settled_statuses_allow_a_dispatch() {
        assert!(AppStatus::Idle.can_begin_operation());
        assert!(AppStatus::Success.can_begin_operation());
        assert!(AppStatus::Error("boom".to_string()).can_begin_operation());
        assert!(!AppStatus::Idle.is_busy());
        assert!(!AppStatus::Success.is_busy());
        assert!(!AppStatus::Error("boom".to_string()).is_busy());
    }

    #[test]
    fn dispatch_flip_dedups_the_next_gate_pass() {
        // Mirrors the guarded dispatch: check the predicate, then flip the
        // status before anyone else can observe it. The second pass must be
        // rejected until the fetch settles.
        let mut status = AppStatus::Idle;
        assert!(status.can_begin_operation());
        status = AppStatus::FetchingModels;
        assert!(!status.can_begin_operation());
        status = AppStatus::Error("server unreachable".to_string());
        assert!(status.can_begin_operation());
    }

    #[test]
    fn only_a_settled_delete_triggers_a_refresh() {
        let deleting = AppStatus::DeletingModel("my-detector".to_string());
        assert!(delete_settled_ok(&deleting, &AppStatus::Success));
        assert!(!delete_settled_ok(&deleting, &AppStatus::Error("denied".to_string())));
        assert!(!delete_settled_ok(&AppStatus::FetchingModels, &AppStatus::Success));
        assert!(!delete_settled_ok(&AppStatus::Idle, &AppStatus::Success));
    }

    #[test]
    fn failed_fetch_counts_as_a_completed_load_attempt() {
        let err = AppStatus::Error("server unreachable".to_string());
        assert!(fetch_settled_err(&AppStatus::FetchingModels, &err));
        assert!(!fetch_settled_err(&AppStatus::FetchingModels, &AppStatus::Idle));
        assert!(!fetch_settled_err(
            &AppStatus::DeletingModel("m".to_string()),
            &err
        ));
    }
}
