use crate::models::snapshot::ServerSnapshot;
use crate::models::usage::UsageSeries;

/// Where a credential's status fetch currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// Per-credential status-fetch flags. A background refresh keeps the card
/// rendered from the previous snapshot, so it sets `refreshing` instead of
/// re-entering `Loading`.
#[derive(Clone, Debug, Default)]
pub struct FetchState {
    pub phase: FetchPhase,
    pub refreshing: bool,
}

impl FetchState {
    pub fn begin(&mut self, background: bool) {
        if background {
            self.refreshing = true;
            if matches!(self.phase, FetchPhase::Error(_)) {
                self.phase = FetchPhase::Idle;
            }
        } else {
            self.phase = FetchPhase::Loading;
            self.refreshing = false;
        }
    }

    pub fn finish_ok(&mut self) {
        self.phase = FetchPhase::Ready;
        self.refreshing = false;
    }

    pub fn finish_err(&mut self, message: String) {
        self.phase = FetchPhase::Error(message);
        self.refreshing = false;
    }

    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Per-credential lifecycle-action flags.
#[derive(Clone, Debug, Default)]
pub struct ActionState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Everything the dashboard tracks for one credential. Created when the
/// credential is added, dropped in the same operation that removes it.
#[derive(Clone, Debug, Default)]
pub struct AccountState {
    pub fetch: FetchState,
    pub action: ActionState,
    pub snapshot: Option<ServerSnapshot>,
    pub usage: Option<UsageSeries>,
    pub chart_loading: bool,
    pub usage_error: Option<String>,
}
