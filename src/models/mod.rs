pub mod account_state;
pub mod app_state;
pub mod card_view;
pub mod chart_view;
pub mod credential;
pub mod snapshot;
pub mod usage;

pub use account_state::{AccountState, ActionState, FetchPhase, FetchState};
pub use app_state::AppState;
pub use card_view::{CardView, UsageBarView};
pub use chart_view::{ChartPanelView, ChartView, SeriesLineView};
pub use credential::Credential;
pub use snapshot::ServerSnapshot;
pub use usage::{LookbackWindow, UsageSample, UsageSeries};
