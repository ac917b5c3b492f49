use std::time::Duration;

use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::api::LifecycleAction;
use crate::handlers::helpers::{build_card_views, build_chart_view, render_template};
use crate::models::{AppState, ChartView, LookbackWindow};
use crate::services::save_lookback;
use crate::templates::{DashboardTemplate, IntervalOption, LookbackOption};

const INTERVAL_OPTIONS: [u64; 4] = [15, 30, 60, 300];
const MIN_REFRESH_INTERVAL_SECS: u64 = 5;

pub async fn dashboard_get(State(state): State<AppState>) -> Response {
    let lookback = *state.lookback.lock().unwrap();
    let cards = build_card_views(&state.monitor);
    let chart = build_chart_view(&state.monitor, lookback);
    let config = state.monitor.config();
    let flash_messages = state.take_flash_messages();

    render_template(DashboardTemplate {
        has_flash_messages: !flash_messages.is_empty(),
        flash_messages,
        has_accounts: !cards.is_empty(),
        cards,
        has_chart: chart.is_some(),
        chart: chart.unwrap_or_else(ChartView::default),
        auto_refresh: config.auto_refresh,
        refresh_interval_secs: config.refresh_interval.as_secs(),
        interval_options: INTERVAL_OPTIONS
            .into_iter()
            .map(|secs| IntervalOption {
                secs,
                selected: secs == config.refresh_interval.as_secs(),
            })
            .collect(),
        lookback_options: LookbackWindow::ALL
            .into_iter()
            .map(|w| LookbackOption {
                hours: w.hours(),
                label: w.label(),
                selected: w == lookback,
            })
            .collect(),
    })
}

#[derive(Deserialize)]
pub struct AddAccountForm {
    #[serde(default)]
    pub veid: String,
    #[serde(default)]
    pub api_key: String,
}

pub async fn account_create(
    State(state): State<AppState>,
    Form(form): Form<AddAccountForm>,
) -> impl IntoResponse {
    match state.monitor.add_account(&form.veid, &form.api_key) {
        Ok(cred) => {
            tracing::info!(veid = %cred.veid, "account added");
            state.push_flash("Account added successfully!");
        }
        Err(e) => state.push_flash(e.to_string()),
    }
    Redirect::to("/")
}

pub async fn account_delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.monitor.remove_account(&id) {
        Some(cred) => {
            tracing::info!(veid = %cred.veid, "account removed");
            state.push_flash("Account removed.");
        }
        None => state.push_flash("Unknown account."),
    }
    Redirect::to("/")
}

pub async fn account_select(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    if !state.monitor.select(&id) {
        state.push_flash("Unknown account.");
    }
    Redirect::to("/")
}

pub async fn account_refresh(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    state.monitor.refresh_one(&id, false).await;
    Redirect::to("/")
}

pub async fn account_action(
    State(state): State<AppState>,
    Path((id, action)): Path<(String, String)>,
) -> impl IntoResponse {
    let Some(action) = LifecycleAction::parse(&action) else {
        state.push_flash("Invalid action specified");
        return Redirect::to("/");
    };
    let Some(veid) = state.monitor.store().get(&id).map(|c| c.veid) else {
        state.push_flash("Unknown account.");
        return Redirect::to("/");
    };
    match state.monitor.run_action(&id, action).await {
        Ok(()) => state.push_flash(format!("Server {} requested.", action)),
        Err(e) => state.push_flash(format!("Action failed for VEID {}: {}", veid, e)),
    }
    Redirect::to("/")
}

#[derive(Deserialize)]
pub struct RefreshSettingsForm {
    /// Present ("on") when the checkbox is ticked, absent otherwise.
    pub auto_refresh: Option<String>,
    #[serde(default)]
    pub interval_secs: u64,
}

pub async fn settings_refresh(
    State(state): State<AppState>,
    Form(form): Form<RefreshSettingsForm>,
) -> impl IntoResponse {
    let enabled = form.auto_refresh.is_some();
    let secs = form.interval_secs.max(MIN_REFRESH_INTERVAL_SECS);
    state
        .monitor
        .set_refresh(enabled, Duration::from_secs(secs));
    if enabled {
        state.push_flash(format!("Auto refresh enabled ({}s).", secs));
    } else {
        state.push_flash("Auto refresh disabled.");
    }
    Redirect::to("/")
}

#[derive(Deserialize)]
pub struct LookbackForm {
    #[serde(default)]
    pub hours: u32,
}

pub async fn settings_lookback(
    State(state): State<AppState>,
    Form(form): Form<LookbackForm>,
) -> impl IntoResponse {
    match LookbackWindow::from_hours(form.hours) {
        Some(window) => {
            *state.lookback.lock().unwrap() = window;
            if let Err(e) = save_lookback(&state.prefs_path, window) {
                tracing::error!(%e, "Failed to persist lookback preference");
            }
        }
        None => state.push_flash("Invalid time range."),
    }
    Redirect::to("/")
}
