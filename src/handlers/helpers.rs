use askama::Template;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use chrono::Utc;

use crate::models::{
    AccountState, CardView, ChartPanelView, ChartView, LookbackWindow, SeriesLineView,
    UsageBarView, UsageSample,
};
use crate::services::Monitor;
use crate::utils::{format_bytes, format_time_short, format_timestamp, status_label, usage_percent};

const CHART_WIDTH: f64 = 600.0;
const CHART_HEIGHT: f64 = 160.0;
const CHART_PAD: f64 = 6.0;

pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(%e, "Failed to render template");
            (StatusCode::INTERNAL_SERVER_ERROR, "template error").into_response()
        }
    }
}

/// Build one card per stored credential, in insertion order.
pub fn build_card_views(monitor: &Monitor) -> Vec<CardView> {
    let selected = monitor.selected_id();
    monitor
        .store()
        .list()
        .into_iter()
        .map(|cred| {
            let state = monitor.state_of(&cred.id).unwrap_or_default();
            build_card(&cred.id, &cred.veid, &state, selected.as_deref() == Some(&cred.id))
        })
        .collect()
}

fn build_card(id: &str, veid: &str, state: &AccountState, selected: bool) -> CardView {
    let mut card = CardView {
        id: id.to_string(),
        veid: veid.to_string(),
        selected,
        loading: state.fetch.is_loading(),
        refreshing: state.fetch.refreshing,
        action_loading: state.action.loading,
        ..Default::default()
    };
    if let Some(err) = state.fetch.error() {
        card.has_error = true;
        card.error = err.to_string();
    }
    if let Some(err) = &state.action.error {
        card.has_action_error = true;
        card.action_error = err.clone();
    }
    if let Some(snap) = &state.snapshot {
        card.has_snapshot = true;
        card.hostname = snap.hostname.clone();
        card.status_label = status_label(snap);
        card.status_class = card.status_label.to_lowercase();
        card.running = snap.is_running() && !snap.suspended;
        card.ip_list = snap.ip_addresses.join(", ");
        card.os = snap.os.clone();
        card.location = snap.node_location.clone();
        card.node_alias = snap.node_alias.clone();
        card.data_next_reset = format_timestamp(snap.data_next_reset);
        card.ram = usage_bar("RAM", snap.ram_used_bytes(), snap.plan_ram);
        card.disk = usage_bar("Disk", snap.disk_used_bytes(), snap.plan_disk);
        card.bandwidth = usage_bar(
            "Bandwidth",
            snap.bandwidth_used_bytes(),
            snap.bandwidth_limit_bytes(),
        );
    }
    card
}

fn usage_bar(label: &str, used: u64, total: u64) -> UsageBarView {
    UsageBarView {
        label: label.to_string(),
        used_display: format_bytes(used),
        total_display: format_bytes(total),
        percent: usage_percent(used, total),
    }
}

/// Build the chart panel for the selected credential, filtered by the
/// lookback window.
pub fn build_chart_view(monitor: &Monitor, lookback: LookbackWindow) -> Option<ChartView> {
    let id = monitor.selected_id()?;
    let veid = monitor.store().get(&id)?.veid;
    let state = monitor.state_of(&id).unwrap_or_default();

    let mut view = ChartView {
        veid,
        loading: state.chart_loading,
        empty: true,
        ..Default::default()
    };
    if let Some(err) = &state.usage_error {
        view.has_error = true;
        view.error = err.clone();
        return Some(view);
    }
    let Some(series) = &state.usage else {
        return Some(view);
    };
    if series.error != 0 {
        view.has_error = true;
        view.error = format!("Usage stats unavailable (upstream error {})", series.error);
        return Some(view);
    }

    let now = Utc::now().timestamp();
    let samples = series.within(lookback, now);
    if samples.is_empty() {
        return Some(view);
    }
    view.empty = false;
    view.panels = vec![
        cpu_panel(&samples),
        network_panel(&samples),
        disk_panel(&samples),
    ];
    Some(view)
}

fn cpu_panel(samples: &[&UsageSample]) -> ChartPanelView {
    let points: Vec<(i64, f64)> = samples.iter().map(|s| (s.timestamp, s.cpu_usage)).collect();
    let max = points.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0);
    panel(
        "CPU Usage",
        format!("{:.0}%", max),
        samples,
        vec![SeriesLineView {
            name: "cpu".to_string(),
            color: "#8884d8",
            points: polyline(&points, max),
        }],
    )
}

fn network_panel(samples: &[&UsageSample]) -> ChartPanelView {
    let inbound: Vec<(i64, f64)> = samples
        .iter()
        .map(|s| (s.timestamp, s.network_in_bytes as f64))
        .collect();
    let outbound: Vec<(i64, f64)> = samples
        .iter()
        .map(|s| (s.timestamp, s.network_out_bytes as f64))
        .collect();
    let max = max_value(&inbound).max(max_value(&outbound)).max(1.0);
    panel(
        "Network Traffic",
        format_bytes(max as u64),
        samples,
        vec![
            SeriesLineView {
                name: "in".to_string(),
                color: "#82ca9d",
                points: polyline(&inbound, max),
            },
            SeriesLineView {
                name: "out".to_string(),
                color: "#8884d8",
                points: polyline(&outbound, max),
            },
        ],
    )
}

fn disk_panel(samples: &[&UsageSample]) -> ChartPanelView {
    let reads: Vec<(i64, f64)> = samples
        .iter()
        .map(|s| (s.timestamp, s.disk_read_bytes as f64))
        .collect();
    let writes: Vec<(i64, f64)> = samples
        .iter()
        .map(|s| (s.timestamp, s.disk_write_bytes as f64))
        .collect();
    let max = max_value(&reads).max(max_value(&writes)).max(1.0);
    panel(
        "Disk I/O",
        format_bytes(max as u64),
        samples,
        vec![
            SeriesLineView {
                name: "read".to_string(),
                color: "#ffc658",
                points: polyline(&reads, max),
            },
            SeriesLineView {
                name: "write".to_string(),
                color: "#ff7300",
                points: polyline(&writes, max),
            },
        ],
    )
}

fn panel(
    title: &str,
    max_label: String,
    samples: &[&UsageSample],
    series: Vec<SeriesLineView>,
) -> ChartPanelView {
    ChartPanelView {
        title: title.to_string(),
        max_label,
        start_label: format_time_short(samples.first().map(|s| s.timestamp).unwrap_or(0)),
        end_label: format_time_short(samples.last().map(|s| s.timestamp).unwrap_or(0)),
        series,
    }
}

fn max_value(points: &[(i64, f64)]) -> f64 {
    points.iter().map(|(_, v)| *v).fold(0.0, f64::max)
}

/// Project timestamped values into SVG polyline coordinates.
fn polyline(points: &[(i64, f64)], max_value: f64) -> String {
    if points.is_empty() {
        return String::new();
    }
    let t_min = points.first().map(|(t, _)| *t).unwrap_or(0);
    let t_max = points.last().map(|(t, _)| *t).unwrap_or(0);
    let span = (t_max - t_min).max(1) as f64;
    let usable_w = CHART_WIDTH - 2.0 * CHART_PAD;
    let usable_h = CHART_HEIGHT - 2.0 * CHART_PAD;
    points
        .iter()
        .map(|(t, v)| {
            let x = CHART_PAD + ((t - t_min) as f64 / span) * usable_w;
            let y = CHART_HEIGHT - CHART_PAD - (v / max_value).clamp(0.0, 1.0) * usable_h;
            format!("{:.1},{:.1}", x, y)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
