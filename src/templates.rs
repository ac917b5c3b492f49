use askama::Template;

use crate::models::{CardView, ChartView};

pub struct LookbackOption {
    pub hours: u32,
    pub label: &'static str,
    pub selected: bool,
}

pub struct IntervalOption {
    pub secs: u64,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub flash_messages: Vec<String>,
    pub has_flash_messages: bool,
    pub has_accounts: bool,
    pub cards: Vec<CardView>,
    pub has_chart: bool,
    pub chart: ChartView,
    pub auto_refresh: bool,
    pub refresh_interval_secs: u64,
    pub interval_options: Vec<IntervalOption>,
    pub lookback_options: Vec<LookbackOption>,
}
