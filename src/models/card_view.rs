/// Flattened per-credential card data for the dashboard template.
#[derive(Clone, Debug, Default)]
pub struct CardView {
    pub id: String,
    pub veid: String,
    pub selected: bool,
    pub loading: bool,
    pub refreshing: bool,
    pub has_error: bool,
    pub error: String,
    pub action_loading: bool,
    pub has_action_error: bool,
    pub action_error: String,
    pub has_snapshot: bool,
    pub hostname: String,
    pub status_label: String,
    pub status_class: String,
    pub running: bool,
    pub ip_list: String,
    pub os: String,
    pub location: String,
    pub node_alias: String,
    pub data_next_reset: String,
    pub ram: UsageBarView,
    pub disk: UsageBarView,
    pub bandwidth: UsageBarView,
}

/// One resource bar: used/total display strings plus a 0–100 percentage.
#[derive(Clone, Debug, Default)]
pub struct UsageBarView {
    pub label: String,
    pub used_display: String,
    pub total_display: String,
    pub percent: u32,
}
