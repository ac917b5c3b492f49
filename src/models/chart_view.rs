/// Chart panel data for the selected credential. Polylines are precomputed
/// SVG point strings so the template stays logic-free.
#[derive(Clone, Debug, Default)]
pub struct ChartView {
    pub veid: String,
    pub loading: bool,
    pub has_error: bool,
    pub error: String,
    pub empty: bool,
    pub panels: Vec<ChartPanelView>,
}

#[derive(Clone, Debug, Default)]
pub struct ChartPanelView {
    pub title: String,
    pub max_label: String,
    pub start_label: String,
    pub end_label: String,
    pub series: Vec<SeriesLineView>,
}

#[derive(Clone, Debug)]
pub struct SeriesLineView {
    pub name: String,
    pub color: &'static str,
    pub points: String,
}
