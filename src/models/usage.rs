use serde::{Deserialize, Serialize};

/// One sample from `getRawUsageStats`. Timestamps are unix seconds; counters
/// are bytes over the sampling period.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UsageSample {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub network_in_bytes: u64,
    #[serde(default)]
    pub network_out_bytes: u64,
    #[serde(default)]
    pub disk_read_bytes: u64,
    #[serde(default)]
    pub disk_write_bytes: u64,
}

/// The full usage history for one account, replaced wholesale on each fetch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UsageSeries {
    #[serde(default)]
    pub data: Vec<UsageSample>,
    #[serde(default)]
    pub vm_type: String,
    #[serde(default)]
    pub error: i64,
}

impl UsageSeries {
    /// Samples newer than `now - window`, oldest first.
    pub fn within(&self, window: LookbackWindow, now: i64) -> Vec<&UsageSample> {
        let cutoff = now - window.hours() as i64 * 3600;
        self.data.iter().filter(|s| s.timestamp >= cutoff).collect()
    }
}

/// Chart lookback window. The selection is persisted between runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LookbackWindow {
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "48h")]
    TwoDays,
    #[serde(rename = "7d")]
    Week,
}

impl Default for LookbackWindow {
    fn default() -> Self {
        LookbackWindow::Day
    }
}

impl LookbackWindow {
    pub const ALL: [LookbackWindow; 4] = [
        LookbackWindow::SixHours,
        LookbackWindow::Day,
        LookbackWindow::TwoDays,
        LookbackWindow::Week,
    ];

    pub fn hours(&self) -> u32 {
        match self {
            LookbackWindow::SixHours => 6,
            LookbackWindow::Day => 24,
            LookbackWindow::TwoDays => 48,
            LookbackWindow::Week => 168,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LookbackWindow::SixHours => "6 Hours",
            LookbackWindow::Day => "24 Hours",
            LookbackWindow::TwoDays => "48 Hours",
            LookbackWindow::Week => "7 Days",
        }
    }

    pub fn from_hours(hours: u32) -> Option<LookbackWindow> {
        Self::ALL.into_iter().find(|w| w.hours() == hours)
    }
}
