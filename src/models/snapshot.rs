use serde::{Deserialize, Serialize};

/// Point-in-time view of one account, as returned by `getLiveServiceInfo`.
///
/// Field names follow the upstream response; absent fields default so a
/// partial payload still produces a usable card. Replaced wholesale on each
/// successful fetch.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ServerSnapshot {
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub ve_status: String,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default)]
    pub node_ip: String,
    #[serde(default)]
    pub node_alias: String,
    #[serde(default)]
    pub node_location: String,
    #[serde(default)]
    pub ip_addresses: Vec<String>,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub email: String,
    /// Plan RAM in bytes
    #[serde(default)]
    pub plan_ram: u64,
    /// Plan disk in bytes
    #[serde(default)]
    pub plan_disk: u64,
    /// Monthly bandwidth allowance in bytes (before the multiplier)
    #[serde(default)]
    pub plan_monthly_data: u64,
    /// Some plans count traffic at a multiple of its real volume
    #[serde(default = "default_multiplier")]
    pub monthly_data_multiplier: u64,
    #[serde(default)]
    pub mem_available_kb: u64,
    #[serde(default)]
    pub ve_used_disk_space_b: u64,
    /// Bandwidth used this period in bytes (before the multiplier)
    #[serde(default)]
    pub data_counter: u64,
    /// Unix timestamp of the next bandwidth counter reset
    #[serde(default)]
    pub data_next_reset: i64,
}

fn default_multiplier() -> u64 {
    1
}

impl ServerSnapshot {
    pub fn is_running(&self) -> bool {
        self.ve_status.eq_ignore_ascii_case("running")
    }

    /// RAM in use, in bytes. `mem_available_kb` is reported in KiB.
    pub fn ram_used_bytes(&self) -> u64 {
        self.plan_ram.saturating_sub(self.mem_available_kb * 1024)
    }

    pub fn disk_used_bytes(&self) -> u64 {
        self.ve_used_disk_space_b
    }

    /// Bandwidth counters with the plan multiplier applied, as the control
    /// panel displays them.
    pub fn bandwidth_used_bytes(&self) -> u64 {
        self.data_counter * self.monthly_data_multiplier
    }

    pub fn bandwidth_limit_bytes(&self) -> u64 {
        self.plan_monthly_data * self.monthly_data_multiplier
    }
}
