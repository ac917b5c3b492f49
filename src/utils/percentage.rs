/// Usage percentage clamped to 0–100; a zero total reads as 0%.
pub fn usage_percent(used: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    let pct = (used as f64 / total as f64) * 100.0;
    pct.round().clamp(0.0, 100.0) as u32
}
