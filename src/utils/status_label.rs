use crate::models::ServerSnapshot;

/// Human-readable status label for a server card.
pub fn status_label(snapshot: &ServerSnapshot) -> String {
    if snapshot.suspended {
        return "Suspended".to_string();
    }
    match snapshot.ve_status.to_lowercase().as_str() {
        "running" => "Running".to_string(),
        "stopped" => "Stopped".to_string(),
        "" => "Unknown".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => "Unknown".to_string(),
            }
        }
    }
}
