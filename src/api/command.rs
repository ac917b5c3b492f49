use std::fmt;

/// Every capability exposed by the KiwiVM control-panel API.
///
/// Each variant carries exactly the parameters its endpoint requires; the
/// endpoint path and query parameter names are part of the upstream
/// contract and must not be changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    Restart,
    Kill,
    GetServiceInfo,
    GetLiveServiceInfo,
    GetAvailableOs,
    ReinstallOs { os: String },
    GetSshKeys,
    UpdateSshKeys { ssh_keys: String },
    ResetRootPassword,
    GetRawUsageStats,
    GetAuditLog,
    SetHostname { new_hostname: String },
    SetPtr { ip: String, ptr: String },
    MountIso { iso: String },
    UnmountIso,
    CreateSnapshot { description: Option<String> },
    ListSnapshots,
    DeleteSnapshot { snapshot: String },
    RestoreSnapshot { snapshot: String },
    ToggleSnapshotSticky { snapshot: String, sticky: bool },
    ExportSnapshot { snapshot: String },
    ImportSnapshot { source_veid: String, source_token: String },
    ListBackups,
    CopyBackupToSnapshot { backup_token: String },
    AddIpv6,
    DeleteIpv6 { ip: String },
    GetMigrationLocations,
    StartMigration { location: String },
    CloneFromExternalServer {
        ip: String,
        ssh_port: String,
        root_password: Option<String>,
    },
    GetSuspensionDetails,
    GetPolicyViolations,
    Unsuspend { record_id: String },
    ResolvePolicyViolation { record_id: String },
    GetRateLimitStatus,
    GetAvailablePrivateIps,
    AssignPrivateIp { ip: Option<String> },
    DeletePrivateIp { ip: String },
    GetNotificationPreferences,
    SetNotificationPreferences { json: String },
}

impl Command {
    /// Upstream endpoint path, relative to the API base URL.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::Stop => "stop",
            Command::Restart => "restart",
            Command::Kill => "kill",
            Command::GetServiceInfo => "getServiceInfo",
            Command::GetLiveServiceInfo => "getLiveServiceInfo",
            Command::GetAvailableOs => "getAvailableOS",
            Command::ReinstallOs { .. } => "reinstallOS",
            Command::GetSshKeys => "getSshKeys",
            Command::UpdateSshKeys { .. } => "updateSshKeys",
            Command::ResetRootPassword => "resetRootPassword",
            Command::GetRawUsageStats => "getRawUsageStats",
            Command::GetAuditLog => "getAuditLog",
            Command::SetHostname { .. } => "setHostname",
            Command::SetPtr { .. } => "setPTR",
            Command::MountIso { .. } => "iso/mount",
            Command::UnmountIso => "iso/unmount",
            Command::CreateSnapshot { .. } => "snapshot/create",
            Command::ListSnapshots => "snapshot/list",
            Command::DeleteSnapshot { .. } => "snapshot/delete",
            Command::RestoreSnapshot { .. } => "snapshot/restore",
            Command::ToggleSnapshotSticky { .. } => "snapshot/toggleSticky",
            Command::ExportSnapshot { .. } => "snapshot/export",
            Command::ImportSnapshot { .. } => "snapshot/import",
            Command::ListBackups => "backup/list",
            Command::CopyBackupToSnapshot { .. } => "backup/copyToSnapshot",
            Command::AddIpv6 => "ipv6/add",
            Command::DeleteIpv6 { .. } => "ipv6/delete",
            Command::GetMigrationLocations => "migrate/getLocations",
            Command::StartMigration { .. } => "migrate/start",
            Command::CloneFromExternalServer { .. } => "cloneFromExternalServer",
            Command::GetSuspensionDetails => "getSuspensionDetails",
            Command::GetPolicyViolations => "getPolicyViolations",
            Command::Unsuspend { .. } => "unsuspend",
            Command::ResolvePolicyViolation { .. } => "resolvePolicyViolation",
            Command::GetRateLimitStatus => "getRateLimitStatus",
            Command::GetAvailablePrivateIps => "privateIp/getAvailableIps",
            Command::AssignPrivateIp { .. } => "privateIp/assign",
            Command::DeletePrivateIp { .. } => "privateIp/delete",
            Command::GetNotificationPreferences => "kiwivm/getNotificationPreferences",
            Command::SetNotificationPreferences { .. } => "kiwivm/setNotificationPreferences",
        }
    }

    /// Extra query parameters beyond `veid` and `api_key`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Command::ReinstallOs { os } => vec![("os", os.clone())],
            Command::UpdateSshKeys { ssh_keys } => vec![("ssh_keys", ssh_keys.clone())],
            Command::SetHostname { new_hostname } => vec![("newHostname", new_hostname.clone())],
            Command::SetPtr { ip, ptr } => vec![("ip", ip.clone()), ("ptr", ptr.clone())],
            Command::MountIso { iso } => vec![("iso", iso.clone())],
            Command::CreateSnapshot { description } => description
                .iter()
                .map(|d| ("description", d.clone()))
                .collect(),
            Command::DeleteSnapshot { snapshot }
            | Command::RestoreSnapshot { snapshot }
            | Command::ExportSnapshot { snapshot } => vec![("snapshot", snapshot.clone())],
            Command::ToggleSnapshotSticky { snapshot, sticky } => vec![
                ("snapshot", snapshot.clone()),
                ("sticky", if *sticky { "1".into() } else { "0".into() }),
            ],
            Command::ImportSnapshot {
                source_veid,
                source_token,
            } => vec![
                ("sourceVeid", source_veid.clone()),
                ("sourceToken", source_token.clone()),
            ],
            Command::CopyBackupToSnapshot { backup_token } => {
                vec![("backupToken", backup_token.clone())]
            }
            Command::DeleteIpv6 { ip } | Command::DeletePrivateIp { ip } => {
                vec![("ip", ip.clone())]
            }
            Command::StartMigration { location } => vec![("location", location.clone())],
            Command::CloneFromExternalServer {
                ip,
                ssh_port,
                root_password,
            } => {
                let mut p = vec![
                    ("externalServerIP", ip.clone()),
                    ("externalServerSSHport", ssh_port.clone()),
                ];
                if let Some(pw) = root_password {
                    p.push(("externalServerRootPassword", pw.clone()));
                }
                p
            }
            Command::Unsuspend { record_id } | Command::ResolvePolicyViolation { record_id } => {
                vec![("record_id", record_id.clone())]
            }
            Command::AssignPrivateIp { ip } => ip.iter().map(|i| ("ip", i.clone())).collect(),
            Command::SetNotificationPreferences { json } => {
                vec![("json_notification_preferences", json.clone())]
            }
            _ => vec![],
        }
    }

    /// Resolve a wire action name into a command.
    ///
    /// Only actions expressible through the proxy's `{veid, api_key, action}`
    /// body resolve here; anything requiring additional parameters is
    /// treated as unknown by the proxy.
    pub fn parse(action: &str) -> Option<Command> {
        let cmd = match action {
            "start" => Command::Start,
            "stop" => Command::Stop,
            "restart" => Command::Restart,
            "kill" => Command::Kill,
            "getServiceInfo" => Command::GetServiceInfo,
            "getLiveServiceInfo" => Command::GetLiveServiceInfo,
            "getAvailableOS" => Command::GetAvailableOs,
            "getSshKeys" => Command::GetSshKeys,
            "resetRootPassword" => Command::ResetRootPassword,
            "getRawUsageStats" => Command::GetRawUsageStats,
            "getAuditLog" => Command::GetAuditLog,
            "iso/unmount" => Command::UnmountIso,
            "snapshot/create" => Command::CreateSnapshot { description: None },
            "snapshot/list" => Command::ListSnapshots,
            "backup/list" => Command::ListBackups,
            "ipv6/add" => Command::AddIpv6,
            "migrate/getLocations" => Command::GetMigrationLocations,
            "getSuspensionDetails" => Command::GetSuspensionDetails,
            "getPolicyViolations" => Command::GetPolicyViolations,
            "getRateLimitStatus" => Command::GetRateLimitStatus,
            "privateIp/getAvailableIps" => Command::GetAvailablePrivateIps,
            "privateIp/assign" => Command::AssignPrivateIp { ip: None },
            "kiwivm/getNotificationPreferences" => Command::GetNotificationPreferences,
            _ => return None,
        };
        Some(cmd)
    }
}

/// Power actions a user can trigger from a server card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Start,
    Stop,
    Restart,
    Kill,
}

impl LifecycleAction {
    pub fn parse(s: &str) -> Option<LifecycleAction> {
        match s {
            "start" => Some(LifecycleAction::Start),
            "stop" => Some(LifecycleAction::Stop),
            "restart" => Some(LifecycleAction::Restart),
            "kill" => Some(LifecycleAction::Kill),
            _ => None,
        }
    }

    pub fn command(&self) -> Command {
        match self {
            LifecycleAction::Start => Command::Start,
            LifecycleAction::Stop => Command::Stop,
            LifecycleAction::Restart => Command::Restart,
            LifecycleAction::Kill => Command::Kill,
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleAction::Start => "start",
            LifecycleAction::Stop => "stop",
            LifecycleAction::Restart => "restart",
            LifecycleAction::Kill => "kill",
        };
        f.write_str(s)
    }
}
