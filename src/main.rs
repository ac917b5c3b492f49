use std::net::SocketAddr;
use std::process;
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use kiwidash::api::{Command as ApiCommand, KiwiClient};
use kiwidash::config::{self, DEFAULT_HOST, DEFAULT_PORT};
use kiwidash::models::AppState;
use kiwidash::routes::build_router;
use kiwidash::services::{
    load_lookback, CredentialStore, JsonFileStorage, Monitor, MonitorConfig,
};

async fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);

    let http = reqwest::Client::builder()
        .user_agent(format!("KiwiVM-Dashboard/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to create HTTP client");
    let client = KiwiClient::new(http, config::get_upstream_base_url());

    let storage = Arc::new(JsonFileStorage::new(config::get_credentials_file()));
    let store = CredentialStore::open(storage);

    let monitor_config = MonitorConfig {
        refresh_interval: std::time::Duration::from_secs(config::get_refresh_interval_secs()),
        ..Default::default()
    };
    let monitor = Monitor::new(client, store, monitor_config);

    let prefs_path = config::get_prefs_file();
    AppState {
        monitor,
        lookback: Arc::new(Mutex::new(load_lookback(&prefs_path))),
        prefs_path,
        flash_store: Arc::new(Mutex::new(Vec::new())),
        custom_css: None,
    }
}

async fn start_server(mut state: AppState, host: &str, port: u16, stylesheet: Option<String>) {
    if let Some(path) = stylesheet {
        match std::fs::read_to_string(&path) {
            Ok(css) => {
                state.custom_css = Some(css);
                tracing::info!("Loaded custom stylesheet from {}", path);
            }
            Err(e) => {
                tracing::error!(%e, "Failed to read custom stylesheet");
                eprintln!("{} {}: {}", yansi::Paint::red("Failed to read custom stylesheet at"), path, e);
                process::exit(1);
            }
        }
    }

    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::red("Invalid host/port format"), e);
            process::exit(1);
        }
    };

    state.monitor.start().await;

    let app = build_router(state);
    tracing::info!(%addr, "Starting KiwiVM dashboard server");
    println!("{} {}", yansi::Paint::new("Dashboard running on").green(), yansi::Paint::new(format!("http://{}", addr)).cyan());
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!("{}: {}\n{}", yansi::Paint::new(format!("Failed to bind to {}", addr)).red(), e, yansi::Paint::new("Please stop any process using this port, or start the server with a different --port value.").yellow());
            process::exit(1);
        }
    }
}

fn json_value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "".to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
            serde_json::to_string(v).unwrap_or_default()
        }
    }
}

fn print_table(value: &serde_json::Value) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w - 4);
    }

    match value {
        serde_json::Value::Array(arr) => {
            if arr.is_empty() {
                println!("(empty list)");
                return;
            }
            if let Some(first) = arr.iter().find_map(|v| v.as_object()) {
                let headers: Vec<&String> = first.keys().collect();
                table.set_header(&headers);
                for item in arr {
                    if let Some(obj) = item.as_object() {
                        let row: Vec<String> = headers
                            .iter()
                            .map(|k| obj.get(*k).map(json_value_to_string).unwrap_or_default())
                            .collect();
                        table.add_row(row);
                    }
                }
            } else {
                table.set_header(vec!["Value"]);
                for item in arr {
                    table.add_row(vec![json_value_to_string(item)]);
                }
            }
        }
        serde_json::Value::Object(obj) => {
            table.set_header(vec!["Field", "Value"]);
            for (k, v) in obj {
                table.add_row(vec![k, &json_value_to_string(v)]);
            }
        }
        _ => {
            println!("{}", json_value_to_string(value));
            return;
        }
    }

    println!("\n{table}\n");
}

fn mask_key(key: &str) -> String {
    if key.len() <= 8 {
        return "********".to_string();
    }
    format!("{}…{}", &key[..4], &key[key.len() - 4..])
}

/// Find a stored credential by its id or by its VEID.
fn resolve_account(store: &CredentialStore, id_or_veid: &str) -> Option<kiwidash::models::Credential> {
    store
        .get(id_or_veid)
        .or_else(|| store.list().into_iter().find(|c| c.veid == id_or_veid))
}

#[derive(Parser)]
#[command(
    name = "kiwidash",
    author,
    version,
    about = "KiwiVM multi-account dashboard",
    long_about = r#"kiwidash — monitor and control your KiwiVM (BandwagonHost) servers from one place.

Runs a small web dashboard over stored account credentials and exposes the
same accounts on the command line. Credentials are kept in a local JSON file
and sent only to the KiwiVM API, never to third-party origins.

Examples:
  1) Run the dashboard:
      kiwidash serve --host 127.0.0.1 --port 8080
  2) Manage accounts:
      kiwidash accounts list
      kiwidash accounts add 123456 your-api-key
  3) Inspect a server:
      kiwidash status 123456
"#,
    after_help = "Use `kiwidash <subcommand> --help` to get subcommand specific options and usage examples."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web dashboard
    Serve {
        /// Host to bind to
        #[arg(long, default_value_t = String::from(DEFAULT_HOST))]
        host: String,
        /// Port to bind to
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Path to .env file
        #[arg(long)]
        env_file: Option<String>,
        /// Path to a custom stylesheet to serve instead of the default
        #[arg(long)]
        stylesheet: Option<String>,
    },
    /// Validate configuration and stored credentials against the API
    #[command(about = "Validate configuration and ensure API connectivity.", long_about = "Check the configured API base URL and try a live-status call for every stored account, reporting which credentials work.")]
    CheckConfig { env_file: Option<String> },
    /// Manage stored accounts (credentials.json)
    Accounts {
        #[command(subcommand)]
        sub: AccountCommands,
    },
    /// Show the live status of one account
    #[command(about = "Show live service info", long_about = "Print the raw getLiveServiceInfo payload for an account, referenced by credential id or VEID.")]
    Status { account: String },
    /// Show recent usage samples for one account
    #[command(about = "Show recent usage stats", long_about = "Print the most recent getRawUsageStats samples (CPU, network, disk I/O) for an account, referenced by credential id or VEID.")]
    Usage {
        account: String,
        /// Number of most recent samples to show
        #[arg(long, default_value = "12")]
        samples: usize,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    #[command(about = "List stored accounts", long_about = "Enumerate accounts stored in credentials.json (id, VEID, masked API key).")]
    List,
    #[command(about = "Add an account", long_about = "Store a VEID / API key pair. The VEID must not already be present.")]
    Add { veid: String, api_key: String },
    #[command(about = "Remove an account", long_about = "Remove a stored account by credential id or VEID.")]
    Remove { account: String },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    // Dispatch CLI commands. If no command provided, serve the dashboard by default
    if cli.command.is_none() {
        let state = build_state_from_env(None).await;
        start_server(state, DEFAULT_HOST, DEFAULT_PORT, None).await;
        return;
    }
    match cli.command.unwrap() {
        Commands::Serve {
            host,
            port,
            env_file,
            stylesheet,
        } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            start_server(state, &host, port, stylesheet).await;
        }
        Commands::CheckConfig { env_file } => {
            let state = build_state_from_env(env_file.as_deref()).await;
            let base = state.monitor.client().base_url().to_string();
            println!("API base URL: {}", yansi::Paint::new(&base).cyan());
            let creds = state.monitor.store().list();
            if creds.is_empty() {
                eprintln!("{}", yansi::Paint::new("No accounts stored; add one with `kiwidash accounts add`").yellow());
                process::exit(1);
            }
            let mut ok = true;
            for cred in creds {
                match state
                    .monitor
                    .client()
                    .call(&cred.veid, &cred.api_key, &ApiCommand::GetLiveServiceInfo)
                    .await
                {
                    Ok(_) => println!("{} {}", yansi::Paint::new("OK ").green(), cred.veid),
                    Err(e) => {
                        eprintln!("{} {}: {}", yansi::Paint::new("ERR").red(), cred.veid, e);
                        ok = false;
                    }
                }
            }
            process::exit(if ok { 0 } else { 1 });
        }
        Commands::Accounts { sub } => {
            let state = build_state_from_env(None).await;
            let store = state.monitor.store();
            match sub {
                AccountCommands::List => {
                    let rows: Vec<serde_json::Value> = store
                        .list()
                        .iter()
                        .map(|c| {
                            serde_json::json!({
                                "id": c.id,
                                "veid": c.veid,
                                "api_key": mask_key(&c.api_key),
                            })
                        })
                        .collect();
                    print_table(&serde_json::Value::Array(rows));
                }
                AccountCommands::Add { veid, api_key } => {
                    match store.add(&veid, &api_key) {
                        Ok(cred) => println!("{} {} ({})", yansi::Paint::new("Account added:").green(), cred.veid, cred.id),
                        Err(e) => {
                            eprintln!("{} {}", yansi::Paint::new("Failed to add account:").red(), e);
                            process::exit(1);
                        }
                    }
                }
                AccountCommands::Remove { account } => {
                    let Some(cred) = resolve_account(store, &account) else {
                        eprintln!("{} '{}'", yansi::Paint::new("No such account").red(), account);
                        process::exit(1);
                    };
                    store.remove(&cred.id);
                    println!("{} {}", yansi::Paint::new("Account removed:").green(), cred.veid);
                }
            }
        }
        Commands::Status { account } => {
            let state = build_state_from_env(None).await;
            let Some(cred) = resolve_account(state.monitor.store(), &account) else {
                eprintln!("{} '{}'", yansi::Paint::new("No such account").red(), account);
                process::exit(1);
            };
            match state
                .monitor
                .client()
                .call(&cred.veid, &cred.api_key, &ApiCommand::GetLiveServiceInfo)
                .await
            {
                Ok(payload) => print_table(&payload),
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Status request failed").red(), e);
                    process::exit(1);
                }
            }
        }
        Commands::Usage { account, samples } => {
            let state = build_state_from_env(None).await;
            let Some(cred) = resolve_account(state.monitor.store(), &account) else {
                eprintln!("{} '{}'", yansi::Paint::new("No such account").red(), account);
                process::exit(1);
            };
            match state
                .monitor
                .client()
                .call(&cred.veid, &cred.api_key, &ApiCommand::GetRawUsageStats)
                .await
            {
                Ok(payload) => {
                    let series: kiwidash::models::UsageSeries =
                        serde_json::from_value(payload).unwrap_or_default();
                    let rows: Vec<serde_json::Value> = series
                        .data
                        .iter()
                        .rev()
                        .take(samples)
                        .rev()
                        .map(|s| {
                            serde_json::json!({
                                "time": kiwidash::utils::format_timestamp(s.timestamp),
                                "cpu": format!("{:.1}%", s.cpu_usage),
                                "net in": kiwidash::utils::format_bytes(s.network_in_bytes),
                                "net out": kiwidash::utils::format_bytes(s.network_out_bytes),
                                "disk read": kiwidash::utils::format_bytes(s.disk_read_bytes),
                                "disk write": kiwidash::utils::format_bytes(s.disk_write_bytes),
                            })
                        })
                        .collect();
                    print_table(&serde_json::Value::Array(rows));
                }
                Err(e) => {
                    eprintln!("{}: {}", yansi::Paint::new("Usage request failed").red(), e);
                    process::exit(1);
                }
            }
        }
    }
}
