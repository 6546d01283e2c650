use clap::Parser;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// roomcast relay server
#[derive(Parser, Serialize, Deserialize, Clone, Debug)]
#[command(name = "roomcast", version, about = "Room-based WebSocket message relay")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "ROOMCAST_PORT", default_value = "4000")]
    pub port: u16,

    /// Bind address
    #[arg(long, env = "ROOMCAST_BIND_ADDRESS", default_value = "0.0.0.0")]
    pub bind_address: String,

    /// Path to TOML config file
    #[arg(long, default_value = "./roomcast.toml")]
    pub config: String,

    /// Enable structured JSON logging (for Docker/production)
    #[arg(long, env = "ROOMCAST_JSON_LOGS")]
    pub json_logs: bool,

    /// Output a commented TOML config template and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Reject createRoom for an id that already exists, instead of treating
    /// it as a join of the existing room
    #[arg(long, env = "ROOMCAST_STRICT_CREATE")]
    pub strict_create: bool,

    /// Only the client that created a room may delete it
    #[arg(long, env = "ROOMCAST_OWNER_GATED_DELETE")]
    pub owner_gated_delete: bool,

    /// Max history entries kept per room, oldest dropped first (0 = unbounded)
    #[arg(long, env = "ROOMCAST_HISTORY_LIMIT", default_value = "500")]
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4000,
            bind_address: "0.0.0.0".to_string(),
            config: "./roomcast.toml".to_string(),
            json_logs: false,
            generate_config: false,
            strict_create: false,
            owner_gated_delete: false,
            history_limit: 500,
        }
    }
}

impl Config {
    /// Load config with layered precedence:
    /// built-in defaults < TOML file < env vars (ROOMCAST_*) < CLI args
    pub fn load() -> Result<Self, figment::Error> {
        let cli = Config::parse();
        let config_path = cli.config.clone();

        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("ROOMCAST_"))
            .merge(Serialized::defaults(cli))
            .extract()
    }
}

/// Generate a commented TOML config template
pub fn generate_config_template() -> String {
    r#"# roomcast server configuration
# Place this file at ./roomcast.toml or specify with --config <path>
# All settings can be overridden via environment variables (ROOMCAST_PORT, etc.)
# or CLI flags (--port, etc.)

# Server port (default: 4000)
# port = 4000

# Bind address (default: 0.0.0.0 — all interfaces)
# bind_address = "0.0.0.0"

# Enable structured JSON logging for Docker/production
# json_logs = false

# ---- Room policy ----

# Reject createRoom for an id that already exists (default: false — creating
# an existing room joins it without touching its history or owner)
# strict_create = false

# Only the creator's client id may delete a room (default: false — anyone can)
# owner_gated_delete = false

# Max history entries kept per room, oldest dropped first; 0 = unbounded
# history_limit = 500
"#
    .to_string()
}
