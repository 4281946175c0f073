//! Clap derive structures for the `luup` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use luup_api::{OutputFormat, RequestOptions};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// luup -- talk to a MiOS/Vera controller's data_request endpoint
#[derive(Debug, Parser)]
#[command(
    name = "luup",
    version,
    about = "Query and control Vera home automation controllers from the command line",
    long_about = "A CLI for the Luup engine's data_request HTTP API on Vera controllers.\n\n\
        Every command issues a single GET and prints the controller's\n\
        response body as-is (XML or JSON, depending on --format).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Controller profile to use
    #[arg(long, short = 'p', env = "LUUP_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Controller endpoint URL (overrides profile)
    #[arg(long, short = 'c', env = "LUUP_CONTROLLER", global = true)]
    pub controller: Option<String>,

    /// Response format requested from the controller
    #[arg(long, short = 'f', env = "LUUP_FORMAT", global = true)]
    pub format: Option<FormatArg>,

    /// Request timeout in seconds
    #[arg(long, env = "LUUP_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Accept invalid TLS certificates (remote relays, self-signed proxies)
    #[arg(long, short = 'k', env = "LUUP_INSECURE", global = true)]
    pub insecure: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    Xml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Xml => Self::Xml,
            FormatArg::Json => Self::Json,
        }
    }
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Current state of all devices and scenes, or one device by UDN
    #[command(alias = "st")]
    Status {
        /// UPnP UDN of a single device
        #[arg(long)]
        udn: Option<String>,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Full system configuration
    UserData {
        /// Use the `user_data2` variant
        #[arg(long)]
        v2: bool,

        #[command(flatten)]
        poll: PollArgs,
    },

    /// Condensed summary data
    Sdata {
        #[command(flatten)]
        poll: PollArgs,
    },

    /// Fetch a file from the controller (e.g. D_BinaryLight1.xml)
    File {
        /// File name
        name: String,
    },

    /// Run Lua code inside the Luup engine
    Lua(LuaArgs),

    /// Check whether the Luup engine is up
    Alive,

    /// Restart the Luup engine
    Reload,

    /// Resynchronize with the remote access server
    Resync,

    /// List everything the engine can invoke
    Invoke {
        /// Restrict to the device with this UPnP UDN
        #[arg(long)]
        udn: Option<String>,
    },

    /// Look a device up by number or by alternate id
    FindDevice(FindDeviceArgs),

    /// Status of a running job
    JobStatus {
        /// Job number
        job: u32,

        /// Plugin that owns the job (e.g. zwave)
        #[arg(long)]
        plugin: Option<String>,
    },

    /// Recent IP requests seen by the controller
    IpRequests {
        /// Only requests from the last N seconds
        #[arg(long)]
        since: Option<u32>,
    },

    /// Live energy usage per device
    Energy,

    /// Have the controller fetch a URL
    Wget(WgetArgs),

    /// Install or update plugins
    Plugin(PluginArgs),

    /// Operate on one device
    #[command(alias = "dev", alias = "d")]
    Device(DeviceArgs),

    /// Manage and run scenes
    Scene(SceneArgs),

    /// Manage rooms
    Room(RoomArgs),

    /// Send an arbitrary data_request
    Raw(RawArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Polling knobs shared by status, user-data and sdata.
#[derive(Debug, Args)]
pub struct PollArgs {
    /// LoadTime from a previous response (incremental poll)
    #[arg(long)]
    pub load_time: Option<i64>,

    /// DataVersion from a previous response (incremental poll)
    #[arg(long)]
    pub data_version: Option<i64>,

    /// Seconds the controller may hold the request open
    #[arg(long)]
    pub wait: Option<u32>,

    /// Minimum delay in milliseconds before the controller answers
    #[arg(long)]
    pub minimum_delay: Option<u32>,
}

impl From<PollArgs> for RequestOptions {
    fn from(args: PollArgs) -> Self {
        RequestOptions {
            output_format: None,
            load_time: args.load_time,
            data_version: args.data_version,
            timeout: args.wait,
            minimum_delay: args.minimum_delay,
        }
    }
}

/// Extra `key=value` request parameters.
#[derive(Debug, Args)]
pub struct ExtraParams {
    /// Additional parameters as key=value
    #[arg(value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ── Engine ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LuaArgs {
    /// Lua code to run
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub code: Option<String>,

    /// Read the code from a file
    #[arg(long)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct FindDeviceArgs {
    /// Device number
    #[arg(long)]
    pub num: Option<u32>,

    /// Alternate (protocol-level) id
    #[arg(long)]
    pub alt_id: Option<String>,
}

#[derive(Debug, Args)]
pub struct WgetArgs {
    /// URL the controller should fetch
    pub url: String,

    /// Seconds the controller waits for the fetch
    #[arg(long, default_value_t = 30)]
    pub wait: u32,

    /// Basic auth user
    #[arg(long, requires = "password")]
    pub user: Option<String>,

    /// Basic auth password
    #[arg(long, requires = "user")]
    pub password: Option<String>,
}

#[derive(Debug, Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub command: PluginCommand,
}

#[derive(Debug, Subcommand)]
pub enum PluginCommand {
    /// Install a plugin from the app marketplace
    Install {
        /// Marketplace plugin number
        number: u32,
    },

    /// Update an installed plugin
    Update {
        /// Plugin id
        id: u32,
    },
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    /// Device number
    pub number: u32,

    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Device status
    Status,

    /// Actions exposed by the device's services
    Actions,

    /// Rename the device
    Rename {
        /// New name
        name: String,

        /// Move to this room
        #[arg(long)]
        room: Option<String>,
    },

    /// Delete the device
    Delete,

    /// List what can be invoked on the device
    Invoke,

    /// Send an `id=device` action
    Action {
        /// Action name
        action: String,

        #[command(flatten)]
        extra: ExtraParams,
    },

    /// Operate on one of the device's UPnP services
    #[command(alias = "svc")]
    Service(ServiceArgs),
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    /// Service id, e.g. urn:upnp-org:serviceId:SwitchPower1
    pub service_id: String,

    #[command(subcommand)]
    pub command: ServiceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ServiceCommand {
    /// Invoke a service action (e.g. SetTarget newTargetValue=1)
    Action {
        /// Action name
        action: String,

        #[command(flatten)]
        extra: ExtraParams,
    },

    /// Read a state variable
    Get {
        /// Variable name
        variable: String,
    },

    /// Write a state variable
    Set {
        /// Variable name
        variable: String,

        /// New value
        value: String,
    },
}

// ── Scene ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SceneArgs {
    #[command(subcommand)]
    pub command: SceneCommand,
}

#[derive(Debug, Subcommand)]
pub enum SceneCommand {
    /// Show a scene's definition
    #[command(alias = "ls")]
    List {
        /// Scene number
        scene: u32,
    },

    /// Create a scene from its JSON definition
    Create {
        /// JSON definition, or @path to read it from a file
        json: String,
    },

    /// Rename a scene
    Rename {
        /// Scene number
        scene: u32,

        /// New name
        name: String,

        /// Move to this room
        #[arg(long)]
        room: Option<String>,
    },

    /// Delete a scene
    Delete {
        /// Scene number
        scene: u32,
    },

    /// Run a scene
    Run {
        /// Scene number
        scene: u32,
    },

    /// Send an `id=scene` action
    Action {
        /// Action name
        action: String,

        #[command(flatten)]
        extra: ExtraParams,
    },

    /// Record device changes into a new scene
    Record(RecordArgs),
}

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Start recording
    Start,

    /// Insert a delay into the recording
    Pause {
        /// Delay in seconds
        seconds: u32,
    },

    /// Stop recording
    Stop,

    /// Show the recorded steps
    #[command(alias = "ls")]
    List,

    /// Drop one recorded step
    Delete {
        /// Step number
        number: u32,
    },

    /// Save the recording as a scene
    Save {
        /// Scene name
        name: String,

        /// Room for the new scene
        #[arg(long)]
        room: Option<String>,
    },
}

// ── Room ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RoomArgs {
    #[command(subcommand)]
    pub command: RoomCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoomCommand {
    /// Create a room
    Create {
        /// Room name
        name: String,
    },

    /// Rename a room
    Rename {
        /// Room number
        room: u32,

        /// New name
        name: String,
    },

    /// Delete a room
    Delete {
        /// Room number
        room: u32,
    },

    /// Send an `id=room` action
    Action {
        /// Action name
        action: String,

        #[command(flatten)]
        extra: ExtraParams,
    },
}

// ── Raw ──────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RawArgs {
    /// Request id (e.g. lu_status, variableget)
    pub id: String,

    /// Action name
    #[arg(long, short = 'a')]
    pub action: Option<String>,

    #[command(flatten)]
    pub extra: ExtraParams,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a profile to the config file
    Init {
        /// Controller endpoint URL
        #[arg(long = "url")]
        url: String,

        /// Profile name
        #[arg(long = "name", default_value = "default")]
        name: String,

        /// Make this the default profile
        #[arg(long)]
        set_default: bool,

        /// Replace an existing profile of the same name
        #[arg(long)]
        force: bool,
    },

    /// Display the loaded configuration
    Show,

    /// List configured profiles
    Profiles,

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
