// Luup request vocabulary
//
// Values for the `id` and `action` query keys, the output formats, and the
// typed polling options accepted by the data queries (user_data, status, ...).

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::params::{ParamName, ParamValue, Params};

/// Request targets: the value of the `id` query key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum RequestId {
    UserData,
    #[strum(serialize = "user_data2")]
    UserData2,
    Status,
    #[strum(serialize = "sdata")]
    SData,
    Actions,
    Action,
    Device,
    Scene,
    Room,
    File,
    #[strum(serialize = "variableget")]
    VariableGet,
    #[strum(serialize = "variableset")]
    VariableSet,
    #[strum(serialize = "finddevice")]
    FindDevice,
    Reload,
    Alive,
    Resync,
    Invoke,
    #[strum(serialize = "jobstatus")]
    JobStatus,
    #[strum(serialize = "iprequests")]
    IpRequests,
    LiveEnergyUsage,
    UpdatePlugin,
    #[strum(serialize = "wget")]
    WGet,
}

/// Sub-operations: the value of the `action` query key.
///
/// Device-service actions (`SetTarget`, ...) are open-ended and passed as
/// plain strings instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, IntoStaticStr, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum LuupAction {
    Create,
    Rename,
    Delete,
    List,
    Record,
    Pause,
    StopRecord,
    ListRecord,
    DeleteRecord,
    SaveRecord,
    #[strum(serialize = "RunScene")]
    RunScene,
    #[strum(serialize = "RunLua")]
    RunLua,
    #[strum(serialize = "CreatePlugin")]
    CreatePlugin,
}

impl RequestId {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl LuupAction {
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// Body format requested with `output_format`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    IntoStaticStr,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Xml,
    Json,
}

impl From<OutputFormat> for ParamValue {
    fn from(format: OutputFormat) -> Self {
        let s: &'static str = format.into();
        Self::Text(s.to_owned())
    }
}

/// Optional knobs for `user_data`, `status`, `sdata` and friends.
///
/// `load_time` / `data_version` come from a previous response and turn the
/// call into an incremental poll; `timeout` and `minimum_delay` control how
/// long the controller holds the request open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    pub output_format: Option<OutputFormat>,
    pub load_time: Option<i64>,
    pub data_version: Option<i64>,
    pub timeout: Option<u32>,
    pub minimum_delay: Option<u32>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }

    pub fn load_time(mut self, load_time: i64) -> Self {
        self.load_time = Some(load_time);
        self
    }

    pub fn data_version(mut self, data_version: i64) -> Self {
        self.data_version = Some(data_version);
        self
    }

    pub fn timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }

    pub fn minimum_delay(mut self, millis: u32) -> Self {
        self.minimum_delay = Some(millis);
        self
    }
}

impl From<RequestOptions> for Params {
    fn from(opts: RequestOptions) -> Self {
        Params::new()
            .with_opt(ParamName::OutputFormat, opts.output_format)
            .with_opt(ParamName::LoadTime, opts.load_time)
            .with_opt(ParamName::DataVersion, opts.data_version)
            .with_opt(ParamName::Timeout, opts.timeout)
            .with_opt(ParamName::MinimumDelay, opts.minimum_delay)
    }
}
