// Luup connector
//
// Entry point of the crate. Owns the shared dispatcher, exposes the
// controller-wide data_request operations, and hands out the device, scene
// and room facades.

use std::sync::Arc;

use tracing::debug;
use url::Url;

use crate::device::Device;
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::params::{ParamName, Params};
use crate::request::{LuupAction, RequestId};
use crate::room::Rooms;
use crate::scene::Scenes;
use crate::service_ids;
use crate::transport::TransportConfig;

/// Client for one controller's `data_request` endpoint.
///
/// Query parameters present on the base URI become defaults sent with every
/// request (e.g. `?output_format=json`). Each method issues exactly one GET
/// and returns the body as text; interpreting it is the caller's job.
///
/// The connector is `Send + Sync`; share it behind an `Arc` to issue
/// concurrent calls.
#[derive(Debug)]
pub struct Connector {
    dispatcher: Arc<Dispatcher>,
    scene: Scenes,
    room: Rooms,
}

impl Connector {
    /// Create a connector for `base_uri`, e.g.
    /// `http://192.168.1.10:3480/data_request?output_format=json`.
    pub fn new(base_uri: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Self::from_url(Url::parse(base_uri)?, transport)
    }

    pub fn from_url(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a connector with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(http, base_url));
        debug!(
            endpoint = %dispatcher.base_url(),
            defaults = dispatcher.defaults().len(),
            "luup connector created"
        );
        Self {
            scene: Scenes::new(Arc::clone(&dispatcher)),
            room: Rooms::new(Arc::clone(&dispatcher)),
            dispatcher,
        }
    }

    /// The endpoint, with its query string stripped.
    pub fn base_url(&self) -> &Url {
        self.dispatcher.base_url()
    }

    /// Parameters sent with every request unless a call overrides them.
    pub fn default_params(&self) -> &Params {
        self.dispatcher.defaults()
    }

    // ── Facades ─────────────────────────────────────────────────────

    pub fn device(&self, number: u32) -> Device {
        Device::new(Arc::clone(&self.dispatcher), number)
    }

    /// Scene operations. Always the same instance.
    pub fn scene(&self) -> &Scenes {
        &self.scene
    }

    /// Room operations. Always the same instance.
    pub fn room(&self) -> &Rooms {
        &self.room
    }

    // ── Raw requests ────────────────────────────────────────────────

    /// Send `params` as-is (after key translation). They must include `id`.
    pub async fn request(&self, params: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher.request(params.into()).await
    }

    /// `id={id}` plus `params`. The caller cannot override `id`.
    pub async fn request_by_id(&self, id: &str, params: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher.request_by_id(id, params.into()).await
    }

    /// `id={id}&action={action}` plus `params`.
    pub async fn request_by_id_and_action(
        &self,
        id: &str,
        action: &str,
        params: impl Into<Params>,
    ) -> Result<String, Error> {
        self.dispatcher
            .request_by_id_and_action(id, action, params.into())
            .await
    }

    // ── Data queries ────────────────────────────────────────────────

    /// Full system configuration.
    ///
    /// `id=user_data`
    pub async fn user_data(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.request_by_id(RequestId::UserData.as_str(), opts).await
    }

    /// `id=user_data2`
    pub async fn user_data2(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.request_by_id(RequestId::UserData2.as_str(), opts).await
    }

    /// Current state of all devices and scenes.
    ///
    /// `id=status`
    pub async fn status(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.request_by_id(RequestId::Status.as_str(), opts).await
    }

    /// Condensed summary data, meant for polling.
    ///
    /// `id=sdata`
    pub async fn sdata(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.request_by_id(RequestId::SData.as_str(), opts).await
    }

    /// Status of the device with the given UPnP UDN.
    ///
    /// `id=status&UDN={udn}`
    pub async fn status_with_udn(&self, udn: &str, opts: impl Into<Params>) -> Result<String, Error> {
        let params = with_required(opts.into(), ParamName::Udn.as_str(), udn)?;
        self.request_by_id(RequestId::Status.as_str(), params).await
    }

    /// Fetch a file from the controller, e.g. `D_BinaryLight1.xml`.
    ///
    /// `id=file&parameters={filename}`
    pub async fn file(&self, filename: &str) -> Result<String, Error> {
        let params = with_required(Params::new(), "parameters", filename)?;
        self.request_by_id(RequestId::File.as_str(), params).await
    }

    // ── Controller actions ──────────────────────────────────────────

    /// Run a Lua snippet inside the Luup engine.
    ///
    /// `id=action&serviceId={gateway}&action=RunLua&Code={code}`
    pub async fn run_lua(&self, code: &str) -> Result<String, Error> {
        let params = with_required(Params::new(), ParamName::Code.as_str(), code)?
            .with(ParamName::ServiceId, service_ids::HOME_AUTOMATION_GATEWAY);
        self.request_by_id_and_action(
            RequestId::Action.as_str(),
            LuupAction::RunLua.as_str(),
            params,
        )
        .await
    }

    /// Install a plugin from the app marketplace.
    ///
    /// `id=action&serviceId={gateway}&action=CreatePlugin&PluginNum={n}`
    pub async fn install_plugin(&self, plugin_num: u32) -> Result<String, Error> {
        let params = Params::new()
            .with(ParamName::ServiceId, service_ids::HOME_AUTOMATION_GATEWAY)
            .with("PluginNum", plugin_num);
        self.request_by_id_and_action(
            RequestId::Action.as_str(),
            LuupAction::CreatePlugin.as_str(),
            params,
        )
        .await
    }

    /// `id=update_plugin&Plugin={id}`
    pub async fn update_plugin(&self, plugin_id: u32) -> Result<String, Error> {
        let params = Params::new().with("Plugin", plugin_id);
        self.request_by_id(RequestId::UpdatePlugin.as_str(), params).await
    }

    /// Restart the Luup engine.
    ///
    /// `id=reload`
    pub async fn reload(&self) -> Result<String, Error> {
        self.request_by_id(RequestId::Reload.as_str(), Params::new()).await
    }

    /// `true` when the engine answers `OK` to `id=alive`.
    pub async fn alive(&self) -> Result<bool, Error> {
        let body = self.request_by_id(RequestId::Alive.as_str(), Params::new()).await?;
        Ok(body.trim() == "OK")
    }

    /// `true` when the engine answers `OK` to `id=resync`.
    pub async fn resync(&self) -> Result<bool, Error> {
        let body = self.request_by_id(RequestId::Resync.as_str(), Params::new()).await?;
        Ok(body.trim() == "OK")
    }

    // ── Lookup & diagnostics ────────────────────────────────────────

    /// `id=finddevice&devnum={n}`
    pub async fn find_device(&self, device_num: u32) -> Result<String, Error> {
        let params = Params::new().with("devnum", device_num);
        self.request_by_id(RequestId::FindDevice.as_str(), params).await
    }

    /// Look a device up by its alternate (protocol-level) id.
    ///
    /// `id=finddevice&devid={alt_id}`
    pub async fn find_device_by_alt_id(&self, alt_id: &str) -> Result<String, Error> {
        let params = with_required(Params::new(), "devid", alt_id)?;
        self.request_by_id(RequestId::FindDevice.as_str(), params).await
    }

    /// HTML index of everything the engine can invoke.
    ///
    /// `id=invoke`
    pub async fn invoke(&self) -> Result<String, Error> {
        self.request_by_id(RequestId::Invoke.as_str(), Params::new()).await
    }

    /// `id=invoke&UDN={udn}`
    pub async fn invoke_udn(&self, udn: &str) -> Result<String, Error> {
        let params = with_required(Params::new(), ParamName::Udn.as_str(), udn)?;
        self.request_by_id(RequestId::Invoke.as_str(), params).await
    }

    /// `id=jobstatus&job={job}[&plugin={plugin}]`
    pub async fn job_status(&self, job: u32, plugin: Option<&str>) -> Result<String, Error> {
        let params = Params::new().with("job", job).with_opt("plugin", plugin);
        self.request_by_id(RequestId::JobStatus.as_str(), params).await
    }

    /// Recent IP requests seen by the controller, optionally limited to the
    /// last `timeout` seconds.
    ///
    /// `id=iprequests[&timeout={s}]`
    pub async fn ip_requests(&self, timeout: Option<u32>) -> Result<String, Error> {
        let params = Params::new().with_opt(ParamName::Timeout, timeout);
        self.request_by_id(RequestId::IpRequests.as_str(), params).await
    }

    /// Have the controller fetch `url` itself, optionally with basic auth
    /// credentials.
    ///
    /// `id=wget&url={url}[&username={user}&password={pass}]&timeout={s}`
    pub async fn wget(
        &self,
        url: &str,
        timeout: u32,
        credentials: Option<(&str, &str)>,
    ) -> Result<String, Error> {
        let params = with_required(Params::new(), "url", url)?
            .with_opt("username", credentials.map(|(user, _)| user))
            .with_opt("password", credentials.map(|(_, pass)| pass))
            .with(ParamName::Timeout, timeout);
        self.request_by_id(RequestId::WGet.as_str(), params).await
    }

    /// `id=live_energy_usage`
    pub async fn live_energy_usage(&self) -> Result<String, Error> {
        self.request_by_id(RequestId::LiveEnergyUsage.as_str(), Params::new())
            .await
    }
}

/// Insert a caller-supplied string that must not be blank.
fn with_required(params: Params, key: &'static str, value: &str) -> Result<Params, Error> {
    if value.trim().is_empty() {
        return Err(Error::MissingArgument { name: key });
    }
    Ok(params.translated().with(key, value))
}
