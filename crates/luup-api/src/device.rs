// Device facades
//
// `Device` binds a device number, `DeviceService` additionally binds a UPnP
// service id. Bound identifiers lead the query and always win over the
// caller's parameters.

use std::sync::Arc;

use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::params::{ParamName, ParamValue, Params, require_name};
use crate::request::{LuupAction, OutputFormat, RequestId};

/// One device on the controller, addressed by its device number.
#[derive(Debug, Clone)]
pub struct Device {
    dispatcher: Arc<Dispatcher>,
    number: u32,
}

impl Device {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>, number: u32) -> Self {
        Self { dispatcher, number }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Bind a service on this device, e.g. [`crate::service_ids::SWITCH_POWER`].
    pub fn service(&self, service_id: impl Into<String>) -> DeviceService {
        DeviceService {
            dispatcher: Arc::clone(&self.dispatcher),
            device: self.number,
            service_id: service_id.into(),
        }
    }

    fn bind(&self, params: impl Into<Params>) -> Params {
        params
            .into()
            .bound_to(&Params::new().with(ParamName::DeviceNum, self.number))
    }

    /// `id=status&DeviceNum={n}`
    pub async fn status(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher
            .request_by_id(RequestId::Status.as_str(), self.bind(opts))
            .await
    }

    /// Actions the device's services expose.
    ///
    /// `id=actions&DeviceNum={n}`
    pub async fn actions(&self, opts: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher
            .request_by_id(RequestId::Actions.as_str(), self.bind(opts))
            .await
    }

    /// `id=device&action={action}&DeviceNum={n}`
    pub async fn action(&self, action: &str, params: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher
            .request_by_id_and_action(RequestId::Device.as_str(), action, self.bind(params))
            .await
    }

    /// Rename the device, optionally moving it to `new_room`.
    ///
    /// `id=device&action=rename&DeviceNum={n}&name={name}[&room={room}]`
    pub async fn rename(
        &self,
        new_name: &str,
        new_room: Option<ParamValue>,
    ) -> Result<String, Error> {
        require_name("newName", new_name)?;
        debug!(device = self.number, new_name, "renaming device");

        let params = Params::new()
            .with(ParamName::Name, new_name)
            .with_opt(ParamName::Room, new_room);
        self.action(LuupAction::Rename.as_str(), params).await
    }

    /// `id=device&action=delete&DeviceNum={n}`
    pub async fn delete(&self) -> Result<String, Error> {
        debug!(device = self.number, "deleting device");
        self.action(LuupAction::Delete.as_str(), Params::new()).await
    }

    /// `id=invoke&DeviceNum={n}`
    pub async fn invoke(&self) -> Result<String, Error> {
        self.dispatcher
            .request_by_id(RequestId::Invoke.as_str(), self.bind(Params::new()))
            .await
    }
}

/// A UPnP service on one device.
#[derive(Debug, Clone)]
pub struct DeviceService {
    dispatcher: Arc<Dispatcher>,
    device: u32,
    service_id: String,
}

impl DeviceService {
    pub fn device_number(&self) -> u32 {
        self.device
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    fn bind(&self, params: Params) -> Result<Params, Error> {
        if self.service_id.trim().is_empty() {
            return Err(Error::MissingArgument {
                name: ParamName::ServiceId.as_str(),
            });
        }
        let ids = Params::new()
            .with(ParamName::DeviceNum, self.device)
            .with(ParamName::ServiceId, self.service_id.as_str());
        Ok(params.bound_to(&ids))
    }

    /// Invoke a service action, e.g. `SetTarget` with `newTargetValue=1`.
    ///
    /// Requests XML output unless `params` asks for something else.
    ///
    /// `id=action&output_format=xml&DeviceNum={n}&serviceId={sid}&action={action}`
    pub async fn action(&self, action: &str, params: impl Into<Params>) -> Result<String, Error> {
        let params = Params::new()
            .with(ParamName::OutputFormat, OutputFormat::Xml)
            .merged(&params.into().translated());
        self.dispatcher
            .request_by_id_and_action(RequestId::Action.as_str(), action, self.bind(params)?)
            .await
    }

    /// `id=variableget&DeviceNum={n}&serviceId={sid}&Variable={name}`
    pub async fn get_variable(&self, name: &str) -> Result<String, Error> {
        let params = self.variable(name)?;
        self.dispatcher
            .request_by_id(RequestId::VariableGet.as_str(), params)
            .await
    }

    /// `id=variableset&DeviceNum={n}&serviceId={sid}&Variable={name}&Value={value}`
    pub async fn set_variable(
        &self,
        name: &str,
        value: impl Into<ParamValue>,
    ) -> Result<String, Error> {
        let params = self.variable(name)?.with(ParamName::Value, value);
        self.dispatcher
            .request_by_id(RequestId::VariableSet.as_str(), params)
            .await
    }

    fn variable(&self, name: &str) -> Result<Params, Error> {
        if name.trim().is_empty() {
            return Err(Error::MissingArgument {
                name: ParamName::Variable.as_str(),
            });
        }
        self.bind(Params::new().with(ParamName::Variable, name))
    }
}
