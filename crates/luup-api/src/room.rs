// Room facade

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::params::{ParamName, Params, require_name};
use crate::request::{LuupAction, RequestId};

/// Room operations. Obtained from [`crate::Connector::room`].
#[derive(Debug)]
pub struct Rooms {
    dispatcher: Arc<Dispatcher>,
}

impl Rooms {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }

    /// `id=room&action={action}`
    pub async fn action(&self, action: &str, params: impl Into<Params>) -> Result<String, Error> {
        self.dispatcher
            .request_by_id_and_action(RequestId::Room.as_str(), action, params.into())
            .await
    }

    /// `id=room&action=create&name={name}`
    pub async fn create(&self, name: &str) -> Result<String, Error> {
        require_name("name", name)?;
        let params = Params::new().with(ParamName::Name, name);
        self.action(LuupAction::Create.as_str(), params).await
    }

    /// `id=room&action=rename&room={room}&name={name}`
    pub async fn rename(&self, room: u32, name: &str) -> Result<String, Error> {
        require_name("name", name)?;
        let params = Params::new()
            .with(ParamName::Room, room)
            .with(ParamName::Name, name);
        self.action(LuupAction::Rename.as_str(), params).await
    }

    /// `id=room&action=delete&room={room}`
    pub async fn delete(&self, room: u32) -> Result<String, Error> {
        let params = Params::new().with(ParamName::Room, room);
        self.action(LuupAction::Delete.as_str(), params).await
    }
}
