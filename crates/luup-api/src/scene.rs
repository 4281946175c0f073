// Scene facades
//
// Scene management lives under `id=scene`; running a scene goes through the
// gateway service instead. Scene recording is a separate sub-facade that is
// built together with `Scenes` and handed out by reference.

use std::sync::Arc;

use tracing::debug;

use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::params::{ParamName, ParamValue, Params, require_name};
use crate::request::{LuupAction, RequestId};
use crate::service_ids;

/// Scene operations. Obtained from [`crate::Connector::scene`].
#[derive(Debug)]
pub struct Scenes {
    dispatcher: Arc<Dispatcher>,
    record: SceneRecorder,
}

impl Scenes {
    pub(crate) fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            record: SceneRecorder {
                dispatcher: Arc::clone(&dispatcher),
            },
            dispatcher,
        }
    }

    /// Scene recording. Always the same instance for this `Scenes`.
    pub fn record(&self) -> &SceneRecorder {
        &self.record
    }

    /// `id=scene&action={action}`
    pub async fn action(&self, action: &str, params: impl Into<Params>) -> Result<String, Error> {
        scene_action(&self.dispatcher, action, params.into()).await
    }

    /// Create a scene from its JSON definition.
    ///
    /// `id=scene&action=create&json={json}`
    pub async fn create(&self, json: &str) -> Result<String, Error> {
        if json.trim().is_empty() {
            return Err(Error::MissingArgument { name: "json" });
        }
        self.action(LuupAction::Create.as_str(), Params::new().with("json", json))
            .await
    }

    /// `id=scene&action=list&scene={scene}`
    pub async fn list(&self, scene: u32) -> Result<String, Error> {
        let params = Params::new().with(ParamName::Scene, scene);
        self.action(LuupAction::List.as_str(), params).await
    }

    /// `id=scene&action=rename&scene={scene}&name={name}[&room={room}]`
    pub async fn rename(
        &self,
        scene: u32,
        name: &str,
        room: Option<ParamValue>,
    ) -> Result<String, Error> {
        require_name("name", name)?;
        let params = Params::new()
            .with(ParamName::Scene, scene)
            .with(ParamName::Name, name)
            .with_opt(ParamName::Room, room);
        self.action(LuupAction::Rename.as_str(), params).await
    }

    /// `id=scene&action=delete&scene={scene}`
    pub async fn delete(&self, scene: u32) -> Result<String, Error> {
        debug!(scene, "deleting scene");
        let params = Params::new().with(ParamName::Scene, scene);
        self.action(LuupAction::Delete.as_str(), params).await
    }

    /// Run a scene.
    ///
    /// `id=action&serviceId={gateway}&action=RunScene&SceneNum={scene}`
    pub async fn run(&self, scene: u32) -> Result<String, Error> {
        let params = Params::new()
            .with(ParamName::SceneNum, scene)
            .with(ParamName::ServiceId, service_ids::HOME_AUTOMATION_GATEWAY);
        self.dispatcher
            .request_by_id_and_action(
                RequestId::Action.as_str(),
                LuupAction::RunScene.as_str(),
                params,
            )
            .await
    }
}

/// Scene recording: capture device changes and save them as a new scene.
#[derive(Debug)]
pub struct SceneRecorder {
    dispatcher: Arc<Dispatcher>,
}

impl SceneRecorder {
    async fn action(&self, action: LuupAction, params: Params) -> Result<String, Error> {
        scene_action(&self.dispatcher, action.as_str(), params).await
    }

    /// `id=scene&action=record`
    pub async fn start(&self) -> Result<String, Error> {
        self.action(LuupAction::Record, Params::new()).await
    }

    /// Insert a delay into the recording.
    ///
    /// `id=scene&action=pause&seconds={seconds}`
    pub async fn pause(&self, seconds: u32) -> Result<String, Error> {
        self.action(LuupAction::Pause, Params::new().with("seconds", seconds))
            .await
    }

    /// `id=scene&action=stoprecord`
    pub async fn stop(&self) -> Result<String, Error> {
        self.action(LuupAction::StopRecord, Params::new()).await
    }

    /// `id=scene&action=listrecord`
    pub async fn list(&self) -> Result<String, Error> {
        self.action(LuupAction::ListRecord, Params::new()).await
    }

    /// Drop one recorded step.
    ///
    /// `id=scene&action=deleterecord&number={recording}`
    pub async fn delete(&self, recording: u32) -> Result<String, Error> {
        self.action(
            LuupAction::DeleteRecord,
            Params::new().with("number", recording),
        )
        .await
    }

    /// Save the recording as a scene.
    ///
    /// `id=scene&action=saverecord&name={name}[&room={room}]`
    pub async fn save(&self, name: &str, room: Option<ParamValue>) -> Result<String, Error> {
        require_name("name", name)?;
        let params = Params::new()
            .with(ParamName::Name, name)
            .with_opt(ParamName::Room, room);
        self.action(LuupAction::SaveRecord, params).await
    }
}

async fn scene_action(
    dispatcher: &Dispatcher,
    action: &str,
    params: Params,
) -> Result<String, Error> {
    dispatcher
        .request_by_id_and_action(RequestId::Scene.as_str(), action, params)
        .await
}
