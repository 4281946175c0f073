//! Scene command handlers.

use luup_api::Connector;

use crate::cli::{RecordCommand, SceneArgs, SceneCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(connector: &Connector, args: SceneArgs) -> Result<(), CliError> {
    let scenes = connector.scene();

    let body = match args.command {
        SceneCommand::List { scene } => scenes.list(scene).await?,
        SceneCommand::Create { json } => {
            let json = util::literal_or_file("json", json)?;
            scenes.create(&json).await?
        }
        SceneCommand::Rename { scene, name, room } => {
            scenes.rename(scene, &name, util::room_param(room)).await?
        }
        SceneCommand::Delete { scene } => scenes.delete(scene).await?,
        SceneCommand::Run { scene } => scenes.run(scene).await?,
        SceneCommand::Action { action, extra } => {
            scenes
                .action(&action, util::extra_params(extra.params))
                .await?
        }
        SceneCommand::Record(record_args) => {
            let record = scenes.record();
            match record_args.command {
                RecordCommand::Start => record.start().await?,
                RecordCommand::Pause { seconds } => record.pause(seconds).await?,
                RecordCommand::Stop => record.stop().await?,
                RecordCommand::List => record.list().await?,
                RecordCommand::Delete { number } => record.delete(number).await?,
                RecordCommand::Save { name, room } => {
                    record.save(&name, util::room_param(room)).await?
                }
            }
        }
    };

    util::print_body(&body);
    Ok(())
}
