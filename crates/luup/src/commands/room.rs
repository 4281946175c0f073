//! Room command handlers.

use luup_api::Connector;

use crate::cli::{RoomArgs, RoomCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(connector: &Connector, args: RoomArgs) -> Result<(), CliError> {
    let rooms = connector.room();

    let body = match args.command {
        RoomCommand::Create { name } => rooms.create(&name).await?,
        RoomCommand::Rename { room, name } => rooms.rename(room, &name).await?,
        RoomCommand::Delete { room } => rooms.delete(room).await?,
        RoomCommand::Action { action, extra } => {
            rooms
                .action(&action, util::extra_params(extra.params))
                .await?
        }
    };

    util::print_body(&body);
    Ok(())
}
