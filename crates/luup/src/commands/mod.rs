//! Command dispatch: bridges CLI args -> connector calls -> stdout.

pub mod config_cmd;
pub mod device;
pub mod engine;
pub mod room;
pub mod scene;
pub mod util;

use luup_api::Connector;

use crate::cli::Command;
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, connector: &Connector) -> Result<(), CliError> {
    match cmd {
        Command::Device(args) => device::handle(connector, args).await,
        Command::Scene(args) => scene::handle(connector, args).await,
        Command::Room(args) => room::handle(connector, args).await,
        other => engine::handle(connector, other).await,
    }
}
