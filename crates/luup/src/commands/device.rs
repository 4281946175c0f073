//! Device command handlers.

use luup_api::{Connector, Params};

use crate::cli::{DeviceArgs, DeviceCommand, ServiceArgs, ServiceCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(connector: &Connector, args: DeviceArgs) -> Result<(), CliError> {
    let device = connector.device(args.number);

    let body = match args.command {
        DeviceCommand::Status => device.status(Params::new()).await?,
        DeviceCommand::Actions => device.actions(Params::new()).await?,
        DeviceCommand::Rename { name, room } => {
            device.rename(&name, util::room_param(room)).await?
        }
        DeviceCommand::Delete => device.delete().await?,
        DeviceCommand::Invoke => device.invoke().await?,
        DeviceCommand::Action { action, extra } => {
            device
                .action(&action, util::extra_params(extra.params))
                .await?
        }
        DeviceCommand::Service(service_args) => {
            handle_service(connector, args.number, service_args).await?
        }
    };

    util::print_body(&body);
    Ok(())
}

async fn handle_service(
    connector: &Connector,
    device: u32,
    args: ServiceArgs,
) -> Result<String, CliError> {
    let service = connector.device(device).service(args.service_id);

    let body = match args.command {
        ServiceCommand::Action { action, extra } => {
            service
                .action(&action, util::extra_params(extra.params))
                .await?
        }
        ServiceCommand::Get { variable } => service.get_variable(&variable).await?,
        ServiceCommand::Set { variable, value } => service.set_variable(&variable, value).await?,
    };
    Ok(body)
}
