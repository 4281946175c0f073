//! Controller-wide requests: data queries, engine control, plugins, raw.

use luup_api::{Connector, Params, RequestOptions};

use crate::cli::{Command, FindDeviceArgs, LuaArgs, PluginCommand, RawArgs, WgetArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(connector: &Connector, cmd: Command) -> Result<(), CliError> {
    let body = match cmd {
        Command::Status { udn: Some(udn), poll } => {
            connector
                .status_with_udn(&udn, RequestOptions::from(poll))
                .await?
        }
        Command::Status { udn: None, poll } => connector.status(RequestOptions::from(poll)).await?,

        Command::UserData { v2: false, poll } => {
            connector.user_data(RequestOptions::from(poll)).await?
        }
        Command::UserData { v2: true, poll } => {
            connector.user_data2(RequestOptions::from(poll)).await?
        }

        Command::Sdata { poll } => connector.sdata(RequestOptions::from(poll)).await?,

        Command::File { name } => connector.file(&name).await?,

        Command::Lua(args) => {
            let code = lua_code(args)?;
            connector.run_lua(&code).await?
        }

        Command::Alive => return expect_ok("alive", connector.alive().await?),
        Command::Resync => return expect_ok("resync", connector.resync().await?),
        Command::Reload => connector.reload().await?,

        Command::Invoke { udn: Some(udn) } => connector.invoke_udn(&udn).await?,
        Command::Invoke { udn: None } => connector.invoke().await?,

        Command::FindDevice(FindDeviceArgs { num: Some(num), .. }) => {
            connector.find_device(num).await?
        }
        Command::FindDevice(FindDeviceArgs { alt_id, .. }) => {
            connector
                .find_device_by_alt_id(alt_id.as_deref().unwrap_or_default())
                .await?
        }

        Command::JobStatus { job, plugin } => {
            connector.job_status(job, plugin.as_deref()).await?
        }

        Command::IpRequests { since } => connector.ip_requests(since).await?,

        Command::Energy => connector.live_energy_usage().await?,

        Command::Wget(WgetArgs {
            url,
            wait,
            user,
            password,
        }) => {
            let credentials = user.as_deref().zip(password.as_deref());
            connector.wget(&url, wait, credentials).await?
        }

        Command::Plugin(args) => match args.command {
            PluginCommand::Install { number } => connector.install_plugin(number).await?,
            PluginCommand::Update { id } => connector.update_plugin(id).await?,
        },

        Command::Raw(args) => raw(connector, args).await?,

        // Handled by their own modules or before dispatch
        Command::Device(_)
        | Command::Scene(_)
        | Command::Room(_)
        | Command::Config(_)
        | Command::Completions(_) => unreachable!(),
    };

    util::print_body(&body);
    Ok(())
}

fn lua_code(args: LuaArgs) -> Result<String, CliError> {
    match (args.code, args.file) {
        (Some(code), _) => Ok(code),
        (None, Some(path)) => util::read_arg_file("file", &path),
        (None, None) => Err(CliError::Validation {
            field: "code".into(),
            reason: "pass the code or --file".into(),
        }),
    }
}

fn expect_ok(request: &str, ok: bool) -> Result<(), CliError> {
    if ok {
        println!("OK");
        Ok(())
    } else {
        Err(CliError::EngineNotReady {
            request: request.into(),
        })
    }
}

async fn raw(connector: &Connector, args: RawArgs) -> Result<String, CliError> {
    let params: Params = util::extra_params(args.extra.params);
    let body = match args.action {
        Some(action) => {
            connector
                .request_by_id_and_action(&args.id, &action, params)
                .await?
        }
        None => connector.request_by_id(&args.id, params).await?,
    };
    Ok(body)
}
