//! CLI-aware configuration: applies `GlobalOpts` overrides on top of the
//! profile resolution in `luup_config`.

use url::Url;

use luup_api::{OutputFormat, ParamName, translate_param_name};
use luup_config::{Config, ConnectionSettings, Profile};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build connection settings from the config file, the active profile and
/// CLI overrides (flag > env > profile > defaults).
pub fn resolve_connection(global: &GlobalOpts, cfg: &Config) -> Result<ConnectionSettings, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match (cfg.profiles.get(&profile_name), global.controller.as_deref()) {
        (Some(profile), _) => profile.clone(),
        (None, Some(controller)) if global.profile.is_none() => Profile::new(controller),
        (None, _) if global.profile.is_some() => {
            let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
            available.sort_unstable();
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, _) => {
            return Err(CliError::NoConfig {
                path: luup_config::config_path().display().to_string(),
            });
        }
    };

    if let Some(ref controller) = global.controller {
        profile.controller.clone_from(controller);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }

    let mut settings = luup_config::resolve_profile(&profile, &cfg.defaults)?;
    if let Some(format) = global.format {
        set_output_format(&mut settings.url, format.into());
    }

    tracing::debug!(
        profile = %profile_name,
        endpoint = %settings.url,
        "resolved connection settings"
    );
    Ok(settings)
}

/// Replace any `output_format` in the endpoint query with `format`.
fn set_output_format(url: &mut Url, format: OutputFormat) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| translate_param_name(k) != ParamName::OutputFormat.as_str())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(ParamName::OutputFormat.as_str(), format.as_ref());
}
