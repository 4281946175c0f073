//! Config subcommand handlers.

use luup_config::{self as config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            url,
            name,
            set_default,
            force,
        } => {
            let mut cfg = config::load_config_or_default();

            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: format!("profile '{name}' already exists (use --force to replace it)"),
                });
            }

            let mut profile = Profile::new(url);
            profile.output_format = global.format.map(Into::into);
            profile.timeout = global.timeout;
            profile.insecure = global.insecure.then_some(true);

            // Fail before writing anything unusable.
            config::resolve_profile(&profile, &cfg.defaults)?;

            let first = cfg.profiles.is_empty();
            cfg.profiles.insert(name.clone(), profile);
            if set_default || first {
                cfg.default_profile = Some(name.clone());
            }

            let path = config::save_config(&cfg)?;
            eprintln!("Configuration written to {}", path.display());
            eprintln!("  Profile: {name}");
            eprintln!("\n  Test it: luup --profile {name} alive");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let rendered = toml::to_string_pretty(&cfg).map_err(config::ConfigError::from)?;
            print!("{rendered}");
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let active = crate::config::active_profile_name(global, &cfg);

            let mut profiles: Vec<(&String, &Profile)> = cfg.profiles.iter().collect();
            profiles.sort_by(|a, b| a.0.cmp(b.0));
            for (name, profile) in profiles {
                let marker = if *name == active { "*" } else { " " };
                println!("{marker} {name}\t{}", profile.controller);
            }
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
