//! Config subcommand handlers.

use dialoguer::Input;

use crudboard_core::DEFAULT_BASE_URL;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Map a dialoguer failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt(e.to_string())
}

fn format_config(cfg: &Config) -> String {
    toml::to_string_pretty(cfg).unwrap_or_else(|e| format!("# unprintable config: {e}"))
}

fn parse_number<T: std::str::FromStr>(field: &str, value: &str) -> Result<T, CliError> {
    value.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("expected a whole number, got '{value}'"),
    })
}

fn parse_page_size(field: &str, value: &str) -> Result<usize, CliError> {
    match parse_number(field, value)? {
        0 => Err(CliError::Validation {
            field: field.into(),
            reason: "must be at least 1".into(),
        }),
        n => Ok(n),
    }
}

fn validate_url(value: &str) -> Result<(), CliError> {
    url::Url::parse(value)
        .map(drop)
        .map_err(|e| CliError::Validation {
            field: "base_url".into(),
            reason: format!("{e}: {value}"),
        })
}

/// Apply `key = value` to a profile.
fn set_profile_key(profile: &mut Profile, key: &str, value: &str) -> Result<(), CliError> {
    match key {
        "base_url" | "base-url" => {
            validate_url(value)?;
            value.clone_into(&mut profile.base_url);
        }
        "timeout" => profile.timeout = Some(parse_number(key, value)?),
        "users_page_size" | "users-page-size" => {
            profile.users_page_size = Some(parse_page_size(key, value)?);
        }
        "posts_page_size" | "posts-page-size" => {
            profile.posts_page_size = Some(parse_page_size(key, value)?);
        }
        other => {
            return Err(CliError::Validation {
                field: other.into(),
                reason: format!(
                    "unknown config key '{other}'. Valid keys: base_url, timeout, \
                     users_page_size, posts_page_size"
                ),
            });
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("crudboard configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default(crudboard_config::DEFAULT_PROFILE.into())
                .interact_text()
                .map_err(prompt_err)?;

            let base_url: String = Input::new()
                .with_prompt("Service URL")
                .default(DEFAULT_BASE_URL.into())
                .validate_with(|input: &String| validate_url(input).map_err(|e| e.to_string()))
                .interact_text()
                .map_err(prompt_err)?;

            let timeout: u64 = Input::new()
                .with_prompt("Request timeout (seconds)")
                .default(30)
                .interact_text()
                .map_err(prompt_err)?;

            let mut cfg = config::load_config().unwrap_or_default();
            cfg.profiles.insert(
                profile_name.clone(),
                Profile {
                    base_url,
                    timeout: Some(timeout),
                    ..Profile::default()
                },
            );
            if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(profile_name.clone());
            }

            let path = config::save_config(&cfg)?;
            eprintln!("\n✓ Configuration written to {}", path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: crudboard overview");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = config::resolve_output(global, &cfg);
            let out = output::render_single(format, &cfg, format_config, |c| {
                config::active_profile_name(global, c)
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            set_profile_key(profile, &key, &value)?;

            config::save_config(&cfg)?;
            output::status(&format!("✓ Set {key} on profile '{profile_name}'"), global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                output::status(
                    "No profiles configured. Run: crudboard config init",
                    global.quiet,
                );
            } else {
                let names: Vec<String> = cfg
                    .profiles
                    .keys()
                    .map(|name| {
                        if *name == active {
                            format!("{name} *")
                        } else {
                            name.clone()
                        }
                    })
                    .collect();
                output::print_output(&names.join("\n"), global.quiet);
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            cfg.profile(&name)?;

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::status(&format!("✓ Default profile set to '{name}'"), global.quiet);
            Ok(())
        }
    }
}
