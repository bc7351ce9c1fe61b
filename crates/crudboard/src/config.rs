//! CLI configuration: thin wrapper around `crudboard_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--base-url`, `--timeout`, `--output`).

use clap::ValueEnum;

use crudboard_core::ClientConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use crudboard_config::{
    Config, Profile, config_path, load_config, profile_to_client_config, save_config,
};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Build the `ClientConfig` for a run. Flags override the profile, which
/// overrides `[defaults]`.
pub fn resolve_client_config(
    global: &GlobalOpts,
    config: &Config,
) -> Result<ClientConfig, CliError> {
    let name = active_profile_name(global, config);
    let mut profile = config.profile(&name)?;

    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if let Some(secs) = global.timeout {
        profile.timeout = Some(secs);
    }

    tracing::debug!(profile = %name, base_url = %profile.base_url, "resolved profile");
    Ok(profile_to_client_config(&profile, &config.defaults)?)
}

/// Output format: `--output` flag, else `[defaults].output`, else table.
pub fn resolve_output(global: &GlobalOpts, config: &Config) -> OutputFormat {
    global.output.unwrap_or_else(|| {
        OutputFormat::from_str(&config.defaults.output, true).unwrap_or(OutputFormat::Table)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["crudboard"];
        argv.extend_from_slice(args);
        argv.push("overview");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_staging() -> Config {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        cfg.profiles.insert(
            "staging".into(),
            Profile {
                base_url: "http://staging.local".into(),
                timeout: Some(5),
                users_page_size: Some(10),
                posts_page_size: None,
            },
        );
        cfg
    }

    #[test]
    fn flags_override_profile() {
        let cfg = config_with_staging();
        let g = global(&["--profile", "staging", "--timeout", "9"]);
        let client = resolve_client_config(&g, &cfg).unwrap();
        assert_eq!(client.base_url, "http://staging.local");
        assert_eq!(client.timeout, Duration::from_secs(9));
        assert_eq!(client.users_page_size.get(), 10);

        let g = global(&["--profile", "staging", "--base-url", "http://127.0.0.1:1"]);
        let client = resolve_client_config(&g, &cfg).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:1");
        assert_eq!(client.timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_profile_is_reported() {
        let cfg = config_with_staging();
        let g = global(&["--profile", "prod"]);
        assert!(matches!(
            resolve_client_config(&g, &cfg),
            Err(CliError::ProfileNotFound { .. })
        ));
    }

    #[test]
    fn output_falls_back_to_config_default() {
        let cfg = config_with_staging();
        assert_eq!(resolve_output(&global(&[]), &cfg), OutputFormat::Yaml);
        assert_eq!(
            resolve_output(&global(&["-o", "plain"]), &cfg),
            OutputFormat::Plain
        );
    }
}
