//! Command dispatch: bridges CLI args -> core controllers -> output formatting.

pub mod config_cmd;
pub mod overview;
pub mod posts;
pub mod records;
pub mod users;
pub mod util;

use crudboard_core::{ClientConfig, ResourceClient};

use crate::cli::{Command, OutputFormat};
use crate::error::CliError;

/// Everything a service-bound handler needs, resolved once per run.
pub struct Context {
    pub client: ResourceClient,
    pub config: ClientConfig,
    pub output: OutputFormat,
    pub quiet: bool,
    pub yes: bool,
}

/// Dispatch a service-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Users(args) => users::handle(ctx, args).await,
        Command::Posts(args) => posts::handle(ctx, args).await,
        Command::Overview => overview::handle(ctx).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
