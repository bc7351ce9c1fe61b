//! Clap derive structures for the `crudboard` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// crudboard -- admin console for users and posts
#[derive(Debug, Parser)]
#[command(
    name = "crudboard",
    version,
    about = "Browse and edit users and posts from the command line",
    long_about = "Browse, search, create, edit and delete the users and posts held by a\n\
        JSON resource service (jsonplaceholder-compatible by default).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "CRUDBOARD_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Service root URL (overrides profile)
    #[arg(long, short = 'b', env = "CRUDBOARD_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "CRUDBOARD_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color in diagnostics
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "CRUDBOARD_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse and manage users
    #[command(alias = "u")]
    Users(UsersArgs),

    /// Browse and manage posts
    #[command(alias = "p")]
    Posts(PostsArgs),

    /// Collection sizes, recent posts and featured users
    Overview,

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// Search and paging arguments shared by list commands.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive text to search for
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Page to show (clamped to the last page)
    #[arg(long, default_value = "1")]
    pub page: usize,

    /// Show every matching row instead of one page
    #[arg(long, short = 'a', conflicts_with = "page")]
    pub all: bool,
}

/// Field edits as `path=value` pairs, e.g. `--set address.city=Boston`.
#[derive(Debug, Args)]
pub struct SetArgs {
    /// Set a field (repeatable); paths use dots for nested fields
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{raw}'"))?;
    let path = path.trim();
    if path.is_empty() {
        return Err(format!("missing field path in '{raw}'"));
    }
    Ok((path.to_owned(), value.to_owned()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  USERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct UsersArgs {
    #[command(subcommand)]
    pub command: UsersCommand,
}

#[derive(Debug, Subcommand)]
pub enum UsersCommand {
    /// List users, optionally searched and paged
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a user and the posts they wrote
    Get {
        /// User id
        id: u64,
    },

    /// Create a user
    Create {
        /// Full name
        #[arg(long, required_unless_present = "from_file")]
        name: Option<String>,

        /// Login name (letters, digits, underscores)
        #[arg(long, required_unless_present = "from_file")]
        username: Option<String>,

        /// Email address
        #[arg(long, required_unless_present = "from_file")]
        email: Option<String>,

        #[command(flatten)]
        fields: SetArgs,

        /// Read the user from a JSON file instead
        #[arg(long, short = 'F', conflicts_with_all = ["name", "username", "email"])]
        from_file: Option<PathBuf>,
    },

    /// Edit fields of an existing user
    Update {
        /// User id
        id: u64,

        #[command(flatten)]
        fields: SetArgs,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// User id
        id: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  POSTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub command: PostsCommand,
}

#[derive(Debug, Subcommand)]
pub enum PostsCommand {
    /// List posts, optionally searched, filtered by author and paged
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        list: ListArgs,

        /// Only posts written by this user id
        #[arg(long, short = 'u')]
        user: Option<u64>,
    },

    /// Show a post with its author and more from them
    Get {
        /// Post id
        id: u64,
    },

    /// Create a post
    Create {
        /// Author user id
        #[arg(long = "user-id", required_unless_present = "from_file")]
        user_id: Option<u64>,

        /// Title
        #[arg(long, required_unless_present = "from_file")]
        title: Option<String>,

        /// Body text
        #[arg(long, required_unless_present = "from_file")]
        body: Option<String>,

        /// Read the post from a JSON file instead
        #[arg(long, short = 'F', conflicts_with_all = ["user_id", "title", "body"])]
        from_file: Option<PathBuf>,
    },

    /// Edit fields of an existing post
    Update {
        /// Post id
        id: u64,

        #[command(flatten)]
        fields: SetArgs,
    },

    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post id
        id: u64,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create the config file with guided setup
    Init,

    /// Display the current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: base_url, timeout, users_page_size, posts_page_size
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
