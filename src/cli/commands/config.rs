//! CLI command for `yocto-bake config`
//!
//! Stores Artifactory connection details in `servers.toml`. Values come from
//! flags; anything missing is prompted for when the terminal is interactive.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Args;

use crate::cli::output::status;
use crate::core::connection::{ConnectionStore, ServerDetails};
use crate::infra::dirs::BakeDirs;

/// Connection options
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Name used to select this server with `bake --art-id`
    #[arg(long)]
    pub server_id: Option<String>,

    /// Artifactory base URL, e.g. https://acme.jfrog.io/artifactory
    #[arg(long)]
    pub url: Option<String>,

    /// User for basic authentication
    #[arg(long)]
    pub user: Option<String>,

    /// Password or API key for basic authentication
    #[arg(long)]
    pub password: Option<String>,

    /// Access token, used instead of user and password
    #[arg(long)]
    pub access_token: Option<String>,

    /// Make this the default server
    #[arg(long)]
    pub default: bool,
}

/// Prompt labels for secrets; input is read as a plain line and echoed
const PASSWORD_PROMPT: &str = "Password (echoed as typed, pass --password to avoid)";
const TOKEN_PROMPT: &str =
    "Access token (echoed as typed, pass --access-token to avoid; empty for user/password)";

/// Check if the terminal is interactive
pub fn is_terminal_interactive() -> bool {
    use std::io::IsTerminal;

    // Check TERM environment variable
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" || term.is_empty() {
            return false;
        }
    }

    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}

/// Execute config command
pub async fn execute(args: ConfigArgs) -> Result<()> {
    let server = if is_terminal_interactive() {
        let stdin = std::io::stdin();
        let mut input = stdin.lock();
        let mut output = std::io::stdout();
        complete_interactively(args.clone(), &mut input, &mut output)?
    } else {
        args.clone()
    };

    let details = into_server_details(server)?;
    let dirs = BakeDirs::new();
    let mut store = ConnectionStore::load(&dirs).context("Failed to load stored servers")?;
    let server_id = details.server_id.clone();
    store.upsert(details, args.default);
    store.save(&dirs).context("Failed to save servers")?;

    println!(
        "{} Saved Artifactory server '{server_id}' to {}",
        status::SUCCESS,
        dirs.servers_path().display()
    );
    Ok(())
}

/// Ask for every value the flags left out
fn complete_interactively<R: BufRead, W: Write>(
    mut args: ConfigArgs,
    input: &mut R,
    output: &mut W,
) -> Result<ConfigArgs> {
    if args.server_id.is_none() {
        args.server_id = Some(prompt("Server ID", input, output)?);
    }
    if args.url.is_none() {
        args.url = Some(prompt("Artifactory URL", input, output)?);
    }

    let has_credentials = args.access_token.is_some() || args.user.is_some();
    if !has_credentials {
        let token = prompt(TOKEN_PROMPT, input, output)?;
        if token.is_empty() {
            args.user = Some(prompt("User", input, output)?);
            args.password = Some(prompt(PASSWORD_PROMPT, input, output)?);
        } else {
            args.access_token = Some(token);
        }
    } else if args.user.is_some() && args.password.is_none() && args.access_token.is_none() {
        args.password = Some(prompt(PASSWORD_PROMPT, input, output)?);
    }

    Ok(args)
}

/// Print a label and read one trimmed line
fn prompt<R: BufRead, W: Write>(label: &str, input: &mut R, output: &mut W) -> Result<String> {
    write!(output, "{label}: ")?;
    output.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("Failed to read {label}"))?;
    Ok(line.trim().to_string())
}

fn into_server_details(args: ConfigArgs) -> Result<ServerDetails> {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    let Some(server_id) = non_empty(args.server_id) else {
        bail!("--server-id is required when not running interactively");
    };
    let Some(url) = non_empty(args.url) else {
        bail!("--url is required when not running interactively");
    };
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("Artifactory URL must start with http:// or https://: {url}");
    }

    Ok(ServerDetails {
        server_id,
        url,
        user: non_empty(args.user),
        password: non_empty(args.password),
        access_token: non_empty(args.access_token),
    })
}
