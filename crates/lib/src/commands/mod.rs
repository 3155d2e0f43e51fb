//! Administrative command table
//!
//! Each command is one whitespace-separated line such as
//! `grant alice teamA teamB`. [`dispatch`] looks the command up, checks its
//! argument count, runs it against a [`Registry`] and writes human-readable
//! results to any [`std::io::Write`] sink. Operation errors are reported on
//! the sink as `Operation failed: <message>` and never end the session; only
//! a failure to write the output is returned to the caller.
//!
//! REPL framing (prompt, `exit`, `close`) belongs to the front end.

use std::io::Write;

use thiserror::Error;

use crate::registry::Registry;

mod accounts;
mod output;
mod tags;

/// The commands understood by [`dispatch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    AddUser,
    SetPassword,
    RmUser,
    RmUsers,
    Grant,
    Revoke,
    ShowUser,
    LsUsers,
    DefTag,
    UndefTag,
    UndefTags,
    AddPrefix,
    RmPrefix,
    ShowTagDef,
    LsTagDefs,
    Ls,
}

/// Name, help text and accepted argument count of one command.
#[derive(Clone, Copy, Debug)]
pub struct Command {
    pub kind: CommandKind,
    pub name: &'static str,
    pub usage_args: &'static str,
    pub hint: &'static str,
    /// Fewest tokens accepted, counting the command name
    min_tokens: usize,
    /// Most tokens accepted, counting the command name
    max_tokens: Option<usize>,
}

impl Command {
    /// Whether a line of `tokens` tokens (name included) is a valid call.
    pub fn accepts(&self, tokens: usize) -> bool {
        tokens >= self.min_tokens && self.max_tokens.is_none_or(|max| tokens <= max)
    }

    /// Two-line usage text shown when a command is called with the wrong arguments.
    pub fn usage(&self) -> String {
        format!(
            "{} - {}\nUsage: {} {}",
            self.name, self.hint, self.name, self.usage_args
        )
    }
}

const fn command(
    kind: CommandKind,
    name: &'static str,
    usage_args: &'static str,
    hint: &'static str,
    min_tokens: usize,
    max_tokens: Option<usize>,
) -> Command {
    Command {
        kind,
        name,
        usage_args,
        hint,
        min_tokens,
        max_tokens,
    }
}

/// Every command, in the order `help` lists them.
pub const COMMANDS: &[Command] = &[
    command(
        CommandKind::AddUser,
        "adduser",
        "username password [tag1] [tag2] ...",
        "creates a new user account",
        3,
        None,
    ),
    command(
        CommandKind::SetPassword,
        "setpassword",
        "username password",
        "sets a user's password",
        3,
        Some(3),
    ),
    command(
        CommandKind::RmUser,
        "rmuser",
        "username1 [username2] [username3] ...",
        "deletes user accounts",
        2,
        None,
    ),
    command(
        CommandKind::RmUsers,
        "rmusers",
        "usernameprefix",
        "deletes all user accounts whose username begins with a certain prefix",
        2,
        Some(2),
    ),
    command(
        CommandKind::Grant,
        "grant",
        "username tag1 [tag2] [tag3] ...",
        "grants a user permission to view streams with one or more tags",
        3,
        None,
    ),
    command(
        CommandKind::Revoke,
        "revoke",
        "username tag1 [tag2] [tag3] ...",
        "revokes tags from a user's permission list",
        3,
        None,
    ),
    command(
        CommandKind::ShowUser,
        "showuser",
        "username1 [username2] [username3] ...",
        "shows the tags granted to a user or users",
        2,
        None,
    ),
    command(
        CommandKind::LsUsers,
        "lsusers",
        "[prefix]",
        "shows the tags granted to all user accounts whose names begin with a given prefix",
        1,
        Some(2),
    ),
    command(
        CommandKind::DefTag,
        "deftag",
        "tag pathprefix1 [pathprefix2] ...",
        "defines a new tag, which is a unit of permissions that can be granted to a user",
        3,
        None,
    ),
    command(
        CommandKind::UndefTag,
        "undeftag",
        "tag1 [tag2] [tag3] ...",
        "deletes tag definitions",
        2,
        None,
    ),
    command(
        CommandKind::UndefTags,
        "undeftags",
        "prefix",
        "deletes all tag definitions where the tag name begins with a certain prefix",
        2,
        Some(2),
    ),
    command(
        CommandKind::AddPrefix,
        "addprefix",
        "tag prefix1 [prefix2] [prefix3] ...",
        "adds path prefixes to a tag definition",
        3,
        None,
    ),
    command(
        CommandKind::RmPrefix,
        "rmprefix",
        "tag prefix1 [prefix2] [prefix3] ...",
        "removes path prefixes from a tag definition",
        3,
        None,
    ),
    command(
        CommandKind::ShowTagDef,
        "showtagdef",
        "tag1 [tag2] [tag3] ...",
        "lists the prefixes assigned to a tag",
        2,
        None,
    ),
    command(
        CommandKind::LsTagDefs,
        "lstagdefs",
        "[prefix]",
        "lists the prefixes assigned to all tags whose names begin with a certain prefix",
        1,
        Some(2),
    ),
    command(
        CommandKind::Ls,
        "ls",
        "[prefix]",
        "lists the path prefixes viewable by each user in the current configuration",
        1,
        Some(2),
    ),
];

/// Find a command by name.
pub fn lookup(name: &str) -> Option<&'static Command> {
    COMMANDS.iter().find(|command| command.name == name)
}

/// Why a command did not complete.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The registry rejected or failed the operation
    #[error(transparent)]
    Operation(#[from] crate::Error),

    /// The output sink could not be written
    #[error("Failed to write command output: {0}")]
    Output(#[from] std::io::Error),
}

/// Write the list of available commands.
pub fn help(out: &mut impl Write) -> std::io::Result<()> {
    let names: Vec<&str> = COMMANDS.iter().map(|command| command.name).collect();
    writeln!(
        out,
        "Type one of the following commands and press <Enter> or <Return> to execute it:"
    )?;
    writeln!(out, "help {}", names.join(" "))
}

/// Parse and run one command line.
///
/// Blank lines are ignored. Unknown commands and wrong argument counts are
/// answered with help or usage text; failed operations with
/// `Operation failed: <message>`.
///
/// # Errors
/// Only failures to write to `out`.
pub async fn dispatch(registry: &Registry, line: &str, out: &mut impl Write) -> std::io::Result<()> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = tokens.split_first() else {
        return Ok(());
    };

    if name == "help" {
        return help(out);
    }

    let Some(command) = lookup(name) else {
        writeln!(out, "'{name}' is not a valid command")?;
        return help(out);
    };

    if !command.accepts(tokens.len()) {
        return writeln!(out, "{}", command.usage());
    }

    tracing::debug!(command = command.name, args = args.len(), "running command");
    match run(registry, command.kind, args, out).await {
        Ok(()) => Ok(()),
        Err(CommandError::Operation(err)) => {
            tracing::debug!(command = command.name, error = %err, kind = ?err.kind(), "command failed");
            writeln!(out, "Operation failed: {err}")
        }
        Err(CommandError::Output(err)) => Err(err),
    }
}

async fn run(
    registry: &Registry,
    kind: CommandKind,
    args: &[&str],
    out: &mut impl Write,
) -> Result<(), CommandError> {
    match kind {
        CommandKind::AddUser => accounts::add_user(registry, args).await,
        CommandKind::SetPassword => accounts::set_password(registry, args).await,
        CommandKind::RmUser => accounts::remove_users(registry, args).await,
        CommandKind::RmUsers => accounts::remove_users_with_prefix(registry, args, out).await,
        CommandKind::Grant => accounts::grant(registry, args).await,
        CommandKind::Revoke => accounts::revoke(registry, args, out).await,
        CommandKind::ShowUser => accounts::show_users(registry, args, out).await,
        CommandKind::LsUsers => accounts::list_users(registry, args, out).await,
        CommandKind::DefTag => tags::define(registry, args).await,
        CommandKind::UndefTag => tags::undefine(registry, args, out).await,
        CommandKind::UndefTags => tags::undefine_with_prefix(registry, args, out).await,
        CommandKind::AddPrefix => tags::add_prefixes(registry, args).await,
        CommandKind::RmPrefix => tags::remove_prefixes(registry, args).await,
        CommandKind::ShowTagDef => tags::show(registry, args, out).await,
        CommandKind::LsTagDefs => tags::list(registry, args, out).await,
        CommandKind::Ls => accounts::list_permissions(registry, args, out).await,
    }
}

/// The optional prefix argument of a listing command.
fn prefix_arg<'a>(args: &[&'a str]) -> &'a str {
    args.first().copied().unwrap_or("")
}
