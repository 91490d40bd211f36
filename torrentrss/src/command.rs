use std::{io, process::Stdio};

use tokio::process::{Child, Command as ProcessCommand};
use torrentrss_types::CommandConfig;

use crate::error::{ConfigError, LaunchError};

/// Placeholder replaced by the url or path being launched.
pub const PATH_OR_URL_ARGUMENT: &str = "$PATH_OR_URL";

/// Hands a url or path to whatever the platform opens it with.
pub trait Opener: Send + Sync {
    fn open(&self, target: &str) -> io::Result<()>;
}

/// Platform default application, via `open` (`start` on Windows, `xdg-open`
/// elsewhere). Does not wait for the launched program.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open(&self, target: &str) -> io::Result<()> {
        open::that_detached(target)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LaunchMode {
    DefaultApplication,
    Arguments { arguments: Vec<String>, shell: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    mode: LaunchMode,
}

impl Default for Command {
    fn default() -> Self {
        Self {
            mode: LaunchMode::DefaultApplication,
        }
    }
}

impl Command {
    pub fn new(arguments: Vec<String>, shell: bool) -> Result<Self, ConfigError> {
        if arguments.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(Self {
            mode: LaunchMode::Arguments { arguments, shell },
        })
    }

    pub fn from_config(config: Option<&CommandConfig>) -> Result<Self, ConfigError> {
        match config {
            None => Ok(Self::default()),
            Some(config) => Self::new(config.arguments().to_vec(), config.shell()),
        }
    }

    pub fn mode(&self) -> &LaunchMode {
        &self.mode
    }

    /// Argument template with every placeholder replaced by `target`.
    pub fn subbed_arguments(&self, target: &str) -> Option<Vec<String>> {
        match &self.mode {
            LaunchMode::DefaultApplication => None,
            LaunchMode::Arguments { arguments, .. } => Some(
                arguments
                    .iter()
                    .map(|argument| argument.replace(PATH_OR_URL_ARGUMENT, target))
                    .collect(),
            ),
        }
    }

    /// Launches `target` without waiting for it. Returns the child when a
    /// subprocess was spawned.
    ///
    /// In shell mode the placeholder becomes a reference to `target` rather
    /// than its text, so the shell never parses the url or path itself.
    pub fn launch(&self, opener: &dyn Opener, target: &str) -> Result<Option<Child>, LaunchError> {
        let LaunchMode::Arguments { arguments, shell } = &self.mode else {
            info!("launching {:?} with default program", target);
            opener.open(target).map_err(|source| LaunchError::Open {
                target: target.to_string(),
                source,
            })?;
            return Ok(None);
        };

        let (mut process, arguments) = if *shell {
            let line = arguments
                .iter()
                .map(|argument| argument.replace(PATH_OR_URL_ARGUMENT, SHELL_TARGET_REFERENCE))
                .collect::<Vec<_>>()
                .join(" ");
            info!("launching shell line {:?} with target {:?}", line, target);
            (shell_command(&line, target), vec![line])
        } else {
            let arguments = self.subbed_arguments(target).unwrap_or_default();
            info!("launching subprocess with arguments {:?}", arguments);
            let mut process = ProcessCommand::new(&arguments[0]);
            process.args(&arguments[1..]);
            (process, arguments)
        };
        process.stdin(Stdio::null());
        hide_window(&mut process);
        let child = process
            .spawn()
            .map_err(|source| LaunchError::Spawn { arguments, source })?;
        Ok(Some(child))
    }
}

/// Environment variable holding the target for `cmd`, expanded with delayed
/// expansion after `cmd` has parsed the line.
#[cfg(windows)]
const SHELL_TARGET_VARIABLE: &str = "TORRENTRSS_PATH_OR_URL";
#[cfg(windows)]
const SHELL_TARGET_REFERENCE: &str = "\"!TORRENTRSS_PATH_OR_URL!\"";
/// First positional parameter of `sh -c`.
#[cfg(not(windows))]
const SHELL_TARGET_REFERENCE: &str = "\"$1\"";

#[cfg(windows)]
fn shell_command(line: &str, target: &str) -> ProcessCommand {
    let mut process = ProcessCommand::new("cmd");
    process
        .env(SHELL_TARGET_VARIABLE, target)
        .args(["/V:ON", "/C"])
        .arg(line);
    process
}

#[cfg(not(windows))]
fn shell_command(line: &str, target: &str) -> ProcessCommand {
    let mut process = ProcessCommand::new("sh");
    process.arg("-c").arg(line).arg("sh").arg(target);
    process
}

#[cfg(windows)]
fn hide_window(process: &mut ProcessCommand) {
    const CREATE_NO_WINDOW: u32 = 0x0800_0000;
    process.creation_flags(CREATE_NO_WINDOW);
}

#[cfg(not(windows))]
fn hide_window(_process: &mut ProcessCommand) {}
