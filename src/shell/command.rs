use snafu::Snafu;

const MKDIR_USAGE: &str = "SYNOPSIS: mkdir [directory_name]";
const RM_USAGE: &str = "SYNOPSIS: rm [file/dir_name]";
const WRITE_USAGE: &str = "SYNOPSIS: write [file_name] [file_content]";
const MV_USAGE: &str = "SYNOPSIS: mv [source_file_name] [dest_file_name]";
const TOUCH_USAGE: &str = "SYNOPSIS: touch [file_name]";
const LS_USAGE: &str = "SYNOPSIS: \n   ls: list current working directory contents \n   ls [directory_name]: list contents for directory ";
const CD_USAGE: &str = "SYNOPSIS: cd [directory_name]";
const PWD_USAGE: &str = "SYNOPSIS: pwd – return working directory name";
const FIND_USAGE: &str = "SYNOPSIS: find [file/dir_name]";
const CAT_USAGE: &str = "SYNOPSIS: cat [file_name]";

/// Path `ls` lists when given no argument.
pub const CURRENT_DIR: &str = ".";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir { path: String },
    Rm { name: String },
    Write { path: String, content: String },
    Mv { from: String, to: String },
    Touch { name: String },
    Ls { path: String },
    Cd { path: String },
    Pwd,
    Find { name: String },
    Cat { path: String },
}

impl Command {
    /// Parses a whitespace-separated line. Returns `Ok(None)` for a blank line.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((&word, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match (word, args) {
            ("mkdir", [path]) => Command::Mkdir { path: path.to_string() },
            ("mkdir", _) => return UsageSnafu { usage: MKDIR_USAGE }.fail(),
            ("rm", [name]) => Command::Rm { name: name.to_string() },
            ("rm", _) => return UsageSnafu { usage: RM_USAGE }.fail(),
            ("write", [path, content]) => Command::Write {
                path: path.to_string(),
                content: content.to_string(),
            },
            ("write", _) => return UsageSnafu { usage: WRITE_USAGE }.fail(),
            ("mv", [from, to]) => Command::Mv {
                from: from.to_string(),
                to: to.to_string(),
            },
            ("mv", _) => return UsageSnafu { usage: MV_USAGE }.fail(),
            ("touch", [name]) => Command::Touch { name: name.to_string() },
            ("touch", _) => return UsageSnafu { usage: TOUCH_USAGE }.fail(),
            ("ls", []) => Command::Ls {
                path: CURRENT_DIR.to_string(),
            },
            ("ls", [path]) => Command::Ls { path: path.to_string() },
            ("ls", _) => return UsageSnafu { usage: LS_USAGE }.fail(),
            ("cd", [path]) => Command::Cd { path: path.to_string() },
            ("cd", _) => return UsageSnafu { usage: CD_USAGE }.fail(),
            ("pwd", []) => Command::Pwd,
            ("pwd", _) => return UsageSnafu { usage: PWD_USAGE }.fail(),
            ("find", [name]) => Command::Find { name: name.to_string() },
            ("find", _) => return UsageSnafu { usage: FIND_USAGE }.fail(),
            ("cat", [path]) => Command::Cat { path: path.to_string() },
            ("cat", _) => return UsageSnafu { usage: CAT_USAGE }.fail(),
            (other, _) => return UnknownCommandSnafu { name: other }.fail(),
        };

        Ok(Some(command))
    }

    /// The command word, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Mkdir { .. } => "mkdir",
            Command::Rm { .. } => "rm",
            Command::Write { .. } => "write",
            Command::Mv { .. } => "mv",
            Command::Touch { .. } => "touch",
            Command::Ls { .. } => "ls",
            Command::Cd { .. } => "cd",
            Command::Pwd => "pwd",
            Command::Find { .. } => "find",
            Command::Cat { .. } => "cat",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CommandParseError {
    #[snafu(display("{usage}"))]
    Usage { usage: &'static str },
    #[snafu(display("command not found: {name}"))]
    UnknownCommand { name: String },
}
