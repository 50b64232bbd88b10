use std::io::{BufRead, Write};

use colored::Colorize;
use snafu::{ResultExt, Snafu};
use tracing::{debug, info};

use crate::namespace::{Namespace, NamespaceError};
use crate::shell::{Command, CommandParseError};

/// What a successful command prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Nothing,
    Line(String),
    Lines(Vec<String>),
}

/// Line-oriented front end over one [`Namespace`].
///
/// Usage mistakes and operation errors are printed and never end the
/// session; only a failure to read input or write output does.
pub struct Shell<W: Write> {
    namespace: Namespace,
    out: W,
    prompt: Option<String>,
    color: bool,
}

impl<W: Write> Shell<W> {
    pub fn new(out: W) -> Self {
        Self {
            namespace: Namespace::new(),
            out,
            prompt: None,
            color: false,
        }
    }

    /// Prompt printed before each line read by [`Shell::run_reader`].
    pub fn with_prompt(mut self, prompt: Option<String>) -> Self {
        self.prompt = prompt;
        self
    }

    /// Render error messages in red.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn execute(&mut self, command: Command) -> Result<Output, NamespaceError> {
        let ns = &mut self.namespace;
        Ok(match command {
            Command::Mkdir { path } => ns.mkdir(&path).map(|()| Output::Nothing)?,
            Command::Rm { name } => ns.rm(&name).map(|()| Output::Nothing)?,
            Command::Write { path, content } => {
                ns.write(&path, &content).map(|()| Output::Nothing)?
            }
            Command::Mv { from, to } => ns.mv(&from, &to).map(|()| Output::Nothing)?,
            Command::Touch { name } => ns.touch(&name).map(|()| Output::Nothing)?,
            Command::Ls { path } => Output::Lines(ns.ls(&path)?),
            Command::Cd { path } => ns.cd(&path).map(|()| Output::Nothing)?,
            Command::Pwd => Output::Line(ns.pwd().to_string()),
            Command::Find { name } => Output::Lines(ns.find(&name)),
            Command::Cat { path } => Output::Line(ns.cat(&path)?.to_string()),
        })
    }

    /// Parses, runs and prints one line.
    pub fn run_line(&mut self, line: &str) -> Result<(), ShellError> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(()),
            Err(error @ CommandParseError::UnknownCommand { .. }) => {
                info!("{}", error);
                return self.print_plain(&error.to_string());
            }
            Err(error) => return self.print_plain(&error.to_string()),
        };

        debug!("Dispatching {:?}", command);
        let name = command.name();
        match self.execute(command) {
            Ok(Output::Nothing) => Ok(()),
            Ok(Output::Line(line)) => self.print_plain(&line),
            Ok(Output::Lines(lines)) => lines.iter().try_for_each(|line| self.print_plain(line)),
            Err(error) => {
                debug!("'{}' failed: {:?}", name, error);
                self.print_error(&error)
            }
        }
    }

    pub fn run_lines<I, S>(&mut self, lines: I) -> Result<(), ShellError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .try_for_each(|line| self.run_line(line.as_ref()))
    }

    /// Runs every line of `input` until it ends, printing the prompt first
    /// when one is set.
    pub fn run_reader<R: BufRead>(&mut self, input: R) -> Result<(), ShellError> {
        let mut lines = input.lines();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(self.out, "{prompt}").context(OutputSnafu)?;
                self.out.flush().context(OutputSnafu)?;
            }
            let Some(line) = lines.next() else {
                debug!("Input ended");
                return Ok(());
            };
            self.run_line(&line.context(InputSnafu)?)?;
        }
    }

    fn print_plain(&mut self, text: &str) -> Result<(), ShellError> {
        writeln!(self.out, "{text}").context(OutputSnafu)
    }

    fn print_error(&mut self, error: &NamespaceError) -> Result<(), ShellError> {
        let message = error.to_string();
        if self.color {
            writeln!(self.out, "{}", message.as_str().red()).context(OutputSnafu)
        } else {
            self.print_plain(&message)
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ShellError {
    #[snafu(display("Failed to read shell input"))]
    InputError { source: std::io::Error },
    #[snafu(display("Failed to write shell output"))]
    OutputError { source: std::io::Error },
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rstest::*;

    use super::*;

    fn run(lines: &[&str]) -> String {
        let mut shell = Shell::new(Vec::new());
        shell.run_lines(lines).unwrap();
        String::from_utf8(shell.into_inner()).unwrap()
    }

    #[test]
    fn prints_results_one_per_line() {
        let output = run(&[
            "mkdir /a/b/c",
            "cd a",
            "touch newfile",
            "ls",
            "pwd",
            "write newfile hello",
            "write /a/newfile world",
            "cat newfile",
            "find c",
        ]);
        assert_eq!(output, "b\nnewfile\n/a/\nhelloworld\n/a/b/c/\n");
    }

    #[test]
    fn errors_are_printed_and_session_continues() {
        let output = run(&["mkdir ../a", "rm a", "cd a", "touch file", "cd file", "pwd"]);
        assert_eq!(
            output,
            "Invalid path: ../a\n\
             No such file or directory: a\n\
             Directory not found: a\n\
             Not a directory: file\n\
             /\n"
        );
    }

    #[rstest]
    #[case("mkdir", "SYNOPSIS: mkdir [directory_name]\n")]
    #[case("write f", "SYNOPSIS: write [file_name] [file_content]\n")]
    #[case("pwd now", "SYNOPSIS: pwd – return working directory name\n")]
    #[case(
        "ls a b",
        "SYNOPSIS: \n   ls: list current working directory contents \n   ls [directory_name]: list contents for directory \n"
    )]
    #[case("format c:", "command not found: format\n")]
    #[case("", "")]
    fn usage_and_unknown_commands(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(run(&[line]), expected);
    }

    #[test]
    fn usage_errors_do_not_touch_the_namespace() {
        let mut shell = Shell::new(Vec::new());
        shell.run_lines(["mkdir a b", "touch", "mv x"]).unwrap();
        assert_eq!(shell.namespace().len(), 1);
    }

    #[test]
    fn empty_listing_prints_nothing() {
        assert_eq!(run(&["ls", "find nothing"]), "");
    }

    #[test]
    fn cat_of_empty_file_prints_empty_line() {
        assert_eq!(run(&["touch f", "cat f"]), "\n");
    }

    #[test]
    fn execute_returns_structured_output() {
        let mut shell = Shell::new(std::io::sink());
        assert_eq!(
            shell.execute(Command::Mkdir { path: "x/y".into() }),
            Ok(Output::Nothing)
        );
        assert_eq!(
            shell.execute(Command::Ls { path: "x".into() }),
            Ok(Output::Lines(vec!["y".to_string()]))
        );
        assert_eq!(shell.execute(Command::Pwd), Ok(Output::Line("/".into())));
        assert!(shell.execute(Command::Cat { path: "x".into() }).is_err());
    }

    #[test]
    fn reader_prints_prompt_before_each_line() {
        let input = Cursor::new("mkdir a\npwd\n");
        let mut shell = Shell::new(Vec::new()).with_prompt(Some("$ ".into()));
        shell.run_reader(input).unwrap();
        let output = String::from_utf8(shell.into_inner()).unwrap();
        assert_eq!(output, "$ $ /\n$ ");
    }

    #[test]
    fn reader_without_prompt_only_prints_results() {
        let input = Cursor::new("touch x\nwrite x 1\ntouch y\nwrite y 2\nmv x y\ncat y\ncat x\n");
        let mut shell = Shell::new(Vec::new());
        shell.run_reader(input).unwrap();
        let output = String::from_utf8(shell.into_inner()).unwrap();
        assert_eq!(output, "1\nFile not found: x\n");
    }

    #[test]
    fn colored_errors_keep_the_message() {
        colored::control::set_override(true);
        let mut shell = Shell::new(Vec::new()).with_color(true);
        shell.run_line("cd nowhere").unwrap();
        let output = String::from_utf8(shell.into_inner()).unwrap();
        assert!(output.contains("Directory not found: nowhere"));
        assert!(output.starts_with('\u{1b}'));
    }
}
