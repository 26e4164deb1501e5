use std::{
    error::Error,
    io::{self, BufRead, BufReader, PipeReader},
    process::{Child, Command, ExitStatus},
};

use itertools::Itertools;
use log::debug;

#[derive(Debug, Clone)]
pub struct ProcessCreator {
    arguments: Vec<String>,
    merge_output: bool,
}

impl ProcessCreator {
    pub fn new_with_arguments<I, A>(arguments: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        Self {
            arguments: arguments
                .into_iter()
                .map(|argument| argument.as_ref().to_string())
                .collect(),
            merge_output: false,
        }
    }

    /// Sends both stdout and stderr of the child into a single pipe that is
    /// handed back through [`Process::take_output`].
    pub fn merge_output(mut self, value: bool) -> ProcessCreator {
        self.merge_output = value;
        self
    }

    pub fn command_line(&self) -> String {
        self.arguments
            .iter()
            .map(quote_argument)
            .join(" ")
    }

    pub fn create(&self) -> Result<Process, Box<dyn Error>> {
        let (program, arguments) = self
            .arguments
            .split_first()
            .ok_or("Cannot create a process from an empty command line.")?;

        debug!("spawning: {}", self.command_line());

        // The command owns the write ends of the pipe and has to be gone
        // before the reader can ever see end of file.
        let (child, output) = {
            let mut command = Command::new(program);
            command.args(arguments);

            if self.merge_output {
                let (reader, writer) = io::pipe()?;
                command.stdout(writer.try_clone()?).stderr(writer);
                (command.spawn()?, Some(reader))
            } else {
                (command.spawn()?, None)
            }
        };

        Ok(Process { child, output })
    }
}

#[derive(Debug)]
pub struct Process {
    child: Child,
    output: Option<PipeReader>,
}

impl Process {
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    pub fn take_output(&mut self) -> Option<BufReader<PipeReader>> {
        self.output.take().map(BufReader::new)
    }

    pub fn wait(mut self) -> io::Result<ExitStatus> {
        // Drop an unread pipe so a chatty child cannot block on a full buffer.
        self.output = None;
        self.child.wait()
    }
}

/// Feeds `reader` to `handler` one line at a time.
///
/// Lines are handed over as raw bytes, since compilers happily print paths in
/// whatever code page the console uses. Trailing whitespace, including the
/// line terminator, is stripped.
pub fn for_each_line<R, F>(mut reader: R, mut handler: F) -> io::Result<()>
where
    R: BufRead,
    F: FnMut(&[u8]) -> io::Result<()>,
{
    let mut buffer = Vec::new();
    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            return Ok(());
        }

        handler(buffer.trim_ascii_end())?;
    }
}

/// Maps a child's exit status to the code this process should exit with.
///
/// A child killed by signal `n` yields `-n`.
pub fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => signal_exit_code(status),
    }
}

#[cfg(unix)]
fn signal_exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status.signal().map(|signal| -signal).unwrap_or(1)
}

#[cfg(not(unix))]
fn signal_exit_code(_status: ExitStatus) -> i32 {
    1
}

/// Quotes `argument` the way the host's shell would need it.
///
/// Only used to show command lines to humans; spawning passes the arguments
/// through untouched.
pub fn quote_argument(argument: impl AsRef<str>) -> String {
    quote_for_host(argument.as_ref())
}

#[cfg(unix)]
fn quote_for_host(argument: &str) -> String {
    let plain = |c: char| c.is_ascii_alphanumeric() || "_@%+=:,./-".contains(c);
    if !argument.is_empty() && argument.chars().all(plain) {
        return argument.to_string();
    }

    format!("'{}'", argument.replace('\'', "'\\''"))
}

// CommandLineToArgvW rules
#[cfg(not(unix))]
fn quote_for_host(argument: &str) -> String {
    if !argument.is_empty() && !argument.contains(|c: char| c.is_whitespace() || c == '"') {
        return argument.to_string();
    }

    let mut result = String::with_capacity(argument.len() + 2);
    result.push('"');

    let mut iterator = argument.chars().peekable();
    loop {
        let mut backslashes = 0usize;
        while let Some('\\') = iterator.peek() {
            iterator.next();
            backslashes += 1;
        }

        match iterator.next() {
            Some('"') => {
                result.extend(std::iter::repeat('\\').take(backslashes * 2 + 1));
                result.push('"');
            }
            Some(char) => {
                result.extend(std::iter::repeat('\\').take(backslashes));
                result.push(char);
            }
            None => {
                // the closing quote must stay a metacharacter
                result.extend(std::iter::repeat('\\').take(backslashes * 2));
                break;
            }
        }
    }

    result.push('"');
    result
}
