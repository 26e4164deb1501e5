/*
   This file is part of bltools.

   bltools is a collection of build and CI helpers for the baselib tree.

   bltools is free software: you can redistribute it and/or modify
   it under the terms of the GNU General Public License as published by
   the Free Software Foundation, either version 3 of the License, or
   (at your option) any later version.

   bltools is distributed in the hope that it will be useful,
   but WITHOUT ANY WARRANTY; without even the implied warranty of
   MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
   GNU General Public License for more details.

   You should have received a copy of the GNU General Public License
   along with bltools.  If not, see <https://www.gnu.org/licenses/>.
*/

use std::{
    error::Error,
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, warn};
#[cfg(test)]
use mockall::automock;

use util::{exit_code, substitute, ProcessCreator};

use crate::configuration::{Configuration, DUMP_FILE, PID, TEST_DIR, TEST_FILE, TEST_NAME};

/// What the dump and debugger templates get filled in with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestParameters {
    pub file: String,
    pub name: String,
    pub directory: String,
    pub pid: u32,
}

impl TestParameters {
    pub fn new(command: &str, pid: u32) -> Self {
        let path = Path::new(command);

        Self {
            file: command.to_string(),
            name: path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            directory: path
                .parent()
                .map(|parent| parent.to_string_lossy().into_owned())
                .unwrap_or_default(),
            pid,
        }
    }

    fn replacements(&self) -> Vec<(&'static str, String)> {
        vec![
            (PID, self.pid.to_string()),
            (TEST_NAME, self.name.clone()),
            (TEST_FILE, self.file.clone()),
            (TEST_DIR, self.directory.clone()),
        ]
    }
}

#[cfg_attr(test, automock)]
pub trait Debugger {
    fn run(&self, command_line: &[String]) -> Result<(), Box<dyn Error>>;
}

/// Runs the debugger with the harness's own stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessDebugger;

impl Debugger for ProcessDebugger {
    fn run(&self, command_line: &[String]) -> Result<(), Box<dyn Error>> {
        let status = ProcessCreator::new_with_arguments(command_line)
            .create()?
            .wait()?;

        if !status.success() {
            warn!("debugger exited with {}", exit_code(status));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrashDump {
    path: PathBuf,
    destination: PathBuf,
    debugger: Vec<String>,
}

impl CrashDump {
    /// Fills in the templates for `test`; `None` when no dump was written.
    pub fn locate(configuration: &Configuration, test: &TestParameters) -> Option<Self> {
        let mut replacements = test.replacements();

        let path = substitute(&configuration.dump_file, &replacements);
        if !Path::new(&path).exists() {
            debug!("no crash dump at {}", path);
            return None;
        }

        replacements.push((DUMP_FILE, path.clone()));
        let debugger = configuration
            .debugger
            .iter()
            .map(|argument| substitute(argument, &replacements))
            .collect();

        let path = PathBuf::from(path);
        let destination = Path::new(&test.directory).join(path.file_name()?);

        Some(Self {
            path,
            destination,
            debugger,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Prints a backtrace from the dump and moves it next to the test.
    ///
    /// A debugger that fails to start is only worth a warning; the dump is
    /// still moved so it can be picked up later.
    pub fn collect(
        &self,
        debugger: &dyn Debugger,
        out: &mut dyn Write,
    ) -> Result<(), Box<dyn Error>> {
        writeln!(out, "!!!!! crash dump file {} found", self.path.display())?;

        if let Err(error) = debugger.run(&self.debugger) {
            warn!("unable to run {}: {}", self.debugger.join(" "), error);
        }

        writeln!(
            out,
            "!!!!! crash dump file upload path is {}",
            self.destination.display()
        )?;

        move_file(&self.path, &self.destination)?;

        Ok(())
    }
}

fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if from == to {
        return Ok(());
    }

    if let Err(error) = fs::rename(from, to) {
        // rename does not cross file systems
        debug!("rename {} failed ({}), copying", from.display(), error);
        fs::copy(from, to)?;
        fs::remove_file(from)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{CrashDump, MockDebugger, TestParameters};
    use crate::configuration::Configuration;

    fn configuration() -> Configuration {
        Configuration {
            dump_file: "{testdir}/dumps/{testname}.{pid}.dmp".to_string(),
            debugger: vec![
                "gdb".to_string(),
                "--batch".to_string(),
                "{testfile}".to_string(),
                "{dumpfile}".to_string(),
            ],
        }
    }

    #[test]
    fn parameters_from_command() {
        let sut = TestParameters::new("bld/utests/utf_baselib", 42);

        assert_eq!("bld/utests/utf_baselib", sut.file);
        assert_eq!("utf_baselib", sut.name);
        assert_eq!("bld/utests", sut.directory);
        assert_eq!(42, sut.pid);
    }

    #[test]
    fn parameters_without_directory() {
        let sut = TestParameters::new("utf_baselib", 7);

        assert_eq!("utf_baselib", sut.name);
        assert_eq!("", sut.directory);
    }

    #[test]
    fn missing_dump_is_not_located() {
        let directory = tempfile::tempdir().unwrap();
        let command = directory.path().join("utf_baselib");
        let test = TestParameters::new(&command.to_string_lossy(), 42);

        assert_eq!(None, CrashDump::locate(&configuration(), &test));
    }

    #[test]
    fn dump_is_debugged_and_moved() {
        let directory = tempfile::tempdir().unwrap();
        let command = directory.path().join("utf_baselib");
        let test = TestParameters::new(&command.to_string_lossy(), 42);

        let dump = directory.path().join("dumps").join("utf_baselib.42.dmp");
        fs::create_dir_all(dump.parent().unwrap()).unwrap();
        fs::write(&dump, b"core").unwrap();

        let sut = CrashDump::locate(&configuration(), &test).unwrap();
        let destination = directory.path().join("utf_baselib.42.dmp");
        assert_eq!(dump.as_path(), sut.path());
        assert_eq!(destination.as_path(), sut.destination());

        let expected = vec![
            "gdb".to_string(),
            "--batch".to_string(),
            command.to_string_lossy().into_owned(),
            dump.to_string_lossy().into_owned(),
        ];
        let mut debugger = MockDebugger::new();
        debugger
            .expect_run()
            .times(1)
            .returning(move |command_line| {
                assert_eq!(expected, command_line);
                Ok(())
            });

        let mut out = Vec::new();
        sut.collect(&debugger, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains(&format!("!!!!! crash dump file {} found", dump.display())));
        assert!(out.contains(&format!(
            "!!!!! crash dump file upload path is {}",
            destination.display()
        )));
        assert!(!dump.exists());
        assert_eq!(b"core".to_vec(), fs::read(&destination).unwrap());
    }

    #[test]
    fn debugger_failure_still_moves_dump() {
        let directory = tempfile::tempdir().unwrap();
        let command = directory.path().join("utf_baselib");
        let test = TestParameters::new(&command.to_string_lossy(), 9);

        let dump = directory.path().join("dumps").join("utf_baselib.9.dmp");
        fs::create_dir_all(dump.parent().unwrap()).unwrap();
        fs::write(&dump, b"core").unwrap();

        let mut debugger = MockDebugger::new();
        debugger
            .expect_run()
            .times(1)
            .returning(|_| Err("gdb: not found".into()));

        let sut = CrashDump::locate(&configuration(), &test).unwrap();
        sut.collect(&debugger, &mut Vec::new()).unwrap();

        assert!(!dump.exists());
        assert!(directory.path().join("utf_baselib.9.dmp").exists());
    }
}
