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

use std::{error::Error, io::Write};

use log::{debug, warn};

use util::{exit_code, for_each_line, ProcessCreator};

pub mod configuration;
pub mod crash_dump;
pub mod failure;

use crate::{
    configuration::Configuration,
    crash_dump::{CrashDump, Debugger, TestParameters},
    failure::{failure_report, is_failure_line},
};

/// Runs a test binary and returns the code to exit with.
///
/// Every line of the test's combined output is passed to `out`; failure lines
/// are also framed on `err`. A nonzero exit looks for a crash dump and, when
/// there is one, debugs it. Dump handling never changes the exit code.
pub fn run(
    configuration: &Configuration,
    debugger: &dyn Debugger,
    arguments: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<i32, Box<dyn Error>> {
    let command = arguments.first().ok_or("No command to run.")?;

    let mut process = ProcessCreator::new_with_arguments(arguments)
        .merge_output(true)
        .create()?;

    let test = TestParameters::new(command, process.id());
    debug!("{:?}", test);

    if let Some(output) = process.take_output() {
        for_each_line(output, |line| {
            if is_failure_line(line) {
                err.write_all(&failure_report(&test.name, line))?;
            }
            out.write_all(line)?;
            out.write_all(b"\n")
        })?;
    }

    let exit_code = exit_code(process.wait()?);
    if exit_code == 0 {
        return Ok(exit_code);
    }

    debug!("{} exited with {}", test.name, exit_code);
    if let Some(dump) = CrashDump::locate(configuration, &test) {
        if let Err(error) = dump.collect(debugger, out) {
            warn!(
                "unable to collect crash dump {}: {}",
                dump.path().display(),
                error
            );
        }
    }

    Ok(exit_code)
}

#[cfg(all(test, unix))]
mod tests {
    use std::{fs, path::PathBuf};

    use super::run;
    use crate::{configuration::Configuration, crash_dump::MockDebugger};

    fn arguments(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    fn run_script(
        configuration: &Configuration,
        debugger: &MockDebugger,
        script: &str,
    ) -> (i32, String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(configuration, debugger, &arguments(script), &mut out, &mut err).unwrap();

        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn unused_debugger() -> MockDebugger {
        let mut debugger = MockDebugger::new();
        debugger.expect_run().times(0);
        debugger
    }

    #[test]
    fn failure_lines_are_duplicated() {
        let script = "echo 'a.cpp:1: error: boom'; \
                      echo 'DEBUG: retry after error: timeout'; \
                      echo 'fatal: disk' >&2; \
                      echo done";

        let (code, out, err) = run_script(&Configuration::unix(), &unused_debugger(), script);

        assert_eq!(0, code);
        assert_eq!(
            "a.cpp:1: error: boom\nDEBUG: retry after error: timeout\nfatal: disk\ndone\n",
            out
        );
        assert!(err.contains("######### Failure in sh #########\n a.cpp:1: error: boom \n"));
        assert!(err.contains("######### Failure in sh #########\n fatal: disk \n"));
        assert!(!err.contains("DEBUG"));
        assert!(!err.contains("done"));
    }

    #[test]
    fn success_never_looks_for_a_dump() {
        let directory = tempfile::tempdir().unwrap();
        let dump = directory.path().join("core.dump");
        fs::write(&dump, b"core").unwrap();

        let configuration = Configuration {
            dump_file: dump.to_string_lossy().into_owned(),
            debugger: vec!["gdb".to_string()],
        };

        let (code, out, _) = run_script(&configuration, &unused_debugger(), "echo ok");

        assert_eq!(0, code);
        assert_eq!("ok\n", out);
        assert!(dump.exists());
    }

    #[test]
    fn missing_dump_is_skipped() {
        let directory = tempfile::tempdir().unwrap();
        let configuration = Configuration {
            dump_file: directory
                .path()
                .join("core.{pid}")
                .to_string_lossy()
                .into_owned(),
            debugger: vec!["gdb".to_string()],
        };

        let (code, out, _) = run_script(&configuration, &unused_debugger(), "echo bye; exit 3");

        assert_eq!(3, code);
        assert_eq!("bye\n", out);
    }

    #[test]
    fn signal_exit_is_propagated() {
        let directory = tempfile::tempdir().unwrap();
        let configuration = Configuration {
            dump_file: directory
                .path()
                .join("core.{pid}")
                .to_string_lossy()
                .into_owned(),
            debugger: vec!["gdb".to_string()],
        };

        let (code, _, _) = run_script(&configuration, &unused_debugger(), "kill -TERM $$");

        assert_eq!(-15, code);
    }

    #[test]
    fn code_page_bytes_pass_through() {
        let script = "printf 'caf\\351.cpp:1: error: boom\\n'";

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            &Configuration::unix(),
            &unused_debugger(),
            &arguments(script),
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(0, code);
        assert_eq!(b"caf\xe9.cpp:1: error: boom\n".to_vec(), out);
        assert!(err
            .windows(b" caf\xe9.cpp:1: error: boom \n".len())
            .any(|window| window == b" caf\xe9.cpp:1: error: boom \n"));
    }

    /// A scratch tree with the test binary at `bin/sh` and dumps written to
    /// `dumps/core.{pid}`.
    struct DumpTree {
        root: tempfile::TempDir,
    }

    impl DumpTree {
        fn new() -> Self {
            let root = tempfile::tempdir().unwrap();
            fs::create_dir(root.path().join("bin")).unwrap();
            fs::create_dir(root.path().join("dumps")).unwrap();
            std::os::unix::fs::symlink("/bin/sh", root.path().join("bin").join("sh")).unwrap();
            Self { root }
        }

        fn path(&self, relative: &str) -> PathBuf {
            self.root.path().join(relative)
        }

        fn configuration(&self) -> Configuration {
            Configuration {
                dump_file: self.path("dumps/core.{pid}").to_string_lossy().into_owned(),
                debugger: vec![
                    "gdb".to_string(),
                    "{testfile}".to_string(),
                    "{dumpfile}".to_string(),
                ],
            }
        }

        fn arguments(&self, script: &str) -> Vec<String> {
            vec![
                self.path("bin/sh").to_string_lossy().into_owned(),
                "-c".to_string(),
                script.to_string(),
            ]
        }

        fn crash_script(&self, after_dump: &str) -> String {
            format!(
                "touch '{}/core.'$$; {} exit 4",
                self.path("dumps").display(),
                after_dump
            )
        }

        fn dumps(&self, directory: &str) -> Vec<String> {
            fs::read_dir(self.path(directory))
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
                .filter(|name| name.starts_with("core."))
                .collect()
        }
    }

    fn debugger_called_once() -> MockDebugger {
        let mut debugger = MockDebugger::new();
        debugger.expect_run().times(1).returning(|_| Ok(()));
        debugger
    }

    #[test]
    fn dump_is_debugged_and_moved_next_to_the_test() {
        let tree = DumpTree::new();

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            &tree.configuration(),
            &debugger_called_once(),
            &tree.arguments(&tree.crash_script("")),
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(4, code);
        assert!(tree.dumps("dumps").is_empty());
        assert_eq!(1, tree.dumps("bin").len());

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("!!!!! crash dump file "));
        assert!(out.contains(" found\n"));
        assert!(out.contains(&format!(
            "!!!!! crash dump file upload path is {}",
            tree.path("bin").join(&tree.dumps("bin")[0]).display()
        )));
    }

    #[test]
    fn failed_dump_move_keeps_exit_code() {
        let tree = DumpTree::new();

        // the test's directory is gone by the time the dump is moved
        let script = tree.crash_script(&format!("rm -rf '{}';", tree.path("bin").display()));

        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = run(
            &tree.configuration(),
            &debugger_called_once(),
            &tree.arguments(&script),
            &mut out,
            &mut err,
        )
        .unwrap();

        assert_eq!(4, code);
        assert_eq!(1, tree.dumps("dumps").len());
    }

    #[test]
    fn empty_command_is_an_error() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = run(
            &Configuration::unix(),
            &unused_debugger(),
            &[],
            &mut out,
            &mut err,
        );

        assert!(result.is_err());
    }
}
