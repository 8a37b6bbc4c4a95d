//! Interactive shell session.
//!
//! A [`Shell`] owns everything one user session mutates: the filesystem, the
//! environment, the input history and the command registry. Lines are parsed
//! in full before anything runs, so a syntax, expansion or glob error in any
//! statement aborts the whole line.

use tracing::{debug, warn};

use crate::config::{APP_NAME, ShellConfig, exit_codes, keys};
use crate::core::commands::Commands;
use crate::core::env::Environment;
use crate::core::error::FsError;
use crate::core::filesystem::VirtualFs;
use crate::core::history::InputHistory;
use crate::core::parser::InputParser;
use crate::core::streams::{BufferOutputStream, OutputStream, StreamSet};
use crate::models::{FileMode, InputArgs, Node, RedirectTarget, VfsPath};

/// Stream numbers commands write to.
const STDOUT: u32 = 1;
const STDERR: u32 = 2;

pub struct Shell {
    pub fs: VirtualFs,
    pub env: Environment,
    pub history: InputHistory,
    pub commands: Commands,
}

impl Shell {
    /// A fresh session with an empty filesystem holding only the home directory.
    pub fn new(config: &ShellConfig) -> Self {
        Self::with_filesystem(config, VirtualFs::new())
    }

    /// A session over an existing filesystem.
    ///
    /// The home directory is created if it is missing and the working
    /// directory starts there.
    pub fn with_filesystem(config: &ShellConfig, mut fs: VirtualFs) -> Self {
        let home = VfsPath::new(&config.home);
        if !fs.is_directory(&home)
            && let Err(e) = fs.add(&home, Node::directory(), true)
        {
            warn!(home = %home, error = %e, "could not create home directory");
        }

        let mut env = Environment::new();
        for (key, value) in &config.variables {
            if let Err(e) = env.set(key, value) {
                warn!(error = %e, "ignoring configured variable");
            }
        }
        env.set_special(keys::USER, config.user.as_str());
        env.set_special(keys::HOME, home.as_str());
        env.set_special(keys::CWD, home.as_str());
        env.set_special(keys::STATUS, exit_codes::OK.to_string());

        Self {
            fs,
            env,
            history: InputHistory::new(config.history_size),
            commands: Commands::builtins(),
        }
    }

    pub fn cwd(&self) -> VfsPath {
        VfsPath::new(self.env.get_or_default(keys::CWD, "/"))
    }

    pub fn home(&self) -> VfsPath {
        VfsPath::new(self.env.get_or_default(keys::HOME, "/"))
    }

    /// Interpret a user-supplied path against the working directory.
    pub fn resolve(&self, path: &str) -> VfsPath {
        VfsPath::interpret(&self.cwd(), path)
    }

    /// Prompt in the form `user@minish:~/dir$ `.
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.env.get_or_default(keys::USER, ""),
            APP_NAME,
            self.cwd().to_display(&self.home())
        )
    }

    /// Record `line` in the history and run it.
    pub fn execute(&mut self, line: &str, streams: &mut StreamSet) -> i32 {
        self.history.add(line);
        self.run_line(line, streams)
    }

    /// Run every statement of `line` without touching the history.
    ///
    /// Returns the status of the last statement. `status` is updated after
    /// each one, so later statements can react to earlier ones. An empty line
    /// succeeds and leaves `status` alone.
    pub fn run_line(&mut self, line: &str, streams: &mut StreamSet) -> i32 {
        let statements = match InputParser::new(&self.env, &self.fs).parse_statements(line) {
            Ok(statements) => statements,
            Err(e) => {
                debug!(line, error = %e, "failed to parse line");
                streams.err.write_line(&format!("{APP_NAME}: {e}"));
                self.set_status(exit_codes::USAGE);
                return exit_codes::USAGE;
            }
        };

        let mut status = exit_codes::OK;
        for input in &statements {
            status = self.run_statement(input, streams);
            self.set_status(status);
        }
        status
    }

    fn set_status(&mut self, status: i32) {
        self.env.set_special(keys::STATUS, status.to_string());
    }

    fn run_statement(&mut self, input: &InputArgs, streams: &mut StreamSet) -> i32 {
        let mut out_target = None;
        let mut err_target = None;
        for (&stream, target) in input.redirect_targets() {
            let path = match self.prepare_redirect(target) {
                Ok(path) => path,
                Err(e) => {
                    streams.err.write_line(&format!("{APP_NAME}: {e}"));
                    return exit_codes::FAILURE;
                }
            };
            match stream {
                STDOUT => out_target = Some(path),
                STDERR => err_target = Some(path),
                _ => debug!(stream, "redirect of unused stream"),
            }
        }

        let mut out_buffer = BufferOutputStream::new();
        let mut err_buffer = BufferOutputStream::new();
        let status = {
            let out: &mut dyn OutputStream = if out_target.is_some() {
                &mut out_buffer
            } else {
                &mut *streams.out
            };
            let err: &mut dyn OutputStream = if err_target.is_some() {
                &mut err_buffer
            } else {
                &mut *streams.err
            };
            let mut redirected = StreamSet::new(&mut *streams.ins, out, err);
            Commands::execute(self, input, &mut redirected)
        };

        for (target, buffer) in [(out_target, out_buffer), (err_target, err_buffer)] {
            if let Some(path) = target {
                self.append_output(&path, buffer.contents());
            }
        }
        status
    }

    /// Create or truncate a redirect target before the command runs.
    fn prepare_redirect(&mut self, target: &RedirectTarget) -> Result<VfsPath, FsError> {
        let path = self.resolve(target.path());
        match self.fs.get_mut(&path) {
            Some(Node::Directory(_)) => return Err(FsError::IsADirectory(path)),
            Some(Node::File(file)) => {
                if !target.is_append() {
                    file.open(FileMode::Write);
                }
            }
            None => self.fs.add(&path, Node::file(""), false)?,
        }
        Ok(path)
    }

    fn append_output(&mut self, path: &VfsPath, contents: &str) {
        match self.fs.get_mut(path).and_then(Node::as_file_mut) {
            Some(file) => file.open(FileMode::Append).write(contents),
            None => warn!(path = %path, "redirect target disappeared before output was written"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::streams::BufferInputStream;

    fn run(shell: &mut Shell, line: &str) -> (i32, String, String) {
        let mut ins = BufferInputStream::default();
        let mut out = BufferOutputStream::new();
        let mut err = BufferOutputStream::new();
        let status = {
            let mut streams = StreamSet::new(&mut ins, &mut out, &mut err);
            shell.execute(line, &mut streams)
        };
        (status, out.into_contents(), err.into_contents())
    }

    fn contents(shell: &Shell, path: &str) -> Option<String> {
        shell
            .fs
            .get(&shell.resolve(path))
            .and_then(Node::as_file)
            .map(|file| file.contents().to_string())
    }

    #[test]
    fn test_new_session() {
        let shell = Shell::new(&ShellConfig::default());
        assert!(shell.fs.is_directory(&VfsPath::new("/home/user")));
        assert_eq!(shell.cwd(), VfsPath::new("/home/user"));
        assert_eq!(shell.env.status(), 0);
        assert_eq!(shell.prompt(), "user@minish:~$ ");
    }

    #[test]
    fn test_configured_variables() {
        let mut config = ShellConfig::default();
        config.variables.insert("editor".into(), "vim".into());
        config.variables.insert("cwd".into(), "/etc".into());
        let shell = Shell::new(&config);
        assert_eq!(shell.env.get("editor"), Some("vim"));
        assert_eq!(shell.cwd(), VfsPath::new("/home/user"));
    }

    #[test]
    fn test_prompt_follows_cwd() {
        let mut shell = Shell::new(&ShellConfig::default());
        run(&mut shell, "mkdir docs; cd docs");
        assert_eq!(shell.prompt(), "user@minish:~/docs$ ");
        run(&mut shell, "cd /");
        assert_eq!(shell.prompt(), "user@minish:/$ ");
    }

    #[test]
    fn test_redirect_write_and_append() {
        let mut shell = Shell::new(&ShellConfig::default());
        let (status, out, _) = run(&mut shell, "echo one > log");
        assert_eq!(status, 0);
        assert!(out.is_empty());
        assert_eq!(contents(&shell, "log").as_deref(), Some("one\n"));

        run(&mut shell, "echo two >> log");
        assert_eq!(contents(&shell, "log").as_deref(), Some("one\ntwo\n"));

        run(&mut shell, "echo three > log");
        assert_eq!(contents(&shell, "log").as_deref(), Some("three\n"));
    }

    #[test]
    fn test_redirect_stderr() {
        let mut shell = Shell::new(&ShellConfig::default());
        let (status, _, err) = run(&mut shell, "cat missing 2> errors");
        assert_eq!(status, exit_codes::FAILURE);
        assert!(err.is_empty());
        assert!(contents(&shell, "errors").unwrap().starts_with("cat: "));
    }

    #[test]
    fn test_redirect_target_created_even_without_output() {
        let mut shell = Shell::new(&ShellConfig::default());
        run(&mut shell, "cd / > marker");
        assert_eq!(contents(&shell, "/home/user/marker").as_deref(), Some(""));
    }

    #[test]
    fn test_redirect_into_directory_fails() {
        let mut shell = Shell::new(&ShellConfig::default());
        run(&mut shell, "mkdir d");
        let (status, out, err) = run(&mut shell, "echo hi > d");
        assert_eq!(status, exit_codes::FAILURE);
        assert!(out.is_empty());
        assert!(err.contains("is a directory"));
    }

    #[test]
    fn test_redirect_missing_parent_fails() {
        let mut shell = Shell::new(&ShellConfig::default());
        let (status, _, err) = run(&mut shell, "echo hi > no/file");
        assert_eq!(status, exit_codes::FAILURE);
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_parse_error_aborts_line() {
        let mut shell = Shell::new(&ShellConfig::default());
        let (status, out, err) = run(&mut shell, "echo first; echo 'open");
        assert_eq!(status, exit_codes::USAGE);
        assert!(out.is_empty());
        assert_eq!(err, "minish: unterminated quote\n");
        assert_eq!(shell.env.status(), exit_codes::USAGE);
    }

    #[test]
    fn test_statements_run_in_order() {
        let mut shell = Shell::new(&ShellConfig::default());
        let (status, out, _) = run(&mut shell, "echo a; cat missing; echo b");
        assert_eq!(status, 0);
        assert_eq!(out, "a\nb\n");
    }

    #[test]
    fn test_status_reflects_last_statement() {
        let mut shell = Shell::new(&ShellConfig::default());
        run(&mut shell, "cat missing");
        assert_eq!(run(&mut shell, "echo $status").1, "1\n");
        run(&mut shell, "nope");
        assert_eq!(run(&mut shell, "echo $status").1, "127\n");
    }

    #[test]
    fn test_history_records_lines() {
        let mut shell = Shell::new(&ShellConfig::default());
        run(&mut shell, "pwd");
        run(&mut shell, "");
        run(&mut shell, "echo 'broken");
        assert_eq!(shell.history.get(0), Some("echo 'broken"));
        assert_eq!(shell.history.get(1), Some("pwd"));
        assert_eq!(shell.history.len(), 2);
    }
}
