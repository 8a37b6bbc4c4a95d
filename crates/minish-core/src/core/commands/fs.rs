//! Filesystem builtins.
//!
//! Paths given on the command line are resolved against `cwd`. A failure on
//! one operand is reported and the remaining operands are still processed;
//! the exit status is then [`exit_codes::FAILURE`].

use std::fmt::Display;

use super::Command;
use crate::config::{exit_codes, keys};
use crate::core::error::FsError;
use crate::core::shell::Shell;
use crate::core::streams::StreamSet;
use crate::models::{InputArgs, Node, VfsPath};

pub(super) const COMMANDS: &[Command] = &[
    Command {
        name: "cat",
        summary: "Print file contents",
        usage: "cat FILE...",
        min_args: 1,
        max_args: None,
        fun: execute_cat,
    },
    Command {
        name: "cd",
        summary: "Change the working directory",
        usage: "cd [DIRECTORY]",
        min_args: 0,
        max_args: Some(1),
        fun: execute_cd,
    },
    Command {
        name: "cp",
        summary: "Copy files and directories",
        usage: "cp [-r] SOURCE... DESTINATION",
        min_args: 2,
        max_args: None,
        fun: execute_cp,
    },
    Command {
        name: "ls",
        summary: "List directory contents",
        usage: "ls [-a] [PATH...]",
        min_args: 0,
        max_args: None,
        fun: execute_ls,
    },
    Command {
        name: "mkdir",
        summary: "Create directories",
        usage: "mkdir [-p] DIRECTORY...",
        min_args: 1,
        max_args: None,
        fun: execute_mkdir,
    },
    Command {
        name: "mv",
        summary: "Move or rename files and directories",
        usage: "mv SOURCE... DESTINATION",
        min_args: 2,
        max_args: None,
        fun: execute_mv,
    },
    Command {
        name: "pwd",
        summary: "Print the working directory",
        usage: "pwd",
        min_args: 0,
        max_args: Some(0),
        fun: execute_pwd,
    },
    Command {
        name: "rm",
        summary: "Remove files and directories",
        usage: "rm [-r] [-f] PATH...",
        min_args: 1,
        max_args: None,
        fun: execute_rm,
    },
    Command {
        name: "touch",
        summary: "Create empty files",
        usage: "touch FILE...",
        min_args: 1,
        max_args: None,
        fun: execute_touch,
    },
];

const RECURSIVE: &[&str] = &["-r", "-R", "--recursive"];

/// Write `name: error` to stderr and return the failure status.
fn report(streams: &mut StreamSet, name: &str, error: impl Display) -> i32 {
    streams.err.write_line(&format!("{name}: {error}"));
    exit_codes::FAILURE
}

fn execute_cat(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let mut status = exit_codes::OK;
    for arg in input.args() {
        let path = shell.resolve(arg);
        match shell.fs.get(&path) {
            Some(Node::File(file)) => streams.out.write(file.contents()),
            Some(Node::Directory(_)) => status = report(streams, "cat", FsError::IsADirectory(path)),
            None => status = report(streams, "cat", FsError::NotFound(path)),
        }
    }
    status
}

fn execute_cd(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let target = match input.args().first() {
        Some(arg) => shell.resolve(arg),
        None => shell.home(),
    };
    match shell.fs.get(&target) {
        Some(Node::Directory(_)) => {
            shell.env.set_special(keys::CWD, target.as_str());
            exit_codes::OK
        }
        Some(Node::File(_)) => report(streams, "cd", FsError::NotADirectory(target)),
        None => report(streams, "cd", FsError::NotFound(target)),
    }
}

/// Split `SOURCE... DESTINATION` operands into resolved paths.
fn sources_and_destination(shell: &Shell, input: &InputArgs) -> (Vec<VfsPath>, VfsPath) {
    let args = input.args();
    let (destination, sources) = match args.split_last() {
        Some((last, rest)) => (shell.resolve(last), rest),
        None => (shell.cwd(), args),
    };
    let sources = sources.iter().map(|arg| shell.resolve(arg)).collect();
    (sources, destination)
}

fn execute_cp(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let recursive = input.has_any_option(RECURSIVE);
    let (sources, destination) = sources_and_destination(shell, input);

    let mappings = match shell.fs.determine_move_mappings(&sources, &destination) {
        Ok(mappings) => mappings,
        Err(e) => return report(streams, "cp", e),
    };

    let mut status = exit_codes::OK;
    for (source, target) in mappings {
        if let Err(e) = shell.fs.copy(&source, &target, recursive) {
            status = report(streams, "cp", e);
        }
    }
    status
}

fn execute_mv(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let (sources, destination) = sources_and_destination(shell, input);

    let mappings = match shell.fs.determine_move_mappings(&sources, &destination) {
        Ok(mappings) => mappings,
        Err(e) => return report(streams, "mv", e),
    };

    let mut status = exit_codes::OK;
    for (source, target) in mappings {
        if let Err(e) = shell.fs.move_node(&source, &target) {
            status = report(streams, "mv", e);
        }
    }
    status
}

fn execute_ls(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let show_all = input.has_any_option(&["-a", "--all"]);
    let targets: Vec<&str> = if input.args().is_empty() {
        vec!["."]
    } else {
        input.args().iter().map(String::as_str).collect()
    };

    let mut status = exit_codes::OK;
    for (i, arg) in targets.iter().enumerate() {
        let path = shell.resolve(arg);
        match shell.fs.get(&path) {
            Some(Node::File(_)) => streams.out.write_line(arg),
            Some(Node::Directory(dir)) => {
                if targets.len() > 1 {
                    if i > 0 {
                        streams.out.write_line("");
                    }
                    streams.out.write_line(&format!("{arg}:"));
                }
                if show_all {
                    streams.out.write_line("./");
                    streams.out.write_line("../");
                }
                for (name, node) in dir.nodes() {
                    if name.starts_with('.') && !show_all {
                        continue;
                    }
                    if node.is_directory() {
                        streams.out.write_line(&format!("{name}/"));
                    } else {
                        streams.out.write_line(name);
                    }
                }
            }
            None => status = report(streams, "ls", FsError::NotFound(path)),
        }
    }
    status
}

fn execute_mkdir(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let parents = input.has_any_option(&["-p", "--parents"]);
    let mut status = exit_codes::OK;
    for arg in input.args() {
        let path = shell.resolve(arg);
        if parents && shell.fs.is_directory(&path) {
            continue;
        }
        if let Err(e) = shell.fs.add(&path, Node::directory(), parents) {
            status = report(streams, "mkdir", e);
        }
    }
    status
}

fn execute_pwd(shell: &mut Shell, _: &InputArgs, streams: &mut StreamSet) -> i32 {
    streams.out.write_line(shell.cwd().trimmed());
    exit_codes::OK
}

fn execute_rm(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let recursive = input.has_any_option(RECURSIVE);
    let force = input.has_any_option(&["-f", "--force"]);

    let mut status = exit_codes::OK;
    for arg in input.args() {
        let path = shell.resolve(arg);
        if path.is_root() {
            tracing::warn!("refusing to remove the root directory");
            status = report(streams, "rm", "refusing to remove '/'");
            continue;
        }
        match shell.fs.get(&path).map(Node::is_directory) {
            None if force => {}
            None => status = report(streams, "rm", FsError::NotFound(path)),
            Some(true) if !recursive => {
                status = report(streams, "rm", FsError::IsDirectoryWithoutRecursive(path));
            }
            Some(_) => {
                if let Err(e) = shell.fs.remove(&path) {
                    status = report(streams, "rm", e);
                }
            }
        }
    }
    status
}

fn execute_touch(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let mut status = exit_codes::OK;
    for arg in input.args() {
        let path = shell.resolve(arg);
        if shell.fs.has(&path) {
            continue;
        }
        if let Err(e) = shell.fs.add(&path, Node::file(""), false) {
            status = report(streams, "touch", e);
        }
    }
    status
}

// =============================================================================
// Tests
// =============================================================================
