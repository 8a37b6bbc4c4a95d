//! Builtins that do not touch the filesystem.

use super::Command;
use crate::config::exit_codes;
use crate::core::parser::escape_argument;
use crate::core::shell::Shell;
use crate::core::streams::StreamSet;
use crate::models::InputArgs;

pub(super) const COMMANDS: &[Command] = &[
    Command {
        name: "and",
        summary: "Run a command if the previous one succeeded",
        usage: "and COMMAND [ARG...]",
        min_args: 1,
        max_args: None,
        fun: execute_and,
    },
    Command {
        name: "or",
        summary: "Run a command if the previous one failed",
        usage: "or COMMAND [ARG...]",
        min_args: 1,
        max_args: None,
        fun: execute_or,
    },
    Command {
        name: "not",
        summary: "Run a command and invert its exit status",
        usage: "not COMMAND [ARG...]",
        min_args: 1,
        max_args: None,
        fun: execute_not,
    },
    Command {
        name: "echo",
        summary: "Print arguments",
        usage: "echo [-n] [TEXT...]",
        min_args: 0,
        max_args: None,
        fun: execute_echo,
    },
    Command {
        name: "help",
        summary: "List commands or describe one",
        usage: "help [COMMAND]",
        min_args: 0,
        max_args: Some(1),
        fun: execute_help,
    },
    Command {
        name: "set",
        summary: "Show, set or unset variables",
        usage: "set [NAME [VALUE]] | set -u NAME",
        min_args: 0,
        max_args: Some(2),
        fun: execute_set,
    },
];

/// Rebuild the arguments as a command line that parses back to them.
fn nested_line(input: &InputArgs) -> String {
    input
        .args()
        .iter()
        .map(|arg| escape_argument(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

fn execute_and(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let status = shell.env.status();
    if status != exit_codes::OK {
        return status;
    }
    shell.run_line(&nested_line(input), streams)
}

fn execute_or(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let status = shell.env.status();
    if status == exit_codes::OK {
        return status;
    }
    shell.run_line(&nested_line(input), streams)
}

fn execute_not(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    match shell.run_line(&nested_line(input), streams) {
        exit_codes::OK => exit_codes::FAILURE,
        _ => exit_codes::OK,
    }
}

fn execute_echo(_: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let text = input.args().join(" ");
    if input.has_option("-n") {
        streams.out.write(&text);
    } else {
        streams.out.write_line(&text);
    }
    exit_codes::OK
}

fn execute_help(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let Some(name) = input.args().first() else {
        let width = shell.commands.names().map(str::len).max().unwrap_or(0);
        for command in shell.commands.iter() {
            streams
                .out
                .write_line(&format!("{:width$}  {}", command.name, command.summary));
        }
        return exit_codes::OK;
    };

    match shell.commands.get(name) {
        Some(command) => {
            streams.out.write_line(command.summary);
            streams.out.write_line(&format!("Usage: {}", command.usage));
            exit_codes::OK
        }
        None => {
            streams
                .err
                .write_line(&format!("help: no help for '{name}'"));
            exit_codes::FAILURE
        }
    }
}

fn execute_set(shell: &mut Shell, input: &InputArgs, streams: &mut StreamSet) -> i32 {
    let args = input.args();

    if input.has_any_option(&["-u", "--unset"]) {
        let [name] = args else {
            streams.err.write_line("set: -u takes exactly one name");
            return exit_codes::USAGE;
        };
        return match shell.env.unset(name) {
            Ok(()) => exit_codes::OK,
            Err(e) => {
                streams.err.write_line(&format!("set: {e}"));
                exit_codes::FAILURE
            }
        };
    }

    match args {
        [] => {
            for (key, value) in shell.env.variables() {
                streams.out.write_line(&format!("{key}={value}"));
            }
            exit_codes::OK
        }
        [name] => match shell.env.get(name) {
            Some(value) => {
                streams.out.write_line(value);
                exit_codes::OK
            }
            None => exit_codes::FAILURE,
        },
        [name, value, ..] => match shell.env.set(name, value) {
            Ok(()) => exit_codes::OK,
            Err(e) => {
                streams.err.write_line(&format!("set: {e}"));
                exit_codes::FAILURE
            }
        },
    }
}
