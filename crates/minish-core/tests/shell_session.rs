//! End-to-end sessions driving a full shell through its public API.

use minish_core::config::{ShellConfig, exit_codes};
use minish_core::core::streams::{BufferInputStream, BufferOutputStream, StreamSet};
use minish_core::core::{AutocompleteResult, Shell, VirtualFs, autocomplete};
use minish_core::models::{Node, VfsPath};

struct Outcome {
    status: i32,
    out: String,
    err: String,
}

fn run(shell: &mut Shell, line: &str) -> Outcome {
    let mut ins = BufferInputStream::default();
    let mut out = BufferOutputStream::new();
    let mut err = BufferOutputStream::new();
    let status = {
        let mut streams = StreamSet::new(&mut ins, &mut out, &mut err);
        shell.execute(line, &mut streams)
    };
    Outcome {
        status,
        out: out.into_contents(),
        err: err.into_contents(),
    }
}

fn file_contents(shell: &Shell, path: &str) -> String {
    shell
        .fs
        .get(&VfsPath::new(path))
        .and_then(Node::as_file)
        .map(|file| file.contents().to_string())
        .unwrap_or_else(|| panic!("no file at {path}"))
}

#[test]
fn test_build_project_tree() {
    let mut shell = Shell::new(&ShellConfig::default());

    let outcome = run(
        &mut shell,
        "mkdir -p project/src; cd project; echo 'fn main() {}' > src/main.rs; touch README",
    );
    assert_eq!(outcome.status, exit_codes::OK, "stderr: {}", outcome.err);

    assert_eq!(run(&mut shell, "pwd").out, "/home/user/project\n");
    assert_eq!(run(&mut shell, "ls").out, "README\nsrc/\n");
    assert_eq!(
        file_contents(&shell, "/home/user/project/src/main.rs"),
        "fn main() {}\n"
    );
    assert_eq!(shell.prompt(), "user@minish:~/project$ ");
}

#[test]
fn test_glob_copy_and_move() {
    let mut shell = Shell::new(&ShellConfig::default());
    run(&mut shell, "echo a > a.txt; echo b > b.txt; echo c > c.md; mkdir out");

    let outcome = run(&mut shell, "cp *.txt out");
    assert_eq!(outcome.status, exit_codes::OK, "stderr: {}", outcome.err);
    assert_eq!(run(&mut shell, "ls out").out, "a.txt\nb.txt\n");

    run(&mut shell, "mv out/* .. ");
    assert_eq!(run(&mut shell, "ls ..").out, "a.txt\nb.txt\nuser/\n");
    assert_eq!(run(&mut shell, "ls out").out, "");

    let outcome = run(&mut shell, "cat *.rs");
    assert_eq!(outcome.status, exit_codes::USAGE);
    assert_eq!(outcome.err, "minish: pattern '*.rs' matches no files\n");
}

#[test]
fn test_variables_and_quoting() {
    let mut shell = Shell::new(&ShellConfig::default());
    run(&mut shell, "set greeting 'hello world'");

    assert_eq!(run(&mut shell, "echo $greeting").out, "hello world\n");
    assert_eq!(run(&mut shell, "echo \"$greeting!\"").out, "hello world!\n");
    assert_eq!(run(&mut shell, "echo '$greeting'").out, "$greeting\n");
    assert_eq!(run(&mut shell, "echo \\$greeting").out, "$greeting\n");
    assert_eq!(run(&mut shell, "echo {a  b}c").out, "a  bc\n");
    assert_eq!(run(&mut shell, "echo ~").out, "/home/user\n");
}

#[test]
fn test_conditional_commands() {
    let mut shell = Shell::new(&ShellConfig::default());
    let outcome = run(
        &mut shell,
        "cat nothing; or echo recovered; and echo still fine; not cat nothing",
    );
    assert_eq!(outcome.status, exit_codes::OK);
    assert_eq!(outcome.out, "recovered\nstill fine\n");
}

#[test]
fn test_redirect_last_target_wins() {
    let mut shell = Shell::new(&ShellConfig::default());
    run(&mut shell, "echo first > one > two");
    assert!(!shell.fs.has(&VfsPath::new("/home/user/one")));
    assert_eq!(file_contents(&shell, "/home/user/two"), "first\n");
}

#[test]
fn test_errors_are_reported_not_fatal() {
    let mut shell = Shell::new(&ShellConfig::default());

    let outcome = run(&mut shell, "cd missing");
    assert_eq!(outcome.status, exit_codes::FAILURE);
    assert_eq!(outcome.err, "cd: '/home/user/missing' does not exist\n");

    let outcome = run(&mut shell, "pwd extra");
    assert_eq!(outcome.status, exit_codes::USAGE);
    assert!(outcome.err.starts_with("Expected 0 arguments"));

    let outcome = run(&mut shell, "echo $");
    assert_eq!(outcome.status, exit_codes::USAGE);
    assert!(outcome.err.contains("missing variable name"));

    assert_eq!(run(&mut shell, "echo ok").out, "ok\n");
}

#[test]
fn test_session_survives_serialization() {
    let mut shell = Shell::new(&ShellConfig::default());
    run(&mut shell, "mkdir -p docs/old; echo kept > docs/note");

    let json = shell.fs.root().to_json().unwrap();
    let Node::Directory(root) = Node::from_json(&json).unwrap() else {
        panic!("root must be a directory");
    };

    let mut restored = Shell::with_filesystem(&ShellConfig::default(), VirtualFs::from_root(root));
    assert_eq!(run(&mut restored, "cat docs/note").out, "kept\n");
    assert_eq!(run(&mut restored, "ls docs").out, "note\nold/\n");
}

#[test]
fn test_autocomplete_against_session() {
    let mut shell = Shell::new(&ShellConfig::default());
    run(&mut shell, "mkdir projects; touch profile.txt");

    assert_eq!(
        autocomplete("cd pro", &shell),
        AutocompleteResult::Single("cd projects/".to_string())
    );
    assert_eq!(
        autocomplete("cat pro", &shell),
        AutocompleteResult::Multiple(
            "cat pro".to_string(),
            vec!["profile.txt".to_string(), "projects/".to_string()]
        )
    );
}
