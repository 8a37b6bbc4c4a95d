use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use minish_core::config::{ShellConfig, exit_codes};
use minish_core::core::Shell;
use minish_core::core::streams::{BufferInputStream, StreamSet};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod completer;
mod state;
mod stdio;

use state::{SessionState, open_session};
use stdio::{StderrStream, StdoutStream};

/// minish - a small shell over an in-memory filesystem
#[derive(Parser, Debug)]
#[command(name = "minish", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session file to restore from and save to (overrides the config)
    #[arg(long)]
    state: Option<PathBuf>,

    /// Execute command and exit
    #[arg(short = 'c')]
    command: Option<String>,

    /// Host file whose lines are executed in order
    script: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &args.config {
        Some(path) => ShellConfig::load(path)?,
        None => ShellConfig::default(),
    };
    let state_path = args.state.clone().or_else(|| config.state_file.clone());
    let mut shell = open_session(&config, state_path.as_deref());
    info!(user = %config.user, state = ?state_path, "session started");

    let status = if let Some(command) = &args.command {
        let status = run_line(&mut shell, command);
        persist(&shell, state_path.as_deref());
        status
    } else if let Some(script) = &args.script {
        let content = std::fs::read_to_string(script)?;
        let mut status = exit_codes::OK;
        for line in content.lines() {
            status = run_line(&mut shell, line);
        }
        persist(&shell, state_path.as_deref());
        status
    } else {
        run_repl(shell, &config, state_path.as_deref())?
    };

    std::process::exit(status);
}

fn run_repl(
    shell: Shell,
    config: &ShellConfig,
    state_path: Option<&Path>,
) -> Result<i32, Box<dyn std::error::Error>> {
    use completer::MinishHelper;
    use rustyline::error::ReadlineError;
    use rustyline::history::DefaultHistory;
    use rustyline::{CompletionType, Config, Editor};

    let rl_config = Config::builder()
        .completion_type(CompletionType::List)
        .max_history_size(config.history_size.max(1))?
        .history_ignore_dups(true)?
        .build();

    let shell = Rc::new(RefCell::new(shell));
    let mut rl: Editor<MinishHelper, DefaultHistory> = Editor::with_config(rl_config)?;
    rl.set_helper(Some(MinishHelper::new(Rc::clone(&shell))));
    for entry in shell.borrow().history.entries() {
        let _ = rl.add_history_entry(entry);
    }

    let mut last_exit_code = exit_codes::OK;

    loop {
        let prompt = shell.borrow().prompt();
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());

                match line.trim() {
                    "exit" | "quit" => break,
                    "history" => {
                        for (index, entry) in shell.borrow().history.entries().enumerate() {
                            println!("{:>5}  {entry}", index + 1);
                        }
                        continue;
                    }
                    _ => {}
                }

                let mut shell = shell.borrow_mut();
                last_exit_code = run_line(&mut shell, &line);
                persist(&shell, state_path);
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("exit");
                break;
            }
            Err(err) => {
                warn!(error = %err, "failed to read input");
                break;
            }
        }
    }

    Ok(last_exit_code)
}

fn run_line(shell: &mut Shell, line: &str) -> i32 {
    let mut ins = BufferInputStream::default();
    let mut out = StdoutStream::new();
    let mut err = StderrStream::new();
    let mut streams = StreamSet::new(&mut ins, &mut out, &mut err);
    shell.execute(line, &mut streams)
}

fn persist(shell: &Shell, path: Option<&Path>) {
    let Some(path) = path else { return };
    if let Err(e) = SessionState::capture(shell).save(path) {
        warn!(path = %path.display(), error = %e, "failed to save session");
    }
}
