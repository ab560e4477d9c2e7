use clap::Parser;
use std::path::{Path, PathBuf};

use dustscript::env::Environment;
use dustscript::interp::Interpreter;
use dustscript::{embed, math, parser};

#[derive(Parser)]
#[command(name = "dust")]
#[command(about = "A minimal line-oriented scripting language")]
#[command(version)]
struct Cli {
    /// Script file to run
    source: Option<PathBuf>,

    /// Evaluate an arithmetic expression directly
    #[arg(short = 'e', long, allow_hyphen_values = true)]
    eval: Option<String>,

    /// Start interactive mode
    #[arg(short, long)]
    interactive: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Some(expr) = &cli.eval {
        match math::eval(expr) {
            Ok(value) => println!("{}", math::format_number(value)),
            Err(err) => {
                eprintln!("dust: {err}");
                std::process::exit(1);
            }
        }
    } else if cli.interactive {
        run_interactive();
    } else if let Some(path) = &cli.source {
        run_script(path);
    } else {
        run_interactive();
    }
}

fn run_script(path: &Path) {
    let mut interp = Interpreter::new();
    if let Ok(cwd) = std::env::current_dir() {
        interp.env_mut().set("$CWD", cwd.display().to_string());
    }

    let mut host = |command: &str,
                    value: &str,
                    file: &Path,
                    indentation: usize,
                    _env: &mut Environment| {
        match command {
            "print" => println!("{value}"),
            _ => println!(
                "({}, {indentation}) command: {command} value: {value}",
                file.display()
            ),
        }
    };

    if let Err(err) = interp.run(path, &mut host) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run_interactive() {
    println!("dust {} interactive mode", env!("CARGO_PKG_VERSION"));
    println!("Assignments ($x = ...) set variables; other input is evaluated. Type exit to quit.\n");

    let mut rl = match rustyline::DefaultEditor::new() {
        Ok(rl) => rl,
        Err(err) => {
            eprintln!("dust: cannot initialize line editor: {err}");
            std::process::exit(1);
        }
    };

    let mut env = Environment::new();

    loop {
        match rl.readline("dust> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);
                if trimmed.eq_ignore_ascii_case("exit") {
                    break;
                }
                if trimmed.starts_with('$') {
                    match parser::split_line(&env, trimmed, '=') {
                        Ok(assignment) => env.set(assignment.key, assignment.value),
                        Err(err) => eprintln!("{err}"),
                    }
                } else {
                    let value = env.substitute(trimmed);
                    let value = embed::resolve_math(&value);
                    println!("{}", embed::resolve_embedded(&value));
                }
            }
            Err(
                rustyline::error::ReadlineError::Interrupted | rustyline::error::ReadlineError::Eof,
            ) => {
                break;
            }
            Err(err) => {
                eprintln!("dust: {err}");
                break;
            }
        }
    }
}
