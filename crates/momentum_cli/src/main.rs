use clap::{CommandFactory, Parser};
use momentum_cli::cli::{Cli, Command, collect_overrides};
use momentum_cli::render;
use momentum_core::breakdown::{Selection, select};
use momentum_core::config::{Config, load_config_with_fallback, merge_overrides, palette_for_theme};
use momentum_core::error::AppError;
use momentum_core::model::CategoryId;
use momentum_core::timer::{Countdown, CountdownEvent};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOG_ENV_VAR: &str = "MOMENTUM_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn resolve_config(base: &Config, raw_overrides: &[String]) -> Result<Config, AppError> {
    let overrides = collect_overrides(raw_overrides).map_err(AppError::invalid_input)?;
    Ok(merge_overrides(base, &overrides))
}

fn task_text(words: &[String]) -> Result<String, AppError> {
    let text = words.join(" ");
    if text.trim().is_empty() {
        return Err(AppError::invalid_input("task is required"));
    }
    Ok(text.trim().to_string())
}

/// Text with a breakdown has to be narrowed to one subtask before it counts.
fn selected_task(text: &str, step: Option<usize>, json: bool) -> Result<String, AppError> {
    match select(text, step)? {
        Selection::Task(name) => Ok(name),
        Selection::Choose(found) => {
            if json {
                print_json(&serde_json::json!({
                    "task": text,
                    "subtasks": &found.subtasks,
                }))?;
            } else {
                println!("{}", render::breakdown_text(text, Some(&found)));
            }
            Err(AppError::invalid_input(format!(
                "'{text}' has {} steps, pick one with --step <N>",
                found.subtasks.len()
            )))
        }
    }
}

fn run_countdown(seconds: u32, task: &str, json: bool) -> Result<(), AppError> {
    let mut countdown = Countdown::new(seconds);
    countdown.toggle();

    if !json {
        println!("Timer started: {} ({})", task, countdown.display());
    }

    while countdown.is_running() {
        std::thread::sleep(Duration::from_secs(1));
        let event = countdown.tick();
        if !json {
            print!(
                "\r{} {} ",
                countdown.display(),
                render::progress_bar(countdown.progress())
            );
            io::stdout().flush()?;
        }
        if event == Some(CountdownEvent::Completed) {
            tracing::debug!(task, seconds, "countdown finished");
        }
    }

    if !json {
        println!();
    }
    Ok(())
}

fn run_command(cli: Cli, base_config: &Config) -> Result<(), AppError> {
    let config = resolve_config(base_config, &cli.config_override)?;
    let palette = palette_for_theme(config.theme.as_deref());

    match cli.command {
        Command::Name { name } => match name {
            Some(name) => {
                let name = momentum_core::api::set_username(&name)?;
                if cli.json {
                    print_json(&serde_json::json!({ "username": name }))?;
                } else {
                    println!("Welcome, {name}!");
                }
            }
            None => {
                let state = momentum_core::api::load()?;
                if cli.json {
                    print_json(&serde_json::json!({ "username": state.username }))?;
                } else {
                    match state.username {
                        Some(name) => println!("Welcome back, {name}!"),
                        None => println!("No name set yet. Run: momentum name <NAME>"),
                    }
                }
            }
        },
        Command::Suggest { category } => {
            let category: CategoryId = category.parse()?;
            let suggestions = momentum_core::api::suggest_tasks(category)?;
            if cli.json {
                print_json(&suggestions)?;
            } else {
                println!("{}", render::suggestions_text(&suggestions));
            }
        }
        Command::Breakdown { task } => {
            let text = task_text(&task)?;
            let breakdown = momentum_core::api::breakdown_task(&text)?;
            if cli.json {
                print_json(&serde_json::json!({
                    "task": text,
                    "subtasks": breakdown.as_ref().map(|found| &found.subtasks),
                }))?;
            } else {
                println!("{}", render::breakdown_text(&text, breakdown.as_ref()));
            }
        }
        Command::Done {
            category,
            step,
            task,
        } => {
            let category: CategoryId = category.parse()?;
            let text = task_text(&task)?;
            let name = selected_task(&text, step, cli.json)?;
            let outcome = momentum_core::api::complete_task(category, &name)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("{}", render::completion_text(&outcome, &palette));
            }
        }
        Command::Timer {
            category,
            seconds,
            step,
            task,
        } => {
            let category: CategoryId = category.parse()?;
            let text = task_text(&task)?;
            let seconds = match seconds {
                Some(0) => return Err(AppError::invalid_input("seconds must be at least 1")),
                Some(value) => value,
                None => config.timer_seconds,
            };
            let name = selected_task(&text, step, cli.json)?;

            run_countdown(seconds, &name, cli.json)?;
            let outcome = momentum_core::api::finish_countdown(category, &name)?;
            if cli.json {
                print_json(&outcome.completion)?;
            } else {
                println!("{}", palette.accentize("Great job! Keep the momentum going!"));
                println!("{}", render::completion_text(&outcome.completion, &palette));
            }
        }
        Command::Progress => {
            let dashboard = momentum_core::api::progress_dashboard(config.daily_target)?;
            if cli.json {
                print_json(&dashboard)?;
            } else {
                println!("{}", render::dashboard_text(&dashboard, &palette));
            }
        }
    }

    Ok(())
}

fn run_interactive(config: &Config) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {}", err);
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("momentum".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli, config) {
            eprintln!("ERROR: {}", err);
        }
    }

    Ok(())
}

fn main() {
    init_tracing();

    let loaded = load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        tracing::warn!(error = %err, "using default configuration");
    }
    let config = loaded.config;

    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive(&config) {
            eprintln!("ERROR: {}", err);
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if !err.use_stderr() {
                let _ = err.print();
                return;
            }
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli, &config) {
        eprintln!("ERROR: {}", err);
        std::process::exit(1);
    }
}
