use clap::Parser;
use decree::ast::{render_tree, tree_to_json};
use decree::cli::{generate_completions, Args, Commands};
use decree::config::{AppConfig, Dump};
use decree::diagnostic::render_diagnostics;
use decree::interpreter::{parse, parse_and_run_with_diagnostics, Console, Interpreter, ScopeStack, StdConsole};
use decree::lexer::tokenize;
use decree::token::TokenKind;
use owo_colors::OwoColorize;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

const EXIT_OK: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_BAD_INPUT: i32 = 2;

const PROMPT: &str = "decree> ";
const CONTINUATION_PROMPT: &str = "...> ";

/// A program to run and the name diagnostics should call it by.
struct Program {
    name: String,
    source: String,
}

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    verbose_log(&config, "Starting decree");

    let code = if config.interactive || (args.file.is_none() && args.eval.is_none() && atty::is(atty::Stream::Stdin))
    {
        match open_console(&config) {
            Ok(console) => run_interactive_mode(console, &config),
            Err(e) => {
                error_message(&config, &e);
                EXIT_BAD_INPUT
            }
        }
    } else {
        match read_program(&args, &config) {
            Ok(program) => run_program(&program, &config),
            Err(e) => {
                error_message(&config, &e);
                EXIT_BAD_INPUT
            }
        }
    };

    std::process::exit(code);
}

fn read_program(args: &Args, config: &AppConfig) -> Result<Program, String> {
    if let Some(file) = &args.file {
        verbose_log(config, &format!("Reading program from file: {}", file.display()));
        Ok(Program {
            name: file.display().to_string(),
            source: read_file(file)?,
        })
    } else if let Some(code) = &args.eval {
        verbose_log(config, "Using program from command-line argument");
        Ok(Program {
            name: "<eval>".to_string(),
            source: code.clone(),
        })
    } else {
        verbose_log(config, "Reading program from stdin");
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|e| format!("Failed to read from stdin: {}", e))?;
        Ok(Program {
            name: "<stdin>".to_string(),
            source: buffer,
        })
    }
}

fn read_file(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

fn open_console(config: &AppConfig) -> Result<StdConsole, String> {
    match &config.log {
        Some(path) => {
            verbose_log(config, &format!("Logging output to {}", path.display()));
            File::create(path)
                .map(StdConsole::with_log)
                .map_err(|e| format!("Failed to open log file {}: {}", path.display(), e))
        }
        None => Ok(StdConsole::new()),
    }
}

fn build_interpreter<C: Console>(console: C, config: &AppConfig) -> Interpreter<C> {
    let interpreter = Interpreter::new(console).with_options(config.interpreter_options());
    match config.seed {
        Some(seed) => {
            verbose_log(config, &format!("Seeding random source with {}", seed));
            interpreter.with_seed(seed)
        }
        None => interpreter,
    }
}

fn run_program(program: &Program, config: &AppConfig) -> i32 {
    match config.dump {
        Some(Dump::Tokens) => return dump_tokens(program, config),
        Some(Dump::Ast) => return dump_ast(program, config),
        None => {}
    }

    let console = match open_console(config) {
        Ok(console) => console,
        Err(e) => {
            error_message(config, &e);
            return EXIT_BAD_INPUT;
        }
    };

    let mut interpreter = build_interpreter(console, config);
    let mut scopes = ScopeStack::new();

    verbose_log(config, &format!("Running {} ({} bytes)", program.name, program.source.len()));
    let report = parse_and_run_with_diagnostics(&program.source, &mut interpreter, &mut scopes);
    verbose_log(config, &format!("Run finished: {:?}", report.status));

    if !report.diagnostics.is_empty() {
        eprint!(
            "{}",
            render_diagnostics(&program.source, &program.name, &report.diagnostics, config.color_enabled)
        );
    }

    if report.is_failure() {
        EXIT_FAILURE
    } else {
        EXIT_OK
    }
}

fn dump_tokens(program: &Program, config: &AppConfig) -> i32 {
    let lexed = tokenize(&program.source);
    verbose_log(config, &format!("Scanned {} tokens", lexed.tokens.len()));

    if config.json {
        let tokens: Vec<serde_json::Value> = lexed.iter().map(|token| token.to_json()).collect();
        print_json(&serde_json::Value::Array(tokens));
    } else {
        for token in &lexed {
            println!("{}", token);
        }
    }

    if !lexed.errors.is_empty() {
        let diagnostics: Vec<_> = lexed.errors.iter().map(|e| e.to_diagnostic()).collect();
        eprint!(
            "{}",
            render_diagnostics(&program.source, &program.name, &diagnostics, config.color_enabled)
        );
    }
    EXIT_OK
}

fn dump_ast(program: &Program, config: &AppConfig) -> i32 {
    let parsed = parse(&program.source);
    let diagnostics = parsed.diagnostics();
    if !diagnostics.is_empty() {
        eprint!(
            "{}",
            render_diagnostics(&program.source, &program.name, &diagnostics, config.color_enabled)
        );
    }

    match parsed.program {
        Some(tree) if config.json => {
            print_json(&tree_to_json(&tree));
            EXIT_OK
        }
        Some(tree) => {
            print!("{}", render_tree(&tree));
            EXIT_OK
        }
        None => EXIT_FAILURE,
    }
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize JSON: {}", e),
    }
}

/// Counts unclosed `{` in what has been typed so far, using the real
/// tokenizer so braces inside strings and comments do not count.
fn open_braces(source: &str) -> i64 {
    tokenize(source).iter().fold(0, |depth, token| match token.kind {
        TokenKind::LBrace => depth + 1,
        TokenKind::RBrace => depth - 1,
        _ => depth,
    })
}

fn run_interactive_mode(console: StdConsole, config: &AppConfig) -> i32 {
    if !config.verbose {
        println!("decree interactive mode");
        println!("Enter statements; blocks may span lines. Leave with `exit`, `quit` or Ctrl+D.");
        println!();
    } else {
        verbose_log(config, "Entering interactive mode");
    }

    let mut interpreter = build_interpreter(console, config);
    let mut persistent = ScopeStack::new();
    let mut entry = String::new();

    loop {
        let prompt = if entry.is_empty() { PROMPT } else { CONTINUATION_PROMPT };
        if let Err(e) = interpreter.console_mut().prompt(prompt) {
            error_message(config, &format!("Error writing prompt: {}", e));
            return EXIT_FAILURE;
        }

        let line = match interpreter.console_mut().read_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error_message(config, &format!("Error reading input: {}", e));
                return EXIT_BAD_INPUT;
            }
        };

        if entry.is_empty() && matches!(line.trim(), "exit" | "quit") {
            break;
        }

        entry.push_str(&line);
        entry.push('\n');
        if open_braces(&entry) > 0 {
            continue;
        }

        if !entry.trim().is_empty() {
            verbose_log(config, &format!("Running entry: {}", entry.trim()));
            let mut fresh = ScopeStack::new();
            let scopes = if config.persist { &mut persistent } else { &mut fresh };
            let report = parse_and_run_with_diagnostics(&entry, &mut interpreter, scopes);
            if !report.diagnostics.is_empty() {
                eprint!(
                    "{}",
                    render_diagnostics(&entry, "<repl>", &report.diagnostics, config.color_enabled)
                );
            }
        }
        entry.clear();
    }

    if !config.verbose {
        println!();
    }
    EXIT_OK
}

fn verbose_log(config: &AppConfig, message: &str) {
    if config.verbose {
        eprintln!("[decree:debug] {}", message);
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{}", message);
    }
}
