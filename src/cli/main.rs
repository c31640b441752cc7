//! # sqlfold CLI
//!
//! Compiles queries given on the command line, or runs an interactive shell
//! similar to the `sqlite3` command-line shell when no query is given.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;

use sqlfold::{Compilation, Compiler, Schema, SqlFoldError};

/// Front-end compiler for a small SQL dialect.
///
/// Prints the token stream, the relational-algebra IR, the rewrites applied
/// and the optimized SQL for each query.
#[derive(Parser, Debug)]
#[command(name = "sqlfold", version, about)]
struct CliArgs {
    /// Query to compile. Omit to start the interactive shell.
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// Schema file mapping table names to their columns.
    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        env = "SQLFOLD_SCHEMA",
        default_value = "schema/mock_schema.json"
    )]
    schema: PathBuf,

    /// Fail if the schema cannot be loaded instead of using an empty one.
    #[arg(long = "strict-schema")]
    strict_schema: bool,

    /// Save the optimized SQL to this file.
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the full compilation report as JSON.
    #[arg(long = "json")]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = CliArgs::parse();

    let schema = if args.strict_schema {
        match Schema::load(&args.schema) {
            Ok(schema) => schema,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        Schema::load_or_empty(&args.schema)
    };
    let compiler = Compiler::new(Arc::new(schema));

    if !args.query.is_empty() {
        let sql = args.query.join(" ");
        return match compile_and_report(&compiler, &sql, &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                report_error(&e);
                ExitCode::FAILURE
            }
        };
    }

    repl(&compiler, &args);
    ExitCode::SUCCESS
}

fn repl(compiler: &Compiler, args: &CliArgs) {
    println!("sqlfold v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter \".help\" for usage hints.");
    println!(
        "Schema {} ({} tables)",
        args.schema.display(),
        compiler.schema().len()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut sql_buffer = String::new();

    loop {
        let prompt = if sql_buffer.is_empty() {
            "sqlfold> "
        } else {
            "   ...> "
        };
        print!("{}", prompt);
        if stdout.flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(_) => break,
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if sql_buffer.is_empty() && trimmed.starts_with('.') {
            if handle_dot_command(trimmed, compiler.schema()) {
                return;
            }
            continue;
        }

        sql_buffer.push_str(&line);
        if !sql_buffer.trim().ends_with(';') {
            continue;
        }

        let sql = sql_buffer.trim().to_string();
        sql_buffer.clear();

        if let Err(e) = compile_and_report(compiler, &sql, args) {
            report_error(&e);
        }
    }

    println!();
}

fn compile_and_report(compiler: &Compiler, sql: &str, args: &CliArgs) -> sqlfold::Result<()> {
    let out = compiler.compile(sql)?;

    if args.json {
        let json = serde_json::to_string_pretty(&out)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        println!("{}", json);
    } else {
        print_report(&out);
    }

    if let Some(path) = &args.output {
        save_to_file(path, &out.sql)?;
        println!("Saved optimized SQL to {}", path.display());
    }
    Ok(())
}

fn print_report(out: &Compilation) {
    let kinds: Vec<&str> = out.tokens.iter().map(|t| t.kind.name()).collect();
    println!("Tokens: {}", kinds.join(" "));
    println!("IR:");
    println!("{}", out.ir);

    let rewrites: Vec<&String> = out
        .optimized
        .iter()
        .flat_map(|stmt| match stmt {
            sqlfold::Statement::Select(sel) => sel.optimization_log.iter(),
        })
        .collect();
    if !rewrites.is_empty() {
        println!("Optimizations:");
        for entry in rewrites {
            println!("  - {}", entry);
        }
    }

    println!("Optimized SQL:");
    println!("{}", out.sql);
}

fn report_error(e: &SqlFoldError) {
    match e {
        SqlFoldError::Semantic(errors) => {
            for msg in errors {
                eprintln!("Semantic error: {}", msg);
            }
        }
        other => eprintln!("Error: {}", other),
    }
}

/// Write `content` to `path`, creating parent directories as needed.
fn save_to_file(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, format!("{}\n", content))
}

/// Returns `true` when the shell should exit.
fn handle_dot_command(cmd: &str, schema: &Schema) -> bool {
    let parts: Vec<&str> = cmd.split_whitespace().collect();
    let command = parts.first().map(|c| c.to_lowercase()).unwrap_or_default();

    match command.as_str() {
        ".help" => {
            println!(".help              Show this help");
            println!(".tables            List all tables");
            println!(".schema [TABLE]    Show table columns");
            println!(".quit              Exit this program");
            println!(".exit              Exit this program");
        }
        ".tables" => {
            let names: Vec<&str> = schema.table_names().collect();
            if names.is_empty() {
                println!("(no tables)");
            } else {
                println!("{}", names.join("  "));
            }
        }
        ".schema" => match parts.get(1) {
            Some(table) => match schema.columns(table) {
                Some(cols) => println!("{}({})", table, cols.join(", ")),
                None => eprintln!("Error: no such table: {}", table),
            },
            None => {
                for table in schema.table_names() {
                    let cols = schema.columns(table).unwrap_or_default();
                    println!("{}({})", table, cols.join(", "));
                }
            }
        },
        ".quit" | ".exit" => return true,
        _ => {
            eprintln!("Error: unknown command: {}", command);
            eprintln!("Use .help for a list of commands.");
        }
    }
    false
}
