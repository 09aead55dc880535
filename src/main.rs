use std::{fs, io::Read, process::ExitCode};

use ll1_grammar_helper::Grammar;
use tracing::{debug, Level};

fn print_help() {
    println!("Usage: ll1-grammar-helper [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elf: Eliminate left recursion");
    println!("  lf: Left factoring");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  first: FIRST sets");
    println!("  follow: FOLLOW sets");
    println!("  nff: Nullable first and follow");
    println!("  ll1: LL(1) parsing table");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -s <symbol>: Use <symbol> as the start symbol");
    println!("  -v: Log analysis steps to stderr (-vv for more)");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

macro_rules! render {
    ($t:expr, $format:expr) => {
        match $format {
            OutputFormat::Plain => Ok($t.to_plaintext()),
            OutputFormat::LaTeX => Ok($t.to_latex()),
            OutputFormat::JSON => $t.to_json().map_err(|e| e.to_string()),
        }
    };
}

fn main() -> ExitCode {
    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && ["elf", "lf"].contains(&args[i].as_str()) {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len() && ["prod", "first", "follow", "nff", "ll1"].contains(&args[i].as_str())
    {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut start_symbol: Option<&str> = None;
    let mut log_level = Level::WARN;

    while i < args.len()
        && ["-h", "--help", "-l", "-j", "-s", "-v", "-vv"].contains(&args[i].as_str())
    {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return ExitCode::SUCCESS;
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::JSON,
            "-s" => {
                i += 1;
                match args.get(i) {
                    Some(name) => start_symbol = Some(name.as_str()),
                    None => {
                        print_help();
                        return ExitCode::FAILURE;
                    }
                }
            }
            "-v" => log_level = Level::DEBUG,
            _ => log_level = Level::TRACE,
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return ExitCode::FAILURE;
    }

    let _ = tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .try_init();

    let input = if i == args.len() {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .map(|_| input)
            .map_err(|e| format!("failed to read stdin: {}", e))
    } else {
        fs::read_to_string(args[i].as_str())
            .map_err(|e| format!("failed to read {}: {}", args[i], e))
    };

    match input.and_then(|input| run(&input, &actions, &outputs, start_symbol, output_format)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(
    input: &str,
    actions: &[&str],
    outputs: &[&str],
    start_symbol: Option<&str>,
    output_format: OutputFormat,
) -> Result<(), String> {
    let mut g = Grammar::parse(input).map_err(|e| e.to_string())?;
    if let Some(name) = start_symbol {
        g = g.with_start_symbol(name).map_err(|e| e.to_string())?;
    }

    for &action in actions {
        debug!("applying {}", action);
        g = match action {
            "elf" => g.eliminate_left_recursion(),
            _ => g.left_factoring(),
        };
    }

    let first = g.calculate_first();
    let follow = g.calculate_follow(&first).map_err(|e| e.to_string())?;

    for &output in outputs {
        let text = match output {
            "prod" => render!(g.to_production_output_vec(), output_format),
            "first" => render!(g.to_first_output_vec(&first), output_format),
            "follow" => render!(g.to_follow_output_vec(&follow), output_format),
            "nff" => render!(g.to_non_terminal_output_vec(&first, &follow), output_format),
            _ => {
                let table = g
                    .generate_ll1_parsing_table(&first, &follow)
                    .map_err(|e| e.to_string())?;
                render!(table, output_format)
            }
        }?;
        println!("{}", text);
    }

    Ok(())
}
