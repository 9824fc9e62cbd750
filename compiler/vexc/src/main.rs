//! Vex CLI.

use vexc::commands::{check_file, parse_file, run_file};
use vexc::tracing_setup;

fn main() {
    tracing_setup::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let command = &args[1];
    let code = match command.as_str() {
        "run" => {
            if args.len() < 3 {
                eprintln!("Usage: vexc run <file.vx>");
                1
            } else {
                run_file(&args[2])
            }
        }
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: vexc check <file.vx>");
                1
            } else {
                check_file(&args[2])
            }
        }
        "parse" => {
            if args.len() < 3 {
                eprintln!("Usage: vexc parse <file.vx>");
                1
            } else {
                parse_file(&args[2])
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            0
        }
        "version" | "--version" | "-V" => {
            println!("vexc {}", env!("CARGO_PKG_VERSION"));
            0
        }
        _ => {
            // A bare source path runs it.
            if std::path::Path::new(command)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("vx"))
            {
                run_file(command)
            } else {
                eprintln!("unknown command: {command}");
                print_usage();
                1
            }
        }
    };
    std::process::exit(code);
}

fn print_usage() {
    println!("Vex - a matrix-oriented scripting language");
    println!();
    println!("Usage:");
    println!("  vexc run <file.vx>     Run a program");
    println!("  vexc check <file.vx>   Parse and type-check without running");
    println!("  vexc parse <file.vx>   Dump the AST");
    println!("  vexc help              Show this help");
    println!("  vexc version           Show the version");
    println!();
    println!("Environment:");
    println!("  VEX_LOG    Log filter (RUST_LOG syntax), e.g. VEX_LOG=debug");
}
