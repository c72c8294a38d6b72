use clap::{CommandFactory, Parser};
use extract_splitter::cli::{args::Args, commands};
use std::process;
use tokio_util::sync::CancellationToken;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        // Create cancellation token for coordinating graceful shutdown
        let cancellation_token = CancellationToken::new();

        // The command sees the cancellation and returns once in-flight writes
        // have finished, so no temporary output is abandoned
        let shutdown_token = cancellation_token.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to listen for CTRL+C: {}", e);
                return;
            }
            eprintln!("\nReceived CTRL+C, finishing in-flight writes...");
            shutdown_token.cancel();

            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("Received second CTRL+C, exiting immediately");
                process::exit(130);
            }
        });

        commands::run(args, cancellation_token).await
    });

    match result {
        Ok(stats) if stats.is_success() => process::exit(0),
        Ok(stats) => {
            eprintln!("Error: {} of the inputs failed", stats.files_failed());
            process::exit(1);
        }
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Extract Splitter - split EXTRACT/DETAIL files without splitting record groups");
    println!("=============================================================================");
    println!();
    println!("COMMANDS:");
    println!("    split       Split extract files into a zip archive or plain files");
    println!("    inspect     Show header, counts and largest groups of an extract");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Split into files of at most 810 detail lines (the default):");
    println!("    extract-splitter split concur_extract.dat");
    println!();
    println!("    # Split into exactly 4 balanced files, written individually:");
    println!("    extract-splitter split concur_extract.dat --files 4 --format files -o out/");
    println!();
    println!("    # Preview the largest groups and a 3-way split:");
    println!("    extract-splitter inspect concur_extract.dat --files 3");
    println!();

    let mut command = Args::command();
    if let Err(e) = command.print_help() {
        eprintln!("Failed to print help: {}", e);
    }
}
