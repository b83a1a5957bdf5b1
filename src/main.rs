// SerialEcho - Serial console command runner
use clap::Parser;
use serialecho::cli::{execute_command, Args, RunOutcome};
use serialecho::domain::error::exit_code;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let code = match execute_command(args).await {
        Ok(RunOutcome::Completed) => exit_code::SUCCESS,
        Ok(RunOutcome::Interrupted) => {
            eprintln!("\nManually stopped reading the output.");
            exit_code::INTERRUPTED
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    std::process::exit(code);
}
