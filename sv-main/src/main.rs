use std::{env, process};

use sv_common::log_error;
use sv_task::task_runner::TaskRunner;

const USAGE: &str = r#"
Database Backup and Restore Utility

Usage:
  storevault backup          # Create a new backup
  storevault restore         # Restore from the latest backup
  storevault restore FILE    # Restore from a specific backup file
"#;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(command) = args.get(1) else {
        println!("{}", USAGE);
        return;
    };

    if !matches!(command.as_str(), "backup" | "restore") {
        println!("{}", USAGE);
        return;
    }

    TaskRunner::init_log4rs().expect("failed to init log4rs");

    let result = run(command, args.get(2).map(|s| s.as_str())).await;
    if let Err(error) = result {
        log_error!("{} failed: {:#}", command, error);
        process::exit(1);
    }
}

async fn run(command: &str, backup_file: Option<&str>) -> anyhow::Result<()> {
    let runner = TaskRunner::new()?;
    match command {
        "backup" => runner.backup().await,
        "restore" => runner.restore(backup_file).await,
        _ => unreachable!(),
    }
}
