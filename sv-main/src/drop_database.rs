use std::process;

use sv_common::log_error;
use sv_task::task_runner::TaskRunner;

#[tokio::main]
async fn main() {
    TaskRunner::init_log4rs().expect("failed to init log4rs");

    let result = run().await;
    if let Err(error) = result {
        log_error!("drop database failed: {:#}", error);
        process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let runner = TaskRunner::new()?;
    runner.drop_database().await
}
