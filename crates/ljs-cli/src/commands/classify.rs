use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use ljs_sweep::classify_file;

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Event log to classify.
    pub log: PathBuf,
}

pub fn run(args: &ClassifyArgs) -> Result<(), Box<dyn Error>> {
    let record = classify_file(&args.log)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}
