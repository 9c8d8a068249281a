//! Explain command implementation

use anyhow::Result;
use queryeval::{describe_tree, optimize_with};

use crate::commands::QueryArgs;

pub fn run(query: &QueryArgs) -> Result<()> {
    let config = query.optimizer_config()?;
    log::debug!(
        "Optimizer config: {}",
        serde_json::to_string(&config).unwrap_or_default()
    );
    let vectors = query.vectors()?;
    let search = query.build(&vectors);

    println!("Before optimization:");
    print!("{}", describe_tree(search.as_ref()));

    let search = optimize_with(search, &config);
    println!("After optimization:");
    print!("{}", describe_tree(search.as_ref()));
    Ok(())
}
