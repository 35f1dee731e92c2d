use std::path::PathBuf;

use crate::CliContext;
use crate::commands;

/// Load the configured default dump at startup, if there is one
pub async fn load_default_dump(ctx: &CliContext) {
    let path = {
        let config = ctx.config.read().await;
        match &config.dump_path {
            Some(path) => PathBuf::from(path),
            None => return,
        }
    };

    if !path.is_file() {
        println!("Warning: configured report dump {} does not exist", path.display());
        return;
    }

    let path = path.to_string_lossy();
    if let Err(err) = commands::load(Some(&*path), None, ctx).await {
        println!("{err}");
    }
}
