//! Prepare command: rewrite a web build for loading from the bundle

use console::Style;

use crate::cli::PrepareArgs;
use crate::error::Result;
use crate::prepare::prepare_app;

pub fn run(args: &PrepareArgs, quiet: bool) -> Result<()> {
    let prepared = prepare_app(&args.dist_dir, &args.output_dir)?;

    if quiet {
        return Ok(());
    }

    println!(
        "{} {}",
        Style::new().green().bold().apply_to("Prepared"),
        args.output_dir.display()
    );
    if let Some(assets) = &prepared.assets {
        println!("  Copied assets to {}", assets.display());
    }
    println!("  Rewrote {}", prepared.index.display());

    Ok(())
}
