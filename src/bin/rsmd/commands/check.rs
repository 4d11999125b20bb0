use anyhow::{Context, Result};
use rsmd::io::reaction;
use tracing::info;

use crate::cli::CheckArgs;
use crate::display::{Context as DisplayContext, Progress, print_templates};

pub fn run_check(args: CheckArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 1);

    progress.step("Checking reaction templates");
    let mut templates = Vec::with_capacity(args.files.len());
    let mut substeps = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let template = reaction::load(path)
            .with_context(|| format!("Reaction file '{}' failed the check", path.display()))?;
        info!(path = %path.display(), name = %template.name, "template is consistent");
        substeps.push(format!("{} ({})", template.name, path.display()));
        templates.push(template);
    }
    let substeps_ref: Vec<&str> = substeps.iter().map(|s| s.as_str()).collect();
    progress.complete_step("Checking reaction templates", &substeps_ref);

    if ctx.interactive {
        print_templates(&templates);
    }
    Ok(())
}
