//! Write a starter configuration file

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use stepview_report::ReporterConfig;

use crate::output;

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: InitArgs, config_path: &Path) -> Result<()> {
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }

    ReporterConfig::default()
        .save(config_path)
        .with_context(|| format!("writing {}", config_path.display()))?;
    output::print_success(&format!("Wrote {}", config_path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("stepview.toml");

        execute(InitArgs::default(), &path).unwrap();
        assert_eq!(ReporterConfig::load(&path).unwrap(), ReporterConfig::default());

        assert!(execute(InitArgs::default(), &path).is_err());
        execute(InitArgs { force: true }, &path).unwrap();
    }
}
