//! `stargate-deb clean` command

use anyhow::Result;

use stargate_deb::util::fs::{remove_dir_all_if_exists, remove_file_if_exists};
use stargate_deb::util::shell::Status;
use stargate_deb::util::{GlobalContext, Shell};

pub fn execute(ctx: &GlobalContext, shell: &Shell) -> Result<()> {
    let config = ctx.load_config();

    let staging = ctx.staging_dir(&config)?;
    if staging.exists() {
        remove_dir_all_if_exists(&staging)?;
        shell.status(Status::Removed, staging.display());
    }

    let staging_deb = ctx.staging_deb_path(&config)?;
    if staging_deb.exists() {
        remove_file_if_exists(&staging_deb)?;
        shell.status(Status::Removed, staging_deb.display());
    }

    Ok(())
}
