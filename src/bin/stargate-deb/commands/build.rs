//! `stargate-deb build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use stargate_deb::ops::{package, PackageOptions};
use stargate_deb::util::{GlobalContext, Shell, SystemExecutor};

pub fn execute(args: BuildArgs, ctx: &GlobalContext, shell: &Shell) -> Result<i32> {
    let config = ctx.load_config();
    let opts = PackageOptions {
        install: args.install,
        plat_flags: args.plat_flags,
    };

    let mut exec = SystemExecutor;
    let result = package(ctx, &config, &opts, &mut exec, shell)?;

    Ok(result.exit_code())
}
