//! `stargate-deb control` command
//!
//! Prints the generated `DEBIAN/` files without building.

use anyhow::Result;

use crate::cli::ControlArgs;
use stargate_deb::core::HostArch;
use stargate_deb::ops::render_metadata;
use stargate_deb::util::{GlobalContext, SystemExecutor};

pub fn execute(args: ControlArgs, ctx: &GlobalContext) -> Result<()> {
    let config = ctx.load_config();
    let arch = args.arch.map(|a| a.parse::<HostArch>()).transpose()?;

    let mut exec = SystemExecutor;
    let metadata = render_metadata(ctx, &config, arch, &mut exec)?;

    println!("==> DEBIAN/control <==");
    print!("{}", metadata.control);
    println!();
    println!("==> DEBIAN/postinst <==");
    print!("{}", metadata.postinst);
    println!();
    println!("==> DEBIAN/postrm <==");
    print!("{}", metadata.postrm);

    Ok(())
}
