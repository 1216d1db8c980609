//! `stargate-deb doctor` command

use anyhow::Result;

use stargate_deb::ops::{doctor, format_report};
use stargate_deb::util::{GlobalContext, SystemExecutor};

pub fn execute(ctx: &GlobalContext, verbose: bool) -> Result<i32> {
    let mut exec = SystemExecutor;
    let report = doctor(ctx, &mut exec)?;

    print!("{}", format_report(&report, verbose));

    // Exit with error code if required checks failed
    Ok(if report.all_required_passed() { 0 } else { 1 })
}
