//! Intent command

use anyhow::Result;
use portal_core::ActionDomain;

use crate::cli::IntentArgs;
use crate::output;

pub fn run(args: IntentArgs) -> Result<()> {
    let domain: ActionDomain = args.domain.parse()?;
    let action = domain.parse_intent(&args.intent)?;

    output::success(&format!("{} accepts '{}'", domain, action));
    Ok(())
}
