//! Revalidate command

use anyhow::{Context, Result};
use portal_core::{ActionOutcome, RevalidationGate};
use serde::Serialize;

use crate::cli::RevalidateArgs;
use crate::output;

/// Decision printed by the command
#[derive(Debug, Serialize, PartialEq)]
struct Decision {
    view: String,
    action: Option<String>,
    default: bool,
    revalidate: bool,
}

pub fn run(args: RevalidateArgs) -> Result<()> {
    let decision = decide(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&decision)?);
    } else {
        output::decision(&decision.view, decision.action.as_deref(), decision.revalidate);
    }

    Ok(())
}

fn decide(args: &RevalidateArgs) -> Result<Decision> {
    let gate = RevalidationGate::for_view(&args.view)?;

    let (action, revalidate) = match &args.outcome {
        Some(body) => {
            let outcome = ActionOutcome::from_json(body).context("Failed to parse --outcome")?;
            let revalidate = gate.should_revalidate_after(Some(&outcome), args.default);
            (outcome.action_type, revalidate)
        }
        None => {
            let revalidate = gate.should_revalidate_tag(args.action.as_deref(), args.default);
            (args.action.clone(), revalidate)
        }
    };

    tracing::debug!(view = %gate, action = ?action, revalidate, "revalidation decided");

    Ok(Decision {
        view: gate.view().to_string(),
        action,
        default: args.default,
        revalidate,
    })
}
