//! Plain-text rendering of results, policy hits and audit logs.

use bastion_audit::AuditLog;
use bastion_contracts::trace::{ConversationResult, PolicyHit, TraceStep};

pub fn print_result(result: &ConversationResult) {
    println!();
    println!("BASTION investigation {}", result.run_id);
    println!("{}", "=".repeat(60));

    for (idx, step) in result.steps.iter().enumerate() {
        print_step(idx + 1, step);
    }

    let decision = &result.final_decision;
    println!();
    println!("Final decision");
    println!("  summary    : {}", decision.summary);
    println!("  risk score : {:.1}", decision.risk_score);
    for recommendation in &decision.recommendations {
        println!("  - {}", recommendation);
    }
    println!();
}

fn print_step(position: usize, step: &TraceStep) {
    println!();
    println!("[{}] {}  (confidence {:.1})", position, step.agent, step.confidence);
    println!("    rationale : {}", step.rationale);

    for (key, value) in &step.outputs {
        println!("    {:<10}: {}", key, value);
    }
    for call in &step.tool_calls {
        let args: Vec<String> = call.args.iter().map(|(k, v)| format!("{k}={v:?}")).collect();
        println!("    tool      : {} {}", call.name, args.join(" "));
    }
    if !step.policy_hits.is_empty() {
        println!("    policy    : {}", join_hits(&step.policy_hits));
    }
}

pub fn print_hits(tool: &str, hits: &[PolicyHit]) {
    if hits.is_empty() {
        println!("{tool}: allowed");
    } else {
        println!("{tool}: {}", join_hits(hits));
    }
}

pub fn print_audit_log(log: &AuditLog, intact: bool) {
    println!();
    println!("Audit log for run {}", log.run_id);
    println!("{}", "-".repeat(60));
    for event in &log.events {
        println!(
            "#{:<2} {:<14} prev {}  this {}",
            event.sequence,
            event.record.agent,
            short(&event.prev_hash),
            short(&event.this_hash)
        );
    }
    println!("{}", "-".repeat(60));
    match log.finalized_at {
        Some(at) => println!("finalized     : {}", at.to_rfc3339()),
        None => println!("finalized     : no"),
    }
    println!("terminal hash : {}", log.terminal_hash);
    println!("integrity     : {}", if intact { "VALID" } else { "BROKEN" });
    println!();
}

fn join_hits(hits: &[PolicyHit]) -> String {
    hits.iter().map(PolicyHit::code).collect::<Vec<_>>().join(", ")
}

/// First 12 hex characters of a hash.
fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
