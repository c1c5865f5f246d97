//! BASTION — command-line front end.
//!
//! Usage:
//!   bastion investigate "Investigate scans from 203.0.113.12"
//!   bastion investigate --mode simulate --json "assistant: earlier reply" "follow-up"
//!   bastion check-tool nmap --scan "-sS -O"
//!   bastion audit "Investigate scans from 203.0.113.12"

mod render;

use std::collections::BTreeMap;
use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use bastion_agents::Pipeline;
use bastion_audit::verify_chain;
use bastion_contracts::{
    conversation::{ConversationRequest, Message, Mode},
    error::BastionResult,
};
use bastion_core::traits::ToolPolicy;
use bastion_policy::{AllowlistPolicy, DEFAULT_FLAG_ARGUMENT};

/// Exit code of `check-tool` when the invocation violates policy.
const EXIT_POLICY_HITS: i32 = 2;

/// Prefix marking a MESSAGE argument as an assistant turn.
const ASSISTANT_PREFIX: &str = "assistant:";

// ── CLI definition ────────────────────────────────────────────────────────────

/// BASTION — audited multi-agent security investigation.
#[derive(Parser)]
#[command(
    name = "bastion",
    about = "Audited multi-agent security investigation pipeline",
    long_about = "Runs a fixed roster of investigation agents over a conversation,\n\
                  screens proposed tool calls against an allowlist, and records\n\
                  every step in a hash-chained audit log."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one investigation and print its trace and final decision.
    Investigate {
        /// Conversation turns, oldest first. Prefix a turn with "assistant:"
        /// to mark it as an assistant reply.
        #[arg(required = true)]
        messages: Vec<String>,

        /// Pipeline mode: assist or simulate.
        #[arg(long, default_value = "assist")]
        mode: Mode,

        /// Caller-defined scenario identifier.
        #[arg(long)]
        scenario: Option<String>,

        /// Continue a caller-tracked conversation.
        #[arg(long)]
        conversation: Option<String>,

        /// Allowlist TOML file; the built-in allowlist when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Screen one proposed tool invocation against the allowlist.
    CheckTool {
        /// Tool name, e.g. nmap.
        name: String,

        /// Flag string, e.g. "-sS -Pn".
        #[arg(long, allow_hyphen_values = true)]
        scan: Option<String>,

        /// Extra argument as KEY=VALUE. Repeatable.
        #[arg(long = "arg", value_parser = parse_key_value)]
        args: Vec<(String, String)>,

        /// Allowlist TOML file; the built-in allowlist when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
    },

    /// Run one investigation and print its audit chain.
    Audit {
        /// Conversation turns, oldest first.
        #[arg(required = true)]
        messages: Vec<String>,

        /// Allowlist TOML file; the built-in allowlist when omitted.
        #[arg(long)]
        policy: Option<PathBuf>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug for per-phase output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("bastion: {}", e);
            process::exit(1);
        }
    }
}

fn run(command: Command) -> Result<i32, Box<dyn Error>> {
    match command {
        Command::Investigate {
            messages,
            mode,
            scenario,
            conversation,
            policy,
            json,
        } => {
            let pipeline = Pipeline::new(load_policy(policy.as_ref())?);
            let mut request = ConversationRequest::new(parse_messages(&messages)).with_mode(mode);
            if let Some(scenario) = scenario {
                request = request.with_scenario(scenario);
            }
            if let Some(conversation) = conversation {
                request = request.with_conversation(conversation);
            }

            let result = pipeline.run_request(&request)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                render::print_result(&result);
            }
            Ok(0)
        }

        Command::CheckTool {
            name,
            scan,
            args,
            policy,
        } => {
            let policy = load_policy(policy.as_ref())?;
            let mut tool_args: BTreeMap<String, String> = args.into_iter().collect();
            if let Some(scan) = scan {
                let key = policy
                    .config()
                    .tools
                    .get(&name)
                    .map_or(DEFAULT_FLAG_ARGUMENT, |rule| rule.flag_argument.as_str())
                    .to_string();
                tool_args.insert(key, scan);
            }

            let hits = policy.validate_tool_request(&name, &tool_args);
            render::print_hits(&name, &hits);
            Ok(if hits.is_empty() { 0 } else { EXIT_POLICY_HITS })
        }

        Command::Audit { messages, policy } => {
            let pipeline = Pipeline::new(load_policy(policy.as_ref())?);
            let result = pipeline.run(&parse_messages(&messages), Mode::Assist, None)?;

            match pipeline.audit().take_log(&result.run_id) {
                Some(log) => {
                    let intact = verify_chain(&log.events);
                    render::print_audit_log(&log, intact);
                    Ok(if intact { 0 } else { 1 })
                }
                None => Err(format!("no audit log recorded for run {}", result.run_id).into()),
            }
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_policy(path: Option<&PathBuf>) -> BastionResult<AllowlistPolicy> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading allowlist");
            AllowlistPolicy::from_file(path)
        }
        None => AllowlistPolicy::builtin(),
    }
}

/// Turn MESSAGE arguments into conversation turns.
fn parse_messages(raw: &[String]) -> Vec<Message> {
    raw.iter()
        .map(|turn| match turn.strip_prefix(ASSISTANT_PREFIX) {
            Some(content) => Message::assistant(content.trim_start()),
            None => Message::user(turn.as_str()),
        })
        .collect()
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
