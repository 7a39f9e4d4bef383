// Read-only CLI over the ajo contract: discovery, group and member views,
// profiles, activity feeds, and deadlines. Write flows need a wallet
// connector and live in the library's `flow` module.

use ajo::codec;
use ajo::config::AjoConfig;
use ajo::contract::{AjoContract, RpcCaller};
use ajo::query;
use ajo::types::GroupInfo;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ajo")]
#[command(about = "Client for the ajo rotating savings circle contract")]
struct Cli {
    #[command(flatten)]
    config: AjoConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Probe for public groups and list them
    Discover,
    /// Show one group
    Group {
        group_id: u64,
    },
    /// List a group's members
    Members {
        group_id: u64,
    },
    /// Show a user's profile and reputation tier
    Profile {
        address: String,
    },
    /// Groups the user has joined, with payment status
    Joined {
        address: String,
    },
    /// Recent activity feed for a user
    Activities {
        address: String,
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Contribution deadline and accrued penalty for a user in a group
    Deadline {
        group_id: u64,
        address: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.config.finalize()?;
    config.print_summary();

    let caller = RpcCaller::new(config.rpc_url.clone(), config.rpc_timeout_ms);
    let contract = AjoContract::new(caller, config.require_contract_address()?.to_string());

    match cli.command {
        Command::Discover => {
            let groups = query::discover_public_groups(&contract, config.max_probe).await?;
            if groups.is_empty() {
                println!("no public groups found in ids 1..={}", config.max_probe);
            }
            for group in &groups {
                print_group_line(group)?;
            }
        }
        Command::Group { group_id } => match query::fetch_group(&contract, group_id).await? {
            Some(group) => print_group(&group)?,
            None => println!("group {group_id} does not exist"),
        },
        Command::Members { group_id } => {
            let group = query::fetch_group(&contract, group_id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("group {group_id} does not exist"))?;
            let fetch = query::fetch_group_members(&contract, group_id, group.member_count).await;
            for member in &fetch.members {
                println!(
                    "#{:<3} {}  contributed {} USDC  payout cycle {}  {}",
                    member.member_index,
                    member.address,
                    codec::to_fixed_point(member.total_contributed.into(), 6)?,
                    member.payout_cycle,
                    if member.has_been_paid { "paid" } else { "unpaid" },
                );
            }
            if !fetch.failed_indices.is_empty() {
                println!("failed to load member indices: {:?}", fetch.failed_indices);
            }
        }
        Command::Profile { address } => {
            let view = query::fetch_profile_view(&contract, &address).await?;
            let p = &view.profile;
            println!("{} ({})", p.display_name, p.address);
            println!(
                "  reputation: {} ({:?}, {:.0}% through tier)",
                p.reputation_score, view.tier, view.tier_progress
            );
            println!(
                "  payments: {}/{} on time ({:.1}%)",
                p.on_time_payments,
                p.total_payments,
                p.payment_rate * 100.0
            );
            println!(
                "  groups: {} joined, {} created, {} cycles completed",
                p.joined_groups, p.created_groups, p.completed_cycles
            );
            println!(
                "  contributed {} USDC, earned {} USDC",
                codec::to_fixed_point(p.total_contributions.into(), 6)?,
                codec::to_fixed_point(p.total_earnings.into(), 6)?,
            );
        }
        Command::Joined { address } => {
            let joined = query::fetch_user_joined_groups(&contract, &address).await?;
            if joined.is_empty() {
                println!("{address} has not joined any groups");
            }
            for j in &joined {
                println!(
                    "group {} \"{}\"  {}  {}  payment {:?}  [{}]",
                    j.group.group_id,
                    j.group.name,
                    j.frequency,
                    j.status,
                    j.payment_status,
                    j.tags.join(", "),
                );
            }
        }
        Command::Activities { address, limit } => {
            let activities = query::fetch_user_activities(&contract, &address, limit).await?;
            for a in &activities {
                let group = a
                    .group_id
                    .map(|id| format!(" group {id}"))
                    .unwrap_or_default();
                println!(
                    "[{}] {:?}{}: {} ({:+})",
                    a.timestamp, a.kind, group, a.description, a.amount
                );
            }
        }
        Command::Deadline { group_id, address } => {
            let now = chrono::Utc::now().timestamp() as u64;
            let record = query::fetch_deadline_record(&contract, group_id, &address, now).await?;
            println!("group {} / {}", record.group_id, record.user);
            println!("  deadline: {} (unix)", record.deadline);
            if record.is_overdue {
                println!(
                    "  OVERDUE by {}s, penalty {} USDC",
                    -record.time_remaining,
                    codec::to_fixed_point(record.penalty_amount.into(), 6)?,
                );
            } else {
                println!("  {}s remaining", record.time_remaining);
            }
        }
    }

    Ok(())
}

fn print_group_line(group: &GroupInfo) -> Result<()> {
    println!(
        "group {} \"{}\"  {}/{} members  {} USDC per cycle  {}",
        group.group_id,
        group.name,
        group.member_count,
        group.member_limit,
        codec::to_fixed_point(group.contribution_amount.into(), 6)?,
        ajo::normalize::group_status_label(group.state),
    );
    Ok(())
}

fn print_group(group: &GroupInfo) -> Result<()> {
    print_group_line(group)?;
    println!("  {}", group.description);
    println!("  creator: {}", group.creator);
    println!(
        "  cadence: {}  cycle {}/{}",
        ajo::normalize::frequency_label(group.cycle_unit, group.cycle_duration),
        group.current_cycle,
        group.total_cycles,
    );
    println!(
        "  pool: {} USDC  locked: {} USDC",
        codec::to_fixed_point(group.total_pool.into(), 6)?,
        codec::to_fixed_point(group.locked_funds.into(), 6)?,
    );
    println!("  tags: {}", ajo::normalize::group_tags(group).join(", "));
    if group.min_reputation > 0 {
        println!("  minimum reputation: {}", group.min_reputation);
    }
    Ok(())
}
