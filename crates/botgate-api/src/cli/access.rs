//! API key and capability grant commands.

use anyhow::Result;
use console::style;

use botgate_types::identity::{CallerId, Capability};

use crate::http::extractors::auth::issue_api_key;
use crate::state::AppState;

/// Issue an API key for `user`, granting `grants` first.
///
/// # Examples
///
/// ```bash
/// botgate key create --user 42 --grant bots:read --grant bots:write
/// ```
pub async fn create_key(
    state: &AppState,
    user: i64,
    name: &str,
    grants: &[Capability],
    json: bool,
) -> Result<()> {
    let caller = CallerId(user);
    for capability in grants {
        state.capabilities.grant(caller, *capability).await?;
    }

    let key = issue_api_key(&state.api_keys, caller, name).await?;
    tracing::info!(user_id = user, name, "api key issued");

    if json {
        println!(
            "{}",
            serde_json::json!({"user": user, "name": name, "key": key, "grants": grants})
        );
    } else {
        println!();
        println!(
            "  {} API key for user {} (shown once, store it now):",
            style("✓").green().bold(),
            style(user).bold()
        );
        println!("    {}", style(&key).yellow());
        if !grants.is_empty() {
            let names: Vec<&str> = grants.iter().map(|c| c.as_str()).collect();
            println!("  {} {}", style("granted").dim(), names.join(", "));
        }
        println!();
    }

    Ok(())
}

pub async fn grant(state: &AppState, user: i64, capability: Capability, json: bool) -> Result<()> {
    let added = state.capabilities.grant(CallerId(user), capability).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"user": user, "capability": capability, "changed": added})
        );
    } else if added {
        println!(
            "  {} Granted {} to user {}",
            style("✓").green().bold(),
            style(capability).bold(),
            user
        );
    } else {
        println!(
            "  {} User {} already holds {}",
            style("i").blue().bold(),
            user,
            style(capability).bold()
        );
    }

    Ok(())
}

pub async fn revoke(state: &AppState, user: i64, capability: Capability, json: bool) -> Result<()> {
    let removed = state.capabilities.revoke(CallerId(user), capability).await?;

    if json {
        println!(
            "{}",
            serde_json::json!({"user": user, "capability": capability, "changed": removed})
        );
    } else if removed {
        println!(
            "  {} Revoked {} from user {}",
            style("✓").green().bold(),
            style(capability).bold(),
            user
        );
    } else {
        println!(
            "  {} User {} did not hold {}",
            style("i").blue().bold(),
            user,
            style(capability).bold()
        );
    }

    Ok(())
}

/// Print the capabilities `user` holds.
pub async fn list_grants(state: &AppState, user: i64, json: bool) -> Result<()> {
    let capabilities = state.capabilities.list(CallerId(user)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&capabilities)?);
        return Ok(());
    }

    if capabilities.is_empty() {
        println!(
            "  {} User {} holds no capabilities. Add one with: {}",
            style("i").blue().bold(),
            user,
            style(format!("botgate grant {user} bots:read")).yellow()
        );
        return Ok(());
    }

    for capability in capabilities {
        println!("  {}", capability);
    }

    Ok(())
}
