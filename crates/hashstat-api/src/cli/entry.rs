//! Entry inspection and maintenance commands.

use anyhow::Result;
use console::style;
use dialoguer::Confirm;

use hashstat_core::service::hash::ContentHasher;
use hashstat_types::entry::EntryId;

use crate::state::AppState;

/// Print a stored digest, or note that it is still pending.
pub async fn get_entry(state: &AppState, id: i64, json: bool) -> Result<()> {
    let entry = state.service.get_entry(EntryId(id)).await?;

    if json {
        let out = serde_json::json!({
            "id": entry.id,
            "state": entry.state(),
            "digest": entry.digest,
            "duration_micros": entry.duration_micros,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    match (&entry.digest, entry.duration_micros) {
        (Some(digest), Some(micros)) => {
            println!();
            println!("  {} Entry {}", style("#").dim(), style(entry.id).bold());
            println!("  Digest:   {}", style(digest).cyan());
            println!("  Duration: {micros} µs");
            println!();
        }
        _ => {
            println!(
                "  Entry {} is {}",
                style(entry.id).bold(),
                style("pending").yellow()
            );
        }
    }

    Ok(())
}

/// Print entry count and average hashing time.
pub async fn show_stats(state: &AppState, json: bool) -> Result<()> {
    let stats = state.service.get_aggregate().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!();
    println!("  {}", style("── Stats ──").dim());
    println!("  Entries:          {}", style(stats.count).bold());
    println!("  Average duration: {:.2} µs", stats.average_duration);
    println!();

    Ok(())
}

/// Hash a value without touching the store.
pub fn hash_value(hasher: &impl ContentHasher, value: &str, json: bool) -> Result<()> {
    let outcome = hasher.compute(value);

    if json {
        let out = serde_json::json!({
            "digest": outcome.digest,
            "duration_micros": outcome.elapsed_micros(),
        });
        println!("{out}");
    } else {
        println!("{}", outcome.digest);
    }

    Ok(())
}

/// Drop every entry after confirmation.
pub async fn clear(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete every entry in table '{}'?",
                style(&state.config.table_name).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    state.service.reset().await?;

    if json {
        println!("{}", serde_json::json!({"cleared": true}));
    } else {
        println!("  {} Store cleared", style("✓").green());
    }

    Ok(())
}
