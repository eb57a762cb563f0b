use super::Context;
use anyhow::Result;
use std::io::Write;

/// Print the principal's role record; `false` when no role is assigned
pub async fn run(ctx: &Context, email: &str, json: bool, out: &mut dyn Write) -> Result<bool> {
    let snapshot = ctx.session(email).await?.snapshot();

    let Some(record) = snapshot.record() else {
        writeln!(out, "{}: no role assigned", email)?;
        return Ok(false);
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(record)?)?;
        return Ok(true);
    }

    writeln!(out, "email:    {}", record.email)?;
    writeln!(out, "role:     {}", record.role_name)?;
    writeln!(out, "admin:    {}", record.is_admin)?;
    if let Some(division) = &record.division_name {
        writeln!(out, "division: {}", division)?;
    }
    for resource in record.permissions.resources() {
        let actions: Vec<&str> = record
            .permissions
            .actions(resource)
            .map(|actions| actions.iter().map(String::as_str).collect())
            .unwrap_or_default();
        writeln!(out, "  {} = [{}]", resource, actions.join(", "))?;
    }
    Ok(true)
}
