use super::Context;
use anyhow::Result;
use std::io::Write;

/// Answer one `resource:action` question for a principal
pub async fn run(
    ctx: &Context,
    email: &str,
    resource: &str,
    action: &str,
    out: &mut dyn Write,
) -> Result<bool> {
    let session = ctx.session(email).await?;
    let allowed = session.has_permission(resource, action);

    let verdict = if allowed { "allowed" } else { "denied" };
    writeln!(out, "{} {}:{} -> {}", email, resource, action, verdict)?;
    Ok(allowed)
}
