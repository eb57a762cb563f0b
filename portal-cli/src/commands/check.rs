use super::Context;
use anyhow::{Context as _, Result};
use portal_rbac::guard::{GuardDecision, RoleProtectedRoute, RouteTable};
use portal_rbac::AccessRequirement;
use std::io::Write;
use std::path::PathBuf;

/// What guards the checked location
pub enum Target {
    /// A requirement built from command-line flags
    Requirement(AccessRequirement),
    /// A route table file; unmatched locations are unguarded
    Table(PathBuf),
}

/// Run the guard for `location`; `true` when the content would render
pub async fn run(
    ctx: &Context,
    email: &str,
    location: &str,
    target: Target,
    out: &mut dyn Write,
) -> Result<bool> {
    let snapshot = ctx.session(email).await?.snapshot();

    let decision = match target {
        Target::Requirement(requirement) => {
            let route = RoleProtectedRoute::from_config(requirement, &ctx.config.rbac);
            route.decide(&snapshot, location)
        }
        Target::Table(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read route table: {}", path.display()))?;
            let table = RouteTable::from_toml_str(&content, &ctx.config.rbac)?;
            match table.decide(&snapshot, location) {
                Some(decision) => decision,
                None => {
                    writeln!(out, "render {} (unguarded)", location)?;
                    return Ok(true);
                }
            }
        }
    };

    match decision {
        GuardDecision::Render(record) => {
            writeln!(out, "render {} as {}", location, record.role_name)?;
            Ok(true)
        }
        GuardDecision::Loading => {
            writeln!(out, "loading {}", location)?;
            Ok(false)
        }
        GuardDecision::Denied(denied) => {
            writeln!(out, "denied {} ({}): {}", location, denied.error.code(), denied.reason)?;
            Ok(false)
        }
        GuardDecision::Redirect(redirect) => {
            writeln!(out, "redirect {}", redirect.location(&ctx.config.rbac.return_param))?;
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures;
    use portal_rbac::rbac::PermissionRequirement;

    fn approvals() -> Target {
        Target::Requirement(AccessRequirement {
            required_role: None,
            allowed_roles: vec!["Finance Manager".into()],
            required_permissions: vec!["Payments:approve"
                .parse::<PermissionRequirement>()
                .unwrap()],
        })
    }

    async fn check(ctx: &Context, email: &str, location: &str, target: Target) -> (bool, String) {
        let mut out = Vec::new();
        let granted = run(ctx, email, location, target, &mut out).await.unwrap();
        (granted, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn renders_for_permitted_role() {
        let (_tmp, ctx) = fixtures::context();
        let (granted, text) = check(&ctx, "ana@corp.com", "/approvals", approvals()).await;
        assert!(granted);
        assert_eq!(text, "render /approvals as Finance Manager\n");
    }

    #[tokio::test]
    async fn denies_other_roles() {
        let (_tmp, ctx) = fixtures::context();
        let (granted, text) = check(&ctx, "bo@corp.com", "/approvals", approvals()).await;
        assert!(!granted);
        assert!(text.starts_with("denied /approvals (role_not_allowed)"));
    }

    #[tokio::test]
    async fn route_table_redirects() {
        let (tmp, mut ctx) = fixtures::context();
        ctx.config.rbac.show_access_denied = false;
        let routes = tmp.path().join("routes.toml");
        let table = "[[routes]]\npattern = \"/admin/*\"\nrequired_role = \"IT\"\n";
        std::fs::write(&routes, table).unwrap();

        let (granted, text) =
            check(&ctx, "ana@corp.com", "/admin/users", Target::Table(routes.clone())).await;
        assert!(!granted);
        assert_eq!(text, "redirect /login?returnTo=%2Fadmin%2Fusers\n");

        let (granted, text) = check(&ctx, "ana@corp.com", "/news", Target::Table(routes)).await;
        assert!(granted);
        assert_eq!(text, "render /news (unguarded)\n");
    }

    #[tokio::test]
    async fn lookup_failure_is_an_error() {
        let ctx = fixtures::failing_context();
        let mut out = Vec::new();

        let result = run(&ctx, "ana@corp.com", "/approvals", approvals(), &mut out).await;
        assert!(result.err().unwrap().to_string().contains("role lookup failed"));
        assert!(out.is_empty());
    }
}
