/// Ordering a tool's required level is checked against (spec.md §4.4
/// per-worker permission model). Higher variants imply everything lower
/// variants can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PermissionLevel {
    User,
    Elevated,
    Admin,
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PermissionLevel::User => "user",
            PermissionLevel::Elevated => "elevated",
            PermissionLevel::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

/// Carried by a worker's execution context. A worker may only execute
/// tools whose `required_permission` is at or below this level.
#[derive(Debug, Clone, Copy)]
pub struct ExecutionContext {
    pub caller_level: PermissionLevel,
}

impl ExecutionContext {
    pub fn new(caller_level: PermissionLevel) -> Self {
        Self { caller_level }
    }

    /// `true` when `required` is at or below the caller's level.
    pub fn permits(&self, required: PermissionLevel) -> bool {
        required <= self.caller_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_context_permits_user_tools_only() {
        let ctx = ExecutionContext::new(PermissionLevel::User);
        assert!(ctx.permits(PermissionLevel::User));
        assert!(!ctx.permits(PermissionLevel::Admin));
    }

    #[test]
    fn admin_context_permits_everything() {
        let ctx = ExecutionContext::new(PermissionLevel::Admin);
        assert!(ctx.permits(PermissionLevel::User));
        assert!(ctx.permits(PermissionLevel::Admin));
    }

    #[test]
    fn elevated_context_permits_user_and_elevated_but_not_admin() {
        let ctx = ExecutionContext::new(PermissionLevel::Elevated);
        assert!(ctx.permits(PermissionLevel::User));
        assert!(ctx.permits(PermissionLevel::Elevated));
        assert!(!ctx.permits(PermissionLevel::Admin));
    }
}
