//! Per-request identity.

use contaerp_auth::{JwtClaims, PrincipalId, Role};
use contaerp_core::{AuditContext, TenantId};

/// Authenticated principal and tenant for the current request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub principal: PrincipalId,
    pub tenant: TenantId,
    pub roles: Vec<Role>,
}

impl Identity {
    pub fn from_claims(claims: JwtClaims) -> Self {
        Self {
            principal: claims.sub,
            tenant: claims.tenant_id,
            roles: claims.roles,
        }
    }

    /// Audit context for a write performed by this principal, stamped now.
    pub fn audit_ctx(&self) -> AuditContext {
        AuditContext::now(self.principal.as_user_id())
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::admin())
    }
}
