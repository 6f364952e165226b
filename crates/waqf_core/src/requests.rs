//! Two-stage admin request workflow.
//!
//! A compliance officer proposes a change to the admin roster; a platform
//! admin approves or rejects it. Permissions are derived from roles, and an
//! admin's effective role is whatever the approved requests imply, replayed
//! in order.

use std::collections::BTreeSet;

use crate::errors::CoreError;
use crate::tokens::{AdminId, RequestId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdminRole {
    PlatformAdmin,
    ComplianceOfficer,
    FinanceOfficer,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Permission {
    ManageCauses,
    ManageCategories,
    ManageAdmins,
    ViewReports,
    ProposeAdminChanges,
    ApproveAdminChanges,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::ManageCauses => "manage_causes",
            Permission::ManageCategories => "manage_categories",
            Permission::ManageAdmins => "manage_admins",
            Permission::ViewReports => "view_reports",
            Permission::ProposeAdminChanges => "propose_admin_changes",
            Permission::ApproveAdminChanges => "approve_admin_changes",
        }
    }
}

impl AdminRole {
    pub fn permissions(self) -> BTreeSet<Permission> {
        use Permission::*;
        let perms: &[Permission] = match self {
            AdminRole::PlatformAdmin => &[
                ManageCauses,
                ManageCategories,
                ManageAdmins,
                ViewReports,
                ApproveAdminChanges,
            ],
            AdminRole::ComplianceOfficer => &[ViewReports, ProposeAdminChanges],
            AdminRole::FinanceOfficer => &[ViewReports],
        };
        perms.iter().copied().collect()
    }

    pub fn has_permission(self, p: Permission) -> bool {
        self.permissions().contains(&p)
    }
}

/// Account acting on a request.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Actor {
    pub id: AdminId,
    pub role: AdminRole,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum AdminAction {
    AddAdmin { admin: AdminId, email: String, role: AdminRole },
    ChangeRole { admin: AdminId, role: AdminRole },
    RemoveAdmin { admin: AdminId },
}

impl AdminAction {
    pub fn target(&self) -> &AdminId {
        match self {
            AdminAction::AddAdmin { admin, .. }
            | AdminAction::ChangeRole { admin, .. }
            | AdminAction::RemoveAdmin { admin } => admin,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "state", rename_all = "snake_case"))]
pub enum RequestStatus {
    Pending,
    Approved { by: AdminId },
    Rejected { by: AdminId, reason: String },
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct AdminRequest {
    pub id: RequestId,
    pub action: AdminAction,
    pub proposed_by: AdminId,
    pub status: RequestStatus,
}

fn require(actor: &Actor, p: Permission) -> Result<(), CoreError> {
    if actor.role.has_permission(p) { Ok(()) } else { Err(CoreError::Unauthorized(p.as_str())) }
}

impl AdminRequest {
    /// Stage one: open a pending request.
    pub fn propose(id: RequestId, actor: &Actor, action: AdminAction) -> Result<Self, CoreError> {
        require(actor, Permission::ProposeAdminChanges)?;
        Ok(Self {
            id,
            action,
            proposed_by: actor.id.clone(),
            status: RequestStatus::Pending,
        })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.status, RequestStatus::Pending)
    }

    fn check_reviewer(&self, actor: &Actor) -> Result<(), CoreError> {
        require(actor, Permission::ApproveAdminChanges)?;
        if !self.is_pending() {
            return Err(CoreError::RequestNotPending);
        }
        if actor.id == self.proposed_by {
            return Err(CoreError::SelfReview);
        }
        Ok(())
    }

    /// Stage two (accept). Returns the updated request; `self` is untouched.
    pub fn approve(&self, actor: &Actor) -> Result<Self, CoreError> {
        self.check_reviewer(actor)?;
        Ok(Self { status: RequestStatus::Approved { by: actor.id.clone() }, ..self.clone() })
    }

    /// Stage two (decline).
    pub fn reject(&self, actor: &Actor, reason: impl Into<String>) -> Result<Self, CoreError> {
        self.check_reviewer(actor)?;
        Ok(Self {
            status: RequestStatus::Rejected { by: actor.id.clone(), reason: reason.into() },
            ..self.clone()
        })
    }
}

/// Role of `admin` after replaying the approved requests in order.
/// `None` when the admin was never added or was removed last.
pub fn effective_role(admin: &AdminId, requests: &[AdminRequest]) -> Option<AdminRole> {
    let mut role = None;
    for r in requests {
        if !matches!(r.status, RequestStatus::Approved { .. }) || r.action.target() != admin {
            continue;
        }
        role = match &r.action {
            AdminAction::AddAdmin { role, .. } => Some(*role),
            // A role change for an account that was never added does not create it.
            AdminAction::ChangeRole { role: next, .. } => role.map(|_| *next),
            AdminAction::RemoveAdmin { .. } => None,
        };
    }
    role
}

/// Permissions derived from [`effective_role`]; empty for unknown admins.
pub fn effective_permissions(admin: &AdminId, requests: &[AdminRequest]) -> BTreeSet<Permission> {
    effective_role(admin, requests).map(AdminRole::permissions).unwrap_or_default()
}
