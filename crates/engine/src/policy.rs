//! Authorization policy.
//!
//! A single pure function decides whether a principal may perform an
//! action. Every call site passes the principal explicitly; there is no
//! ambient authentication state anywhere in the engine.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Role of a user in the system.
///
/// Not a linear hierarchy: Partner and Admin have distinct capability
/// sets, with Admin an effective superset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Member,
    Partner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Partner => "partner",
            Self::Admin => "admin",
        }
    }
}

impl TryFrom<&str> for Role {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "member" => Ok(Self::Member),
            "partner" => Ok(Self::Partner),
            "admin" => Ok(Self::Admin),
            other => Err(EngineError::Validation(format!("invalid role: {other}"))),
        }
    }
}

/// The verified identity a caller presents.
///
/// Built by the upstream authentication boundary; the engine never
/// verifies signatures itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
    pub city_id: Option<i32>,
}

/// An action a principal may request.
///
/// Resource-dependent actions carry the owner ids needed for the
/// decision, so `evaluate` stays a function of its arguments alone.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    CreateEvent,
    EditEvent { organizer_id: i32 },
    DeleteEvent,
    AccessAdminPanel,
    Register,
    Unregister { owner_id: i32 },
    ViewCatalog,
}

/// Decides whether `principal` may perform `action`.
///
/// Total over all inputs: an absent principal is denied every action
/// that requires authentication and allowed the public ones.
pub fn evaluate(principal: Option<&Principal>, action: Action) -> bool {
    if matches!(action, Action::ViewCatalog) {
        return true;
    }
    let Some(principal) = principal else {
        return false;
    };

    match action {
        Action::ViewCatalog => true,
        Action::CreateEvent => matches!(principal.role, Role::Partner | Role::Admin),
        Action::EditEvent { organizer_id } => {
            principal.user_id == organizer_id || principal.role == Role::Admin
        }
        Action::DeleteEvent | Action::AccessAdminPanel => principal.role == Role::Admin,
        Action::Register => true,
        Action::Unregister { owner_id } => {
            principal.user_id == owner_id || principal.role == Role::Admin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(user_id: i32, role: Role) -> Principal {
        Principal {
            user_id,
            role,
            city_id: None,
        }
    }

    #[test]
    fn admin_passes_every_action() {
        let admin = principal(1, Role::Admin);
        let actions = [
            Action::CreateEvent,
            Action::EditEvent { organizer_id: 99 },
            Action::DeleteEvent,
            Action::AccessAdminPanel,
            Action::Register,
            Action::Unregister { owner_id: 99 },
            Action::ViewCatalog,
        ];
        for action in actions {
            assert!(evaluate(Some(&admin), action), "{action:?}");
        }
    }

    #[test]
    fn member_cannot_create_events() {
        let member = principal(1, Role::Member);
        assert!(!evaluate(Some(&member), Action::CreateEvent));
    }

    #[test]
    fn partner_creates_but_cannot_delete() {
        let partner = principal(1, Role::Partner);
        assert!(evaluate(Some(&partner), Action::CreateEvent));
        assert!(!evaluate(Some(&partner), Action::DeleteEvent));
        assert!(!evaluate(Some(&partner), Action::AccessAdminPanel));
    }

    #[test]
    fn edit_requires_ownership_or_admin() {
        let organizer = principal(7, Role::Partner);
        let other = principal(8, Role::Partner);
        assert!(evaluate(Some(&organizer), Action::EditEvent { organizer_id: 7 }));
        assert!(!evaluate(Some(&other), Action::EditEvent { organizer_id: 7 }));
        assert!(evaluate(
            Some(&principal(9, Role::Admin)),
            Action::EditEvent { organizer_id: 7 }
        ));
    }

    #[test]
    fn unregister_requires_ownership_or_admin() {
        let owner = principal(3, Role::Member);
        let stranger = principal(4, Role::Member);
        assert!(evaluate(Some(&owner), Action::Unregister { owner_id: 3 }));
        assert!(!evaluate(Some(&stranger), Action::Unregister { owner_id: 3 }));
    }

    #[test]
    fn anonymous_only_views_catalog() {
        assert!(evaluate(None, Action::ViewCatalog));
        assert!(!evaluate(None, Action::CreateEvent));
        assert!(!evaluate(None, Action::Register));
        assert!(!evaluate(None, Action::Unregister { owner_id: 1 }));
        assert!(!evaluate(None, Action::AccessAdminPanel));
    }

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Member, Role::Partner, Role::Admin] {
            assert_eq!(Role::try_from(role.as_str()).unwrap(), role);
        }
        assert!(Role::try_from("owner").is_err());
    }
}
