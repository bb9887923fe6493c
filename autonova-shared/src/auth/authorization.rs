/// Role-based access control
///
/// The permission model is a single static table: every (role, resource)
/// pair maps to an explicit set of allowed actions. The table is total —
/// each of the five roles has a defined answer for every action on every
/// resource — and there is no wildcard or inheritance between roles.
///
/// # Policy
///
/// | role         | customers                      | vehicles                       | insurance_companies            |
/// |--------------|--------------------------------|--------------------------------|--------------------------------|
/// | admin        | list view create update delete | list view create update delete | list view create update delete |
/// | manager      | list view create update delete | list view create update delete | list view create update        |
/// | receptionist | list view create update        | list view create update        | list view                      |
/// | technician   | list view                      | list view update               | list view                      |
/// | accountant   | (none)                         | (none)                         | list view                      |
///
/// # Example
///
/// ```
/// use autonova_shared::auth::authorization::{is_allowed, Action, Resource};
/// use autonova_shared::models::role::RoleName;
///
/// assert!(is_allowed(RoleName::Manager, Resource::Customers, Action::Delete));
/// assert!(!is_allowed(RoleName::Receptionist, Resource::Customers, Action::Delete));
/// assert!(!is_allowed(RoleName::Accountant, Resource::Vehicles, Action::List));
/// ```

use serde::{Deserialize, Serialize};

use crate::models::role::RoleName;

/// A protected resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Customers,
    Vehicles,
    InsuranceCompanies,
}

impl Resource {
    /// All resources the table covers
    pub const ALL: [Resource; 3] = [
        Resource::Customers,
        Resource::Vehicles,
        Resource::InsuranceCompanies,
    ];

    /// Resource name as used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Customers => "customers",
            Resource::Vehicles => "vehicles",
            Resource::InsuranceCompanies => "insurance_companies",
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    List,
    View,
    Create,
    Update,
    Delete,
}

impl Action {
    /// All actions the table covers
    pub const ALL: [Action; 5] = [
        Action::List,
        Action::View,
        Action::Create,
        Action::Update,
        Action::Delete,
    ];

    /// Action name as used in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::View => "view",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// The role's row in the table does not include this action
    #[error("Role '{role}' is not permitted to {action} {resource}")]
    Denied {
        role: RoleName,
        resource: Resource,
        action: Action,
    },
}

const EVERYTHING: &[Action] = &[
    Action::List,
    Action::View,
    Action::Create,
    Action::Update,
    Action::Delete,
];
const NO_DELETE: &[Action] = &[Action::List, Action::View, Action::Create, Action::Update];
const READ_AND_UPDATE: &[Action] = &[Action::List, Action::View, Action::Update];
const READ_ONLY: &[Action] = &[Action::List, Action::View];
const NOTHING: &[Action] = &[];

/// The actions a role may perform on a resource
///
/// This is the whole policy; route handlers never test roles directly.
pub fn allowed_actions(role: RoleName, resource: Resource) -> &'static [Action] {
    match resource {
        Resource::Customers => match role {
            RoleName::Admin | RoleName::Manager => EVERYTHING,
            RoleName::Receptionist => NO_DELETE,
            RoleName::Technician => READ_ONLY,
            RoleName::Accountant => NOTHING,
        },
        Resource::Vehicles => match role {
            RoleName::Admin | RoleName::Manager => EVERYTHING,
            RoleName::Receptionist => NO_DELETE,
            RoleName::Technician => READ_AND_UPDATE,
            RoleName::Accountant => NOTHING,
        },
        Resource::InsuranceCompanies => match role {
            RoleName::Admin => EVERYTHING,
            RoleName::Manager => NO_DELETE,
            RoleName::Receptionist | RoleName::Technician | RoleName::Accountant => READ_ONLY,
        },
    }
}

/// Checks whether a role may perform an action on a resource
pub fn is_allowed(role: RoleName, resource: Resource, action: Action) -> bool {
    allowed_actions(role, resource).contains(&action)
}

/// Requires a permission, returning a typed denial otherwise
///
/// The denial names the role, resource, and action; the API maps it to 403.
///
/// # Example
///
/// ```
/// use autonova_shared::auth::authorization::{require, Action, Resource};
/// use autonova_shared::models::role::RoleName;
///
/// assert!(require(RoleName::Admin, Resource::Vehicles, Action::Delete).is_ok());
/// assert!(require(RoleName::Technician, Resource::Vehicles, Action::Delete).is_err());
/// ```
pub fn require(role: RoleName, resource: Resource, action: Action) -> Result<(), AuthzError> {
    if !is_allowed(role, resource, action) {
        return Err(AuthzError::Denied {
            role,
            resource,
            action,
        });
    }

    Ok(())
}
