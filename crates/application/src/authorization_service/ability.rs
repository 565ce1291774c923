use std::collections::BTreeSet;

use atrium_domain::{Action, AdminUserId, Grant, Subject};

/// Effective capability set of one principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ability {
    principal: AdminUserId,
    full_access: bool,
    grants: BTreeSet<Grant>,
}

impl Ability {
    /// Returns whether the principal may perform `action` on `subject`.
    #[must_use]
    pub fn can(&self, action: Action, subject: Subject) -> bool {
        self.full_access || self.grants.contains(&Grant::new(action, subject))
    }

    /// Negation of [`Ability::can`].
    #[must_use]
    pub fn cannot(&self, action: Action, subject: Subject) -> bool {
        !self.can(action, subject)
    }

    /// Returns whether the principal may perform `action` on one admin record.
    ///
    /// Every principal may read and update its own admin record.
    #[must_use]
    pub fn can_on_admin(&self, action: Action, admin_id: AdminUserId) -> bool {
        if self.can(action, Subject::Admin) {
            return true;
        }

        admin_id == self.principal && matches!(action, Action::Read | Action::Update)
    }

    /// Returns the admin the ability was resolved for.
    #[must_use]
    pub fn principal(&self) -> AdminUserId {
        self.principal
    }

    /// Returns whether the principal holds `manage:all`.
    #[must_use]
    pub fn has_full_access(&self) -> bool {
        self.full_access
    }

    /// Returns the expanded grants in stable order.
    pub fn grants(&self) -> impl Iterator<Item = Grant> + '_ {
        self.grants.iter().copied()
    }
}

/// Expands stored role grants into an ability.
///
/// `manage:<subject>` implies every action on the subject, `<action>:all`
/// implies the action on every subject and `manage:all` implies everything.
#[must_use]
pub fn resolve_grants(principal: AdminUserId, grants: &[Grant]) -> Ability {
    let mut expanded = BTreeSet::new();
    let mut full_access = false;

    for grant in grants {
        match (grant.action(), grant.subject()) {
            (Action::Manage, Subject::All) => full_access = true,
            (Action::Manage, subject) => {
                expanded.extend(
                    Action::all()
                        .iter()
                        .map(|action| Grant::new(*action, subject)),
                );
            }
            (action, Subject::All) => {
                expanded.insert(*grant);
                expanded.extend(
                    Subject::concrete()
                        .iter()
                        .map(|subject| Grant::new(action, *subject)),
                );
            }
            _ => {
                expanded.insert(*grant);
            }
        }
    }

    Ability {
        principal,
        full_access,
        grants: expanded,
    }
}
