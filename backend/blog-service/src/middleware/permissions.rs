/// Ownership policy for posts and comments
///
/// One table decides every mutation: reads and listings are open, creation
/// needs an identity, and update/delete need the identity that authored the
/// resource. A denial never reaches the store.
use uuid::Uuid;

use crate::error::AppError;
use crate::metrics::blog::PERMISSION_DENIED_TOTAL;

/// Action being attempted on a post or comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
            Operation::List => "list",
        }
    }

    /// Capability the caller needs for this operation
    pub fn requirement(&self) -> Requirement {
        match self {
            Operation::List | Operation::Read => Requirement::Anyone,
            Operation::Create => Requirement::Authenticated,
            Operation::Update | Operation::Delete => Requirement::Owner,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Anyone,
    Authenticated,
    Owner,
}

/// Result type for permission checks
pub type PermissionResult = Result<(), AppError>;

/// Evaluate the policy table
///
/// `owner` is the recorded author of the target resource; it is only
/// consulted for `Requirement::Owner`. `resource` names the target in
/// denial messages, e.g. `"post"`.
pub fn authorize(
    op: Operation,
    actor: Option<Uuid>,
    owner: Option<Uuid>,
    resource: &str,
) -> PermissionResult {
    let decision = match (op.requirement(), actor) {
        (Requirement::Anyone, _) => Ok(()),
        (_, None) => Err(AppError::Unauthorized(format!(
            "sign in to {} this {}",
            op.as_str(),
            resource
        ))),
        (Requirement::Authenticated, Some(_)) => Ok(()),
        (Requirement::Owner, Some(actor)) if owner == Some(actor) => Ok(()),
        (Requirement::Owner, Some(_)) => Err(AppError::Forbidden(format!(
            "only the author can {} this {}",
            op.as_str(),
            resource
        ))),
    };

    if let Err(err) = &decision {
        PERMISSION_DENIED_TOTAL
            .with_label_values(&[op.as_str()])
            .inc();
        tracing::warn!(
            operation = op.as_str(),
            resource,
            actor = ?actor,
            "permission denied: {}",
            err
        );
    }

    decision
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_open_to_anyone() {
        let owner = Some(Uuid::new_v4());
        for op in [Operation::Read, Operation::List] {
            assert!(authorize(op, None, owner, "post").is_ok());
            assert!(authorize(op, Some(Uuid::new_v4()), owner, "post").is_ok());
        }
    }

    #[test]
    fn create_needs_identity() {
        assert!(matches!(
            authorize(Operation::Create, None, None, "post"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(authorize(Operation::Create, Some(Uuid::new_v4()), None, "post").is_ok());
    }

    #[test]
    fn mutations_need_owner() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        for op in [Operation::Update, Operation::Delete] {
            assert!(authorize(op, Some(author), Some(author), "comment").is_ok());
            assert!(matches!(
                authorize(op, Some(stranger), Some(author), "comment"),
                Err(AppError::Forbidden(_))
            ));
            assert!(matches!(
                authorize(op, None, Some(author), "comment"),
                Err(AppError::Unauthorized(_))
            ));
        }
    }

    #[test]
    fn policy_table() {
        assert_eq!(Operation::List.requirement(), Requirement::Anyone);
        assert_eq!(Operation::Read.requirement(), Requirement::Anyone);
        assert_eq!(Operation::Create.requirement(), Requirement::Authenticated);
        assert_eq!(Operation::Update.requirement(), Requirement::Owner);
        assert_eq!(Operation::Delete.requirement(), Requirement::Owner);
    }
}
