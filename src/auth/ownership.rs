use crate::error::AppError;

/// Single-owner model: a resource belongs to exactly one identity.
pub fn owned_by(resource_owner_id: i32, request_identity_id: i32) -> bool {
    resource_owner_id == request_identity_id
}

/// Fails with `Forbidden("Not authorized to {action} this task")` unless the requester owns the task.
pub fn ensure_task_owner(
    resource_owner_id: i32,
    request_identity_id: i32,
    action: &str,
) -> Result<(), AppError> {
    if owned_by(resource_owner_id, request_identity_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Not authorized to {} this task",
            action
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_by() {
        assert!(owned_by(1, 1));
        assert!(!owned_by(1, 2));
        assert!(!owned_by(2, 1));
    }

    #[test]
    fn test_ensure_task_owner() {
        assert!(ensure_task_owner(4, 4, "update").is_ok());
        match ensure_task_owner(4, 5, "delete") {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, "Not authorized to delete this task"),
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }
}
