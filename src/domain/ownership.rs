//! Ownership predicate for the PDF -> Subtopic -> Unit -> User chain.
//!
//! Every access decision in the system reduces to this comparison after
//! walking an entity's chain up to its Unit. Repositories do the walk;
//! the decision lives here so it can be tested without a database.

/// True when the caller owns the Unit at the root of an entity's chain.
///
/// A `false` result must surface as `NotFound`, never `Forbidden`:
/// foreign records are invisible, not merely denied.
pub fn owned_by(caller_id: i32, unit_owner_id: i32) -> bool {
    caller_id == unit_owner_id
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_passes() {
        assert!(owned_by(7, 7));
    }

    #[test]
    fn other_user_fails() {
        assert!(!owned_by(7, 8));
        assert!(!owned_by(8, 7));
    }
}
