// src/services/access.rs

use crate::{
    error::AppError,
    models::{
        attempt::Attempt,
        question::{PublicQuestion, Question, QuestionView},
    },
    utils::jwt::Claims,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Read,
    Write,
    Delete,
}

/// The thing an identity wants to act on.
///
/// Variants carry just enough of the target for the decision: attempts are
/// judged on their owner, users on their id.
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    Attempt(&'a Attempt),
    AttemptAnswer,
    Quiz,
    Question,
    Category,
    /// `None` is the collection of all users.
    User(Option<i64>),
}

/// Decides whether `identity` may apply `capability` to `resource`.
///
/// Evaluated before any store mutation. Ownership of an attempt is required
/// of everyone, admins included; changing or removing an attempt
/// additionally requires the admin flag.
pub fn authorize(identity: &Claims, capability: Capability, resource: Resource<'_>) -> Result<(), AppError> {
    use Capability::*;

    let allowed = match (resource, capability) {
        (Resource::Attempt(attempt), Read) => attempt.user_id == identity.id,
        (Resource::Attempt(attempt), Write | Delete) => {
            identity.admin && attempt.user_id == identity.id
        }

        (Resource::Quiz | Resource::Question | Resource::Category, Read) => true,
        (Resource::Quiz | Resource::Question | Resource::Category, Write | Delete) => identity.admin,

        (Resource::AttemptAnswer, _) => identity.admin,

        (Resource::User(Some(id)), Read | Write) => id == identity.id || identity.admin,
        (Resource::User(None), Read) => identity.admin,
        (Resource::User(_), Write | Delete) => identity.admin,
    };

    if allowed {
        Ok(())
    } else {
        tracing::debug!(
            "Denied {:?} on {:?} for user {}",
            capability,
            resource,
            identity.id
        );
        Err(AppError::Forbidden("Forbidden".to_string()))
    }
}

/// Projects questions for the reader: admins see answers, nobody else does.
pub fn shape_questions(identity: &Claims, questions: Vec<Question>) -> Vec<QuestionView> {
    questions
        .into_iter()
        .map(|q| shape_question(identity, q))
        .collect()
}

pub fn shape_question(identity: &Claims, question: Question) -> QuestionView {
    if identity.admin {
        QuestionView::Admin(question)
    } else {
        QuestionView::Public(PublicQuestion::from(question))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: i64, admin: bool) -> Claims {
        Claims { id, admin, exp: 0 }
    }

    fn attempt_of(user_id: i64) -> Attempt {
        Attempt {
            id: 1,
            user_id,
            quiz_id: 1,
            score: 0.5,
            time: 12.0,
            created_at: None,
        }
    }

    fn question() -> Question {
        Question {
            id: 1,
            quiz_id: 1,
            question: "What does the cow say?".to_string(),
            answer: "Moo!".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_owner_reads_own_attempt() {
        let attempt = attempt_of(5);
        assert!(authorize(&identity(5, false), Capability::Read, Resource::Attempt(&attempt)).is_ok());
    }

    #[test]
    fn test_admin_cannot_read_foreign_attempt() {
        let attempt = attempt_of(5);
        let err = authorize(&identity(6, true), Capability::Read, Resource::Attempt(&attempt)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_attempt_mutation_needs_admin_and_ownership() {
        let attempt = attempt_of(5);
        for capability in [Capability::Write, Capability::Delete] {
            assert!(authorize(&identity(5, false), capability, Resource::Attempt(&attempt)).is_err());
            assert!(authorize(&identity(6, true), capability, Resource::Attempt(&attempt)).is_err());
            assert!(authorize(&identity(5, true), capability, Resource::Attempt(&attempt)).is_ok());
        }
    }

    #[test]
    fn test_catalog_is_admin_gated_for_writes() {
        let user = identity(1, false);
        let admin = identity(2, true);
        for resource in [Resource::Quiz, Resource::Question, Resource::Category] {
            assert!(authorize(&user, Capability::Read, resource).is_ok());
            assert!(authorize(&user, Capability::Write, resource).is_err());
            assert!(authorize(&user, Capability::Delete, resource).is_err());
            assert!(authorize(&admin, Capability::Delete, resource).is_ok());
        }
    }

    #[test]
    fn test_user_listing_and_deletion_are_admin_only() {
        let user = identity(1, false);
        assert!(authorize(&user, Capability::Read, Resource::User(None)).is_err());
        assert!(authorize(&user, Capability::Read, Resource::User(Some(1))).is_ok());
        assert!(authorize(&user, Capability::Delete, Resource::User(Some(1))).is_err());
        assert!(authorize(&identity(2, true), Capability::Delete, Resource::User(Some(1))).is_ok());
    }

    #[test]
    fn test_answer_hidden_from_non_admin() {
        let rendered = serde_json::to_value(shape_question(&identity(1, false), question())).unwrap();
        assert!(rendered.get("answer").is_none());
        assert_eq!(rendered["question"], "What does the cow say?");
    }

    #[test]
    fn test_answer_shown_to_admin() {
        let rendered = serde_json::to_value(shape_question(&identity(1, true), question())).unwrap();
        assert_eq!(rendered["answer"], "Moo!");
    }
}
