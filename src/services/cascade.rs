// src/services/cascade.rs

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Category,
    Quiz,
    Question,
    Attempt,
    AttemptAnswer,
}

impl Entity {
    pub fn table(self) -> &'static str {
        match self {
            Entity::User => "users",
            Entity::Category => "categories",
            Entity::Quiz => "quizzes",
            Entity::Question => "questions",
            Entity::Attempt => "attempts",
            Entity::AttemptAnswer => "attempt_answers",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// Delete the dependents along with the parent.
    Cascade,
    /// Refuse to delete the parent while dependents exist.
    Restrict,
}

/// A foreign key from `child.foreign_key` to the parent's `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub child: Entity,
    pub foreign_key: &'static str,
    pub on_delete: OnDelete,
}

const fn relation(child: Entity, foreign_key: &'static str, on_delete: OnDelete) -> Relation {
    Relation {
        child,
        foreign_key,
        on_delete,
    }
}

const USER_RELATIONS: &[Relation] = &[relation(Entity::Attempt, "user_id", OnDelete::Cascade)];

const CATEGORY_RELATIONS: &[Relation] = &[relation(Entity::Quiz, "category_id", OnDelete::Restrict)];

const QUIZ_RELATIONS: &[Relation] = &[
    relation(Entity::Question, "quiz_id", OnDelete::Cascade),
    relation(Entity::Attempt, "quiz_id", OnDelete::Cascade),
];

const QUESTION_RELATIONS: &[Relation] =
    &[relation(Entity::AttemptAnswer, "question_id", OnDelete::Cascade)];

const ATTEMPT_RELATIONS: &[Relation] =
    &[relation(Entity::AttemptAnswer, "attempt_id", OnDelete::Cascade)];

/// Every relation in which `parent` is the referenced side.
pub fn relations(parent: Entity) -> &'static [Relation] {
    match parent {
        Entity::User => USER_RELATIONS,
        Entity::Category => CATEGORY_RELATIONS,
        Entity::Quiz => QUIZ_RELATIONS,
        Entity::Question => QUESTION_RELATIONS,
        Entity::Attempt => ATTEMPT_RELATIONS,
        Entity::AttemptAnswer => &[],
    }
}

/// The rows of `entity` matched by `filter`, a WHERE clause built from
/// static identifiers whose only placeholder is the root id as `$1`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Selection {
    entity: Entity,
    filter: String,
}

impl Selection {
    fn root(entity: Entity) -> Self {
        Selection {
            entity,
            filter: "id = $1".to_string(),
        }
    }

    fn children(&self, relation: &Relation) -> Self {
        Selection {
            entity: relation.child,
            filter: format!(
                "{} IN (SELECT id FROM {} WHERE {})",
                relation.foreign_key,
                self.entity.table(),
                self.filter
            ),
        }
    }
}

/// A `Restrict` relation reached while planning: `dependents` must be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Guard {
    parent: Entity,
    dependents: Selection,
}

/// Walks the relation graph breadth-first from `root`. Every level is
/// expressed as a nested subquery on the root id, so no statement grows with
/// the number of rows involved.
fn plan(root: Entity) -> (Vec<Selection>, Vec<Guard>) {
    let mut steps = vec![Selection::root(root)];
    let mut guards = Vec::new();

    let mut i = 0;
    while i < steps.len() {
        let parent = steps[i].clone();
        for relation in relations(parent.entity) {
            let dependents = parent.children(relation);
            match relation.on_delete {
                OnDelete::Cascade => steps.push(dependents),
                OnDelete::Restrict => guards.push(Guard {
                    parent: parent.entity,
                    dependents,
                }),
            }
        }
        i += 1;
    }

    (steps, guards)
}

/// Deletes `id` of `entity` and everything the policy attaches to it.
///
/// Any `Restrict` relation with live dependents aborts before anything is
/// deleted. The tree is then deleted leaves-first, so every statement
/// satisfies the foreign keys. Callers pass a transaction so the whole tree
/// goes at once. Returns the number of rows removed.
pub async fn delete_cascading(
    conn: &mut SqliteConnection,
    entity: Entity,
    id: i64,
) -> Result<u64, AppError> {
    let (steps, guards) = plan(entity);

    for guard in &guards {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {}",
            guard.dependents.entity.table(),
            guard.dependents.filter
        );
        let (count,): (i64,) = sqlx::query_as(&sql).bind(id).fetch_one(&mut *conn).await?;
        if count > 0 {
            return Err(AppError::InvalidState(format!(
                "Cannot delete from {} while {} row(s) in {} reference it",
                guard.parent.table(),
                count,
                guard.dependents.entity.table()
            )));
        }
    }

    let mut deleted = 0;
    for step in steps.iter().rev() {
        let sql = format!("DELETE FROM {} WHERE {}", step.entity.table(), step.filter);
        deleted += sqlx::query(&sql).bind(id).execute(&mut *conn).await?.rows_affected();
    }

    tracing::debug!("Deleted {} row(s) rooted at {} {}", deleted, entity.table(), id);
    Ok(deleted)
}

/// Runs `delete_cascading` in its own transaction.
pub async fn delete(pool: &SqlitePool, entity: Entity, id: i64) -> Result<u64, AppError> {
    let mut tx = pool.begin().await?;
    let deleted = delete_cascading(&mut tx, entity, id).await?;
    tx.commit().await?;
    Ok(deleted)
}
