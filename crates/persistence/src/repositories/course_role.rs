//! Course role id lookup.
//!
//! The `course_roles` table is seeded by migration and never changes at
//! runtime, so its name-to-id mapping is read once at startup and shared.

use domain::models::CourseRole;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;

use crate::entities::CourseRoleEntity;
use crate::metrics::QueryTimer;

#[derive(Debug, Error)]
pub enum RoleLookupError {
    #[error("failed to load course roles: {0}")]
    Database(#[from] sqlx::Error),

    #[error("course role {0:?} is not seeded")]
    MissingRole(&'static str),
}

/// Static mapping between course roles and their row ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleLookup {
    owner: i64,
    instructor: i64,
    staff: i64,
    student: i64,
}

impl RoleLookup {
    /// Reads the seeded roles. Fails if any of the four roles is missing.
    pub async fn load(pool: &PgPool) -> Result<Self, RoleLookupError> {
        let timer = QueryTimer::new("load_course_roles");
        let result = sqlx::query_as::<_, CourseRoleEntity>("SELECT id, name FROM course_roles")
            .fetch_all(pool)
            .await;
        timer.finish(&result);

        Self::from_entities(result?)
    }

    /// Builds the lookup from already-fetched rows. Rows with names outside
    /// the course role enumeration are ignored.
    pub fn from_entities(
        entities: impl IntoIterator<Item = CourseRoleEntity>,
    ) -> Result<Self, RoleLookupError> {
        let ids: HashMap<CourseRole, i64> = entities
            .into_iter()
            .filter_map(|e| e.name.parse::<CourseRole>().ok().map(|role| (role, e.id)))
            .collect();

        let id = |role: CourseRole| {
            ids.get(&role)
                .copied()
                .ok_or(RoleLookupError::MissingRole(role.as_str()))
        };
        Ok(Self {
            owner: id(CourseRole::Owner)?,
            instructor: id(CourseRole::Instructor)?,
            staff: id(CourseRole::Staff)?,
            student: id(CourseRole::Student)?,
        })
    }

    pub fn id_of(&self, role: CourseRole) -> i64 {
        match role {
            CourseRole::Owner => self.owner,
            CourseRole::Instructor => self.instructor,
            CourseRole::Staff => self.staff,
            CourseRole::Student => self.student,
        }
    }

    pub fn ids_of(&self, roles: impl IntoIterator<Item = CourseRole>) -> Vec<i64> {
        roles.into_iter().map(|role| self.id_of(role)).collect()
    }
}
