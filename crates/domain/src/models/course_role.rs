//! Course-scoped roles and validated role sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Role an account holds within a single course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseRole {
    Owner,
    Instructor,
    Staff,
    Student,
}

impl CourseRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseRole::Owner => "owner",
            CourseRole::Instructor => "instructor",
            CourseRole::Staff => "staff",
            CourseRole::Student => "student",
        }
    }

    /// Owner, instructor and staff carry course-management privileges.
    pub fn is_teaching(&self) -> bool {
        matches!(
            self,
            CourseRole::Owner | CourseRole::Instructor | CourseRole::Staff
        )
    }

    pub fn all() -> &'static [CourseRole] {
        &[
            CourseRole::Owner,
            CourseRole::Instructor,
            CourseRole::Staff,
            CourseRole::Student,
        ]
    }
}

impl FromStr for CourseRole {
    type Err = DomainError;

    /// Accepts only the exact lowercase token as stored and seeded.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(CourseRole::Owner),
            "instructor" => Ok(CourseRole::Instructor),
            "staff" => Ok(CourseRole::Staff),
            "student" => Ok(CourseRole::Student),
            _ => Err(DomainError::InvalidRole(format!(
                "'{}' is not a course role (expected owner, instructor, staff or student)",
                s
            ))),
        }
    }
}

impl fmt::Display for CourseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Set of course roles held by one account in one course.
///
/// Duplicates collapse and order is irrelevant. Serialized as a sorted list
/// of role names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseRoles(BTreeSet<CourseRole>);

impl CourseRoles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses role names, rejecting anything outside the four course roles.
    pub fn parse<I, S>(names: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .map(|name| name.as_ref().parse::<CourseRole>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(CourseRoles)
    }

    /// Like [`CourseRoles::parse`], treating a missing list as empty.
    pub fn from_optional<I, S>(names: Option<I>) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        match names {
            Some(names) => Self::parse(names),
            None => Ok(Self::new()),
        }
    }

    pub fn has(&self, role: CourseRole) -> bool {
        self.0.contains(&role)
    }

    /// Membership check by name; unknown names are simply not held.
    pub fn has_named(&self, name: &str) -> bool {
        name.parse::<CourseRole>()
            .map(|role| self.has(role))
            .unwrap_or(false)
    }

    pub fn is_owner(&self) -> bool {
        self.has(CourseRole::Owner)
    }

    pub fn is_instructor(&self) -> bool {
        self.has(CourseRole::Instructor)
    }

    pub fn is_staff(&self) -> bool {
        self.has(CourseRole::Staff)
    }

    pub fn is_student(&self) -> bool {
        self.has(CourseRole::Student)
    }

    /// True iff any of owner, instructor or staff is held.
    pub fn is_teaching(&self) -> bool {
        self.0.iter().any(CourseRole::is_teaching)
    }

    pub fn count(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn any(&self) -> bool {
        !self.is_empty()
    }

    /// Returns a new set with `role` added.
    pub fn with(&self, role: CourseRole) -> Self {
        let mut roles = self.0.clone();
        roles.insert(role);
        CourseRoles(roles)
    }

    /// Returns a new set with every role from `other` added.
    pub fn union(&self, other: &CourseRoles) -> Self {
        CourseRoles(self.0.union(&other.0).copied().collect())
    }

    pub fn iter(&self) -> impl Iterator<Item = CourseRole> + '_ {
        self.0.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<CourseRole> {
        self.iter().collect()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(|role| role.as_str()).collect()
    }
}

impl FromIterator<CourseRole> for CourseRoles {
    fn from_iter<T: IntoIterator<Item = CourseRole>>(iter: T) -> Self {
        CourseRoles(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_role_as_str() {
        assert_eq!(CourseRole::Owner.as_str(), "owner");
        assert_eq!(CourseRole::Instructor.as_str(), "instructor");
        assert_eq!(CourseRole::Staff.as_str(), "staff");
        assert_eq!(CourseRole::Student.as_str(), "student");
    }

    #[test]
    fn test_course_role_from_str() {
        assert_eq!("owner".parse::<CourseRole>().unwrap(), CourseRole::Owner);
        assert_eq!(
            "instructor".parse::<CourseRole>().unwrap(),
            CourseRole::Instructor
        );
        assert!(matches!(
            "admin".parse::<CourseRole>(),
            Err(DomainError::InvalidRole(_))
        ));
        assert!("".parse::<CourseRole>().is_err());
    }

    #[test]
    fn test_course_role_teaching() {
        assert!(CourseRole::Owner.is_teaching());
        assert!(CourseRole::Instructor.is_teaching());
        assert!(CourseRole::Staff.is_teaching());
        assert!(!CourseRole::Student.is_teaching());
    }

    #[test]
    fn test_from_none_and_empty_are_empty() {
        let from_none = CourseRoles::from_optional(None::<Vec<String>>).unwrap();
        assert!(from_none.is_empty());
        assert!(!from_none.any());

        let from_empty = CourseRoles::parse(Vec::<String>::new()).unwrap();
        assert!(from_empty.is_empty());
        assert!(!from_empty.any());
        assert_eq!(from_empty.count(), 0);
    }

    #[test]
    fn test_parse_rejects_unknown_token() {
        let result = CourseRoles::parse(["student", "teacher"]);
        match result {
            Err(DomainError::InvalidRole(msg)) => assert!(msg.contains("teacher")),
            other => panic!("Expected InvalidRole, got {:?}", other),
        }
        assert!(CourseRoles::parse(["admin"]).is_err());
        assert!(CourseRoles::parse(["creator"]).is_err());
    }

    #[test]
    fn test_parse_rejects_non_canonical_tokens() {
        for token in ["OWNER", "Instructor", " student ", "staff\n"] {
            assert!(
                matches!(
                    CourseRoles::parse([token]),
                    Err(DomainError::InvalidRole(_))
                ),
                "{:?} should be rejected",
                token
            );
        }
        assert!(!CourseRoles::parse(["student"]).unwrap().has_named("Student"));
    }

    #[test]
    fn test_duplicates_collapse() {
        let roles = CourseRoles::parse(["student", "student", "staff"]).unwrap();
        assert_eq!(roles.count(), 2);
        assert_eq!(roles.to_vec(), vec![CourseRole::Staff, CourseRole::Student]);
    }

    #[test]
    fn test_order_is_irrelevant() {
        let a = CourseRoles::parse(["owner", "student"]).unwrap();
        let b = CourseRoles::parse(["student", "owner"]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_predicates() {
        let roles = CourseRoles::parse(["instructor", "student"]).unwrap();
        assert!(roles.has(CourseRole::Instructor));
        assert!(roles.has_named("student"));
        assert!(!roles.has_named("owner"));
        assert!(!roles.has_named("superuser"));
        assert!(roles.is_instructor());
        assert!(roles.is_student());
        assert!(!roles.is_owner());
        assert!(!roles.is_staff());
        assert!(roles.is_teaching());
        assert!(roles.any());
    }

    #[test]
    fn test_student_only_is_not_teaching() {
        let roles = CourseRoles::parse(["student"]).unwrap();
        assert!(!roles.is_teaching());
        // No role implies another.
        assert!(!roles.is_staff());
    }

    #[test]
    fn test_teaching_is_or_of_three_roles() {
        for name in ["owner", "instructor", "staff"] {
            assert!(CourseRoles::parse([name]).unwrap().is_teaching());
        }
        let owner = CourseRoles::parse(["owner"]).unwrap();
        assert!(!owner.is_instructor());
        assert!(!owner.is_staff());
    }

    #[test]
    fn test_with_and_union_return_new_sets() {
        let student = CourseRoles::parse(["student"]).unwrap();
        let both = student.with(CourseRole::Staff);
        assert_eq!(student.count(), 1);
        assert_eq!(both.count(), 2);

        let owner = CourseRoles::parse(["owner"]).unwrap();
        let merged = both.union(&owner);
        assert_eq!(merged.count(), 3);
        assert_eq!(both.count(), 2);
    }

    #[test]
    fn test_serialization() {
        let roles = CourseRoles::parse(["student", "owner"]).unwrap();
        let json = serde_json::to_string(&roles).unwrap();
        assert_eq!(json, r#"["owner","student"]"#);

        let parsed: CourseRoles = serde_json::from_str(r#"["staff","staff"]"#).unwrap();
        assert_eq!(parsed.count(), 1);
    }

    #[test]
    fn test_names() {
        let roles = CourseRoles::parse(["staff", "owner"]).unwrap();
        assert_eq!(roles.names(), vec!["owner", "staff"]);
    }
}
