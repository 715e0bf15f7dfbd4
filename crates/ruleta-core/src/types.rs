//! Persisted records and API payloads.

use serde::{Deserialize, Serialize};

/// A roster participant. `name` acts as the lookup key for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Person {
    pub fn new(name: impl Into<String>, email: Option<String>) -> Self {
        Self {
            name: name.into(),
            email,
        }
    }
}

/// One line of the assignment history. Only the name is kept, never the email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub name: String,
    /// `DD/MM/YYYY`.
    pub date: String,
    /// Spanish month name, e.g. "Enero".
    pub month: String,
    /// "Semana N".
    pub week: String,
}

/// Result of a draw as returned by `POST /api/spin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawOutcome {
    pub selected_person: Person,
    /// Position of the winner in the roster before removal. The frontend
    /// uses it to stop the wheel on the right slice.
    pub target_index: usize,
    pub month: String,
    pub week: String,
    pub date: String,
    pub participants_left: usize,
}

/// A cooking assignment handed to the notifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    pub person: Person,
    pub month: String,
    #[serde(default = "default_task")]
    pub task: String,
}

fn default_task() -> String {
    "Preparar la comida del mes".into()
}

impl Assignment {
    pub fn new(person: Person, month: impl Into<String>) -> Self {
        Self {
            person,
            month: month.into(),
            task: default_task(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_without_email_deserializes() {
        let p: Person = serde_json::from_str(r#"{"name": "Lucía"}"#).unwrap();
        assert_eq!(p.name, "Lucía");
        assert_eq!(p.email, None);
    }

    #[test]
    fn test_person_null_email_serializes_as_null() {
        let json = serde_json::to_value(Person::new("Ana", None)).unwrap();
        assert_eq!(json["email"], serde_json::Value::Null);
    }

    #[test]
    fn test_person_requires_name() {
        assert!(serde_json::from_str::<Person>(r#"{"email": "a@b.c"}"#).is_err());
    }

    #[test]
    fn test_assignment_default_task() {
        let a = Assignment::new(Person::new("Ana", None), "Marzo");
        assert_eq!(a.task, "Preparar la comida del mes");
        let parsed: Assignment =
            serde_json::from_str(r#"{"person": {"name": "Ana"}, "month": "Marzo"}"#).unwrap();
        assert_eq!(parsed, a);
    }
}
