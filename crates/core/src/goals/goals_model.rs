//! Goals domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Domain model representing a shared goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
    pub is_completed: bool,
    pub created_by: String,
}

impl Goal {
    /// Builds a fresh, incomplete goal with a locally generated id.
    pub fn create(new_goal: NewGoal, created_by: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new_goal.name,
            description: new_goal.description,
            deadline: new_goal.deadline,
            is_completed: false,
            created_by: created_by.into(),
        }
    }

    /// Returns a copy carrying a different identifier.
    ///
    /// Used when the store reassigns the id of a freshly added document.
    pub fn with_id(&self, id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with the completion flag inverted.
    pub fn toggled(&self) -> Self {
        Self {
            is_completed: !self.is_completed,
            ..self.clone()
        }
    }
}

/// Input model for creating a new goal
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub description: String,
    pub deadline: DateTime<Utc>,
}

impl NewGoal {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deadline,
        }
    }

    /// Trims name and description and rejects a blank name.
    pub fn normalized(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()));
        }
        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            deadline: self.deadline,
        })
    }
}
