use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Uuid,
    pub name: String,
    pub class_name: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Student {
    pub fn new(name: impl Into<String>, class_name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            class_name,
            created_at: chrono::Local::now().naive_local(),
        }
    }
}
