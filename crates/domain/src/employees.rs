//! Employee aggregate.
//!
//! Kept deliberately small: the HR CRUD surface around it is routine
//! plumbing. What matters here is that state changes return the events they
//! raise as values, so the caller decides which buffer they land in.

use crate::events::DomainEvent;
use crate::shared_kernel::{DepartmentId, DomainError, EmployeeId, EmployeeStatus, PositionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An employee record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    pub email: String,
    pub status: EmployeeStatus,
    pub department_id: Option<DepartmentId>,
    pub position_id: Option<PositionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Create a new employee record. Returns the aggregate together with
    /// the `EmployeeCreated` event it raised.
    pub fn new(name: String, email: String) -> Result<(Self, DomainEvent), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Employee name must not be empty".to_string(),
            });
        }
        if !email.contains('@') {
            return Err(DomainError::Validation {
                message: format!("Invalid email address: {}", email),
            });
        }

        let now = Utc::now();
        let employee = Self {
            id: EmployeeId::new(),
            name: name.clone(),
            email: email.clone(),
            status: EmployeeStatus::Active,
            department_id: None,
            position_id: None,
            created_at: now,
            updated_at: now,
        };

        let event = DomainEvent::EmployeeCreated {
            event_id: Uuid::new_v4(),
            employee_id: employee.id,
            name,
            email,
            occurred_at: now,
        };

        Ok((employee, event))
    }

    /// Change the employment status. No event is raised when the status is
    /// unchanged; a terminated employee cannot transition anywhere else.
    pub fn change_status(
        &mut self,
        new_status: EmployeeStatus,
    ) -> Result<Option<DomainEvent>, DomainError> {
        if self.status == new_status {
            return Ok(None);
        }
        if self.status == EmployeeStatus::Terminated {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: new_status,
            });
        }

        let old_status = self.status;
        let now = Utc::now();
        self.status = new_status;
        self.updated_at = now;

        Ok(Some(DomainEvent::EmployeeStatusChanged {
            event_id: Uuid::new_v4(),
            employee_id: self.id,
            old_status,
            new_status,
            occurred_at: now,
        }))
    }

    /// Edit profile fields. `changes` is a short human-readable summary of
    /// what was edited.
    pub fn update_profile(
        &mut self,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Option<DomainEvent>, DomainError> {
        let mut changes = Vec::new();

        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(DomainError::Validation {
                    message: "Employee name must not be empty".to_string(),
                });
            }
            if name != self.name {
                changes.push(format!("name: {} -> {}", self.name, name));
                self.name = name;
            }
        }
        if let Some(email) = email {
            if !email.contains('@') {
                return Err(DomainError::Validation {
                    message: format!("Invalid email address: {}", email),
                });
            }
            if email != self.email {
                changes.push(format!("email: {} -> {}", self.email, email));
                self.email = email;
            }
        }

        if changes.is_empty() {
            return Ok(None);
        }

        let now = Utc::now();
        self.updated_at = now;
        Ok(Some(DomainEvent::EmployeeUpdated {
            event_id: Uuid::new_v4(),
            employee_id: self.id,
            changes: changes.join(", "),
            occurred_at: now,
        }))
    }
}

/// Store for employee records.
#[async_trait::async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn save(&self, employee: &Employee) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError>;

    async fn list(&self) -> Result<Vec<Employee>, DomainError>;
}
