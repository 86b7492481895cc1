//! Shared kernel: identifiers, employee status and the domain error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for employees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmployeeId(pub Uuid);

impl EmployeeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EmployeeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for departments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub Uuid);

impl DepartmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DepartmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PositionId(pub Uuid);

impl PositionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PositionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Employment status of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmployeeStatus {
    Active,
    OnLeave,
    Suspended,
    Terminated,
}

impl EmployeeStatus {
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "ACTIVE" => Ok(EmployeeStatus::Active),
            "ON_LEAVE" => Ok(EmployeeStatus::OnLeave),
            "SUSPENDED" => Ok(EmployeeStatus::Suspended),
            "TERMINATED" => Ok(EmployeeStatus::Terminated),
            other => Err(DomainError::Validation {
                message: format!("Unknown employee status: {}", other),
            }),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmployeeStatus::Active => "ACTIVE",
            EmployeeStatus::OnLeave => "ON_LEAVE",
            EmployeeStatus::Suspended => "SUSPENDED",
            EmployeeStatus::Terminated => "TERMINATED",
        };
        write!(f, "{}", s)
    }
}

/// Error type for domain operations
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: EmployeeStatus,
        to: EmployeeStatus,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Infrastructure error: {message}")]
    InfrastructureError { message: String },
}
