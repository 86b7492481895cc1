//! Human-readable descriptions for history entries.

use staffhub_domain::events::DomainEvent;

/// Renders the one-line description stored with each history entry.
///
/// Injected into the projector so deployments can swap the wording
/// without touching the projection logic.
#[derive(Debug, Clone, Default)]
pub struct EventDescriber;

impl EventDescriber {
    pub fn new() -> Self {
        Self
    }

    /// One line per event, exhaustive over the event set.
    pub fn describe(&self, event: &DomainEvent) -> String {
        match event {
            DomainEvent::EmployeeCreated { name, email, .. } => {
                format!("Employee {} ({}) was created", name, email)
            }
            DomainEvent::EmployeeStatusChanged {
                old_status,
                new_status,
                ..
            } => {
                format!("Status changed from {} to {}", old_status, new_status)
            }
            DomainEvent::EmployeeUpdated { changes, .. } => {
                format!("Profile updated ({})", changes)
            }
            DomainEvent::EmployeeDeleted { .. } => "Employee record was deleted".to_string(),
        }
    }
}
