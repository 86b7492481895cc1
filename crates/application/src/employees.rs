//! Employee service: unit-of-work orchestration around the aggregate.

use staffhub_domain::employees::{Employee, EmployeeRepository};
use staffhub_domain::outbox::EventDispatcher;
use staffhub_domain::shared_kernel::{DomainError, EmployeeId, EmployeeStatus};
use staffhub_domain::unit_of_work::UnitOfWork;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Application service for employee records.
///
/// Every mutating call follows the same shape: open a unit of work, run the
/// aggregate, persist the record, then commit. The dispatcher only runs on
/// commit; if the repository write fails the unit of work is dropped and no
/// event ever reaches the outbox.
pub struct EmployeeService {
    repository: Arc<dyn EmployeeRepository>,
    dispatcher: Arc<EventDispatcher>,
}

impl EmployeeService {
    pub fn new(repository: Arc<dyn EmployeeRepository>, dispatcher: Arc<EventDispatcher>) -> Self {
        Self {
            repository,
            dispatcher,
        }
    }

    #[instrument(skip(self), fields(name = %name))]
    pub async fn create_employee(
        &self,
        name: String,
        email: String,
    ) -> Result<Employee, DomainError> {
        let uow = UnitOfWork::new();

        let (employee, event) = Employee::new(name, email)?;
        self.repository.save(&employee).await?;
        uow.buffer().record(event);

        let report = uow.commit(&self.dispatcher).await;
        if report.has_failures() {
            warn!(
                employee_id = %employee.id,
                failed = report.failed,
                "Employee committed but some events were not recorded in the outbox"
            );
        }

        info!(employee_id = %employee.id, "Employee created");
        Ok(employee)
    }

    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: EmployeeId,
        new_status: EmployeeStatus,
    ) -> Result<Employee, DomainError> {
        let uow = UnitOfWork::new();

        let mut employee = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::EmployeeNotFound(id))?;

        if let Some(event) = employee.change_status(new_status)? {
            uow.buffer().record(event);
        }
        self.repository.save(&employee).await?;

        let report = uow.commit(&self.dispatcher).await;
        if report.has_failures() {
            warn!(
                employee_id = %employee.id,
                failed = report.failed,
                "Status change committed but some events were not recorded in the outbox"
            );
        }

        Ok(employee)
    }

    #[instrument(skip(self))]
    pub async fn update_profile(
        &self,
        id: EmployeeId,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<Employee, DomainError> {
        let uow = UnitOfWork::new();

        let mut employee = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::EmployeeNotFound(id))?;

        if let Some(event) = employee.update_profile(name, email)? {
            uow.buffer().record(event);
        }
        self.repository.save(&employee).await?;

        uow.commit(&self.dispatcher).await;
        Ok(employee)
    }

    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee, DomainError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::EmployeeNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use staffhub_domain::outbox::{
        AggregateType, OutboxError, OutboxMessage, OutboxRepository, OutboxStats, OutboxStatus,
    };
    use std::sync::Mutex;
    use uuid::Uuid;

    struct InMemoryEmployees {
        employees: Mutex<Vec<Employee>>,
    }

    impl InMemoryEmployees {
        fn new() -> Self {
            Self {
                employees: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EmployeeRepository for InMemoryEmployees {
        async fn save(&self, employee: &Employee) -> Result<(), DomainError> {
            let mut employees = self.employees.lock().unwrap();
            if let Some(existing) = employees.iter_mut().find(|e| e.id == employee.id) {
                *existing = employee.clone();
            } else {
                employees.push(employee.clone());
            }
            Ok(())
        }

        async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
            Ok(self
                .employees
                .lock()
                .unwrap()
                .iter()
                .find(|e| e.id == id)
                .cloned())
        }

        async fn list(&self) -> Result<Vec<Employee>, DomainError> {
            Ok(self.employees.lock().unwrap().clone())
        }
    }

    struct RecordingOutbox {
        messages: Mutex<Vec<OutboxMessage>>,
    }

    impl RecordingOutbox {
        fn new() -> Self {
            Self {
                messages: Mutex::new(Vec::new()),
            }
        }

        fn messages(&self) -> Vec<OutboxMessage> {
            self.messages.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OutboxRepository for RecordingOutbox {
        async fn append(&self, message: &OutboxMessage) -> Result<(), OutboxError> {
            let mut messages = self.messages.lock().unwrap();
            if messages.iter().any(|m| m.id == message.id) {
                return Err(OutboxError::DuplicateEventId(message.id));
            }
            messages.push(message.clone());
            Ok(())
        }

        async fn select_due(
            &self,
            _statuses: &[OutboxStatus],
            _before: DateTime<Utc>,
            _limit: usize,
        ) -> Result<Vec<OutboxMessage>, OutboxError> {
            Ok(Vec::new())
        }

        async fn claim(&self, _id: Uuid, _lease_until: DateTime<Utc>) -> Result<bool, OutboxError> {
            Ok(true)
        }

        async fn mark_published(
            &self,
            _id: Uuid,
            _processed_at: DateTime<Utc>,
        ) -> Result<(), OutboxError> {
            Ok(())
        }

        async fn mark_failed(
            &self,
            _id: Uuid,
            _next_attempt_at: DateTime<Utc>,
            _retry_attempts: i32,
            _error: &str,
        ) -> Result<bool, OutboxError> {
            Ok(true)
        }

        async fn count_pending(&self) -> Result<u64, OutboxError> {
            Ok(self.messages.lock().unwrap().len() as u64)
        }

        async fn stats(&self) -> Result<OutboxStats, OutboxError> {
            Ok(OutboxStats::default())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<OutboxMessage>, OutboxError> {
            Ok(self
                .messages
                .lock()
                .unwrap()
                .iter()
                .find(|m| m.id == id)
                .cloned())
        }
    }

    fn service_with_outbox() -> (EmployeeService, Arc<RecordingOutbox>) {
        let outbox = Arc::new(RecordingOutbox::new());
        let dispatcher = Arc::new(EventDispatcher::new(outbox.clone()));
        let service = EmployeeService::new(Arc::new(InMemoryEmployees::new()), dispatcher);
        (service, outbox)
    }

    #[tokio::test]
    async fn test_create_employee_produces_one_pending_outbox_message() {
        let (service, outbox) = service_with_outbox();

        let employee = service
            .create_employee("Ada Lovelace".to_string(), "ada@example.com".to_string())
            .await
            .unwrap();

        let messages = outbox.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].event_type, "EmployeeCreated");
        assert_eq!(messages[0].aggregate_type, AggregateType::Employee);
        assert_eq!(messages[0].aggregate_id, employee.id.as_uuid());
        assert_eq!(messages[0].status, OutboxStatus::Pending);
    }

    #[tokio::test]
    async fn test_status_change_produces_exactly_one_event_with_both_statuses() {
        let (service, outbox) = service_with_outbox();

        let employee = service
            .create_employee("Ada".to_string(), "ada@example.com".to_string())
            .await
            .unwrap();

        // Nothing buffered before the status-change call beyond the creation
        assert_eq!(outbox.messages().len(), 1);

        service
            .change_status(employee.id, EmployeeStatus::Terminated)
            .await
            .unwrap();

        let messages = outbox.messages();
        assert_eq!(messages.len(), 2);
        let change = &messages[1];
        assert_eq!(change.event_type, "EmployeeStatusChanged");

        let payload = change.payload.clone();
        let event: staffhub_domain::DomainEvent = serde_json::from_value(payload).unwrap();
        match event {
            staffhub_domain::DomainEvent::EmployeeStatusChanged {
                old_status,
                new_status,
                ..
            } => {
                assert_eq!(old_status, EmployeeStatus::Active);
                assert_eq!(new_status, EmployeeStatus::Terminated);
            }
            other => panic!("expected EmployeeStatusChanged, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_noop_status_change_produces_no_event() {
        let (service, outbox) = service_with_outbox();

        let employee = service
            .create_employee("Ada".to_string(), "ada@example.com".to_string())
            .await
            .unwrap();

        service
            .change_status(employee.id, EmployeeStatus::Active)
            .await
            .unwrap();

        assert_eq!(outbox.messages().len(), 1, "only the creation event");
    }

    #[tokio::test]
    async fn test_failed_validation_leaves_outbox_empty() {
        let (service, outbox) = service_with_outbox();

        let result = service
            .create_employee("".to_string(), "ada@example.com".to_string())
            .await;

        assert!(result.is_err());
        assert!(outbox.messages().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_employee_is_an_error() {
        let (service, _outbox) = service_with_outbox();
        let result = service
            .change_status(EmployeeId::new(), EmployeeStatus::OnLeave)
            .await;
        assert!(matches!(result, Err(DomainError::EmployeeNotFound(_))));
    }
}
