//! In-memory employee repository for tests and local development.

use async_trait::async_trait;
use staffhub_domain::employees::{Employee, EmployeeRepository};
use staffhub_domain::shared_kernel::{DomainError, EmployeeId};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct InMemoryEmployeeRepository {
    employees: Mutex<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn save(&self, employee: &Employee) -> Result<(), DomainError> {
        self.employees
            .lock()
            .unwrap()
            .insert(employee.id, employee.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, DomainError> {
        Ok(self.employees.lock().unwrap().get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Employee>, DomainError> {
        let mut employees: Vec<Employee> =
            self.employees.lock().unwrap().values().cloned().collect();
        employees.sort_by_key(|e| e.created_at);
        Ok(employees)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = InMemoryEmployeeRepository::new();
        let (employee, _) =
            Employee::new("Ada Lovelace".to_string(), "ada@example.com".to_string()).unwrap();

        repo.save(&employee).await.unwrap();

        let found = repo.find_by_id(employee.id).await.unwrap();
        assert_eq!(found, Some(employee));
    }

    #[tokio::test]
    async fn test_save_overwrites_existing() {
        let repo = InMemoryEmployeeRepository::new();
        let (mut employee, _) =
            Employee::new("Ada".to_string(), "ada@example.com".to_string()).unwrap();

        repo.save(&employee).await.unwrap();
        employee.update_profile(Some("Ada Lovelace".to_string()), None).unwrap();
        repo.save(&employee).await.unwrap();

        let all = repo.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Ada Lovelace");
    }
}
