//! In-memory employee filtering.
//!
//! Plain predicate combinators: every criterion is an ordinary boolean
//! check and evaluation short-circuits through `&&`, never through error
//! signaling.

use staffhub_domain::employees::Employee;
use staffhub_domain::shared_kernel::{DepartmentId, EmployeeStatus};

/// Combinable filter over employee records.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    name_contains: Option<String>,
    email_contains: Option<String>,
    status: Option<EmployeeStatus>,
    department_id: Option<DepartmentId>,
}

impl EmployeeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive substring match on the name.
    pub fn name_contains(mut self, fragment: impl Into<String>) -> Self {
        self.name_contains = Some(fragment.into().to_lowercase());
        self
    }

    /// Case-insensitive substring match on the email.
    pub fn email_contains(mut self, fragment: impl Into<String>) -> Self {
        self.email_contains = Some(fragment.into().to_lowercase());
        self
    }

    pub fn with_status(mut self, status: EmployeeStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn in_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Whether the employee satisfies every configured criterion.
    pub fn matches(&self, employee: &Employee) -> bool {
        self.name_contains
            .as_ref()
            .map_or(true, |f| employee.name.to_lowercase().contains(f))
            && self
                .email_contains
                .as_ref()
                .map_or(true, |f| employee.email.to_lowercase().contains(f))
            && self.status.map_or(true, |s| employee.status == s)
            && self
                .department_id
                .map_or(true, |d| employee.department_id == Some(d))
    }

    /// Apply the filter to a list of employees.
    pub fn apply<'a>(&self, employees: &'a [Employee]) -> Vec<&'a Employee> {
        employees.iter().filter(|e| self.matches(e)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str, email: &str) -> Employee {
        Employee::new(name.to_string(), email.to_string()).unwrap().0
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let e = employee("Ada Lovelace", "ada@example.com");
        assert!(EmployeeFilter::new().matches(&e));
    }

    #[test]
    fn test_name_fragment_is_case_insensitive() {
        let e = employee("Ada Lovelace", "ada@example.com");
        assert!(EmployeeFilter::new().name_contains("lovelace").matches(&e));
        assert!(!EmployeeFilter::new().name_contains("hopper").matches(&e));
    }

    #[test]
    fn test_combined_criteria_all_must_hold() {
        let mut e = employee("Ada Lovelace", "ada@example.com");
        e.status = EmployeeStatus::OnLeave;

        let filter = EmployeeFilter::new()
            .name_contains("ada")
            .with_status(EmployeeStatus::OnLeave);
        assert!(filter.matches(&e));

        let mismatched = EmployeeFilter::new()
            .name_contains("ada")
            .with_status(EmployeeStatus::Active);
        assert!(!mismatched.matches(&e));
    }

    #[test]
    fn test_apply_keeps_only_matching() {
        let employees = vec![
            employee("Ada Lovelace", "ada@example.com"),
            employee("Grace Hopper", "grace@example.com"),
            employee("Adam Smith", "adam@example.com"),
        ];

        let filter = EmployeeFilter::new().name_contains("ada");
        let matched = filter.apply(&employees);
        assert_eq!(matched.len(), 2);
    }

    #[test]
    fn test_department_criterion() {
        let mut e = employee("Ada", "ada@example.com");
        let department = DepartmentId::new();
        e.department_id = Some(department);

        assert!(EmployeeFilter::new().in_department(department).matches(&e));
        assert!(!EmployeeFilter::new()
            .in_department(DepartmentId::new())
            .matches(&e));
    }
}
