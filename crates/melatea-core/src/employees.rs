//! # Employees Module
//!
//! The staff roster managed on the employees page.
//!
//! Passwords are checked when an employee is created and then dropped. The
//! roster never holds a password or a hash of one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::export::format_date_time;
use crate::validation::{validate_email, validate_name, validate_password};

/// Rows per page on the employees page.
pub const EMPLOYEES_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EmployeeRole {
    Manager,
    Supervisor,
    Cashier,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub const fn toggled(self) -> Self {
        match self {
            EmployeeStatus::Active => EmployeeStatus::Inactive,
            EmployeeStatus::Inactive => EmployeeStatus::Active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    pub status: EmployeeStatus,
    #[ts(as = "Option<String>")]
    pub last_login: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    /// Relative "last login" text for the roster table.
    ///
    /// `Never`, `Just now`, `5h ago`, `3d ago`, then the full date after a week.
    pub fn last_login_label(&self, now: DateTime<Utc>) -> String {
        let Some(last_login) = self.last_login else {
            return "Never".to_string();
        };

        let hours = (now - last_login).num_hours();
        match hours {
            h if h < 1 => "Just now".to_string(),
            h if h < 24 => format!("{}h ago", h),
            h if h < 168 => format!("{}d ago", h / 24),
            _ => format_date_time(last_login),
        }
    }
}

/// What the add/edit form submits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub name: String,
    pub email: String,
    pub role: EmployeeRole,
    /// Required for new employees, ignored on edit.
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub status: EmployeeStatus,
}

/// Filters for the roster table. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export)]
pub struct EmployeeFilter {
    /// Matched case-insensitively against name and email.
    pub search: String,
    pub role: Option<EmployeeRole>,
    pub status: Option<EmployeeStatus>,
}

impl EmployeeFilter {
    pub fn matches(&self, employee: &Employee) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || employee.name.to_lowercase().contains(&needle)
            || employee.email.to_lowercase().contains(&needle);

        matches_search
            && self.role.map_or(true, |r| employee.role == r)
            && self.status.map_or(true, |s| employee.status == s)
    }
}

/// Headcount shown above the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployeeSummary {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub managers: usize,
    pub supervisors: usize,
    pub cashiers: usize,
}

impl EmployeeSummary {
    pub fn of(employees: &[Employee]) -> Self {
        employees.iter().fold(
            EmployeeSummary {
                total: employees.len(),
                ..EmployeeSummary::default()
            },
            |mut acc, e| {
                match e.status {
                    EmployeeStatus::Active => acc.active += 1,
                    EmployeeStatus::Inactive => acc.inactive += 1,
                }
                match e.role {
                    EmployeeRole::Manager => acc.managers += 1,
                    EmployeeRole::Supervisor => acc.supervisors += 1,
                    EmployeeRole::Cashier => acc.cashiers += 1,
                }
                acc
            },
        )
    }
}

// =============================================================================
// Roster
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct EmployeeRoster {
    employees: Vec<Employee>,
}

impl EmployeeRoster {
    pub fn new() -> Self {
        EmployeeRoster::default()
    }

    /// Inserts an existing employee record as-is (seed data).
    pub fn insert(&mut self, employee: Employee) {
        self.employees.push(employee);
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn get(&self, id: &str) -> Option<&Employee> {
        self.employees.iter().find(|e| e.id == id)
    }

    /// Adds a new employee.
    ///
    /// ## Errors
    /// - `ValidationError::Required` for a blank name, email or password
    /// - `ValidationError::InvalidFormat` for a malformed email
    /// - `ValidationError::Duplicate` if the email is taken (case-insensitive)
    pub fn add(&mut self, form: EmployeeForm, at: DateTime<Utc>) -> CoreResult<Employee> {
        let (name, email) = self.check_form(&form, None)?;
        validate_password(&form.password)?;

        let employee = Employee {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            role: form.role,
            status: form.status,
            last_login: None,
            created_at: at,
            updated_at: at,
        };
        self.employees.push(employee.clone());
        Ok(employee)
    }

    /// Updates name, email, role and status. The password field is ignored.
    pub fn update(
        &mut self,
        id: &str,
        form: EmployeeForm,
        at: DateTime<Utc>,
    ) -> CoreResult<Employee> {
        let (name, email) = self.check_form(&form, Some(id))?;
        let employee = self.get_mut(id)?;

        employee.name = name;
        employee.email = email;
        employee.role = form.role;
        employee.status = form.status;
        employee.updated_at = at;
        Ok(employee.clone())
    }

    /// Flips active/inactive.
    pub fn toggle_status(&mut self, id: &str, at: DateTime<Utc>) -> CoreResult<Employee> {
        let employee = self.get_mut(id)?;
        employee.status = employee.status.toggled();
        employee.updated_at = at;
        Ok(employee.clone())
    }

    /// Issues a one-time temporary password for the employee to hand over.
    pub fn reset_password(&mut self, id: &str, at: DateTime<Utc>) -> CoreResult<String> {
        let employee = self.get_mut(id)?;
        employee.updated_at = at;
        Ok(Uuid::new_v4().simple().to_string()[..8].to_string())
    }

    /// Records a successful login.
    pub fn record_login(&mut self, id: &str, at: DateTime<Utc>) -> CoreResult<()> {
        self.get_mut(id)?.last_login = Some(at);
        Ok(())
    }

    /// Matching employees in roster order.
    pub fn filter(&self, filter: &EmployeeFilter) -> Vec<Employee> {
        self.employees
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect()
    }

    fn get_mut(&mut self, id: &str) -> CoreResult<&mut Employee> {
        self.employees
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::EmployeeNotFound(id.to_string()))
    }

    fn check_form(
        &self,
        form: &EmployeeForm,
        editing: Option<&str>,
    ) -> CoreResult<(String, String)> {
        let name = validate_name("name", &form.name)?;
        let email = validate_email(&form.email)?;

        let taken = self.employees.iter().any(|e| {
            e.email.eq_ignore_ascii_case(&email) && Some(e.id.as_str()) != editing
        });
        if taken {
            return Err(ValidationError::Duplicate {
                field: "email".to_string(),
                value: email,
            }
            .into());
        }

        Ok((name, email))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
