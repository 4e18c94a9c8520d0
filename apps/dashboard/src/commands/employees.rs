//! # Employee Commands
//!
//! Staff roster page: list, add, edit, activate/deactivate, reset password.

use chrono::Utc;
use melatea_core::employees::{
    Employee, EmployeeFilter, EmployeeForm, EmployeeSummary, EMPLOYEES_PAGE_SIZE,
};
use melatea_core::query::{paginate, Page};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

/// Roster table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRow {
    #[serde(flatten)]
    pub employee: Employee,
    pub last_login_label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeesPage {
    pub summary: EmployeeSummary,
    pub employees: Page<EmployeeRow>,
}

pub fn list_employees(
    state: &AppState,
    filter: &EmployeeFilter,
    page: usize,
) -> Result<EmployeesPage, ApiError> {
    state.auth.require_login()?;
    debug!(search = %filter.search, page, "list_employees command");

    let now = Utc::now();
    let (summary, found) = state.employees.with_roster(|r| {
        (EmployeeSummary::of(r.employees()), r.filter(filter))
    });
    let rows = found
        .into_iter()
        .map(|employee| EmployeeRow {
            last_login_label: employee.last_login_label(now),
            employee,
        })
        .collect();

    Ok(EmployeesPage {
        summary,
        employees: paginate(rows, page, EMPLOYEES_PAGE_SIZE),
    })
}

pub fn add_employee(state: &AppState, form: EmployeeForm) -> Result<Employee, ApiError> {
    state.auth.require_login()?;
    debug!(email = %form.email, "add_employee command");

    let employee = state
        .employees
        .with_roster_mut(|r| r.add(form, Utc::now()))
        .map_err(|e| {
            warn!(error = %e, "Employee rejected");
            ApiError::from(e)
        })?;

    info!(employee_id = %employee.id, email = %employee.email, "Employee added");
    Ok(employee)
}

pub fn update_employee(
    state: &AppState,
    id: &str,
    form: EmployeeForm,
) -> Result<Employee, ApiError> {
    state.auth.require_login()?;
    debug!(employee_id = %id, "update_employee command");

    let employee = state
        .employees
        .with_roster_mut(|r| r.update(id, form, Utc::now()))
        .map_err(|e| {
            warn!(employee_id = %id, error = %e, "Employee update rejected");
            ApiError::from(e)
        })?;

    info!(employee_id = %employee.id, "Employee updated");
    Ok(employee)
}

pub fn toggle_employee_status(state: &AppState, id: &str) -> Result<Employee, ApiError> {
    state.auth.require_login()?;
    debug!(employee_id = %id, "toggle_employee_status command");

    let employee = state
        .employees
        .with_roster_mut(|r| r.toggle_status(id, Utc::now()))?;

    info!(employee_id = %employee.id, status = ?employee.status, "Employee status changed");
    Ok(employee)
}

/// Returns the temporary password to hand to the employee.
pub fn reset_employee_password(state: &AppState, id: &str) -> Result<String, ApiError> {
    state.auth.require_login()?;
    debug!(employee_id = %id, "reset_employee_password command");

    let temporary = state
        .employees
        .with_roster_mut(|r| r.reset_password(id, Utc::now()))?;

    info!(employee_id = %id, "Password reset");
    Ok(temporary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::logged_in_state;
    use crate::error::ErrorCode;
    use melatea_core::employees::{EmployeeRole, EmployeeStatus};

    fn form(name: &str, email: &str, password: &str) -> EmployeeForm {
        EmployeeForm {
            name: name.to_string(),
            email: email.to_string(),
            role: EmployeeRole::Cashier,
            password: password.to_string(),
            status: EmployeeStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_seeded_roster() {
        let state = logged_in_state().await;

        let page = list_employees(&state, &EmployeeFilter::default(), 1).unwrap();
        assert_eq!(page.summary.total, 8);
        assert_eq!(page.summary.inactive, 2);
        assert_eq!(page.summary.cashiers, 5);

        let row = &page.employees.items[0];
        assert_eq!(row.employee.name, "Airlangga W.");
        assert!(!row.last_login_label.is_empty());
    }

    #[tokio::test]
    async fn test_add_and_duplicate_email() {
        let state = logged_in_state().await;

        let added = add_employee(&state, form("Rina Putri", "rina.p@melatea.com", "tea1")).unwrap();
        assert_eq!(added.status, EmployeeStatus::Active);

        let err = add_employee(&state, form("Rina Two", "RINA.P@melatea.com", "tea1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = add_employee(&state, form("No Mail", "not-an-email", "tea1")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_update_keeps_own_email() {
        let state = logged_in_state().await;

        let mut edit = form("Lisa Chen", "lisa.c@melatea.com", "");
        edit.role = EmployeeRole::Supervisor;
        let updated = update_employee(&state, "4", edit).unwrap();
        assert_eq!(updated.role, EmployeeRole::Supervisor);

        let taken = form("Lisa Chen", "anna.g@melatea.com", "");
        assert!(update_employee(&state, "4", taken).is_err());
    }

    #[tokio::test]
    async fn test_toggle_and_reset() {
        let state = logged_in_state().await;

        let toggled = toggle_employee_status(&state, "5").unwrap();
        assert_eq!(toggled.status, EmployeeStatus::Active);

        let temporary = reset_employee_password(&state, "5").unwrap();
        assert_eq!(temporary.len(), 8);

        let err = toggle_employee_status(&state, "99").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
