// Test data - Builders and a per-test factory for unique records
//
// Builders validate at `build()` and return `Error::InvalidData` for
// anything the application would reject for structural reasons (missing
// names, over-long ids, inverted date ranges), so a test fails at setup
// instead of producing a confusing UI outcome.

use crate::error::{Error, Result};
use chrono::{Duration as Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, Ordering};
use uuid::Uuid;

/// Longest employee id the application accepts
pub const MAX_EMPLOYEE_ID_LEN: usize = 10;

/// Longest job title the application accepts
pub const MAX_JOB_TITLE_LEN: usize = 100;

/// Date format of the demo deployment's default localization (yyyy-dd-mm)
pub const UI_DATE_FORMAT: &str = "%Y-%d-%m";

/// Formats a date the way the date inputs expect it.
pub fn ui_date(date: NaiveDate) -> String {
    date.format(UI_DATE_FORMAT).to_string()
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(Error::invalid(field, "is required")),
    }
}

// ============================================================================
// Employee
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    /// Left to the application's generator when `None`
    pub employee_id: Option<String>,
}

impl Employee {
    pub fn builder() -> EmployeeBuilder {
        EmployeeBuilder::default()
    }

    /// "First Last", the form the employee autocomplete and tables show
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmployeeBuilder {
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    employee_id: Option<String>,
}

impl EmployeeBuilder {
    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn middle_name(mut self, name: impl Into<String>) -> Self {
        self.middle_name = Some(name.into());
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn employee_id(mut self, id: impl Into<String>) -> Self {
        self.employee_id = Some(id.into());
        self
    }

    pub fn build(self) -> Result<Employee> {
        let first_name = required("first name", self.first_name)?;
        let last_name = required("last name", self.last_name)?;
        let employee_id = match self.employee_id {
            Some(id) if id.chars().count() > MAX_EMPLOYEE_ID_LEN => {
                return Err(Error::invalid(
                    "employee id",
                    format!("'{}' exceeds {} characters", id, MAX_EMPLOYEE_ID_LEN),
                ));
            }
            Some(id) if id.trim().is_empty() => None,
            other => other,
        };
        Ok(Employee {
            first_name,
            middle_name: self.middle_name.filter(|m| !m.trim().is_empty()),
            last_name,
            employee_id,
        })
    }
}

// ============================================================================
// Department
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub name: String,
    /// Parent unit in the organization tree; the root when `None`
    pub parent: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct DepartmentBuilder {
    name: Option<String>,
    parent: Option<String>,
}

impl DepartmentBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn build(self) -> Result<Department> {
        let name = required("department name", self.name)?;
        if self.parent.as_deref() == Some(name.as_str()) {
            return Err(Error::invalid("department parent", "a unit cannot be its own parent"));
        }
        Ok(Department {
            name,
            parent: self.parent,
        })
    }
}

// ============================================================================
// Job title
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct JobTitleBuilder {
    title: Option<String>,
    description: Option<String>,
}

impl JobTitleBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Result<JobTitle> {
        let title = required("job title", self.title)?;
        if title.chars().count() > MAX_JOB_TITLE_LEN {
            return Err(Error::invalid(
                "job title",
                format!("exceeds {} characters", MAX_JOB_TITLE_LEN),
            ));
        }
        Ok(JobTitle {
            title,
            description: self.description,
        })
    }
}

// ============================================================================
// Leave
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Requested leave type; the first offered type when `None`
    pub leave_type: Option<String>,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub comment: Option<String>,
}

impl LeaveRequest {
    pub fn builder() -> LeaveRequestBuilder {
        LeaveRequestBuilder::default()
    }

    /// Calendar days covered, both ends included
    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct LeaveRequestBuilder {
    leave_type: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    comment: Option<String>,
}

impl LeaveRequestBuilder {
    pub fn leave_type(mut self, leave_type: impl Into<String>) -> Self {
        self.leave_type = Some(leave_type.into());
        self
    }

    pub fn from(mut self, date: NaiveDate) -> Self {
        self.from = Some(date);
        self
    }

    pub fn to(mut self, date: NaiveDate) -> Self {
        self.to = Some(date);
        self
    }

    /// Parses `YYYY-MM-DD` start and end dates.
    pub fn dates(mut self, from: &str, to: &str) -> Result<Self> {
        self.from = Some(parse_date("from date", from)?);
        self.to = Some(parse_date("to date", to)?);
        Ok(self)
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// `to` defaults to `from` (a single-day request).
    pub fn build(self) -> Result<LeaveRequest> {
        let from = self
            .from
            .ok_or_else(|| Error::invalid("from date", "is required"))?;
        let to = self.to.unwrap_or(from);
        if to < from {
            return Err(Error::invalid(
                "to date",
                format!("{} is before {}", to, from),
            ));
        }
        Ok(LeaveRequest {
            leave_type: self.leave_type,
            from,
            to,
            comment: self.comment,
        })
    }
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid(field, format!("'{}': {}", raw, e)))
}

/// Entitlement bookkeeping for one employee and leave type, in days
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaveBalance {
    entitlement: f64,
    used: f64,
    pending: f64,
}

impl LeaveBalance {
    pub fn new(entitlement: f64, used: f64, pending: f64) -> Result<Self> {
        for (field, value) in [("entitlement", entitlement), ("used", used), ("pending", pending)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid(field, format!("{} must be a non-negative number", value)));
            }
        }
        if used + pending > entitlement {
            return Err(Error::invalid(
                "leave balance",
                format!(
                    "used ({}) + pending ({}) exceeds entitlement ({})",
                    used, pending, entitlement
                ),
            ));
        }
        Ok(Self {
            entitlement,
            used,
            pending,
        })
    }

    pub fn entitlement(&self) -> f64 {
        self.entitlement
    }

    pub fn used(&self) -> f64 {
        self.used
    }

    pub fn pending(&self) -> f64 {
        self.pending
    }

    pub fn available(&self) -> f64 {
        self.entitlement - self.used - self.pending
    }
}

// ============================================================================
// Candidate
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    /// Vacancy to attach the application to
    pub vacancy: Option<String>,
}

impl Candidate {
    pub fn full_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CandidateBuilder {
    first_name: Option<String>,
    middle_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    vacancy: Option<String>,
}

impl CandidateBuilder {
    pub fn first_name(mut self, name: impl Into<String>) -> Self {
        self.first_name = Some(name.into());
        self
    }

    pub fn middle_name(mut self, name: impl Into<String>) -> Self {
        self.middle_name = Some(name.into());
        self
    }

    pub fn last_name(mut self, name: impl Into<String>) -> Self {
        self.last_name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn vacancy(mut self, vacancy: impl Into<String>) -> Self {
        self.vacancy = Some(vacancy.into());
        self
    }

    pub fn build(self) -> Result<Candidate> {
        let first_name = required("first name", self.first_name)?;
        let last_name = required("last name", self.last_name)?;
        let email = required("email", self.email)?;
        let well_formed = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && domain.contains('.'));
        if !well_formed {
            return Err(Error::invalid("email", format!("'{}' is not an address", email)));
        }
        Ok(Candidate {
            first_name,
            middle_name: self.middle_name,
            last_name,
            email,
            vacancy: self.vacancy,
        })
    }
}

// ============================================================================
// Factory
// ============================================================================

/// Unique-data generator bound to one test invocation
///
/// Every value it produces carries a run tag derived from a v4 UUID, so
/// parallel tests against the shared demo database do not collide.
#[derive(Debug)]
pub struct TestDataFactory {
    tag: String,
    counter: AtomicU32,
}

impl Default for TestDataFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDataFactory {
    pub fn new() -> Self {
        let uuid = Uuid::new_v4().simple().to_string();
        Self {
            tag: uuid[..6].to_string(),
            counter: AtomicU32::new(0),
        }
    }

    /// Run tag shared by everything this factory produces
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// `label` plus the run tag and a sequence number
    pub fn unique(&self, label: &str) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("{}{}{}", label, self.tag, n)
    }

    /// A numeric employee id of exactly `MAX_EMPLOYEE_ID_LEN` digits
    pub fn employee_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) as u128;
        let seed = Uuid::new_v4().as_u128().wrapping_add(n);
        format!("{:010}", seed % 10_000_000_000)
    }

    /// Employee builder prefilled with unique names and id
    pub fn employee(&self) -> EmployeeBuilder {
        Employee::builder()
            .first_name("Test")
            .last_name(self.unique("Employee"))
            .employee_id(self.employee_id())
    }

    pub fn department(&self) -> DepartmentBuilder {
        DepartmentBuilder::default().name(self.unique("Dept"))
    }

    pub fn job_title(&self) -> JobTitleBuilder {
        JobTitleBuilder::default()
            .title(self.unique("QA Title "))
            .description("Created by the end-to-end suite")
    }

    /// Single-day request starting `days_ahead` days from today
    pub fn leave_request(&self, days_ahead: i64) -> LeaveRequestBuilder {
        let from = chrono::Local::now().date_naive() + Days::days(days_ahead);
        LeaveRequest::builder()
            .from(from)
            .to(from)
            .comment(self.unique("e2e leave "))
    }

    pub fn candidate(&self) -> CandidateBuilder {
        let last = self.unique("Candidate");
        CandidateBuilder::default()
            .first_name("Test")
            .email(format!("{}@example.com", last.to_lowercase()))
            .last_name(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_employee_requires_names() {
        let err = Employee::builder().last_name("Doe").build().unwrap_err();
        assert!(matches!(err, Error::InvalidData { ref field, .. } if field == "first name"));

        let err = Employee::builder().first_name("  ").last_name("Doe").build().unwrap_err();
        assert!(err.to_string().contains("first name"));
    }

    #[test]
    fn test_employee_id_length_limit() {
        let ok = Employee::builder()
            .first_name("Test")
            .last_name("Employee123")
            .employee_id("9999999999")
            .build()
            .unwrap();
        assert_eq!(ok.employee_id.as_deref(), Some("9999999999"));
        assert_eq!(ok.full_name(), "Test Employee123");

        let err = Employee::builder()
            .first_name("Test")
            .last_name("Employee")
            .employee_id("12345678901")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("exceeds 10 characters"));
    }

    #[test]
    fn test_leave_request_date_order() {
        let single = LeaveRequest::builder()
            .dates("2020-01-01", "2020-01-01")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(single.days(), 1);

        let err = LeaveRequest::builder()
            .dates("2020-01-05", "2020-01-01")
            .unwrap()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData { ref field, .. } if field == "to date"));

        assert!(LeaveRequest::builder().dates("01/01/2020", "2020-01-01").is_err());
        assert!(LeaveRequest::builder().build().is_err());
    }

    #[test]
    fn test_ui_date_format() {
        let date = NaiveDate::from_ymd_opt(2020, 3, 14).unwrap();
        assert_eq!(ui_date(date), "2020-14-03");
    }

    #[test]
    fn test_leave_balance_invariant() {
        let balance = LeaveBalance::new(10.0, 4.0, 2.5).unwrap();
        assert_eq!(balance.available(), 3.5);
        assert!(LeaveBalance::new(10.0, 8.0, 2.0).is_ok());
        assert!(LeaveBalance::new(10.0, 8.0, 2.5).is_err());
        assert!(LeaveBalance::new(-1.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_department_and_job_title() {
        assert!(DepartmentBuilder::default().name("QA").parent("QA").build().is_err());
        assert!(JobTitleBuilder::default().title("x".repeat(101)).build().is_err());
        assert!(JobTitleBuilder::default().build().is_err());
    }

    #[test]
    fn test_candidate_email() {
        let base = || CandidateBuilder::default().first_name("Ada").last_name("Lovelace");
        assert!(base().email("ada@example.com").build().is_ok());
        assert!(base().email("ada.example.com").build().is_err());
        assert!(base().email("@example.com").build().is_err());
        assert!(base().build().is_err());
    }

    #[test]
    fn test_factory_values_are_unique_and_valid() {
        let factory = TestDataFactory::new();
        let a = factory.employee().build().unwrap();
        let b = factory.employee().build().unwrap();
        assert_ne!(a.last_name, b.last_name);
        let id = a.employee_id.unwrap();
        assert_eq!(id.len(), MAX_EMPLOYEE_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_digit()));

        assert!(factory.job_title().build().unwrap().title.contains(factory.tag()));
        assert!(factory.candidate().build().is_ok());
        assert!(factory.department().build().is_ok());
        let leave = factory.leave_request(7).build().unwrap();
        assert_eq!(leave.from, leave.to);
    }
}
