//! Company domain models
//!
//! This module provides the Company entity, its status lifecycle and the
//! inputs used to create and edit companies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use company_rbac::RoleType;

use crate::error::{CompanyError, CompanyResult};

/// Lifecycle status of a company.
///
/// ```text
///   ACTIVE ──ban──▶ BANNED
///     ▲               │
///     └──activate─────┘
///   ACTIVE | BANNED ──delete──▶ DELETED (terminal)
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompanyStatus {
    /// Operating normally
    #[default]
    Active,
    /// Suspended by platform staff
    Banned,
    /// Soft-deleted; terminal
    Deleted,
}

impl CompanyStatus {
    /// Transition table.
    ///
    /// # Examples
    ///
    /// ```
    /// use company_org::CompanyStatus;
    ///
    /// assert!(CompanyStatus::Active.can_transition_to(CompanyStatus::Banned));
    /// assert!(CompanyStatus::Banned.can_transition_to(CompanyStatus::Deleted));
    /// assert!(!CompanyStatus::Deleted.can_transition_to(CompanyStatus::Active));
    /// assert!(!CompanyStatus::Active.can_transition_to(CompanyStatus::Active));
    /// ```
    pub fn can_transition_to(&self, target: CompanyStatus) -> bool {
        use CompanyStatus::*;
        matches!(
            (self, target),
            (Active, Banned) | (Banned, Active) | (Active, Deleted) | (Banned, Deleted)
        )
    }

    /// Check whether the status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CompanyStatus::Deleted)
    }

    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "active",
            CompanyStatus::Banned => "banned",
            CompanyStatus::Deleted => "deleted",
        }
    }

    /// Parse status from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(Self::Active),
            "banned" => Some(Self::Banned),
            "deleted" => Some(Self::Deleted),
            _ => None,
        }
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legal and banking requisites of a company. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalDetails {
    /// Taxpayer identification number (INN)
    #[serde(default)]
    pub inn: Option<String>,

    /// Primary state registration number (OGRN)
    #[serde(default)]
    pub ogrn: Option<String>,

    /// Tax registration reason code (KPP)
    #[serde(default)]
    pub kpp: Option<String>,

    /// Bank name
    #[serde(default)]
    pub bank_title: Option<String>,

    /// Bank identification code (BIC)
    #[serde(default)]
    pub bic: Option<String>,

    /// Settlement account number
    #[serde(default)]
    pub account: Option<String>,

    /// Correspondent account number
    #[serde(default)]
    pub correspondent_account: Option<String>,

    /// Registered legal address
    #[serde(default)]
    pub legal_address: Option<String>,

    /// Actual business address
    #[serde(default)]
    pub actual_address: Option<String>,
}

impl LegalDetails {
    /// Field names with their maximum lengths.
    const LIMITS: [(&'static str, usize); 9] = [
        ("inn", 15),
        ("ogrn", 15),
        ("kpp", 50),
        ("bank_title", 100),
        ("bic", 100),
        ("account", 50),
        ("correspondent_account", 50),
        ("legal_address", 300),
        ("actual_address", 300),
    ];

    fn fields(&self) -> [&Option<String>; 9] {
        [
            &self.inn,
            &self.ogrn,
            &self.kpp,
            &self.bank_title,
            &self.bic,
            &self.account,
            &self.correspondent_account,
            &self.legal_address,
            &self.actual_address,
        ]
    }

    /// Validate field lengths.
    pub fn validate(&self) -> CompanyResult<()> {
        for ((name, limit), value) in Self::LIMITS.iter().zip(self.fields()) {
            if let Some(value) = value {
                check_max_len(name, value, *limit)?;
            }
        }
        Ok(())
    }
}

/// A company: the tenant that users join through memberships.
///
/// # Examples
///
/// ```
/// use company_org::{Company, CompanyStatus};
///
/// let mut company = Company::new("Acme", "Acme Incorporated");
/// assert_eq!(company.status, CompanyStatus::Active);
/// assert!(company.can_ban());
///
/// company.ban().unwrap();
/// assert!(company.can_activate());
///
/// company.mark_deleted().unwrap();
/// assert!(company.activate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier
    pub id: Uuid,

    /// Short name
    pub title: String,

    /// Full registered name
    pub full_title: String,

    /// Legal and banking requisites
    #[serde(default)]
    pub legal: LegalDetails,

    /// Lifecycle status
    pub status: CompanyStatus,

    /// When the company was created
    pub created_at: DateTime<Utc>,

    /// When the company was last updated
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Creates an active company with empty legal details.
    pub fn new(title: impl Into<String>, full_title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: title.into(),
            full_title: full_title.into(),
            legal: LegalDetails::default(),
            status: CompanyStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the company can be banned now.
    pub fn can_ban(&self) -> bool {
        self.status.can_transition_to(CompanyStatus::Banned)
    }

    /// Whether the company can be reactivated now.
    pub fn can_activate(&self) -> bool {
        self.status.can_transition_to(CompanyStatus::Active)
    }

    /// Whether the company can be soft-deleted now.
    pub fn can_delete(&self) -> bool {
        self.status.can_transition_to(CompanyStatus::Deleted)
    }

    /// ACTIVE → BANNED.
    pub fn ban(&mut self) -> CompanyResult<()> {
        self.transition_to(CompanyStatus::Banned)
    }

    /// BANNED → ACTIVE.
    pub fn activate(&mut self) -> CompanyResult<()> {
        self.transition_to(CompanyStatus::Active)
    }

    /// ACTIVE | BANNED → DELETED.
    pub fn mark_deleted(&mut self) -> CompanyResult<()> {
        self.transition_to(CompanyStatus::Deleted)
    }

    /// Move to `target` if the transition table allows it.
    pub fn transition_to(&mut self, target: CompanyStatus) -> CompanyResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(CompanyError::InvalidTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Check if the company belongs to the active collection.
    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }

    /// Reject writes while the company is banned.
    pub fn ensure_writable(&self) -> CompanyResult<()> {
        if self.status == CompanyStatus::Banned {
            return Err(CompanyError::Conflict("Company is banned".to_string()));
        }
        Ok(())
    }
}

/// Input for creating a company.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompany {
    /// Short name
    pub title: String,

    /// Full registered name
    pub full_title: String,

    /// Legal and banking requisites
    #[serde(default)]
    pub legal: LegalDetails,
}

impl NewCompany {
    /// Input with the two required fields.
    pub fn new(title: impl Into<String>, full_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            full_title: full_title.into(),
            legal: LegalDetails::default(),
        }
    }

    /// Validate and turn into a company.
    pub fn into_company(self) -> CompanyResult<Company> {
        let title = validate_title("title", &self.title)?;
        let full_title = validate_title("full_title", &self.full_title)?;
        self.legal.validate()?;

        let mut company = Company::new(title, full_title);
        company.legal = self.legal;
        Ok(company)
    }
}

/// Partial update of a company. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyUpdate {
    /// New short name
    #[serde(default)]
    pub title: Option<String>,

    /// New full name
    #[serde(default)]
    pub full_title: Option<String>,

    /// Replacement legal details
    #[serde(default)]
    pub legal: Option<LegalDetails>,
}

impl CompanyUpdate {
    /// Update only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Validate and apply to a company.
    ///
    /// # Returns
    ///
    /// The names of the fields that changed
    pub fn apply(self, company: &mut Company) -> CompanyResult<Vec<String>> {
        let mut changes = Vec::new();

        if let Some(title) = self.title {
            let title = validate_title("title", &title)?;
            if title != company.title {
                company.title = title;
                changes.push("title".to_string());
            }
        }

        if let Some(full_title) = self.full_title {
            let full_title = validate_title("full_title", &full_title)?;
            if full_title != company.full_title {
                company.full_title = full_title;
                changes.push("full_title".to_string());
            }
        }

        if let Some(legal) = self.legal {
            legal.validate()?;
            if legal != company.legal {
                company.legal = legal;
                changes.push("legal".to_string());
            }
        }

        if !changes.is_empty() {
            company.updated_at = Utc::now();
        }
        Ok(changes)
    }
}

/// Summary of a company for the "my companies" list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanySummary {
    /// Company ID
    pub id: Uuid,

    /// Company title
    pub title: String,

    /// Status
    pub status: CompanyStatus,

    /// Caller's role type in this company
    pub user_role: RoleType,

    /// Whether the caller's membership is blocked
    pub is_blocked: bool,

    /// Number of members
    pub member_count: u32,
}

fn validate_title(field: &str, value: &str) -> CompanyResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CompanyError::validation(field, "This field may not be blank"));
    }
    check_max_len(field, value, 255)?;
    Ok(value.to_string())
}

fn check_max_len(field: &str, value: &str, limit: usize) -> CompanyResult<()> {
    if value.chars().count() > limit {
        return Err(CompanyError::validation(
            field,
            format!("Ensure this field has no more than {} characters", limit),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_company_creation() {
        let company = Company::new("Company 1", "Full Company 1");
        assert_eq!(company.title, "Company 1");
        assert_eq!(company.full_title, "Full Company 1");
        assert_eq!(company.status, CompanyStatus::Active);
        assert!(company.is_active());
    }

    #[test]
    fn test_transition_table() {
        use CompanyStatus::*;
        let all = [Active, Banned, Deleted];
        let allowed = [(Active, Banned), (Banned, Active), (Active, Deleted), (Banned, Deleted)];

        for from in all {
            for to in all {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn test_guards_follow_status() {
        let mut company = Company::new("A", "A");
        assert!(company.can_ban());
        assert!(!company.can_activate());
        assert!(company.can_delete());

        company.ban().unwrap();
        assert!(!company.can_ban());
        assert!(company.can_activate());
        assert!(company.can_delete());

        company.activate().unwrap();
        assert_eq!(company.status, CompanyStatus::Active);
    }

    #[test]
    fn test_deleted_is_terminal() {
        let mut company = Company::new("A", "A");
        company.mark_deleted().unwrap();
        assert!(company.status.is_terminal());

        let err = company.mark_deleted().unwrap_err();
        assert!(matches!(err, CompanyError::InvalidTransition { .. }));
        assert!(company.ban().is_err());
        assert!(company.activate().is_err());
        assert_eq!(company.status, CompanyStatus::Deleted);
    }

    #[test]
    fn test_only_banned_companies_reject_writes() {
        let mut company = Company::new("A", "A");
        assert!(company.ensure_writable().is_ok());

        company.transition_to(CompanyStatus::Banned).unwrap();
        let err = company.ensure_writable().unwrap_err();
        assert_eq!(err.to_string(), "Company is banned");
    }

    #[test]
    fn test_new_company_validation() {
        assert!(NewCompany::new("New Company", "New Company Full")
            .into_company()
            .is_ok());

        let err = NewCompany::new("  ", "Full").into_company().unwrap_err();
        assert!(matches!(err, CompanyError::Validation { ref field, .. } if field == "title"));

        let err = NewCompany::new("T", "x".repeat(256)).into_company().unwrap_err();
        assert!(matches!(err, CompanyError::Validation { ref field, .. } if field == "full_title"));

        let mut input = NewCompany::new("T", "T");
        input.legal.inn = Some("1".repeat(16));
        let err = input.into_company().unwrap_err();
        assert!(matches!(err, CompanyError::Validation { ref field, .. } if field == "inn"));
    }

    #[test]
    fn test_update_reports_changes() {
        let mut company = Company::new("Company 1", "Full Company 1");

        let changes = CompanyUpdate::title("Updated Company")
            .apply(&mut company)
            .unwrap();
        assert_eq!(changes, vec!["title".to_string()]);
        assert_eq!(company.title, "Updated Company");

        let changes = CompanyUpdate::title("Updated Company")
            .apply(&mut company)
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(CompanyStatus::parse("BANNED"), Some(CompanyStatus::Banned));
        assert_eq!(CompanyStatus::parse("gone"), None);
    }
}
