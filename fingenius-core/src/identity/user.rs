//! User identity, credentials and financial profile

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;
use crate::UserId;

/// Self-declared appetite for risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskTolerance {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        }
    }
}

impl FromStr for RiskTolerance {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(Error::Consistency(format!("unknown risk tolerance '{}'", other))),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a KYC or AML review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Approved => "approved",
            KycStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for KycStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(KycStatus::Pending),
            "approved" => Ok(KycStatus::Approved),
            "rejected" => Ok(KycStatus::Rejected),
            other => Err(Error::Consistency(format!("unknown review status '{}'", other))),
        }
    }
}

impl fmt::Display for KycStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(Error::Consistency(format!("unknown theme '{}'", other))),
        }
    }
}

/// A platform user.
///
/// Email and username (when present) are unique across all users; the store
/// enforces that. Users are never hard-deleted, `is_active` soft-disables them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_verified: bool,
    pub is_superuser: bool,

    pub phone: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub address: Option<String>,
    pub profile_picture_url: Option<String>,

    pub risk_tolerance: Option<RiskTolerance>,
    pub investment_goals: Option<Value>,
    pub annual_income: Option<i64>,
    pub net_worth: Option<i64>,

    pub kyc_status: KycStatus,
    pub kyc_documents: Option<Value>,
    pub aml_check_status: KycStatus,

    pub notification_preferences: Value,
    pub privacy_settings: Value,
    pub theme_preference: ThemePreference,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Create a freshly registered, active, unverified user.
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        hashed_password: impl Into<String>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            username: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            hashed_password: hashed_password.into(),
            is_active: true,
            is_verified: false,
            is_superuser: false,
            phone: None,
            date_of_birth: None,
            address: None,
            profile_picture_url: None,
            risk_tolerance: None,
            investment_goals: None,
            annual_income: None,
            net_worth: None,
            kyc_status: KycStatus::Pending,
            kyc_documents: None,
            aml_check_status: KycStatus::Pending,
            notification_preferences: Value::Object(Default::default()),
            privacy_settings: Value::Object(Default::default()),
            theme_preference: ThemePreference::System,
            created_at: None,
            updated_at: None,
            last_login: None,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_kyc_approved(&self) -> bool {
        self.kyc_status == KycStatus::Approved
    }
}
