use crate::config::ValidationConfig;
use crate::domain::model::{is_valid_category, AidGroup};
use crate::utils::error::{AidError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 依指定的規則集驗證
pub trait ValidateWith<C> {
    fn validate_with(&self, rules: &C) -> Result<()>;
}

/// 檢查 AID 為非空、偶數長度的十六進位字串
pub fn validate_aid(field_name: &str, aid: &str) -> Result<()> {
    let reason = if aid.is_empty() {
        "AID cannot be empty"
    } else if aid.len() % 2 != 0 {
        "AID must have an even number of hex digits"
    } else if !aid.bytes().all(|b| b.is_ascii_hexdigit()) {
        "AID must be hexadecimal"
    } else {
        return Ok(());
    };

    Err(AidError::Validation {
        field: field_name.to_string(),
        value: aid.to_string(),
        reason: reason.to_string(),
    })
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AidError::Validation {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

impl ValidateWith<ValidationConfig> for AidGroup {
    fn validate_with(&self, rules: &ValidationConfig) -> Result<()> {
        if !is_valid_category(Some(self.category()), &rules.allowed_categories) {
            return Err(AidError::Validation {
                field: "category".to_string(),
                value: self.category().to_string(),
                reason: format!(
                    "Unsupported category. Valid categories: {}",
                    rules.allowed_categories.labels().join(", ")
                ),
            });
        }

        validate_range("aids", self.aids().len(), 1, rules.max_aids)?;

        for (index, aid) in self.aids().iter().enumerate() {
            validate_aid(&format!("aids[{}]", index), aid)?;
        }

        Ok(())
    }
}

impl Validate for AidGroup {
    fn validate(&self) -> Result<()> {
        self.validate_with(&ValidationConfig::default())
    }
}
