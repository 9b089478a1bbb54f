use crate::domain::model::{CategorySet, MAX_NUM_AIDS};
use crate::utils::error::{AidError, Result};
use crate::utils::validation::{validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `<aid-group>` 沒有任何 AID 就結束時的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyGroupPolicy {
    /// 記錄警告，不產生群組
    #[default]
    Skip,
    /// 回傳 [`AidError::EmptyGroup`]
    Reject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    pub empty_group: EmptyGroupPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub allowed_categories: CategorySet,
    pub max_aids: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            allowed_categories: CategorySet::default(),
            max_aids: MAX_NUM_AIDS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub parser: ParserConfig,
    pub validation: ValidationConfig,
}

impl RegistryConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AidError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AidError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${EMPTY_GROUP_POLICY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AidError::Config {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for RegistryConfig {
    fn validate(&self) -> Result<()> {
        if self.validation.allowed_categories.is_empty() {
            return Err(AidError::Validation {
                field: "validation.allowed_categories".to_string(),
                value: "[]".to_string(),
                reason: "at least one category must be allowed".to_string(),
            });
        }
        validate_range("validation.max_aids", self.validation.max_aids, 1, MAX_NUM_AIDS)
    }
}
