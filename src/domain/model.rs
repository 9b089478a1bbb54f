use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ports::AidGroupView;

/// 單一群組可包含的 AID 上限
pub const MAX_NUM_AIDS: usize = 256;

/// 群組可註冊的卡片模擬類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Payment,
    Other,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Payment, Category::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Payment => "payment",
            Category::Other => "other",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 明確列出可接受的類別
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySet(Vec<Category>);

impl CategorySet {
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let mut set = Vec::new();
        for category in categories {
            if !set.contains(&category) {
                set.push(category);
            }
        }
        Self(set)
    }

    pub fn contains_label(&self, label: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == label)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.0.iter().map(Category::as_str).collect()
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::new(Category::ALL)
    }
}

/// `category` 屬於 `allowed` 時為 true；`None` 一律為 false
pub fn is_valid_category(category: Option<&str>, allowed: &CategorySet) -> bool {
    category.is_some_and(|label| allowed.contains_label(label))
}

/// 共用同一類別的一組 Application Identifier。
///
/// AID 為偶數長度的十六進位字串，例如 `"F014811481"` (ISO/IEC 7816-4)。
/// 保留順序與重複項目；建構時不檢查格式，請見
/// [`Validate`](crate::utils::validation::Validate)。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AidGroup {
    category: String,
    aids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl AidGroup {
    pub fn new(aids: Vec<String>, category: impl Into<String>, description: Option<String>) -> Self {
        Self {
            category: category.into(),
            aids,
            description,
        }
    }

    pub fn without_description(aids: Vec<String>, category: impl Into<String>) -> Self {
        Self::new(aids, category, None)
    }

    /// 尚未加入 AID 的群組，只有類別與描述
    pub fn header(category: impl Into<String>, description: Option<String>) -> Self {
        Self::new(Vec::new(), category, description)
    }

    /// 透過公開存取子複製任何類似群組的實體
    pub fn from_view<V: AidGroupView + ?Sized>(view: &V) -> Self {
        Self::new(
            view.aids().to_vec(),
            view.category(),
            view.description().map(str::to_string),
        )
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn aids(&self) -> &[String] {
        &self.aids
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn describe_contents(&self) -> i32 {
        0
    }
}

impl AidGroupView for AidGroup {
    fn category(&self) -> &str {
        &self.category
    }

    fn aids(&self) -> &[String] {
        &self.aids
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl<V: AidGroupView> From<&V> for AidGroup {
    fn from(view: &V) -> Self {
        Self::from_view(view)
    }
}

impl fmt::Display for AidGroup {
    // 每個 AID 後面都接 ", "，最後一個也不例外
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category: {}, AIDs:", self.category)?;
        for aid in &self.aids {
            write!(f, "{}, ", aid)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RegisteredGroup {
        category: String,
        aids: Vec<String>,
        description: Option<String>,
    }

    impl AidGroupView for RegisteredGroup {
        fn category(&self) -> &str {
            &self.category
        }

        fn aids(&self) -> &[String] {
            &self.aids
        }

        fn description(&self) -> Option<&str> {
            self.description.as_deref()
        }
    }

    #[test]
    fn test_constructors() {
        let group = AidGroup::new(vec!["A000000004".to_string()], "payment", Some("card".to_string()));
        assert_eq!(group.category(), "payment");
        assert_eq!(group.aids(), ["A000000004".to_string()]);
        assert_eq!(group.description(), Some("card"));

        let plain = AidGroup::without_description(vec!["F014".to_string()], "other");
        assert_eq!(plain.description(), None);

        let header = AidGroup::header("other", Some("loyalty".to_string()));
        assert!(header.aids().is_empty());
        assert_eq!(header.description(), Some("loyalty"));
        assert_eq!(header.describe_contents(), 0);
    }

    #[test]
    fn test_empty_description_is_not_absent() {
        let empty = AidGroup::new(vec![], "other", Some(String::new()));
        let absent = AidGroup::new(vec![], "other", None);
        assert_ne!(empty, absent);
        assert_eq!(empty.description(), Some(""));
    }

    #[test]
    fn test_from_view_copies_description() {
        let registered = RegisteredGroup {
            category: "payment".to_string(),
            aids: vec!["A0000000031010".to_string(), "A0000000041010".to_string()],
            description: Some("Transit".to_string()),
        };

        let group = AidGroup::from_view(&registered);
        assert_eq!(group.category(), "payment");
        assert_eq!(group.aids(), registered.aids.as_slice());
        assert_eq!(group.description(), Some("Transit"));

        let copy = AidGroup::from(&group);
        assert_eq!(copy, group);
    }

    #[test]
    fn test_display_keeps_trailing_separator() {
        let group = AidGroup::without_description(vec!["A1B2".to_string(), "C3D4".to_string()], "other");
        assert_eq!(group.to_string(), "Category: other, AIDs:A1B2, C3D4, ");

        let header = AidGroup::header("payment", None);
        assert_eq!(header.to_string(), "Category: payment, AIDs:");
    }

    #[test]
    fn test_is_valid_category() {
        let allowed = CategorySet::default();
        assert!(is_valid_category(Some("payment"), &allowed));
        assert!(is_valid_category(Some("other"), &allowed));
        assert!(!is_valid_category(Some("PAYMENT"), &allowed));
        assert!(!is_valid_category(Some(""), &allowed));
        assert!(!is_valid_category(Some("transit"), &allowed));
        assert!(!is_valid_category(None, &allowed));

        let payment_only = CategorySet::new([Category::Payment, Category::Payment]);
        assert_eq!(payment_only.labels(), vec!["payment"]);
        assert!(!is_valid_category(Some("other"), &payment_only));
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_label("other"), Some(Category::Other));
        assert_eq!(Category::from_label("Other"), None);
        assert_eq!(Category::Payment.to_string(), "payment");
    }
}
