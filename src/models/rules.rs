//! Rule trees for automatic transaction grouping
//!
//! A group's rule document is a recursive boolean expression over the
//! string-typed fields of a transaction. Rules arrive from YAML in a raw,
//! loosely-typed form and are compiled into the closed [`Rule`] sum type
//! before use, so an unknown discriminator or field name is a load-time
//! error rather than a surprise during evaluation.

use serde::{Deserialize, Serialize};

use crate::error::{MoneyManagerError, MoneyManagerResult};
use crate::models::Transaction;

/// The closed set of transaction fields a rule may test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionField {
    Label,
    BankName,
    AccountName,
}

impl TransactionField {
    /// Resolve a field name from a rule document
    ///
    /// Accepts the short serialized keys (`bank`, `account`) as well as the
    /// long field names used by older rule files.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "label" => Some(Self::Label),
            "bank" | "bank_name" => Some(Self::BankName),
            "account" | "account_name" => Some(Self::AccountName),
            _ => None,
        }
    }

    /// Canonical name used when writing rule documents back out
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::BankName => "bank_name",
            Self::AccountName => "account_name",
        }
    }

    /// Accessor for the field's value on a transaction
    pub fn get<'a>(&self, transaction: &'a Transaction) -> &'a str {
        match self {
            Self::Label => &transaction.label,
            Self::BankName => &transaction.bank_name,
            Self::AccountName => &transaction.account_name,
        }
    }
}

/// A compiled rule tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// True iff all children are true (vacuously true when empty)
    And(Vec<Rule>),
    /// True iff any child is true (false when empty)
    Or(Vec<Rule>),
    /// Case-sensitive substring match
    Contains {
        field: TransactionField,
        value: String,
    },
    /// Case-insensitive substring match
    IContains {
        field: TransactionField,
        value: String,
    },
    /// Case-sensitive prefix match
    StartsWith {
        field: TransactionField,
        value: String,
    },
    /// Case-sensitive equality
    Equal {
        field: TransactionField,
        value: String,
    },
}

impl Rule {
    /// Evaluate this rule against a transaction
    pub fn evaluate(&self, transaction: &Transaction) -> bool {
        match self {
            Self::And(rules) => rules.iter().all(|r| r.evaluate(transaction)),
            Self::Or(rules) => rules.iter().any(|r| r.evaluate(transaction)),
            Self::Contains { field, value } => field.get(transaction).contains(value.as_str()),
            Self::IContains { field, value } => field
                .get(transaction)
                .to_lowercase()
                .contains(&value.to_lowercase()),
            Self::StartsWith { field, value } => field.get(transaction).starts_with(value.as_str()),
            Self::Equal { field, value } => field.get(transaction) == value,
        }
    }

    /// Convert back to the raw document form
    pub fn to_raw(&self) -> RawRule {
        match self {
            Self::And(rules) => RawRule::nested("and", rules),
            Self::Or(rules) => RawRule::nested("or", rules),
            Self::Contains { field, value } => RawRule::leaf("contains", *field, value),
            Self::IContains { field, value } => RawRule::leaf("icontains", *field, value),
            Self::StartsWith { field, value } => RawRule::leaf("startswith", *field, value),
            Self::Equal { field, value } => RawRule::leaf("equal", *field, value),
        }
    }
}

/// A rule as it appears in the YAML document, before compilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRule {
    /// Discriminator: `and`, `or`, `contains`, `icontains`, `startswith`,
    /// `equal` (alias `eq`)
    #[serde(rename = "type")]
    pub kind: String,

    /// Field name, for leaf rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Value to test against, for leaf rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Children, for `and`/`or` rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RawRule>>,
}

impl RawRule {
    fn nested(kind: &str, rules: &[Rule]) -> Self {
        Self {
            kind: kind.to_string(),
            key: None,
            value: None,
            rules: Some(rules.iter().map(Rule::to_raw).collect()),
        }
    }

    fn leaf(kind: &str, field: TransactionField, value: &str) -> Self {
        Self {
            kind: kind.to_string(),
            key: Some(field.as_str().to_string()),
            value: Some(value.to_string()),
            rules: None,
        }
    }

    /// Compile into the closed rule type
    ///
    /// `group` names the owning group for error context.
    pub fn compile(&self, group: &str) -> MoneyManagerResult<Rule> {
        match self.kind.as_str() {
            "and" => Ok(Rule::And(self.compile_children(group)?)),
            "or" => Ok(Rule::Or(self.compile_children(group)?)),
            "contains" => {
                let (field, value) = self.compile_leaf(group)?;
                Ok(Rule::Contains { field, value })
            }
            "icontains" => {
                let (field, value) = self.compile_leaf(group)?;
                Ok(Rule::IContains { field, value })
            }
            "startswith" => {
                let (field, value) = self.compile_leaf(group)?;
                Ok(Rule::StartsWith { field, value })
            }
            "equal" | "eq" => {
                let (field, value) = self.compile_leaf(group)?;
                Ok(Rule::Equal { field, value })
            }
            other => Err(MoneyManagerError::UnknownRuleKind {
                kind: other.to_string(),
                group: group.to_string(),
            }),
        }
    }

    fn compile_children(&self, group: &str) -> MoneyManagerResult<Vec<Rule>> {
        let children = self.rules.as_deref().ok_or_else(|| {
            MoneyManagerError::Validation(format!(
                "Rule '{}' in group '{}' requires a 'rules' list",
                self.kind, group
            ))
        })?;
        children.iter().map(|r| r.compile(group)).collect()
    }

    fn compile_leaf(&self, group: &str) -> MoneyManagerResult<(TransactionField, String)> {
        let key = self.key.as_deref().ok_or_else(|| {
            MoneyManagerError::Validation(format!(
                "Rule '{}' in group '{}' requires a 'key'",
                self.kind, group
            ))
        })?;
        let value = self.value.as_deref().ok_or_else(|| {
            MoneyManagerError::Validation(format!(
                "Rule '{}' in group '{}' requires a 'value'",
                self.kind, group
            ))
        })?;

        let field =
            TransactionField::parse(key).ok_or_else(|| MoneyManagerError::FieldNotFound {
                field: key.to_string(),
                group: group.to_string(),
            })?;

        Ok((field, value.to_string()))
    }
}

/// A group's full rule document: a bare list evaluated as an implicit AND
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RuleSet(pub Vec<Rule>);

impl RuleSet {
    /// Compile a raw rule list
    pub fn compile(raw: &[RawRule], group: &str) -> MoneyManagerResult<Self> {
        let rules = raw
            .iter()
            .map(|r| r.compile(group))
            .collect::<MoneyManagerResult<Vec<_>>>()?;
        Ok(Self(rules))
    }

    /// True iff every top-level rule matches
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.0.iter().all(|r| r.evaluate(transaction))
    }

    /// Convert back to the raw document form
    pub fn to_raw(&self) -> Vec<RawRule> {
        self.0.iter().map(Rule::to_raw).collect()
    }
}
