use crate::issue::{IssueKind, ParsedType};
use crate::parse::Scope;
use crate::runner::Checked;
use crate::schema::{Kind, Schema};
use crate::validation::Validation;
use crate::value::Value;

/// Schema accepting one of a fixed list of strings.
///
/// # Example
///
/// ```
/// use weir::prelude::*;
///
/// let fish = weir::enumeration(["Salmon", "Tuna", "Trout"]);
/// assert_eq!(fish.get("Salmon"), Some("Salmon"));
/// assert!(fish.parse("Tuna").is_ok());
///
/// let report = fish.safe_parse("Cod").into_result().unwrap_err();
/// assert_eq!(
///     report.issues().head().message(),
///     "Invalid enum value. Expected 'Salmon' | 'Tuna' | 'Trout', received 'Cod'"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EnumSchema {
    options: Vec<String>,
}

impl EnumSchema {
    pub(crate) fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for option in options.into_iter().map(Into::into) {
            if !unique.contains(&option) {
                unique.push(option);
            }
        }
        Self { options: unique }
    }

    /// The accepted strings, in declaration order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Look up an option by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.as_str() == name)
            .map(String::as_str)
    }

    /// A new enum limited to `names`, in this enum's order.
    pub fn extract<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        Self::new(self.options.iter().filter(|o| names.contains(&o.as_str())).cloned())
    }

    /// A new enum without `names`.
    pub fn exclude<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        Self::new(self.options.iter().filter(|o| !names.contains(&o.as_str())).cloned())
    }

    pub(crate) fn contains(&self, value: &Value) -> bool {
        value
            .as_str()
            .is_some_and(|text| self.options.iter().any(|o| o == text))
    }

    pub(crate) fn check(&self, value: Value, scope: &Scope) -> Checked {
        if !matches!(value, Value::String(_)) {
            return scope.invalid_type(ParsedType::String, &value);
        }
        if self.contains(&value) {
            Validation::success(value)
        } else {
            scope.fail(IssueKind::InvalidEnumValue {
                options: self.options.clone(),
                received: value,
            })
        }
    }
}

impl From<EnumSchema> for Schema {
    fn from(schema: EnumSchema) -> Self {
        Schema::new(Kind::Enum(schema))
    }
}
