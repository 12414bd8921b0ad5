use crate::issue::{IssueKind, ParsedType, SizeOrigin};
use crate::parse::Scope;
use crate::runner::{check_all, Collected, Outcome};
use crate::schema::{Bound, Kind, Schema, SizeCheck};
use crate::validation::Validation;
use crate::value::Value;

/// Schema for arrays whose elements share one schema.
///
/// Element issues are reported first, in index order, followed by the size
/// checks.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use weir::prelude::*;
///
/// let tags = weir::string().min(1).array().nonempty().max(2);
/// let report = tags.safe_parse(json!(["a", "", "c"])).into_result().unwrap_err();
/// assert_eq!(report.codes(), vec![IssueCode::TooSmall, IssueCode::TooBig]);
/// assert_eq!(report.issues().head().path(), &[PathSegment::from(1usize)]);
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Schema,
    sizes: Vec<SizeCheck>,
}

impl ArraySchema {
    pub(crate) fn new(element: Schema) -> Self {
        Self {
            element,
            sizes: Vec::new(),
        }
    }

    /// The element schema.
    pub fn element(&self) -> &Schema {
        &self.element
    }

    pub(crate) fn map_element(&self, f: impl Fn(&Schema) -> Schema) -> Self {
        Self {
            element: f(&self.element),
            sizes: self.sizes.clone(),
        }
    }

    /// At least `len` elements.
    pub fn min(mut self, len: usize) -> Self {
        self.sizes.push(SizeCheck::new(Bound::Min, len));
        self
    }

    /// At most `len` elements.
    pub fn max(mut self, len: usize) -> Self {
        self.sizes.push(SizeCheck::new(Bound::Max, len));
        self
    }

    /// Exactly `len` elements.
    pub fn length(mut self, len: usize) -> Self {
        self.sizes.push(SizeCheck::new(Bound::Exact, len));
        self
    }

    /// At least one element.
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    /// Replace the message of the most recently added size check.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(size) = self.sizes.last_mut() {
            size.set_message(message.into());
        }
        self
    }

    pub(crate) async fn check(&self, value: Value, scope: Scope) -> Outcome {
        let items = match value {
            Value::Array(items) => items,
            other => return Ok(scope.invalid_type(ParsedType::Array, &other)),
        };
        let len = items.len();
        let checks = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.element.run(item, scope.child(index)))
            .collect();

        let elements = Validation::all_vec(check_all(scope.mode, checks).await?);

        let mut collected = Collected::default();
        let output = collected.take(elements).unwrap_or_default();
        for size in &self.sizes {
            if let Some(issue) = size.issue(len, SizeOrigin::Array, &scope) {
                collected.push(issue);
            }
        }
        Ok(collected.finish(Value::Array(output)))
    }
}

impl From<ArraySchema> for Schema {
    fn from(schema: ArraySchema) -> Self {
        Schema::new(Kind::Array(schema))
    }
}

/// Schema for fixed-position arrays, with an optional schema for any
/// elements past the fixed ones.
#[derive(Debug, Clone)]
pub struct TupleSchema {
    items: Vec<Schema>,
    rest: Option<Schema>,
}

impl TupleSchema {
    pub(crate) fn new(items: Vec<Schema>) -> Self {
        Self { items, rest: None }
    }

    /// Accept any number of trailing elements matching `schema`.
    pub fn rest(mut self, schema: impl Into<Schema>) -> Self {
        self.rest = Some(schema.into());
        self
    }

    /// The positional schemas.
    pub fn items(&self) -> &[Schema] {
        &self.items
    }

    pub(crate) fn map_items(&self, f: impl Fn(&Schema) -> Schema) -> Self {
        Self {
            items: self.items.iter().map(&f).collect(),
            rest: self.rest.as_ref().map(&f),
        }
    }

    pub(crate) async fn check(&self, value: Value, scope: Scope) -> Outcome {
        let items = match value {
            Value::Array(items) => items,
            other => return Ok(scope.invalid_type(ParsedType::Array, &other)),
        };
        let fixed = self.items.len();
        if items.len() < fixed {
            return Ok(scope.fail(IssueKind::TooSmall {
                minimum: fixed as f64,
                inclusive: true,
                exact: false,
                origin: SizeOrigin::Array,
            }));
        }
        if items.len() > fixed && self.rest.is_none() {
            return Ok(scope.fail(IssueKind::TooBig {
                maximum: fixed as f64,
                inclusive: true,
                exact: false,
                origin: SizeOrigin::Array,
            }));
        }

        let checks = items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let schema = self.items.get(index).or(self.rest.as_ref())?;
                Some(schema.run(item, scope.child(index)))
            })
            .collect();

        let checked = check_all(scope.mode, checks).await?;
        Ok(Validation::all_vec(checked).map(Value::Array))
    }
}

impl From<TupleSchema> for Schema {
    fn from(schema: TupleSchema) -> Self {
        Schema::new(Kind::Tuple(schema))
    }
}
