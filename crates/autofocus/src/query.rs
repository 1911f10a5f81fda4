//! Search query documents
//!
//! A search is described either by a raw, caller formed JSON document or by a
//! list of `field`/`operator`/`value` clauses combined under one boolean
//! operator. Nothing here validates field names or operators; the service
//! decides what is legal.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Operator used when a clause does not name one
pub const DEFAULT_CLAUSE_OPERATOR: &str = "is";
/// Boolean operator combining clauses ("all" = AND, "any" = OR)
pub const DEFAULT_SEARCH_OPERATOR: &str = "all";

/// A single search condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clause {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Clause {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: DEFAULT_CLAUSE_OPERATOR.to_string(),
            value: value.into(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = operator.into();
        self
    }

    /// Build a clause from a loosely shaped JSON object.
    ///
    /// `field` and `value` are required, `operator` defaults to `"is"`.
    pub fn from_json(spec: &Value) -> Result<Self> {
        let object = spec.as_object().ok_or_else(|| Error::MalformedClause {
            missing: "field",
            clause: spec.to_string(),
        })?;

        let field = object
            .get("field")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::MalformedClause {
                missing: "field",
                clause: spec.to_string(),
            })?;
        let value = object.get("value").ok_or_else(|| Error::MalformedClause {
            missing: "value",
            clause: spec.to_string(),
        })?;
        let operator = object
            .get("operator")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_CLAUSE_OPERATOR);

        Ok(Self {
            field: field.to_string(),
            operator: operator.to_string(),
            value: value.clone(),
        })
    }
}

/// The `query` member of a search request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryDocument {
    /// `{operator, children}` built from clauses
    Compound {
        operator: String,
        children: Vec<Clause>,
    },
    /// Caller supplied document, sent verbatim
    Raw(Value),
}

/// A clause as handed over by the caller
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseSpec {
    Typed(Clause),
    Loose(Value),
}

/// Caller side description of a search, turned into a [`QueryDocument`] by
/// [`SearchQuery::build`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    Raw(String),
    Clauses {
        operator: String,
        clauses: Vec<ClauseSpec>,
    },
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::Clauses {
            operator: DEFAULT_SEARCH_OPERATOR.to_string(),
            clauses: Vec::new(),
        }
    }
}

impl From<Clause> for SearchQuery {
    fn from(clause: Clause) -> Self {
        Self::default().clause(clause)
    }
}

impl SearchQuery {
    /// A raw JSON encoded query document.
    pub fn raw(json: impl Into<String>) -> Self {
        Self::Raw(json.into())
    }

    /// Clauses combined under `operator` instead of `"all"`.
    pub fn with_operator(operator: impl Into<String>) -> Self {
        Self::Clauses {
            operator: operator.into(),
            clauses: Vec::new(),
        }
    }

    /// Single `field is value` search.
    pub fn field(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Clause::new(field, value).into()
    }

    pub fn clause(self, clause: Clause) -> Self {
        self.push(ClauseSpec::Typed(clause))
    }

    /// Add a clause given as a JSON object; checked when the query is built.
    pub fn clause_json(self, spec: Value) -> Self {
        self.push(ClauseSpec::Loose(spec))
    }

    /// Trailing keyword style clause. Nothing is added when both `field` and
    /// `value` are absent; a clause with only one of them fails in
    /// [`SearchQuery::build`].
    pub fn keyword(
        self,
        field: Option<String>,
        value: Option<Value>,
        operator: Option<String>,
    ) -> Self {
        if field.is_none() && value.is_none() {
            return self;
        }

        let mut spec = Map::new();
        if let Some(field) = field {
            spec.insert("field".to_string(), Value::String(field));
        }
        if let Some(value) = value {
            spec.insert("value".to_string(), value);
        }
        if let Some(operator) = operator {
            spec.insert("operator".to_string(), Value::String(operator));
        }
        self.push(ClauseSpec::Loose(Value::Object(spec)))
    }

    fn push(self, spec: ClauseSpec) -> Self {
        match self {
            Self::Clauses {
                operator,
                mut clauses,
            } => {
                clauses.push(spec);
                Self::Clauses { operator, clauses }
            }
            // A raw document takes no clauses; keep it as given
            raw @ Self::Raw(_) => raw,
        }
    }

    pub fn build(&self) -> Result<QueryDocument> {
        match self {
            Self::Raw(json) => {
                let value = serde_json::from_str(json).map_err(Error::InvalidQueryJson)?;
                Ok(QueryDocument::Raw(value))
            }
            Self::Clauses { operator, clauses } => {
                let children = clauses
                    .iter()
                    .map(|spec| match spec {
                        ClauseSpec::Typed(clause) => Ok(clause.clone()),
                        ClauseSpec::Loose(value) => Clause::from_json(value),
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(QueryDocument::Compound {
                    operator: operator.clone(),
                    children,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(3)]
    fn test_children_match_clauses(#[case] count: usize) {
        let mut query = SearchQuery::default();
        for i in 0..count {
            query = query.clause_json(json!({"field": format!("f{i}"), "value": i}));
        }

        match query.build().unwrap() {
            QueryDocument::Compound { operator, children } => {
                assert_eq!(operator, "all");
                assert_eq!(children.len(), count);
                for (i, child) in children.iter().enumerate() {
                    assert_eq!(child.field, format!("f{i}"));
                    assert_eq!(child.value, json!(i));
                    assert_eq!(child.operator, "is");
                }
            }
            other => panic!("expected compound document, got {other:?}"),
        }
    }

    #[test]
    fn test_compound_serialization() {
        let doc = SearchQuery::field("sample.malware", "1").build().unwrap();
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "operator": "all",
                "children": [
                    {"field": "sample.malware", "operator": "is", "value": "1"}
                ]
            })
        );
    }

    #[test]
    fn test_explicit_operators() {
        let doc = SearchQuery::with_operator("any")
            .clause(Clause::new("sample.tag", "Unit42.Foo").with_operator("is not"))
            .clause_json(json!({"field": "session.region", "operator": "is in the list", "value": ["us", "eu"]}))
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({
                "operator": "any",
                "children": [
                    {"field": "sample.tag", "operator": "is not", "value": "Unit42.Foo"},
                    {"field": "session.region", "operator": "is in the list", "value": ["us", "eu"]}
                ]
            })
        );
    }

    #[test]
    fn test_raw_query_is_verbatim() {
        let raw = r#"{"operator":"any","children":[{"field":"sample.sha256","operator":"is","value":"abc"}],"extra":{"nested":[1,2,3]}}"#;
        let doc = SearchQuery::raw(raw).build().unwrap();

        let expected: Value = serde_json::from_str(raw).unwrap();
        assert_eq!(doc, QueryDocument::Raw(expected.clone()));
        assert_eq!(serde_json::to_value(&doc).unwrap(), expected);
    }

    #[test]
    fn test_raw_query_invalid_json() {
        let result = SearchQuery::raw("{not json").build();
        assert!(matches!(result, Err(Error::InvalidQueryJson(_))));
    }

    #[rstest]
    #[case(json!({"value": "1"}), "field")]
    #[case(json!({"field": "sample.malware"}), "value")]
    #[case(json!({"field": 7, "value": "1"}), "field")]
    #[case(json!("sample.malware"), "field")]
    fn test_malformed_clause(#[case] spec: Value, #[case] expected_missing: &str) {
        let result = SearchQuery::default()
            .clause(Clause::new("sample.malware", "1"))
            .clause_json(spec)
            .build();

        match result {
            Err(Error::MalformedClause { missing, .. }) => assert_eq!(missing, expected_missing),
            other => panic!("expected malformed clause, got {other:?}"),
        }
    }

    #[test]
    fn test_keyword_clause_is_last() {
        let doc = SearchQuery::default()
            .clause(Clause::new("a", 1))
            .keyword(Some("b".to_string()), Some(json!(2)), Some("is not".to_string()))
            .build()
            .unwrap();

        let QueryDocument::Compound { children, .. } = doc else {
            panic!("expected compound document");
        };
        assert_eq!(children.len(), 2);
        assert_eq!(children[1], Clause::new("b", 2).with_operator("is not"));
    }

    #[test]
    fn test_keyword_absent_adds_nothing() {
        let doc = SearchQuery::default().keyword(None, None, None).build().unwrap();
        assert_eq!(
            doc,
            QueryDocument::Compound {
                operator: "all".to_string(),
                children: vec![],
            }
        );
    }

    #[test]
    fn test_keyword_missing_value() {
        let result = SearchQuery::default()
            .keyword(Some("sample.md5".to_string()), None, None)
            .build();
        assert!(matches!(result, Err(Error::MalformedClause { missing: "value", .. })));
    }
}
