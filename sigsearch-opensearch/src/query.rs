//! Query DSL builder for OpenSearch.

use serde_json::{Value, json};

/// Query types supported by the search builder.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    /// Match all documents.
    MatchAll,
    /// Full-text match query on one field.
    Match(MatchQuery),
    /// Full-text match query over several, optionally boosted, fields.
    MultiMatch(MultiMatchQuery),
    /// Term query for exact matches.
    Term(TermQuery),
    /// Bool query for combining queries.
    Bool(BoolQuery),
    /// Raw JSON query.
    Raw(Value),
}

impl Query {
    /// Convert query to JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Query::MatchAll => json!({ "match_all": {} }),
            Query::Match(m) => m.to_json(),
            Query::MultiMatch(m) => m.to_json(),
            Query::Term(t) => t.to_json(),
            Query::Bool(b) => b.to_json(),
            Query::Raw(v) => v.clone(),
        }
    }
}

impl From<MatchQuery> for Query {
    fn from(query: MatchQuery) -> Self {
        Query::Match(query)
    }
}

impl From<MultiMatchQuery> for Query {
    fn from(query: MultiMatchQuery) -> Self {
        Query::MultiMatch(query)
    }
}

impl From<TermQuery> for Query {
    fn from(query: TermQuery) -> Self {
        Query::Term(query)
    }
}

impl From<BoolQuery> for Query {
    fn from(query: BoolQuery) -> Self {
        Query::Bool(query)
    }
}

/// Match query for full-text search.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
    /// Field to search.
    pub field: String,
    /// Search query.
    pub query: String,
    /// Operator (and/or).
    pub operator: Option<String>,
    /// Fuzziness for typo tolerance.
    pub fuzziness: Option<String>,
}

impl MatchQuery {
    /// Create a new match query.
    pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            query: query.into(),
            operator: None,
            fuzziness: None,
        }
    }

    /// Set the operator.
    pub fn operator(mut self, op: impl Into<String>) -> Self {
        self.operator = Some(op.into());
        self
    }

    /// Set fuzziness.
    pub fn fuzziness(mut self, fuzz: impl Into<String>) -> Self {
        self.fuzziness = Some(fuzz.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut query = json!({ "query": self.query });

        if let Some(op) = &self.operator {
            query["operator"] = json!(op);
        }
        if let Some(fuzz) = &self.fuzziness {
            query["fuzziness"] = json!(fuzz);
        }

        json!({ "match": { &self.field: query } })
    }
}

/// A field targeted by a multi_match query, with an optional boost.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostedField {
    /// Field name.
    pub name: String,
    /// Relevance multiplier; `None` leaves the field at weight 1.
    pub boost: Option<f32>,
}

impl BoostedField {
    /// Render as `name` or `name^boost`.
    pub fn render(&self) -> String {
        match self.boost {
            Some(boost) => format!("{}^{}", self.name, boost),
            None => self.name.clone(),
        }
    }
}

/// Multi-field match query, e.g. `{"multi_match": {"query": "miller",
/// "fields": ["title^2", "director"]}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
    /// Search text.
    pub query: String,
    /// Fields searched, in order.
    pub fields: Vec<BoostedField>,
    /// `best_fields`, `most_fields`, `cross_fields`, ...
    pub match_type: Option<String>,
}

impl MultiMatchQuery {
    /// Create a multi_match query with no fields yet.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            fields: Vec::new(),
            match_type: None,
        }
    }

    /// Add a field with the default weight.
    pub fn field(mut self, name: impl Into<String>) -> Self {
        self.fields.push(BoostedField {
            name: name.into(),
            boost: None,
        });
        self
    }

    /// Add a field whose matches count `boost` times as much.
    pub fn boosted_field(mut self, name: impl Into<String>, boost: f32) -> Self {
        self.fields.push(BoostedField {
            name: name.into(),
            boost: Some(boost),
        });
        self
    }

    /// Set the multi_match type.
    pub fn match_type(mut self, match_type: impl Into<String>) -> Self {
        self.match_type = Some(match_type.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut query = json!({ "query": self.query });

        if !self.fields.is_empty() {
            let fields: Vec<String> = self.fields.iter().map(BoostedField::render).collect();
            query["fields"] = json!(fields);
        }
        if let Some(match_type) = &self.match_type {
            query["type"] = json!(match_type);
        }

        json!({ "multi_match": query })
    }
}

/// Term query for exact matching.
#[derive(Debug, Clone, PartialEq)]
pub struct TermQuery {
    /// Field name.
    pub field: String,
    /// Exact value to match.
    pub value: Value,
}

impl TermQuery {
    /// Create a new term query.
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    fn to_json(&self) -> Value {
        json!({ "term": { &self.field: self.value } })
    }
}

/// Bool query for combining multiple queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    /// Must match (AND).
    pub must: Vec<Query>,
    /// Should match (OR).
    pub should: Vec<Query>,
    /// Must not match (NOT).
    pub must_not: Vec<Query>,
    /// Filter (non-scoring).
    pub filter: Vec<Query>,
}

impl BoolQuery {
    /// Create a new bool query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a must clause.
    pub fn must(mut self, query: impl Into<Query>) -> Self {
        self.must.push(query.into());
        self
    }

    /// Add a should clause.
    pub fn should(mut self, query: impl Into<Query>) -> Self {
        self.should.push(query.into());
        self
    }

    /// Add a must_not clause.
    pub fn must_not(mut self, query: impl Into<Query>) -> Self {
        self.must_not.push(query.into());
        self
    }

    /// Add a filter clause.
    pub fn filter(mut self, query: impl Into<Query>) -> Self {
        self.filter.push(query.into());
        self
    }

    fn to_json(&self) -> Value {
        let mut bool_query = serde_json::Map::new();

        for (key, clauses) in [
            ("must", &self.must),
            ("should", &self.should),
            ("must_not", &self.must_not),
            ("filter", &self.filter),
        ] {
            if !clauses.is_empty() {
                bool_query.insert(
                    key.to_string(),
                    Value::Array(clauses.iter().map(Query::to_json).collect()),
                );
            }
        }

        json!({ "bool": bool_query })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_match_with_boosts() {
        let query: Query = MultiMatchQuery::new("miller")
            .boosted_field("title", 2.0)
            .field("director")
            .into();

        assert_eq!(
            query.to_json(),
            json!({
                "multi_match": {
                    "query": "miller",
                    "fields": ["title^2", "director"]
                }
            })
        );
    }

    #[test]
    fn test_fractional_boost() {
        let field = BoostedField {
            name: "plot".into(),
            boost: Some(0.5),
        };
        assert_eq!(field.render(), "plot^0.5");
    }

    #[test]
    fn test_multi_match_type() {
        let query = Query::from(
            MultiMatchQuery::new("bennett")
                .field("director")
                .match_type("phrase"),
        );
        assert_eq!(query.to_json()["multi_match"]["type"], "phrase");
    }

    #[test]
    fn test_match_query_options() {
        let query = Query::from(
            MatchQuery::new("title", "moneyball")
                .operator("and")
                .fuzziness("AUTO"),
        );

        assert_eq!(
            query.to_json(),
            json!({
                "match": {
                    "title": { "query": "moneyball", "operator": "and", "fuzziness": "AUTO" }
                }
            })
        );
    }

    #[test]
    fn test_bool_query_omits_empty_clauses() {
        let query = Query::from(
            BoolQuery::new()
                .must(MatchQuery::new("title", "moneyball"))
                .filter(TermQuery::new("year", "2011")),
        );

        let json = query.to_json();
        assert_eq!(json["bool"]["must"][0]["match"]["title"]["query"], "moneyball");
        assert_eq!(json["bool"]["filter"][0]["term"]["year"], "2011");
        assert!(json["bool"].get("should").is_none());
        assert!(json["bool"].get("must_not").is_none());
    }

    #[test]
    fn test_match_all_and_raw() {
        assert_eq!(Query::MatchAll.to_json(), json!({ "match_all": {} }));

        let raw = json!({ "ids": { "values": ["1"] } });
        assert_eq!(Query::Raw(raw.clone()).to_json(), raw);
    }
}
