use serde::Serialize;

/// One rule row as read from the catalog. `schema` is the first
/// dot-separated segment of the owning entity's name; `event` is the
/// lower-cased return datatype. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleRecord {
    pub id: i64,
    pub rule: String,
    pub schema: String,
    pub event: String,
}

/// A rule after the rename mapping has been applied. The same bytes go to
/// the file tree and the destination table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewrittenRule {
    pub id: i64,
    pub text: String,
}
