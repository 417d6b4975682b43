//! WIQL rendering for work item queries.

use super::models::QueryFilter;

/// Renders a flat WIQL query selecting ids that match every predicate.
#[must_use]
pub fn render_query(filter: &QueryFilter) -> String {
    let mut query = format!(
        "SELECT [System.Id] FROM workitems WHERE [System.TeamProject] = {} AND [System.WorkItemType] = {}",
        literal(&filter.team_project),
        literal(&filter.work_item_type)
    );
    for predicate in &filter.predicates {
        query.push_str(" AND [");
        query.push_str(&predicate.field);
        query.push_str("] = ");
        query.push_str(&literal(&predicate.value));
    }
    query
}

/// Quotes a WIQL string literal, doubling embedded single quotes.
fn literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
