use super::{Command, print_json_lines};
use crate::cli::{ClauseArgs, Resource};
use crate::error::{Result, WrapErr};
use autofocus::{AutoFocus, SearchQuery};
use serde_json::Value;
use tracing::info;

/// Clause search on samples or sessions, printing typed records
pub struct SearchCommand {
    client: AutoFocus,
    resource: Resource,
    args: ClauseArgs,
}

impl SearchCommand {
    pub fn new(client: AutoFocus, resource: Resource, args: ClauseArgs) -> Self {
        Self {
            client,
            resource,
            args,
        }
    }
}

pub fn build_query(args: &ClauseArgs) -> Result<SearchQuery> {
    let mut query = if args.any {
        SearchQuery::with_operator("any")
    } else {
        SearchQuery::default()
    };

    for clause in &args.clauses {
        let spec: Value = serde_json::from_str(clause)
            .with_context(|| format!("Clause is not valid JSON: {clause}"))?;
        query = query.clause_json(spec);
    }

    Ok(query.keyword(
        args.field.clone(),
        args.value.clone().map(Value::String),
        args.operator.clone(),
    ))
}

#[async_trait::async_trait]
impl Command for SearchCommand {
    async fn execute(&self) -> Result<()> {
        let query = build_query(&self.args)?;

        let printed = match self.resource {
            Resource::Samples => {
                let samples = self.client.samples().search(&query)?;
                print_json_lines(samples, self.args.limit).await?
            }
            Resource::Sessions => {
                let sessions = self.client.sessions().search(&query)?;
                print_json_lines(sessions, self.args.limit).await?
            }
        };

        info!("{} results", printed);
        Ok(())
    }
}

/// Search with a caller supplied JSON document, printing raw hits
pub struct RawSearchCommand {
    client: AutoFocus,
    resource: Resource,
    query: String,
    limit: Option<usize>,
}

impl RawSearchCommand {
    pub fn new(client: AutoFocus, resource: Resource, query: String, limit: Option<usize>) -> Self {
        Self {
            client,
            resource,
            query,
            limit,
        }
    }
}

#[async_trait::async_trait]
impl Command for RawSearchCommand {
    async fn execute(&self) -> Result<()> {
        let query = SearchQuery::raw(self.query.clone());
        let hits = self.client.search(self.resource.search_path(), &query)?;
        let printed = print_json_lines(hits, self.limit).await?;
        info!("{} results", printed);
        Ok(())
    }
}
