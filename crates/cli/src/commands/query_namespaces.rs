//! Query-namespaces command handler.
//!
//! Runs one query against several namespaces in parallel and prints the
//! merged, ranked matches.

use crate::commands::query::QueryArgs;
use clap::Args;
use pinecone_core::ClientConfig;
use pinecone_data::{Index, Metric, QueryNamespacesRequest};

/// Query several namespaces and merge the results
#[derive(Args, Debug)]
pub struct QueryNamespacesCommand {
    /// Namespace to query; repeat or comma-separate for several
    #[arg(short, long = "namespace", value_delimiter = ',', required = true)]
    pub namespaces: Vec<String>,

    /// Index metric (cosine, euclidean, dotproduct)
    #[arg(short, long)]
    pub metric: String,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Output as JSON without truncating long vectors
    #[arg(long)]
    pub json: bool,
}

impl QueryNamespacesCommand {
    /// Execute the query-namespaces command.
    pub async fn execute(&self, config: &ClientConfig) -> anyhow::Result<()> {
        tracing::info!("Executing query-namespaces command");
        tracing::debug!("Query-namespaces options: {:?}", self);

        let metric: Metric = self.metric.parse()?;
        let options = self.query.to_options()?;
        let request = QueryNamespacesRequest::new(self.namespaces.iter().cloned(), metric, options);

        let index = Index::from_config(config)?;
        let results = index.query_namespaces(request).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&results)?);
        } else {
            println!("{}", results);
        }

        Ok(())
    }
}
