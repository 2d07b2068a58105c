//! Query command handler.
//!
//! Queries a single namespace. Also defines the query arguments shared
//! with `query-namespaces`.

use anyhow::Context;
use clap::Args;
use pinecone_core::{ClientConfig, PineconeError};
use pinecone_data::{Index, QueryOptions, SparseValues};

/// Query parameters shared by every query command
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Dense query vector, comma separated (e.g. 0.1,-0.2,0.3)
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub vector: Option<Vec<f32>>,

    /// Query by the stored vector with this id
    #[arg(long, conflicts_with = "vector")]
    pub id: Option<String>,

    /// Sparse vector indices, comma separated
    #[arg(long, value_delimiter = ',', requires = "sparse_values")]
    pub sparse_indices: Vec<u32>,

    /// Sparse vector values, comma separated
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        requires = "sparse_indices"
    )]
    pub sparse_values: Vec<f32>,

    /// Number of results to return (default: 10)
    #[arg(short = 'k', long, allow_hyphen_values = true)]
    pub top_k: Option<i64>,

    /// Metadata filter as JSON (e.g. '{"genre": {"$eq": "drama"}}')
    #[arg(long)]
    pub filter: Option<String>,

    /// Include vector values in results
    #[arg(long)]
    pub include_values: bool,

    /// Include metadata in results
    #[arg(long)]
    pub include_metadata: bool,
}

impl QueryArgs {
    /// Convert command-line arguments into query options.
    pub fn to_options(&self) -> anyhow::Result<QueryOptions> {
        let top_k = match self.top_k {
            Some(k) => Some(usize::try_from(k).map_err(|_| PineconeError::InvalidTopK(k))?),
            None => None,
        };

        let sparse_vector = if self.sparse_indices.is_empty() && self.sparse_values.is_empty() {
            None
        } else {
            Some(SparseValues::new(
                self.sparse_indices.clone(),
                self.sparse_values.clone(),
            )?)
        };

        let filter = self
            .filter
            .as_deref()
            .map(serde_json::from_str::<serde_json::Value>)
            .transpose()
            .context("--filter is not valid JSON")?;

        Ok(QueryOptions {
            vector: self.vector.clone(),
            id: self.id.clone(),
            sparse_vector,
            top_k,
            filter,
            include_values: self.include_values.then_some(true),
            include_metadata: self.include_metadata.then_some(true),
        })
    }
}

/// Query a single namespace
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// Namespace to query (default namespace when omitted)
    #[arg(short, long, default_value = "")]
    pub namespace: String,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Output as JSON without truncating long vectors
    #[arg(long)]
    pub json: bool,
}

impl QueryCommand {
    /// Execute the query command.
    pub async fn execute(&self, config: &ClientConfig) -> anyhow::Result<()> {
        tracing::info!("Executing query command");
        tracing::debug!("Query options: {:?}", self);

        let options = self.query.to_options()?;
        let index = Index::from_config(config)?;
        let response = index.query(&self.namespace, &options).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{}", response);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        query: QueryArgs,
    }

    fn parse(args: &[&str]) -> QueryArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().query
    }

    #[test]
    fn test_parses_vector_and_flags() {
        let args = parse(&[
            "--vector=0.1,-0.2",
            "--top-k",
            "3",
            "--include-metadata",
            "--filter",
            r#"{"genre": "drama"}"#,
        ]);
        let options = args.to_options().unwrap();
        assert_eq!(options.vector, Some(vec![0.1, -0.2]));
        assert_eq!(options.top_k, Some(3));
        assert_eq!(options.include_metadata, Some(true));
        assert_eq!(options.include_values, None);
        assert_eq!(options.filter.unwrap()["genre"], "drama");
    }

    #[test]
    fn test_negative_top_k_is_rejected() {
        let args = parse(&["--vector", "0.1", "--top-k", "-1"]);
        let err = args.to_options().unwrap_err();
        assert!(err.to_string().contains("Invalid top_k value -1"));
    }

    #[test]
    fn test_sparse_vector() {
        let args = parse(&["--sparse-indices", "1,5", "--sparse-values", "0.5,0.25"]);
        let sparse = args.to_options().unwrap().sparse_vector.unwrap();
        assert_eq!(sparse.indices, vec![1, 5]);
        assert_eq!(sparse.values, vec![0.5, 0.25]);
    }

    #[derive(Parser)]
    struct CommandHarness {
        #[command(flatten)]
        command: QueryCommand,
    }

    #[test]
    fn test_json_flag_and_default_namespace() {
        let harness =
            CommandHarness::try_parse_from(["test", "--vector", "0.1", "--json"]).unwrap();
        assert!(harness.command.json);
        assert_eq!(harness.command.namespace, "");

        let harness = CommandHarness::try_parse_from(["test", "--id", "a", "-n", "books"]).unwrap();
        assert!(!harness.command.json);
        assert_eq!(harness.command.namespace, "books");
    }

    #[test]
    fn test_bad_filter_json() {
        let args = parse(&["--vector", "0.1", "--filter", "{oops"]);
        assert!(args.to_options().is_err());
    }
}
