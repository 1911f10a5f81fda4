use autofocus::SortOrder;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase verbosity. Can be used multiple times (e.g., -v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search samples
    Samples(ClauseArgs),
    /// Search sessions
    Sessions(ClauseArgs),
    /// Search with a raw JSON query document
    Raw {
        #[arg(value_enum)]
        resource: Resource,
        /// JSON encoded query, sent as is
        query: String,
        /// Stop after this many hits
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List tags
    Tags {
        #[arg(long, default_value = "Visible")]
        scope: String,
        #[arg(long, default_value = "name")]
        sort_by: String,
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        #[arg(long, default_value_t = 1000)]
        page_size: u32,
        #[arg(long, default_value_t = 0)]
        page_num: u32,
    },
    /// Show one tag with all its details
    Tag { name: String },
    /// Look a sample up by md5, sha1 or sha256
    Sample { hash: String },
    /// Fetch analysis sections of a sample
    Analysis {
        sha256: String,
        /// Analysis section, repeatable (default: file)
        #[arg(long = "section")]
        sections: Vec<String>,
        /// Platform, repeatable (default: win7, winxp)
        #[arg(long = "platform")]
        platforms: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ClauseArgs {
    /// Field of a single clause, e.g. sample.malware
    #[arg(long)]
    pub field: Option<String>,
    #[arg(long)]
    pub value: Option<String>,
    /// Clause operator (default: is)
    #[arg(long)]
    pub operator: Option<String>,
    /// Extra clause as a JSON object with field, value and optional operator; repeatable
    #[arg(long = "clause")]
    pub clauses: Vec<String>,
    /// Match any clause instead of all of them
    #[arg(long)]
    pub any: bool,
    /// Stop after this many hits
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Samples,
    Sessions,
}

impl Resource {
    pub fn search_path(self) -> &'static str {
        match self {
            Resource::Samples => "/samples/search",
            Resource::Sessions => "/sessions/search",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_samples_search() {
        let cli = Cli::parse_from([
            "afsearch",
            "-vv",
            "samples",
            "--field",
            "sample.malware",
            "--value",
            "1",
            "--limit",
            "5",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Samples(args)) => {
                assert_eq!(args.field.as_deref(), Some("sample.malware"));
                assert_eq!(args.value.as_deref(), Some("1"));
                assert_eq!(args.limit, Some(5));
                assert!(!args.any);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_tags_order() {
        let cli = Cli::parse_from(["afsearch", "tags", "--order", "desc"]);
        match cli.command {
            Some(Commands::Tags { order, scope, .. }) => {
                assert_eq!(order, SortOrder::Desc);
                assert_eq!(scope, "Visible");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(Resource::Samples.search_path(), "/samples/search");
        assert_eq!(Resource::Sessions.search_path(), "/sessions/search");
    }
}
