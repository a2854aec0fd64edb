use crate::cache::DeltaCache;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{BranchScope, ErrorPolicy, FileKey, TimePolicy};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gtally")]
#[command(about = "Commit statistics across every branch of a git repository")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Directory for a persistent commit delta cache")]
    pub cache: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = BranchScope::All, help = "Which branches to analyze")]
    pub branches: BranchScope,

    #[arg(long, value_enum, default_value_t = ErrorPolicy::Fail, help = "What to do when a branch cannot be traversed")]
    pub on_error: ErrorPolicy,

    #[arg(long, value_enum, default_value_t = TimePolicy::Utc, help = "Timezone used to assign commits to months")]
    pub timezone: TimePolicy,

    #[arg(long, short, help = "Hide progress output")]
    pub quiet: bool,

    #[arg(long, short, help = "Enable debug logging")]
    pub verbose: bool,
}

impl CommonArgs {
    pub fn open_repo(&self) -> Result<GitRepo> {
        let repo = GitRepo::open(self.repo.as_ref())?.with_time_policy(self.timezone);
        match &self.cache {
            Some(dir) => Ok(repo.with_cache(DeltaCache::open(dir)?)),
            None => Ok(repo),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commit counts per year and month across all branches
    Months {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Write JSON to this file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write a plain-text report to this file")]
        text: Option<PathBuf>,
    },
    /// Per-branch commit, author, file and line totals
    Branches {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Write JSON to this file instead of stdout")]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = FileKey::Path, help = "Key file changes by full path or file name")]
        file_key: FileKey,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Months { json, output, text } => crate::timeline::exec(self.common, json, output, text),
            Commands::Branches { json, output, file_key } => {
                crate::metrics::exec(self.common, json, output, file_key)
            }
        }
    }
}
