use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Compile a pipeline file and print the resulting expression
    Compile {
        #[arg(long, help = "Pipeline file path (JSON with steps and operators)")]
        pipeline: String,

        #[arg(long, help = "Print the full aggregation query instead of the bare expression")]
        query: bool,

        #[arg(
            long,
            conflicts_with = "query",
            help = "Print the compile report, including steps that were skipped"
        )]
        report: bool,
    },
    /// Compile a pipeline file and run it against the query service
    Run {
        #[arg(long, help = "Pipeline file path (JSON with steps and operators)")]
        pipeline: String,
    },
    /// Manage saved custom filters
    Filters {
        #[command(subcommand)]
        command: FilterCommand,
    },
    /// List the operator catalog
    Operators {
        #[arg(long, help = "Only operators whose label or description contains this text")]
        search: Option<String>,
    },
    /// List the field palette
    Fields {
        #[arg(long, help = "Only fields whose label or description contains this text")]
        search: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum FilterCommand {
    List {
        #[arg(long, help = "Only filters whose label contains this text")]
        search: Option<String>,
    },
    Get {
        #[arg(long, help = "Filter ID")]
        id: String,
    },
    Save {
        #[arg(long, help = "Pipeline file path (JSON with steps and operators)")]
        pipeline: String,

        #[arg(long, help = "Unique label for the saved filter")]
        label: String,
    },
    Delete {
        #[arg(long, help = "Filter ID")]
        id: String,
    },
}
