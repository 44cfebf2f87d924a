use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "square-rs")]
#[command(about = "Command line interface tool for the Square Customers API")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Access token; overrides the keyring for this invocation
    #[arg(long, global = true, env = "SQUARE_ACCESS_TOKEN")]
    pub access_token: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authentication commands
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Customer profiles
    Customers {
        #[command(subcommand)]
        command: CustomerCommands,
    },
    /// Customer groups
    Groups {
        #[command(subcommand)]
        command: GroupCommands,
    },
    /// Customer segments
    Segments {
        #[command(subcommand)]
        command: SegmentCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Store an access token for the active profile
    Login,
    /// Remove the stored access token
    Logout,
    /// Show authentication status
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value (environment, api_version, default_profile)
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CustomerCommands {
    /// List customers
    List {
        /// Sort field: default or created_at
        #[arg(long)]
        sort_field: Option<String>,
        /// Sort order: asc or desc
        #[arg(long)]
        sort_order: Option<String>,
        /// Results per page (1-100)
        #[arg(long)]
        limit: Option<u32>,
        /// Follow cursors and fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Search customers by filter criteria
    Search {
        /// Results per page (1-100)
        #[arg(long)]
        limit: Option<u32>,
        /// Sort order: asc or desc
        #[arg(long)]
        order: Option<String>,
        /// Sort field: default or created_at
        #[arg(long)]
        sort_by: Option<String>,
        /// Filter by email address
        #[arg(long)]
        email: Option<String>,
        /// Filter by phone number (E.164)
        #[arg(long)]
        phone: Option<String>,
        /// Filter by reference ID
        #[arg(long)]
        reference: Option<String>,
        /// Treat text filters as fuzzy instead of exact matches
        #[arg(long)]
        fuzzy: bool,
        /// Only customers created by this source (repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        source: Vec<String>,
        /// Only customers created by none of these sources (repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        not_source: Vec<String>,
        /// Only customers belonging to every listed group (repeatable)
        #[arg(long, action = clap::ArgAction::Append)]
        group: Vec<String>,
        /// Created-at range start (RFC 3339)
        #[arg(long, requires = "created_to")]
        created_from: Option<String>,
        /// Created-at range end (RFC 3339)
        #[arg(long, requires = "created_from")]
        created_to: Option<String>,
        /// Updated-at range start (RFC 3339)
        #[arg(long, requires = "updated_to")]
        updated_from: Option<String>,
        /// Updated-at range end (RFC 3339)
        #[arg(long, requires = "updated_from")]
        updated_to: Option<String>,
        /// Follow cursors and fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Fetch a customer by ID
    Get {
        /// Customer ID
        id: String,
    },
    /// Create a customer profile
    Create {
        #[arg(long)]
        given_name: Option<String>,
        #[arg(long)]
        family_name: Option<String>,
        #[arg(long)]
        company_name: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        reference_id: Option<String>,
        #[arg(long)]
        note: Option<String>,
        /// Idempotency key preventing duplicate creation on retries
        #[arg(long)]
        idempotency_key: Option<String>,
    },
    /// Delete a customer profile
    Delete {
        /// Customer ID
        id: String,
    },
    /// Add a customer to a group
    AssignGroup {
        /// Customer ID
        customer_id: String,
        /// Group ID
        group_id: String,
    },
    /// Remove a customer from a group
    UnassignGroup {
        /// Customer ID
        customer_id: String,
        /// Group ID
        group_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum GroupCommands {
    /// List groups
    List {
        /// Results per page
        #[arg(long)]
        limit: Option<u32>,
        /// Follow cursors and fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Fetch a group by ID
    Get {
        /// Group ID
        id: String,
    },
    /// Create a group
    Create {
        /// Group name
        name: String,
        /// Idempotency key preventing duplicate creation on retries
        #[arg(long)]
        idempotency_key: Option<String>,
    },
    /// Rename a group
    Rename {
        /// Group ID
        id: String,
        /// New name
        name: String,
    },
    /// Delete a group
    Delete {
        /// Group ID
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SegmentCommands {
    /// List segments
    List {
        /// Results per page
        #[arg(long)]
        limit: Option<u32>,
        /// Follow cursors and fetch every page
        #[arg(long)]
        all: bool,
    },
    /// Fetch a segment by ID
    Get {
        /// Segment ID
        id: String,
    },
}
