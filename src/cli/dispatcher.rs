use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};

use crate::cli::main_types::{
    AuthCommands, Commands, ConfigCommands, CustomerCommands, GroupCommands, SegmentCommands,
};
use crate::client::{Environment, SquareClient};
use crate::display::TableDisplay;
use crate::endpoints::{CreateCustomer, ListCustomers};
use crate::error::{AppError, CliError};
use crate::models::CreationSource;
use crate::query::{GroupRule, Match, SearchQuery, SortField, SortOrder};
use crate::storage::config::{Config, Profile};
use crate::storage::credentials::{AuthMode, Credentials};
use crate::utils::validation::validate_access_token;

const DEFAULT_PAGE_ITEMS: u32 = 20;

pub struct Dispatcher {
    config: Config,
    credentials: Credentials,
    verbose: bool,
    access_token: Option<String>,
    config_path: Option<PathBuf>,
}

impl Dispatcher {
    // Static helper for verbose logging (used before self exists)
    fn print_verbose(verbose: bool, msg: &str) {
        if verbose {
            println!("Verbose: {}", msg);
        }
    }

    fn log_verbose(&self, msg: &str) {
        Self::print_verbose(self.verbose, msg);
    }

    pub fn new(
        config: Config,
        mut credentials: Credentials,
        verbose: bool,
        access_token: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Self {
        // Token restoration: skipped when the environment supplies one
        if access_token.is_none() && matches!(credentials.get_auth_mode(), AuthMode::Keyring) {
            Self::print_verbose(verbose, "Checking for saved access token...");

            match Credentials::load(&credentials.profile_name) {
                Ok(loaded) => {
                    credentials = loaded;
                    Self::print_verbose(
                        verbose,
                        &format!(
                            "Credentials loaded for profile: {}",
                            credentials.profile_name
                        ),
                    );
                }
                Err(_) => {
                    Self::print_verbose(
                        verbose,
                        &format!(
                            "No saved access token found for profile: {}",
                            credentials.profile_name
                        ),
                    );
                }
            }
        } else {
            Self::print_verbose(verbose, "Access token supplied, skipping keyring lookup");
        }

        Self {
            config,
            credentials,
            verbose,
            access_token,
            config_path,
        }
    }

    /// The active profile, or sandbox defaults when none is configured.
    fn active_profile(&self) -> Profile {
        self.config
            .get_profile(&self.credentials.profile_name)
            .cloned()
            .unwrap_or_default()
    }

    /// Builds an API client for the active profile.
    ///
    /// A profile with an unrecognized environment is a hard configuration
    /// error; a missing token is an authentication error with a hint.
    fn client(&self) -> Result<SquareClient, AppError> {
        let profile = self.active_profile();
        let environment: Environment = profile.environment.parse()?;

        let token = self
            .access_token
            .clone()
            .or_else(|| self.credentials.get_access_token())
            .ok_or_else(|| {
                AppError::Cli(CliError::AuthRequired {
                    message: format!(
                        "no access token for profile '{}'",
                        self.credentials.profile_name
                    ),
                    hint: "run 'square-rs auth login' or set SQUARE_ACCESS_TOKEN".to_string(),
                })
            })?;

        self.log_verbose(&format!(
            "Using environment '{environment}' for profile '{}'",
            self.credentials.profile_name
        ));

        let client =
            SquareClient::with_api_version(&token, environment, profile.api_version.as_deref())?;
        Ok(client)
    }

    pub async fn dispatch(&mut self, command: Commands) -> Result<(), AppError> {
        match command {
            Commands::Auth { command } => self.handle_auth_command(command).await,
            Commands::Config { command } => self.handle_config_command(command).await,
            Commands::Customers { command } => self.handle_customer_command(command).await,
            Commands::Groups { command } => self.handle_group_command(command).await,
            Commands::Segments { command } => self.handle_segment_command(command).await,
        }
    }

    async fn handle_auth_command(&self, command: AuthCommands) -> Result<(), AppError> {
        match command {
            AuthCommands::Login => {
                self.log_verbose("Attempting auth login command");
                let token = collect_token()?;
                validate_access_token(&token)?;

                Credentials::save_token_for_profile(&self.credentials.profile_name, &token)?;
                println!(
                    "✅ Access token stored for profile: {}",
                    self.credentials.profile_name
                );
                Ok(())
            }
            AuthCommands::Logout => {
                self.log_verbose("Attempting auth logout command");
                Credentials::clear_token_for_profile(&self.credentials.profile_name)?;
                println!(
                    "✅ Access token removed for profile: {}",
                    self.credentials.profile_name
                );
                Ok(())
            }
            AuthCommands::Status => {
                self.log_verbose("Attempting auth status command");

                println!("Authentication Status:");
                println!("=====================");

                match self.credentials.get_auth_mode() {
                    AuthMode::EnvToken => {
                        println!("Authentication Mode: Environment token");
                        if let Some(token) = self.credentials.get_access_token() {
                            println!("Access Token: {}", mask_token(&token));
                        }
                    }
                    AuthMode::Keyring => {
                        println!("Authentication Mode: Keyring");
                        match self.credentials.get_access_token() {
                            Some(token) => println!("Access Token: {}", mask_token(&token)),
                            None => println!("Access Token: (not set, run 'auth login')"),
                        }
                    }
                }

                let profile = self.active_profile();
                println!("\nActive Profile: {}", self.credentials.profile_name);
                println!("Environment: {}", profile.environment);
                if let Some(version) = &profile.api_version {
                    println!("API Version: {}", version);
                }

                Ok(())
            }
        }
    }

    async fn handle_config_command(&mut self, command: ConfigCommands) -> Result<(), AppError> {
        match command {
            ConfigCommands::Show => {
                self.log_verbose("Attempting config show command");

                println!("Current Configuration:");
                println!("=====================");

                if let Some(default_profile) = &self.config.default_profile {
                    println!("Default Profile: {}", default_profile);
                } else {
                    println!("Default Profile: (not set)");
                }

                println!("\nProfiles:");
                if self.config.profiles.is_empty() {
                    println!("  No profiles configured");
                } else {
                    for (name, profile) in &self.config.profiles {
                        println!("  [{}]", name);
                        println!("    Environment: {}", profile.environment);
                        if let Some(version) = &profile.api_version {
                            println!("    API Version: {}", version);
                        }
                    }
                }

                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                self.log_verbose(&format!(
                    "Attempting config set - key: {}, value: {}",
                    key, value
                ));

                match key.as_str() {
                    "default_profile" => {
                        self.config.default_profile = Some(value);
                    }
                    "environment" => {
                        // Reject unknown environments before they reach a profile
                        let environment: Environment = value.parse()?;
                        let profile_name = self.credentials.profile_name.clone();
                        let mut profile = self.active_profile();
                        profile.environment = environment.as_str().to_string();
                        self.config.set_profile(profile_name, profile);
                    }
                    "api_version" => {
                        let profile_name = self.credentials.profile_name.clone();
                        let mut profile = self.active_profile();
                        profile.api_version = Some(value);
                        self.config.set_profile(profile_name, profile);
                    }
                    other => {
                        return Err(AppError::Cli(CliError::InvalidArguments(format!(
                            "unknown configuration key '{other}', expected one of: \
                             default_profile, environment, api_version"
                        ))));
                    }
                }

                self.config.save(self.config_path.clone())?;
                println!("✅ Configuration updated");
                Ok(())
            }
        }
    }

    async fn handle_customer_command(&self, command: CustomerCommands) -> Result<(), AppError> {
        let client = self.client()?;
        let display = TableDisplay::new();

        match command {
            CustomerCommands::List {
                sort_field,
                sort_order,
                limit,
                all,
            } => {
                self.log_verbose("Attempting customers list command");

                let mut options = ListCustomers::new();
                if let Some(field) = sort_field.as_deref() {
                    options = options.sort_field(SortField::parse(field)?);
                }
                if let Some(order) = sort_order.as_deref() {
                    options = options.sort_order(SortOrder::parse(order)?);
                }
                if let Some(limit) = limit {
                    options = options.limit(limit);
                }

                let customers = if all {
                    client.customers().list_all(options).await?
                } else {
                    // Lazy stream: pages past the display cap are never fetched
                    let cap = limit.unwrap_or(DEFAULT_PAGE_ITEMS) as usize;
                    let stream = client.customers().list(options);
                    stream.take(cap).try_collect::<Vec<_>>().await?
                };

                println!("{}", display.render_customer_list(&customers)?);
                println!("{} customers shown", customers.len());
                Ok(())
            }
            CustomerCommands::Search {
                limit,
                order,
                sort_by,
                email,
                phone,
                reference,
                fuzzy,
                source,
                not_source,
                group,
                created_from,
                created_to,
                updated_from,
                updated_to,
                all,
            } => {
                self.log_verbose("Attempting customers search command");

                let criterion = |value: String| {
                    if fuzzy {
                        Match::fuzzy(value)
                    } else {
                        Match::exact(value)
                    }
                };

                let mut query = SearchQuery::new();
                if let Some(limit) = limit {
                    query = query.limit(limit);
                }
                if let Some(order) = order {
                    query = query.order(order);
                }
                if let Some(sort_by) = sort_by {
                    query = query.sort_field(sort_by);
                }
                if let Some(email) = email {
                    query = query.email_address(criterion(email));
                }
                if let Some(phone) = phone {
                    query = query.phone_number(criterion(phone));
                }
                if let Some(reference) = reference {
                    query = query.reference_id(criterion(reference));
                }
                for value in source {
                    query = query.creation_source(CreationSource::from(value.to_uppercase()));
                }
                for value in not_source {
                    query = query.not_creation_source(CreationSource::from(value.to_uppercase()));
                }
                if !group.is_empty() {
                    query = query.groups(GroupRule::all(group));
                }
                if let (Some(from), Some(to)) = (created_from, created_to) {
                    query = query.created_between(parse_timestamp(&from)?, parse_timestamp(&to)?);
                }
                if let (Some(from), Some(to)) = (updated_from, updated_to) {
                    query = query.updated_between(parse_timestamp(&from)?, parse_timestamp(&to)?);
                }

                let customers = if all {
                    client.customers().search_all(query).await?
                } else {
                    let cap = limit.unwrap_or(DEFAULT_PAGE_ITEMS) as usize;
                    let stream = client.customers().search(query)?;
                    stream.take(cap).try_collect::<Vec<_>>().await?
                };

                println!("{}", display.render_customer_list(&customers)?);
                println!("{} customers matched", customers.len());
                Ok(())
            }
            CustomerCommands::Get { id } => {
                self.log_verbose(&format!("Attempting customers get command - ID: {}", id));
                let customer = client.customers().get(&id).await?;
                println!("{}", display.render_customer_details(&customer)?);
                Ok(())
            }
            CustomerCommands::Create {
                given_name,
                family_name,
                company_name,
                nickname,
                email,
                phone,
                reference_id,
                note,
                idempotency_key,
            } => {
                self.log_verbose("Attempting customers create command");

                let customer = client
                    .customers()
                    .create(CreateCustomer {
                        idempotency_key,
                        given_name,
                        family_name,
                        company_name,
                        nickname,
                        email_address: email,
                        phone_number: phone,
                        reference_id,
                        note,
                        ..CreateCustomer::default()
                    })
                    .await?;

                println!(
                    "✅ Created customer {}",
                    customer.id.as_deref().unwrap_or("(no id)")
                );
                println!("{}", display.render_customer_details(&customer)?);
                Ok(())
            }
            CustomerCommands::Delete { id } => {
                self.log_verbose(&format!("Attempting customers delete command - ID: {}", id));
                client.customers().delete(&id).await?;
                println!("✅ Deleted customer {}", id);
                Ok(())
            }
            CustomerCommands::AssignGroup {
                customer_id,
                group_id,
            } => {
                client.customers().assign_group(&customer_id, &group_id).await?;
                println!("✅ Added customer {} to group {}", customer_id, group_id);
                Ok(())
            }
            CustomerCommands::UnassignGroup {
                customer_id,
                group_id,
            } => {
                client
                    .customers()
                    .unassign_group(&customer_id, &group_id)
                    .await?;
                println!("✅ Removed customer {} from group {}", customer_id, group_id);
                Ok(())
            }
        }
    }

    async fn handle_group_command(&self, command: GroupCommands) -> Result<(), AppError> {
        let client = self.client()?;
        let display = TableDisplay::new();

        match command {
            GroupCommands::List { limit, all } => {
                self.log_verbose("Attempting groups list command");

                let groups = if all {
                    client.groups().list_all(limit).await?
                } else {
                    let cap = limit.unwrap_or(DEFAULT_PAGE_ITEMS) as usize;
                    let stream = client.groups().list(limit);
                    stream.take(cap).try_collect::<Vec<_>>().await?
                };

                println!("{}", display.render_group_list(&groups)?);
                Ok(())
            }
            GroupCommands::Get { id } => {
                let group = client.groups().get(&id).await?;
                println!("{}", display.render_group_list(std::slice::from_ref(&group))?);
                Ok(())
            }
            GroupCommands::Create {
                name,
                idempotency_key,
            } => {
                let group = client
                    .groups()
                    .create(&name, idempotency_key.as_deref())
                    .await?;
                println!(
                    "✅ Created group {} ({})",
                    group.name.as_deref().unwrap_or(&name),
                    group.id.as_deref().unwrap_or("no id")
                );
                Ok(())
            }
            GroupCommands::Rename { id, name } => {
                let group = client.groups().rename(&id, &name).await?;
                println!(
                    "✅ Renamed group {} to {}",
                    id,
                    group.name.as_deref().unwrap_or(&name)
                );
                Ok(())
            }
            GroupCommands::Delete { id } => {
                client.groups().delete(&id).await?;
                println!("✅ Deleted group {}", id);
                Ok(())
            }
        }
    }

    async fn handle_segment_command(&self, command: SegmentCommands) -> Result<(), AppError> {
        let client = self.client()?;
        let display = TableDisplay::new();

        match command {
            SegmentCommands::List { limit, all } => {
                self.log_verbose("Attempting segments list command");

                let segments = if all {
                    client.segments().list_all(limit).await?
                } else {
                    let cap = limit.unwrap_or(DEFAULT_PAGE_ITEMS) as usize;
                    let stream = client.segments().list(limit);
                    stream.take(cap).try_collect::<Vec<_>>().await?
                };

                println!("{}", display.render_segment_list(&segments)?);
                Ok(())
            }
            SegmentCommands::Get { id } => {
                let segment = client.segments().get(&id).await?;
                println!(
                    "{}",
                    display.render_segment_list(std::slice::from_ref(&segment))?
                );
                Ok(())
            }
        }
    }
}

/// Prompts for an access token without echoing it.
fn collect_token() -> Result<String, AppError> {
    print!("Access token: ");
    io::stdout().flush().map_err(|e| {
        AppError::Cli(CliError::InvalidArguments(format!(
            "Failed to flush stdout: {}",
            e
        )))
    })?;

    let token = rpassword::read_password().map_err(|e| {
        AppError::Cli(CliError::InvalidArguments(format!(
            "Failed to read access token: {}",
            e
        )))
    })?;

    Ok(token.trim().to_string())
}

fn mask_token(token: &str) -> String {
    if token.len() > 8 {
        format!("{}...{}", &token[..4], &token[token.len() - 4..])
    } else {
        "*****".to_string()
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            AppError::Cli(CliError::InvalidArguments(format!(
                "'{value}' is not an RFC 3339 timestamp: {e}"
            )))
        })
}
