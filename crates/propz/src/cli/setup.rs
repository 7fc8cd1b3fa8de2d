use clap::{Args, Parser, Subcommand};
use propzapp::model::{PropertySubtype, PropertyType, Status};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "propz",
    bin_name = "propz",
    version = get_version(),
    disable_help_subcommand = true
)]
#[command(about = "Track the rentals and homes you are hunting for", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List properties, optionally filtered
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show every detail of one property
    Show {
        /// Property id (a unique prefix is enough)
        id: String,
    },

    /// Track a new property
    Add(AddArgs),

    /// Change fields of a property
    Update(UpdateArgs),

    /// Stop tracking a property
    #[command(alias = "rm")]
    Delete {
        /// Property id (a unique prefix is enough)
        id: String,
    },

    /// Toggle the favorite mark
    Fav {
        /// Property id (a unique prefix is enough)
        id: String,
    },

    /// Compare up to three properties side by side
    Compare {
        /// Property ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Totals across all tracked properties
    Summary,

    /// Show the current owner identity and table
    Whoami,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Minimum price (inclusive)
    #[arg(long)]
    pub min_price: Option<f64>,

    /// Maximum price (inclusive)
    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum bedrooms
    #[arg(long)]
    pub min_beds: Option<u32>,

    /// Minimum bathrooms
    #[arg(long)]
    pub min_baths: Option<f64>,

    /// Only this status (interested, viewed, applied, rejected, accepted)
    #[arg(long)]
    pub status: Option<Status>,

    /// Only favorites
    #[arg(long)]
    pub favorites: bool,

    /// Only rent or buy
    #[arg(long)]
    pub kind: Option<PropertyType>,

    /// Only this subtype (apartment, house, sharehouse, condo, townhouse)
    #[arg(long)]
    pub subtype: Option<PropertySubtype>,

    /// Free text search over title, description, address, city and notes
    #[arg(short, long)]
    pub search: Option<String>,
}

/// Optional listing fields shared by `add` and `update`.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub state: Option<String>,

    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub beds: Option<u32>,

    /// Bathrooms, in steps of 0.5
    #[arg(long)]
    pub baths: Option<f64>,

    #[arg(long)]
    pub sqft: Option<u32>,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lng: Option<f64>,

    #[arg(long)]
    pub image_url: Option<String>,

    #[arg(long)]
    pub listing_url: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    #[arg(long)]
    pub status: Option<Status>,

    /// rent or buy
    #[arg(long)]
    pub kind: Option<PropertyType>,

    #[arg(long)]
    pub subtype: Option<PropertySubtype>,

    #[arg(long)]
    pub contact_name: Option<String>,

    #[arg(long)]
    pub contact_phone: Option<String>,

    #[arg(long)]
    pub contact_email: Option<String>,

    /// Amenity (repeatable)
    #[arg(long = "amenity")]
    pub amenities: Vec<String>,

    /// Something you liked (repeatable)
    #[arg(long = "pro")]
    pub pros: Vec<String>,

    /// Something you did not like (repeatable)
    #[arg(long = "con")]
    pub cons: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    #[arg(long)]
    pub title: String,

    /// Mark as favorite right away
    #[arg(long)]
    pub favorite: bool,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Property id (a unique prefix is enough)
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[command(flatten)]
    pub fields: FieldArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_flags_parse_into_typed_values() {
        let cli = Cli::parse_from([
            "propz",
            "list",
            "--min-price",
            "1000",
            "--status",
            "viewed",
            "--kind",
            "buy",
            "--favorites",
        ]);
        match cli.command {
            Commands::List(args) => {
                assert_eq!(args.min_price, Some(1000.0));
                assert_eq!(args.status, Some(Status::Viewed));
                assert_eq!(args.kind, Some(PropertyType::Buy));
                assert!(args.favorites);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn add_collects_repeated_features() {
        let cli = Cli::parse_from([
            "propz", "add", "--title", "Loft", "--pro", "Light", "--pro", "Quiet", "--con",
            "Stairs", "--lng", "-122.4",
        ]);
        match cli.command {
            Commands::Add(args) => {
                assert_eq!(args.title, "Loft");
                assert_eq!(args.fields.pros, vec!["Light", "Quiet"]);
                assert_eq!(args.fields.cons, vec!["Stairs"]);
                assert_eq!(args.fields.lng, Some(-122.4));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        let parsed = Cli::try_parse_from(["propz", "list", "--status", "maybe"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["propz", "summary", "--json", "-v"]);
        assert!(cli.json);
        assert!(cli.verbose);
    }
}
