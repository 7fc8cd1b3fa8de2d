//! # CLI Layer
//!
//! This module is **one possible UI client** for propz; it is not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs the tracing subscriber
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: Convert shell arguments into typed commands via clap
//! 2. **Context Setup**: Resolve config, identity and table via [`initialize`]
//! 3. **API Dispatch**: Call the appropriate `PropzApi` method
//! 4. **Output Formatting**: Render `CmdResult` as colored text or JSON
//! 5. **Error Handling**: Errors bubble up to `main`, which prints them and exits 1

use super::render::{
    print_compare, print_full_property, print_json, print_messages, print_properties,
    print_summary, print_whoami,
};
use super::setup::{AddArgs, Cli, Commands, FieldArgs, ListArgs, UpdateArgs};
use clap::Parser;
use propzapp::api::{CmdResult, MessageLevel, PropzApi};
use propzapp::error::{PropzError, Result};
use propzapp::filter::PropertyFilters;
use propzapp::init::{initialize, DynTable};
use propzapp::model::{PropertyInput, PropertyPatch};
use tracing_subscriber::EnvFilter;

/// Which renderer a command's result goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    List,
    Full,
    Affected,
    Compare,
    Summary,
    Whoami,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ctx = initialize()?;
    tracing::debug!(data_dir = %ctx.data_dir.display(), "propz context ready");

    let (result, view) = dispatch(&mut ctx.api, cli.command)?;
    if cli.json {
        print_json(&result)?;
    } else {
        render(&result, view);
    }

    if result
        .messages
        .iter()
        .any(|m| m.level == MessageLevel::Error)
    {
        return Err(PropzError::Api("command reported errors".to_string()));
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // A second init (tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(api: &mut PropzApi<DynTable>, command: Commands) -> Result<(CmdResult, View)> {
    match command {
        Commands::List(args) => handle_list(api, args),
        Commands::Show { id } => Ok((api.show(&id)?, View::Full)),
        Commands::Add(args) => handle_add(api, args),
        Commands::Update(args) => handle_update(api, args),
        Commands::Delete { id } => Ok((api.delete(&id)?, View::Affected)),
        Commands::Fav { id } => Ok((api.toggle_favorite(&id)?, View::Affected)),
        Commands::Compare { ids } => Ok((api.compare(ids.as_slice())?, View::Compare)),
        Commands::Summary => Ok((api.summary()?, View::Summary)),
        Commands::Whoami => Ok((api.whoami()?, View::Whoami)),
    }
}

fn render(result: &CmdResult, view: View) {
    match view {
        View::List => print_properties(&result.listed),
        View::Full => result.listed.iter().for_each(print_full_property),
        View::Affected => print_properties(&result.affected),
        View::Compare => print_compare(&result.listed),
        View::Summary => {
            if let Some(summary) = &result.summary {
                print_summary(summary);
            }
        }
        View::Whoami => {
            if let Some(whoami) = &result.whoami {
                print_whoami(whoami);
            }
        }
    }
    print_messages(&result.messages);
}

fn handle_list(api: &mut PropzApi<DynTable>, args: ListArgs) -> Result<(CmdResult, View)> {
    let filters = list_filters(&args);
    let result = api.list(filters, args.search.as_deref())?;
    Ok((result, View::List))
}

fn handle_add(api: &mut PropzApi<DynTable>, args: AddArgs) -> Result<(CmdResult, View)> {
    let mut input = field_input(args.title, args.fields);
    input.favorite = args.favorite;
    Ok((api.add(input)?, View::Affected))
}

fn handle_update(api: &mut PropzApi<DynTable>, args: UpdateArgs) -> Result<(CmdResult, View)> {
    let patch = field_patch(args.title, args.fields);
    Ok((api.update(&args.id, patch)?, View::Affected))
}

pub(super) fn list_filters(args: &ListArgs) -> PropertyFilters {
    PropertyFilters {
        min_price: args.min_price,
        max_price: args.max_price,
        min_bedrooms: args.min_beds,
        min_bathrooms: args.min_baths,
        status: args.status,
        favorite: args.favorites.then_some(true),
        property_type: args.kind,
        property_subtype: args.subtype,
    }
}

pub(super) fn field_input(title: String, fields: FieldArgs) -> PropertyInput {
    PropertyInput {
        title,
        description: fields.description.unwrap_or_default(),
        address: fields.address.unwrap_or_default(),
        city: fields.city.unwrap_or_default(),
        state: fields.state.unwrap_or_default(),
        zip_code: fields.zip.unwrap_or_default(),
        price: fields.price.unwrap_or_default(),
        bedrooms: fields.beds.unwrap_or_default(),
        bathrooms: fields.baths.unwrap_or_default(),
        square_feet: fields.sqft.unwrap_or_default(),
        image_url: fields.image_url.unwrap_or_default(),
        listing_url: fields.listing_url.unwrap_or_default(),
        latitude: fields.lat.unwrap_or_default(),
        longitude: fields.lng.unwrap_or_default(),
        notes: fields.notes.unwrap_or_default(),
        favorite: false,
        status: fields.status.unwrap_or_default(),
        property_type: fields.kind.unwrap_or_default(),
        property_subtype: fields.subtype,
        contact_name: fields.contact_name,
        contact_phone: fields.contact_phone,
        contact_email: fields.contact_email,
        amenities: fields.amenities,
        positive_features: fields.pros,
        negative_features: fields.cons,
    }
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    (!list.is_empty()).then_some(list)
}

pub(super) fn field_patch(title: Option<String>, fields: FieldArgs) -> PropertyPatch {
    PropertyPatch {
        title,
        description: fields.description,
        address: fields.address,
        city: fields.city,
        state: fields.state,
        zip_code: fields.zip,
        price: fields.price,
        bedrooms: fields.beds,
        bathrooms: fields.baths,
        square_feet: fields.sqft,
        image_url: fields.image_url,
        listing_url: fields.listing_url,
        latitude: fields.lat,
        longitude: fields.lng,
        notes: fields.notes,
        favorite: None,
        status: fields.status,
        property_type: fields.kind,
        property_subtype: fields.subtype,
        contact_name: fields.contact_name,
        contact_phone: fields.contact_phone,
        contact_email: fields.contact_email,
        amenities: non_empty(fields.amenities),
        positive_features: non_empty(fields.pros),
        negative_features: non_empty(fields.cons),
    }
}
