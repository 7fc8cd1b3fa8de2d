//! # Rendering
//!
//! Terminal output for `CmdResult` pieces, colored with `colored` (which honors
//! `NO_COLOR` and non-tty stdout). Layout math (widths, truncation, padding) is
//! Unicode-aware via `unicode-width`.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use propzapp::api::{CmdMessage, CmdResult, MessageLevel, Whoami};
use propzapp::error::Result;
use propzapp::model::{Property, PropertyType, Status};
use propzapp::store::Summary;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const ID_WIDTH: usize = 8;
const PRICE_WIDTH: usize = 14;
const TIME_WIDTH: usize = 14;
const COLUMN_WIDTH: usize = 24;
const FAVORITE_MARKER: &str = "♥";

pub(super) fn print_json(result: &CmdResult) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(result)?);
    Ok(())
}

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => eprintln!("{}", message.content.red()),
        }
    }
}

pub(super) fn short_id(id: &str) -> &str {
    match id.char_indices().nth(ID_WIDTH) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

pub(super) fn format_price(price: f64, kind: PropertyType) -> String {
    let whole = price.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if whole < 0 { "-" } else { "" };
    match kind {
        PropertyType::Rent => format!("{}${}/mo", sign, grouped),
        PropertyType::Buy => format!("{}${}", sign, grouped),
    }
}

fn status_colored(status: Status) -> ColoredString {
    let text = status.as_str();
    match status {
        Status::Interested => text.blue(),
        Status::Viewed => text.cyan(),
        Status::Applied => text.yellow(),
        Status::Rejected => text.red(),
        Status::Accepted => text.green(),
    }
}

fn beds_label(bedrooms: u32) -> String {
    if bedrooms == 0 {
        "studio".to_string()
    } else {
        format!("{}bd", bedrooms)
    }
}

pub(super) fn print_properties(properties: &[Property]) {
    for p in properties {
        let marker = if p.favorite {
            FAVORITE_MARKER.red()
        } else {
            " ".normal()
        };
        let id = format!("{:<width$}", short_id(&p.id), width = ID_WIDTH);
        let price = format!(
            "{:>width$}",
            format_price(p.price, p.property_type),
            width = PRICE_WIDTH
        );
        let rooms = format!("{} {}ba", beds_label(p.bedrooms), p.bathrooms);
        let status = p.status.as_str();
        let time_ago = format_time_ago(p.date_added);

        let title_text = if p.city.is_empty() {
            p.title.clone()
        } else {
            format!("{} · {}", p.title, p.city)
        };

        // marker, id, then the right-hand columns with their separators
        let fixed = 2 + ID_WIDTH + 1 + PRICE_WIDTH + rooms.width() + status.len() + TIME_WIDTH + 6;
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(&title_text, available);
        let padding = available.saturating_sub(title.width());

        println!(
            "{} {} {}{}  {}  {}  {}{}",
            marker,
            id.yellow(),
            title.bold(),
            " ".repeat(padding),
            price,
            rooms,
            status_colored(p.status),
            time_ago.dimmed()
        );
    }
}

fn print_list_field(label: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}", label.bold());
    for item in items {
        println!("  - {}", item);
    }
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("{} {}", format!("{:<12}", format!("{}:", label)).dimmed(), value);
    }
}

pub(super) fn print_full_property(p: &Property) {
    let favorite = if p.favorite {
        format!(" {}", FAVORITE_MARKER).red()
    } else {
        "".normal()
    };
    println!("{}{}", p.title.bold(), favorite);
    println!("{}", "--------------------------------".dimmed());
    print_field("Id", &p.id);
    print_field("Status", &status_colored(p.status).to_string());
    let kind = match p.property_subtype {
        Some(subtype) => format!("{} / {}", p.property_type, subtype),
        None => p.property_type.to_string(),
    };
    print_field("Type", &kind);
    print_field("Price", &format_price(p.price, p.property_type));
    print_field(
        "Rooms",
        &format!("{} · {} bath", beds_label(p.bedrooms), p.bathrooms),
    );
    if p.square_feet > 0 {
        print_field("Size", &format!("{} sq ft", p.square_feet));
    }
    print_field("Address", &p.full_address());
    if p.is_placed() {
        print_field("Location", &format!("{:.5}, {:.5}", p.latitude, p.longitude));
    }
    print_field("Listing", &p.listing_url);
    print_field("Image", &p.image_url);
    print_field("Added", &format_time_ago(p.date_added).trim().to_string());

    let contact = [&p.contact_name, &p.contact_phone, &p.contact_email]
        .iter()
        .filter_map(|c| c.as_deref())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" · ");
    print_field("Contact", &contact);

    if !p.description.is_empty() {
        println!();
        println!("{}", p.description);
    }
    if !p.notes.is_empty() {
        println!();
        println!("{} {}", "Notes:".bold(), p.notes);
    }
    println!();
    print_list_field("Amenities", &p.amenities);
    print_list_field("Pros", &p.positive_features);
    print_list_field("Cons", &p.negative_features);
}

fn compare_row(label: &str, properties: &[Property], cell: impl Fn(&Property) -> String) {
    let mut line = format!("{:<14}", label).dimmed().to_string();
    for p in properties {
        let text = truncate_to_width(&cell(p), COLUMN_WIDTH);
        let padding = COLUMN_WIDTH.saturating_sub(text.width());
        line.push_str(&text);
        line.push_str(&" ".repeat(padding + 2));
    }
    println!("{}", line.trim_end());
}

pub(super) fn print_compare(properties: &[Property]) {
    if properties.is_empty() {
        return;
    }
    compare_row("", properties, |p| p.title.clone());
    compare_row("Id", properties, |p| short_id(&p.id).to_string());
    compare_row("Price", properties, |p| format_price(p.price, p.property_type));
    compare_row("Bedrooms", properties, |p| beds_label(p.bedrooms));
    compare_row("Bathrooms", properties, |p| p.bathrooms.to_string());
    compare_row("Square feet", properties, |p| {
        if p.square_feet > 0 {
            p.square_feet.to_string()
        } else {
            "-".to_string()
        }
    });
    compare_row("Location", properties, |p| {
        [p.city.as_str(), p.state.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(", ")
    });
    compare_row("Status", properties, |p| p.status.to_string());
    compare_row("Favorite", properties, |p| {
        String::from(if p.favorite { "yes" } else { "no" })
    });
    compare_row("Amenities", properties, |p| {
        if p.amenities.is_empty() {
            "None listed".to_string()
        } else {
            p.amenities.join(", ")
        }
    });
    compare_row("Pros", properties, |p| p.positive_features.join(", "));
    compare_row("Cons", properties, |p| p.negative_features.join(", "));
}

pub(super) fn print_summary(summary: &Summary) {
    let label = |text: &str| format!("{:<16}", text).dimmed();
    println!("{} {}", label("Properties"), summary.total);
    println!("{} {}", label("Favorites"), summary.favorites);
    println!(
        "{} {}",
        label("Average price"),
        format_price(summary.average_price, PropertyType::Buy)
    );
    println!("{} {}", label("Cities"), summary.cities);
    println!();
    for count in &summary.by_status {
        let padding = 14usize.saturating_sub(count.status.as_str().len());
        println!(
            "  {}{} {}",
            status_colored(count.status),
            " ".repeat(padding),
            count.count
        );
    }
}

pub(super) fn print_whoami(whoami: &Whoami) {
    let label = |text: &str| format!("{:<10}", text).dimmed();
    println!("{} {}", label("Owner"), whoami.owner);
    println!("{} {}", label("Table"), whoami.table);
    match whoami.limit {
        Some(limit) => println!("{} {}/{}", label("Listings"), whoami.count, limit),
        None => println!("{} {}", label("Listings"), whoami.count),
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut current_width = 0;
    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }
    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
