//! Page to gallery item transform.

use std::sync::LazyLock;

use regex::Regex;

use super::{FileObject, Page, PropertyValue, RichText};
use crate::models::GalleryItem;

/// Title used when a page has an empty title property.
pub const UNTITLED: &str = "(no title)";

static IMAGE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\.(jpg|jpeg|png|webp|gif)(\?|$)").expect("image url pattern is valid")
});

/// Which page properties feed the optional item fields.
#[derive(Debug, Clone, Default)]
pub struct ItemOptions {
    pub subtitle_prop: Option<String>,
    pub url_prop: Option<String>,
    pub cover_prop: Option<String>,
}

/// Maps Notion pages to gallery items, preserving order.
pub fn transform_pages(pages: &[Page], options: &ItemOptions) -> Vec<GalleryItem> {
    pages.iter().map(|page| transform_page(page, options)).collect()
}

fn transform_page(page: &Page, options: &ItemOptions) -> GalleryItem {
    let title = page_title(page);

    let subtitle = options
        .subtitle_prop
        .as_deref()
        .and_then(|name| page.properties.get(name))
        .map(plain_text)
        .unwrap_or_default();

    let url = options
        .url_prop
        .as_deref()
        .and_then(|name| page.properties.get(name))
        .and_then(|prop| match prop {
            PropertyValue::Url { url: Some(url) } if !url.is_empty() => Some(url.clone()),
            _ => None,
        })
        .or_else(|| page.url.clone())
        .unwrap_or_default();

    GalleryItem {
        id: page.id.clone(),
        title,
        subtitle,
        url,
        cover_url: cover_url(page, options.cover_prop.as_deref()),
    }
}

fn page_title(page: &Page) -> String {
    let title = page
        .properties
        .values()
        .find_map(|prop| match prop {
            PropertyValue::Title { title } => Some(join_text(title)),
            _ => None,
        })
        .unwrap_or_default();

    let title = title.trim();
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title.to_string()
    }
}

/// Cover precedence: page cover, then the named files property, then the
/// first files property whose first file looks like an image.
fn cover_url(page: &Page, cover_prop: Option<&str>) -> Option<String> {
    if let Some(cover) = &page.cover {
        if !matches!(cover, FileObject::Other) {
            return cover.url().map(str::to_string);
        }
    }

    let named = cover_prop.and_then(|name| page.properties.get(name));
    if let Some(PropertyValue::Files { files }) = named {
        if let Some(first) = files.first().filter(|f| !matches!(f, FileObject::Other)) {
            return first.url().map(str::to_string);
        }
    }

    page.properties.values().find_map(|prop| match prop {
        PropertyValue::Files { files } => files
            .first()
            .and_then(FileObject::url)
            .filter(|url| IMAGE_URL.is_match(url))
            .map(str::to_string),
        _ => None,
    })
}

/// Renders a property as display text.
pub fn plain_text(prop: &PropertyValue) -> String {
    match prop {
        PropertyValue::Title { title: text } | PropertyValue::RichText { rich_text: text } => {
            join_text(text)
        }
        PropertyValue::Select { select } => select
            .as_ref()
            .map(|s| s.name.clone())
            .unwrap_or_default(),
        PropertyValue::MultiSelect { multi_select } => multi_select
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Date { date } => match date {
            Some(date) => {
                let start = date.start.as_deref().unwrap_or_default();
                match date.end.as_deref() {
                    Some(end) if !end.is_empty() => format!("{start} – {end}"),
                    _ => start.to_string(),
                }
            }
            None => String::new(),
        },
        PropertyValue::Number { number } => number.map(|n| n.to_string()).unwrap_or_default(),
        PropertyValue::Email { email: value }
        | PropertyValue::Url { url: value }
        | PropertyValue::PhoneNumber { phone_number: value } => value.clone().unwrap_or_default(),
        PropertyValue::People { people } => people
            .iter()
            .filter_map(|p| {
                p.name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .or_else(|| p.person.as_ref().and_then(|d| d.email.as_deref()))
            })
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        PropertyValue::Checkbox { checkbox } => String::from(if *checkbox { "Yes" } else { "No" }),
        PropertyValue::Files { .. } | PropertyValue::Other => String::new(),
    }
}

fn join_text(text: &[RichText]) -> String {
    text.iter().map(|t| t.plain_text.as_str()).collect()
}
