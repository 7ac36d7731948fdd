//! `menu` command: list the catalog.

use std::fmt::Write as _;

use delights_core::{CatalogProvider, Category};

use super::CliError;

/// Render the menu, grouped by category.
///
/// # Errors
///
/// Returns [`CliError::UnknownCategory`] if `category` is not a known slug.
pub fn run(catalog: &dyn CatalogProvider, category: Option<&str>) -> Result<String, CliError> {
    let only = category.map(str::parse::<Category>).transpose()?;

    let mut out = String::new();
    for section in Category::ALL
        .into_iter()
        .filter(|c| only.is_none_or(|o| o == *c))
    {
        let items = catalog.by_category(section);
        tracing::debug!(category = section.slug(), count = items.len(), "Listing category");

        let _ = writeln!(out, "{section}");
        for item in items {
            let _ = writeln!(out, "  {:<24} {:<32} {:>8}", item.id, item.name, item.price);
        }
    }

    Ok(out.trim_end().to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::StaticCatalog;

    use super::*;

    #[test]
    fn test_full_menu_lists_every_section() {
        let out = run(&StaticCatalog::house_menu(), None).unwrap();
        for label in ["Main Courses", "Side Dishes", "Desserts", "Drinks"] {
            assert!(out.contains(label), "missing {label}");
        }
        assert!(out.contains("Nobita's Favorite Ramen"));
    }

    #[test]
    fn test_category_filter() {
        let out = run(&StaticCatalog::house_menu(), Some("drinks")).unwrap();
        assert!(out.starts_with("Drinks"));
        assert!(out.contains("$4.99"));
        assert!(!out.contains("Main Courses"));
    }

    #[test]
    fn test_unknown_category() {
        let err = run(&StaticCatalog::house_menu(), Some("snacks")).unwrap_err();
        assert!(matches!(err, CliError::UnknownCategory(_)));
    }
}
