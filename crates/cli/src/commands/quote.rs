//! `quote` command: price a cart from the command line.

use std::fmt::Write as _;

use delights_core::{Cart, CatalogProvider, ItemId, cart_total, line_subtotal};

use super::CliError;

/// Parse `ITEM_ID=QTY` (or a bare `ITEM_ID`, meaning one).
///
/// # Errors
///
/// Returns [`CliError::InvalidLine`] for an empty id or a non-numeric quantity.
pub fn parse_line(arg: &str) -> Result<(ItemId, u32), CliError> {
    let (id, quantity) = match arg.split_once('=') {
        Some((id, qty)) => (
            id.trim(),
            qty.trim()
                .parse::<u32>()
                .map_err(|_| CliError::InvalidLine(arg.to_owned()))?,
        ),
        None => (arg.trim(), 1),
    };

    if id.is_empty() {
        return Err(CliError::InvalidLine(arg.to_owned()));
    }

    Ok((ItemId::new(id), quantity))
}

/// Build a cart from the arguments and render each line and the total.
///
/// Repeated ids merge into one line, as on the storefront.
///
/// # Errors
///
/// Returns [`CliError::UnknownItem`] for ids missing from the catalog.
pub fn run(catalog: &dyn CatalogProvider, args: &[String]) -> Result<String, CliError> {
    let mut cart = Cart::default();
    for arg in args {
        let (id, quantity) = parse_line(arg)?;
        let item = catalog
            .find(&id)
            .ok_or_else(|| CliError::UnknownItem(id.to_string()))?;
        cart.add_item(item, quantity)?;
    }

    let mut out = String::new();
    for line in cart.lines() {
        let _ = writeln!(
            out,
            "{:<32} {:>4} x {:>8} = {:>9}",
            line.name,
            line.quantity,
            line.unit_price,
            line_subtotal(line)
        );
    }
    let total = cart_total(cart.lines())?;
    let _ = write!(out, "Total ({} items): {total}", cart.item_count());

    Ok(out)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use delights_core::StaticCatalog;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("mc1=2").unwrap(), (ItemId::from("mc1"), 2));
        assert_eq!(parse_line("dr1").unwrap(), (ItemId::from("dr1"), 1));
        assert!(matches!(parse_line("mc1=two"), Err(CliError::InvalidLine(_))));
        assert!(matches!(parse_line("=2"), Err(CliError::InvalidLine(_))));
    }

    #[test]
    fn test_quote_totals() {
        let out = run(&StaticCatalog::house_menu(), &args(&["mc1=1", "sd1=2", "dr1"])).unwrap();
        assert!(out.contains("$12.99"));
        assert!(out.contains("$7.00"));
        assert!(out.ends_with("Total (4 items): $24.98"));
    }

    #[test]
    fn test_repeated_ids_merge() {
        let out = run(&StaticCatalog::house_menu(), &args(&["dr1=1", "dr1=2"])).unwrap();
        assert!(out.ends_with("Total (3 items): $14.97"));
        assert_eq!(out.lines().count(), 2);
    }

    #[test]
    fn test_unknown_item() {
        let err = run(&StaticCatalog::house_menu(), &args(&["mc9"])).unwrap_err();
        assert!(matches!(err, CliError::UnknownItem(id) if id == "mc9"));
    }
}
