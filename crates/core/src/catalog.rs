//! Menu catalog.
//!
//! The catalog is reference data: nothing in the storefront mutates it. It is
//! reached through the [`CatalogProvider`] trait so the storefront and the CLI
//! receive it as an injected dependency instead of reading module constants.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{CurrencyCode, ItemId, Price};

/// Menu section an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    MainCourses,
    SideDishes,
    Desserts,
    Drinks,
}

impl Category {
    /// Every category in menu tab order.
    pub const ALL: [Self; 4] = [
        Self::MainCourses,
        Self::SideDishes,
        Self::Desserts,
        Self::Drinks,
    ];

    /// Human-readable label (e.g., "Main Courses").
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MainCourses => "Main Courses",
            Self::SideDishes => "Side Dishes",
            Self::Desserts => "Desserts",
            Self::Drinks => "Drinks",
        }
    }

    /// URL slug (e.g., "main-courses").
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::MainCourses => "main-courses",
            Self::SideDishes => "side-dishes",
            Self::Desserts => "desserts",
            Self::Drinks => "drinks",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a category slug is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.slug() == s || c.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    pub price: Price,
    pub description: String,
    pub image_url: String,
    /// Small gadget illustration shown next to the name, if any.
    pub motif_image_url: Option<String>,
    pub category: Category,
}

/// Read-only source of menu items.
pub trait CatalogProvider: Send + Sync {
    /// All items in menu order.
    fn items(&self) -> &[CatalogItem];

    /// Items shown in the home page showcase.
    fn bestsellers(&self) -> Vec<&CatalogItem>;

    /// Look up an item by id.
    fn find(&self, id: &ItemId) -> Option<&CatalogItem> {
        self.items().iter().find(|item| &item.id == id)
    }

    /// Items in one category, in menu order.
    fn by_category(&self, category: Category) -> Vec<&CatalogItem> {
        self.items()
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }
}

/// In-memory catalog built once at start-up.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
    bestsellers: Vec<ItemId>,
}

impl StaticCatalog {
    /// Build a catalog from items and the ids to feature as bestsellers.
    ///
    /// Bestseller ids with no matching item are ignored.
    #[must_use]
    pub const fn new(items: Vec<CatalogItem>, bestsellers: Vec<ItemId>) -> Self {
        Self { items, bestsellers }
    }

    /// The Doraemon Delights house menu.
    #[must_use]
    pub fn house_menu() -> Self {
        let items = vec![
            item(
                "mc1",
                "Nobita's Favorite Ramen",
                1299,
                "A hearty and comforting bowl of ramen, just like Nobita's mom makes it. Guaranteed to make you feel better after a tough day with Gian!",
                "https://placehold.co/400x225/A7F3D0/10B981?text=Nobita_s+Ramen",
                Some("https://static.vecteezy.com/system/resources/previews/010/036/095/original/bell-icon-transparent-background-free-png.png"),
                Category::MainCourses,
            ),
            item(
                "mc2",
                "Gian Stew Surprise",
                1550,
                "A surprisingly delicious and very filling stew. WARNING: May induce spontaneous singing. Consume at your own risk!",
                "https://placehold.co/400x225/FBCFE8/EC4899?text=Gian+Stew",
                Some("https://cdn-icons-png.flaticon.com/512/189/189115.png"),
                Category::MainCourses,
            ),
            item(
                "mc3",
                "Shizuka's Sweet Potato Bake",
                1000,
                "A healthy and delightful baked sweet potato dish, as sweet and kind as Shizuka herself. Perfect for a light meal.",
                "https://placehold.co/400x225/DDD6FE/8B5CF6?text=Shizuka+Bake",
                Some("https://cdn-icons-png.flaticon.com/512/2809/2809913.png"),
                Category::MainCourses,
            ),
            item(
                "sd1",
                "Small Light Fries",
                350,
                "Crispy fries made with potatoes exposed to the Small Light. They're perfectly bite-sized and extra crunchy!",
                "https://placehold.co/400x225/F3F4F6/D1D5DB?text=Small+Fries",
                None,
                Category::SideDishes,
            ),
            item(
                "sd2",
                "Take-copter Veggie Sticks",
                400,
                "Fresh vegetable sticks served with a creamy dip. So light and healthy, they'll make you want to fly!",
                "https://placehold.co/400x225/ECFCCB/84CC16?text=Veggie+Sticks",
                Some("https://cdn-icons-png.flaticon.com/512/7068/7068063.png"),
                Category::SideDishes,
            ),
            item(
                "memory-bread-toasties",
                "Memory Bread Toasties",
                420,
                "Delicious toast that helps you remember... how tasty it is!",
                "https://placehold.co/400x300/E0F2FE/0284C7?text=Memory+Bread",
                None,
                Category::SideDishes,
            ),
            item(
                "bamboo-copter-bites",
                "Bamboo Copter Bites",
                500,
                "Light and airy puff pastries that will make you feel like flying.",
                "https://placehold.co/400x300/E0F2FE/0284C7?text=Bamboo+Copter+Bites",
                None,
                Category::SideDishes,
            ),
            item(
                "ds1",
                "Dorayaki Tower",
                875,
                "Doraemon's ultimate dream! A towering stack of fluffy dorayaki pancakes filled with sweet red bean paste. Share if you dare!",
                "https://placehold.co/400x225/FDE68A/F59E0B?text=Dorayaki+Tower",
                Some("https://cdn-icons-png.flaticon.com/512/5660/5660085.png"),
                Category::Desserts,
            ),
            item(
                "ds2",
                "Memory Bread Pudding",
                650,
                "A warm, comforting bread pudding made with slices of 'Memory Bread'. You'll never forget how delicious this is!",
                "https://placehold.co/400x225/BFDBFE/3B82F6?text=Memory+Pudding",
                Some("https://cdn-icons-png.flaticon.com/512/2600/2600205.png"),
                Category::Desserts,
            ),
            item(
                "dorayaki-delight",
                "Dorayaki Delight",
                350,
                "Doraemon's absolute favorite! Sweet red bean paste sandwiched between fluffy pancakes.",
                "https://placehold.co/400x300/E0F2FE/0284C7?text=Dorayaki",
                None,
                Category::Desserts,
            ),
            item(
                "anywhere-door-donuts",
                "Anywhere Door Donuts",
                280,
                "Sweet glazed donuts that will transport your taste buds to happiness.",
                "https://placehold.co/400x300/E0F2FE/0284C7?text=Anywhere+Door+Donut",
                None,
                Category::Desserts,
            ),
            item(
                "time-furoshiki-tarts",
                "Time Furoshiki Tarts",
                375,
                "Fruity tarts that are timelessly delicious, a perfect treat any day!",
                "https://placehold.co/400x300/E0F2FE/0284C7?text=Time+Furoshiki+Tart",
                None,
                Category::Desserts,
            ),
            item(
                "dr1",
                "Bamboo Copter Cooler",
                499,
                "A refreshing blue lemonade that will make you feel like you're soaring through the sky. Non-alcoholic, but highly uplifting!",
                "https://placehold.co/400x225/93C5FD/2563EB?text=Bamboo+Cooler",
                Some("https://cdn-icons-png.flaticon.com/512/3081/3081970.png"),
                Category::Drinks,
            ),
            item(
                "dr2",
                "Time Machine Tea",
                525,
                "A soothing herbal tea blend that tastes timeless. Each sip is a journey through flavor. What era will you visit?",
                "https://placehold.co/400x225/A5F3FC/0891B2?text=Time+Tea",
                Some("https://cdn-icons-png.flaticon.com/512/1047/1047270.png"),
                Category::Drinks,
            ),
        ];

        let bestsellers = [
            "dorayaki-delight",
            "memory-bread-toasties",
            "anywhere-door-donuts",
            "bamboo-copter-bites",
            "time-furoshiki-tarts",
            "mc1",
        ]
        .into_iter()
        .map(ItemId::from)
        .collect();

        Self::new(items, bestsellers)
    }
}

impl CatalogProvider for StaticCatalog {
    fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    fn bestsellers(&self) -> Vec<&CatalogItem> {
        self.bestsellers.iter().filter_map(|id| self.find(id)).collect()
    }
}

fn item(
    id: &str,
    name: &str,
    cents: u64,
    description: &str,
    image_url: &str,
    motif_image_url: Option<&str>,
    category: Category,
) -> CatalogItem {
    CatalogItem {
        id: ItemId::from(id),
        name: name.to_owned(),
        price: Price::from_cents(cents, CurrencyCode::USD),
        description: description.to_owned(),
        image_url: image_url.to_owned(),
        motif_image_url: motif_image_url.map(str::to_owned),
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_slug_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.slug().parse::<Category>(), Ok(category));
        }
        assert_eq!("Side Dishes".parse::<Category>(), Ok(Category::SideDishes));
        assert!("gadgets".parse::<Category>().is_err());
    }

    #[test]
    fn test_house_menu_ids_are_unique() {
        let catalog = StaticCatalog::house_menu();
        let mut ids: Vec<_> = catalog.items().iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), catalog.items().len());
    }

    #[test]
    fn test_every_category_has_items() {
        let catalog = StaticCatalog::house_menu();
        for category in Category::ALL {
            assert!(!catalog.by_category(category).is_empty(), "{category}");
        }
    }

    #[test]
    fn test_by_category_filters() {
        let catalog = StaticCatalog::house_menu();
        let drinks = catalog.by_category(Category::Drinks);
        assert_eq!(drinks.len(), 2);
        assert!(drinks.iter().all(|i| i.category == Category::Drinks));
    }

    #[test]
    fn test_find() {
        let catalog = StaticCatalog::house_menu();
        let tea = catalog.find(&ItemId::from("dr2"));
        assert_eq!(tea.map(|i| i.name.as_str()), Some("Time Machine Tea"));
        assert!(catalog.find(&ItemId::from("nope")).is_none());
    }

    #[test]
    fn test_bestsellers_resolve_and_skip_unknown() {
        let catalog = StaticCatalog::house_menu();
        assert_eq!(catalog.bestsellers().len(), 6);

        let sparse = StaticCatalog::new(
            catalog.items().to_vec(),
            vec![ItemId::from("ds1"), ItemId::from("missing")],
        );
        let names: Vec<_> = sparse.bestsellers().iter().map(|i| i.name.clone()).collect();
        assert_eq!(names, vec!["Dorayaki Tower".to_owned()]);
    }
}
