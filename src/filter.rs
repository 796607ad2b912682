use crate::format::{format_item_name, price_string};
use crate::model::{FilterState, Item};

/// Category first, then free-text search. Both stages keep input order, and
/// an empty constraint passes everything through.
pub fn filter_items(items: &[Item], filter: &FilterState) -> Vec<Item> {
    let term = filter.search_term.to_lowercase();

    items
        .iter()
        .filter(|item| match filter.selected_category.as_deref() {
            Some(category) if !category.is_empty() => item.category == category,
            _ => true,
        })
        .filter(|item| term.is_empty() || matches_search(item, &term))
        .cloned()
        .collect()
}

/// `term` must already be lower-cased.
fn matches_search(item: &Item, term: &str) -> bool {
    format_item_name(&item.material).to_lowercase().contains(term)
        || item.material.to_lowercase().contains(term)
        || item.category.to_lowercase().contains(term)
        || price_string(item.buy_price).contains(term)
        || price_string(item.sell_price).contains(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(material: &str, category: &str, buy: f64, sell: f64) -> Item {
        Item {
            material: material.to_string(),
            category: category.to_string(),
            buy_price: buy,
            sell_price: sell,
            buy_orders: 0,
            sell_orders: 0,
        }
    }

    fn metals() -> Vec<Item> {
        vec![
            item("IRON_INGOT", "Metal", 10.0, 5.0),
            item("GOLD_INGOT", "Metal", 50.0, 40.0),
        ]
    }

    fn filter(category: Option<&str>, term: &str) -> FilterState {
        FilterState {
            selected_category: category.map(str::to_string),
            search_term: term.to_string(),
        }
    }

    fn materials(items: &[Item]) -> Vec<&str> {
        items.iter().map(|i| i.material.as_str()).collect()
    }

    #[test]
    fn search_matches_display_name() {
        let result = filter_items(&metals(), &filter(Some(""), "iron"));
        assert_eq!(materials(&result), vec!["IRON_INGOT"]);
    }

    #[test]
    fn empty_filter_returns_input_unchanged() {
        let items = vec![
            item("STONE", "Blocks", 1.0, 0.5),
            item("IRON_INGOT", "Metal", 10.0, 5.0),
            item("DIRT", "Blocks", 0.1, 0.05),
        ];
        assert_eq!(filter_items(&items, &FilterState::default()), items);
    }

    #[test]
    fn unknown_category_yields_nothing() {
        assert!(filter_items(&metals(), &filter(Some("Food"), "")).is_empty());
        assert!(filter_items(&metals(), &filter(Some("Food"), "iron")).is_empty());
    }

    #[test]
    fn category_match_is_case_sensitive() {
        assert!(filter_items(&metals(), &filter(Some("metal"), "")).is_empty());
        assert_eq!(filter_items(&metals(), &filter(Some("Metal"), "")).len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_over_all_fields() {
        let items = metals();
        assert_eq!(materials(&filter_items(&items, &filter(None, "GOLD"))), vec!["GOLD_INGOT"]);
        assert_eq!(materials(&filter_items(&items, &filter(None, "ingot"))).len(), 2);
        assert_eq!(materials(&filter_items(&items, &filter(None, "meT"))).len(), 2);
        assert_eq!(materials(&filter_items(&items, &filter(None, "40"))), vec!["GOLD_INGOT"]);
        assert_eq!(materials(&filter_items(&items, &filter(None, "gold ingot"))), vec!["GOLD_INGOT"]);
        assert_eq!(materials(&filter_items(&items, &filter(None, "iron_"))), vec!["IRON_INGOT"]);
    }

    #[test]
    fn both_stages_combine_in_order() {
        let items = vec![
            item("COOKED_BEEF", "Food", 3.0, 2.0),
            item("IRON_INGOT", "Metal", 10.0, 5.0),
            item("IRON_BLOCK", "Metal", 90.0, 45.0),
            item("GOLD_INGOT", "Metal", 50.0, 40.0),
        ];
        let result = filter_items(&items, &filter(Some("Metal"), "iron"));
        assert_eq!(materials(&result), vec!["IRON_INGOT", "IRON_BLOCK"]);
    }
}
