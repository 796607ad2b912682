//! Turns a filtered item list into a view description of cards and sections.

use crate::format::{format_item_name, format_price};
use crate::model::Item;

#[derive(Clone, Debug, PartialEq)]
pub struct Card {
    pub material: String,
    pub name: String,
    pub buy: String,
    pub sell: String,
}

impl Card {
    pub fn from_item(item: &Item) -> Self {
        Card {
            material: item.material.clone(),
            name: format_item_name(&item.material),
            buy: format!("B {}", format_price(item.buy_price)),
            sell: format!("S {}", format_price(item.sell_price)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub title: String,
    pub cards: Vec<Card>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GridView {
    /// Nothing matched the current filters
    Empty,
    Flat(Vec<Card>),
    Grouped(Vec<Section>),
}

impl GridView {
    /// Flat grid when a category is selected, otherwise one section per
    /// category in first-seen order.
    pub fn build(items: &[Item], group_by_category: bool) -> Self {
        if items.is_empty() {
            return GridView::Empty;
        }

        if !group_by_category {
            return GridView::Flat(items.iter().map(Card::from_item).collect());
        }

        let mut sections: Vec<Section> = Vec::new();
        for item in items {
            let card = Card::from_item(item);
            match sections.iter_mut().find(|s| s.title == item.category) {
                Some(section) => section.cards.push(card),
                None => sections.push(Section {
                    title: item.category.clone(),
                    cards: vec![card],
                }),
            }
        }
        GridView::Grouped(sections)
    }

    /// All cards in display order.
    pub fn cards(&self) -> Vec<&Card> {
        match self {
            GridView::Empty => Vec::new(),
            GridView::Flat(cards) => cards.iter().collect(),
            GridView::Grouped(sections) => sections.iter().flat_map(|s| s.cards.iter()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards().len()
    }
}
