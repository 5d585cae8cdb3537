use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

use crate::market::{RawListing, Side};

pub const CARD_SELECTOR: &str = ".hall-list-item";

lazy_static! {
    static ref CARD: Selector = Selector::parse(CARD_SELECTOR).unwrap();
    static ref MERCHANT: Selector = Selector::parse(".list-item__nickname").unwrap();
    static ref PRICE: Selector = Selector::parse(".price-shower").unwrap();
    static ref AMOUNT: Selector = Selector::parse(".list_limit span span:first-child").unwrap();
    static ref LIMITS: Selector = Selector::parse(".list_limit span span:last-child").unwrap();
}

/// Reads every ad card out of a rendered listing page.
pub fn parse_cards(html: &str, side: Side, page: u32) -> Vec<RawListing> {
    let document = Html::parse_document(html);

    document
        .select(&CARD)
        .map(|card| RawListing {
            merchant: first_text(&card, &MERCHANT).unwrap_or_else(|| "N/A".to_string()),
            raw_price: first_text(&card, &PRICE),
            raw_amount: first_text(&card, &AMOUNT),
            raw_limits: first_text(&card, &LIMITS),
            side,
            page,
        })
        .collect()
}

fn first_text(card: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector).next().map(|el| {
        el.text()
            .collect::<Vec<_>>()
            .join(" ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    })
}
