use std::fmt;
use std::sync::LazyLock;

use reqwest::Url;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::engine::RawListing;

static OLX_CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div[data-cy='l-card']").unwrap());
static OLX_PRICE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p[data-testid='ad-price']").unwrap());
static OTOMOTO_CARD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article[data-id]").unwrap());
static H3: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static SPAN: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span").unwrap());
static DD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("dd").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());

/// Listing site. Picked once per target; decides how cards are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Olx,
    Otomoto,
}

impl Source {
    pub fn base_url(self) -> &'static str {
        match self {
            Source::Olx => "https://www.olx.pl",
            Source::Otomoto => "https://www.otomoto.pl",
        }
    }

    /// Guess the adapter from a page URL's host.
    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        let host = url.host_str()?;
        let host = host.strip_prefix("www.").unwrap_or(host);
        match host {
            "olx.pl" => Some(Source::Olx),
            "otomoto.pl" => Some(Source::Otomoto),
            _ => None,
        }
    }

    /// Raw text fragments of every listing card, in document order.
    pub fn listings(self, html: &str) -> Vec<RawListing> {
        let document = Html::parse_document(html);
        let card = match self {
            Source::Olx => &*OLX_CARD,
            Source::Otomoto => &*OTOMOTO_CARD,
        };
        document
            .select(card)
            .map(|el| RawListing {
                price_text: self.price_text(el),
                mileage_text: self.mileage_text(el),
                link: link(el),
            })
            .collect()
    }

    fn price_text(self, card: ElementRef) -> String {
        let selector = match self {
            Source::Olx => &*OLX_PRICE,
            Source::Otomoto => &*H3,
        };
        card.select(selector).next().map(text_of).unwrap_or_default()
    }

    /// First `span` (OLX) or `dd` (Otomoto) mentioning km.
    fn mileage_text(self, card: ElementRef) -> String {
        let selector = match self {
            Source::Olx => &*SPAN,
            Source::Otomoto => &*DD,
        };
        card.select(selector)
            .map(text_of)
            .find(|t| t.contains("km"))
            .unwrap_or_default()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Olx => f.write_str("olx"),
            Source::Otomoto => f.write_str("otomoto"),
        }
    }
}

fn link(card: ElementRef) -> String {
    card.select(&ANCHOR)
        .next()
        .and_then(|a| a.value().attr("href"))
        .unwrap_or("")
        .to_string()
}

fn text_of(el: ElementRef) -> String {
    el.text().collect::<String>().trim().to_string()
}
