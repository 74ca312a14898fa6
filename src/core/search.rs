//! Database view - filtering, sorting and day-grouping of completed purchases.
//!
//! Dates are compared on the local calendar: a purchase made at 00:30 local time
//! belongs to that local day regardless of its UTC date.

use crate::{errors::Error, models::Product};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};

/// Ordering applied to the database view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first.
    #[default]
    Date,
    /// Most expensive purchase price first; missing prices count as zero.
    Price,
    /// Alphabetical by name.
    Name,
}

impl FromStr for SortMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "price" => Ok(Self::Price),
            "name" => Ok(Self::Name),
            other => Err(Error::validation(format!("Unknown sort mode: {other}"))),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Date => "date",
            Self::Price => "price",
            Self::Name => "name",
        };
        f.write_str(s)
    }
}

/// Search box, date picker and sort selector of the database view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatabaseQuery {
    pub text: String,
    pub date: Option<NaiveDate>,
    pub sort: SortMode,
}

/// Completed products that fall on one local calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup<'a> {
    pub date: NaiveDate,
    pub products: Vec<&'a Product>,
}

impl DayGroup<'_> {
    /// Heading shown above the group, `dd.mm.yyyy`.
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }
}

impl DatabaseQuery {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn on(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    #[must_use]
    pub const fn sorted_by(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Case-insensitive match on name or article, restricted to the chosen day if any.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.text.to_lowercase();
        let text_match = product.name.to_lowercase().contains(&needle)
            || product.article.to_lowercase().contains(&needle);
        let date_match = self.date.is_none_or(|day| local_day(product) == day);
        text_match && date_match
    }

    /// Filters then stably sorts.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut found: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        match self.sort {
            SortMode::Date => found.sort_by(|a, b| b.date_added.cmp(&a.date_added)),
            SortMode::Price => found.sort_by(|a, b| {
                b.purchase_price
                    .unwrap_or(0.0)
                    .total_cmp(&a.purchase_price.unwrap_or(0.0))
            }),
            SortMode::Name => found.sort_by(|a, b| compare_names(&a.name, &b.name)),
        }
        found
    }

    /// Filters, sorts and groups by local day.
    #[must_use]
    pub fn grouped<'a>(&self, products: &'a [Product]) -> Vec<DayGroup<'a>> {
        group_by_day(&self.apply(products))
    }
}

/// Groups in order of first appearance, keeping the relative order inside each day.
#[must_use]
pub fn group_by_day<'a>(products: &[&'a Product]) -> Vec<DayGroup<'a>> {
    let mut groups: Vec<DayGroup<'a>> = Vec::new();
    for &product in products {
        let day = local_day(product);
        match groups.iter_mut().find(|g| g.date == day) {
            Some(group) => group.products.push(product),
            None => groups.push(DayGroup {
                date: day,
                products: vec![product],
            }),
        }
    }
    groups
}

fn local_day(product: &Product) -> NaiveDate {
    product.date_added.with_timezone(&Local).date_naive()
}

/// Case-insensitive first; on a tie lowercase sorts before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}
