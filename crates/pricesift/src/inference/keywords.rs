//! Header keyword families.
//!
//! Matching is by substring on the lower-cased cell text, so "Наименование товара"
//! and "Цена за ед., руб." both match.

use serde::{Deserialize, Serialize};

/// Terms that mark a row as the header row.
pub const HEADER_KEYWORDS: &[&str] = &[
    "наименование",
    "товар",
    "номенклатура",
    "описание",
    "цена",
    "стоимость",
    "кол-во",
    "количество",
    "name",
    "product",
    "item",
    "description",
    "price",
    "cost",
    "quantity",
    "qty",
];

const NAME_KEYWORDS: &[&str] = &[
    "наименование",
    "номенклатура",
    "товар",
    "название",
    "описание",
    "name",
    "product",
    "item",
    "description",
];

/// Identifier columns such as "Код товара" or "Product code" are never names.
const CODE_MARKERS: &[&str] = &["код", "артикул", "code", "sku"];

const PRICE_KEYWORDS: &[&str] = &["цена", "стоимость", "прайс", "price", "cost"];

const QUANTITY_KEYWORDS: &[&str] = &["количество", "кол-во", "кол.", "qty", "quantity"];

const UNIT_KEYWORDS: &[&str] = &["ед. изм", "ед.изм", "единица", "ед.", "unit", "uom"];

/// Semantic role of a price-list column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Name,
    Price,
    Quantity,
    Unit,
}

impl Role {
    /// Order in which a header cell is tested, most specific family first.
    pub const CLAIM_ORDER: [Role; 4] = [Role::Price, Role::Quantity, Role::Unit, Role::Name];

    /// Keyword family for this role.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Role::Name => NAME_KEYWORDS,
            Role::Price => PRICE_KEYWORDS,
            Role::Quantity => QUANTITY_KEYWORDS,
            Role::Unit => UNIT_KEYWORDS,
        }
    }

    /// Field name used in mappings and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Name => "name",
            Role::Price => "price",
            Role::Quantity => "quantity",
            Role::Unit => "unit",
        }
    }

    /// True when the (already lower-cased) header text belongs to this role.
    pub fn matches(self, lowered: &str) -> bool {
        let lowered = lowered.trim();
        if self == Role::Unit && (lowered == "ед" || lowered == "шт") {
            return true;
        }
        if self == Role::Name && CODE_MARKERS.iter().any(|m| lowered.contains(m)) {
            return false;
        }
        self.keywords().iter().any(|k| lowered.contains(k))
    }

    /// First role, in claim order, that the header text belongs to.
    pub fn classify_header(lowered: &str) -> Option<Role> {
        Self::CLAIM_ORDER.into_iter().find(|role| role.matches(lowered))
    }
}

/// True when the (already lower-cased) text contains any header keyword.
pub fn is_header_term(lowered: &str) -> bool {
    HEADER_KEYWORDS.iter().any(|k| lowered.contains(k))
}
