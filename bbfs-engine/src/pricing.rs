use serde::{Deserialize, Serialize};

use crate::classify::Class;
use crate::dimension::Dimension;

/// One value per betting dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerDimension<T> {
    #[serde(rename = "2D")]
    pub d2: T,
    #[serde(rename = "3D")]
    pub d3: T,
    #[serde(rename = "4D")]
    pub d4: T,
    #[serde(rename = "5D")]
    pub d5: T,
}

impl<T> PerDimension<T> {
    pub fn from_fn(mut f: impl FnMut(Dimension) -> T) -> Self {
        Self {
            d2: f(Dimension::D2),
            d3: f(Dimension::D3),
            d4: f(Dimension::D4),
            d5: f(Dimension::D5),
        }
    }

    pub fn get(&self, dim: Dimension) -> &T {
        match dim {
            Dimension::D2 => &self.d2,
            Dimension::D3 => &self.d3,
            Dimension::D4 => &self.d4,
            Dimension::D5 => &self.d5,
        }
    }

    pub fn get_mut(&mut self, dim: Dimension) -> &mut T {
        match dim {
            Dimension::D2 => &mut self.d2,
            Dimension::D3 => &mut self.d3,
            Dimension::D4 => &mut self.d4,
            Dimension::D5 => &mut self.d5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceTier {
    Full,
    Diskon,
    Super,
}

impl PriceTier {
    pub const ALL: [PriceTier; 3] = [PriceTier::Full, PriceTier::Diskon, PriceTier::Super];
}

/// Unit prices per tier, kept as typed by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceDetail {
    pub full: String,
    pub diskon: String,
    #[serde(rename = "super")]
    pub super_: String,
}

impl Default for PriceDetail {
    fn default() -> Self {
        Self {
            full: "0.1".to_string(),
            diskon: "0.1".to_string(),
            super_: "0.1".to_string(),
        }
    }
}

impl PriceDetail {
    pub fn raw(&self, tier: PriceTier) -> &str {
        match tier {
            PriceTier::Full => &self.full,
            PriceTier::Diskon => &self.diskon,
            PriceTier::Super => &self.super_,
        }
    }

    /// Stores the typed value with everything but digits and '.' removed.
    pub fn set(&mut self, tier: PriceTier, value: &str) {
        let cleaned: String = value
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        match tier {
            PriceTier::Full => self.full = cleaned,
            PriceTier::Diskon => self.diskon = cleaned,
            PriceTier::Super => self.super_ = cleaned,
        }
    }

    pub fn price(&self, tier: PriceTier) -> f64 {
        parse_amount(self.raw(tier))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub full: f64,
    pub diskon: f64,
    #[serde(rename = "super")]
    pub super_: f64,
}

impl Discount {
    pub fn factor(&self, tier: PriceTier) -> f64 {
        let f = match tier {
            PriceTier::Full => self.full,
            PriceTier::Diskon => self.diskon,
            PriceTier::Super => self.super_,
        };
        // a zero factor in the table means "no discount"
        if f == 0.0 { 1.0 } else { f }
    }
}

pub type DiscountTable = PerDimension<Discount>;

pub fn default_discounts() -> DiscountTable {
    let standard = Discount { full: 1.00, diskon: 0.67, super_: 0.34 };
    PerDimension {
        d2: standard,
        d3: standard,
        d4: standard,
        d5: Discount { full: 1.00, diskon: 0.62, super_: 0.34 },
    }
}

/// Unit prices for each class and dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceBook {
    pub single: PerDimension<PriceDetail>,
    pub twin: PerDimension<PriceDetail>,
    pub twin_plus: PerDimension<PriceDetail>,
}

impl PriceBook {
    pub fn detail(&self, class: Class, dim: Dimension) -> &PriceDetail {
        match class {
            Class::Single => self.single.get(dim),
            Class::Twin => self.twin.get(dim),
            Class::TwinPlus => self.twin_plus.get(dim),
        }
    }

    pub fn detail_mut(&mut self, class: Class, dim: Dimension) -> &mut PriceDetail {
        match class {
            Class::Single => self.single.get_mut(dim),
            Class::Twin => self.twin.get_mut(dim),
            Class::TwinPlus => self.twin_plus.get_mut(dim),
        }
    }
}

/// Lenient numeric parse: strips anything that is not a digit or '.', and
/// yields 0.0 when nothing parseable is left.
pub fn parse_amount(s: &str) -> f64 {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    cleaned.parse::<f64>().unwrap_or(0.0)
}

pub fn cost(qty: usize, unit_price: f64, discount: f64) -> f64 {
    qty as f64 * unit_price * discount
}

pub fn format_cost(value: f64) -> String {
    format!("{:.3}", value)
}

#[derive(Debug, Clone, PartialEq)]
pub struct CostRow {
    pub dim: Dimension,
    pub selected: bool,
    pub counts: [usize; 3],
    pub costs: [f64; 3],
}

impl CostRow {
    pub fn total_count(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn total_cost(&self) -> f64 {
        self.costs.iter().sum()
    }
}

/// Cost of every class in every dimension at one price tier. Unselected
/// dimensions cost nothing.
pub fn summarize_costs(
    counts: &PerDimension<[usize; 3]>,
    selected: &[Dimension],
    book: &PriceBook,
    discounts: &DiscountTable,
    tier: PriceTier,
) -> Vec<CostRow> {
    Dimension::ALL
        .iter()
        .map(|&dim| {
            let is_selected = selected.contains(&dim);
            let dim_counts = *counts.get(dim);
            let mut costs = [0.0; 3];
            if is_selected {
                for (i, class) in Class::ALL.iter().enumerate() {
                    let price = book.detail(*class, dim).price(tier);
                    let factor = discounts.get(dim).factor(tier);
                    costs[i] = cost(dim_counts[i], price, factor);
                }
            }
            CostRow {
                dim,
                selected: is_selected,
                counts: dim_counts,
                costs,
            }
        })
        .collect()
}
