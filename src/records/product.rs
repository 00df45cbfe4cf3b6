use super::{merge, require, sealed, Deletable, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A catalogue product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub category: String,
    pub default_price: Decimal,
    /// Selling unit, e.g. piece or metre.
    pub unit: String,
    pub notes: String,
}

impl Product {
    /// Free-text search used by the product list: name or category.
    pub fn matches(&self, query: &str) -> bool {
        self.name.contains(query) || self.category.contains(query)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub default_price: Decimal,
    pub unit: String,
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub default_price: Option<Decimal>,
    pub unit: Option<String>,
    pub notes: Option<String>,
}

impl sealed::Sealed for Product {}

impl Entity for Product {
    type Input = ProductInput;
    type Patch = ProductPatch;

    const COLLECTION: Collection = Collection::Products;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: ProductInput) -> Self {
        Self {
            id,
            name: input.name,
            category: input.category,
            default_price: input.default_price,
            unit: input.unit,
            notes: input.notes,
        }
    }

    fn apply_patch(&mut self, patch: ProductPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.category, patch.category);
        merge(&mut self.default_price, patch.default_price);
        merge(&mut self.unit, patch.unit);
        merge(&mut self.notes, patch.notes);
    }

    fn validate(input: &ProductInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "name", &input.name)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.products
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.products
    }
}

impl Deletable for Product {}
