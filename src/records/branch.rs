use super::{merge, require, sealed, Deletable, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A showroom branch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Monthly rent.
    pub rent: Decimal,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchInput {
    pub name: String,
    pub address: String,
    pub rent: Decimal,
    pub active: bool,
}

impl Default for BranchInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            rent: Decimal::ZERO,
            active: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub rent: Option<Decimal>,
    pub active: Option<bool>,
}

impl sealed::Sealed for Branch {}

impl Entity for Branch {
    type Input = BranchInput;
    type Patch = BranchPatch;

    const COLLECTION: Collection = Collection::Branches;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: BranchInput) -> Self {
        Self {
            id,
            name: input.name,
            address: input.address,
            rent: input.rent,
            active: input.active,
        }
    }

    fn apply_patch(&mut self, patch: BranchPatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.address, patch.address);
        merge(&mut self.rent, patch.rent);
        merge(&mut self.active, patch.active);
    }

    fn validate(input: &BranchInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "name", &input.name)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.branches
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.branches
    }
}

impl Deletable for Branch {}
