use super::{merge, require, sealed, Deletable, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use serde::{Deserialize, Serialize};

/// A customer of the showroom.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub address: String,
    pub governorate: String,
    pub job_title: String,
    pub notes: String,
}

impl Customer {
    /// Free-text search used by the customer list: name, phone or national id.
    pub fn matches(&self, query: &str) -> bool {
        self.full_name.contains(query)
            || self.phone.contains(query)
            || self.national_id.contains(query)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInput {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub address: String,
    pub governorate: String,
    pub job_title: String,
    pub notes: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerPatch {
    pub full_name: Option<String>,
    pub national_id: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub governorate: Option<String>,
    pub job_title: Option<String>,
    pub notes: Option<String>,
}

impl sealed::Sealed for Customer {}

impl Entity for Customer {
    type Input = CustomerInput;
    type Patch = CustomerPatch;

    const COLLECTION: Collection = Collection::Customers;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: CustomerInput) -> Self {
        Self {
            id,
            full_name: input.full_name,
            national_id: input.national_id,
            phone: input.phone,
            address: input.address,
            governorate: input.governorate,
            job_title: input.job_title,
            notes: input.notes,
        }
    }

    fn apply_patch(&mut self, patch: CustomerPatch) {
        merge(&mut self.full_name, patch.full_name);
        merge(&mut self.national_id, patch.national_id);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.address, patch.address);
        merge(&mut self.governorate, patch.governorate);
        merge(&mut self.job_title, patch.job_title);
        merge(&mut self.notes, patch.notes);
    }

    fn validate(input: &CustomerInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "fullName", &input.full_name)?;
        require(Self::COLLECTION, "phone", &input.phone)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.customers
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.customers
    }
}

impl Deletable for Customer {}
