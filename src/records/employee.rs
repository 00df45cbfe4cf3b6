use super::{merge, require, sealed, Deletable, Entity};
use crate::error::ValidationError;
use crate::store::{Table, Tables};
use crate::types::Collection;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub phone: String,
    /// Branch display name (not a validated reference).
    pub branch: String,
    pub monthly_salary: Decimal,
    pub role: String,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeInput {
    pub name: String,
    pub phone: String,
    pub branch: String,
    pub monthly_salary: Decimal,
    pub role: String,
    pub active: bool,
}

impl Default for EmployeeInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            phone: String::new(),
            branch: String::new(),
            monthly_salary: Decimal::ZERO,
            role: "مبيعات".to_string(),
            active: true,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub branch: Option<String>,
    pub monthly_salary: Option<Decimal>,
    pub role: Option<String>,
    pub active: Option<bool>,
}

impl sealed::Sealed for Employee {}

impl Entity for Employee {
    type Input = EmployeeInput;
    type Patch = EmployeePatch;

    const COLLECTION: Collection = Collection::Employees;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_input(id: String, input: EmployeeInput) -> Self {
        Self {
            id,
            name: input.name,
            phone: input.phone,
            branch: input.branch,
            monthly_salary: input.monthly_salary,
            role: input.role,
            active: input.active,
        }
    }

    fn apply_patch(&mut self, patch: EmployeePatch) {
        merge(&mut self.name, patch.name);
        merge(&mut self.phone, patch.phone);
        merge(&mut self.branch, patch.branch);
        merge(&mut self.monthly_salary, patch.monthly_salary);
        merge(&mut self.role, patch.role);
        merge(&mut self.active, patch.active);
    }

    fn validate(input: &EmployeeInput) -> Result<(), ValidationError> {
        require(Self::COLLECTION, "name", &input.name)
    }

    fn table(tables: &Tables) -> &Table<Self> {
        &tables.employees
    }

    fn table_mut(tables: &mut Tables) -> &mut Table<Self> {
        &mut tables.employees
    }
}

impl Deletable for Employee {}
