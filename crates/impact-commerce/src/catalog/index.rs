//! In-memory SKU catalog.

use crate::catalog::Sku;
use crate::ImpactError;
use std::collections::BTreeMap;

/// SKUs indexed by code.
#[derive(Debug, Clone, Default)]
pub struct SkuCatalog {
    skus: BTreeMap<String, Sku>,
}

impl SkuCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a list of SKUs, rejecting duplicate codes.
    pub fn from_skus(skus: impl IntoIterator<Item = Sku>) -> Result<Self, ImpactError> {
        let mut catalog = Self::new();
        for sku in skus {
            catalog.insert(sku)?;
        }
        Ok(catalog)
    }

    /// Add a SKU. Surrounding whitespace in the code is dropped.
    pub fn insert(&mut self, mut sku: Sku) -> Result<(), ImpactError> {
        let code = catalog_key(&sku.code);
        if code.len() != sku.code.len() {
            sku.code = code.to_string();
        }
        if self.skus.contains_key(&sku.code) {
            return Err(ImpactError::DuplicateSku(sku.code));
        }
        self.skus.insert(sku.code.clone(), sku);
        Ok(())
    }

    /// Look up a SKU for a landing page. Inactive SKUs are not resolvable.
    pub fn resolve(&self, code: &str) -> Option<&Sku> {
        self.skus
            .get(catalog_key(code))
            .filter(|sku| sku.active)
    }

    /// Look up a SKU regardless of its state.
    pub fn get(&self, code: &str) -> Result<&Sku, ImpactError> {
        self.skus
            .get(catalog_key(code))
            .ok_or_else(|| ImpactError::SkuNotFound(code.to_string()))
    }

    /// Enable or disable a SKU.
    pub fn set_active(&mut self, code: &str, active: bool) -> Result<(), ImpactError> {
        let sku = self
            .skus
            .get_mut(catalog_key(code))
            .ok_or_else(|| ImpactError::SkuNotFound(code.to_string()))?;
        sku.active = active;
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sku> {
        self.skus.values()
    }

    pub fn len(&self) -> usize {
        self.skus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skus.is_empty()
    }
}

fn catalog_key(code: &str) -> &str {
    code.trim()
}
