//! Read-only vendor profile store and name matching.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::models::vendor::VendorProfile;

/// Read-only collection of vendor profiles.
pub trait VendorStore {
    /// Find a profile whose name equals `name` once both are case-folded.
    fn find_by_name(&self, name: &str) -> Option<&VendorProfile>;

    /// All registered vendor names, in store order.
    fn vendor_names(&self) -> Vec<&str>;
}

impl<T: VendorStore + ?Sized> VendorStore for &T {
    fn find_by_name(&self, name: &str) -> Option<&VendorProfile> {
        (**self).find_by_name(name)
    }

    fn vendor_names(&self) -> Vec<&str> {
        (**self).vendor_names()
    }
}

impl<T: VendorStore + ?Sized> VendorStore for Arc<T> {
    fn find_by_name(&self, name: &str) -> Option<&VendorProfile> {
        (**self).find_by_name(name)
    }

    fn vendor_names(&self) -> Vec<&str> {
        (**self).vendor_names()
    }
}

/// Vendor store held in memory, indexed by case-folded name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryVendorStore {
    vendors: Vec<VendorProfile>,
    by_name: HashMap<String, usize>,
}

impl InMemoryVendorStore {
    /// Build a store, rejecting empty names and names that collide after case folding.
    pub fn new(vendors: Vec<VendorProfile>) -> std::result::Result<Self, StoreError> {
        let mut by_name = HashMap::with_capacity(vendors.len());

        for (index, vendor) in vendors.iter().enumerate() {
            if vendor.name.is_empty() {
                return Err(StoreError::EmptyName {
                    id: vendor.id.clone(),
                });
            }
            if by_name.insert(fold(&vendor.name), index).is_some() {
                return Err(StoreError::DuplicateName(vendor.name.clone()));
            }
        }

        debug!("vendor store indexed {} profiles", vendors.len());
        Ok(Self { vendors, by_name })
    }

    /// Parse a JSON array of vendor profiles.
    pub fn from_json(json: &str) -> std::result::Result<Self, StoreError> {
        let vendors: Vec<VendorProfile> = serde_json::from_str(json)?;
        Self::new(vendors)
    }

    /// Load a JSON array of vendor profiles from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let store = Self::from_json(&content)?;
        info!("Loaded {} vendors from {}", store.len(), path.display());
        Ok(store)
    }

    pub fn vendors(&self) -> &[VendorProfile] {
        &self.vendors
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

impl VendorStore for InMemoryVendorStore {
    fn find_by_name(&self, name: &str) -> Option<&VendorProfile> {
        self.by_name
            .get(&fold(name))
            .and_then(|&index| self.vendors.get(index))
    }

    fn vendor_names(&self) -> Vec<&str> {
        self.vendors.iter().map(|v| v.name.as_str()).collect()
    }
}

/// Outcome of looking up the invoice's vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VendorMatch<'a> {
    Matched(&'a VendorProfile),
    NotFound,
}

/// Exact, case-insensitive vendor lookup. No trimming or fuzzy matching.
pub fn match_vendor<'a, S: VendorStore + ?Sized>(store: &'a S, name: &str) -> VendorMatch<'a> {
    match store.find_by_name(name) {
        Some(vendor) => VendorMatch::Matched(vendor),
        None => VendorMatch::NotFound,
    }
}

fn fold(name: &str) -> String {
    name.to_lowercase()
}
