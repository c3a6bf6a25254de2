//! Ticker registry: the fixed universe of agribusiness assets and their display metadata.
//!
//! The registry is an immutable value. Build it once at startup (built-in table or a
//! JSON file) and hand it to consumers behind an `Arc`.

use analysis_core::{AnalysisError, AssetCategory, AssetMetadata};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

mod builtin;
pub mod context;

pub use context::{market_context, MarketContext};

#[derive(Debug, Clone)]
pub struct AssetRegistry {
    assets: Vec<AssetMetadata>,
    index: HashMap<String, usize>,
}

/// On-disk registry layout
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    assets: Vec<AssetMetadata>,
}

impl AssetRegistry {
    /// Build from an ordered list. Order is preserved and is the scan order.
    pub fn new(assets: Vec<AssetMetadata>) -> Result<Self, AnalysisError> {
        if assets.is_empty() {
            return Err(AnalysisError::Config("asset registry is empty".to_string()));
        }

        let mut index = HashMap::with_capacity(assets.len());
        for (i, asset) in assets.iter().enumerate() {
            if asset.symbol.trim().is_empty() {
                return Err(AnalysisError::Config(format!("asset #{} has an empty symbol", i)));
            }
            if index.insert(asset.symbol.clone(), i).is_some() {
                return Err(AnalysisError::Config(format!(
                    "duplicate symbol in registry: {}",
                    asset.symbol
                )));
            }
        }

        Ok(Self { assets, index })
    }

    /// The registry shipped with the application
    pub fn builtin() -> Self {
        let assets = builtin::assets();
        let index = assets
            .iter()
            .enumerate()
            .map(|(i, a)| (a.symbol.clone(), i))
            .collect();
        Self { assets, index }
    }

    pub fn from_json_str(json: &str) -> Result<Self, AnalysisError> {
        let file: RegistryFile = serde_json::from_str(json)
            .map_err(|e| AnalysisError::Config(format!("invalid registry JSON: {}", e)))?;
        Self::new(file.assets)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::Config(format!("cannot read registry {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json_str(&json)?;
        tracing::info!("Loaded {} assets from {}", registry.len(), path.display());
        Ok(registry)
    }

    pub fn to_json(&self) -> Result<String, AnalysisError> {
        serde_json::to_string_pretty(&RegistryFile { assets: self.assets.clone() })
            .map_err(|e| AnalysisError::Config(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn all(&self) -> &[AssetMetadata] {
        &self.assets
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetMetadata> {
        self.index.get(symbol).map(|&i| &self.assets[i])
    }

    /// Every asset a scan should visit, in registry order (commodities excluded).
    pub fn scan_universe(&self) -> Vec<&AssetMetadata> {
        self.assets.iter().filter(|a| a.category.is_scannable()).collect()
    }

    pub fn by_category(&self, category: AssetCategory) -> Vec<&AssetMetadata> {
        self.assets.iter().filter(|a| a.category == category).collect()
    }

    /// Scannable assets whose sector matches exactly
    pub fn by_sector(&self, sector: &str) -> Vec<&AssetMetadata> {
        self.scan_universe()
            .into_iter()
            .filter(|a| a.sector == sector)
            .collect()
    }

    /// Distinct sectors of scannable assets, first-appearance order
    pub fn sectors(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for asset in self.scan_universe() {
            if !seen.contains(&asset.sector.as_str()) {
                seen.push(&asset.sector);
            }
        }
        seen
    }

    /// "SLCE3 - SLC Agrícola" style labels paired with provider symbols, for pickers.
    pub fn display_options(&self) -> Vec<(String, String)> {
        self.scan_universe()
            .into_iter()
            .map(|a| (format!("{} - {}", a.display_symbol, a.name), a.symbol.clone()))
            .collect()
    }
}
