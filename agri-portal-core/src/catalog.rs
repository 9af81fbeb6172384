//! Service Catalog
//!
//! The ordered list of third-party AI services offered from the navigation
//! menu. Some services allow being framed inside the portal (`embed: true`);
//! the rest forbid it through their own security headers and are always
//! opened in a new tab.
//!
//! The catalog is loaded once at startup and only ever read afterwards.
//!
//! ## File format
//!
//! ```yaml
//! services:
//!   - label: Crop Recommendation
//!     url: https://crop-recommendation-juhl.onrender.com/
//!   - label: Yield Prediction
//!     url: https://mdraihanahmad-cropyieldprediction.streamlit.app/
//!     embed: false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub label: String,
    pub url: String,
    /// Whether the service may be framed inside the portal
    #[serde(rename = "embed", default = "default_embeddable")]
    pub embeddable: bool,
}

fn default_embeddable() -> bool {
    true
}

impl ServiceDescriptor {
    pub fn new(label: impl Into<String>, url: impl Into<String>, embeddable: bool) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
            embeddable,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    services: Vec<ServiceDescriptor>,
}

/// Ordered, read-only service catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceCatalog {
    services: Vec<ServiceDescriptor>,
}

impl ServiceCatalog {
    /// Build a catalog, rejecting empty lists, blank labels and non-http urls
    pub fn new(services: Vec<ServiceDescriptor>) -> Result<Self, CatalogError> {
        if services.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (index, service) in services.iter().enumerate() {
            if service.label.trim().is_empty() {
                return Err(CatalogError::EmptyLabel { index });
            }
            if !(service.url.starts_with("https://") || service.url.starts_with("http://")) {
                return Err(CatalogError::InvalidUrl {
                    label: service.label.clone(),
                    url: service.url.clone(),
                });
            }
        }
        Ok(Self { services })
    }

    /// The services the portal ships with
    pub fn builtin() -> Self {
        Self {
            services: vec![
                ServiceDescriptor::new(
                    "Crop Recommendation",
                    "https://crop-recommendation-juhl.onrender.com/",
                    true,
                ),
                ServiceDescriptor::new(
                    "Yield Prediction",
                    "https://mdraihanahmad-cropyieldprediction.streamlit.app/",
                    false,
                ),
                ServiceDescriptor::new(
                    "Disease Prediction",
                    "https://rhn-disease-prediction.streamlit.app/",
                    false,
                ),
                ServiceDescriptor::new(
                    "Fertilizer Guide",
                    "https://www.india.gov.in/farmers-portal",
                    false,
                ),
                ServiceDescriptor::new(
                    "Weather Forecast",
                    "https://mdraihanahmad-weather.netlify.app/",
                    false,
                ),
                ServiceDescriptor::new(
                    "Rainfall Forecast",
                    "https://fzn-rainfall-prediction.streamlit.app/",
                    false,
                ),
            ],
        }
    }

    /// Parse a YAML catalog document
    pub fn from_yaml_str(yaml: &str, origin: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(yaml).map_err(|source| CatalogError::Parse {
                path: origin.to_string(),
                source,
            })?;
        Self::new(file.services)
    }

    /// Load a YAML catalog from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        let yaml = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: shown.clone(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yaml, &shown)?;
        tracing::info!(path = %shown, services = catalog.len(), "Loaded service catalog");
        Ok(catalog)
    }

    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// First service whose label contains `fragment`, ignoring case
    pub fn find_by_label(&self, fragment: &str) -> Option<&ServiceDescriptor> {
        let needle = fragment.to_lowercase();
        self.services
            .iter()
            .find(|s| s.label.to_lowercase().contains(&needle))
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
