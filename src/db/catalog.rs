use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::models::Product;

#[derive(Debug, thiserror::Error)]
enum CatalogLoadError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// An immutable, indexed product collection
#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<String, usize>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the id index. On duplicate ids the first product wins.
    pub fn from_products(products: Vec<Product>) -> Self {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.contains_key(&product.id) {
                tracing::warn!(product_id = %product.id, "Duplicate product id in catalog, keeping first");
                continue;
            }
            index.insert(product.id.clone(), position);
        }

        Self {
            products,
            index,
            loaded_at: Some(Utc::now()),
        }
    }

    /// All products in source order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn get(&self, id: &str) -> Option<&Product> {
        self.index.get(id).map(|&position| &self.products[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// When this catalog was built; `None` for the empty placeholder
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }
}

/// Process-wide product catalog backed by a JSON file
///
/// Readers always get a whole `Arc<Catalog>` snapshot. A reload builds the new
/// catalog off to the side and swaps the pointer, so a reader never sees a
/// product list and index from different loads.
pub struct CatalogStore {
    path: PathBuf,
    current: RwLock<Arc<Catalog>>,
}

impl CatalogStore {
    /// Creates an empty store. Nothing is read until `load` or first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: RwLock::new(Arc::new(Catalog::empty())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the catalog file and replaces the current catalog
    ///
    /// Never fails: on any read or parse error the store is reset to an empty
    /// catalog and the error is logged. Returns the number of products held.
    pub async fn load(&self) -> usize {
        let catalog = match read_catalog(&self.path).await {
            Ok(products) => {
                let catalog = Catalog::from_products(products);
                tracing::info!(
                    path = %self.path.display(),
                    products = catalog.len(),
                    "Loaded product catalog"
                );
                catalog
            }
            Err(CatalogLoadError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::error!(path = %self.path.display(), "Product data file not found");
                Catalog::empty()
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "Failed to load product catalog");
                Catalog::empty()
            }
        };

        let count = catalog.len();
        *self.current.write().await = Arc::new(catalog);
        count
    }

    /// The currently installed catalog, without attempting a load
    pub async fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().await.clone()
    }

    /// The full catalog, loading first if the store is empty
    pub async fn get_all(&self) -> Arc<Catalog> {
        let catalog = self.snapshot().await;
        if !catalog.is_empty() {
            return catalog;
        }

        tracing::debug!("Catalog empty, attempting reload");
        self.load().await;
        self.snapshot().await
    }

    /// Looks up a single product, loading first if the store is empty
    pub async fn get_by_id(&self, id: &str) -> Option<Product> {
        self.get_all().await.get(id).cloned()
    }
}

async fn read_catalog(path: &Path) -> Result<Vec<Product>, CatalogLoadError> {
    let contents = tokio::fs::read_to_string(path).await?;
    let products = serde_json::from_str(&contents)?;
    Ok(products)
}
