//! Single-document JSON persistence.
//!
//! Every save is read-merge-write: the file on disk is read again, the keys
//! carried by the [`DocumentPatch`] overwrite the stored ones and the whole
//! object is written back. Keys missing from the patch keep whatever is on
//! disk, so callers must pass the full current value of every key they own.
//!
//! There is no lock and no version token. Two processes writing the same file
//! can silently lose each other's updates; run a single instance per file.

use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CashMovement, Customer, EngineError, ResultEngine, zones::DEFAULT_UNIT_PRICE};

/// Data file used when none is configured.
pub const DEFAULT_DATA_FILE: &str = "db.json";

const CUSTOMERS_KEY: &str = "clientes";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "clientes", default)]
    pub customers: Vec<Customer>,
    #[serde(rename = "precio_caja", default = "default_unit_price")]
    pub default_price: u64,
    #[serde(rename = "precios_por_comuna", default)]
    pub zone_prices: BTreeMap<String, u64>,
    #[serde(rename = "movimientos", default)]
    pub movements: Vec<CashMovement>,
    #[serde(rename = "comunas", default)]
    pub known_zones: Vec<String>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            customers: Vec::new(),
            default_price: DEFAULT_UNIT_PRICE,
            zone_prices: BTreeMap::new(),
            movements: Vec::new(),
            known_zones: Vec::new(),
        }
    }
}

fn default_unit_price() -> u64 {
    DEFAULT_UNIT_PRICE
}

/// Keys to overwrite on save. `None` leaves the stored value untouched.
#[derive(Clone, Debug, Default, Serialize)]
pub struct DocumentPatch<'a> {
    #[serde(rename = "clientes", skip_serializing_if = "Option::is_none")]
    pub customers: Option<&'a [Customer]>,
    #[serde(rename = "precio_caja", skip_serializing_if = "Option::is_none")]
    pub default_price: Option<u64>,
    #[serde(rename = "precios_por_comuna", skip_serializing_if = "Option::is_none")]
    pub zone_prices: Option<&'a BTreeMap<String, u64>>,
    #[serde(rename = "movimientos", skip_serializing_if = "Option::is_none")]
    pub movements: Option<&'a [CashMovement]>,
    #[serde(rename = "comunas", skip_serializing_if = "Option::is_none")]
    pub known_zones: Option<&'a [String]>,
}

/// Outcome of [`DocumentStore::load`]. When the file could not be read,
/// `document` is the empty default and `error` says why.
#[derive(Debug)]
pub struct Loaded {
    pub document: Document,
    pub error: Option<EngineError>,
}

#[derive(Clone, Debug)]
pub struct DocumentStore {
    path: PathBuf,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}

impl DocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole document. Never fails: a missing file yields the
    /// default document, an unreadable one yields the default document plus a
    /// [`EngineError::PersistenceCorruption`].
    #[must_use]
    pub fn load(&self) -> Loaded {
        match self.read_document() {
            Ok(document) => Loaded {
                document,
                error: None,
            },
            Err(reason) => {
                tracing::warn!(path = %self.path.display(), %reason, "discarding unreadable document");
                Loaded {
                    document: Document::default(),
                    error: Some(EngineError::PersistenceCorruption {
                        path: self.path.clone(),
                        reason,
                    }),
                }
            }
        }
    }

    /// Merges `patch` over the document currently on disk and rewrites it.
    pub fn save(&self, patch: &DocumentPatch<'_>) -> ResultEngine<()> {
        let mut stored = match self.read_object() {
            Ok(stored) => stored,
            Err(reason) => {
                tracing::warn!(path = %self.path.display(), %reason, "overwriting unreadable document");
                Map::new()
            }
        };

        let fields = match serde_json::to_value(patch)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        let keys: Vec<_> = fields.keys().cloned().collect();
        stored.extend(fields);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(&Value::Object(stored))?;
        fs::write(&self.path, payload)?;
        tracing::debug!(path = %self.path.display(), ?keys, "saved document");
        Ok(())
    }

    /// Copies the current file next to itself as `<name>.corrupt` so it can
    /// be inspected after the document is rewritten. Returns the copy's path,
    /// or `None` when there was no file.
    pub fn set_aside(&self) -> ResultEngine<Option<PathBuf>> {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".corrupt");
        let copy = self.path.with_file_name(name);
        match fs::copy(&self.path, &copy) {
            Ok(_) => {
                tracing::warn!(path = %copy.display(), "kept a copy of the unreadable document");
                Ok(Some(copy))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn read_document(&self) -> Result<Document, String> {
        let stored = self.read_object()?;
        serde_json::from_value(Value::Object(stored)).map_err(|err| err.to_string())
    }

    /// Raw top-level object on disk. The first revision of the file was a bare
    /// list of customers; it is read as `{"clientes": [...]}`.
    fn read_object(&self) -> Result<Map<String, Value>, String> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.to_string()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content).map_err(|err| err.to_string())? {
            Value::Object(map) => Ok(map),
            Value::Array(customers) => {
                let mut map = Map::new();
                map.insert(CUSTOMERS_KEY.to_string(), Value::Array(customers));
                Ok(map)
            }
            _ => Err("top-level value is not an object".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> DocumentStore {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../target/test_stores");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{name}-{}.json", uuid::Uuid::new_v4()));
        DocumentStore::new(path)
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = temp_store("missing");
        let loaded = store.load();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.document, Document::default());
        assert_eq!(loaded.document.default_price, DEFAULT_UNIT_PRICE);
    }

    #[test]
    fn wrong_shape_is_reported_and_reset() {
        for content in ["42", "\"text\"", "{not json", r#"{"clientes": 3}"#] {
            let store = temp_store("corrupt");
            fs::write(store.path(), content).unwrap();
            let loaded = store.load();
            assert_eq!(loaded.document, Document::default());
            assert!(matches!(
                loaded.error,
                Some(EngineError::PersistenceCorruption { .. })
            ));
        }
    }

    #[test]
    fn legacy_customer_list_is_accepted() {
        let store = temp_store("legacy");
        fs::write(
            store.path(),
            r#"[{"nombre_completo":"Ana","direccion":"Calle 1","comuna":"macul",
                 "cajas_de_huevos":2,"cajas_de_huevos_total":5,"rut":"1-9"}]"#,
        )
        .unwrap();
        let loaded = store.load();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.document.customers.len(), 1);
        assert_eq!(loaded.document.customers[0].tax_id, "1-9");
        assert_eq!(loaded.document.customers[0].lifetime_units, 5);
    }

    #[test]
    fn save_merges_disjoint_keys() {
        let store = temp_store("merge");
        let zones = vec!["Macul".to_string()];
        store
            .save(&DocumentPatch {
                known_zones: Some(&zones),
                ..DocumentPatch::default()
            })
            .unwrap();
        store
            .save(&DocumentPatch {
                default_price: Some(1500),
                ..DocumentPatch::default()
            })
            .unwrap();

        let document = store.load().document;
        assert_eq!(document.known_zones, zones);
        assert_eq!(document.default_price, 1500);
        assert!(document.customers.is_empty());
    }

    #[test]
    fn save_keeps_unknown_keys() {
        let store = temp_store("unknown");
        fs::write(store.path(), r#"{"version": "2.1", "precio_caja": 900}"#).unwrap();
        let prices = BTreeMap::from([("Macul".to_string(), 1200)]);
        store
            .save(&DocumentPatch {
                zone_prices: Some(&prices),
                ..DocumentPatch::default()
            })
            .unwrap();

        let raw: Value = serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["version"], "2.1");
        assert_eq!(raw["precio_caja"], 900);
        assert_eq!(raw["precios_por_comuna"]["Macul"], 1200);
    }

    #[test]
    fn save_over_corrupt_file_starts_fresh() {
        let store = temp_store("overwrite");
        fs::write(store.path(), "[[[").unwrap();
        store
            .save(&DocumentPatch {
                default_price: Some(700),
                ..DocumentPatch::default()
            })
            .unwrap();
        let loaded = store.load();
        assert!(loaded.error.is_none());
        assert_eq!(loaded.document.default_price, 700);
    }

    #[test]
    fn set_aside_copies_the_current_file() {
        let store = temp_store("aside");
        assert_eq!(store.set_aside().unwrap(), None);

        fs::write(store.path(), "{broken").unwrap();
        let copy = store.set_aside().unwrap().unwrap();
        assert!(copy.to_string_lossy().ends_with(".json.corrupt"));
        assert_eq!(fs::read_to_string(copy).unwrap(), "{broken");
    }
}
