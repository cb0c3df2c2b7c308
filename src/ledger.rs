use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{DEFAULT_DESCRIPTION_PLACEHOLDER, ItemRecord, LEDGER_COLUMNS};
use crate::settings::Settings;
use crate::util::ensure_directory;

/// Truncates (or creates) the active ledger, leaving only the header row.
///
/// This is the explicit "start a fresh insertion" operation: prior content
/// is destroyed, not appended to.
pub fn new_ledger(settings: &Settings) -> Result<PathBuf> {
    save(&settings.active_ledger_path, &[])?;
    Ok(settings.active_ledger_path.clone())
}

/// Reads a ledger into memory. A missing file is an empty ledger, not an
/// error. Rows blank across all columns are skipped.
///
/// Rows whose description column holds the literal `DEFAULT` placeholder get
/// the currently configured default description and the
/// `is_description_default` flag, which is why the live settings are a
/// parameter here rather than hidden global state.
pub fn load(path: &Path, settings: &Settings) -> Result<Vec<ItemRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let csv_err = |source: csv::Error| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    // flexible: hand-edited files with short or long rows still load,
    // missing columns read as empty
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;
    let headers = reader.headers().map_err(csv_err)?.clone();

    let mut items = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut item = ItemRecord::from_csv_row(&headers, &row);
        if item.description == DEFAULT_DESCRIPTION_PLACEHOLDER {
            item.description = settings.default_description.clone();
            item.is_description_default = true;
        }
        items.push(item);
    }

    Ok(items)
}

/// Rewrites the whole ledger: header plus one row per record.
///
/// The file is written to a sibling temp file and renamed into place, so a
/// failed write leaves the previous ledger intact rather than truncated.
pub fn save(path: &Path, items: &[ItemRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_directory(parent)?;
    }

    let tmp_path = sibling_tmp_path(path);
    write_rows(&tmp_path, items).inspect_err(|_| {
        let _ = fs::remove_file(&tmp_path);
    })?;

    fs::rename(&tmp_path, path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Adds `new_item` to the ledger at `path`, or, when a record with the same
/// identity key already exists, increments that record's quantity instead.
/// First match wins; the existing record's title, image, description and
/// price are left untouched. Returns the resulting (possibly merged) record.
///
/// Every add flow funnels through here, so a ledger never ends up holding
/// two rows with the same identity key.
pub fn add_or_increment(
    path: &Path,
    settings: &Settings,
    new_item: ItemRecord,
) -> Result<ItemRecord> {
    let mut items = load(path, settings)?;
    let key = new_item.identity_key();

    let result = match items.iter_mut().find(|item| item.identity_key() == key) {
        Some(existing) => {
            existing.quantity += new_item.quantity;
            existing.clone()
        }
        None => {
            let result = new_item.clone();
            items.push(new_item);
            result
        }
    };

    save(path, &items)?;
    Ok(result)
}

fn write_rows(path: &Path, items: &[ItemRecord]) -> Result<()> {
    let write_err = |err: csv::Error| {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(source) => source,
            other => io::Error::other(format!("{other:?}")),
        };
        Error::Write {
            path: path.to_path_buf(),
            source,
        }
    };

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(LEDGER_COLUMNS).map_err(write_err)?;
    for item in items {
        writer.write_record(item.to_csv_row()).map_err(write_err)?;
    }
    writer.flush().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("ledger"));
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Price;
    use tempfile::TempDir;

    fn item(name: &str, quantity: u64, price: &str) -> ItemRecord {
        ItemRecord {
            name: name.to_string(),
            title: name.to_string(),
            image_ref: String::new(),
            description: "literal text".to_string(),
            quantity,
            price: Price::parse_or_zero(price),
            is_description_default: false,
        }
    }

    fn test_settings(root: &Path) -> Settings {
        Settings::defaults(root)
    }

    #[test]
    fn new_ledger_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());

        let path = new_ledger(&settings).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "name,title,imageRef,description,quantity,price");
        assert!(load(&path, &settings).unwrap().is_empty());
    }

    #[test]
    fn new_ledger_destroys_prior_content() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());

        add_or_increment(&settings.active_ledger_path, &settings, item("Cat", 2, "1.00")).unwrap();
        new_ledger(&settings).unwrap();

        assert!(load(&settings.active_ledger_path, &settings).unwrap().is_empty());
    }

    #[test]
    fn missing_ledger_loads_empty() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let items = load(&dir.path().join("nope.csv"), &settings).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn blank_rows_are_skipped() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = dir.path().join("items.csv");
        fs::write(
            &path,
            "name,title,imageRef,description,quantity,price\n\
             Cat,Cat,,text,1,1.00\n\
             ,,,,,\n\
             Dog,Dog,,text,2,2.00\n",
        )
        .unwrap();

        let items = load(&path, &settings).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "Cat");
        assert_eq!(items[1].name, "Dog");
    }

    #[test]
    fn short_rows_load_with_empty_fields() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = dir.path().join("items.csv");
        fs::write(
            &path,
            "name,title,imageRef,description,quantity,price\n\
             Cat,Cat\n",
        )
        .unwrap();

        let items = load(&path, &settings).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Cat");
        assert_eq!(items[0].quantity, 0);
        assert_eq!(items[0].price, Price::ZERO);
        assert!(items[0].description.is_empty());
    }

    #[test]
    fn default_description_resolves_against_live_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.csv");

        let mut settings = test_settings(dir.path());
        settings.default_description = "A".to_string();

        let mut flagged = item("Cat", 1, "1.00");
        flagged.description = "X".to_string();
        flagged.is_description_default = true;
        save(&path, &[flagged]).unwrap();

        // the stored row holds the placeholder, not the frozen text
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(DEFAULT_DESCRIPTION_PLACEHOLDER));
        assert!(!raw.contains('X'));

        settings.default_description = "B".to_string();
        let items = load(&path, &settings).unwrap();
        assert_eq!(items[0].description, "B");
        assert!(items[0].is_description_default);
    }

    #[test]
    fn literal_descriptions_round_trip_unchanged() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = dir.path().join("items.csv");

        let mut original = item("Cat", 2, "3.5");
        original.description = "multi\nline, with commas".to_string();
        original.image_ref = "photos/cat.png".to_string();
        save(&path, &[original.clone()]).unwrap();

        let items = load(&path, &settings).unwrap();
        assert_eq!(items, vec![original]);
    }

    #[test]
    fn merge_accumulates_quantity_and_preserves_price() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = new_ledger(&settings).unwrap();

        let first = add_or_increment(&path, &settings, item("Cat", 2, "1.50")).unwrap();
        assert_eq!(first.quantity, 2);

        let merged = add_or_increment(&path, &settings, item("Cat", 3, "9.99")).unwrap();
        assert_eq!(merged.quantity, 5);
        assert_eq!(merged.price.to_string(), "1.50");

        let items = load(&path, &settings).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
        assert_eq!(items[0].price.to_string(), "1.50");
    }

    #[test]
    fn merge_matches_identity_case_insensitively() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = new_ledger(&settings).unwrap();

        add_or_increment(&path, &settings, item("Cat", 1, "1.00")).unwrap();
        let mut upper = item("CAT", 4, "2.00");
        upper.title = "  cat ".to_string();
        add_or_increment(&path, &settings, upper).unwrap();

        let items = load(&path, &settings).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn merge_invariant_holds_across_sequences() {
        let dir = TempDir::new().unwrap();
        let settings = test_settings(dir.path());
        let path = new_ledger(&settings).unwrap();

        let adds = [("Cat", 2u64), ("Dog", 1), ("cat", 3), ("Fish", 5), ("DOG", 4)];
        for (name, quantity) in adds {
            add_or_increment(&path, &settings, item(name, quantity, "1.00")).unwrap();
        }

        let items = load(&path, &settings).unwrap();
        assert_eq!(items.len(), 3);

        let mut keys: Vec<_> = items.iter().map(ItemRecord::identity_key).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), items.len());

        let total_cat = items
            .iter()
            .find(|i| i.identity_key().0 == "cat")
            .map(|i| i.quantity);
        assert_eq!(total_cat, Some(5));
        let total_dog = items
            .iter()
            .find(|i| i.identity_key().0 == "dog")
            .map(|i| i.quantity);
        assert_eq!(total_dog, Some(5));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("items.csv");
        save(&path, &[item("Cat", 1, "1.00")]).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![OsString::from("items.csv")]);
    }
}
