use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::aptos::normalize_address;
use crate::error::{StorageError, WalletError};
use crate::storage::{
    Storage, StoredUpiDirectory, UpiDirectoryDoc, UpiMapping, UPI_DIRECTORY_VERSION,
};

/// `name@provider`: name is 2-29 chars of [a-z0-9._-] starting alphanumeric,
/// provider is 2-16 alphanumeric chars starting with a letter. Handles are
/// canonicalized to lowercase before this runs.
static UPI_ID_FORMAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._-]{1,28}@[a-z][a-z0-9]{1,15}$").expect("Invalid UPI regex")
});

/// Canonicalize and validate a handle. Uniqueness is case-insensitive, so
/// the canonical form is lowercase and that is what gets stored.
pub fn normalize_upi_id(upi_id: &str) -> Result<String, WalletError> {
    let handle = upi_id.trim().to_lowercase();
    if !UPI_ID_FORMAT.is_match(&handle) {
        return Err(WalletError::InvalidInput(format!(
            "Invalid UPI handle: {}",
            upi_id
        )));
    }
    Ok(handle)
}

/// Register a handle for an address.
///
/// A handle owned by a different address is a conflict; re-registering your
/// own handle refreshes it (upsert). The directory does not stop one address
/// from owning several handles.
pub fn register(storage: &Storage, upi_id: &str, address: &str) -> Result<UpiMapping, WalletError> {
    let handle = normalize_upi_id(upi_id)?;
    let address = normalize_address(address)?;

    let mut doc = load_directory(storage)?;
    let now = Utc::now();

    if let Some(existing) = doc.mappings.iter_mut().find(|m| m.upi_id == handle) {
        if existing.address != address {
            return Err(WalletError::UpiConflict(handle));
        }
        existing.last_used = now;
        let refreshed = existing.clone();
        storage.save_upi_directory(&doc)?;
        return Ok(refreshed);
    }

    let mapping = UpiMapping {
        upi_id: handle.clone(),
        address,
        created_at: now,
        last_used: now,
    };
    doc.mappings.push(mapping.clone());
    storage.save_upi_directory(&doc)?;

    log::info!("Registered UPI handle {}", handle);
    Ok(mapping)
}

/// Resolve a handle to its mapping, bumping `last_used`.
pub fn resolve(storage: &Storage, upi_id: &str) -> Result<UpiMapping, WalletError> {
    let handle = normalize_upi_id(upi_id)?;

    let mut doc = load_directory(storage)?;
    let mapping = doc
        .mappings
        .iter_mut()
        .find(|m| m.upi_id == handle)
        .ok_or(WalletError::UpiNotFound(handle))?;

    mapping.last_used = Utc::now();
    let resolved = mapping.clone();
    storage.save_upi_directory(&doc)?;

    Ok(resolved)
}

/// First handle registered to an address, if any.
pub fn lookup_by_address(
    storage: &Storage,
    address: &str,
) -> Result<Option<UpiMapping>, WalletError> {
    let address = normalize_address(address)?;
    let doc = load_directory(storage)?;
    Ok(doc.mappings.into_iter().find(|m| m.address == address))
}

/// Case-insensitive substring search over handles.
pub fn search(storage: &Storage, query: &str) -> Result<Vec<UpiMapping>, WalletError> {
    let needle = query.trim().to_lowercase();
    let doc = load_directory(storage)?;
    Ok(doc
        .mappings
        .into_iter()
        .filter(|m| m.upi_id.contains(&needle))
        .collect())
}

/// All mappings, in registration order.
pub fn list(storage: &Storage) -> Result<Vec<UpiMapping>, WalletError> {
    Ok(load_directory(storage)?.mappings)
}

pub fn remove(storage: &Storage, upi_id: &str) -> Result<(), WalletError> {
    let handle = normalize_upi_id(upi_id)?;

    let mut doc = load_directory(storage)?;
    let before = doc.mappings.len();
    doc.mappings.retain(|m| m.upi_id != handle);
    if doc.mappings.len() == before {
        return Err(WalletError::UpiNotFound(handle));
    }
    storage.save_upi_directory(&doc)?;

    log::info!("Removed UPI handle {}", handle);
    Ok(())
}

/// Load the directory, upgrading whatever shape is on disk to the current
/// versioned document.
///
/// Handled shapes, in order: the versioned document under the current key; a
/// bare mapping array under the current key (written by older builds); the
/// legacy single-key document, which is migrated and then removed. A
/// document that fails to parse is re-initialized empty, matching how every
/// other non-wallet store degrades.
fn load_directory(storage: &Storage) -> Result<UpiDirectoryDoc, WalletError> {
    match storage.load_upi_directory() {
        Ok(Some(StoredUpiDirectory::Versioned(doc))) => return Ok(doc),
        Ok(Some(StoredUpiDirectory::Legacy(mappings))) => {
            log::info!(
                "Upgrading UPI directory to versioned format ({} mappings)",
                mappings.len()
            );
            let doc = UpiDirectoryDoc {
                version: UPI_DIRECTORY_VERSION,
                mappings,
            };
            storage.save_upi_directory(&doc)?;
            return Ok(doc);
        }
        Ok(None) => {}
        Err(StorageError::Json(e)) => {
            log::warn!("UPI directory is unreadable ({}), re-initializing", e);
            let doc = UpiDirectoryDoc::default();
            storage.save_upi_directory(&doc)?;
            return Ok(doc);
        }
        Err(e) => return Err(e.into()),
    }

    match storage.load_legacy_upi_directory() {
        Ok(Some(mappings)) => {
            log::info!("Migrating legacy UPI directory ({} mappings)", mappings.len());
            let doc = UpiDirectoryDoc {
                version: UPI_DIRECTORY_VERSION,
                mappings,
            };
            storage.save_upi_directory(&doc)?;
            storage.remove_legacy_upi_directory()?;
            Ok(doc)
        }
        Ok(None) => Ok(UpiDirectoryDoc::default()),
        Err(StorageError::Json(e)) => {
            log::warn!("Legacy UPI directory is unreadable ({}), starting fresh", e);
            storage.remove_legacy_upi_directory()?;
            Ok(UpiDirectoryDoc::default())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ADDR_A: &str = "0x0000000000000000000000000000000000000000000000000000000000000a11";
    const ADDR_B: &str = "0x0000000000000000000000000000000000000000000000000000000000000b22";

    fn temp_storage() -> (TempDir, Storage) {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new_with_base_dir(dir.path().to_path_buf());
        (dir, storage)
    }

    #[test]
    fn test_register_and_resolve() {
        let (_dir, storage) = temp_storage();

        let registered = register(&storage, "alice@aptos", ADDR_A).unwrap();
        assert_eq!(registered.upi_id, "alice@aptos");
        assert_eq!(registered.address, ADDR_A);

        let resolved = resolve(&storage, "alice@aptos").unwrap();
        assert_eq!(resolved.address, ADDR_A);
        assert!(resolved.last_used >= registered.last_used);
    }

    #[test]
    fn test_handle_owned_by_other_address_conflicts() {
        let (_dir, storage) = temp_storage();
        register(&storage, "alice@aptos", ADDR_A).unwrap();

        let conflict = register(&storage, "alice@aptos", ADDR_B);
        assert!(matches!(conflict, Err(WalletError::UpiConflict(_))));

        // the original mapping is untouched
        assert_eq!(resolve(&storage, "alice@aptos").unwrap().address, ADDR_A);
        assert_eq!(list(&storage).unwrap().len(), 1);
    }

    #[test]
    fn test_same_owner_upserts() {
        let (_dir, storage) = temp_storage();
        let first = register(&storage, "alice@aptos", ADDR_A).unwrap();
        let second = register(&storage, "alice@aptos", ADDR_A).unwrap();

        assert!(second.last_used >= first.last_used);
        assert_eq!(list(&storage).unwrap().len(), 1);
    }

    #[test]
    fn test_uniqueness_is_case_insensitive() {
        let (_dir, storage) = temp_storage();
        register(&storage, "Alice@Aptos", ADDR_A).unwrap();

        // stored canonically, resolvable in any case
        assert_eq!(resolve(&storage, "ALICE@APTOS").unwrap().upi_id, "alice@aptos");

        let conflict = register(&storage, "aLiCe@aPtOs", ADDR_B);
        assert!(matches!(conflict, Err(WalletError::UpiConflict(_))));
    }

    #[test]
    fn test_format_validation() {
        let (_dir, storage) = temp_storage();

        for bad in ["", "noat", "@aptos", "alice@", "a@aptos", "al ice@aptos", "alice@ap tos", "alice@@aptos"] {
            let result = register(&storage, bad, ADDR_A);
            assert!(
                matches!(result, Err(WalletError::InvalidInput(_))),
                "expected rejection for {:?}",
                bad
            );
        }

        register(&storage, "a.b-c_9@provider1", ADDR_A).unwrap();
    }

    #[test]
    fn test_search_matches_substrings() {
        let (_dir, storage) = temp_storage();
        register(&storage, "alice@aptos", ADDR_A).unwrap();
        register(&storage, "bob@aptos", ADDR_B).unwrap();

        assert_eq!(search(&storage, "ali").unwrap().len(), 1);
        assert_eq!(search(&storage, "APTOS").unwrap().len(), 2);
        assert_eq!(search(&storage, "carol").unwrap().len(), 0);
    }

    #[test]
    fn test_lookup_by_address() {
        let (_dir, storage) = temp_storage();
        register(&storage, "alice@aptos", ADDR_A).unwrap();

        let found = lookup_by_address(&storage, ADDR_A).unwrap().unwrap();
        assert_eq!(found.upi_id, "alice@aptos");
        assert!(lookup_by_address(&storage, ADDR_B).unwrap().is_none());

        // short-form address resolves to the same canonical entry
        let short = lookup_by_address(&storage, "0xa11").unwrap().unwrap();
        assert_eq!(short.upi_id, "alice@aptos");
    }

    #[test]
    fn test_remove() {
        let (_dir, storage) = temp_storage();
        register(&storage, "alice@aptos", ADDR_A).unwrap();

        remove(&storage, "alice@aptos").unwrap();
        assert!(matches!(
            resolve(&storage, "alice@aptos"),
            Err(WalletError::UpiNotFound(_))
        ));
        assert!(matches!(
            remove(&storage, "alice@aptos"),
            Err(WalletError::UpiNotFound(_))
        ));
    }

    #[test]
    fn test_legacy_single_key_document_migrates() {
        let (_dir, storage) = temp_storage();
        std::fs::create_dir_all(storage.base_dir()).unwrap();

        let legacy = vec![UpiMapping {
            upi_id: "carol@aptos".to_string(),
            address: ADDR_A.to_string(),
            created_at: Utc::now(),
            last_used: Utc::now(),
        }];
        std::fs::write(
            storage.base_dir().join("upi_directory.json"),
            serde_json::to_string(&legacy).unwrap(),
        )
        .unwrap();

        let all = list(&storage).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].upi_id, "carol@aptos");

        // the legacy file is gone and the versioned document took over
        assert!(!storage.base_dir().join("upi_directory.json").exists());
        let current = std::fs::read_to_string(
            storage.base_dir().join("cryptal_global_upi_directory.json"),
        )
        .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&current).unwrap();
        assert_eq!(doc["version"], UPI_DIRECTORY_VERSION);
    }

    #[test]
    fn test_bare_array_under_current_key_upgrades() {
        let (_dir, storage) = temp_storage();
        std::fs::create_dir_all(storage.base_dir()).unwrap();

        let bare = vec![UpiMapping {
            upi_id: "dave@aptos".to_string(),
            address: ADDR_B.to_string(),
            created_at: Utc::now(),
            last_used: Utc::now(),
        }];
        std::fs::write(
            storage.base_dir().join("cryptal_global_upi_directory.json"),
            serde_json::to_string(&bare).unwrap(),
        )
        .unwrap();

        assert_eq!(resolve(&storage, "dave@aptos").unwrap().address, ADDR_B);

        let current = std::fs::read_to_string(
            storage.base_dir().join("cryptal_global_upi_directory.json"),
        )
        .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&current).unwrap();
        assert_eq!(doc["version"], UPI_DIRECTORY_VERSION);
    }

    #[test]
    fn test_corrupt_directory_reinitializes() {
        let (_dir, storage) = temp_storage();
        std::fs::create_dir_all(storage.base_dir()).unwrap();
        std::fs::write(
            storage.base_dir().join("cryptal_global_upi_directory.json"),
            "not json at all",
        )
        .unwrap();

        assert!(list(&storage).unwrap().is_empty());

        // registration works against the re-initialized store
        register(&storage, "erin@aptos", ADDR_A).unwrap();
        assert_eq!(list(&storage).unwrap().len(), 1);
    }
}
