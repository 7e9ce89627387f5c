//! Synonym-aware species lookup and image bookkeeping.
//!
//! Three tables back the store:
//!
//! - `species`: one JSON document per accepted scientific name, with the
//!   image attribution and image id kept in their own columns so the image
//!   job can replace them without rewriting the document.
//! - `alternate_names`: synonym -> accepted name.
//! - `images`: image blobs keyed by a random id. Identical content inserted
//!   twice is stored twice.
//!
//! Writers are not ordered against each other; concurrent updates to the
//! same species are last-write-wins.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use duckdb::Connection;
use species_map_database_models::{
    AlternateNameMapping, ImageId, ImageMeta, SpeciesRecord, StoredImage,
};

use crate::DbError;

/// Handle to the species database.
///
/// `duckdb::Connection` is `Send` but not `Sync`, so the connection is
/// wrapped in a `Mutex`. Every operation is a short synchronous query.
pub struct SpeciesStore {
    conn: Mutex<Connection>,
}

impl std::fmt::Debug for SpeciesStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeciesStore").finish_non_exhaustive()
    }
}

impl SpeciesStore {
    /// Opens (or creates) the species database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or schema creation fails.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            crate::paths::ensure_dir(parent)?;
        }
        log::debug!("Opening species database at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Opens the species database at the default path.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or schema creation fails.
    pub fn open_default() -> Result<Self, DbError> {
        Self::open(&crate::paths::species_db_path())
    }

    /// Opens a throwaway in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or schema creation fails.
    pub fn open_in_memory() -> Result<Self, DbError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DbError> {
        create_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, DbError> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Looks up the accepted name for a synonym.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub fn find_accepted_name(&self, name: &str) -> Result<Option<String>, DbError> {
        accepted_name(&*self.conn()?, name)
    }

    /// Finds the species document for `name`.
    ///
    /// Tries an exact match first. On a miss, resolves `name` through the
    /// alternate-name table and retries with the accepted name. Returns
    /// `Ok(None)` when neither lookup finds a document.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a query fails or a stored document is
    /// corrupt.
    pub fn find_species(&self, name: &str) -> Result<Option<SpeciesRecord>, DbError> {
        let conn = self.conn()?;

        if let Some(record) = species_by_name(&conn, name)? {
            return Ok(Some(record));
        }

        let Some(accepted) = accepted_name(&conn, name)? else {
            return Ok(None);
        };

        log::debug!("Resolved synonym {name:?} -> {accepted:?}");
        species_by_name(&conn, &accepted)
    }

    /// Replaces a species' image attribution. `None` clears it.
    ///
    /// Returns `false` if no species has that name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update fails.
    pub fn update_image_meta(
        &self,
        name: &str,
        meta: Option<&ImageMeta>,
    ) -> Result<bool, DbError> {
        let meta_json = meta.map(serde_json::to_string).transpose()?;
        let updated = self.conn()?.execute(
            "UPDATE species SET image_meta = ? WHERE scientific_name = ?",
            duckdb::params![meta_json, name],
        )?;
        Ok(updated > 0)
    }

    /// Sets a species' image id. `None` clears it.
    ///
    /// Returns `false` if no species has that name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the update fails.
    pub fn update_image_id(&self, name: &str, image_id: Option<&str>) -> Result<bool, DbError> {
        let updated = self.conn()?.execute(
            "UPDATE species SET image_id = ? WHERE scientific_name = ?",
            duckdb::params![image_id, name],
        )?;
        Ok(updated > 0)
    }

    /// Stores an image blob and returns its new id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the insert fails.
    pub fn insert_image(&self, content: &[u8], filename: &str) -> Result<ImageId, DbError> {
        let id = uuid::Uuid::new_v4().to_string();
        let length = i64::try_from(content.len()).unwrap_or(i64::MAX);

        self.conn()?.execute(
            "INSERT INTO images (id, filename, content, length) VALUES (?, ?, ?, ?)",
            duckdb::params![id, filename, content, length],
        )?;

        log::debug!("Stored image {filename} ({length} bytes) as {id}");
        Ok(id)
    }

    /// Loads a stored image by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub fn find_image(&self, id: &str) -> Result<Option<StoredImage>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, filename, content FROM images WHERE id = ?")?;
        let result = stmt.query_row([id], |row| {
            Ok(StoredImage {
                id: row.get(0)?,
                filename: row.get(1)?,
                content: row.get(2)?,
            })
        });
        match result {
            Ok(image) => Ok(Some(image)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DbError::DuckDb(e)),
        }
    }

    /// Inserts or replaces a species document.
    ///
    /// Image fields that are `None` on `record` leave any stored image
    /// attribution in place.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or the upsert fails.
    pub fn upsert_species(&self, record: &SpeciesRecord) -> Result<(), DbError> {
        let mut document = record.clone();
        let image_meta = document.image_meta.take();
        let image_id = document.image_id.take();

        let document_json = serde_json::to_string(&document)?;
        let meta_json = image_meta.as_ref().map(serde_json::to_string).transpose()?;

        self.conn()?.execute(
            "INSERT INTO species (scientific_name, document, image_meta, image_id)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (scientific_name) DO UPDATE SET
                document = excluded.document,
                image_meta = COALESCE(excluded.image_meta, image_meta),
                image_id = COALESCE(excluded.image_id, image_id)",
            duckdb::params![record.scientific_name, document_json, meta_json, image_id],
        )?;
        Ok(())
    }

    /// Inserts or replaces a synonym mapping.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the upsert fails.
    pub fn insert_alternate_name(&self, mapping: &AlternateNameMapping) -> Result<(), DbError> {
        self.conn()?.execute(
            "INSERT INTO alternate_names (alternate_name, primary_name)
             VALUES (?, ?)
             ON CONFLICT (alternate_name) DO UPDATE SET primary_name = excluded.primary_name",
            duckdb::params![mapping.alternate_name, mapping.primary_name],
        )?;
        Ok(())
    }

    /// Lists every stored scientific name in alphabetical order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub fn scientific_names(&self) -> Result<Vec<String>, DbError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT scientific_name FROM species ORDER BY scientific_name")?;
        let mut rows = stmt.query([])?;

        let mut names = Vec::new();
        while let Some(row) = rows.next()? {
            names.push(row.get(0)?);
        }
        Ok(names)
    }
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS species (
            scientific_name TEXT NOT NULL PRIMARY KEY,
            document TEXT NOT NULL,
            image_meta TEXT,
            image_id TEXT
        );

        CREATE TABLE IF NOT EXISTS alternate_names (
            alternate_name TEXT NOT NULL PRIMARY KEY,
            primary_name TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS images (
            id TEXT NOT NULL PRIMARY KEY,
            filename TEXT NOT NULL,
            content BLOB NOT NULL,
            length BIGINT NOT NULL,
            uploaded_at TIMESTAMPTZ DEFAULT CURRENT_TIMESTAMP
        );",
    )?;
    Ok(())
}

fn accepted_name(conn: &Connection, name: &str) -> Result<Option<String>, DbError> {
    let mut stmt = conn.prepare("SELECT primary_name FROM alternate_names WHERE alternate_name = ?")?;
    match stmt.query_row([name], |row| row.get(0)) {
        Ok(v) => Ok(Some(v)),
        Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(DbError::DuckDb(e)),
    }
}

fn species_by_name(conn: &Connection, name: &str) -> Result<Option<SpeciesRecord>, DbError> {
    let mut stmt = conn.prepare(
        "SELECT document, image_meta, image_id FROM species WHERE scientific_name = ?",
    )?;
    let row = stmt.query_row([name], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
        ))
    });

    let (document, image_meta, image_id) = match row {
        Ok(v) => v,
        Err(duckdb::Error::QueryReturnedNoRows) => return Ok(None),
        Err(e) => return Err(DbError::DuckDb(e)),
    };

    let mut record: SpeciesRecord = serde_json::from_str(&document)?;
    record.image_meta = image_meta.as_deref().map(serde_json::from_str).transpose()?;
    record.image_id = image_id;
    Ok(Some(record))
}
