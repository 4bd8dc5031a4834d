//! JSON snapshot storage for one user's notes and folders.
//!
//! Each namespace lives in its own directory under the store root:
//!
//! ```text
//! <root>/<namespace>/autonotes/notes.json
//! <root>/<namespace>/autonotes/folders.json
//! ```
//!
//! Both files hold a pretty-printed JSON array in insertion order. Every
//! mutation rewrites the whole affected collection through a uniquely named
//! temporary file that is renamed over the target, so readers always see a
//! complete file. The in-memory collections only change after that write
//! succeeds.
//!
//! A [`NoteStore`] is opened per request and reloads from disk each time;
//! there is no cache shared between callers. Two writers racing on the same
//! namespace resolve as last-write-wins.

use crate::{
    select, DisplayMode, Folder, FolderPatch, MatchContext, Namespace, Note, NotePatch, Result,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

const DATA_DIR_NAME: &str = "autonotes";
const NOTES_FILE: &str = "notes.json";
const FOLDERS_FILE: &str = "folders.json";

/// The notes and folders of a single namespace, loaded into memory.
#[derive(Debug)]
pub struct NoteStore {
    namespace: Namespace,
    data_dir: PathBuf,
    notes: Vec<Note>,
    folders: Vec<Folder>,
}

impl NoteStore {
    /// Opens the store for `namespace` under `root`, creating its directory
    /// if needed, and loads both collections.
    ///
    /// Corrupt snapshots do not prevent opening; see [`NoteStore::load`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::AutonotesError::Io`] if the namespace directory
    /// cannot be created.
    pub fn open<P: AsRef<Path>>(root: P, namespace: &Namespace) -> Result<Self> {
        let data_dir = root.as_ref().join(namespace.as_str()).join(DATA_DIR_NAME);
        fs::create_dir_all(&data_dir)?;

        let mut store = Self {
            namespace: namespace.clone(),
            data_dir,
            notes: vec![],
            folders: vec![],
        };
        let (notes, folders) = store.load();
        store.notes = notes;
        store.folders = folders;
        Ok(store)
    }

    /// Reads both snapshots from disk.
    ///
    /// A missing file yields an empty collection. An unreadable or malformed
    /// file is logged and also yields an empty collection, so a damaged
    /// snapshot never blocks the application.
    pub fn load(&self) -> (Vec<Note>, Vec<Folder>) {
        (
            load_collection(&self.notes_path()),
            load_collection(&self.folders_path()),
        )
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn notes_path(&self) -> PathBuf {
        self.data_dir.join(NOTES_FILE)
    }

    pub fn folders_path(&self) -> PathBuf {
        self.data_dir.join(FOLDERS_FILE)
    }

    /// All notes in insertion order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// All folders in insertion order.
    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn get_note(&self, note_uuid: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.uuid == note_uuid)
    }

    pub fn get_folder(&self, folder_uuid: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.uuid == folder_uuid)
    }

    /// Notes to display for `mode` and `context`; see [`crate::select`].
    pub fn notes_for_display(&self, mode: DisplayMode, context: &MatchContext) -> Vec<&Note> {
        select(&self.notes, mode, context)
    }

    /// Creates an empty note and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AutonotesError::Io`] or [`crate::AutonotesError::Json`]
    /// if the notes snapshot cannot be written.
    pub fn create_note(&mut self, name: &str, folder_uuid: Option<String>) -> Result<String> {
        let note_uuid = Uuid::new_v4().to_string();
        let mut notes = self.notes.clone();
        notes.push(Note::new(note_uuid.clone(), name.to_string(), folder_uuid));
        self.commit_notes(notes)?;
        log::debug!("[{}] created note {note_uuid}", self.namespace);
        Ok(note_uuid)
    }

    /// Applies `patch` to a note.
    ///
    /// Returns `Ok(false)` if no note has `note_uuid`. A patch that changes
    /// nothing still rewrites the snapshot and returns `Ok(true)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the notes snapshot cannot be written.
    pub fn update_note(&mut self, note_uuid: &str, patch: NotePatch) -> Result<bool> {
        let mut notes = self.notes.clone();
        let Some(note) = notes.iter_mut().find(|n| n.uuid == note_uuid) else {
            return Ok(false);
        };
        let changed = note.apply(patch);
        self.commit_notes(notes)?;
        log::debug!("[{}] updated note {note_uuid} (changed: {changed})", self.namespace);
        Ok(true)
    }

    /// Removes a note and its conditions. Returns `Ok(false)` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the notes snapshot cannot be written.
    pub fn delete_note(&mut self, note_uuid: &str) -> Result<bool> {
        if self.get_note(note_uuid).is_none() {
            return Ok(false);
        }
        let notes = self
            .notes
            .iter()
            .filter(|n| n.uuid != note_uuid)
            .cloned()
            .collect();
        self.commit_notes(notes)?;
        log::debug!("[{}] deleted note {note_uuid}", self.namespace);
        Ok(true)
    }

    /// Creates a folder and returns its id. `parent_uuid` is not checked.
    ///
    /// # Errors
    ///
    /// Returns an error if the folders snapshot cannot be written.
    pub fn create_folder(&mut self, name: &str, parent_uuid: Option<String>) -> Result<String> {
        let folder_uuid = Uuid::new_v4().to_string();
        let mut folders = self.folders.clone();
        folders.push(Folder::new(folder_uuid.clone(), name.to_string(), parent_uuid));
        self.commit_folders(folders)?;
        log::debug!("[{}] created folder {folder_uuid}", self.namespace);
        Ok(folder_uuid)
    }

    /// Applies `patch` to a folder. Returns `Ok(false)` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the folders snapshot cannot be written.
    pub fn update_folder(&mut self, folder_uuid: &str, patch: FolderPatch) -> Result<bool> {
        let mut folders = self.folders.clone();
        let Some(folder) = folders.iter_mut().find(|f| f.uuid == folder_uuid) else {
            return Ok(false);
        };
        folder.apply(patch);
        self.commit_folders(folders)?;
        Ok(true)
    }

    /// Deletes a folder after detaching every note filed in it.
    ///
    /// Notes are not deleted; their `folder_uuid` becomes `None`. The notes
    /// snapshot is written before the folder is removed. Child folders keep
    /// their (now dangling) `parent_uuid`.
    ///
    /// Returns `Ok(false)` if no folder has `folder_uuid`.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot cannot be written. If the notes
    /// write succeeds and the folders write fails, the notes stay detached.
    pub fn delete_folder(&mut self, folder_uuid: &str) -> Result<bool> {
        if self.get_folder(folder_uuid).is_none() {
            return Ok(false);
        }

        let mut notes = self.notes.clone();
        let mut detached = 0usize;
        for note in &mut notes {
            if note.folder_uuid.as_deref() == Some(folder_uuid) {
                note.folder_uuid = None;
                detached += 1;
            }
        }
        self.commit_notes(notes)?;

        let folders = self
            .folders
            .iter()
            .filter(|f| f.uuid != folder_uuid)
            .cloned()
            .collect();
        self.commit_folders(folders)?;
        log::debug!(
            "[{}] deleted folder {folder_uuid}, detached {detached} note(s)",
            self.namespace
        );
        Ok(true)
    }

    /// Replaces both collections wholesale and writes them out.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot cannot be written.
    pub fn replace_all(&mut self, notes: Vec<Note>, folders: Vec<Folder>) -> Result<()> {
        self.commit_notes(notes)?;
        self.commit_folders(folders)
    }

    /// Writes both snapshots.
    ///
    /// # Errors
    ///
    /// Returns an error if either snapshot cannot be written.
    pub fn save(&self) -> Result<()> {
        write_snapshot(&self.notes_path(), &self.notes)?;
        write_snapshot(&self.folders_path(), &self.folders)
    }

    /// The in-memory view only changes once the snapshot is on disk.
    fn commit_notes(&mut self, notes: Vec<Note>) -> Result<()> {
        write_snapshot(&self.notes_path(), &notes)?;
        self.notes = notes;
        Ok(())
    }

    fn commit_folders(&mut self, folders: Vec<Folder>) -> Result<()> {
        write_snapshot(&self.folders_path(), &folders)?;
        self.folders = folders;
        Ok(())
    }
}

fn load_collection<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return vec![],
        Err(e) => {
            log::warn!("Could not read {}: {e}", path.display());
            return vec![];
        }
    };
    match serde_json::from_str(&content) {
        Ok(records) => records,
        Err(e) => {
            log::warn!("Ignoring malformed snapshot {}: {e}", path.display());
            vec![]
        }
    }
}

/// Atomically replaces `path` with the pretty-printed JSON of `records`.
///
/// The temporary file gets a unique name in the target directory, so
/// concurrent writers never share it.
fn write_snapshot<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
