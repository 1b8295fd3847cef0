//! File-backed document store.
//!
//! Documents live as JSON files under the configured data directory:
//!
//! ```text
//! <data_dir>/
//!   accounts/<id>.json
//!   profiles/<patient_id>.json
//!   plans/<patient_id>/<YYYYMMDDTHHMMSS.sssZ>.json
//!   todos/dietitian_todos.<dietitian_id>.json
//! ```
//!
//! The store is process-local: a single mutex serialises read-modify-write
//! operations, which is what makes `add_patient_to_roster` and
//! `claim_dietitian_if_unassigned` genuine compare-and-set primitives here.
//! A multi-node deployment would need the backing database's own conditional
//! writes instead.

use crate::config::CoreConfig;
use crate::constants::TODO_STORAGE_KEY;
use crate::error::{CoordResult, CoordinationError};
use crate::store::{AccountStore, PlanStore, ProfileStore, TodoMedium};
use aahara_types::Identity;
use records::{Account, ClinicalProfile, DietPlan, Plan, Profile, Role, UserAccount};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Validates that an identity is safe to embed in a file name.
///
/// Identities come from the external provider; this guards against path
/// traversal through a hostile handle.
fn validate_id_safe_for_path(id: &Identity) -> CoordResult<()> {
    const MAX_ID_LEN: usize = 128;

    let raw = id.as_str();
    if raw.len() > MAX_ID_LEN {
        return Err(CoordinationError::InvalidInput(format!(
            "identity exceeds maximum length of {MAX_ID_LEN} characters"
        )));
    }

    let ok = raw
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));
    if !ok || raw.starts_with('.') {
        return Err(CoordinationError::InvalidInput(
            "identity contains characters unsuitable for storage keys".into(),
        ));
    }

    Ok(())
}

fn read_optional(path: &Path) -> CoordResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoordinationError::FileRead(e)),
    }
}

fn write_document(path: &Path, contents: &str) -> CoordResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(CoordinationError::StorageDirCreation)?;
    }
    fs::write(path, contents).map_err(CoordinationError::FileWrite)
}

/// JSON-file document store implementing every document port.
#[derive(Debug)]
pub struct FileDocumentStore {
    accounts_dir: PathBuf,
    profiles_dir: PathBuf,
    plans_dir: PathBuf,
    // Serialises read-modify-write cycles; see module docs.
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            accounts_dir: cfg.accounts_dir(),
            profiles_dir: cfg.profiles_dir(),
            plans_dir: cfg.plans_dir(),
            write_lock: Mutex::new(()),
        }
    }

    fn account_path(&self, id: &Identity) -> CoordResult<PathBuf> {
        validate_id_safe_for_path(id)?;
        Ok(self.accounts_dir.join(format!("{id}.json")))
    }

    fn profile_path(&self, patient_id: &Identity) -> CoordResult<PathBuf> {
        validate_id_safe_for_path(patient_id)?;
        Ok(self.profiles_dir.join(format!("{patient_id}.json")))
    }

    fn patient_plans_dir(&self, patient_id: &Identity) -> CoordResult<PathBuf> {
        validate_id_safe_for_path(patient_id)?;
        Ok(self.plans_dir.join(patient_id.as_str()))
    }

    fn read_account(&self, id: &Identity) -> CoordResult<Option<UserAccount>> {
        let path = self.account_path(id)?;
        match read_optional(&path)? {
            Some(contents) => Ok(Some(Account::parse(&contents)?)),
            None => Ok(None),
        }
    }

    fn plans_of(&self, patient_id: &Identity) -> CoordResult<Vec<(PathBuf, DietPlan)>> {
        let dir = self.patient_plans_dir(patient_id)?;
        let entries = match fs::read_dir(&dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoordinationError::FileRead(e)),
        };

        let mut plans = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            match Plan::parse(&contents) {
                Ok(plan) => plans.push((path, plan)),
                Err(e) => {
                    tracing::warn!("skipping unparseable plan document {}: {e}", path.display());
                }
            }
        }
        Ok(plans)
    }
}

impl AccountStore for FileDocumentStore {
    fn get(&self, id: &Identity) -> CoordResult<Option<UserAccount>> {
        self.read_account(id)
    }

    fn put(&self, account: &UserAccount) -> CoordResult<()> {
        let path = self.account_path(&account.id)?;
        write_document(&path, &Account::render(account)?)
    }

    fn add_patient_to_roster(
        &self,
        dietitian_id: &Identity,
        patient_id: &Identity,
    ) -> CoordResult<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut dietitian = self
            .read_account(dietitian_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(dietitian_id.clone()))?;

        let changed = dietitian.add_linked_patient(patient_id.clone());
        if changed {
            let path = self.account_path(dietitian_id)?;
            write_document(&path, &Account::render(&dietitian)?)?;
        }
        Ok(changed)
    }

    fn remove_patient_from_roster(
        &self,
        dietitian_id: &Identity,
        patient_id: &Identity,
    ) -> CoordResult<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut dietitian = self
            .read_account(dietitian_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(dietitian_id.clone()))?;

        let changed = dietitian.remove_linked_patient(patient_id);
        if changed {
            let path = self.account_path(dietitian_id)?;
            write_document(&path, &Account::render(&dietitian)?)?;
        }
        Ok(changed)
    }

    fn claim_dietitian_if_unassigned(
        &self,
        patient_id: &Identity,
        dietitian_id: &Identity,
    ) -> CoordResult<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let mut patient = self
            .read_account(patient_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(patient_id.clone()))?;

        match &patient.linked_dietitian_id {
            Some(current) => Ok(current == dietitian_id),
            None => {
                patient.linked_dietitian_id = Some(dietitian_id.clone());
                let path = self.account_path(patient_id)?;
                write_document(&path, &Account::render(&patient)?)?;
                Ok(true)
            }
        }
    }

    fn list_by_role(&self, role: Role) -> CoordResult<Vec<UserAccount>> {
        let entries = match fs::read_dir(&self.accounts_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(CoordinationError::FileRead(e)),
        };

        let mut accounts = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(contents) = fs::read_to_string(&path) else {
                continue;
            };
            match Account::parse(&contents) {
                Ok(account) if account.role == role => accounts.push(account),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "skipping unparseable account document {}: {e}",
                        path.display()
                    );
                }
            }
        }
        Ok(accounts)
    }
}

impl ProfileStore for FileDocumentStore {
    fn load(&self, patient_id: &Identity) -> CoordResult<Option<ClinicalProfile>> {
        let path = self.profile_path(patient_id)?;
        match read_optional(&path)? {
            Some(contents) => Ok(Some(Profile::parse(&contents)?)),
            None => Ok(None),
        }
    }

    fn create_if_absent(
        &self,
        patient_id: &Identity,
        profile: &ClinicalProfile,
    ) -> CoordResult<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let path = self.profile_path(patient_id)?;
        if path.is_file() {
            return Ok(false);
        }
        write_document(&path, &Profile::render(profile)?)?;
        Ok(true)
    }

    fn save(&self, patient_id: &Identity, profile: &ClinicalProfile) -> CoordResult<()> {
        let path = self.profile_path(patient_id)?;
        write_document(&path, &Profile::render(profile)?)
    }
}

impl PlanStore for FileDocumentStore {
    fn append(&self, plan: &DietPlan) -> CoordResult<()> {
        let dir = self.patient_plans_dir(&plan.patient_id)?;
        let filename = format!("{}.json", plan.generated_at.format("%Y%m%dT%H%M%S%.3fZ"));
        write_document(&dir.join(filename), &Plan::render(plan)?)
    }

    fn latest_for_patient(
        &self,
        patient_id: &Identity,
        include_unpublished: bool,
    ) -> CoordResult<Option<DietPlan>> {
        let latest = self
            .plans_of(patient_id)?
            .into_iter()
            .map(|(_, plan)| plan)
            .filter(|plan| include_unpublished || plan.published)
            .max_by_key(|plan| plan.generated_at);
        Ok(latest)
    }

    fn publish_latest(&self, patient_id: &Identity) -> CoordResult<bool> {
        let _guard = self.write_lock.lock().expect("store lock poisoned");

        let Some((path, mut plan)) = self
            .plans_of(patient_id)?
            .into_iter()
            .max_by_key(|(_, plan)| plan.generated_at)
        else {
            return Ok(false);
        };

        if !plan.published {
            plan.published = true;
            write_document(&path, &Plan::render(&plan)?)?;
        }
        Ok(true)
    }
}

/// File-backed todo medium, one blob per dietitian.
#[derive(Clone, Debug)]
pub struct FileTodoMedium {
    path: PathBuf,
}

impl FileTodoMedium {
    /// Medium for the given dietitian's todo list.
    pub fn for_dietitian(cfg: &CoreConfig, dietitian_id: &Identity) -> CoordResult<Self> {
        validate_id_safe_for_path(dietitian_id)?;
        let path = cfg
            .todos_dir()
            .join(format!("{TODO_STORAGE_KEY}.{dietitian_id}.json"));
        Ok(Self { path })
    }
}

impl TodoMedium for FileTodoMedium {
    fn read(&self) -> Option<String> {
        fs::read_to_string(&self.path).ok()
    }

    fn write(&self, blob: &str) -> CoordResult<()> {
        write_document(&self.path, blob)
    }
}

/// Builds the store shared across services.
pub fn shared_store(cfg: &CoreConfig) -> Arc<FileDocumentStore> {
    Arc::new(FileDocumentStore::new(cfg))
}
