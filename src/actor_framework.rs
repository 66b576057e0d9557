use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, error, info, instrument, warn};

use crate::persistence::{SnapshotDocument, SnapshotFile};
use crate::subscription::{RecordSubscription, Subscription};

// =============================================================================
// 1. THE ABSTRACTION (Entity trait with hooks and actions)
// =============================================================================

/// Trait that any record must implement to be owned by a [`ResourceActor`].
///
/// Rows are kept ordered by id, so `Id` must be `Ord`. Ids are handed out
/// by [`Entity::next_id`] from a high-water mark that only moves forward.
pub trait Entity:
    Clone + PartialEq + Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Id: Ord + Clone + Send + Sync + Display + Debug + Serialize + DeserializeOwned;
    type CreateParams: Send + Sync + Debug;

    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    fn id(&self) -> &Self::Id;

    /// Id to assign after `last`, the highest id ever handed out. `None`
    /// when the id space is exhausted.
    fn next_id(last: Option<&Self::Id>) -> Option<Self::Id>;

    /// Id requested by the caller, if any. A requested id at or below the
    /// high-water mark (live or deleted) makes the create a no-op.
    fn requested_id(params: &Self::CreateParams) -> Option<Self::Id>;

    /// Checks a caller-requested id before it is considered at all.
    fn validate_requested_id(_id: &Self::Id) -> Result<(), String> {
        Ok(())
    }

    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Replace the stored row with `replacement`, which carries the same id.
    fn on_replace(&mut self, replacement: Self) -> Result<(), String> {
        *self = replacement;
        Ok(())
    }

    fn on_delete(&self) -> Result<(), String> {
        Ok(())
    }

    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped the response")]
    ActorDropped,
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Change rejected: {0}")]
    Rejected(String),
    #[error("Persistence failure: {0}")]
    Persistence(String),
}

/// Result of a create request. A create whose requested id already exists
/// leaves the table untouched and reports `Ignored`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome<Id> {
    Inserted(Id),
    Ignored(Id),
}

impl<Id> InsertOutcome<Id> {
    pub fn id(&self) -> &Id {
        match self {
            InsertOutcome::Inserted(id) | InsertOutcome::Ignored(id) => id,
        }
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Full, id-ordered copy of the table as last committed.
pub type Snapshot<T> = Arc<Vec<T>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<InsertOutcome<T::Id>>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Replace {
        item: T,
        respond_to: Response<bool>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<bool>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

/// Owns every row of one table. Requests are handled one at a time, so each
/// insert, replace, delete and action is atomic with respect to the others.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    rows: BTreeMap<T::Id, T>,
    last_id: Option<T::Id>,
    snapshots: watch::Sender<Snapshot<T>>,
    storage: Option<SnapshotFile>,
}

impl<T: Entity> ResourceActor<T> {
    /// In-memory actor with an empty table.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        Self::with_state(buffer_size, BTreeMap::new(), None, None)
    }

    /// Actor backed by a snapshot file, loading the existing table if the
    /// file is present.
    pub async fn open(
        buffer_size: usize,
        storage: SnapshotFile,
    ) -> Result<(Self, ResourceClient<T>), FrameworkError> {
        let document = storage
            .load::<T>()
            .await
            .map_err(|e| FrameworkError::Persistence(e.to_string()))?;

        let (rows, last_id) = match document {
            Some(document) => {
                let mut last_id = document.last_id;
                let mut rows = BTreeMap::new();
                for item in document.items {
                    let id = item.id().clone();
                    if last_id.as_ref().map_or(true, |last| *last < id) {
                        last_id = Some(id.clone());
                    }
                    rows.insert(id, item);
                }
                info!(path = %storage.path().display(), rows = rows.len(), "Loaded snapshot");
                (rows, last_id)
            }
            None => {
                info!(path = %storage.path().display(), "No snapshot found, starting empty");
                (BTreeMap::new(), None)
            }
        };

        Ok(Self::with_state(buffer_size, rows, last_id, Some(storage)))
    }

    fn with_state(
        buffer_size: usize,
        rows: BTreeMap<T::Id, T>,
        last_id: Option<T::Id>,
        storage: Option<SnapshotFile>,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let initial: Snapshot<T> = Arc::new(rows.values().cloned().collect());
        let (snapshots, snapshot_rx) = watch::channel(initial);
        let actor = Self {
            receiver,
            rows,
            last_id,
            snapshots,
            storage,
        };
        let client = ResourceClient::new(sender, snapshot_rx);
        (actor, client)
    }

    /// Main actor loop. Ends once every client has been dropped and the
    /// mailbox is drained; snapshot subscriptions end with it.
    #[instrument(name = "resource_actor", skip(self), fields(entity = std::any::type_name::<T>()))]
    pub async fn run(mut self) {
        info!(rows = self.rows.len(), "ResourceActor starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.handle_get(&id)));
                }
                ResourceRequest::Replace { item, respond_to } => {
                    let _ = respond_to.send(self.handle_replace(item).await);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id).await);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    let _ = respond_to.send(self.handle_action(id, action).await);
                }
            }
        }

        info!("ResourceActor stopped");
    }

    #[instrument(skip(self, params))]
    async fn handle_create(
        &mut self,
        params: T::CreateParams,
    ) -> Result<InsertOutcome<T::Id>, FrameworkError> {
        debug!(?params, "Processing create request");

        let requested = T::requested_id(&params);
        if let Some(id) = &requested {
            T::validate_requested_id(id).map_err(FrameworkError::Rejected)?;
        }

        let id = match requested {
            Some(id) if self.rows.contains_key(&id) => {
                warn!(id = %id, "Id already taken, create ignored");
                return Ok(InsertOutcome::Ignored(id));
            }
            Some(id) if self.last_id.as_ref().is_some_and(|last| id <= *last) => {
                warn!(id = %id, "Id was retired, create ignored");
                return Ok(InsertOutcome::Ignored(id));
            }
            Some(id) => id,
            None => T::next_id(self.last_id.as_ref()).ok_or_else(|| {
                warn!("Id space exhausted");
                FrameworkError::Rejected("no ids left to assign".to_string())
            })?,
        };

        let mut item =
            T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;

        let previous_last_id = self.last_id.clone();
        if self.last_id.as_ref().map_or(true, |last| *last < id) {
            self.last_id = Some(id.clone());
        }
        self.rows.insert(id.clone(), item);

        if let Err(e) = self.commit().await {
            self.rows.remove(&id);
            self.last_id = previous_last_id;
            return Err(e);
        }

        info!(id = %id, "Row created");
        Ok(InsertOutcome::Inserted(id))
    }

    fn handle_get(&self, id: &T::Id) -> Option<T> {
        let item = self.rows.get(id).cloned();
        debug!(id = %id, found = item.is_some(), "Processing get request");
        item
    }

    #[instrument(skip(self, item), fields(id = %item.id()))]
    async fn handle_replace(&mut self, item: T) -> Result<bool, FrameworkError> {
        debug!("Processing replace request");
        let id = item.id().clone();

        let Some(current) = self.rows.get_mut(&id) else {
            warn!("Row not found, replace ignored");
            return Ok(false);
        };

        let previous = current.clone();
        if let Err(e) = current.on_replace(item) {
            *current = previous;
            return Err(FrameworkError::Rejected(e));
        }
        if *current == previous {
            debug!("Replacement left the row unchanged");
            return Ok(true);
        }

        if let Err(e) = self.commit().await {
            self.rows.insert(id, previous);
            return Err(e);
        }

        info!("Row replaced");
        Ok(true)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn handle_delete(&mut self, id: T::Id) -> Result<bool, FrameworkError> {
        debug!("Processing delete request");

        let Some(removed) = self.rows.remove(&id) else {
            warn!("Row not found, delete ignored");
            return Ok(false);
        };

        if let Err(e) = removed.on_delete() {
            self.rows.insert(id, removed);
            return Err(FrameworkError::Rejected(e));
        }

        if let Err(e) = self.commit().await {
            self.rows.insert(id, removed);
            return Err(e);
        }

        info!("Row deleted");
        Ok(true)
    }

    #[instrument(skip(self, id), fields(id = %id))]
    async fn handle_action(
        &mut self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        debug!(?action, "Processing action request");

        let Some(current) = self.rows.get_mut(&id) else {
            warn!("Row not found for action");
            return Err(FrameworkError::NotFound(id.to_string()));
        };

        let previous = current.clone();
        let result = match current.handle_action(action) {
            Ok(result) => result,
            Err(e) => {
                *current = previous;
                return Err(FrameworkError::Rejected(e));
            }
        };

        if *current != previous {
            if let Err(e) = self.commit().await {
                self.rows.insert(id, previous);
                return Err(e);
            }
        }

        Ok(result)
    }

    /// Persist the table (if backed by a file) and then publish the new
    /// snapshot. Subscribers never observe a change that failed to persist.
    async fn commit(&mut self) -> Result<(), FrameworkError> {
        if let Some(storage) = &self.storage {
            let document = SnapshotDocument {
                last_id: self.last_id.clone(),
                items: self.rows.values().cloned().collect(),
            };
            if let Err(e) = storage.save(&document).await {
                error!(error = %e, path = %storage.path().display(), "Failed to persist snapshot");
                return Err(FrameworkError::Persistence(e.to_string()));
            }
        }

        self.snapshots
            .send_replace(Arc::new(self.rows.values().cloned().collect()));
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    snapshots: watch::Receiver<Snapshot<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        snapshots: watch::Receiver<Snapshot<T>>,
    ) -> Self {
        Self { sender, snapshots }
    }

    async fn call<R>(
        &self,
        request: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(request(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(
        &self,
        params: T::CreateParams,
    ) -> Result<InsertOutcome<T::Id>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    pub async fn replace(&self, item: T) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Replace { item, respond_to })
            .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<bool, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.call(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Subscribe to the whole table. The first `next()` yields the current
    /// snapshot.
    pub fn subscribe(&self) -> Subscription<T> {
        Subscription::new(self.snapshots.clone())
    }

    /// Subscribe to a single row.
    pub fn subscribe_record(&self, id: T::Id) -> RecordSubscription<T> {
        RecordSubscription::new(self.subscribe(), id)
    }
}
