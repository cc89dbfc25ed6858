use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;
use crate::event::EventRecord;

/// The caller-supplied domain capability: a pure fold over events plus a codec
/// for the snapshot blob.
///
/// One reducer per aggregate type, not a polymorphic aggregate base type —
/// domain state stays a plain value and the store never dictates its shape.
pub trait Reducer: Send + Sync {
    type State;

    /// The empty initial state, used when no snapshot exists.
    fn initial(&self) -> Self::State;

    /// Apply one committed event to the state.
    fn apply(&self, state: Self::State, event: &EventRecord) -> Self::State;

    /// Encode the state for snapshot storage.
    fn serialize(&self, state: &Self::State) -> Result<Vec<u8>, StoreError>;

    /// Decode a stored snapshot blob back into state.
    fn deserialize(&self, bytes: &[u8]) -> Result<Self::State, StoreError>;
}

/// Reducer built from an initial value and an apply function, with bitcode as
/// the snapshot codec. Covers the common case where state is a serde type.
pub struct SerdeReducer<S, F> {
    initial: S,
    apply: F,
}

impl<S, F> SerdeReducer<S, F> {
    pub fn new(initial: S, apply: F) -> Self {
        SerdeReducer { initial, apply }
    }
}

impl<S, F> Reducer for SerdeReducer<S, F>
where
    S: Clone + Serialize + DeserializeOwned + Send + Sync,
    F: Fn(S, &EventRecord) -> S + Send + Sync,
{
    type State = S;

    fn initial(&self) -> S {
        self.initial.clone()
    }

    fn apply(&self, state: S, event: &EventRecord) -> S {
        (self.apply)(state, event)
    }

    fn serialize(&self, state: &S) -> Result<Vec<u8>, StoreError> {
        bitcode::serialize(state).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<S, StoreError> {
        bitcode::deserialize(bytes).map_err(|e| StoreError::Serialization(e.to_string()))
    }
}

/// Object-safe form of `Reducer` operating on blobs end to end.
///
/// The store's automatic-snapshot policy holds reducers as
/// `Arc<dyn ErasedReducer>` keyed by aggregate id, so aggregates with different
/// state types can share one store.
pub trait ErasedReducer: Send + Sync {
    /// Fold `events` over the state decoded from `base` (or the initial state
    /// when `base` is `None`) and return the encoded result.
    fn fold_blob(
        &self,
        base: Option<&[u8]>,
        events: &[EventRecord],
    ) -> Result<Vec<u8>, StoreError>;
}

impl<R: Reducer> ErasedReducer for R {
    fn fold_blob(
        &self,
        base: Option<&[u8]>,
        events: &[EventRecord],
    ) -> Result<Vec<u8>, StoreError> {
        let mut state = match base {
            Some(bytes) => self.deserialize(bytes)?,
            None => self.initial(),
        };
        for event in events {
            state = self.apply(state, event);
        }
        self.serialize(&state)
    }
}
