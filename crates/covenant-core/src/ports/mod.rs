//! Ports: trait boundaries between the core and its collaborators.

pub mod outbound;

pub use outbound::{
    ContractStore, EventPublisher, MockRemoteStore, NullEventPublisher, RecordingEventPublisher,
    RemoteObjectStore, StepEvent, UserStore,
};
