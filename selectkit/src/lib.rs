pub mod collection;
pub mod entry;
pub mod error;
pub mod handlers;
pub mod network;
pub mod selection;

pub use error::{Result, SelectionError};

pub mod prelude {
    pub use crate::collection::{CollectionChange, ObservableList};
    pub use crate::entry::{EntryId, SelectableEntry};
    pub use crate::error::{Result, SelectionError};
    pub use crate::handlers::HandlerId;
    pub use crate::network::{ConnectivitySource, ManualConnectivity, NetworkStatus};
    pub use crate::selection::{SelectionConfig, SelectionTrackingList};
}
