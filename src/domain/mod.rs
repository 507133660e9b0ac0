//! Domain layer: named member groups, their registry, and the transport seam.
//!
//! A [`Domain`] maps caller-chosen member ids onto transport rooms and turns
//! membership and set-algebra broadcasts into [`Transport`] calls. The
//! [`DomainRegistry`] hands out one shared instance per name.

pub mod connection_id;
pub mod group;
pub mod id_source;
pub mod names;
pub mod registry;
pub mod transport;

pub use connection_id::ConnectionId;
pub use group::{Domain, RemoveTarget};
pub use id_source::IdSource;
pub use names::{DomainName, MemberId, ROOM_SEPARATOR, RoomKey};
pub use registry::DomainRegistry;
pub use transport::Transport;
