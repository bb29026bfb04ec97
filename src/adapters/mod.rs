//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements           | Connects to                 |
//! |----------------|----------------------|-----------------------------|
//! | `kv`           | StoragePort          | In-memory map / data dir    |
//! | `local_store`  | WorkspaceStore       | Any StoragePort (postcard)  |
//! |                | HistoryStore         |                             |
//! | `document`     | DocumentStore        | Shared in-process documents |
//! |                | WorkspaceStore       | Any DocumentStore (JSON)    |
//! |                | HistoryStore         |                             |
//! | `location`     | LocationProvider     | Fixed reading               |
//! | `time`         | Clock                | Host UTC clock              |
//! | `log_sink`     | EventSink            | `log` facade                |
//! | `config_file`  | ConfigPort           | JSON file                   |

pub mod config_file;
pub mod document;
pub mod kv;
pub mod local_store;
pub mod location;
pub mod log_sink;
pub mod time;
