//! foldermodel core library — UI-agnostic folder list model.
//!
//! `foldermodel-core` keeps a newest-first, type-filtered list of the
//! files in a set of watched directories up to date from filesystem
//! change notifications, and tracks a row selection over it. It knows
//! nothing about how the list is drawn or how notifications are produced;
//! frontends plug those in through [`PathWatcher`] and the event
//! subscriptions on [`FolderModel`].
//!
//! # Modules
//!
//! - [`model`] — [`FolderModel`], the synchronization logic and query surface.
//! - [`fs`] — [`FileRecord`], directory listing and type classification.
//! - [`list`] — sorted record list, type filters and selection state.
//! - [`watch`] — watch subscriptions and routing of raw change paths.
//! - [`event`] — [`ModelEvent`] notifications and the subscription registry.
//! - [`role`] — per-row fields readable by presenters.
//! - [`config`] — TOML configuration.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod list;
pub mod model;
pub mod role;
pub mod watch;

pub use config::{Config, LogConfig, ModelConfig, WatcherConfig};
pub use error::{CoreError, CoreResult};
pub use event::{EventBus, EventKind, ModelEvent, SubscriptionId};
pub use fs::{list_files, FileRecord, ListedFile, MimeGuessClassifier, TypeClassifier};
pub use list::{SelectionState, SortedFileList, TypeFilterSet};
pub use model::FolderModel;
pub use role::{role_names, Role, RoleValue};
pub use watch::{Change, DetachedWatcher, PathWatcher, WatchSet, WatchTarget};
