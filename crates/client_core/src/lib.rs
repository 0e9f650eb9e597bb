//! Client session state and synchronization for shared message boards.
//!
//! [`BoardApp`] is the entry point: it resolves launch links into a role,
//! holds the open [`BoardSession`], drives the landing/board/view state
//! machine and keeps the view's comment list live through a
//! [`ViewSynchronizer`]. The remote store, theme catalog and presentation
//! layer are injected through the [`RemoteStore`], [`ThemeCatalog`] and
//! [`Presenter`] traits.

pub mod app;
pub mod error;
pub mod machine;
pub mod presenter;
pub mod resolver;
pub mod session;
pub mod store;
pub mod sync;
pub mod themes;

pub use app::{AppOptions, BoardApp};
pub use error::{ClientError, Result};
pub use machine::DisplayState;
pub use presenter::{NoticeKind, Presenter};
pub use resolver::{LaunchAction, LaunchParams};
pub use session::{BoardSession, ShareLinks};
pub use store::{HttpRemoteStore, RemoteStore};
pub use sync::ViewSynchronizer;
pub use themes::{BuiltinThemes, ThemeCatalog};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
