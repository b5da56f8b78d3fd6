//! Build backend abstraction.
//!
//! Each backend drives one external tool through the two rpm build stages:
//!
//! ```text
//!            spec + sources
//!                  │
//!      build_source_package()          rpmbuild -bs      │ mock --buildsrpm
//!                  ▼
//!              *.src.rpm
//!                  │
//!      build_binary_package()          rpmbuild --rebuild │ mock --rebuild --chain
//!                  ▼
//!                *.rpm
//! ```
//!
//! The backend is chosen once from configuration (`build.backend`) and then
//! shared by every build task of a batch.

pub mod backend_id;
pub mod mock_shim;
pub mod registry;
pub mod rpmbuild_shim;
pub mod trait_def;

pub use backend_id::{BackendId, BackendIdParseError};
pub use mock_shim::MockShim;
pub use registry::BackendRegistry;
pub use rpmbuild_shim::RpmbuildShim;
pub use trait_def::{BackendAvailability, BackendConfig, BackendShim};
