// Library root
// -----------
// This crate exposes the pieces the interactive CLI is built from. The binary
// (`main.rs`) wires them together; everything below `ui` is usable and
// testable without a terminal.
//
// Module responsibilities:
// - `api`: the Transfer Client. Sends one file as multipart/form-data to the
//   transform service and hands back the raw response bytes.
// - `session`: the Session value and its pure transition function.
// - `progress`: the cancellable synthetic progress emitter.
// - `result`: result store and releasable result handles.
// - `controller`: drives one processing episode (emitter + request + deadline)
//   and applies the outcome to the session.
// - `ui`: dialoguer menu and indicatif progress rendering.
pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod mode;
pub mod progress;
pub mod result;
pub mod session;
pub mod ui;

pub use api::{FileBlob, Transfer, TransferClient};
pub use config::{Config, ProgressPolicy};
pub use controller::Controller;
pub use error::{TransferError, USER_ERROR_MESSAGE};
pub use mode::Mode;
pub use result::{ResultHandle, ResultStore};
pub use session::{Event, Session, Status};
