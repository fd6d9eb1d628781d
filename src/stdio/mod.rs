pub mod metadata;
pub mod server;

pub use metadata::{GET_DOC, GetDocArgs};
pub use server::DocsServer;
