pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod request;
pub mod response;
pub mod router;
pub mod scope;
pub mod utils;

pub use crate::context::{Context, DefaultContext};
pub use crate::dispatcher::{Dispatcher, Fallback, Miss, Outcome};
pub use crate::error::{HandlerError, RouterError};
pub use crate::middleware::{BoxedHandler, Handler, Next, from_fn};
pub use crate::router::RouteTable;
pub use crate::scope::{Scope, ScopeId};
pub use crate::utils::method::Method;
pub use async_trait::async_trait;
