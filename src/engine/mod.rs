// Catalog fetch engine.

pub mod http;
mod interface;
pub mod stub;

pub use http::HttpEngine;
pub use interface::{Engine, EngineHandle, Event, Request};
pub use stub::{StubEngine, StubResponse};
