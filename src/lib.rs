pub mod automation;
pub mod dispatch;
pub mod geometry;
pub mod logging;
pub mod occlusion;
pub mod service;
pub mod settings;
pub mod snapshot;
pub mod uitree;
