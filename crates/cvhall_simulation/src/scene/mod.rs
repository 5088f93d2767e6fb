//! Scene domain: SceneHost contract, Disposable resources, headless host

pub mod headless;
pub mod host;

pub use headless::*;
pub use host::*;
