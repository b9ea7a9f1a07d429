mod component;
pub mod tags;
pub mod timing;
pub mod typewriter;

pub use component::ExpressiveText;
pub use timing::Cadence;
