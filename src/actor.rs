pub mod levels;
pub mod notifications;
pub mod overlay;
pub mod reactor;
