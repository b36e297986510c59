pub mod gpio;
pub mod queue;
