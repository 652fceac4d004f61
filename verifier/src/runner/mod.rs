//! @ai:module:intent Command execution and the batch loop
//! @ai:module:layer infrastructure
//! @ai:module:public_api CommandRunner, CommandRunnerTrait, MockCommandRunner, BatchRunner

pub mod batch;
pub mod command;

pub use batch::BatchRunner;
pub use command::{CommandOutput, CommandRunner, CommandRunnerTrait, MockCommandRunner, RecordedCall};
