pub mod fake_gateway;
pub mod mock_gateway;
pub mod recording_notifier;

pub use fake_gateway::*;
pub use mock_gateway::*;
pub use recording_notifier::*;
