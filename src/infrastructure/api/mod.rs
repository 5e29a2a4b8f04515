pub mod http_timeline_gateway;

pub use http_timeline_gateway::HttpTimelineGateway;
