mod bridge_service;

pub use bridge_service::BridgeService;
