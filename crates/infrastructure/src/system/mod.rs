pub mod reachability;

pub use reachability::TcpReachabilityChecker;
