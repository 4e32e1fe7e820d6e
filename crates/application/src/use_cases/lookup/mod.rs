mod batch;
mod probe;
mod resolve_ip;

pub use resolve_ip::ResolveIpUseCase;

pub(crate) use probe::SwitchProber;
