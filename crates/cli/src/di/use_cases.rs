use super::Repositories;
use porttrace_application::use_cases::{
    CheckSwitchStatusUseCase, CleanupQueryHistoryUseCase, CreateSwitchUseCase,
    DeleteSwitchUseCase, DiscoverSwitchesUseCase, GetQueryHistoryUseCase, GetSwitchesUseCase, LookupMacCacheUseCase,
    ResolveIpUseCase, SetSwitchEnabledUseCase, TestSwitchConnectionUseCase,
};
use porttrace_domain::Config;
use porttrace_infrastructure::ssh::SshConnector;
use porttrace_infrastructure::system::TcpReachabilityChecker;
use std::sync::Arc;
use std::time::Duration;

pub struct UseCases {
    pub resolve_ip: Arc<ResolveIpUseCase>,
    pub create_switch: Arc<CreateSwitchUseCase>,
    pub get_switches: Arc<GetSwitchesUseCase>,
    pub delete_switch: Arc<DeleteSwitchUseCase>,
    pub set_switch_enabled: Arc<SetSwitchEnabledUseCase>,
    pub test_connection: Arc<TestSwitchConnectionUseCase>,
    pub discover_switches: Arc<DiscoverSwitchesUseCase>,
    pub check_status: Arc<CheckSwitchStatusUseCase>,
    pub get_history: Arc<GetQueryHistoryUseCase>,
    pub cleanup_history: Arc<CleanupQueryHistoryUseCase>,
    pub lookup_mac_cache: Arc<LookupMacCacheUseCase>,
}

impl UseCases {
    pub fn new(repos: &Repositories, config: &Config) -> Self {
        let command_timeout = config.lookup.command_timeout();
        let connector = Arc::new(SshConnector::new(command_timeout * 2));
        let checker = Arc::new(TcpReachabilityChecker::new());

        Self {
            resolve_ip: Arc::new(
                ResolveIpUseCase::new(
                    repos.switches.clone(),
                    repos.switches.clone(),
                    connector.clone(),
                    repos.history.clone(),
                    config.lookup.clone(),
                )
                .with_mac_cache(repos.mac_cache.clone()),
            ),
            create_switch: Arc::new(CreateSwitchUseCase::new(repos.switches.clone())),
            get_switches: Arc::new(GetSwitchesUseCase::new(repos.switches.clone())),
            delete_switch: Arc::new(DeleteSwitchUseCase::new(repos.switches.clone())),
            set_switch_enabled: Arc::new(SetSwitchEnabledUseCase::new(repos.switches.clone())),
            test_connection: Arc::new(TestSwitchConnectionUseCase::new(
                repos.switches.clone(),
                repos.switches.clone(),
                connector.clone(),
                command_timeout,
            )),
            discover_switches: Arc::new(DiscoverSwitchesUseCase::new(
                repos.switches.clone(),
                connector,
                command_timeout,
            )),
            check_status: Arc::new(CheckSwitchStatusUseCase::new(
                repos.switches.clone(),
                checker,
                Duration::from_secs(config.status_check.probe_timeout_secs),
            )),
            get_history: Arc::new(GetQueryHistoryUseCase::new(repos.history.clone())),
            cleanup_history: Arc::new(CleanupQueryHistoryUseCase::new(repos.history.clone())),
            lookup_mac_cache: Arc::new(LookupMacCacheUseCase::new(repos.mac_cache.clone())),
        }
    }
}
