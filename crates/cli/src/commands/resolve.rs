use super::{or_dash, print_json};
use crate::di::UseCases;
use porttrace_domain::{ResolutionOutcome, SwitchProbeResult};

pub async fn run(use_cases: &UseCases, target: &str, json: bool) -> anyhow::Result<()> {
    let outcome = use_cases.resolve_ip.execute(target).await?;

    if json {
        print_json(&outcome)?;
    } else {
        print_outcome(&outcome);
    }
    use_cases.resolve_ip.flush().await;
    Ok(())
}

fn print_outcome(outcome: &ResolutionOutcome) {
    println!("Target:  {}", outcome.target_ip);
    println!("Result:  {}", outcome.message);
    println!("MAC:     {}", or_dash(outcome.mac_address));
    if let Some(location) = &outcome.location {
        println!(
            "Port:    {} on {} ({}), VLAN {}",
            location.port, location.switch_name, location.switch_ip, location.vlan
        );
    }
    println!("Time:    {} ms", outcome.query_time_ms);

    if outcome.probes.is_empty() {
        return;
    }
    println!();
    println!(
        "{:<20} {:<16} {:<10} {:<15} {:>8}  DETAIL",
        "SWITCH", "IP", "OUTCOME", "PORT", "MS"
    );
    for probe in &outcome.probes {
        println!(
            "{:<20} {:<16} {:<10} {:<15} {:>8}  {}",
            probe.switch_name,
            probe.switch_ip,
            format!("{:?}", probe.outcome).to_lowercase(),
            or_dash(probe.port.as_deref()),
            probe.elapsed_ms,
            detail(probe)
        );
    }
}

fn detail(probe: &SwitchProbeResult) -> String {
    if let Some(error) = &probe.error {
        return error.clone();
    }
    if probe.ambiguous {
        let ports: Vec<&str> = probe.candidates.iter().map(|b| b.port.as_str()).collect();
        return format!("ambiguous: {}", ports.join(", "));
    }
    match probe.mac_address {
        Some(mac) => format!("mac {}", mac),
        None => String::new(),
    }
}
