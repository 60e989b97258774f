//! Small pure helpers for the CLI surface

use anyhow::{bail, Result};

use crate::models::CustomerOnuDetail;

/// Parse a comma-separated list of Ethernet port numbers (1-4) into the
/// per-port lock vector, e.g. "1,3" -> [true, false, true, false].
pub fn parse_eth_locks(ports: &str) -> Result<[bool; 4]> {
    let mut locks = [false; 4];

    for part in ports.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let port: usize = part
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid Ethernet port: {}", part))?;
        if !(1..=4).contains(&port) {
            bail!("Ethernet port out of range (1-4): {}", port);
        }

        locks[port - 1] = true;
    }

    Ok(locks)
}

/// Render an ONU detail readout as the telnet-style text block operators
/// are used to.
pub fn format_onu_detail(data: &CustomerOnuDetail) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or("N/A").to_string();

    let mut lines = vec![
        "=== ONU Details ===".to_string(),
        format!("Type: {}", field(&data.onu_type)),
        format!("Phase State: {}", field(&data.phase_state)),
        format!("Serial Number: {}", field(&data.serial_number)),
        format!("ONU Distance: {}", field(&data.onu_distance)),
        format!("Online Duration: {}", field(&data.online_duration)),
        format!("Attenuation: {}", field(&data.redaman)),
        format!("Remote IP: {}", field(&data.ip_remote)),
        String::new(),
        "=== Ethernet Ports ===".to_string(),
    ];

    if data.eth_port.is_empty() {
        lines.push("No port data available".to_string());
    } else {
        for (index, port) in data.eth_port.iter().enumerate() {
            lines.push(format!(
                "Port {}: {}",
                index + 1,
                if port.is_unlocked { "Unlocked" } else { "Locked" }
            ));
        }
    }

    lines.push(String::new());
    lines.push("=== Modem Logs ===".to_string());
    lines.push(
        data.modem_logs
            .clone()
            .unwrap_or_else(|| "No logs available".to_string()),
    );

    lines.join("\n")
}
