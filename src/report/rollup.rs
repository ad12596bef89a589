//! Segment and disk rollups.
//!
//! Pure functions over already loaded records: the result does not depend
//! on input order, and groups come out sorted by key.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::hard_disk::{DiskSummary, HardDiskBackup};
use crate::models::server::{Environment, ServerAsset};
use crate::parser::capacity::{gb_to_tb, parse_capacity_gb, parse_cpu_cores};

/// Summed capacity of one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentTotals {
    pub server_count: u64,
    pub cpu_cores: u64,
    pub ram_gb: f64,
    pub storage_gb: f64,
    pub ram_tb: f64,
    pub storage_tb: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerGroup {
    pub segment: String,
    pub totals: SegmentTotals,
    pub servers: Vec<ServerAsset>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerCounters {
    pub total: u64,
    pub production: u64,
    pub disaster_recovery: u64,
    pub by_segment: BTreeMap<String, u64>,
}

/// Group servers by segment and total their CPU, RAM and storage.
#[must_use]
pub fn group_servers(servers: &[ServerAsset]) -> Vec<ServerGroup> {
    let mut groups: BTreeMap<&str, Vec<&ServerAsset>> = BTreeMap::new();
    for server in servers {
        groups.entry(server.segment.as_str()).or_default().push(server);
    }

    groups
        .into_iter()
        .map(|(segment, mut members)| {
            members.sort_by(|a, b| a.hostname.cmp(&b.hostname).then(a.id.cmp(&b.id)));

            let mut cpu_cores: u64 = 0;
            let mut ram_gb = 0.0;
            let mut storage_gb = 0.0;
            for server in &members {
                cpu_cores = cpu_cores.saturating_add(parse_cpu_cores(server.cpu.as_deref()));
                ram_gb += parse_capacity_gb(server.ram.as_deref());
                storage_gb += parse_capacity_gb(server.storage.as_deref());
            }

            ServerGroup {
                segment: segment.to_string(),
                totals: SegmentTotals {
                    server_count: members.len() as u64,
                    cpu_cores,
                    ram_gb,
                    storage_gb,
                    ram_tb: gb_to_tb(ram_gb),
                    storage_tb: gb_to_tb(storage_gb),
                },
                servers: members.into_iter().cloned().collect(),
            }
        })
        .collect()
}

/// Dashboard counters: total, per environment, per segment.
#[must_use]
pub fn server_counters(servers: &[ServerAsset]) -> ServerCounters {
    let mut counters = ServerCounters::default();

    for server in servers {
        counters.total += 1;
        match server.environment.parse::<Environment>() {
            Ok(Environment::Production) => counters.production += 1,
            Ok(Environment::DisasterRecovery) => counters.disaster_recovery += 1,
            Err(_) => {}
        }
        *counters.by_segment.entry(server.segment.clone()).or_default() += 1;
    }

    counters
}

/// Per (disk, serial) file count, total size and latest modification.
#[must_use]
pub fn summarize_disks(records: &[HardDiskBackup]) -> Vec<DiskSummary> {
    let mut summaries: BTreeMap<(&str, &str), DiskSummary> = BTreeMap::new();

    for record in records {
        let entry = summaries
            .entry((record.disk_name.as_str(), record.serial_number.as_str()))
            .or_insert_with(|| DiskSummary {
                disk_name: record.disk_name.clone(),
                serial_number: record.serial_number.clone(),
                total_files: 0,
                total_size_mb: 0.0,
                latest_backup: None,
            });

        entry.total_files += 1;
        entry.total_size_mb += record.size_mb.unwrap_or(0.0);
        entry.latest_backup = entry.latest_backup.max(record.modified);
    }

    summaries.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::record;

    fn server(id: i32, hostname: &str, segment: &str, env: &str, cpu: &str, ram: &str) -> ServerAsset {
        ServerAsset {
            id,
            hostname: hostname.to_string(),
            ip_address: format!("10.0.0.{id}"),
            environment: env.to_string(),
            segment: segment.to_string(),
            os: None,
            owner: None,
            cpu: Some(cpu.to_string()),
            ram: Some(ram.to_string()),
            storage: None,
            created_by: None,
            created_at: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    #[test]
    fn test_db_segment_cpu_total() {
        let servers = vec![
            server(1, "db-01", "DB", "Production", "8 cores", "64 GB"),
            server(2, "db-02", "DB", "Production", "16 cores", "128 GB"),
            server(3, "db-dr", "DB", "Disaster Recovery", "4 cores", "1 TB"),
        ];

        let groups = group_servers(&servers);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].segment, "DB");
        assert_eq!(groups[0].totals.cpu_cores, 28);
        assert_eq!(groups[0].totals.server_count, 3);
        assert_eq!(groups[0].totals.ram_gb, 64.0 + 128.0 + 1024.0);
        assert_eq!(groups[0].totals.ram_tb, 1.19);
    }

    #[test]
    fn test_grouping_is_order_independent() {
        let mut servers = vec![
            server(1, "app-01", "APP", "Production", "4", "16GB"),
            server(2, "core-01", "CORE", "Production", "2 cores", "8 GB"),
            server(3, "app-02", "APP", "Disaster Recovery", "4", "n/a"),
            server(4, "db-01", "DB", "Production", "8", "32 GiB"),
        ];

        let forward = group_servers(&servers);
        servers.reverse();
        let backward = group_servers(&servers);

        assert_eq!(forward, backward);
        let segments: Vec<&str> = forward.iter().map(|g| g.segment.as_str()).collect();
        assert_eq!(segments, ["APP", "CORE", "DB"]);
    }

    #[test]
    fn test_unparseable_capacity_contributes_zero() {
        let servers = vec![server(1, "x", "APP", "Production", "many", "lots")];
        let groups = group_servers(&servers);
        assert_eq!(groups[0].totals.cpu_cores, 0);
        assert_eq!(groups[0].totals.ram_gb, 0.0);
    }

    #[test]
    fn test_huge_cpu_values_saturate() {
        let servers = vec![
            server(1, "db-01", "DB", "Production", "18446744073709551615 cores", "1"),
            server(2, "db-02", "DB", "Production", "18446744073709551615 cores", "1"),
            server(3, "db-03", "DB", "Production", "4", "1"),
        ];

        let groups = group_servers(&servers);
        assert_eq!(groups[0].totals.cpu_cores, u64::MAX);
        assert_eq!(groups[0].totals.server_count, 3);
    }

    #[test]
    fn test_counters() {
        let servers = vec![
            server(1, "a", "APP", "Production", "1", "1"),
            server(2, "b", "APP", "Disaster Recovery", "1", "1"),
            server(3, "c", "DB", "Production", "1", "1"),
        ];

        let counters = server_counters(&servers);
        assert_eq!(counters.total, 3);
        assert_eq!(counters.production, 2);
        assert_eq!(counters.disaster_recovery, 1);
        assert_eq!(counters.by_segment.get("APP"), Some(&2));
        assert_eq!(counters.by_segment.get("DB"), Some(&1));
    }

    #[test]
    fn test_summarize_disks() {
        let mut other = record(3, "BBBB2222", 20);
        other.disk_name = "Cold-02".to_string();
        let records = vec![record(1, "AAAA1111", 2), record(2, "AAAA1111", 9), other];

        let summaries = summarize_disks(&records);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].serial_number, "AAAA1111");
        assert_eq!(summaries[0].total_files, 2);
        assert_eq!(summaries[0].total_size_mb, 1.5 + 3.0);
        assert_eq!(summaries[0].latest_backup, records[1].modified);
        assert_eq!(summaries[1].disk_name, "Cold-02");
    }
}
