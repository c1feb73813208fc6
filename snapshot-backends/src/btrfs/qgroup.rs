// SPDX-License-Identifier: GPL-3.0-only

use std::path::Path;

use snapshot_types::QuotaGroupId;
use tracing::debug;

use super::SubvolumeManager;
use crate::error::{BackendError, Result};

/// Extract the quota group id from `btrfs qgroup show -e -f` output.
///
/// Header, separator and blank lines are skipped, as is any row that does not
/// have exactly four fields. When several rows qualify the last one wins.
pub fn parse_qgroup_show(output: &str) -> Option<QuotaGroupId> {
    let mut qgroup = None;

    for line in output.lines() {
        if line.is_empty() || line.starts_with("qgroupid") || line.starts_with("---") {
            continue;
        }

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            continue;
        }

        qgroup = Some(QuotaGroupId::new(fields[0]));
    }

    qgroup
}

impl SubvolumeManager {
    /// Locate the quota group bound to a subvolume
    pub fn quota_group(&self, path: &Path) -> Result<QuotaGroupId> {
        let output = self
            .run(self.btrfs().args(["qgroup", "show", "-e", "-f"]).arg(path))
            .map_err(|error| {
                debug!("qgroup show failed for {}: {error}", path.display());
                BackendError::QuotasDisabled {
                    path: path.to_path_buf(),
                }
            })?;

        parse_qgroup_show(&output).ok_or_else(|| BackendError::QuotaGroupNotFound {
            path: path.to_path_buf(),
        })
    }

    pub fn destroy_quota_group(&self, qgroup: &QuotaGroupId, path: &Path) -> Result<()> {
        self.run(
            self.btrfs()
                .args(["qgroup", "destroy", qgroup.as_str()])
                .arg(path),
        )?;
        debug!("Destroyed qgroup {qgroup} of {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scripted_manager;

    const HEADER: &str = "qgroupid         rfer         excl     max_excl \n--------         ----         ----     -------- \n";

    #[test]
    fn parses_single_row() {
        let output = format!("{HEADER}0/257   16384  16384  none\n");
        assert_eq!(parse_qgroup_show(&output), Some(QuotaGroupId::new("0/257")));
    }

    #[test]
    fn header_only_has_no_group() {
        assert_eq!(parse_qgroup_show(HEADER), None);
        assert_eq!(parse_qgroup_show(""), None);
    }

    #[test]
    fn last_well_formed_row_wins() {
        let output = format!(
            "{HEADER}0/257   16384  16384  none\n\n1/100 16384 16384 none extra\n0/300   4096  4096  none\n   \n"
        );
        assert_eq!(parse_qgroup_show(&output), Some(QuotaGroupId::new("0/300")));
    }

    #[test]
    fn tool_failure_means_quotas_disabled() {
        let (manager, runner) = scripted_manager();
        runner.fail(&["qgroup", "show"], "ERROR: can't list qgroups: quotas not enabled");

        let error = manager.quota_group(Path::new("/pool/a")).unwrap_err();

        assert!(matches!(error, BackendError::QuotasDisabled { .. }));
        assert!(error.is_quota_absent());
        assert_eq!(runner.rendered(), vec!["btrfs qgroup show -e -f /pool/a"]);
    }

    #[test]
    fn missing_row_means_group_not_found() {
        let (manager, runner) = scripted_manager();
        runner.respond(&["qgroup", "show"], HEADER);

        let error = manager.quota_group(Path::new("/pool/a")).unwrap_err();

        assert!(matches!(error, BackendError::QuotaGroupNotFound { .. }));
        assert!(error.is_quota_absent());
    }

    #[test]
    fn destroys_group_on_subvolume() {
        let (manager, runner) = scripted_manager();
        manager
            .destroy_quota_group(&QuotaGroupId::new("0/257"), Path::new("/pool/a"))
            .unwrap();
        assert_eq!(runner.rendered(), vec!["btrfs qgroup destroy 0/257 /pool/a"]);
    }
}
