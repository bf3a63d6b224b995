// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Processor configuration.

use std::path::PathBuf;
use std::time::Duration;

/// Identity of the instance this agent runs on, resolved by the platform
/// layer before the processor starts.
#[derive(Debug, Clone, Default)]
pub struct InstanceIdentity {
    pub instance_id: String,
    /// Non-cloud-native hosts registered with the service. Some public
    /// documents need metadata rewrites to run on them.
    pub managed_instance: bool,
}

impl InstanceIdentity {
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            managed_instance: false,
        }
    }

    pub fn managed(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            managed_instance: true,
        }
    }
}

/// Tunables and paths for one processor instance.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Root of the per-instance durable state tree.
    pub data_store_root: PathBuf,
    /// Root of per-command orchestration working directories.
    pub orchestration_root: PathBuf,
    pub identity: InstanceIdentity,
    /// Documents whose run count reaches this limit are poisoned and skipped
    /// on recovery.
    pub command_retry_limit: u32,
    pub send_workers: usize,
    pub cancel_workers: usize,
    /// How long a submit waits on a saturated pool before reporting failure.
    pub submit_timeout: Duration,
    /// Consecutive MDS transport errors tolerated before the processor
    /// reports unhealthy.
    pub stop_policy_threshold: u32,
}

impl ProcessorConfig {
    pub fn new(
        data_store_root: impl Into<PathBuf>,
        orchestration_root: impl Into<PathBuf>,
        identity: InstanceIdentity,
    ) -> Self {
        Self {
            data_store_root: data_store_root.into(),
            orchestration_root: orchestration_root.into(),
            identity,
            command_retry_limit: 5,
            send_workers: 5,
            cancel_workers: 1,
            submit_timeout: Duration::from_secs(10),
            stop_policy_threshold: 10,
        }
    }
}
