//! Shared group deletion used by both expiry paths.

use droplink_core::FileGroup;
use droplink_db::GroupRepository;
use droplink_storage::Storage;

/// Delete a group's blobs, then its registry entry. Blob failures are logged
/// and do not stop the remaining deletions; idempotent blob delete and
/// delete-if-exists registry semantics make it safe for the reaper and a
/// lookup-triggered lazy delete to purge the same group concurrently.
///
/// Returns whether this caller removed the registry entry.
pub(crate) async fn purge_group(
    storage: &dyn Storage,
    groups: &GroupRepository,
    group: &FileGroup,
) -> bool {
    for file in &group.files {
        if let Err(e) = storage.delete(&file.storage_name).await {
            tracing::error!(
                group.code = %group.code,
                storage_name = %file.storage_name,
                error = %e,
                "failed to delete blob, continuing"
            );
        }
    }

    match groups.delete_group(&group.code).await {
        Ok(removed) => {
            if removed {
                tracing::info!(
                    group.code = %group.code,
                    file_count = group.files.len(),
                    "expired group purged"
                );
            }
            removed
        }
        Err(e) => {
            tracing::error!(group.code = %group.code, error = %e, "failed to delete registry entry");
            false
        }
    }
}
