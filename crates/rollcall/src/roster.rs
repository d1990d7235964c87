//! Roster loading from a host file.

use rollcall_core::{PeerId, Roster};
use std::path::Path;
use tracing::info;

use crate::error::BarrierError;

/// Read a newline-delimited host file and locate `local` in it.
pub async fn load_roster(path: &Path, local: &PeerId) -> crate::Result<Roster> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BarrierError::RosterRead {
            path: path.to_path_buf(),
            source,
        })?;

    let roster = Roster::parse(&content, local)?;
    info!(
        hosts = roster.len(),
        local = %local,
        index = roster.local_index(),
        "read roster from {}",
        path.display()
    );
    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollcall_core::CoreError;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn peer(id: &str) -> PeerId {
        PeerId::new(id).unwrap()
    }

    #[tokio::test]
    async fn test_load_hostfile() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "node-0\nnode-1\nnode-2\n").unwrap();
        tmp.flush().unwrap();

        let roster = load_roster(tmp.path(), &peer("node-2")).await.unwrap();
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.local_index(), 2);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = load_roster(Path::new("/tmp/nonexistent_rollcall_hosts"), &peer("a"))
            .await
            .unwrap_err();
        assert!(matches!(err, BarrierError::RosterRead { .. }));
    }

    #[tokio::test]
    async fn test_self_absent_is_fatal() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "node-0\nnode-1\n").unwrap();
        tmp.flush().unwrap();

        let err = load_roster(tmp.path(), &peer("node-9")).await.unwrap_err();
        assert!(matches!(
            err,
            BarrierError::Roster(CoreError::SelfNotInRoster(ref id)) if id == "node-9"
        ));
    }
}
