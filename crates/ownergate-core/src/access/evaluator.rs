//! Per-record grant check.

use super::types::{CallerContext, OwnershipRecord};

/// Whether `caller` is granted access by `record`.
///
/// A missing record never grants anything; blanket access (admin/endpoint)
/// is decided by the engine, not here.
pub fn can_access(caller: &CallerContext, record: Option<&OwnershipRecord>) -> bool {
    let Some(rec) = record else {
        return false;
    };

    if rec.public {
        return true;
    }
    if rec.owner_user_ids.contains(&caller.user_id) {
        return true;
    }
    !rec.owner_team_ids.is_disjoint(&caller.team_ids)
}
