//! Resource names exposed to callers (`memos/<uid>`, `users/<id>`)

use super::UserId;

const MEMO_NAME_PREFIX: &str = "memos/";

/// `memos/<uid>`
pub fn memo_name(uid: &str) -> String {
    format!("{}{}", MEMO_NAME_PREFIX, uid)
}

/// `users/<id>`
pub fn creator_name(creator_id: UserId) -> String {
    format!("users/{}", creator_id)
}

/// Extract the uid from a `memos/<uid>` name
pub fn parse_memo_uid(name: &str) -> Result<&str, String> {
    match name.strip_prefix(MEMO_NAME_PREFIX) {
        Some(uid) if !uid.is_empty() => Ok(uid),
        _ => Err(format!(
            "memo name must be in the format \"memos/<uid>\", got {:?}",
            name
        )),
    }
}
