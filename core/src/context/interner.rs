use lasso::{Spur, ThreadedRodeo};
use std::sync::OnceLock;

/// Interned string key. Event kinds outside the known set repeat once per
/// record, so they are stored as 4-byte keys instead of owned strings.
pub type IStr = Spur;

static KINDS: OnceLock<ThreadedRodeo> = OnceLock::new();

fn rodeo() -> &'static ThreadedRodeo {
    KINDS.get_or_init(ThreadedRodeo::default)
}

pub fn intern(s: &str) -> IStr {
    rodeo().get_or_intern(s)
}

pub fn resolve(key: IStr) -> &'static str {
    rodeo().resolve(&key)
}
