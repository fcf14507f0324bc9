// src/watch/mask.rs

use bitflags::bitflags;
use notify::event::{
    AccessKind, AccessMode, EventKind, ModifyKind, RenameMode,
};
use tracing::warn;

bitflags! {
    /// Composite set of event kinds a job subscription listens for.
    ///
    /// Bit values follow the classic inotify constants so the numeric form
    /// substituted into commands keeps its conventional meaning.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EventMask: u32 {
        const ACCESS        = 0x0000_0001;
        const MODIFY        = 0x0000_0002;
        const ATTRIB        = 0x0000_0004;
        const CLOSE_WRITE   = 0x0000_0008;
        const CLOSE_NOWRITE = 0x0000_0010;
        const OPEN          = 0x0000_0020;
        const MOVED_FROM    = 0x0000_0040;
        const MOVED_TO      = 0x0000_0080;
        const CREATE        = 0x0000_0100;
        const DELETE        = 0x0000_0200;
        const DELETE_SELF   = 0x0000_0400;
        const MOVE_SELF     = 0x0000_0800;
    }
}

impl EventMask {
    /// The `move` composite: either side of a rename.
    pub const MOVE: EventMask = EventMask::MOVED_FROM.union(EventMask::MOVED_TO);

    /// The `close` composite: close after write or after read-only access.
    pub const CLOSE: EventMask =
        EventMask::CLOSE_WRITE.union(EventMask::CLOSE_NOWRITE);

    const TOKEN_NAMES: &'static [(EventMask, &'static str)] = &[
        (EventMask::ACCESS, "access"),
        (EventMask::MODIFY, "modify"),
        (EventMask::ATTRIB, "attribute_change"),
        (EventMask::CLOSE_WRITE, "write_close"),
        (EventMask::CLOSE_NOWRITE, "nowrite_close"),
        (EventMask::OPEN, "open"),
        (EventMask::MOVED_FROM, "move_from"),
        (EventMask::MOVED_TO, "move_to"),
        (EventMask::CREATE, "create"),
        (EventMask::DELETE, "delete"),
        (EventMask::DELETE_SELF, "self_delete"),
        (EventMask::MOVE_SELF, "self_move"),
    ];

    /// Config token for a single atomic kind. Used as `tflags` when a command
    /// is rendered, so the vocabulary matches the `events` option.
    pub fn token_name(self) -> &'static str {
        Self::TOKEN_NAMES
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

/// Translate an ordered sequence of event tokens into a composite mask.
///
/// Tokens are whitespace-trimmed and case-sensitive. Unrecognized tokens are
/// warn-logged and ignored so an unknown future token never takes the daemon
/// down. Or-combining is associative and idempotent, so duplicates are
/// harmless. An empty sequence (or one with no recognized token) yields the
/// empty mask.
pub fn parse_events<'a, I>(tokens: I) -> EventMask
where
    I: IntoIterator<Item = &'a str>,
{
    let mut mask = EventMask::empty();

    for raw in tokens {
        let token = raw.trim();
        match token {
            "access" => mask |= EventMask::ACCESS,
            "attribute_change" => mask |= EventMask::ATTRIB,
            "write_close" => mask |= EventMask::CLOSE_WRITE,
            "nowrite_close" => mask |= EventMask::CLOSE_NOWRITE,
            "create" => mask |= EventMask::CREATE,
            "delete" => mask |= EventMask::DELETE,
            "self_delete" => mask |= EventMask::DELETE_SELF,
            "modify" => mask |= EventMask::MODIFY,
            "self_move" => mask |= EventMask::MOVE_SELF,
            "move_from" => mask |= EventMask::MOVED_FROM,
            "move_to" => mask |= EventMask::MOVED_TO,
            "open" => mask |= EventMask::OPEN,
            "all" => mask |= EventMask::all(),
            "move" => mask |= EventMask::MOVE,
            "close" => mask |= EventMask::CLOSE,
            "" => {}
            other => warn!(token = other, "ignoring unrecognized event token"),
        }
    }

    mask
}

/// Map a raw `notify` event kind onto one atomic mask bit.
///
/// `is_root` distinguishes the watched directory itself from entries below
/// it: removal or rename of the root classifies as `self_delete` /
/// `self_move`. Returns `None` for kinds the backend cannot attribute
/// (`Any` / `Other` catch-alls); callers debug-log and skip those.
///
/// `RenameMode::Both` carries two paths and maps to two atomic kinds; that
/// split is handled by the session before calling in here.
pub fn classify(kind: EventKind, is_root: bool) -> Option<EventMask> {
    match kind {
        EventKind::Access(AccessKind::Open(_)) => Some(EventMask::OPEN),
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => {
            Some(EventMask::CLOSE_WRITE)
        }
        EventKind::Access(AccessKind::Close(_)) => Some(EventMask::CLOSE_NOWRITE),
        EventKind::Access(_) => Some(EventMask::ACCESS),
        EventKind::Create(_) => Some(EventMask::CREATE),
        EventKind::Remove(_) => {
            if is_root {
                Some(EventMask::DELETE_SELF)
            } else {
                Some(EventMask::DELETE)
            }
        }
        EventKind::Modify(ModifyKind::Metadata(_)) => Some(EventMask::ATTRIB),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            Some(EventMask::MOVED_FROM)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            Some(EventMask::MOVED_TO)
        }
        EventKind::Modify(ModifyKind::Name(_)) => {
            if is_root {
                Some(EventMask::MOVE_SELF)
            } else {
                Some(EventMask::MOVED_FROM)
            }
        }
        EventKind::Modify(_) => Some(EventMask::MODIFY),
        EventKind::Any | EventKind::Other => None,
    }
}
