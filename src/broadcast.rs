//! Broadcast-optimized message handling: Arc-wrapped messages for zero-cost
//! cloning, and pooled buffers for JSON serialization, when fanning the same
//! [`ServerMessage`] out to every member of a room.

use bytes::{Bytes, BytesMut};
use serde::Serialize;
use smallvec::SmallVec;
use std::sync::Arc;

use crate::protocol::{ServerMessage, UserId};

/// Maximum number of recipients to stack-allocate for a typical room.
pub const TYPICAL_ROOM_SIZE: usize = 8;

/// A broadcast-optimized message wrapper. Cloning a `BroadcastMessage` only
/// bumps an `Arc` refcount instead of cloning the message body, so fanning
/// out to N room members costs `O(N * pointer_size)` rather than
/// `O(N * message_size)`.
#[derive(Debug, Clone)]
pub struct BroadcastMessage {
    inner: Arc<ServerMessage>,
    serialized_json: Option<Arc<Bytes>>,
}

impl BroadcastMessage {
    #[inline]
    pub fn new(message: ServerMessage) -> Self {
        Self {
            inner: Arc::new(message),
            serialized_json: None,
        }
    }

    pub fn with_json(message: ServerMessage, json_bytes: Bytes) -> Self {
        Self {
            inner: Arc::new(message),
            serialized_json: Some(Arc::new(json_bytes)),
        }
    }

    #[inline]
    pub fn message(&self) -> &ServerMessage {
        &self.inner
    }

    pub fn get_or_serialize_json(&mut self) -> Result<Arc<Bytes>, serde_json::Error> {
        if let Some(ref bytes) = self.serialized_json {
            return Ok(bytes.clone());
        }
        let json = serde_json::to_vec(&*self.inner)?;
        let bytes = Arc::new(Bytes::from(json));
        self.serialized_json = Some(bytes.clone());
        Ok(bytes)
    }

    #[inline]
    pub fn serialized_json(&self) -> Option<&Arc<Bytes>> {
        self.serialized_json.as_ref()
    }

    #[inline]
    pub fn arc_clone(&self) -> Arc<ServerMessage> {
        self.inner.clone()
    }

    #[inline]
    pub fn is_unique(&self) -> bool {
        Arc::strong_count(&self.inner) == 1
    }
}

impl From<ServerMessage> for BroadcastMessage {
    fn from(msg: ServerMessage) -> Self {
        Self::new(msg)
    }
}

impl AsRef<ServerMessage> for BroadcastMessage {
    fn as_ref(&self) -> &ServerMessage {
        &self.inner
    }
}

/// A pooled buffer for JSON serialization, reused across successive
/// broadcasts to cut per-message allocation.
pub struct SerializationBuffer {
    buffer: BytesMut,
    default_capacity: usize,
}

impl SerializationBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            default_capacity: capacity,
        }
    }

    pub fn serialize_json<T: Serialize>(&mut self, value: &T) -> Result<Bytes, serde_json::Error> {
        self.buffer.clear();
        let mut writer = self.buffer.writer();
        serde_json::to_writer(&mut writer, value)?;
        Ok(self.buffer.split().freeze())
    }

    pub fn reset_if_oversized(&mut self, max_size: usize) {
        if self.buffer.capacity() > max_size {
            self.buffer = BytesMut::with_capacity(self.default_capacity);
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

impl Default for SerializationBuffer {
    fn default() -> Self {
        Self::new()
    }
}

trait BytesMutWriter {
    fn writer(&mut self) -> BytesMutWriteAdapter<'_>;
}

impl BytesMutWriter for BytesMut {
    fn writer(&mut self) -> BytesMutWriteAdapter<'_> {
        BytesMutWriteAdapter(self)
    }
}

struct BytesMutWriteAdapter<'a>(&'a mut BytesMut);

impl std::io::Write for BytesMutWriteAdapter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// List of member ids optimized for typical room sizes: stack-allocated up
/// to [`TYPICAL_ROOM_SIZE`] members, heap-allocated beyond that.
pub type UserIdList = SmallVec<[UserId; TYPICAL_ROOM_SIZE]>;

/// Broadcast target specification.
#[derive(Debug, Clone)]
pub enum BroadcastTarget {
    Room { members: UserIdList },
    RoomExcept { members: UserIdList, except: UserId },
    User(UserId),
}

impl BroadcastTarget {
    pub fn room(members: impl IntoIterator<Item = UserId>) -> Self {
        Self::Room {
            members: members.into_iter().collect(),
        }
    }

    pub fn room_except(members: impl IntoIterator<Item = UserId>, except: UserId) -> Self {
        Self::RoomExcept {
            members: members.into_iter().collect(),
            except,
        }
    }

    pub fn recipient_count(&self) -> usize {
        match self {
            Self::Room { members } => members.len(),
            Self::RoomExcept { members, except } => {
                members.len().saturating_sub(usize::from(members.contains(except)))
            }
            Self::User(_) => 1,
        }
    }

    pub fn recipients(&self) -> impl Iterator<Item = &UserId> {
        let (members, except) = match self {
            Self::Room { members } => (members.as_slice(), None),
            Self::RoomExcept { members, except } => (members.as_slice(), Some(except)),
            Self::User(id) => return UserIdIterator::Single(Some(id)),
        };
        UserIdIterator::Filtered {
            inner: members.iter(),
            except,
        }
    }
}

enum UserIdIterator<'a> {
    Single(Option<&'a UserId>),
    Filtered {
        inner: std::slice::Iter<'a, UserId>,
        except: Option<&'a UserId>,
    },
}

impl<'a> Iterator for UserIdIterator<'a> {
    type Item = &'a UserId;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Single(id) => id.take(),
            Self::Filtered { inner, except } => loop {
                let id = inner.next()?;
                if Some(id) != *except {
                    return Some(id);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_message() -> ServerMessage {
        ServerMessage::RoomDeleted {
            message: "Host has left the room".to_string(),
        }
    }

    #[test]
    fn broadcast_message_arc_cloning_shares_allocation() {
        let broadcast = BroadcastMessage::new(sample_message());
        let clone1 = broadcast.clone();
        let clone2 = broadcast.clone();

        assert!(Arc::ptr_eq(&broadcast.inner, &clone1.inner));
        assert!(Arc::ptr_eq(&broadcast.inner, &clone2.inner));
        assert_eq!(Arc::strong_count(&broadcast.inner), 3);
    }

    #[test]
    fn serialization_buffer_reuse_produces_valid_json() {
        let mut buffer = SerializationBuffer::with_capacity(256);

        let bytes1 = buffer.serialize_json(&sample_message()).unwrap();
        assert!(!bytes1.is_empty());

        let bytes2 = buffer
            .serialize_json(&ServerMessage::ThemeUpdated {
                theme: crate::protocol::Theme::Christmas,
            })
            .unwrap();
        assert!(!bytes2.is_empty());

        let json1: serde_json::Value = serde_json::from_slice(&bytes1).unwrap();
        let json2: serde_json::Value = serde_json::from_slice(&bytes2).unwrap();
        assert!(json1.is_object());
        assert!(json2.is_object());
    }

    #[test]
    fn user_id_list_spills_past_typical_room_size() {
        let mut list: UserIdList = SmallVec::new();
        for i in 0..TYPICAL_ROOM_SIZE {
            list.push(format!("user-{i}"));
        }
        assert!(!list.spilled());
        list.push("user-overflow".to_string());
        assert!(list.spilled());
    }

    #[test]
    fn broadcast_target_room_except_excludes_one_member() {
        let members: Vec<UserId> = (0..4).map(|i| format!("user-{i}")).collect();
        let except = members[1].clone();

        let target = BroadcastTarget::room_except(members, except.clone());
        let recipients: Vec<_> = target.recipients().collect();

        assert_eq!(recipients.len(), 3);
        assert!(!recipients.contains(&&except));
    }
}
