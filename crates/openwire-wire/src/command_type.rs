/// Data structure type identifiers for the OpenWire message family.
///
/// Every marshalled command starts with a one-byte type id; the message
/// commands occupy a contiguous range. Values outside that range are kept
/// in `Unknown(u8)` so they can be reported or re-encoded unchanged.
///
/// ```text
/// ┌──────┬────────────────┐
/// │ Wire │ Variant        │
/// ├──────┼────────────────┤
/// │ 23   │ Message        │
/// │ 24   │ BytesMessage   │
/// │ 25   │ MapMessage     │
/// │ 26   │ ObjectMessage  │
/// │ 27   │ StreamMessage  │
/// │ 28   │ TextMessage    │
/// │ 29   │ BlobMessage    │
/// └──────┴────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandType {
    Message,
    BytesMessage,
    MapMessage,
    ObjectMessage,
    StreamMessage,
    TextMessage,
    BlobMessage,
    Unknown(u8),
}

impl CommandType {
    /// Return the single-byte wire id for this command type.
    pub fn wire_id(self) -> u8 {
        match self {
            Self::Message => 23,
            Self::BytesMessage => 24,
            Self::MapMessage => 25,
            Self::ObjectMessage => 26,
            Self::StreamMessage => 27,
            Self::TextMessage => 28,
            Self::BlobMessage => 29,
            Self::Unknown(id) => id,
        }
    }

    /// Parse a wire byte into a [`CommandType`].
    pub fn from_wire_id(id: u8) -> Self {
        match id {
            23 => Self::Message,
            24 => Self::BytesMessage,
            25 => Self::MapMessage,
            26 => Self::ObjectMessage,
            27 => Self::StreamMessage,
            28 => Self::TextMessage,
            29 => Self::BlobMessage,
            other => Self::Unknown(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_family_roundtrips() {
        for id in 23..=29 {
            let kind = CommandType::from_wire_id(id);
            assert!(!matches!(kind, CommandType::Unknown(_)), "{id} should be known");
            assert_eq!(kind.wire_id(), id);
        }
    }

    #[test]
    fn text_message_is_28() {
        assert_eq!(CommandType::TextMessage.wire_id(), 28);
    }

    #[test]
    fn unknown_value_preserved() {
        let unknown = CommandType::from_wire_id(0x42);
        assert_eq!(unknown, CommandType::Unknown(0x42));
        assert_eq!(unknown.wire_id(), 0x42);
    }
}
