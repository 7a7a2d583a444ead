use gyaan_core::{Message, Session};

use crate::error::{ChatError, Result};

/// CSV with a `role,content` header and one row per non-system message.
pub fn transcript_csv(session: &Session) -> Result<Vec<u8>> {
    write_rows(session.turns())
}

fn write_rows<'a>(messages: impl Iterator<Item = &'a Message>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["role", "content"])?;
    for message in messages {
        writer.write_record([message.role.as_str(), message.text()])?;
    }
    writer
        .into_inner()
        .map_err(|e| ChatError::Transcript(e.to_string()))
}
